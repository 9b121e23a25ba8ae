//! Built-in wheel templates and user-saved wheels.

use serde::{Deserialize, Serialize};

use super::store::{load_json, save_json, KeyValueStore, CURRENT_TEMPLATE_KEY, SAVED_WHEELS_KEY};
use crate::api::error::WheelError;
use crate::core::color::Color;
use crate::core::section::{Section, SectionList};

/// A named, ready-made section list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sections: Vec<Section>,
}

impl Template {
    fn new(id: &str, name: &str, description: &str, sections: &[(&str, &str)]) -> Self {
        let sections = sections
            .iter()
            .enumerate()
            .map(|(i, (label, hex))| {
                Section::new((i + 1).to_string(), *label, Color::from_hex(hex).unwrap_or_default())
            })
            .collect();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            sections,
        }
    }

    pub fn section_list(&self) -> Result<SectionList, WheelError> {
        SectionList::new(self.sections.clone())
    }

    /// Case-insensitive match on name or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

const RED: &str = "#f87171";
const GREEN: &str = "#4ade80";
const BLUE: &str = "#60a5fa";
const AMBER: &str = "#fbbf24";
const VIOLET: &str = "#a78bfa";
const PINK: &str = "#f472b6";
const EMERALD: &str = "#34d399";

/// The template catalog, in display order.
pub fn catalog() -> Vec<Template> {
    let roulette: Vec<(String, &str)> = (1..=36)
        .map(|n| (n.to_string(), if n % 2 == 1 { RED } else { "#000000" }))
        .collect();
    let roulette: Vec<(&str, &str)> = roulette.iter().map(|(l, c)| (l.as_str(), *c)).collect();

    vec![
        Template::new(
            "yes-no",
            "Yes or No",
            "A simple wheel for yes/no decisions",
            &[("Yes", GREEN), ("No", RED)],
        ),
        Template::new(
            "name-picker",
            "Name Picker",
            "Pick a random name from a group",
            &[("John", BLUE), ("Sarah", PINK), ("Mike", EMERALD), ("Emma", VIOLET), ("David", AMBER)],
        ),
        Template::new(
            "magic-eight",
            "Magic Eight Ball",
            "Get answers to your questions",
            &[
                ("Yes", GREEN),
                ("No", RED),
                ("Maybe", AMBER),
                ("Ask again", BLUE),
                ("Definitely", VIOLET),
                ("Not likely", PINK),
                ("Certainly", EMERALD),
                ("Cannot predict", "#94a3b8"),
            ],
        ),
        Template::new("roulette", "Roulette", "Classic roulette wheel with numbers", &roulette),
        Template::new(
            "truth-dare",
            "Truth or Dare",
            "Fun party game wheel",
            &[("Truth", BLUE), ("Dare", RED), ("Truth", BLUE), ("Dare", RED)],
        ),
        Template::new(
            "dinner",
            "Dinner Ideas",
            "Can't decide what to eat?",
            &[
                ("Pizza", RED),
                ("Sushi", BLUE),
                ("Burgers", AMBER),
                ("Pasta", VIOLET),
                ("Salad", GREEN),
                ("Tacos", PINK),
            ],
        ),
    ]
}

pub fn find(id: &str) -> Option<Template> {
    catalog().into_iter().find(|t| t.id == id)
}

/// Templates whose name or description contains `term`.
pub fn search(term: &str) -> Vec<Template> {
    catalog().into_iter().filter(|t| t.matches(term)).collect()
}

/// Hand a template to the editor page.
pub fn stash_template(store: &mut dyn KeyValueStore, template: &Template) -> Result<(), WheelError> {
    save_json(store, CURRENT_TEMPLATE_KEY, template)
}

/// Take the template handed over by the catalog, if any. It is removed from
/// storage either way; an unreadable one is logged and dropped.
pub fn take_stashed_template(store: &mut dyn KeyValueStore) -> Option<Template> {
    let loaded = load_json::<Template>(store, CURRENT_TEMPLATE_KEY);
    if let Err(err) = store.remove(CURRENT_TEMPLATE_KEY) {
        log::warn!("could not clear `{CURRENT_TEMPLATE_KEY}`: {err}");
    }
    match loaded {
        Ok(template) => template,
        Err(err) => {
            log::warn!("ignoring stashed template: {err}");
            None
        }
    }
}

/// A wheel the user saved from the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWheel {
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
}

/// Saved wheels, oldest first. Missing or unreadable data reads as none.
pub fn saved_wheels(store: &dyn KeyValueStore) -> Vec<SavedWheel> {
    match load_json::<Vec<SavedWheel>>(store, SAVED_WHEELS_KEY) {
        Ok(wheels) => wheels.unwrap_or_default(),
        Err(err) => {
            log::warn!("ignoring saved wheels: {err}");
            Vec::new()
        }
    }
}

/// Append a wheel to the saved list. Its id is the save time in epoch millis.
pub fn save_wheel(
    store: &mut dyn KeyValueStore,
    name: &str,
    sections: &SectionList,
    now_ms: u64,
) -> Result<SavedWheel, WheelError> {
    let wheel = SavedWheel {
        id: now_ms.to_string(),
        name: name.to_string(),
        sections: sections.as_slice().to_vec(),
    };
    let mut wheels = saved_wheels(store);
    wheels.push(wheel.clone());
    save_json(store, SAVED_WHEELS_KEY, &wheels)?;
    log::info!("saved wheel `{name}` ({} sections)", sections.len());
    Ok(wheel)
}
