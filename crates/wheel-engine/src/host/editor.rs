use crate::api::error::WheelError;
use crate::core::color::Color;
use crate::core::palette::random_color;
use crate::core::section::{Section, SectionList, MIN_SECTIONS};

use super::templates::Template;

/// Editable section list behind the custom wheel.
///
/// Holds a list that always satisfies [`SectionList`]'s rules, so
/// [`SectionEditor::sections`] can be spun at any time.
#[derive(Debug, Clone)]
pub struct SectionEditor {
    name: String,
    sections: SectionList,
}

impl SectionEditor {
    pub fn new(name: impl Into<String>, sections: SectionList) -> Self {
        Self { name: name.into(), sections }
    }

    /// The editor's starting wheel: four options in fixed colors.
    pub fn starter() -> Self {
        let sections = [
            ("1", "Option 1", Color::rgba8(0xff, 0x57, 0x33, 0xff)),
            ("2", "Option 2", Color::rgba8(0x33, 0xff, 0x57, 0xff)),
            ("3", "Option 3", Color::rgba8(0x33, 0x57, 0xff, 0xff)),
            ("4", "Option 4", Color::rgba8(0xf3, 0xff, 0x33, 0xff)),
        ]
        .into_iter()
        .map(|(id, label, color)| Section::new(id, label, color))
        .collect();
        Self::new("My Wheel", SectionList::from_trusted(sections))
    }

    pub fn from_template(template: &Template) -> Result<Self, WheelError> {
        Ok(Self::new(template.name.clone(), SectionList::new(template.sections.clone())?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    /// Append `Option N` with a random palette color and a fresh id.
    pub fn add(&mut self, rng: &mut fastrand::Rng) -> &Section {
        let id = self.next_id();
        let section = Section::new(id.clone(), format!("Option {id}"), random_color(rng));
        let mut list = self.sections.as_slice().to_vec();
        list.push(section);
        self.replace(list);
        &self.sections[self.sections.len() - 1]
    }

    /// Change a section's label and color.
    pub fn update(&mut self, id: &str, label: impl Into<String>, color: Color) -> Result<(), WheelError> {
        let index = self
            .sections
            .position(id)
            .ok_or_else(|| WheelError::UnknownSection(id.to_string()))?;
        let mut list = self.sections.as_slice().to_vec();
        list[index].label = label.into();
        list[index].color = color;
        self.replace(list);
        Ok(())
    }

    /// Remove a section. Refused when it would leave fewer than two.
    pub fn remove(&mut self, id: &str) -> Result<Section, WheelError> {
        let index = self
            .sections
            .position(id)
            .ok_or_else(|| WheelError::UnknownSection(id.to_string()))?;
        if self.sections.len() <= MIN_SECTIONS {
            return Err(WheelError::TooFewSections {
                count: self.sections.len() - 1,
            });
        }
        let mut list = self.sections.as_slice().to_vec();
        let removed = list.remove(index);
        self.replace(list);
        Ok(removed)
    }

    /// One more than the largest numeric id in use. Ids that are not numbers
    /// are skipped.
    fn next_id(&self) -> String {
        let max = self
            .sections
            .iter()
            .filter_map(|s| s.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let taken = |n: u64| self.sections.position(&n.to_string()).is_some();
        match max.checked_add(1) {
            Some(next) if !taken(next) => next.to_string(),
            // Past the top of the range: reuse the lowest free number.
            _ => (1..=u64::MAX).find(|&n| !taken(n)).unwrap_or_default().to_string(),
        }
    }

    // Edits above keep ids unique and the count >= 2, so this cannot fail;
    // if it somehow does, keep the old list.
    fn replace(&mut self, list: Vec<Section>) {
        match SectionList::new(list) {
            Ok(sections) => self.sections = sections,
            Err(err) => log::error!("section edit rejected: {err}"),
        }
    }
}

impl Default for SectionEditor {
    fn default() -> Self {
        Self::starter()
    }
}
