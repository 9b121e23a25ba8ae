use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;

use super::color::Color;
use crate::api::error::WheelError;

/// Minimum number of sections a wheel can be spun with.
pub const MIN_SECTIONS: usize = 2;

/// One labeled, colored arc of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique within a wheel.
    pub id: String,
    /// Stored templates from the web UI call this field `text`.
    #[serde(alias = "text")]
    pub label: String,
    pub color: Color,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
        }
    }

    /// Build a section from a hex color string.
    pub fn with_hex(
        id: impl Into<String>,
        label: impl Into<String>,
        hex: &str,
    ) -> Result<Self, WheelError> {
        Ok(Self::new(id, label, Color::from_hex(hex)?))
    }
}

/// A validated, read-only section list: at least two sections, unique ids.
///
/// The only way to get one is through [`SectionList::new`] (or
/// deserialization, which runs the same checks), so anything that accepts a
/// `&SectionList` can spin without re-validating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionList {
    sections: Vec<Section>,
}

impl SectionList {
    pub fn new(sections: Vec<Section>) -> Result<Self, WheelError> {
        if sections.len() < MIN_SECTIONS {
            return Err(WheelError::TooFewSections {
                count: sections.len(),
            });
        }

        let mut seen = HashSet::with_capacity(sections.len());
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(WheelError::DuplicateSectionId(section.id.clone()));
            }
        }

        Ok(Self { sections })
    }

    /// The two-section decision wheel: "Yes" then "No".
    pub fn yes_no() -> Self {
        Self::from_trusted(vec![
            Section::new("1", "Yes", Color::rgba8(0x4a, 0xde, 0x80, 0xff)),
            Section::new("2", "No", Color::rgba8(0xf8, 0x71, 0x71, 0xff)),
        ])
    }

    /// For lists built from known-good literals. Checked in debug builds only.
    pub(crate) fn from_trusted(sections: Vec<Section>) -> Self {
        debug_assert!(Self::new(sections.clone()).is_ok(), "invalid built-in section list");
        Self { sections }
    }

    /// Parse and validate a JSON array of sections.
    pub fn from_json(json: &str) -> Result<Self, WheelError> {
        let sections: Vec<Section> = serde_json::from_str(json)?;
        Self::new(sections)
    }

    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_inner(self) -> Vec<Section> {
        self.sections
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|s| s.label.as_str())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }
}

impl Deref for SectionList {
    type Target = [Section];

    fn deref(&self) -> &Self::Target {
        &self.sections
    }
}

impl TryFrom<Vec<Section>> for SectionList {
    type Error = WheelError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        Self::new(sections)
    }
}

impl From<SectionList> for Vec<Section> {
    fn from(list: SectionList) -> Self {
        list.sections
    }
}
