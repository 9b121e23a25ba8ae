use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::history::History;

/// Per-answer counts for the scoreboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally {
    counts: BTreeMap<String, u32>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally that always lists `labels`, even at zero.
    pub fn with_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let counts = labels.into_iter().map(|l| (l.to_string(), 0)).collect();
        Self { counts }
    }

    /// Recount from a history log, keeping any labels already listed.
    pub fn rebuild(&mut self, history: &History) {
        self.counts.values_mut().for_each(|c| *c = 0);
        for entry in history.entries() {
            self.record(&entry.answer);
        }
    }

    /// Count one completed spin.
    pub fn record(&mut self, label: &str) {
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Manual scoreboard adjustment, floored at zero.
    pub fn adjust(&mut self, label: &str, delta: i32) -> u32 {
        let count = self.counts.entry(label.to_string()).or_insert(0);
        *count = (*count as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32;
        *count
    }

    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Share of `label`, rounded to a whole percent. Zero when nothing is counted.
    pub fn percentage(&self, label: &str) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (self.count(label) as f64 * 100.0 / total as f64).round() as u32
    }

    /// Zero every count, keeping the labels.
    pub fn reset(&mut self) {
        self.counts.values_mut().for_each(|c| *c = 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
