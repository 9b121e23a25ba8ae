use serde::{Deserialize, Serialize};

/// Entries kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// One answered question. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    /// Epoch milliseconds.
    pub timestamp: u64,
}

/// Bounded, most-recent-first answer log.
///
/// Serializes as a plain JSON array of entries, the format kept in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Build from stored entries, keeping the first `capacity` of them.
    pub fn from_entries(mut entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// Parse a stored JSON array. Corrupt data yields an empty history.
    pub fn from_json_lossy(json: &str, capacity: usize) -> Self {
        match serde_json::from_str::<Vec<HistoryEntry>>(json) {
            Ok(entries) => Self::from_entries(entries, capacity),
            Err(err) => {
                log::warn!("discarding corrupt history: {err}");
                Self::new(capacity)
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Prepend `entry`, dropping the oldest entry past capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
