use super::history::{History, HistoryEntry};
use super::store::{log_failure, KeyValueStore};
use super::tally::Tally;

/// Question shown before the user types one.
pub const DEFAULT_QUESTION: &str = "Should I do it?";

/// State of one decision page: the question, the last answer, the answer
/// log and the scoreboard.
///
/// Persistence is best effort. Storage failures are logged and the session
/// keeps working from memory.
#[derive(Debug, Clone)]
pub struct DecisionSession {
    question: String,
    winner: Option<String>,
    history: History,
    tally: Tally,
    /// `None` keeps the session in memory only.
    history_key: Option<String>,
}

impl DecisionSession {
    pub fn new(capacity: usize, history_key: Option<String>) -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            winner: None,
            history: History::new(capacity),
            tally: Tally::new(),
            history_key,
        }
    }

    /// Always list these labels on the scoreboard.
    pub fn with_tally_labels<'a>(mut self, labels: impl IntoIterator<Item = &'a str>) -> Self {
        self.tally = Tally::with_labels(labels);
        self.tally.rebuild(&self.history);
        self
    }

    /// Restore history from storage and rebuild the tally from it.
    pub fn load(&mut self, store: &dyn KeyValueStore) {
        let Some(key) = &self.history_key else {
            return;
        };
        let capacity = self.history.capacity();
        self.history = match store.get(key) {
            Ok(Some(raw)) => History::from_json_lossy(&raw, capacity),
            Ok(None) => History::new(capacity),
            Err(err) => {
                log::warn!("history unavailable, starting empty: {err}");
                History::new(capacity)
            }
        };
        self.tally.rebuild(&self.history);
        log::debug!("loaded {} history entries from `{key}`", self.history.len());
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// The answer to show, if the wheel is at rest on one.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// A spin started; the previous answer no longer applies.
    pub fn begin_spin(&mut self) {
        self.winner = None;
    }

    /// Show `label` as the answer without logging it.
    pub fn show_winner(&mut self, label: impl Into<String>) {
        self.winner = Some(label.into());
    }

    /// Record a completed spin: show it, count it, log it, persist the log.
    pub fn apply_outcome(
        &mut self,
        label: &str,
        timestamp: u64,
        store: &mut dyn KeyValueStore,
    ) -> HistoryEntry {
        let entry = HistoryEntry {
            question: self.question.clone(),
            answer: label.to_string(),
            timestamp,
        };
        self.winner = Some(label.to_string());
        self.tally.record(label);
        self.history.record(entry.clone());
        self.persist(store);
        entry
    }

    /// Manual scoreboard +/-, floored at zero. History is not touched.
    pub fn adjust_tally(&mut self, label: &str, delta: i32) -> u32 {
        self.tally.adjust(label, delta)
    }

    /// Clear history and counts, and the stored log.
    pub fn reset(&mut self, store: &mut dyn KeyValueStore) {
        self.history.clear();
        self.tally.reset();
        if let Some(key) = &self.history_key {
            log_failure("remove", key, store.remove(key));
        }
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        let Some(key) = &self.history_key else {
            return;
        };
        let result = self
            .history
            .to_json()
            .map_err(Into::into)
            .and_then(|json| store.set(key, &json));
        log_failure("save", key, result);
    }
}

impl Default for DecisionSession {
    fn default() -> Self {
        Self::new(super::history::DEFAULT_HISTORY_CAPACITY, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::store::{MemoryStore, HISTORY_KEY};

    fn yes_no_session() -> DecisionSession {
        DecisionSession::new(20, Some(HISTORY_KEY.into())).with_tally_labels(["Yes", "No"])
    }

    #[test]
    fn outcome_updates_everything() {
        let mut store = MemoryStore::new();
        let mut session = yes_no_session();
        session.set_question("Pizza tonight?");
        session.begin_spin();
        assert_eq!(session.winner(), None);

        let entry = session.apply_outcome("No", 42, &mut store);
        assert_eq!(entry.question, "Pizza tonight?");
        assert_eq!(session.winner(), Some("No"));
        assert_eq!(session.tally().count("No"), 1);
        assert_eq!(session.history().latest(), Some(&entry));

        let stored = store.get(HISTORY_KEY).unwrap().unwrap();
        assert!(stored.contains("\"answer\":\"No\""));
    }

    #[test]
    fn twenty_five_spins_keep_twenty() {
        let mut store = MemoryStore::new();
        let mut session = yes_no_session();
        for i in 0..25u64 {
            session.apply_outcome(if i % 3 == 0 { "Yes" } else { "No" }, i, &mut store);
        }
        assert_eq!(session.history().len(), 20);
        assert_eq!(session.history().latest().map(|e| e.timestamp), Some(24));
        // The tally counts every spin, not just the retained ones.
        assert_eq!(session.tally().total(), 25);

        let mut reloaded = yes_no_session();
        reloaded.load(&store);
        assert_eq!(reloaded.history().len(), 20);
        assert_eq!(reloaded.tally().total(), 20);
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "][").unwrap();
        let mut session = yes_no_session();
        session.load(&store);
        assert!(session.history().is_empty());
        assert_eq!(session.tally().count("Yes"), 0);
    }

    #[test]
    fn unavailable_storage_never_blocks() {
        let mut store = MemoryStore::unavailable();
        let mut session = yes_no_session();
        session.load(&store);
        session.apply_outcome("Yes", 1, &mut store);
        assert_eq!(session.history().len(), 1);
        session.reset(&mut store);
        assert!(session.history().is_empty());
    }

    #[test]
    fn reset_clears_store_and_counts() {
        let mut store = MemoryStore::new();
        let mut session = yes_no_session();
        session.apply_outcome("Yes", 1, &mut store);
        session.adjust_tally("No", 3);
        session.reset(&mut store);
        assert_eq!(session.tally().total(), 0);
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn memory_only_session_skips_storage() {
        let mut store = MemoryStore::new();
        let mut session = DecisionSession::default();
        session.apply_outcome("Pizza", 1, &mut store);
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
        assert_eq!(session.question(), DEFAULT_QUESTION);
    }
}
