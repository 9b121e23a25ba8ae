//! Host-side state around the wheel: what the page shows and stores.
//! Plain reducers; nothing here knows about animation.

pub mod editor;
pub mod history;
pub mod session;
pub mod store;
pub mod tally;
pub mod templates;

pub use editor::SectionEditor;
pub use history::{now_millis, History, HistoryEntry, DEFAULT_HISTORY_CAPACITY};
pub use session::{DecisionSession, DEFAULT_QUESTION};
pub use store::{
    load_json, save_json, KeyValueStore, MemoryStore, CURRENT_TEMPLATE_KEY, HISTORY_KEY,
    SAVED_WHEELS_KEY,
};
pub use tally::Tally;
pub use templates::{SavedWheel, Template};
