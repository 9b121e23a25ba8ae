//! Best-effort key/value persistence.
//!
//! The browser implementation wraps `localStorage`; [`MemoryStore`] backs
//! native runs and tests. Callers treat every failure as "nothing stored":
//! losing history must never stop the wheel from spinning.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::WheelError;

/// Key of the Yes/No tool's answer history.
pub const HISTORY_KEY: &str = "yesNoHistory";
/// Key of the saved custom wheels.
pub const SAVED_WHEELS_KEY: &str = "savedWheels";
/// Key of the template handed from the catalog to the editor.
pub const CURRENT_TEMPLATE_KEY: &str = "currentTemplate";

/// String key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError>;
    fn remove(&mut self, key: &str) -> Result<(), WheelError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every call, like storage disabled by the browser.
    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), WheelError> {
        if self.unavailable {
            return Err(WheelError::Storage("memory store disabled".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError> {
        self.check()?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError> {
        self.check()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), WheelError> {
        self.check()?;
        self.values.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), WheelError> {
        (**self).remove(key)
    }
}

/// Read and parse a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, WheelError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), WheelError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Log a persistence failure and carry on.
pub(crate) fn log_failure(action: &str, key: &str, result: Result<(), WheelError>) {
    if let Err(err) = result {
        log::warn!("could not {action} `{key}`: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "k", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = load_json(&store, "k").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        store.remove("k").unwrap();
        assert_eq!(load_json::<Vec<i32>>(&store, "k").unwrap(), None);
    }

    #[test]
    fn parse_errors_surface_as_parse() {
        let mut store = MemoryStore::new();
        store.set("k", "[1,").unwrap();
        assert!(matches!(load_json::<Vec<i32>>(&store, "k"), Err(WheelError::Parse(_))));
    }

    #[test]
    fn unavailable_store_errors() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.get("k"), Err(WheelError::Storage(_))));
        assert!(store.set("k", "v").is_err());
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
