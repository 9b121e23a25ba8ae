use web_sys::Storage;
use wheel_engine::{KeyValueStore, WheelError};

/// [`KeyValueStore`] over `window.localStorage`.
///
/// Storage can be missing (private browsing, disabled cookies); every call
/// then fails with [`WheelError::Storage`] and the host layer carries on
/// without persistence.
#[derive(Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage, WheelError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| WheelError::Storage("localStorage unavailable".into()))
    }
}

fn js_err(action: &str, key: &str, err: wasm_bindgen::JsValue) -> WheelError {
    WheelError::Storage(format!("{action} `{key}` failed: {err:?}"))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, WheelError> {
        self.storage()?.get_item(key).map_err(|e| js_err("get", key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WheelError> {
        self.storage()?.set_item(key, value).map_err(|e| js_err("set", key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), WheelError> {
        self.storage()?.remove_item(key).map_err(|e| js_err("remove", key, e))
    }
}
