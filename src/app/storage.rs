use gloo_storage::{LocalStorage, Storage};
use tracker_core::prefs::{KeyValueStore, Preferences};

/// `window.localStorage`, storing plain strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| format!("{:?}", e))
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

pub fn preferences() -> Preferences<BrowserStore> {
    Preferences::new(BrowserStore)
}
