//! Browser-local preferences: registered root folders, the tag filter and
//! the autoplay switch.

use std::cell::RefCell;
use std::collections::HashMap;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PrefsError;
use crate::filter::TagFilter;

pub const FOLDERS_KEY: &str = "folders";
pub const FILTER_TAGS_KEY: &str = "filterTags";
pub const AUTOPLAY_KEY: &str = "autoplay";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &'static str) -> T {
        match self.store.get(key) {
            None => T::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("ignoring unreadable `{}` in local storage: {}", key, e);
                T::default()
            }),
        }
    }

    fn write<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), PrefsError> {
        let raw = serde_json::to_string(value).map_err(|e| PrefsError::Encode { key, reason: e.to_string() })?;
        self.store.set(key, &raw).map_err(|reason| PrefsError::Storage { key, reason })
    }

    pub fn root_folders(&self) -> Vec<String> {
        self.read(FOLDERS_KEY)
    }

    pub fn add_root(&self, path: &str) -> Result<Vec<String>, PrefsError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PrefsError::EmptyPath);
        }
        let mut roots = self.root_folders();
        if roots.iter().any(|r| r == path) {
            return Err(PrefsError::DuplicateRoot(path.to_string()));
        }
        roots.push(path.to_string());
        self.write(FOLDERS_KEY, &roots)?;
        Ok(roots)
    }

    pub fn remove_root(&self, path: &str) -> Result<Vec<String>, PrefsError> {
        let mut roots = self.root_folders();
        roots.retain(|r| r != path);
        self.write(FOLDERS_KEY, &roots)?;
        Ok(roots)
    }

    pub fn tag_filter(&self) -> TagFilter {
        self.read(FILTER_TAGS_KEY)
    }

    /// An empty filter drops the key instead of storing `[]`.
    pub fn save_tag_filter(&self, filter: &TagFilter) -> Result<(), PrefsError> {
        if filter.is_empty() {
            self.store.remove(FILTER_TAGS_KEY);
            return Ok(());
        }
        self.write(FILTER_TAGS_KEY, filter)
    }

    pub fn autoplay(&self) -> bool {
        self.store.get(AUTOPLAY_KEY).map(|v| v.trim() == "true").unwrap_or(false)
    }

    pub fn set_autoplay(&self, enabled: bool) -> Result<(), PrefsError> {
        let value = if enabled { "true" } else { "false" };
        self.store
            .set(AUTOPLAY_KEY, value)
            .map_err(|reason| PrefsError::Storage { key: AUTOPLAY_KEY, reason })
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn roots_round_trip_and_reject_duplicates() {
        let prefs = Preferences::new(MemoryStore::default());
        assert!(prefs.root_folders().is_empty());
        prefs.add_root(" /courses ").unwrap();
        prefs.add_root("/talks").unwrap();
        assert_eq!(prefs.root_folders(), vec!["/courses", "/talks"]);
        assert_eq!(prefs.add_root("/courses"), Err(PrefsError::DuplicateRoot("/courses".into())));
        assert_eq!(prefs.add_root("  "), Err(PrefsError::EmptyPath));
        assert_eq!(prefs.remove_root("/courses").unwrap(), vec!["/talks"]);
        assert_eq!(prefs.store().get(FOLDERS_KEY).as_deref(), Some(r#"["/talks"]"#));
    }

    #[test]
    fn tag_filter_is_stored_as_plain_tag_list() {
        let prefs = Preferences::new(MemoryStore::default());
        let filter = TagFilter::new(vec![Tag { id: 3, name: "rust".into() }]);
        prefs.save_tag_filter(&filter).unwrap();
        assert_eq!(prefs.store().get(FILTER_TAGS_KEY).as_deref(), Some(r#"[{"id":3,"name":"rust"}]"#));
        assert_eq!(prefs.tag_filter(), filter);
    }

    #[test]
    fn clearing_the_filter_removes_the_entry() {
        let prefs = Preferences::new(MemoryStore::default());
        prefs.save_tag_filter(&TagFilter::new(vec![Tag { id: 3, name: "rust".into() }])).unwrap();
        prefs.save_tag_filter(&TagFilter::default()).unwrap();
        assert_eq!(prefs.store().get(FILTER_TAGS_KEY), None);
        assert!(prefs.tag_filter().is_empty());
    }

    #[test]
    fn corrupt_entries_read_as_empty() {
        let store = MemoryStore::default();
        store.set(FOLDERS_KEY, "{not json").unwrap();
        store.set(FILTER_TAGS_KEY, "42").unwrap();
        let prefs = Preferences::new(store);
        assert!(prefs.root_folders().is_empty());
        assert!(prefs.tag_filter().is_empty());
    }

    #[test]
    fn autoplay_flag() {
        let prefs = Preferences::new(MemoryStore::default());
        assert!(!prefs.autoplay());
        prefs.set_autoplay(true).unwrap();
        assert!(prefs.autoplay());
        assert_eq!(prefs.store().get(AUTOPLAY_KEY).as_deref(), Some("true"));
    }
}
