use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const DARK_KEY: &str = "dark";
pub const USED_SETS_KEY: &str = "usedSets";
pub const LOG_ENTRIES_KEY: &str = "logEntries";
pub const MAP_STATE_KEY: &str = "mapState";
pub const ACTIVE_PLAYER_KEY: &str = "activePlayer";

/// Persistence port: named string values.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// In-process store, used in tests and wherever no browser storage exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Missing and malformed values both come back as `None`.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.load(key)?;
    serde_json::from_str(&raw).ok()
}

pub fn save_json<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        store.save(key, &raw);
    }
}

pub fn load_flag(store: &impl KeyValueStore, key: &str) -> bool {
    store.load(key).as_deref() == Some("1")
}

pub fn save_flag(store: &mut impl KeyValueStore, key: &str, value: bool) {
    store.save(key, if value { "1" } else { "0" });
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryStore, load_flag, load_json, save_flag, save_json};

    #[test]
    fn malformed_json_reads_as_absent() {
        let store = MemoryStore::new().with("mapState", "{not json");
        assert_eq!(load_json::<serde_json::Value>(&store, "mapState"), None);
        assert_eq!(load_json::<serde_json::Value>(&store, "missing"), None);
    }

    #[test]
    fn json_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "k", &vec![1, 2, 3]);
        assert_eq!(store.load("k").as_deref(), Some("[1,2,3]"));
        assert_eq!(load_json::<Vec<u8>>(&store, "k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn flags_are_zero_or_one() {
        let mut store = MemoryStore::new();
        assert!(!load_flag(&store, "dark"));
        save_flag(&mut store, "dark", true);
        assert_eq!(store.load("dark").as_deref(), Some("1"));
        assert!(load_flag(&store, "dark"));
        save_flag(&mut store, "dark", false);
        assert_eq!(store.load("dark").as_deref(), Some("0"));
    }
}
