//! Reading and writing the persisted parts of navigation state.
//!
//! Only the visited set and the theme survive a restart. Reads happen once at
//! startup and never fail: absent, unreadable, or malformed values fall back
//! to an empty visited set and the dark theme.

use super::ThemeMode;
use crate::store::{KeyValueStore, StoreError};
use indexmap::IndexSet;

/// Store key holding the visited ids as a JSON list of strings.
pub const VISITED_KEY: &str = "studymd-visited";
/// Store key holding `"dark"` or `"light"`.
pub const THEME_KEY: &str = "studymd-theme";

/// State seeded from the store at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub visited: IndexSet<String>,
    pub theme: ThemeMode,
}

pub fn load(store: &impl KeyValueStore) -> PersistedState {
    PersistedState {
        visited: load_visited(store),
        theme: load_theme(store),
    }
}

fn load_visited(store: &impl KeyValueStore) -> IndexSet<String> {
    let Some(raw) = store.get(VISITED_KEY) else {
        return IndexSet::new();
    };

    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(key = VISITED_KEY, error = %e, "ignoring malformed visited list");
            IndexSet::new()
        }
    }
}

fn load_theme(store: &impl KeyValueStore) -> ThemeMode {
    match store.get(THEME_KEY) {
        Some(raw) => ThemeMode::from_stored(&raw).unwrap_or_else(|| {
            tracing::warn!(key = THEME_KEY, value = %raw, "unknown theme, using dark");
            ThemeMode::default()
        }),
        None => ThemeMode::default(),
    }
}

pub fn save_visited(
    store: &mut impl KeyValueStore,
    visited: &IndexSet<String>,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(visited)?;
    store.set(VISITED_KEY, &raw)
}

pub fn save_theme(store: &mut impl KeyValueStore, theme: ThemeMode) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let state = load(&MemoryStore::new());
        assert!(state.visited.is_empty());
        assert_eq!(state.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_dark() {
        let store = MemoryStore::with_values([(THEME_KEY, "banana")]);
        assert_eq!(load(&store).theme, ThemeMode::Dark);
    }

    #[test]
    fn test_theme_values_are_case_sensitive() {
        let store = MemoryStore::with_values([(THEME_KEY, "Light")]);
        assert_eq!(load(&store).theme, ThemeMode::Dark);

        let store = MemoryStore::with_values([(THEME_KEY, "light")]);
        assert_eq!(load(&store).theme, ThemeMode::Light);
    }

    #[test]
    fn test_malformed_visited_falls_back_to_empty() {
        for raw in ["not json", "{\"a\": 1}", "[1, 2]", "\"section-1\""] {
            let store = MemoryStore::with_values([(VISITED_KEY, raw)]);
            assert!(load(&store).visited.is_empty(), "input: {raw}");
        }
    }

    #[test]
    fn test_visited_keeps_insertion_order() {
        let mut store = MemoryStore::new();
        let visited: IndexSet<String> = ["section-3", "intro", "section-1"]
            .into_iter()
            .map(String::from)
            .collect();

        save_visited(&mut store, &visited).unwrap();
        assert_eq!(
            store.get(VISITED_KEY).as_deref(),
            Some(r#"["section-3","intro","section-1"]"#)
        );
        assert_eq!(load(&store).visited, visited);
    }
}
