//! Navigation controller.
//!
//! [`Navigator`] owns the sections of the loaded guide plus the session state
//! (active id, visited set, search query, theme) and derives everything a
//! front end renders: the filtered list, the active section, and progress.
//!
//! Every operation succeeds. Persistence is a best-effort side channel: a
//! failed write is logged and kept for [`Navigator::take_store_error`], and
//! the in-memory transition that triggered it still happens.

pub mod persist;

use crate::parser::Section;
use crate::store::{KeyValueStore, StoreError};
use indexmap::IndexSet;
use strum::{Display, EnumString, IntoStaticStr};

pub use persist::{PersistedState, THEME_KEY, VISITED_KEY};

/// Direction of a keyboard step through the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Light/dark preference. Its string form is the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Parse a stored value. Only the exact strings `"dark"` and `"light"`
    /// are accepted.
    pub fn from_stored(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

/// Signal asking the front end to move input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    Search,
}

pub struct Navigator<S: KeyValueStore> {
    sections: Vec<Section>,
    active_id: String,
    visited: IndexSet<String>,
    search_query: String,
    theme: ThemeMode,
    store: S,
    visited_dirty: bool,
    store_error: Option<StoreError>,
}

impl<S: KeyValueStore> Navigator<S> {
    /// Create a navigator seeded from `store`. Nothing is selected yet.
    pub fn new(sections: Vec<Section>, store: S) -> Self {
        let PersistedState { visited, theme } = persist::load(&store);
        Self {
            sections,
            active_id: String::new(),
            visited,
            search_query: String::new(),
            theme,
            store,
            visited_dirty: false,
            store_error: None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- search ----

    /// Replace the query verbatim. Trimming only happens when filtering.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Sections whose title or content contains the trimmed query,
    /// case-insensitively, in document order. A blank query keeps everything.
    pub fn filtered_sections(&self) -> Vec<&Section> {
        let query = self.search_query.trim();
        if query.is_empty() {
            return self.sections.iter().collect();
        }
        let needle = query.to_lowercase();
        self.sections.iter().filter(|s| s.matches(&needle)).collect()
    }

    /// The front end decides what focusing the search input means.
    pub fn request_search_focus(&self) -> FocusRequest {
        FocusRequest::Search
    }

    // ---- selection ----

    /// Make `id` the active section and mark it visited.
    ///
    /// Ids are not checked against the document: an unknown id is recorded
    /// as active and visited, and [`Navigator::active_section`] returns
    /// `None` for it. An empty id clears the selection without touching the
    /// visited set.
    pub fn select_section(&mut self, id: &str) {
        self.active_id = id.to_string();
        if id.is_empty() {
            return;
        }

        let added = self.visited.insert(id.to_string());
        if added || self.visited_dirty {
            self.persist_visited();
        }
    }

    /// Select the first section of the document, if any.
    pub fn select_first(&mut self) {
        if let Some(id) = self.sections.first().map(|s| s.id.clone()) {
            self.select_section(&id);
        }
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// The active section looked up in the full list, so a search that hides
    /// it does not clear what is displayed.
    pub fn active_section(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == self.active_id)
    }

    /// Step one position through the filtered list.
    ///
    /// Returns `true` when the selection moved. Stepping past either end is a
    /// no-op; there is no wrap-around. When the active section is not in the
    /// filtered list, `Next` selects the first filtered section and
    /// `Previous` does nothing.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let target = {
            let filtered = self.filtered_sections();
            let current = filtered.iter().position(|s| s.id == self.active_id);
            let index = match (direction, current) {
                (Direction::Next, Some(i)) => Some(i + 1),
                (Direction::Next, None) => Some(0),
                (Direction::Previous, Some(i)) => i.checked_sub(1),
                (Direction::Previous, None) => None,
            };
            index
                .and_then(|i| filtered.get(i))
                .map(|section| section.id.clone())
        };

        match target {
            Some(id) => {
                self.select_section(&id);
                true
            }
            None => false,
        }
    }

    // ---- visited / progress ----

    pub fn visited(&self) -> &IndexSet<String> {
        &self.visited
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    /// Number of visited ids that exist in the current document.
    pub fn visited_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| self.visited.contains(&s.id))
            .count()
    }

    /// Percentage (0–100, rounded half up) of sections that were visited.
    pub fn progress(&self) -> u8 {
        let total = self.sections.len();
        if total == 0 {
            return 0;
        }
        let visited = self.visited_count();
        ((visited * 200 + total) / (total * 2)) as u8
    }

    // ---- theme ----

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        if let Err(e) = persist::save_theme(&mut self.store, theme) {
            tracing::warn!(error = %e, "failed to persist theme");
            self.store_error = Some(e);
        }
    }

    // ---- reload ----

    /// Swap in freshly parsed sections, keeping all session state.
    ///
    /// The active id is kept even if the new document no longer contains it.
    pub fn replace_sections(&mut self, sections: Vec<Section>) {
        tracing::debug!(
            before = self.sections.len(),
            after = sections.len(),
            "replacing sections"
        );
        self.sections = sections;
    }

    /// Take the most recent persistence failure, if any.
    pub fn take_store_error(&mut self) -> Option<StoreError> {
        self.store_error.take()
    }

    fn persist_visited(&mut self) {
        match persist::save_visited(&mut self.store, &self.visited) {
            Ok(()) => {
                self.visited_dirty = false;
                tracing::debug!(count = self.visited.len(), "saved visited sections");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist visited sections");
                self.visited_dirty = true;
                self.store_error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn sections() -> Vec<Section> {
        vec![
            Section::new("intro", "Overview", "How to use this guide."),
            Section::numbered("1", "Graphs", "BFS and dfs traversal."),
            Section::numbered("2", "Caching", "LRU eviction."),
            Section::numbered("3", "Graph Databases", "Neo4j notes."),
        ]
    }

    fn navigator() -> Navigator<MemoryStore> {
        Navigator::new(sections(), MemoryStore::new())
    }

    fn filtered_ids<S: KeyValueStore>(nav: &Navigator<S>) -> Vec<&str> {
        nav.filtered_sections()
            .into_iter()
            .map(|s| s.id.as_str())
            .collect()
    }

    #[test]
    fn test_new_starts_unselected() {
        let nav = navigator();
        assert_eq!(nav.active_id(), "");
        assert!(nav.active_section().is_none());
        assert!(nav.visited().is_empty());
        assert_eq!(nav.theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_select_first() {
        let mut nav = navigator();
        nav.select_first();
        assert_eq!(nav.active_id(), "intro");
        assert!(nav.is_visited("intro"));
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let mut nav = navigator();
        nav.set_search_query("   ");
        assert_eq!(nav.search_query(), "   ");
        assert_eq!(nav.filtered_sections().len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut nav = navigator();
        nav.set_search_query("DFS");
        assert_eq!(filtered_ids(&nav), vec!["section-1"]);

        nav.set_search_query("  graph ");
        assert_eq!(filtered_ids(&nav), vec!["section-1", "section-3"]);
    }

    #[test]
    fn test_no_match_keeps_active_section() {
        let mut nav = navigator();
        nav.select_section("section-2");
        nav.set_search_query("zzz-nomatch");

        assert!(nav.filtered_sections().is_empty());
        assert_eq!(nav.active_section().map(|s| s.id.as_str()), Some("section-2"));
    }

    #[test]
    fn test_select_marks_visited_and_persists() {
        let mut nav = navigator();
        nav.select_section("section-2");
        nav.select_section("intro");

        assert_eq!(
            nav.store().get(VISITED_KEY).as_deref(),
            Some(r#"["section-2","intro"]"#)
        );
    }

    #[test]
    fn test_repeated_select_does_not_grow_visited() {
        let mut nav = navigator();
        nav.select_section("section-1");
        let progress = nav.progress();
        nav.select_section("section-1");

        assert_eq!(nav.visited().len(), 1);
        assert_eq!(nav.progress(), progress);
    }

    #[test]
    fn test_unknown_id_is_accepted() {
        let mut nav = navigator();
        nav.select_section("section-99");

        assert_eq!(nav.active_id(), "section-99");
        assert!(nav.active_section().is_none());
        assert!(nav.is_visited("section-99"));
        // Unknown ids never count toward progress.
        assert_eq!(nav.visited_count(), 0);
        assert_eq!(nav.progress(), 0);
    }

    #[test]
    fn test_empty_id_clears_selection_only() {
        let mut nav = navigator();
        nav.select_section("intro");
        nav.select_section("");

        assert_eq!(nav.active_id(), "");
        assert_eq!(nav.visited().len(), 1);
    }

    #[test]
    fn test_navigate_through_filtered_list() {
        let mut nav = navigator();
        nav.set_search_query("graph");
        nav.select_section("section-1");

        assert!(nav.navigate(Direction::Next));
        assert_eq!(nav.active_id(), "section-3");
        assert!(nav.is_visited("section-3"));
        assert!(!nav.is_visited("section-2"));
    }

    #[test]
    fn test_navigate_next_at_end_is_noop() {
        let mut nav = navigator();
        nav.set_search_query("a");
        assert_eq!(
            filtered_ids(&nav),
            vec!["section-1", "section-2", "section-3"]
        );
        nav.select_section("section-3");
        let visited_before = nav.visited().len();

        assert!(!nav.navigate(Direction::Next));
        assert_eq!(nav.active_id(), "section-3");
        assert_eq!(nav.visited().len(), visited_before);
    }

    #[test]
    fn test_navigate_previous_at_start_is_noop() {
        let mut nav = navigator();
        nav.select_section("intro");
        assert!(!nav.navigate(Direction::Previous));
        assert_eq!(nav.active_id(), "intro");
    }

    #[test]
    fn test_navigate_when_active_is_filtered_out() {
        let mut nav = navigator();
        nav.select_section("section-2");
        nav.set_search_query("graph");

        assert!(!nav.navigate(Direction::Previous));
        assert_eq!(nav.active_id(), "section-2");

        assert!(nav.navigate(Direction::Next));
        assert_eq!(nav.active_id(), "section-1");
    }

    #[test]
    fn test_navigate_with_empty_filter_is_noop() {
        let mut nav = navigator();
        nav.set_search_query("zzz-nomatch");
        assert!(!nav.navigate(Direction::Next));
        assert!(!nav.navigate(Direction::Previous));
        assert_eq!(nav.active_id(), "");
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn test_progress_rounds_to_nearest() {
        let mut nav = Navigator::new(
            vec![
                Section::numbered("1", "A", "a"),
                Section::numbered("2", "B", "b"),
                Section::numbered("3", "C", "c"),
            ],
            MemoryStore::new(),
        );
        assert_eq!(nav.progress(), 0);
        nav.select_section("section-1");
        assert_eq!(nav.progress(), 33);
        nav.select_section("section-2");
        assert_eq!(nav.progress(), 67);
        nav.select_section("section-3");
        assert_eq!(nav.progress(), 100);
    }

    #[test]
    fn test_progress_without_sections_is_zero() {
        let mut nav = Navigator::new(Vec::new(), MemoryStore::new());
        nav.select_section("intro");
        assert_eq!(nav.progress(), 0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut nav = navigator();
        let mut last = nav.progress();
        for id in ["section-2", "section-2", "bogus", "intro", "section-3", "intro"] {
            nav.select_section(id);
            assert!(nav.progress() >= last);
            last = nav.progress();
        }
    }

    #[test]
    fn test_visited_seeded_from_store() {
        let store = MemoryStore::with_values([(VISITED_KEY, r#"["intro","section-2"]"#)]);
        let nav = Navigator::new(sections(), store);
        assert_eq!(nav.visited_count(), 2);
        assert_eq!(nav.progress(), 50);
    }

    #[test]
    fn test_theme_seeded_and_toggled() {
        let store = MemoryStore::with_values([(THEME_KEY, "banana")]);
        let mut nav = Navigator::new(sections(), store);
        assert_eq!(nav.theme(), ThemeMode::Dark);

        nav.toggle_theme();
        assert_eq!(nav.theme(), ThemeMode::Light);
        assert_eq!(nav.store().get(THEME_KEY).as_deref(), Some("light"));

        nav.toggle_theme();
        assert_eq!(nav.store().get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_write_failure_keeps_in_memory_state() {
        let mut nav = Navigator::new(sections(), MemoryStore::new().read_only());

        nav.select_section("section-1");
        assert_eq!(nav.active_id(), "section-1");
        assert!(nav.is_visited("section-1"));
        assert!(matches!(
            nav.take_store_error(),
            Some(StoreError::Unavailable)
        ));
        assert!(nav.take_store_error().is_none());

        nav.toggle_theme();
        assert_eq!(nav.theme(), ThemeMode::Light);
        assert!(nav.take_store_error().is_some());
    }

    #[test]
    fn test_replace_sections_keeps_session_state() {
        let mut nav = navigator();
        nav.select_section("section-3");
        nav.set_search_query("graph");

        nav.replace_sections(vec![Section::numbered("1", "Graphs", "new body")]);

        assert_eq!(nav.active_id(), "section-3");
        assert!(nav.active_section().is_none());
        assert_eq!(nav.search_query(), "graph");
        assert!(nav.is_visited("section-3"));
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn test_theme_mode_strings() {
        assert_eq!(ThemeMode::Light.as_str(), "light");
        assert_eq!(ThemeMode::Dark.to_string(), ThemeMode::Dark.as_str());
        assert_eq!(ThemeMode::from_stored("light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::from_stored("DARK"), None);
        assert_eq!(ThemeMode::from_stored("banana"), None);
    }
}
