//! # studymd
//!
//! A study-guide viewer for long markdown documents.
//!
//! A guide is split into addressable sections at numbered `## <n>. Title`
//! headings, plus one `## Quick Reference` section and an optional overview
//! built from the text under the document title. A [`Navigator`] then tracks
//! the active section, the search filter, the visited set, and the light/dark
//! preference, persisting the last two through a [`store::KeyValueStore`].
//!
//! ## Example
//!
//! ```rust
//! use studymd::nav::{Direction, Navigator};
//! use studymd::parse_sections;
//! use studymd::store::MemoryStore;
//!
//! let guide = "\
//! ## Prep
//!
//! Read in order.
//!
//! ### 1. Arrays
//! Two pointers.
//!
//! ### 2. Graphs
//! DFS and BFS.
//! ";
//!
//! let sections = parse_sections(guide);
//! assert_eq!(sections[0].id, "intro");
//! assert_eq!(sections[2].title, "2. Graphs");
//!
//! let mut nav = Navigator::new(sections, MemoryStore::new());
//! nav.select_first();
//! nav.navigate(Direction::Next);
//! assert_eq!(nav.active_id(), "section-1");
//! assert_eq!(nav.progress(), 67);
//!
//! nav.set_search_query("dfs");
//! assert_eq!(nav.filtered_sections().len(), 1);
//! ```

/// User configuration loaded from `config.toml`.
pub mod config;

/// Mode-based, user-overridable keyboard shortcuts.
pub mod keybindings;

/// Navigation controller: selection, search, visited set, theme, progress.
pub mod nav;

/// Splits a study guide into sections.
pub mod parser;

/// String key-value persistence backends.
pub mod store;

/// Interactive terminal interface.
pub mod tui;

pub use config::Config;
pub use nav::{Direction, Navigator, ThemeMode};
pub use parser::{Guide, Section, parse_file, parse_guide, parse_sections};
pub use tui::App;
