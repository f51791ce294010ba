//! Customizable keybindings for studymd
//!
//! - [`Action`] - All bindable actions in the application
//! - [`KeybindingMode`] - Different modes with their own keybinding sets
//! - [`Keybindings`] - The complete keybinding configuration (backed by keybinds-rs)
//!
//! # Configuration
//!
//! Keybindings are configured in TOML format, organized by mode:
//!
//! ```toml
//! [keybindings.Normal]
//! "n" = "Next"
//! "p" = "Previous"
//! "g t" = "ToggleTheme"  # Multi-key sequences supported!
//!
//! [keybindings.Search]
//! "Ctrl+w" = "ClearSearch"
//! ```
//!
//! Search mode only binds control keys: printable characters always go to the
//! search input and never trigger navigation.

mod action;
mod defaults;

pub use action::Action;

use crossterm::event::KeyEvent;
use keybinds::Keybinds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Application modes that have their own keybinding sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeybindingMode {
    /// Section navigation
    Normal,
    /// Typing into the search input
    Search,
    /// Help popup is shown
    Help,
}

impl KeybindingMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            KeybindingMode::Normal => "Normal",
            KeybindingMode::Search => "Search",
            KeybindingMode::Help => "Help",
        }
    }
}

/// Mode-indexed keymap.
#[derive(Debug)]
pub struct Keybindings {
    bindings: HashMap<KeybindingMode, Keybinds<Action>>,
}

impl Default for Keybindings {
    fn default() -> Self {
        defaults::default_keybindings()
    }
}

impl Keybindings {
    /// Create empty keybindings
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Resolve a key event in `mode`. Returns `None` for unbound keys and for
    /// the first keys of an unfinished sequence.
    pub fn dispatch(&mut self, mode: KeybindingMode, event: KeyEvent) -> Option<Action> {
        self.bindings
            .get_mut(&mode)
            .and_then(|kb| kb.dispatch(event).copied())
    }

    /// Drop half-typed sequences (call when switching modes)
    pub fn reset_sequences(&mut self) {
        for kb in self.bindings.values_mut() {
            kb.reset();
        }
    }

    pub fn bind(
        &mut self,
        mode: KeybindingMode,
        key_sequence: &str,
        action: Action,
    ) -> Result<(), keybinds::Error> {
        self.bindings
            .entry(mode)
            .or_default()
            .bind(key_sequence, action)
    }

    /// Display strings of every key bound to `action` in `mode`
    pub fn keys_for_action(&self, mode: KeybindingMode, action: Action) -> Vec<String> {
        self.bindings
            .get(&mode)
            .map(|kb| {
                kb.as_slice()
                    .iter()
                    .filter(|bind| bind.action == action)
                    .map(|bind| format_key_sequence(&bind.seq))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Help rows for a mode, grouped by category then description
    pub fn help_entries(&self, mode: KeybindingMode) -> Vec<(Action, Vec<String>)> {
        let mut action_keys: HashMap<Action, Vec<String>> = HashMap::new();

        if let Some(kb) = self.bindings.get(&mode) {
            for bind in kb.as_slice() {
                action_keys
                    .entry(bind.action)
                    .or_default()
                    .push(format_key_sequence(&bind.seq));
            }
        }

        let mut entries: Vec<_> = action_keys.into_iter().collect();
        entries.sort_by(|a, b| {
            a.0.category()
                .cmp(b.0.category())
                .then(a.0.description().cmp(b.0.description()))
        });
        entries
    }

    /// Apply user overrides on top of the current bindings.
    ///
    /// Every valid entry is applied; invalid key strings are collected and
    /// returned so the caller can report them.
    pub fn merge(&mut self, other: &KeybindingsConfig) -> Vec<String> {
        let mut invalid = Vec::new();
        for (mode, mode_bindings) in &other.0 {
            for (key_str, action) in mode_bindings {
                if let Err(e) = self.bind(*mode, key_str, *action) {
                    invalid.push(format!(
                        "{} key '{}': {}",
                        mode.display_name(),
                        key_str,
                        e
                    ));
                }
            }
        }
        invalid
    }
}

fn format_key_sequence(seq: &keybinds::KeySeq) -> String {
    seq.as_slice()
        .iter()
        .map(format_key_input)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_key_input(input: &keybinds::KeyInput) -> String {
    let mods = input.mods();
    let mut out = String::new();
    if mods.contains(keybinds::Mods::CTRL) {
        out.push_str("C-");
    }
    if mods.contains(keybinds::Mods::ALT) {
        out.push_str("A-");
    }
    if mods.contains(keybinds::Mods::SHIFT) {
        out.push_str("S-");
    }
    out.push_str(&format_key(input.key()));
    out
}

fn format_key(key: keybinds::Key) -> String {
    use keybinds::Key;
    let name = match key {
        Key::Char(' ') => "Spc",
        Key::Char(c) => return c.to_string(),
        Key::Enter => "Ret",
        Key::Esc => "Esc",
        Key::Tab => "Tab",
        Key::Backspace => "BS",
        Key::Delete => "Del",
        Key::Up => "↑",
        Key::Down => "↓",
        Key::Left => "←",
        Key::Right => "→",
        Key::PageUp => "PgU",
        Key::PageDown => "PgD",
        Key::Home => "Home",
        Key::End => "End",
        _ => "?",
    };
    name.to_string()
}

/// Configuration format for keybindings (uses string keys for TOML compatibility)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeybindingsConfig(pub HashMap<KeybindingMode, HashMap<String, Action>>);

impl KeybindingsConfig {
    /// Defaults with the user's overrides applied. Invalid keys are logged
    /// and skipped.
    pub fn to_keybindings(&self) -> Keybindings {
        let mut keybindings = Keybindings::default();
        for problem in keybindings.merge(self) {
            tracing::warn!("ignoring keybinding: {}", problem);
        }
        keybindings
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
