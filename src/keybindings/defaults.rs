//! Default keybindings for studymd
//!
//! This module defines the default keybindings that are used when no
//! user configuration is provided. Uses keybinds-rs key string syntax.

use super::{Action, KeybindingMode, Keybindings};

/// Create the default keybindings configuration
pub fn default_keybindings() -> Keybindings {
    let mut kb = Keybindings::new();

    add_normal_mode(&mut kb);
    add_search_mode(&mut kb);
    add_help_mode(&mut kb);

    kb
}

/// Bind a key, panicking on invalid key syntax (only used for built-in defaults)
fn bind(kb: &mut Keybindings, mode: KeybindingMode, key: &str, action: Action) {
    kb.bind(mode, key, action)
        .unwrap_or_else(|e| panic!("Invalid default keybinding '{}': {}", key, e));
}

fn add_normal_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Normal;

    // Section navigation
    bind(kb, Normal, "j", Next);
    bind(kb, Normal, "Down", Next);
    bind(kb, Normal, "k", Previous);
    bind(kb, Normal, "Up", Previous);

    // Content scrolling
    bind(kb, Normal, "J", ScrollDown);
    bind(kb, Normal, "K", ScrollUp);
    bind(kb, Normal, "Ctrl+d", PageDown);
    bind(kb, Normal, "PageDown", PageDown);
    bind(kb, Normal, "Ctrl+u", PageUp);
    bind(kb, Normal, "PageUp", PageUp);

    // Search
    bind(kb, Normal, "/", FocusSearch);

    // View
    bind(kb, Normal, "t", ToggleTheme);
    bind(kb, Normal, "s", ToggleSidebar);
    bind(kb, Normal, "?", ToggleHelp);

    // Clipboard
    bind(kb, Normal, "y", CopyContent);
    bind(kb, Normal, "Y", CopyCode);

    // Application
    bind(kb, Normal, "q", Quit);
    bind(kb, Normal, "Ctrl+c", Quit);
}

fn add_search_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Search;

    bind(kb, Search, "Enter", ConfirmSearch);
    bind(kb, Search, "Escape", CancelSearch);
    bind(kb, Search, "Ctrl+u", ClearSearch);
    bind(kb, Search, "Backspace", SearchBackspace);

    // Arrow keys still step through the filtered list while typing
    bind(kb, Search, "Down", Next);
    bind(kb, Search, "Up", Previous);

    bind(kb, Search, "Ctrl+c", Quit);
}

fn add_help_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Help;

    bind(kb, Help, "?", ToggleHelp);
    bind(kb, Help, "Escape", ToggleHelp);
    bind(kb, Help, "j", HelpScrollDown);
    bind(kb, Help, "Down", HelpScrollDown);
    bind(kb, Help, "k", HelpScrollUp);
    bind(kb, Help, "Up", HelpScrollUp);
    bind(kb, Help, "q", Quit);
}
