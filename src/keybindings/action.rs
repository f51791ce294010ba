//! Action definitions for keybindings
//!
//! This module defines all bindable actions in studymd.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// All bindable actions in studymd
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum Action {
    // === Navigation ===
    /// Select the next section in the filtered list
    Next,
    /// Select the previous section in the filtered list
    Previous,

    // === Content ===
    /// Scroll content down one line
    ScrollDown,
    /// Scroll content up one line
    ScrollUp,
    /// Scroll content down by page
    PageDown,
    /// Scroll content up by page
    PageUp,

    // === Search ===
    /// Move focus to the search input
    FocusSearch,
    /// Leave the search input, keeping the filter
    ConfirmSearch,
    /// Leave the search input and clear the filter
    CancelSearch,
    /// Clear the search query
    ClearSearch,
    /// Delete last character in search
    SearchBackspace,

    // === View ===
    /// Switch between dark and light
    ToggleTheme,
    /// Show or hide the section sidebar
    ToggleSidebar,
    /// Toggle help popup
    ToggleHelp,
    /// Scroll help popup down
    HelpScrollDown,
    /// Scroll help popup up
    HelpScrollUp,

    // === Clipboard ===
    /// Copy the active section's content
    CopyContent,
    /// Copy the code block nearest the top of the content pane
    CopyCode,

    // === Application ===
    /// Quit the application
    Quit,
}

impl Action {
    /// Get a human-readable description of the action
    pub fn description(&self) -> &'static str {
        match self {
            Action::Next => "Next section",
            Action::Previous => "Previous section",

            Action::ScrollDown => "Scroll down",
            Action::ScrollUp => "Scroll up",
            Action::PageDown => "Page down",
            Action::PageUp => "Page up",

            Action::FocusSearch => "Search sections",
            Action::ConfirmSearch => "Keep filter",
            Action::CancelSearch => "Clear filter and close",
            Action::ClearSearch => "Clear query",
            Action::SearchBackspace => "Delete character",

            Action::ToggleTheme => "Toggle light/dark",
            Action::ToggleSidebar => "Toggle sidebar",
            Action::ToggleHelp => "Toggle help",
            Action::HelpScrollDown => "Scroll help down",
            Action::HelpScrollUp => "Scroll help up",

            Action::CopyContent => "Copy section",
            Action::CopyCode => "Copy code block",

            Action::Quit => "Quit",
        }
    }

    /// Get the category for grouping in help display
    pub fn category(&self) -> &'static str {
        match self {
            Action::Next | Action::Previous => "Navigation",

            Action::ScrollDown | Action::ScrollUp | Action::PageDown | Action::PageUp => "Content",

            Action::FocusSearch
            | Action::ConfirmSearch
            | Action::CancelSearch
            | Action::ClearSearch
            | Action::SearchBackspace => "Search",

            Action::ToggleTheme
            | Action::ToggleSidebar
            | Action::ToggleHelp
            | Action::HelpScrollDown
            | Action::HelpScrollUp => "View",

            Action::CopyContent | Action::CopyCode => "Clipboard",

            Action::Quit => "Application",
        }
    }
}
