use crate::keybindings::{Keybindings, KeybindingsConfig};
use crate::nav::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Header text when the guide has no `# Title` line
    #[serde(default = "default_title")]
    pub title: String,

    /// Sidebar width as a percentage of the screen
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,

    /// Show key hints in the status bar
    #[serde(default = "default_show_hints")]
    pub show_hints: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            sidebar_width: default_sidebar_width(),
            show_hints: default_show_hints(),
        }
    }
}

fn default_title() -> String {
    "Study Guide".to_string()
}

fn default_sidebar_width() -> u16 {
    30
}

fn default_show_hints() -> bool {
    true
}

/// Where visited sections and the theme are persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the state file (default: platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// syntect theme used in dark mode
    #[serde(default = "default_code_theme_dark")]
    pub code_theme_dark: String,

    /// syntect theme used in light mode
    #[serde(default = "default_code_theme_light")]
    pub code_theme_light: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            code_theme_dark: default_code_theme_dark(),
            code_theme_light: default_code_theme_light(),
        }
    }
}

fn default_code_theme_dark() -> String {
    "base16-ocean.dark".to_string()
}

fn default_code_theme_light() -> String {
    "InspiredGitHub".to_string()
}

impl Config {
    pub const MIN_SIDEBAR_WIDTH: u16 = 15;
    pub const MAX_SIDEBAR_WIDTH: u16 = 60;

    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/studymd/config.toml
    /// - Linux: ~/.config/studymd/config.toml
    /// - Windows: %APPDATA%/studymd/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studymd").join("config.toml"))
    }

    /// Load config from file, or return default if the file is missing or invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Sidebar width clamped to a usable range
    pub fn sidebar_width(&self) -> u16 {
        self.ui
            .sidebar_width
            .clamp(Self::MIN_SIDEBAR_WIDTH, Self::MAX_SIDEBAR_WIDTH)
    }

    /// syntect theme name for a light/dark mode
    pub fn code_theme(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Dark => &self.content.code_theme_dark,
            ThemeMode::Light => &self.content.code_theme_light,
        }
    }

    /// Get keybindings with user customizations applied
    pub fn keybindings(&self) -> Keybindings {
        self.keybindings.to_keybindings()
    }
}
