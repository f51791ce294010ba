use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use studymd::nav::ThemeMode;

#[cfg(feature = "unstable-dynamic")]
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate, ValueCompleter};

#[derive(Parser, Debug)]
#[command(name = "studymd")]
#[command(version)]
#[command(about = "A terminal study-guide viewer with search and progress tracking")]
#[command(
    long_about = "studymd - Read a long markdown study guide one numbered section at a time.\n\n\
    The guide is split at `## <n>. Title` headings (plus a single `## Quick Reference`).\n\
    Sections you open are remembered between sessions, and the light/dark choice sticks.\n\n\
    Examples:\n  \
    studymd guide.md                    # Interactive TUI\n  \
    studymd -l guide.md                 # List sections with visited markers\n  \
    studymd -l --search graph guide.md  # Only sections mentioning \"graph\"\n  \
    studymd -s section-3 guide.md       # Print one section\n  \
    studymd -p guide.md                 # Show progress"
)]
pub struct Cli {
    /// Study guide to open (.md or .markdown)
    #[arg(add = markdown_file_completer())]
    pub file: PathBuf,

    /// List sections instead of opening the TUI
    ///
    /// Each line shows a visited marker (✓ or ○), the section id, and its title.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Print the section list as JSON (with --list)
    #[arg(long = "json", requires = "list")]
    pub json: bool,

    /// Filter sections by a case-insensitive substring of title or content
    ///
    /// With --list, only matching sections are printed. In the TUI the
    /// search box starts with this query.
    #[arg(long = "search", value_name = "QUERY")]
    pub search: Option<String>,

    /// Print the content of one section by id and mark it visited
    ///
    /// Ids are `intro`, `section-<n>` and `quick-ref`. Exits with status 1
    /// when the id does not exist.
    #[arg(short = 's', long = "section", value_name = "ID")]
    pub section: Option<String>,

    /// Print how many sections have been visited
    #[arg(short = 'p', long = "progress")]
    pub progress: bool,

    /// Set and remember the color theme
    #[arg(long = "theme", value_name = "THEME")]
    pub theme: Option<ThemeArg>,

    /// State file for visited sections and theme
    ///
    /// Overrides `storage.state_file` from the config file.
    #[arg(long = "state-file", value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether to launch the TUI (no output-only flag was given).
    pub fn is_interactive(&self) -> bool {
        !self.list && self.section.is_none() && !self.progress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::Light => ThemeMode::Light,
        }
    }
}

#[cfg(feature = "unstable-dynamic")]
fn markdown_file_completer() -> ArgValueCompleter {
    use std::ffi::OsStr;
    use std::path::Path;

    struct MarkdownCompleter;

    impl ValueCompleter for MarkdownCompleter {
        fn complete(&self, current: &OsStr) -> Vec<CompletionCandidate> {
            let input = current.to_string_lossy();
            let input_path = Path::new(input.as_ref());

            // "docs/gu" completes inside "docs" with prefix "gu"; "docs/" lists "docs".
            let (dir, prefix) = if input.is_empty() {
                (Path::new("."), String::new())
            } else if input.ends_with('/') || input.ends_with('\\') {
                (input_path, String::new())
            } else {
                let parent = input_path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                let prefix = input_path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                (parent, prefix)
            };

            let Ok(entries) = std::fs::read_dir(dir) else {
                return vec![];
            };

            entries
                .filter_map(Result::ok)
                .filter_map(|entry| {
                    let path = entry.path();
                    let name = path.file_name()?.to_string_lossy().to_string();
                    if !name.to_lowercase().starts_with(&prefix) {
                        return None;
                    }

                    let value = if dir == Path::new(".") {
                        name
                    } else {
                        dir.join(&name).to_string_lossy().to_string()
                    };

                    if path.is_dir() {
                        return Some(
                            CompletionCandidate::new(format!("{}/", value.trim_end_matches('/')))
                                .help(Some("directory".into())),
                        );
                    }

                    let ext = path.extension()?.to_string_lossy().to_lowercase();
                    (ext == "md" || ext == "markdown").then(|| CompletionCandidate::new(value))
                })
                .collect()
        }
    }

    ArgValueCompleter::new(MarkdownCompleter)
}

#[cfg(not(feature = "unstable-dynamic"))]
fn markdown_file_completer() -> clap::builder::ValueHint {
    clap::ValueHint::FilePath
}
