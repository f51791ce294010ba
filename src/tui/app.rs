use crate::config::Config;
use crate::keybindings::{Action, KeybindingMode, Keybindings};
use crate::nav::{Direction, FocusRequest, Navigator, ThemeMode};
use crate::parser::{self, Guide, Section};
use crate::store::KeyValueStore;
use crate::tui::help_text;
use crate::tui::markdown::{CodeBlock, MarkdownRenderer, RenderedBody};
use crate::tui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Search,
    Help,
}

impl AppMode {
    fn keybinding_mode(self) -> KeybindingMode {
        match self {
            AppMode::Normal => KeybindingMode::Normal,
            AppMode::Search => KeybindingMode::Search,
            AppMode::Help => KeybindingMode::Help,
        }
    }
}

/// How long a status message stays in the status bar
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Maximum search query length to prevent performance issues
const MAX_SEARCH_LEN: usize = 256;

/// Rendered lines of the active section, reused until the section, theme, or
/// document changes.
struct RenderedSection {
    id: String,
    theme: ThemeMode,
    body: RenderedBody,
    layout: Option<WrapLayout>,
}

/// Screen rows taken by each rendered line once wrapped to `width`.
struct WrapLayout {
    width: u16,
    row_starts: Vec<usize>,
    total: usize,
}

impl WrapLayout {
    fn measure(lines: &[Line<'static>], width: u16) -> Self {
        let mut row_starts = Vec::with_capacity(lines.len());
        let mut total = 0;
        for line in lines {
            row_starts.push(total);
            // Same wrapping as the content pane
            total += Paragraph::new(line.clone())
                .wrap(Wrap { trim: false })
                .line_count(width)
                .max(1);
        }
        Self {
            width,
            row_starts,
            total,
        }
    }
}

pub struct App {
    nav: Navigator<Box<dyn KeyValueStore>>,
    pub mode: AppMode,
    pub show_sidebar: bool,
    pub content_scroll: u16,
    pub help_scroll: u16,
    pub should_quit: bool,
    viewport_width: u16,
    viewport_height: u16,
    status_message: Option<(String, Instant)>,
    document_title: Option<String>,
    file_path: PathBuf,
    config: Config,
    keybindings: Keybindings,
    renderer: MarkdownRenderer,
    rendered: Option<RenderedSection>,
    // Created on first copy and kept alive: on X11 the owner must outlive
    // the paste request.
    clipboard: Option<arboard::Clipboard>,
}

impl App {
    /// Build the app for a parsed guide and select its first section.
    pub fn new(
        guide: Guide,
        file_path: PathBuf,
        config: Config,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let keybindings = config.keybindings();
        let mut nav = Navigator::new(guide.sections, store);
        nav.select_first();

        let mut app = Self {
            nav,
            mode: AppMode::Normal,
            show_sidebar: true,
            content_scroll: 0,
            help_scroll: 0,
            should_quit: false,
            viewport_width: 0,
            viewport_height: 0,
            status_message: None,
            document_title: guide.title,
            file_path,
            config,
            keybindings,
            renderer: MarkdownRenderer::new(),
            rendered: None,
            clipboard: None,
        };

        for theme in [
            app.config.content.code_theme_dark.clone(),
            app.config.content.code_theme_light.clone(),
        ] {
            if !app.renderer.has_code_theme(&theme) {
                tracing::warn!(theme = %theme, "unknown code theme in config");
            }
        }

        app.collect_store_error();
        app
    }

    pub fn nav(&self) -> &Navigator<Box<dyn KeyValueStore>> {
        &self.nav
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keybindings(&self) -> &Keybindings {
        &self.keybindings
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Header text: the guide's own title, else the configured one.
    pub fn title(&self) -> &str {
        self.document_title
            .as_deref()
            .unwrap_or(&self.config.ui.title)
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.nav.theme())
    }

    /// Position of the active section in the filtered list.
    pub fn selected_index(&self) -> Option<usize> {
        let active = self.nav.active_id();
        self.nav
            .filtered_sections()
            .iter()
            .position(|s| s.id == active)
    }

    /// Apply a theme chosen on the command line.
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.nav.set_theme(theme);
        self.collect_store_error();
    }

    /// Start with a search filter already applied.
    pub fn set_search_query(&mut self, query: &str) {
        self.nav.set_search_query(query);
    }

    // ---- input ----

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = self.mode.keybinding_mode();
        match self.keybindings.dispatch(mode, key) {
            Some(action) => self.apply(action),
            None if self.mode == AppMode::Search => {
                if let KeyCode::Char(c) = key.code {
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    {
                        self.search_input(c);
                    }
                }
            }
            None => {}
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Next => self.navigate(Direction::Next),
            Action::Previous => self.navigate(Direction::Previous),

            Action::ScrollDown => self.scroll_content_by(1),
            Action::ScrollUp => self.scroll_content_by(-1),
            Action::PageDown => self.scroll_content_by(self.page_size()),
            Action::PageUp => self.scroll_content_by(-self.page_size()),

            Action::FocusSearch => match self.nav.request_search_focus() {
                FocusRequest::Search => self.set_mode(AppMode::Search),
            },
            Action::ConfirmSearch => self.set_mode(AppMode::Normal),
            Action::CancelSearch => {
                self.nav.set_search_query("");
                self.set_mode(AppMode::Normal);
            }
            Action::ClearSearch => self.nav.set_search_query(""),
            Action::SearchBackspace => self.search_backspace(),

            Action::ToggleTheme => {
                self.nav.toggle_theme();
                self.set_status(format!("✓ {} theme", capitalize(self.nav.theme().as_str())));
            }
            Action::ToggleSidebar => self.show_sidebar = !self.show_sidebar,
            Action::ToggleHelp => self.toggle_help(),
            Action::HelpScrollDown => self.scroll_help_down(),
            Action::HelpScrollUp => self.help_scroll = self.help_scroll.saturating_sub(1),

            Action::CopyContent => self.copy_content(),
            Action::CopyCode => self.copy_code(),

            Action::Quit => self.should_quit = true,
        }
        self.collect_store_error();
    }

    fn set_mode(&mut self, mode: AppMode) {
        if self.mode != mode {
            self.keybindings.reset_sequences();
            self.mode = mode;
        }
    }

    // ---- navigation ----

    fn navigate(&mut self, direction: Direction) {
        if self.nav.navigate(direction) {
            self.content_scroll = 0;
        }
    }

    // ---- search ----

    fn search_input(&mut self, c: char) {
        let query = self.nav.search_query();
        if query.len() >= MAX_SEARCH_LEN || (c.is_control() && c != '\t') {
            return;
        }
        let mut query = query.to_string();
        query.push(c);
        self.nav.set_search_query(query);
    }

    fn search_backspace(&mut self) {
        let mut query = self.nav.search_query().to_string();
        query.pop();
        self.nav.set_search_query(query);
    }

    // ---- content ----

    /// Styled lines of the active section, or `None` when nothing resolvable
    /// is selected.
    pub fn content_lines(&mut self) -> Option<&[Line<'static>]> {
        let section = self.nav.active_section()?;
        let theme = self.nav.theme();

        let stale = self
            .rendered
            .as_ref()
            .is_none_or(|r| r.id != section.id || r.theme != theme);
        if stale {
            let code_theme = self.config.code_theme(theme);
            let body = self
                .renderer
                .render(&section.content, code_theme, &Palette::for_mode(theme));
            self.rendered = Some(RenderedSection {
                id: section.id.clone(),
                theme,
                body,
                layout: None,
            });
        }

        let width = self.viewport_width;
        let rendered = self.rendered.as_mut()?;
        if width > 0 && rendered.layout.as_ref().is_none_or(|l| l.width != width) {
            rendered.layout = Some(WrapLayout::measure(&rendered.body.lines, width));
        }
        Some(rendered.body.lines.as_slice())
    }

    fn current_render(&self) -> Option<&RenderedSection> {
        self.rendered
            .as_ref()
            .filter(|r| r.id == self.nav.active_id())
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.nav.active_section()
    }

    /// Called by the renderer with the size of the content viewport.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        // Re-measures wrapping for the new width
        let _ = self.content_lines();
        self.content_scroll = self.content_scroll.min(self.max_content_scroll());
    }

    /// Screen rows of the active section at the current viewport width.
    pub fn content_rows(&self) -> usize {
        self.current_render()
            .map(|r| match &r.layout {
                Some(layout) => layout.total,
                None => r.body.lines.len(),
            })
            .unwrap_or(0)
    }

    fn content_height(&self) -> u16 {
        u16::try_from(self.content_rows()).unwrap_or(u16::MAX)
    }

    fn max_content_scroll(&self) -> u16 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    fn page_size(&self) -> i32 {
        i32::from(self.viewport_height.saturating_sub(2).max(1))
    }

    fn scroll_content_by(&mut self, delta: i32) {
        let target = (i32::from(self.content_scroll) + delta)
            .clamp(0, i32::from(self.max_content_scroll()));
        self.content_scroll = u16::try_from(target).unwrap_or(0);
    }

    // ---- help ----

    fn toggle_help(&mut self) {
        if self.mode == AppMode::Help {
            self.set_mode(AppMode::Normal);
        } else {
            self.help_scroll = 0;
            self.set_mode(AppMode::Help);
        }
    }

    fn scroll_help_down(&mut self) {
        let max_scroll = help_text::help_lines(&self.keybindings).len() as u16;
        if self.help_scroll.saturating_add(1) < max_scroll {
            self.help_scroll += 1;
        }
    }

    // ---- clipboard ----

    fn copy_content(&mut self) {
        let Some(content) = self.nav.active_section().map(|s| s.content.clone()) else {
            self.set_status("✗ No section selected");
            return;
        };

        let message = match self.copy_to_clipboard(content) {
            Ok(()) => "✓ Section copied to clipboard".to_string(),
            Err(message) => message,
        };
        self.set_status(message);
    }

    /// Put `text` on the clipboard. The error is a ready status message.
    fn copy_to_clipboard(&mut self, text: String) -> Result<(), String> {
        if self.clipboard.is_none() {
            self.clipboard = arboard::Clipboard::new()
                .inspect_err(|e| tracing::debug!(error = %e, "clipboard unavailable"))
                .ok();
        }

        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| format!("✗ Clipboard error: {}", e)),
            None => Err("✗ Clipboard not available".to_string()),
        }
    }

    /// The first code block not yet scrolled past, else the last one.
    pub(crate) fn focused_code_block(&mut self) -> Option<&CodeBlock> {
        self.content_lines()?;
        let rendered = self.rendered.as_ref()?;
        let scroll = usize::from(self.content_scroll);
        let row_of = |line: usize| match &rendered.layout {
            Some(layout) => layout.row_starts.get(line).copied().unwrap_or(layout.total),
            None => line,
        };
        let blocks = &rendered.body.code_blocks;
        blocks
            .iter()
            .find(|block| row_of(block.last_line) >= scroll)
            .or_else(|| blocks.last())
    }

    fn copy_code(&mut self) {
        let Some((language, code)) = self
            .focused_code_block()
            .map(|block| (block.language.clone(), block.code.clone()))
        else {
            self.set_status("✗ No code block in this section");
            return;
        };
        let label = match language.as_deref() {
            Some(lang) if !lang.is_empty() => format!("{} code block", lang),
            _ => "code block".to_string(),
        };
        let message = match self.copy_to_clipboard(code) {
            Ok(()) => format!("✓ Copied {}", label),
            Err(message) => message,
        };
        self.set_status(message);
    }

    // ---- reload ----

    /// Re-read the guide from disk, keeping selection, visited set, query,
    /// and theme.
    pub fn reload(&mut self) -> std::io::Result<()> {
        let guide = parser::parse_file(&self.file_path)?;
        self.document_title = guide.title;
        self.nav.replace_sections(guide.sections);
        self.rendered = None;
        if self.nav.active_id().is_empty() {
            self.nav.select_first();
        }
        self.collect_store_error();
        Ok(())
    }

    // ---- status ----

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_ref().map(|(m, _)| m.as_str())
    }

    pub fn clear_expired_status_message(&mut self) {
        if self
            .status_message
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TIMEOUT)
        {
            self.status_message = None;
        }
    }

    fn collect_store_error(&mut self) {
        if let Some(e) = self.nav.take_store_error() {
            self.set_status(format!("✗ Progress not saved: {}", e));
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
