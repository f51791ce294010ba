mod layout;

use layout::{Pane, PaneLayout};

use crate::keybindings::{Action, KeybindingMode};
use crate::tui::app::{App, AppMode};
use crate::tui::help_text;
use crate::tui::theme::Palette;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Scrollbar,
    ScrollbarOrientation, ScrollbarState, Wrap,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    app.clear_expired_status_message();

    let palette = app.palette();
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let searching = app.mode == AppMode::Search || !app.nav().search_query().is_empty();
    let main = PaneLayout::vertical(area)
        .pane(Pane::Header, Constraint::Length(2))
        .pane_if(!app.show_sidebar && searching, Pane::SearchBar, Constraint::Length(3))
        .pane(Pane::Body, Constraint::Min(0))
        .pane(Pane::Status, Constraint::Length(1))
        .build();

    render_header(frame, app, &palette, main.area(Pane::Header));
    if let Some(search_area) = main.get(Pane::SearchBar) {
        render_search_box(frame, app, &palette, search_area);
    }

    let body = main.area(Pane::Body);
    if app.show_sidebar {
        let columns = PaneLayout::horizontal(body)
            .pane(Pane::Sidebar, Constraint::Percentage(app.config().sidebar_width()))
            .pane(Pane::Content, Constraint::Min(0))
            .build();
        render_sidebar(frame, app, &palette, columns.area(Pane::Sidebar));
        render_content(frame, app, &palette, columns.area(Pane::Content));
    } else {
        render_content(frame, app, &palette, body);
    }

    render_status_bar(frame, app, &palette, main.area(Pane::Status));

    if app.mode == AppMode::Help {
        render_help_popup(frame, app, &palette, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let nav = app.nav();
    let summary = format!(
        "{}/{} visited · {}% · {} ",
        nav.visited_count(),
        nav.len(),
        nav.progress(),
        nav.theme().as_str()
    );

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.border_style(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            app.title().to_string(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    frame.render_widget(title, inner);

    let right = Paragraph::new(Span::styled(summary, Style::default().fg(palette.muted)))
        .alignment(Alignment::Right);
    frame.render_widget(right, inner);
}

fn render_sidebar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let panes = PaneLayout::vertical(area)
        .pane(Pane::SearchBox, Constraint::Length(3))
        .pane(Pane::Progress, Constraint::Length(1))
        .pane(Pane::SectionList, Constraint::Min(0))
        .build();

    render_search_box(frame, app, palette, panes.area(Pane::SearchBox));
    render_progress(frame, app, palette, panes.area(Pane::Progress));
    render_section_list(frame, app, palette, panes.area(Pane::SectionList));
}

fn render_search_box(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let focused = app.mode == AppMode::Search;
    let query = app.nav().search_query();

    let text = if query.is_empty() && !focused {
        Line::from(Span::styled(
            "/ to search",
            Style::default().fg(palette.muted),
        ))
    } else {
        let mut spans = vec![Span::styled(
            query.to_string(),
            Style::default().fg(palette.foreground),
        )];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(palette.accent)));
        }
        Line::from(spans)
    };

    let search = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(focused))
            .title(" Search "),
    );
    frame.render_widget(search, area);
}

fn render_progress(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let nav = app.nav();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.progress).bg(palette.status_bg))
        .percent(u16::from(nav.progress()))
        .label(format!("{}/{} sections reviewed", nav.visited_count(), nav.len()));
    frame.render_widget(gauge, area);
}

fn render_section_list(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let nav = app.nav();
    let filtered = nav.filtered_sections();
    let query = nav.search_query().trim();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(app.mode == AppMode::Normal))
        .title(format!(" Sections ({}/{}) ", filtered.len(), nav.len()));

    if filtered.is_empty() {
        let message = if nav.is_empty() {
            "No sections"
        } else {
            "No sections match"
        };
        let empty = Paragraph::new(Span::styled(message, Style::default().fg(palette.muted)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|section| {
            let marker = if nav.is_visited(&section.id) {
                Span::styled("✓ ", Style::default().fg(palette.visited))
            } else {
                Span::styled("○ ", Style::default().fg(palette.unvisited))
            };
            let mut spans = vec![marker];
            spans.extend(highlight_matches(
                &section.title,
                query,
                Style::default().fg(palette.foreground),
                Style::default()
                    .fg(palette.search_match)
                    .add_modifier(Modifier::BOLD),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(palette.selected());
    let mut state = ListState::default().with_selected(app.selected_index());
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_content(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let title = app
        .active_section()
        .map(|s| format!(" {} ", s.title))
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(false))
        .title(Span::styled(
            title,
            Style::default()
                .fg(palette.heading)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    app.set_viewport(inner.width, inner.height);
    let total = app.content_rows();

    let empty_message = if app.nav().is_empty() {
        format!("No sections found in {}", app.file_path().display())
    } else {
        "Select a section to start studying".to_string()
    };

    let scroll = app.content_scroll;
    let Some(lines) = app.content_lines() else {
        let empty = Paragraph::new(Span::styled(
            empty_message,
            Style::default().fg(palette.muted),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let paragraph = Paragraph::new(lines.to_vec())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if total > inner.height as usize {
        let mut scrollbar_state = ScrollbarState::new(total).position(scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(palette.border)),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mode = match app.mode {
        AppMode::Normal => " NORMAL ",
        AppMode::Search => " SEARCH ",
        AppMode::Help => " HELP ",
    };
    let mut spans = vec![
        Span::styled(
            mode,
            Style::default()
                .fg(palette.selection_fg)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    if let Some(message) = app.status_message() {
        spans.push(Span::raw(message.to_string()));
    } else if app.config().ui.show_hints {
        spans.push(Span::styled(
            key_hints(app),
            Style::default().fg(palette.muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.status()), area);
}

const NORMAL_HINTS: &[Action] = &[
    Action::Next,
    Action::Previous,
    Action::FocusSearch,
    Action::ToggleTheme,
    Action::CopyCode,
    Action::ToggleHelp,
    Action::Quit,
];
const SEARCH_HINTS: &[Action] = &[
    Action::ConfirmSearch,
    Action::CancelSearch,
    Action::ClearSearch,
];
const HELP_HINTS: &[Action] = &[Action::ToggleHelp];

/// `key: action` hints for the current mode, built from the live keymap.
fn key_hints(app: &App) -> String {
    let (mode, actions) = match app.mode {
        AppMode::Normal => (KeybindingMode::Normal, NORMAL_HINTS),
        AppMode::Search => (KeybindingMode::Search, SEARCH_HINTS),
        AppMode::Help => (KeybindingMode::Help, HELP_HINTS),
    };

    actions
        .iter()
        .filter_map(|&action| {
            let keys = app.keybindings().keys_for_action(mode, action);
            let key = keys.first()?;
            Some(format!("{}: {}", key, action.description().to_lowercase()))
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

fn render_help_popup(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let popup = popup_area(area, 70, 80, 40, 10);
    frame.render_widget(Clear, popup);

    let lines = help_text::build_help_text(app.keybindings(), palette);
    let total = lines.len();

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style(true))
                .title(" Help ")
                .style(Style::default().bg(palette.modal_bg)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(help, popup);

    let mut scrollbar_state = ScrollbarState::new(total).position(app.help_scroll as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .style(Style::default().fg(palette.border)),
        popup.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Centered area sized as a percentage of `area`, but never smaller than
/// the given minimums (or larger than `area`).
fn popup_area(area: Rect, percent_x: u16, percent_y: u16, min_width: u16, min_height: u16) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, percent_x).max(min_width).min(area.width);
    let height = scale(area.height, percent_y).max(min_height).min(area.height);
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Split `text` into spans, styling case-insensitive occurrences of `query`.
fn highlight_matches(text: &str, query: &str, base: Style, highlight: Style) -> Vec<Span<'static>> {
    if query.is_empty() {
        return vec![Span::styled(text.to_string(), base)];
    }

    let text_lower = text.to_lowercase();
    let query_lower = query.to_lowercase();
    // Lowercasing can change byte lengths; only highlight when offsets line up.
    if text_lower.len() != text.len() {
        return vec![Span::styled(text.to_string(), base)];
    }

    let mut spans = Vec::new();
    let mut last = 0;
    for (start, matched) in text_lower.match_indices(&query_lower) {
        let end = start + matched.len();
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        if start > last {
            spans.push(Span::styled(text[last..start].to_string(), base));
        }
        spans.push(Span::styled(text[start..end].to_string(), highlight));
        last = end;
    }
    if last < text.len() || spans.is_empty() {
        spans.push(Span::styled(text[last..].to_string(), base));
    }
    spans
}
