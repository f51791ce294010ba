use crate::keybindings::{KeybindingMode, Keybindings};
use crate::tui::theme::Palette;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Key column width for keybindings
const KEY_COLUMN_WIDTH: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub enum HelpLine {
    Title(&'static str),
    Description(&'static str),
    SectionHeader(String),
    KeyBinding { keys: String, desc: &'static str },
    Note(&'static str),
    Blank,
}

impl HelpLine {
    /// Convert this help line to a styled ratatui Line
    pub fn to_line(&self, palette: &Palette) -> Line<'static> {
        match self {
            HelpLine::Title(text) => Line::from(Span::styled(
                text.to_string(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            HelpLine::Description(text) => Line::from(Span::styled(
                text.to_string(),
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::ITALIC),
            )),
            HelpLine::SectionHeader(text) => Line::from(Span::styled(
                text.clone(),
                Style::default()
                    .fg(palette.heading)
                    .add_modifier(Modifier::BOLD),
            )),
            HelpLine::KeyBinding { keys, desc } => Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", keys, width = KEY_COLUMN_WIDTH),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(desc.to_string(), Style::default().fg(palette.foreground)),
            ]),
            HelpLine::Note(text) => Line::from(vec![
                Span::styled(
                    "Note: ",
                    Style::default()
                        .fg(palette.search_match)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(text.to_string(), Style::default().fg(palette.muted)),
            ]),
            HelpLine::Blank => Line::from(""),
        }
    }
}

const FOOTER: &str = "j/k or ↓/↑ to scroll | Esc or ? to close";

/// Help content generated from the active keybindings, so user overrides
/// show up here too.
pub fn help_lines(keybindings: &Keybindings) -> Vec<HelpLine> {
    let mut lines = vec![
        HelpLine::Title("studymd - Keyboard Shortcuts"),
        HelpLine::Description(FOOTER),
        HelpLine::Blank,
    ];

    for mode in [KeybindingMode::Normal, KeybindingMode::Search] {
        let entries = keybindings.help_entries(mode);
        if entries.is_empty() {
            continue;
        }

        let mut category = "";
        for (action, keys) in entries {
            if action.category() != category {
                category = action.category();
                let header = match mode {
                    KeybindingMode::Normal => category.to_string(),
                    _ => format!("{} ({} mode)", category, mode.display_name()),
                };
                lines.push(HelpLine::SectionHeader(header));
            }
            lines.push(HelpLine::KeyBinding {
                keys: keys.join("/"),
                desc: action.description(),
            });
        }
        lines.push(HelpLine::Blank);
    }

    lines.push(HelpLine::Note(
        "While searching, typed characters always go to the query",
    ));
    lines.push(HelpLine::Note(
        "On Linux, a clipboard manager keeps copied sections after exit",
    ));
    lines.push(HelpLine::Blank);
    lines.push(HelpLine::Description(FOOTER));
    lines
}

/// Build the help text with palette colors applied
pub fn build_help_text(keybindings: &Keybindings, palette: &Palette) -> Vec<Line<'static>> {
    help_lines(keybindings)
        .iter()
        .map(|line| line.to_line(palette))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_default_keys() {
        let lines = help_lines(&Keybindings::default());
        assert!(lines.contains(&HelpLine::KeyBinding {
            keys: "/".to_string(),
            desc: "Search sections",
        }));
        assert!(
            lines
                .iter()
                .any(|l| matches!(l, HelpLine::SectionHeader(h) if h == "Navigation"))
        );
    }

    #[test]
    fn test_search_mode_section_is_labelled() {
        let lines = help_lines(&Keybindings::default());
        assert!(
            lines
                .iter()
                .any(|l| matches!(l, HelpLine::SectionHeader(h) if h.ends_with("(Search mode)")))
        );
    }
}
