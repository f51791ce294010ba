//! Color palettes for the light and dark modes.

use crate::nav::ThemeMode;
use ratatui::style::{Color, Modifier, Style};

/// Every color the UI draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,

    pub heading: Color,
    pub emphasis: Color,
    pub link: Color,
    pub inline_code_fg: Color,
    pub inline_code_bg: Color,
    pub code_label: Color,
    pub quote: Color,

    pub selection_fg: Color,
    pub selection_bg: Color,
    pub visited: Color,
    pub unvisited: Color,
    pub search_match: Color,
    pub progress: Color,

    pub status_fg: Color,
    pub status_bg: Color,
    pub modal_bg: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            background: Color::Rgb(24, 26, 33),
            foreground: Color::Rgb(220, 223, 228),
            muted: Color::Rgb(110, 118, 129),
            border: Color::Rgb(62, 68, 81),
            border_focused: Color::Rgb(97, 175, 239),
            accent: Color::Rgb(97, 175, 239),

            heading: Color::Rgb(229, 192, 123),
            emphasis: Color::Rgb(198, 120, 221),
            link: Color::Rgb(86, 182, 194),
            inline_code_fg: Color::Rgb(224, 108, 117),
            inline_code_bg: Color::Rgb(40, 44, 52),
            code_label: Color::Rgb(152, 195, 121),
            quote: Color::Rgb(130, 137, 151),

            selection_fg: Color::Rgb(24, 26, 33),
            selection_bg: Color::Rgb(97, 175, 239),
            visited: Color::Rgb(152, 195, 121),
            unvisited: Color::Rgb(110, 118, 129),
            search_match: Color::Rgb(229, 192, 123),
            progress: Color::Rgb(152, 195, 121),

            status_fg: Color::Rgb(171, 178, 191),
            status_bg: Color::Rgb(33, 37, 43),
            modal_bg: Color::Rgb(33, 37, 43),
        }
    }

    fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(56, 58, 66),
            muted: Color::Rgb(140, 143, 151),
            border: Color::Rgb(208, 208, 208),
            border_focused: Color::Rgb(64, 120, 242),
            accent: Color::Rgb(64, 120, 242),

            heading: Color::Rgb(152, 104, 1),
            emphasis: Color::Rgb(166, 38, 164),
            link: Color::Rgb(1, 132, 188),
            inline_code_fg: Color::Rgb(228, 86, 73),
            inline_code_bg: Color::Rgb(234, 234, 235),
            code_label: Color::Rgb(80, 161, 79),
            quote: Color::Rgb(105, 108, 119),

            selection_fg: Color::Rgb(250, 250, 250),
            selection_bg: Color::Rgb(64, 120, 242),
            visited: Color::Rgb(80, 161, 79),
            unvisited: Color::Rgb(160, 161, 167),
            search_match: Color::Rgb(193, 132, 1),
            progress: Color::Rgb(80, 161, 79),

            status_fg: Color::Rgb(56, 58, 66),
            status_bg: Color::Rgb(229, 229, 230),
            modal_bg: Color::Rgb(240, 240, 241),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.border_focused
        } else {
            self.border
        };
        Style::default().fg(color)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status(&self) -> Style {
        Style::default().fg(self.status_fg).bg(self.status_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_have_distinct_palettes() {
        let dark = Palette::for_mode(ThemeMode::Dark);
        let light = Palette::for_mode(ThemeMode::Light);
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.foreground, light.foreground);
    }
}
