//! Layout builder whose panes can be switched on and off.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::collections::HashMap;

/// Named screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Header,
    SearchBar,
    Body,
    Status,
    Sidebar,
    Content,
    SearchBox,
    Progress,
    SectionList,
}

pub struct PaneLayout {
    areas: HashMap<Pane, Rect>,
}

impl PaneLayout {
    pub fn vertical(area: Rect) -> PaneLayoutBuilder {
        PaneLayoutBuilder::new(area, Direction::Vertical)
    }

    pub fn horizontal(area: Rect) -> PaneLayoutBuilder {
        PaneLayoutBuilder::new(area, Direction::Horizontal)
    }

    /// Area of a visible pane
    pub fn get(&self, pane: Pane) -> Option<Rect> {
        self.areas.get(&pane).copied()
    }

    /// Area of a pane that is always added; an empty rect if it was hidden.
    pub fn area(&self, pane: Pane) -> Rect {
        self.get(pane).unwrap_or_default()
    }
}

pub struct PaneLayoutBuilder {
    area: Rect,
    direction: Direction,
    panes: Vec<(Pane, Constraint)>,
}

impl PaneLayoutBuilder {
    fn new(area: Rect, direction: Direction) -> Self {
        Self {
            area,
            direction,
            panes: Vec::new(),
        }
    }

    pub fn pane(mut self, pane: Pane, constraint: Constraint) -> Self {
        self.panes.push((pane, constraint));
        self
    }

    pub fn pane_if(self, visible: bool, pane: Pane, constraint: Constraint) -> Self {
        if visible {
            self.pane(pane, constraint)
        } else {
            self
        }
    }

    pub fn build(self) -> PaneLayout {
        let chunks = Layout::default()
            .direction(self.direction)
            .constraints(self.panes.iter().map(|(_, c)| *c))
            .split(self.area);

        let areas = self
            .panes
            .iter()
            .zip(chunks.iter())
            .map(|((pane, _), rect)| (*pane, *rect))
            .collect();

        PaneLayout { areas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_pane_has_no_area() {
        let layout = PaneLayout::vertical(Rect::new(0, 0, 100, 50))
            .pane(Pane::Header, Constraint::Length(2))
            .pane_if(false, Pane::SearchBar, Constraint::Length(3))
            .pane(Pane::Body, Constraint::Min(0))
            .build();

        assert!(layout.get(Pane::SearchBar).is_none());
        assert_eq!(layout.area(Pane::SearchBar), Rect::default());
        assert_eq!(layout.area(Pane::Body).y, 2);
    }

    #[test]
    fn test_visible_pane_takes_space() {
        let layout = PaneLayout::vertical(Rect::new(0, 0, 100, 50))
            .pane(Pane::Header, Constraint::Length(2))
            .pane_if(true, Pane::SearchBar, Constraint::Length(3))
            .pane(Pane::Body, Constraint::Min(0))
            .build();

        assert_eq!(layout.area(Pane::SearchBar).height, 3);
        assert_eq!(layout.area(Pane::Body).y, 5);
    }

    #[test]
    fn test_horizontal_split() {
        let layout = PaneLayout::horizontal(Rect::new(0, 0, 100, 20))
            .pane(Pane::Sidebar, Constraint::Percentage(30))
            .pane(Pane::Content, Constraint::Min(0))
            .build();

        assert_eq!(layout.area(Pane::Sidebar).width, 30);
        assert_eq!(layout.area(Pane::Content).x, 30);
    }
}
