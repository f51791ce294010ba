//! Section body rendering.
//!
//! Section markdown is parsed into blocks by turbovault-parser and each block
//! is turned into styled ratatui lines. Fenced code is highlighted with
//! syntect and boxed under a language label; the position of every code
//! block is reported so it can be copied on its own.

use crate::tui::theme::Palette;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use turbovault_parser::{ContentBlock, InlineElement, ListItem, TableAlignment};
use unicode_width::UnicodeWidthStr;

const RULE_WIDTH: usize = 40;

/// Indent for blocks nested in list items and details.
const NESTED_INDENT: &str = "   ";

/// A fenced code block as it appears in the rendered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
    /// Index of the label line
    pub first_line: usize,
    /// Index of the closing line
    pub last_line: usize,
}

/// Rendered lines of one section body plus its code blocks.
#[derive(Debug, Default)]
pub struct RenderedBody {
    pub lines: Vec<Line<'static>>,
    pub code_blocks: Vec<CodeBlock>,
}

impl RenderedBody {
    /// Append `nested`, prefixing each of its lines with `prefix`.
    fn extend_prefixed(&mut self, nested: RenderedBody, prefix: &Span<'static>) {
        let offset = self.lines.len();
        self.code_blocks
            .extend(nested.code_blocks.into_iter().map(|block| CodeBlock {
                first_line: block.first_line + offset,
                last_line: block.last_line + offset,
                ..block
            }));
        for line in nested.lines {
            let mut spans = vec![prefix.clone()];
            spans.extend(line.spans);
            self.lines.push(Line::from(spans));
        }
    }
}

pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Whether `name` is one of the bundled syntect themes.
    pub fn has_code_theme(&self, name: &str) -> bool {
        self.theme_set.themes.contains_key(name)
    }

    fn code_theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set.themes.get(name).or_else(|| {
            tracing::debug!(theme = name, "unknown code theme, using first bundled theme");
            self.theme_set.themes.values().next()
        })
    }

    /// Render a section body. Blocks are separated by one blank line.
    pub fn render(&self, content: &str, code_theme: &str, palette: &Palette) -> RenderedBody {
        let blocks = turbovault_parser::parse_blocks_from_line(content, 0);
        self.render_blocks(&blocks, code_theme, palette)
    }

    fn render_blocks(
        &self,
        blocks: &[ContentBlock],
        code_theme: &str,
        palette: &Palette,
    ) -> RenderedBody {
        let mut body = RenderedBody::default();
        for block in blocks {
            if !body.lines.is_empty() {
                body.lines.push(Line::default());
            }
            self.render_block(block, code_theme, palette, &mut body);
        }
        body
    }

    fn render_block(
        &self,
        block: &ContentBlock,
        code_theme: &str,
        palette: &Palette,
        body: &mut RenderedBody,
    ) {
        let base = Style::default().fg(palette.foreground);

        match block {
            ContentBlock::Heading {
                content, inline, ..
            } => {
                let style = Style::default()
                    .fg(palette.heading)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                let spans = text_spans(content, inline, style, palette)
                    .into_iter()
                    .map(|span| Span::styled(span.content, style))
                    .collect();
                body.lines.extend(split_lines(spans));
            }
            ContentBlock::Paragraph { content, inline } => {
                body.lines
                    .extend(split_lines(text_spans(content, inline, base, palette)));
            }
            ContentBlock::Code {
                language, content, ..
            } => {
                let first_line = body.lines.len();
                self.render_code_block(
                    language.as_deref().unwrap_or(""),
                    content,
                    code_theme,
                    palette,
                    &mut body.lines,
                );
                body.code_blocks.push(CodeBlock {
                    language: language.clone(),
                    code: content.clone(),
                    first_line,
                    last_line: body.lines.len() - 1,
                });
            }
            ContentBlock::List { ordered, items } => {
                for (idx, item) in items.iter().enumerate() {
                    self.render_list_item(*ordered, idx, item, code_theme, palette, body);
                }
            }
            ContentBlock::Blockquote {
                content,
                blocks: nested,
            } => {
                let bar = Span::styled("▎ ", Style::default().fg(palette.quote));
                let quoted = if nested.is_empty() {
                    let spans = vec![Span::styled(content.clone(), base)];
                    RenderedBody {
                        lines: split_lines(spans),
                        code_blocks: Vec::new(),
                    }
                } else {
                    self.render_blocks(nested, code_theme, palette)
                };
                let quoted = RenderedBody {
                    lines: quoted
                        .lines
                        .into_iter()
                        .map(|line| quote_line(line, palette))
                        .collect(),
                    code_blocks: quoted.code_blocks,
                };
                body.extend_prefixed(quoted, &bar);
            }
            ContentBlock::Table {
                headers,
                alignments,
                rows,
            } => {
                body.lines
                    .extend(render_table(headers, alignments, rows, palette));
            }
            ContentBlock::Image { alt, .. } => {
                body.lines.push(Line::from(Span::styled(
                    format!("🖼 {}", alt),
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
            ContentBlock::Details {
                summary,
                blocks: nested,
                ..
            } => {
                body.lines.push(Line::from(vec![
                    Span::styled("▶ ", Style::default().fg(palette.accent)),
                    Span::styled(
                        summary.clone(),
                        Style::default()
                            .fg(palette.heading)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
                let nested = self.render_blocks(nested, code_theme, palette);
                body.extend_prefixed(nested, &Span::raw(NESTED_INDENT));
            }
            ContentBlock::HorizontalRule => {
                body.lines.push(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    Style::default().fg(palette.border),
                )));
            }
        }
    }

    fn render_list_item(
        &self,
        ordered: bool,
        idx: usize,
        item: &ListItem,
        code_theme: &str,
        palette: &Palette,
        body: &mut RenderedBody,
    ) {
        let base = Style::default().fg(palette.foreground);
        let marker_style = Style::default().fg(palette.accent);
        let marker = match item.checked {
            Some(true) => "☑ ".to_string(),
            Some(false) => "☐ ".to_string(),
            None if ordered => format!("{}. ", idx + 1),
            None => "• ".to_string(),
        };

        // Nested sub-items arrive as indented lines of the item text.
        if item.content.contains('\n') {
            for (line_idx, line) in item.content.lines().enumerate() {
                if line_idx == 0 {
                    body.lines.push(Line::from(vec![
                        Span::styled(marker.clone(), marker_style),
                        Span::styled(line.to_string(), base),
                    ]));
                    continue;
                }
                let trimmed = line.trim_start();
                let indent = " ".repeat(line.len() - trimmed.len() + marker.width());
                let (sub_marker, text) = match ["- ", "* ", "+ "]
                    .iter()
                    .find_map(|bullet| trimmed.strip_prefix(*bullet))
                {
                    Some(text) => ("• ", text),
                    None => ("", trimmed),
                };
                body.lines.push(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(sub_marker, marker_style),
                    Span::styled(text.to_string(), base),
                ]));
            }
        } else {
            let mut spans = vec![Span::styled(marker, marker_style)];
            spans.extend(text_spans(&item.content, &item.inline, base, palette));
            body.lines.push(Line::from(spans));
        }

        if !item.blocks.is_empty() {
            let nested = self.render_blocks(&item.blocks, code_theme, palette);
            body.extend_prefixed(nested, &Span::raw(NESTED_INDENT));
        }
    }

    fn render_code_block(
        &self,
        lang: &str,
        code: &str,
        code_theme: &str,
        palette: &Palette,
        out: &mut Vec<Line<'static>>,
    ) {
        let label = if lang.is_empty() { "code" } else { lang };
        out.push(Line::from(vec![
            Span::styled("┌─ ", Style::default().fg(palette.border)),
            Span::styled(
                label.to_string(),
                Style::default()
                    .fg(palette.code_label)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let joined = code.trim_end_matches('\n').lines().fold(String::new(), |mut acc, l| {
            acc.push_str(l);
            acc.push('\n');
            acc
        });
        let gutter = Span::styled("│ ", Style::default().fg(palette.border));

        let mut highlighter = self
            .code_theme(code_theme)
            .map(|theme| HighlightLines::new(syntax, theme));
        for line in LinesWithEndings::from(&joined) {
            let mut spans = vec![gutter.clone()];
            let tokens = match highlighter.as_mut() {
                Some(h) => h.highlight_line(line, &self.syntax_set).unwrap_or_default(),
                None => Vec::new(),
            };
            if tokens.is_empty() {
                spans.push(Span::styled(
                    line.trim_end_matches(['\n', '\r']).to_string(),
                    Style::default().fg(palette.foreground),
                ));
            } else {
                for (style, token) in tokens {
                    let text = token.trim_end_matches(['\n', '\r']);
                    if text.is_empty() {
                        continue;
                    }
                    let fg = style.foreground;
                    spans.push(Span::styled(
                        text.to_string(),
                        Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                    ));
                }
            }
            out.push(Line::from(spans));
        }
        out.push(Line::from(Span::styled(
            "└─",
            Style::default().fg(palette.border),
        )));
    }
}

/// Spans for parsed inline elements, or the raw text when the parser gave none.
fn text_spans(
    content: &str,
    inline: &[InlineElement],
    base: Style,
    palette: &Palette,
) -> Vec<Span<'static>> {
    if inline.is_empty() {
        return vec![Span::styled(content.to_string(), base)];
    }
    inline_spans(inline, base, palette)
}

/// Style inline elements: code, strong, emphasis, links, strikethrough.
fn inline_spans(
    elements: &[InlineElement],
    base: Style,
    palette: &Palette,
) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = elements
        .iter()
        .map(|element| match element {
            InlineElement::Text { value } => Span::styled(value.clone(), base),
            InlineElement::Strong { value } => {
                Span::styled(value.clone(), base.add_modifier(Modifier::BOLD))
            }
            InlineElement::Emphasis { value } => Span::styled(
                value.clone(),
                base.fg(palette.emphasis).add_modifier(Modifier::ITALIC),
            ),
            InlineElement::Code { value } => Span::styled(
                value.clone(),
                Style::default()
                    .fg(palette.inline_code_fg)
                    .bg(palette.inline_code_bg),
            ),
            InlineElement::Link { text, .. } => Span::styled(
                text.clone(),
                Style::default()
                    .fg(palette.link)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            InlineElement::Strikethrough { value } => Span::styled(
                value.clone(),
                base.fg(palette.muted).add_modifier(Modifier::CROSSED_OUT),
            ),
            InlineElement::Image { alt, .. } => Span::styled(
                format!("🖼 {}", alt),
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::ITALIC),
            ),
        })
        .collect();

    if spans.is_empty() {
        spans.push(Span::styled(String::new(), base));
    }
    spans
}

/// Break spans into lines at embedded newlines (soft and hard breaks).
fn split_lines(spans: Vec<Span<'static>>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();

    for span in spans {
        let style = span.style;
        let mut parts = span.content.split('\n');
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Span::styled(first.to_string(), style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
        }
    }

    lines.push(Line::from(current));
    lines
}

fn quote_line(line: Line<'static>, palette: &Palette) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .into_iter()
        .map(|span| {
            let style = span.style.fg(palette.quote).add_modifier(Modifier::ITALIC);
            Span::styled(span.content, style)
        })
        .collect();
    Line::from(spans)
}

fn render_table(
    headers: &[String],
    alignments: &[TableAlignment],
    rows: &[Vec<String>],
    palette: &Palette,
) -> Vec<Line<'static>> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.width());
        }
    }

    let header_style = Style::default()
        .fg(palette.heading)
        .add_modifier(Modifier::BOLD);
    let cell_style = Style::default().fg(palette.foreground);

    let mut lines = vec![table_row(headers, &widths, alignments, header_style, palette)];
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    lines.push(Line::from(Span::styled(
        rule.join("─┼─"),
        Style::default().fg(palette.border),
    )));
    for row in rows {
        lines.push(table_row(row, &widths, alignments, cell_style, palette));
    }
    lines
}

fn table_row(
    cells: &[String],
    widths: &[usize],
    alignments: &[TableAlignment],
    style: Style,
    palette: &Palette,
) -> Line<'static> {
    let separator = Span::styled(" │ ", Style::default().fg(palette.border));
    let mut spans = Vec::new();
    for (col, width) in widths.iter().enumerate() {
        if col > 0 {
            spans.push(separator.clone());
        }
        let cell = cells.get(col).map(String::as_str).unwrap_or("");
        let alignment = alignments.get(col).unwrap_or(&TableAlignment::Left);
        spans.push(Span::styled(align_cell(cell, *width, alignment), style));
    }
    Line::from(spans)
}

fn align_cell(text: &str, width: usize, alignment: &TableAlignment) -> String {
    let pad = width.saturating_sub(text.width());
    match alignment {
        TableAlignment::Left | TableAlignment::None => format!("{}{}", text, " ".repeat(pad)),
        TableAlignment::Right => format!("{}{}", " ".repeat(pad), text),
        TableAlignment::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::ThemeMode;
    use pretty_assertions::assert_eq;

    fn palette() -> Palette {
        Palette::for_mode(ThemeMode::Dark)
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn render(markdown: &str) -> RenderedBody {
        MarkdownRenderer::new().render(markdown, "base16-ocean.dark", &palette())
    }

    fn texts(body: &RenderedBody) -> Vec<String> {
        body.lines.iter().map(line_text).collect()
    }

    fn find_span<'a>(body: &'a RenderedBody, text: &str) -> &'a Span<'static> {
        body.lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .find(|span| span.content == text)
            .unwrap_or_else(|| panic!("no span {:?}", text))
    }

    #[test]
    fn test_inline_code_and_bold() {
        let body = render("use `Vec` for **speed**");
        assert_eq!(texts(&body), vec!["use Vec for speed"]);
        assert_eq!(find_span(&body, "Vec").style.fg, Some(palette().inline_code_fg));
        assert!(
            find_span(&body, "speed")
                .style
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_snake_case_is_not_italic() {
        let body = render("call my_fn_name now");
        assert_eq!(texts(&body), vec!["call my_fn_name now"]);
        assert!(
            body.lines[0]
                .spans
                .iter()
                .all(|s| !s.style.add_modifier.contains(Modifier::ITALIC))
        );
    }

    #[test]
    fn test_link_keeps_label() {
        let body = render("see [docs](https://x.dev) here");
        assert_eq!(texts(&body), vec!["see docs here"]);
        assert!(
            find_span(&body, "docs")
                .style
                .add_modifier
                .contains(Modifier::UNDERLINED)
        );
    }

    #[test]
    fn test_code_block_has_language_label() {
        let body = render("Before\n\n```rust\nfn main() {}\n```\n\nAfter");
        let rendered = texts(&body);
        let label = rendered.iter().position(|l| l == "┌─ rust").unwrap();
        assert_eq!(rendered[label + 1], "│ fn main() {}");
        assert_eq!(rendered[label + 2], "└─");
        assert_eq!(rendered.first().map(String::as_str), Some("Before"));
        assert_eq!(rendered.last().map(String::as_str), Some("After"));

        assert_eq!(
            body.code_blocks,
            vec![CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {}".to_string(),
                first_line: label,
                last_line: label + 2,
            }]
        );
    }

    #[test]
    fn test_unknown_code_theme_still_renders() {
        let body = MarkdownRenderer::new().render("```\nlet x = 1;\n```", "no-such-theme", &palette());
        assert_eq!(texts(&body), vec!["┌─ code", "│ let x = 1;", "└─"]);
    }

    #[test]
    fn test_code_block_inside_list_item() {
        let body = render("1. Test1:\n   ```\n   test1\n   ```\n\n2. Test2:\n   test2");
        assert_eq!(body.code_blocks.len(), 1);
        assert_eq!(body.code_blocks[0].code, "test1");

        let rendered = texts(&body);
        let label = body.code_blocks[0].first_line;
        assert_eq!(rendered[label], format!("{}┌─ code", NESTED_INDENT));
        assert_eq!(rendered[label + 1], format!("{}│ test1", NESTED_INDENT));
        assert!(rendered[0].starts_with("1. Test1:"));
    }

    #[test]
    fn test_tilde_fence_keeps_backtick_lines() {
        let body = render("~~~markdown\n```\ninner\n```\n~~~");
        assert_eq!(body.code_blocks.len(), 1);
        assert_eq!(body.code_blocks[0].code, "```\ninner\n```");
        assert_eq!(texts(&body).len(), 5);
    }

    #[test]
    fn test_table_has_header_rule() {
        let body = render("| Op | Cost |\n|----|------|\n| get | O(1) |");
        assert_eq!(texts(&body), vec!["Op  │ Cost", "────┼─────", "get │ O(1)"]);
    }

    #[test]
    fn test_heading_and_bullets() {
        let body = render("### Notes\n\n- one\n- two");
        assert_eq!(texts(&body), vec!["Notes", "", "• one", "• two"]);
        assert!(
            body.lines[0].spans[0]
                .style
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_split_lines_on_breaks() {
        let lines = split_lines(vec![Span::raw("a\nb"), Span::raw("c")]);
        let rendered: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(rendered, vec!["a", "bc"]);
    }

    #[test]
    fn test_align_cell() {
        assert_eq!(align_cell("ab", 5, &TableAlignment::Right), "   ab");
        assert_eq!(align_cell("ab", 5, &TableAlignment::Center), " ab  ");
        assert_eq!(align_cell("ab", 5, &TableAlignment::None), "ab   ");
    }
}
