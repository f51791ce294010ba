//! Study-guide sectioning.
//!
//! Turns one flat markdown document into an ordered list of [`Section`]s.
//! Boundaries are `## <n>. Title` lines plus a single `## Quick Reference`
//! line; headings inside fenced code blocks are ignored. The text above the
//! first boundary becomes a synthetic "Overview" section when it starts with a
//! `# Title` line and has a body left after the title is stripped.
//!
//! Parsing never fails. Text that does not match the grammar is absorbed into
//! whichever segment currently owns it.

pub mod heading;
mod section;

pub use heading::{Fence, LineKind, QUICK_REFERENCE, classify};
pub use section::{Guide, INTRO_ID, INTRO_TITLE, QUICK_REF_ID, Section};

use std::path::Path;

/// Parse a study-guide file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_file(path: &Path) -> std::io::Result<Guide> {
    let content = std::fs::read_to_string(path)?;
    let guide = parse_guide(&content);
    tracing::debug!(
        path = %path.display(),
        sections = guide.sections.len(),
        "parsed study guide"
    );
    Ok(guide)
}

/// Parse a document into its ordered sections.
///
/// Sections keep their physical order. The intro section, when present, is
/// always first. Numbers are never re-sorted: `## 2.` before `## 1.` stays in
/// that order.
pub fn parse_sections(document: &str) -> Vec<Section> {
    parse_guide(document).sections
}

/// Parse a document into its title and ordered sections.
pub fn parse_guide(document: &str) -> Guide {
    let mut segments = split_segments(document).into_iter();

    let mut sections = Vec::new();
    let mut title = None;

    if let Some(leading) = segments.next() {
        if let Some((doc_title, intro)) = leading_intro(&leading.body) {
            title = Some(doc_title.to_string());
            if !intro.is_empty() {
                sections.push(Section::new(INTRO_ID, INTRO_TITLE, intro));
            }
        }
    }

    for segment in segments {
        let section = match segment.kind {
            SegmentKind::Numbered { number, title } => {
                Section::numbered(number, title, numbered_body(&segment.body))
            }
            SegmentKind::QuickReference => {
                Section::new(QUICK_REF_ID, QUICK_REFERENCE, join_trimmed(&segment.body))
            }
            SegmentKind::Leading => continue,
        };
        if !section.content.is_empty() {
            sections.push(section);
        }
    }

    Guide { title, sections }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind<'a> {
    Leading,
    Numbered { number: &'a str, title: &'a str },
    QuickReference,
}

/// A boundary line plus the body lines it owns (boundary excluded).
#[derive(Debug)]
struct Segment<'a> {
    kind: SegmentKind<'a>,
    body: Vec<&'a str>,
}

impl<'a> Segment<'a> {
    fn new(kind: SegmentKind<'a>) -> Self {
        Self {
            kind,
            body: Vec::new(),
        }
    }
}

fn split_segments(document: &str) -> Vec<Segment<'_>> {
    let mut segments = vec![Segment::new(SegmentKind::Leading)];
    let mut open_fence: Option<Fence> = None;
    let mut seen_quick_reference = false;

    for line in document.lines() {
        let kind = classify(line);

        if let LineKind::Fence(fence) = kind {
            open_fence = match open_fence {
                None => Some(fence),
                Some(open) if open.is_closed_by(fence) => None,
                still_open => still_open,
            };
        } else if open_fence.is_none() && kind.is_boundary() {
            let boundary = match kind {
                LineKind::Numbered { number, title } => {
                    Some(SegmentKind::Numbered { number, title })
                }
                LineKind::QuickReference if !seen_quick_reference => {
                    seen_quick_reference = true;
                    Some(SegmentKind::QuickReference)
                }
                _ => None,
            };
            if let Some(boundary) = boundary {
                segments.push(Segment::new(boundary));
                continue;
            }
        }

        if let Some(current) = segments.last_mut() {
            current.body.push(line);
        }
    }

    segments
}

/// Body of a numbered section: a rule directly under the heading is dropped.
fn numbered_body(body: &[&str]) -> String {
    let mut lines = skip_blank(body);
    if let Some((first, rest)) = lines.split_first() {
        if classify(first) == LineKind::Rule {
            lines = rest;
        }
    }
    join_trimmed(lines)
}

/// Title and intro text of the leading segment.
///
/// Returns `None` unless the segment starts with a `# Title` line. The line
/// right after the title is dropped too when it is a `###` metadata heading.
fn leading_intro<'a>(body: &[&'a str]) -> Option<(&'a str, String)> {
    let lines = skip_blank(body);
    let (first, rest) = lines.split_first()?;
    let LineKind::Title(title) = classify(*first) else {
        return None;
    };

    let mut rest = skip_blank(rest);
    if let Some((next, after)) = rest.split_first() {
        if classify(next) == LineKind::Secondary {
            rest = after;
        }
    }

    Some((title, join_trimmed(rest)))
}

fn skip_blank<'s, 'a>(lines: &'s [&'a str]) -> &'s [&'a str] {
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    &lines[start..]
}

fn join_trimmed(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GUIDE: &str = r#"# Senior SWE Interview Prep

### Compiled notes, 2024 edition

Use this guide top to bottom.

## 1. Data Structures

---

Arrays, hash maps, and trees.

## 2. Algorithms

Graph search: dfs traversal and bfs.

## Quick Reference

| Topic | Complexity |
|-------|------------|
| BFS   | O(V + E)   |
"#;

    fn ids(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.id.as_str()).collect()
    }

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_parse_full_guide() {
        let guide = parse_guide(GUIDE);

        assert_eq!(guide.title.as_deref(), Some("Senior SWE Interview Prep"));
        assert_eq!(
            ids(&guide.sections),
            vec!["intro", "section-1", "section-2", "quick-ref"]
        );
        assert_eq!(
            titles(&guide.sections),
            vec![
                "Overview",
                "1. Data Structures",
                "2. Algorithms",
                "Quick Reference"
            ]
        );
        assert_eq!(guide.sections[0].content, "Use this guide top to bottom.");
        assert_eq!(guide.sections[1].content, "Arrays, hash maps, and trees.");
        assert!(guide.sections[3].content.starts_with("| Topic"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse_sections(GUIDE), parse_sections(GUIDE));
    }

    #[test]
    fn test_intro_first_and_no_numeric_sorting() {
        let md = "# Guide\n\nWelcome.\n\n## 2. B\n\nbee\n\n## 1. A\n\nay\n";
        let sections = parse_sections(md);
        assert_eq!(titles(&sections), vec!["Overview", "2. B", "1. A"]);
    }

    #[test]
    fn test_id_uses_heading_number_not_position() {
        let md = "## 3. First\n\nx\n\n## 7. Caching\n\nLRU and TTL.\n";
        let sections = parse_sections(md);
        assert_eq!(ids(&sections), vec!["section-3", "section-7"]);
        assert_eq!(sections[1].title, "7. Caching");
    }

    #[test]
    fn test_quick_reference_single_section() {
        let md = "## 1. A\n\nbody\n\n## Quick Reference\n\ncheat sheet\n\n## Quick Reference\n\nmore\n";
        let sections = parse_sections(md);

        let quick: Vec<_> = sections.iter().filter(|s| s.id == QUICK_REF_ID).collect();
        assert_eq!(quick.len(), 1);
        assert!(!quick[0].content.starts_with("## Quick Reference"));
        assert!(quick[0].content.starts_with("cheat sheet"));
        // The second heading is plain body text of the first one.
        assert!(quick[0].content.contains("## Quick Reference\n\nmore"));
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let md = "## 1. Empty\n\n   \n## 2. Full\n\ncontent\n## 3. Rule only\n---\n";
        let sections = parse_sections(md);
        assert_eq!(ids(&sections), vec!["section-2"]);
    }

    #[test]
    fn test_only_rule_directly_under_heading_is_removed() {
        let md = "## 1. A\n\n---\n\nfirst\n\n---\n\nsecond\n";
        let sections = parse_sections(md);
        assert_eq!(sections[0].content, "first\n\n---\n\nsecond");
    }

    #[test]
    fn test_empty_and_whitespace_documents() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("  \n\t\n").is_empty());
    }

    #[test]
    fn test_no_recognizable_headings() {
        assert!(parse_sections("just some notes\n## not numbered\n").is_empty());
    }

    #[test]
    fn test_leading_text_without_title_is_dropped() {
        let md = "stray preface\n\n## 1. A\n\nbody\n";
        let guide = parse_guide(md);
        assert_eq!(ids(&guide.sections), vec!["section-1"]);
        assert_eq!(guide.title, None);
    }

    #[test]
    fn test_title_only_intro_is_elided() {
        let md = "# Guide\n### by someone\n\n## 1. A\n\nbody\n";
        let guide = parse_guide(md);
        assert_eq!(guide.title.as_deref(), Some("Guide"));
        assert_eq!(ids(&guide.sections), vec!["section-1"]);
    }

    #[test]
    fn test_only_one_metadata_heading_is_stripped() {
        let md = "# Guide\n### meta one\n### meta two\nIntro body\n";
        let sections = parse_sections(md);
        assert_eq!(sections[0].id, INTRO_ID);
        assert_eq!(sections[0].content, "### meta two\nIntro body");
    }

    #[test]
    fn test_headings_inside_code_fences_are_ignored() {
        let md = "## 1. Shell\n\n```md\n## 2. Not a section\n```\n\n## 3. Real\n\nbody\n";
        let sections = parse_sections(md);
        assert_eq!(ids(&sections), vec!["section-1", "section-3"]);
        assert!(sections[0].content.contains("## 2. Not a section"));
    }

    #[test]
    fn test_fence_of_other_kind_does_not_close_block() {
        let md = "## 1. Docs\n\n~~~markdown\n```\n## 2. Still inside\n```\n~~~\n\n## 3. Real\n\nbody\n";
        let sections = parse_sections(md);
        assert_eq!(ids(&sections), vec!["section-1", "section-3"]);
        assert!(sections[0].content.contains("## 2. Still inside"));
    }

    #[test]
    fn test_malformed_heading_is_absorbed() {
        let md = "## 1. A\n\nfirst\n\n##2. Broken\n\nsecond\n";
        let sections = parse_sections(md);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.contains("##2. Broken"));
    }

    #[test]
    fn test_crlf_input() {
        let md = "# Guide\r\n\r\nHello\r\n\r\n## 1. A\r\n\r\nbody\r\n";
        let sections = parse_sections(md);
        assert_eq!(ids(&sections), vec!["intro", "section-1"]);
        assert_eq!(sections[1].content, "body");
    }
}
