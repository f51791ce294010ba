//! Line classification for the study-guide heading grammar.
//!
//! The grammar is intentionally narrow:
//!
//! ```text
//! numbered     := "##" WS+ DIGIT+ "." WS+ TITLE
//! quick-ref    := "##" WS+ "Quick Reference" [ non-word TAIL ]
//! title        := "#" WS+ TITLE
//! secondary    := "###" ...
//! rule         := ( "-" | "*" | "_" ){3,} (spaces allowed)
//! fence        := "`"{3,} INFO | "~"{3,} INFO
//! ```
//!
//! Anything else is body text.

/// Literal title of the single unnumbered boundary heading.
pub const QUICK_REFERENCE: &str = "Quick Reference";

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `## 3. Title`; the number keeps its literal digits.
    Numbered { number: &'a str, title: &'a str },
    /// `## Quick Reference`
    QuickReference,
    /// `# Document Title`
    Title(&'a str),
    /// `### ...` directly under the document title (author/date metadata)
    Secondary,
    /// `---`, `***`, `___`
    Rule,
    /// Opening or closing code fence
    Fence(Fence),
    /// Everything else
    Body,
}

/// A code fence delimiter: its character, run length, and whether an info
/// string follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub marker: char,
    pub len: usize,
    pub has_info: bool,
}

impl Fence {
    /// Whether `other` closes a block opened by `self`: same character, a run
    /// at least as long, and nothing after it.
    pub fn is_closed_by(&self, other: Fence) -> bool {
        other.marker == self.marker && other.len >= self.len && !other.has_info
    }
}

impl LineKind<'_> {
    /// Whether this line starts a new section when seen outside a code fence.
    pub fn is_boundary(&self) -> bool {
        matches!(self, LineKind::Numbered { .. } | LineKind::QuickReference)
    }
}

/// Classify one line of the document.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(fence) = fence(line) {
        return LineKind::Fence(fence);
    }

    if is_rule(line) {
        return LineKind::Rule;
    }

    if line.starts_with("###") {
        return LineKind::Secondary;
    }

    if let Some(rest) = after_marker(line, "##") {
        if let Some((number, title)) = split_numbered(rest) {
            return LineKind::Numbered { number, title };
        }
        if is_quick_reference(rest) {
            return LineKind::QuickReference;
        }
        return LineKind::Body;
    }

    if let Some(rest) = after_marker(line, "#") {
        let title = rest.trim_end();
        if !title.is_empty() {
            return LineKind::Title(title);
        }
    }

    LineKind::Body
}

/// Strip a heading marker that must be followed by at least one space or tab.
fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.starts_with([' ', '\t']) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Split `3. Title` into `("3", "Title")`.
fn split_numbered(rest: &str) -> Option<(&str, &str)> {
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let (number, tail) = rest.split_at(digits_end);
    let tail = tail.strip_prefix('.')?;
    if !tail.starts_with(char::is_whitespace) {
        return None;
    }

    let title = tail.trim();
    if title.is_empty() {
        return None;
    }
    Some((number, title))
}

fn is_quick_reference(rest: &str) -> bool {
    match rest.strip_prefix(QUICK_REFERENCE) {
        Some(tail) => tail
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric()),
        None => false,
    }
}

fn fence(line: &str) -> Option<Fence> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    // `len` chars of a one-byte marker
    let info = trimmed[len..].trim();
    Some(Fence {
        marker,
        len,
        has_info: !info.is_empty(),
    })
}

fn is_rule(line: &str) -> bool {
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.first() {
        Some(&first) if matches!(first, '-' | '*' | '_') => {
            compact.len() >= 3 && compact.iter().all(|&c| c == first)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_heading() {
        assert_eq!(
            classify("## 3. Title"),
            LineKind::Numbered {
                number: "3",
                title: "Title"
            }
        );
        assert_eq!(
            classify("##  12.  System Design  "),
            LineKind::Numbered {
                number: "12",
                title: "System Design"
            }
        );
    }

    #[test]
    fn test_number_keeps_literal_digits() {
        assert_eq!(
            classify("## 007. Leading zeros"),
            LineKind::Numbered {
                number: "007",
                title: "Leading zeros"
            }
        );
    }

    #[test]
    fn test_malformed_numbered_headings_are_body() {
        assert_eq!(classify("##3. No space after marker"), LineKind::Body);
        assert_eq!(classify("## 3 Missing period"), LineKind::Body);
        assert_eq!(classify("## 3.NoSpace"), LineKind::Body);
        assert_eq!(classify("## 3."), LineKind::Body);
        assert_eq!(classify("## Plain heading"), LineKind::Body);
        assert_eq!(classify(" ## 3. Indented"), LineKind::Body);
    }

    #[test]
    fn test_deeper_headings_are_not_boundaries() {
        assert_eq!(classify("### 3. Subsection"), LineKind::Secondary);
        assert!(!classify("#### 1. Deep").is_boundary());
    }

    #[test]
    fn test_quick_reference() {
        assert_eq!(classify("## Quick Reference"), LineKind::QuickReference);
        assert_eq!(
            classify("## Quick Reference (cheat sheet)"),
            LineKind::QuickReference
        );
        assert_eq!(classify("## Quick References"), LineKind::Body);
        assert_eq!(classify("# Quick Reference"), LineKind::Title("Quick Reference"));
    }

    #[test]
    fn test_title_and_rules() {
        assert_eq!(classify("# Interview Prep"), LineKind::Title("Interview Prep"));
        assert_eq!(classify("#"), LineKind::Body);
        assert_eq!(classify("---"), LineKind::Rule);
        assert_eq!(classify("* * *"), LineKind::Rule);
        assert_eq!(classify("--"), LineKind::Body);
        assert_eq!(classify("-*-"), LineKind::Body);
    }

    fn fence_of(line: &str) -> Fence {
        match classify(line) {
            LineKind::Fence(fence) => fence,
            other => panic!("expected a fence, got {:?}", other),
        }
    }

    #[test]
    fn test_fences() {
        assert_eq!(
            fence_of("```rust"),
            Fence {
                marker: '`',
                len: 3,
                has_info: true
            }
        );
        assert_eq!(fence_of("  ~~~~").len, 4);
        assert_eq!(classify("``not a fence"), LineKind::Body);
    }

    #[test]
    fn test_fence_closes_only_on_matching_kind() {
        let tilde = fence_of("~~~~ text");
        assert!(!tilde.is_closed_by(fence_of("```")));
        assert!(!tilde.is_closed_by(fence_of("~~~")));
        assert!(!tilde.is_closed_by(fence_of("~~~~ more")));
        assert!(tilde.is_closed_by(fence_of("~~~~~")));
    }
}
