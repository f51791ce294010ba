use serde::{Deserialize, Serialize};

/// Id of the synthetic section built from the text above the first heading.
pub const INTRO_ID: &str = "intro";
/// Title of the synthetic intro section.
pub const INTRO_TITLE: &str = "Overview";
/// Id of the Quick Reference section.
pub const QUICK_REF_ID: &str = "quick-ref";

/// One addressable unit of a study guide.
///
/// Ids are derived from the source text only (`section-<digits>`, `quick-ref`,
/// `intro`), so re-parsing the same document always yields the same ids and a
/// persisted visited set stays meaningful across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Build a numbered section from the literal digits and title of its heading.
    pub fn numbered(number: &str, title: &str, content: impl Into<String>) -> Self {
        Self::new(
            format!("section-{}", number),
            format!("{}. {}", number, title),
            content,
        )
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}

/// A parsed study guide: the optional `# Title` line plus its sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub title: Option<String>,
    pub sections: Vec<Section>,
}

impl Guide {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
