//! Structural view of a document

use serde::{Deserialize, Serialize};

/// A level-2 section of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Slug derived from the heading, unique within its document
    pub id: String,

    /// The heading line as written, without its trailing newline
    pub heading: String,

    /// Everything after the heading line up to the next level-2 heading
    pub content: String,
}

/// A document decomposed into frontmatter, preamble and sections
///
/// `preamble` followed by every section (heading line + content) reproduces
/// the body exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Frontmatter block including its delimiters, if any
    pub frontmatter: Option<String>,

    /// Text before the first level-2 heading
    pub preamble: String,

    /// Sections in document order
    pub sections: Vec<Section>,
}

impl ParsedDocument {
    /// Find a section by id
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Replace the content of the section with the given id
    ///
    /// Returns `false` when no such section exists.
    pub fn replace_section_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => {
                section.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Section ids in document order
    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }
}
