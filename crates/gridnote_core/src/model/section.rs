//! Section domain model.
//!
//! # Responsibility
//! - Represent one named, line-delimited region of a document.
//! - Provide the registry shape the parser produces and the engine consumes.
//!
//! # Invariants
//! - `start` is the heading line index; `end` is exclusive and never smaller
//!   than `start + 1`.
//! - `lines` holds exactly the lines strictly between `start + 1` and `end`.
//! - A registry is always rebuilt from scratch by a full parse; it is never
//!   mutated in place after construction.

use std::collections::BTreeMap;

/// One named region of a document, delimited by a level-1 heading.
///
/// The line list is the exact `split('\n')` image of the document text, so a
/// trailing newline in the source contributes a final empty line and joining
/// `lines` with `\n` reproduces the body byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Trimmed heading text.
    pub title: String,
    /// Line index of the heading itself.
    pub start: usize,
    /// Exclusive line index where the next level-1 heading begins, or the
    /// document line count for the final section.
    pub end: usize,
    /// Body lines strictly between the heading and `end`.
    pub lines: Vec<String>,
}

impl Section {
    /// Returns the section body as a single string.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns the half-open line range occupied by the body (heading
    /// excluded).
    pub fn body_range(&self) -> (usize, usize) {
        (self.start + 1, self.end)
    }
}

/// Ordered segmentation of a document plus title-based lookup.
///
/// Lookup keys are unique: when a title occurs on more than one heading, the
/// last occurrence wins. The duplicated titles are recorded so callers can
/// surface the ambiguity instead of silently resolving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: Vec<Section>,
    by_title: BTreeMap<String, usize>,
    duplicates: Vec<String>,
}

impl SectionRegistry {
    /// Builds a registry from sections already ordered by `start`.
    pub(crate) fn from_sections(sections: Vec<Section>) -> Self {
        let mut by_title = BTreeMap::new();
        let mut duplicates = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            if by_title.insert(section.title.clone(), index).is_some()
                && !duplicates.contains(&section.title)
            {
                duplicates.push(section.title.clone());
            }
        }
        Self {
            sections,
            by_title,
            duplicates,
        }
    }

    /// Looks up one section by trimmed title. Last occurrence wins for
    /// duplicated headings.
    pub fn get(&self, title: &str) -> Option<&Section> {
        self.by_title
            .get(title.trim())
            .map(|&index| &self.sections[index])
    }

    /// Returns whether a section with this title exists.
    pub fn contains(&self, title: &str) -> bool {
        self.by_title.contains_key(title.trim())
    }

    /// All sections in document order, duplicate occurrences included.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Lookup titles in document order of their winning occurrence.
    pub fn titles(&self) -> Vec<&str> {
        let mut entries: Vec<(&usize, &str)> = self
            .by_title
            .iter()
            .map(|(title, index)| (index, title.as_str()))
            .collect();
        entries.sort_by_key(|(index, _)| **index);
        entries.into_iter().map(|(_, title)| title).collect()
    }

    /// Titles that occurred on more than one heading, in first-seen order.
    pub fn duplicate_titles(&self) -> &[String] {
        &self.duplicates
    }

    /// Number of distinct lookup titles.
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    /// Returns whether the registry holds no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
