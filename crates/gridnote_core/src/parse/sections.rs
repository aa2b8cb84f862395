//! Section scanner and markdown helpers.
//!
//! # Responsibility
//! - Segment a document into named line ranges, top to bottom, in one pass.
//! - Generate and append well-formed sections for titles a board requires.
//!
//! # Invariants
//! - The scan never fails; malformed input is simply content.
//! - Generated titles are validated explicitly; a title containing `#` or a
//!   newline is rejected as a [`TitleError`], never a panic.
//! - Parsed sections are non-overlapping and ordered by `start`.

use crate::model::section::{Section, SectionRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

// One `#`, one or more spaces, then a title whose first character is neither
// whitespace nor `#`. Trailing whitespace is tolerated and trimmed.
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# +([^#\s].*?)[ \t]*$").expect("valid heading regex"));

/// Title rejection reasons for the generation helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    /// Title is empty or whitespace-only.
    Empty,
    /// Title contains a line break and could never round-trip as a heading.
    ContainsNewline(String),
    /// Title contains `#`, which would be ambiguous against heading syntax.
    ContainsHash(String),
}

impl Display for TitleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "section title is empty"),
            Self::ContainsNewline(title) => {
                write!(f, "section title contains a line break: `{title}`")
            }
            Self::ContainsHash(title) => {
                write!(f, "section title contains `#`: `{title}`")
            }
        }
    }
}

impl Error for TitleError {}

/// Validation failure for [`validate_required_sections`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSections {
    /// Every requested title absent from the document, in request order.
    pub missing_titles: Vec<String>,
}

impl Display for MissingSections {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing sections: {}", self.missing_titles.join(", "))
    }
}

impl Error for MissingSections {}

/// Returns the trimmed heading title when `line` is a level-1 delimiter.
fn heading_title(line: &str) -> Option<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    HEADING_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Checks a candidate title for the generation helpers, returning it trimmed.
pub fn validate_title(title: &str) -> Result<&str, TitleError> {
    if title.contains('\n') || title.contains('\r') {
        return Err(TitleError::ContainsNewline(title.to_string()));
    }
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TitleError::Empty);
    }
    if trimmed.contains('#') {
        return Err(TitleError::ContainsHash(trimmed.to_string()));
    }
    Ok(trimmed)
}

/// Segments `text` into sections delimited by strict level-1 headings.
///
/// Total and deterministic: a document with no level-1 heading yields an
/// empty registry. The line model is the exact `split('\n')` image of the
/// text, so line indices are stable against byte-level reconstruction.
pub fn parse(text: &str) -> SectionRegistry {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut sections = Vec::new();
    let mut open: Option<(String, usize)> = None;

    for (index, line) in lines.iter().enumerate() {
        if let Some(title) = heading_title(line) {
            if let Some((open_title, start)) = open.take() {
                sections.push(close_section(open_title, start, index, &lines));
            }
            open = Some((title.to_string(), index));
        }
    }
    if let Some((open_title, start)) = open {
        sections.push(close_section(open_title, start, lines.len(), &lines));
    }

    SectionRegistry::from_sections(sections)
}

fn close_section(title: String, start: usize, end: usize, lines: &[&str]) -> Section {
    let body = lines[start + 1..end]
        .iter()
        .map(|line| (*line).to_string())
        .collect();
    Section {
        title,
        start,
        end,
        lines: body,
    }
}

/// Returns whether `text` contains a section with this title.
pub fn section_exists(text: &str, title: &str) -> bool {
    parse(text).contains(title)
}

/// Emits a fresh section: heading, blank separator line, then the content
/// with its trailing newline normalized to exactly one.
pub fn generate_section_markdown(title: &str, content: &str) -> Result<String, TitleError> {
    let title = validate_title(title)?;
    let body = content.trim_end_matches('\n');
    let mut out = format!("# {title}\n\n");
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    Ok(out)
}

/// Appends generated sections for every absent title, in the order given.
///
/// Already-present titles are skipped; when nothing is missing the input is
/// returned byte-identical. Each appended section is preceded by a blank-line
/// separator.
pub fn insert_missing_sections(text: &str, titles: &[String]) -> Result<String, TitleError> {
    for title in titles {
        validate_title(title)?;
    }

    let registry = parse(text);
    let mut out = text.to_string();
    let mut appended: BTreeSet<&str> = BTreeSet::new();

    for title in titles {
        let trimmed = title.trim();
        if registry.contains(trimmed) || !appended.insert(trimmed) {
            continue;
        }
        if !out.is_empty() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            if !out.ends_with("\n\n") {
                out.push('\n');
            }
        }
        out.push_str(&generate_section_markdown(trimmed, "")?);
    }

    Ok(out)
}

/// Parses `text` and checks that every required title is present.
///
/// Returns the registry on success, or every absent title (deduplicated, in
/// request order) on failure.
pub fn validate_required_sections(
    text: &str,
    titles: &[String],
) -> Result<SectionRegistry, MissingSections> {
    let registry = parse(text);
    let mut missing = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    for title in titles {
        let trimmed = title.trim();
        if !registry.contains(trimmed) && seen.insert(trimmed) {
            missing.push(trimmed.to_string());
        }
    }

    if missing.is_empty() {
        Ok(registry)
    } else {
        Err(MissingSections {
            missing_titles: missing,
        })
    }
}
