//! Board resolution use-cases.
//!
//! # Responsibility
//! - Hold the named collection of layout models a host has loaded.
//! - Resolve one board against a document: validate the grid, check the
//!   referenced titles, and pair each block with its live section.
//!
//! # Invariants
//! - A board reference that cannot be satisfied is a reported condition
//!   (which model, which titles), never a silent fallback.
//! - Resolution reads the document once; the returned sections are a
//!   snapshot, not a live binding.

use crate::layout::validator::{validate_model, ModelReport};
use crate::model::layout::{GridDimensions, LayoutBlock, LayoutModel};
use crate::model::section::Section;
use crate::parse::sections::validate_required_sections;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Board resolution failures, with enough detail to self-correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Two models in one configuration share a name.
    DuplicateBoard(String),
    /// The referenced model does not exist in the catalog.
    LayoutNotFound { name: String },
    /// The model failed grid validation; the report lists every offender.
    InvalidModel { name: String, report: ModelReport },
    /// The document lacks sections the model references.
    MissingSections {
        name: String,
        missing_titles: Vec<String>,
    },
    /// Internal mismatch between validation and lookup.
    InconsistentState(&'static str),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateBoard(name) => write!(f, "duplicate board name: `{name}`"),
            Self::LayoutNotFound { name } => write!(f, "board not found: `{name}`"),
            Self::InvalidModel { name, report } => write!(
                f,
                "board `{name}` is invalid: {}",
                report.error_strings().join("; ")
            ),
            Self::MissingSections {
                name,
                missing_titles,
            } => write!(
                f,
                "board `{name}` references missing sections: {}",
                missing_titles.join(", ")
            ),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent board state: {details}")
            }
        }
    }
}

impl Error for BoardError {}

/// Named collection of layout models loaded from host configuration.
#[derive(Debug, Clone, Default)]
pub struct BoardCatalog {
    models: BTreeMap<String, LayoutModel>,
}

impl BoardCatalog {
    /// Builds a catalog, rejecting duplicate board names outright.
    pub fn new(models: Vec<LayoutModel>) -> Result<Self, BoardError> {
        let mut catalog = BTreeMap::new();
        for model in models {
            let name = model.name.clone();
            if catalog.insert(name.clone(), model).is_some() {
                return Err(BoardError::DuplicateBoard(name));
            }
        }
        Ok(Self { models: catalog })
    }

    pub fn get(&self, name: &str) -> Option<&LayoutModel> {
        self.models.get(name)
    }

    /// Sorted board names.
    pub fn names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// One block paired with the section it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub block: LayoutBlock,
    pub section: Section,
}

/// A board ready to render: every block valid, every section present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBoard {
    pub name: String,
    pub placements: Vec<Placement>,
}

/// Resolves a named board against the current document text.
///
/// Fails with the first applicable condition, each carrying everything the
/// host needs to surface it: the model name, the full validation report, or
/// the complete list of missing titles (so the host can offer to generate
/// them).
pub fn resolve_board(
    catalog: &BoardCatalog,
    name: &str,
    text: &str,
    dims: GridDimensions,
) -> Result<ResolvedBoard, BoardError> {
    let Some(model) = catalog.get(name) else {
        warn!("event=board_missing module=service status=error board={name}");
        return Err(BoardError::LayoutNotFound {
            name: name.to_string(),
        });
    };

    let report = validate_model(&model.name, &model.blocks, dims);
    if !report.is_valid {
        warn!(
            "event=board_invalid module=service status=error board={name} issues={}",
            report.issues.len()
        );
        return Err(BoardError::InvalidModel {
            name: name.to_string(),
            report,
        });
    }

    let titles: Vec<String> = model
        .blocks
        .iter()
        .map(|block| block.title.clone())
        .collect();
    let registry = validate_required_sections(text, &titles).map_err(|missing| {
        warn!(
            "event=board_sections_missing module=service status=error board={name} missing={}",
            missing.missing_titles.join(",")
        );
        BoardError::MissingSections {
            name: name.to_string(),
            missing_titles: missing.missing_titles,
        }
    })?;

    let mut placements = Vec::with_capacity(model.blocks.len());
    for block in &model.blocks {
        let section = registry
            .get(&block.title)
            .cloned()
            .ok_or(BoardError::InconsistentState(
                "validated title absent from registry",
            ))?;
        placements.push(Placement {
            block: block.clone(),
            section,
        });
    }

    info!(
        "event=board_resolved module=service status=ok board={name} placements={}",
        placements.len()
    );
    Ok(ResolvedBoard {
        name: name.to_string(),
        placements,
    })
}
