//! Structural, bounds and collision checks for layout models.

use crate::model::layout::{GridDimensions, LayoutBlock};
use std::fmt::{Display, Formatter};

/// One problem found in a layout model.
///
/// `index` is the block's position in model order, so hosts can point at the
/// offending configuration entry even when titles repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockIssue {
    /// Block has no title to bind a section to.
    EmptyTitle { index: usize },
    /// Width or height is zero or negative.
    NonPositiveSize {
        index: usize,
        title: String,
        w: i64,
        h: i64,
    },
    /// Origin lies outside the grid's top-left quadrant.
    NegativeOrigin {
        index: usize,
        title: String,
        x: i64,
        y: i64,
    },
    /// Block extends past the right or bottom grid edge.
    OutOfBounds {
        index: usize,
        title: String,
        right: i64,
        bottom: i64,
        columns: i64,
        rows: i64,
    },
    /// Block overlaps an earlier block; `cell` is the first conflicting
    /// cell in row-major scan order.
    Collision {
        index: usize,
        title: String,
        cell: (i64, i64),
        earlier: String,
    },
}

impl Display for BlockIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle { index } => {
                write!(f, "block #{index} has an empty title")
            }
            Self::NonPositiveSize {
                index,
                title,
                w,
                h,
            } => write!(
                f,
                "block `{title}` (#{index}) has non-positive size {w}x{h}"
            ),
            Self::NegativeOrigin {
                index,
                title,
                x,
                y,
            } => write!(
                f,
                "block `{title}` (#{index}) has negative origin ({x}, {y})"
            ),
            Self::OutOfBounds {
                index,
                title,
                right,
                bottom,
                columns,
                rows,
            } => write!(
                f,
                "block `{title}` (#{index}) extends to ({right}, {bottom}) outside the {columns}x{rows} grid"
            ),
            Self::Collision {
                index,
                title,
                cell,
                earlier,
            } => write!(
                f,
                "block `{title}` (#{index}) collides with `{earlier}` at cell ({}, {})",
                cell.0, cell.1
            ),
        }
    }
}

/// Validation outcome for one named model.
///
/// A model with any issue is invalid as a whole; whether to still render the
/// clean subset of blocks is the host's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReport {
    pub model: String,
    pub is_valid: bool,
    pub issues: Vec<BlockIssue>,
}

impl ModelReport {
    /// Human-readable rendering of every issue, in discovery order.
    pub fn error_strings(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validates `blocks` against the grid in model order.
///
/// Structure and bounds are checked per block; blocks failing either are
/// reported and excluded from collision marking so one bad entry cannot
/// cascade into false collisions. Collision attribution is first-writer-wins:
/// the later-declared block loses the tie and its cells stay unmarked.
pub fn validate_model(name: &str, blocks: &[LayoutBlock], dims: GridDimensions) -> ModelReport {
    let mut issues = Vec::new();
    let cell_count = (dims.columns.max(0) * dims.rows.max(0)) as usize;
    let mut occupancy: Vec<Option<usize>> = vec![None; cell_count];

    for (index, block) in blocks.iter().enumerate() {
        let mut placeable = true;

        if block.title.trim().is_empty() {
            issues.push(BlockIssue::EmptyTitle { index });
            placeable = false;
        }
        if block.w <= 0 || block.h <= 0 {
            issues.push(BlockIssue::NonPositiveSize {
                index,
                title: block.title.clone(),
                w: block.w,
                h: block.h,
            });
            placeable = false;
        }
        if block.x < 0 || block.y < 0 {
            issues.push(BlockIssue::NegativeOrigin {
                index,
                title: block.title.clone(),
                x: block.x,
                y: block.y,
            });
            placeable = false;
        }
        if placeable && (block.right() > dims.columns || block.bottom() > dims.rows) {
            issues.push(BlockIssue::OutOfBounds {
                index,
                title: block.title.clone(),
                right: block.right(),
                bottom: block.bottom(),
                columns: dims.columns,
                rows: dims.rows,
            });
            placeable = false;
        }
        if !placeable {
            continue;
        }

        match first_conflict(&occupancy, block, dims) {
            Some(cell) => {
                let earlier = occupancy[cell_index(cell, dims)]
                    .map(|owner| blocks[owner].title.clone())
                    .unwrap_or_default();
                issues.push(BlockIssue::Collision {
                    index,
                    title: block.title.clone(),
                    cell,
                    earlier,
                });
            }
            None => mark_cells(&mut occupancy, block, dims, index),
        }
    }

    ModelReport {
        model: name.to_string(),
        is_valid: issues.is_empty(),
        issues,
    }
}

fn cell_index(cell: (i64, i64), dims: GridDimensions) -> usize {
    (cell.1 * dims.columns + cell.0) as usize
}

fn first_conflict(
    occupancy: &[Option<usize>],
    block: &LayoutBlock,
    dims: GridDimensions,
) -> Option<(i64, i64)> {
    for y in block.y..block.bottom() {
        for x in block.x..block.right() {
            if occupancy[cell_index((x, y), dims)].is_some() {
                return Some((x, y));
            }
        }
    }
    None
}

fn mark_cells(occupancy: &mut [Option<usize>], block: &LayoutBlock, dims: GridDimensions, owner: usize) {
    for y in block.y..block.bottom() {
        for x in block.x..block.right() {
            occupancy[cell_index((x, y), dims)] = Some(owner);
        }
    }
}
