//! Grid layout model.
//!
//! # Responsibility
//! - Define the declarative block/model shapes loaded from board
//!   configuration.
//! - Keep coordinates signed so out-of-range configuration values surface as
//!   validation errors instead of deserialization failures.
//!
//! # Invariants
//! - A model is read-only once loaded; the engine never mutates placement.
//! - `GridDimensions` are positive; the validator reports any block that
//!   cannot fit them.

use serde::{Deserialize, Serialize};

/// Fixed column count of the placement grid.
pub const GRID_COLUMNS: i64 = 24;

/// Default row count; hosts may configure more or fewer rows.
pub const DEFAULT_GRID_ROWS: i64 = 100;

/// A named rectangle placing one section on the grid.
///
/// `title` must match a section title in the target document to be
/// renderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub title: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl LayoutBlock {
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }
}

/// One named arrangement of blocks (a "board").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutModel {
    pub name: String,
    pub blocks: Vec<LayoutBlock>,
}

/// Placement grid extent used by bounds and collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub columns: i64,
    pub rows: i64,
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
        }
    }
}
