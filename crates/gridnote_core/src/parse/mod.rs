//! Document segmentation.
//!
//! # Responsibility
//! - Turn raw document text into a [`crate::model::section::SectionRegistry`].
//! - Provide the pure helpers the engine and host build on: existence
//!   checks, section generation, missing-section insertion and required-title
//!   validation.
//!
//! # Invariants
//! - Segmentation is total: any string input parses without error.
//! - Only strict level-1 headings delimit sections; deeper headings are
//!   content.

pub mod sections;
