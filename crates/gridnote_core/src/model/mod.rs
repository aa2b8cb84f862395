//! Domain model for documents, sections and grid layouts.
//!
//! # Responsibility
//! - Define the canonical data structures shared by parser, validator and
//!   synchronization engine.
//! - Keep section values ephemeral: they are derived from document text and
//!   never patched incrementally.
//!
//! # Invariants
//! - Sections in a registry are non-overlapping and ordered by `start`.
//! - Registry title lookup resolves to the last occurrence of a duplicate
//!   heading; the duplication itself is recorded, not hidden.

pub mod layout;
pub mod section;
