//! Grid placement validation.
//!
//! # Responsibility
//! - Check a declarative block list against the placement grid: structure,
//!   bounds and cell collisions.
//!
//! # Invariants
//! - Validation is pure and deterministic; block order decides collision
//!   attribution (first writer wins).
//! - Every offending block is reported, never just the first.

pub mod validator;
