//! Bidirectional document/frame synchronization.
//!
//! # Responsibility
//! - Keep per-section frame views consistent with the underlying document
//!   under concurrent external and local edits.
//! - Own the echo-suppression and debouncing policy.
//!
//! # Invariants
//! - The guard is armed before any local write, so the write's own change
//!   notification is recognized as an echo.
//! - The document is re-parsed from the store on every sync step; section
//!   offsets are never cached across edits.
//! - One section's inconsistency never blocks other sections: recoverable
//!   conditions are reported as events, not failures.

pub mod engine;
pub mod guard;
