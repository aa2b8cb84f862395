//! Re-entrancy guard for the engine's own writes.
//!
//! # Responsibility
//! - Mark the window in which a document-change notification must be treated
//!   as an echo of the engine's own write.
//!
//! # Invariants
//! - The guard is an explicit per-engine value, never shared global state.
//! - Arming happens before the write; release is scheduled as a cooldown
//!   deadline after it, so asynchronous notification delivery is absorbed.
//! - The guard is cooperative, not a lock: one writer exists per document.

use std::time::{Duration, Instant};

/// Echo-suppression flag with a timestamp-based release.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncGuard {
    applying: bool,
    clear_at: Option<Instant>,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a local write as in flight. Must be called before the store is
    /// touched.
    pub fn arm(&mut self) {
        self.applying = true;
        self.clear_at = None;
    }

    /// Schedules the guard to release `cooldown` after `now`. No-op unless
    /// armed.
    pub fn schedule_release(&mut self, now: Instant, cooldown: Duration) {
        if self.applying {
            self.clear_at = Some(now + cooldown);
        }
    }

    /// Drops the guard immediately; used when an armed write was aborted
    /// before any store mutation.
    pub fn disarm(&mut self) {
        self.applying = false;
        self.clear_at = None;
    }

    /// Releases the guard once its cooldown deadline has passed.
    pub fn expire(&mut self, now: Instant) {
        if let Some(at) = self.clear_at {
            if now >= at {
                self.disarm();
            }
        }
    }

    /// Whether change notifications should currently be treated as echoes.
    pub fn is_active(&self) -> bool {
        self.applying
    }

    /// Pending release deadline, for host event-loop scheduling.
    pub fn release_deadline(&self) -> Option<Instant> {
        self.clear_at
    }
}
