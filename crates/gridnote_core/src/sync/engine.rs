//! Per-document synchronization engine.
//!
//! # Responsibility
//! - Commit debounced frame edits into the document through targeted
//!   line-range replacement.
//! - Push external document changes out to bound frames without clobbering
//!   in-flight typing.
//!
//! # Invariants
//! - The guard is armed before any store access on the local-edit path and
//!   its cooldown release is scheduled even when the write fails.
//! - Section offsets are re-derived from the store text on every commit; the
//!   engine never trusts a frame's stale line numbers.
//! - Within one debounce window, the last queued content per section wins.

use crate::parse::sections::{insert_missing_sections, parse, validate_title, TitleError};
use crate::store::{DocumentId, DocumentStore, StoreError};
use crate::sync::guard::SyncGuard;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Stable identity of one attached frame.
pub type FrameId = Uuid;

/// Quiet period before a queued edit commits, and the echo-absorption window
/// after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTiming {
    pub debounce: Duration,
    pub cooldown: Duration,
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            cooldown: Duration::from_millis(100),
        }
    }
}

/// View half of a frame binding, implemented by the host's rendering layer.
///
/// `refresh` replaces the view's content wholesale; `is_editing` reports
/// whether the user currently has unsaved local input in the view.
pub trait FrameView {
    fn refresh(&self, content: &str);

    fn is_editing(&self) -> bool {
        false
    }
}

struct FrameBinding {
    title: String,
    view: Arc<dyn FrameView>,
    last_content: Option<String>,
}

struct PendingEdit {
    content: String,
    due: Instant,
}

/// Reported synchronization outcomes, in occurrence order.
///
/// Recoverable conditions travel here instead of failing the call, so one
/// section's inconsistency never blocks the rest of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A debounced edit reached the document.
    EditCommitted { title: String },
    /// A queued edit was dropped because its section vanished between
    /// debounce and commit.
    EditConflict { title: String },
    /// An external-change notification arrived inside the guard window and
    /// was recognized as the engine's own write.
    EchoSuppressed,
    /// A frame received fresh content from the document.
    FrameRefreshed { frame_id: FrameId, title: String },
    /// A frame's content changed on disk while the user was typing in it;
    /// the refresh is deferred to the next sync in which the frame is idle.
    RefreshDeferred { frame_id: FrameId, title: String },
    /// A frame's section no longer exists; the frame keeps its stale content
    /// instead of going blank.
    SectionMissing { frame_id: FrameId, title: String },
}

/// Failures the caller must handle, as a closed union.
#[derive(Debug)]
pub enum SyncError {
    InvalidTitle(TitleError),
    UnknownFrame(FrameId),
    Store(StoreError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(err) => write!(f, "{err}"),
            Self::UnknownFrame(frame_id) => write!(f, "unknown frame: {frame_id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(err) => Some(err),
            Self::UnknownFrame(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TitleError> for SyncError {
    fn from(value: TitleError) -> Self {
        Self::InvalidTitle(value)
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Synchronization engine for one open document.
///
/// All time-dependent entry points take an explicit `now`, so the host event
/// loop drives every transition and behavior is deterministic under test.
pub struct SyncEngine<S: DocumentStore> {
    store: S,
    doc_id: DocumentId,
    timing: SyncTiming,
    guard: SyncGuard,
    pending: BTreeMap<String, PendingEdit>,
    frames: BTreeMap<FrameId, FrameBinding>,
}

impl<S: DocumentStore> SyncEngine<S> {
    pub fn new(store: S, doc_id: impl Into<DocumentId>) -> Self {
        Self::with_timing(store, doc_id, SyncTiming::default())
    }

    pub fn with_timing(store: S, doc_id: impl Into<DocumentId>, timing: SyncTiming) -> Self {
        Self {
            store,
            doc_id: doc_id.into(),
            timing,
            guard: SyncGuard::new(),
            pending: BTreeMap::new(),
            frames: BTreeMap::new(),
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Host-side access to the store. A mutation made here is an external
    /// change from the engine's point of view; follow it with
    /// [`handle_external_change`](Self::handle_external_change) or fold it
    /// into the guard via
    /// [`notify_local_change_origin`](Self::notify_local_change_origin).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Binds a view to one section title and returns the frame's identity.
    pub fn attach_frame(
        &mut self,
        title: &str,
        view: Arc<dyn FrameView>,
    ) -> Result<FrameId, SyncError> {
        let title = validate_title(title)?.to_string();
        let frame_id = Uuid::new_v4();
        debug!("event=frame_attached module=sync status=ok frame={frame_id} title={title}");
        self.frames.insert(
            frame_id,
            FrameBinding {
                title,
                view,
                last_content: None,
            },
        );
        Ok(frame_id)
    }

    /// Removes one binding, returning whether it existed.
    pub fn detach_frame(&mut self, frame_id: FrameId) -> bool {
        let removed = self.frames.remove(&frame_id).is_some();
        if removed {
            debug!("event=frame_detached module=sync status=ok frame={frame_id}");
        }
        removed
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Records new content for a frame's section. The edit commits once the
    /// quiet period elapses; a newer edit to the same section supersedes it.
    pub fn queue_local_edit(
        &mut self,
        frame_id: FrameId,
        content: impl Into<String>,
        now: Instant,
    ) -> Result<(), SyncError> {
        let binding = self
            .frames
            .get(&frame_id)
            .ok_or(SyncError::UnknownFrame(frame_id))?;
        let title = binding.title.clone();
        debug!("event=edit_queued module=sync status=ok title={title}");
        self.pending.insert(
            title,
            PendingEdit {
                content: content.into(),
                due: now + self.timing.debounce,
            },
        );
        Ok(())
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do: a
    /// pending edit coming due or the guard cooldown expiring.
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.values().map(|edit| edit.due).min();
        match (pending, self.guard.release_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    /// Advances engine time: expires the guard cooldown and commits every
    /// queued edit whose quiet period has elapsed.
    ///
    /// A store failure aborts the pass and propagates after the guard
    /// release has been scheduled; edits not yet committed stay queued and
    /// are retried on the next call.
    pub fn tick(&mut self, now: Instant) -> Result<Vec<SyncEvent>, SyncError> {
        self.guard.expire(now);

        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, edit)| edit.due <= now)
            .map(|(title, _)| title.clone())
            .collect();

        let mut events = Vec::new();
        for title in due {
            let Some(edit) = self.pending.remove(&title) else {
                continue;
            };
            self.commit_edit(&title, &edit.content, now, &mut events)?;
        }
        Ok(events)
    }

    /// Reacts to a host notification that the document changed on disk or
    /// through another actor.
    ///
    /// Inside the guard window the notification is an echo of the engine's
    /// own write and nothing is touched. Otherwise every bound frame is
    /// reconciled against a fresh parse.
    pub fn handle_external_change(&mut self, now: Instant) -> Result<Vec<SyncEvent>, SyncError> {
        self.guard.expire(now);
        if self.guard.is_active() {
            debug!(
                "event=echo_suppressed module=sync status=ok doc={}",
                self.doc_id
            );
            return Ok(vec![SyncEvent::EchoSuppressed]);
        }
        self.sync_frames()
    }

    /// Reconciles every bound frame against the current document text.
    ///
    /// Also the initial population path after frames are attached.
    pub fn sync_frames(&mut self) -> Result<Vec<SyncEvent>, SyncError> {
        let text = self.store.read_all(&self.doc_id)?;
        let registry = parse(&text);
        let mut events = Vec::new();

        for (frame_id, binding) in &mut self.frames {
            let Some(section) = registry.get(&binding.title) else {
                warn!(
                    "event=section_missing module=sync status=error frame={frame_id} title={}",
                    binding.title
                );
                events.push(SyncEvent::SectionMissing {
                    frame_id: *frame_id,
                    title: binding.title.clone(),
                });
                continue;
            };

            let content = section.content();
            if binding.last_content.as_deref() == Some(content.as_str()) {
                continue;
            }
            if binding.view.is_editing() {
                debug!(
                    "event=refresh_deferred module=sync status=ok frame={frame_id} title={}",
                    binding.title
                );
                events.push(SyncEvent::RefreshDeferred {
                    frame_id: *frame_id,
                    title: binding.title.clone(),
                });
                continue;
            }

            binding.view.refresh(&content);
            binding.last_content = Some(content);
            events.push(SyncEvent::FrameRefreshed {
                frame_id: *frame_id,
                title: binding.title.clone(),
            });
        }

        Ok(events)
    }

    /// Folds a host-side "this write was mine" signal into the guard, for
    /// hosts whose notification channel cannot distinguish the writer.
    pub fn notify_local_change_origin(&mut self, now: Instant) {
        self.guard.arm();
        self.guard.schedule_release(now, self.timing.cooldown);
    }

    /// Appends any missing sections among `titles` through a guarded write.
    ///
    /// Returns the titles actually inserted, in request order; an empty
    /// result means the document already had every one.
    pub fn ensure_sections(
        &mut self,
        titles: &[String],
        now: Instant,
    ) -> Result<Vec<String>, SyncError> {
        self.guard.arm();
        let outcome = self.append_missing(titles);
        match outcome {
            Ok(inserted) if inserted.is_empty() => {
                self.guard.disarm();
                Ok(inserted)
            }
            Ok(inserted) => {
                self.guard.schedule_release(now, self.timing.cooldown);
                info!(
                    "event=sections_inserted module=sync status=ok doc={} count={}",
                    self.doc_id,
                    inserted.len()
                );
                Ok(inserted)
            }
            Err(err) => {
                self.guard.schedule_release(now, self.timing.cooldown);
                Err(err)
            }
        }
    }

    fn append_missing(&mut self, titles: &[String]) -> Result<Vec<String>, SyncError> {
        let text = self.store.read_all(&self.doc_id)?;
        let registry = parse(&text);
        let mut missing: Vec<String> = Vec::new();
        for title in titles {
            let trimmed = title.trim();
            if !registry.contains(trimmed) && !missing.iter().any(|m| m == trimmed) {
                missing.push(trimmed.to_string());
            }
        }
        if missing.is_empty() {
            return Ok(missing);
        }

        let updated = insert_missing_sections(&text, titles)?;
        self.store.write_all(&self.doc_id, &updated)?;
        Ok(missing)
    }

    /// Commits one edit: arm guard, re-parse, range-replace, schedule the
    /// cooldown. The release is scheduled on every exit path so a failed
    /// write can never wedge future syncs.
    fn commit_edit(
        &mut self,
        title: &str,
        content: &str,
        now: Instant,
        events: &mut Vec<SyncEvent>,
    ) -> Result<(), SyncError> {
        self.guard.arm();
        let outcome = self.apply_edit(title, content);
        match outcome {
            Ok(true) => {
                self.guard.schedule_release(now, self.timing.cooldown);
                let owned = content.to_string();
                for binding in self.frames.values_mut() {
                    if binding.title == title {
                        binding.last_content = Some(owned.clone());
                    }
                }
                info!(
                    "event=edit_committed module=sync status=ok doc={} title={title}",
                    self.doc_id
                );
                events.push(SyncEvent::EditCommitted {
                    title: title.to_string(),
                });
                Ok(())
            }
            Ok(false) => {
                // Nothing was written, so no echo is coming.
                self.guard.disarm();
                warn!(
                    "event=edit_conflict module=sync status=error doc={} title={title}",
                    self.doc_id
                );
                events.push(SyncEvent::EditConflict {
                    title: title.to_string(),
                });
                Ok(())
            }
            Err(err) => {
                self.guard.schedule_release(now, self.timing.cooldown);
                warn!(
                    "event=edit_failed module=sync status=error doc={} title={title} error={err}",
                    self.doc_id
                );
                Err(err)
            }
        }
    }

    /// Re-parses the live document and replaces the target section's body,
    /// leaving the heading line untouched. Returns `false` when the section
    /// is gone.
    fn apply_edit(&mut self, title: &str, content: &str) -> Result<bool, SyncError> {
        let text = self.store.read_all(&self.doc_id)?;
        let registry = parse(&text);
        let Some(section) = registry.get(title) else {
            return Ok(false);
        };

        let (body_start, body_end) = section.body_range();
        let lines = content_lines(content);
        self.store
            .replace_range(&self.doc_id, body_start, body_end, &lines)?;
        Ok(true)
    }
}

/// Splits frame content into document lines; empty content occupies zero
/// lines so an emptied section collapses to its heading.
fn content_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        Vec::new()
    } else {
        content.split('\n').map(str::to_string).collect()
    }
}
