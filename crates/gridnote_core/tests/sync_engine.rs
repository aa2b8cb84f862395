use gridnote_core::{
    parse, DocumentStore, FrameView, MemoryStore, SyncEngine, SyncError, SyncEvent, SyncTiming,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const DOC: &str = "doc.md";
const TEXT: &str = "# A\nfoo\n# B\nbar\n";

#[derive(Default)]
struct MockFrame {
    refreshes: Mutex<Vec<String>>,
    editing: AtomicBool,
}

impl MockFrame {
    fn refreshed(&self) -> Vec<String> {
        self.refreshes.lock().unwrap().clone()
    }

    fn set_editing(&self, editing: bool) {
        self.editing.store(editing, Ordering::SeqCst);
    }
}

impl FrameView for MockFrame {
    fn refresh(&self, content: &str) {
        self.refreshes.lock().unwrap().push(content.to_string());
    }

    fn is_editing(&self) -> bool {
        self.editing.load(Ordering::SeqCst)
    }
}

fn engine_with(text: &str) -> SyncEngine<MemoryStore> {
    let mut store = MemoryStore::new();
    store.insert(DOC, text);
    SyncEngine::new(store, DOC)
}

fn timing() -> SyncTiming {
    SyncTiming::default()
}

#[test]
fn initial_sync_populates_attached_frames() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame.clone()).unwrap();

    let events = engine.sync_frames().unwrap();

    assert_eq!(
        events,
        vec![SyncEvent::FrameRefreshed {
            frame_id,
            title: "A".to_string(),
        }]
    );
    assert_eq!(frame.refreshed(), vec!["foo".to_string()]);
}

#[test]
fn local_edit_commits_only_after_the_quiet_period() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame).unwrap();
    let t0 = Instant::now();

    engine.queue_local_edit(frame_id, "foo2", t0).unwrap();
    assert_eq!(engine.next_deadline(), Some(t0 + timing().debounce));

    let early = engine.tick(t0 + Duration::from_millis(100)).unwrap();
    assert!(early.is_empty());
    assert_eq!(engine.store().read_all(DOC).unwrap(), TEXT);

    let events = engine.tick(t0 + timing().debounce).unwrap();
    assert_eq!(
        events,
        vec![SyncEvent::EditCommitted {
            title: "A".to_string(),
        }]
    );
    assert_eq!(
        engine.store().read_all(DOC).unwrap(),
        "# A\nfoo2\n# B\nbar\n"
    );
}

#[test]
fn newer_edit_supersedes_within_the_debounce_window() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame).unwrap();
    let t0 = Instant::now();

    engine.queue_local_edit(frame_id, "first", t0).unwrap();
    engine
        .queue_local_edit(frame_id, "second", t0 + Duration::from_millis(100))
        .unwrap();

    // The superseded edit's original deadline passes without a commit.
    let events = engine.tick(t0 + Duration::from_millis(350)).unwrap();
    assert!(events.is_empty());

    let events = engine.tick(t0 + Duration::from_millis(400)).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(
        engine.store().read_all(DOC).unwrap(),
        "# A\nsecond\n# B\nbar\n"
    );
}

#[test]
fn own_write_is_suppressed_until_the_cooldown_expires() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame.clone()).unwrap();
    engine.sync_frames().unwrap();
    let t0 = Instant::now();

    engine.queue_local_edit(frame_id, "foo2", t0).unwrap();
    let commit_at = t0 + timing().debounce;
    engine.tick(commit_at).unwrap();

    // The host's change notification fires inside the cooldown window.
    let echo = engine
        .handle_external_change(commit_at + Duration::from_millis(50))
        .unwrap();
    assert_eq!(echo, vec![SyncEvent::EchoSuppressed]);
    assert_eq!(frame.refreshed(), vec!["foo".to_string()]);

    // After the cooldown the engine reconciles again; content already
    // matches the committed edit, so nothing is pushed.
    let late = engine
        .handle_external_change(commit_at + timing().cooldown)
        .unwrap();
    assert!(late.is_empty());
}

#[test]
fn commit_leaves_untouched_sections_at_their_offsets() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame).unwrap();
    let t0 = Instant::now();

    let before = parse(&engine.store().read_all(DOC).unwrap());
    engine.queue_local_edit(frame_id, "foo2", t0).unwrap();
    engine.tick(t0 + timing().debounce).unwrap();
    let after = parse(&engine.store().read_all(DOC).unwrap());

    assert_eq!(
        before.get("B").unwrap().start,
        after.get("B").unwrap().start
    );
    assert_eq!(after.get("B").unwrap().lines, vec!["bar", ""]);
}

#[test]
fn vanished_section_turns_the_commit_into_a_conflict() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame).unwrap();
    let t0 = Instant::now();

    engine.queue_local_edit(frame_id, "foo2", t0).unwrap();
    engine
        .store_mut()
        .write_all(DOC, "# C\nsomething else\n")
        .unwrap();

    let events = engine.tick(t0 + timing().debounce).unwrap();
    assert_eq!(
        events,
        vec![SyncEvent::EditConflict {
            title: "A".to_string(),
        }]
    );
    assert_eq!(
        engine.store().read_all(DOC).unwrap(),
        "# C\nsomething else\n"
    );

    // An aborted commit never wrote, so the next notification is real.
    let after = engine
        .handle_external_change(t0 + timing().debounce + Duration::from_millis(1))
        .unwrap();
    assert_eq!(
        after,
        vec![SyncEvent::SectionMissing {
            frame_id,
            title: "A".to_string(),
        }]
    );
}

#[test]
fn external_change_refreshes_idle_frames() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame.clone()).unwrap();
    engine.sync_frames().unwrap();

    engine
        .store_mut()
        .write_all(DOC, "# A\nchanged\n# B\nbar\n")
        .unwrap();
    let events = engine.handle_external_change(Instant::now()).unwrap();

    assert_eq!(
        events,
        vec![SyncEvent::FrameRefreshed {
            frame_id,
            title: "A".to_string(),
        }]
    );
    assert_eq!(
        frame.refreshed(),
        vec!["foo".to_string(), "changed".to_string()]
    );
}

#[test]
fn refresh_is_deferred_while_the_user_is_typing() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame.clone()).unwrap();
    engine.sync_frames().unwrap();

    engine
        .store_mut()
        .write_all(DOC, "# A\nchanged\n# B\nbar\n")
        .unwrap();
    frame.set_editing(true);

    let deferred = engine.handle_external_change(Instant::now()).unwrap();
    assert_eq!(
        deferred,
        vec![SyncEvent::RefreshDeferred {
            frame_id,
            title: "A".to_string(),
        }]
    );
    assert_eq!(frame.refreshed(), vec!["foo".to_string()]);

    frame.set_editing(false);
    let delivered = engine.handle_external_change(Instant::now()).unwrap();
    assert_eq!(
        delivered,
        vec![SyncEvent::FrameRefreshed {
            frame_id,
            title: "A".to_string(),
        }]
    );
    assert_eq!(
        frame.refreshed(),
        vec!["foo".to_string(), "changed".to_string()]
    );
}

#[test]
fn frame_bound_to_absent_section_reports_missing() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("Z", frame.clone()).unwrap();

    let events = engine.sync_frames().unwrap();

    assert_eq!(
        events,
        vec![SyncEvent::SectionMissing {
            frame_id,
            title: "Z".to_string(),
        }]
    );
    assert!(frame.refreshed().is_empty());
}

#[test]
fn ensure_sections_appends_and_guards_its_own_write() {
    let mut engine = engine_with("# A\nfoo\n");
    let t0 = Instant::now();

    let inserted = engine
        .ensure_sections(&["A".to_string(), "B".to_string()], t0)
        .unwrap();
    assert_eq!(inserted, vec!["B".to_string()]);

    let text = engine.store().read_all(DOC).unwrap();
    let registry = parse(&text);
    assert!(registry.contains("A"));
    assert!(registry.contains("B"));

    let echo = engine
        .handle_external_change(t0 + Duration::from_millis(50))
        .unwrap();
    assert_eq!(echo, vec![SyncEvent::EchoSuppressed]);

    let later = engine.handle_external_change(t0 + timing().cooldown).unwrap();
    assert!(later.is_empty());
}

#[test]
fn ensure_sections_without_missing_titles_does_not_arm_the_guard() {
    let mut engine = engine_with(TEXT);
    let t0 = Instant::now();

    let inserted = engine.ensure_sections(&["A".to_string()], t0).unwrap();
    assert!(inserted.is_empty());
    assert_eq!(engine.store().read_all(DOC).unwrap(), TEXT);

    let events = engine.handle_external_change(t0).unwrap();
    assert!(!events.contains(&SyncEvent::EchoSuppressed));
}

#[test]
fn host_write_signal_folds_into_the_guard() {
    let mut engine = engine_with(TEXT);
    let t0 = Instant::now();

    engine.notify_local_change_origin(t0);

    let echo = engine
        .handle_external_change(t0 + Duration::from_millis(50))
        .unwrap();
    assert_eq!(echo, vec![SyncEvent::EchoSuppressed]);

    let later = engine.handle_external_change(t0 + timing().cooldown).unwrap();
    assert!(later.is_empty());
}

#[test]
fn queueing_against_an_unknown_frame_is_rejected() {
    let mut engine = engine_with(TEXT);

    let err = engine
        .queue_local_edit(uuid::Uuid::new_v4(), "x", Instant::now())
        .unwrap_err();
    assert!(matches!(err, SyncError::UnknownFrame(_)));
}

#[test]
fn failed_commit_still_releases_the_guard() {
    let mut engine = SyncEngine::new(MemoryStore::new(), "absent.md");
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame).unwrap();
    let t0 = Instant::now();

    engine.queue_local_edit(frame_id, "foo2", t0).unwrap();
    let commit_at = t0 + timing().debounce;
    let err = engine.tick(commit_at).unwrap_err();
    assert!(matches!(err, SyncError::Store(_)));

    // Inside the cooldown the guard still masks notifications.
    let echo = engine
        .handle_external_change(commit_at + Duration::from_millis(50))
        .unwrap();
    assert_eq!(echo, vec![SyncEvent::EchoSuppressed]);

    // After the cooldown the guard has released; the store error surfaces
    // instead of a silent suppression, so future syncs are not wedged.
    let err = engine
        .handle_external_change(commit_at + timing().cooldown)
        .unwrap_err();
    assert!(matches!(err, SyncError::Store(_)));
}

#[test]
fn detach_stops_refreshing_a_frame() {
    let mut engine = engine_with(TEXT);
    let frame = Arc::new(MockFrame::default());
    let frame_id = engine.attach_frame("A", frame.clone()).unwrap();
    engine.sync_frames().unwrap();

    assert!(engine.detach_frame(frame_id));
    assert!(!engine.detach_frame(frame_id));
    assert_eq!(engine.frame_count(), 0);

    engine
        .store_mut()
        .write_all(DOC, "# A\nchanged\n# B\nbar\n")
        .unwrap();
    let events = engine.handle_external_change(Instant::now()).unwrap();
    assert!(events.is_empty());
    assert_eq!(frame.refreshed(), vec!["foo".to_string()]);
}
