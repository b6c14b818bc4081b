// Behaviour of the list manager against an in-memory store and a recording view.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use stellar::controller::{
    ListManager, MSG_EMPTY_INPUT, MSG_EMPTY_LIST, MSG_LOAD_FAILED, MSG_REMOVE_FAILED,
    MSG_SAVE_FAILED, ManagerSettings,
};
use stellar::gateway::{PersistenceGateway, STORAGE_KEY};
use stellar::status::{Severity, StatusMessage};
use stellar::store::MemoryStore;
use stellar::timer::ManualClock;
use stellar::view::{Intent, ListView, Row};

#[derive(Default)]
struct RecordingView {
    rows: Vec<Row>,
    status: Option<StatusMessage>,
    renders: usize,
    input_cleared: usize,
    focused: usize,
}

impl ListView for RecordingView {
    fn render_list(&mut self, rows: &[Row]) {
        self.rows = rows.to_vec();
        self.renders += 1;
    }

    fn render_status(&mut self, status: Option<&StatusMessage>) {
        self.status = status.cloned();
    }

    fn clear_input(&mut self) {
        self.input_cleared += 1;
    }

    fn focus_input(&mut self) {
        self.focused += 1;
    }
}

impl RecordingView {
    fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    fn texts(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.text.as_str()).collect()
    }
}

struct Harness {
    manager: ListManager<RecordingView>,
    store: Rc<RefCell<MemoryStore>>,
    clock: ManualClock,
}

impl Harness {
    fn with_store(store: MemoryStore) -> Self {
        let store = Rc::new(RefCell::new(store));
        let clock = ManualClock::new();
        let manager = ListManager::initialize(
            PersistenceGateway::new(Box::new(store.clone())),
            RecordingView::default(),
            Box::new(clock.clone()),
            ManagerSettings::default(),
        );
        Self {
            manager,
            store,
            clock,
        }
    }

    fn empty() -> Self {
        Self::with_store(MemoryStore::new())
    }

    fn with_items(items: &[&str]) -> Self {
        let encoded = serde_json::to_string(items).unwrap();
        Self::with_store(MemoryStore::new().with_entry(STORAGE_KEY, &encoded))
    }

    fn stored(&self) -> Option<String> {
        self.store.borrow().raw(STORAGE_KEY).map(str::to_string)
    }

    fn advance(&mut self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.manager.tick();
    }

    fn view(&self) -> &RecordingView {
        self.manager.view()
    }
}

// --- Startup ---

#[test]
fn test_empty_store_shows_empty_state() {
    let h = Harness::empty();
    assert!(h.manager.is_empty());
    assert!(h.view().rows.is_empty());
    assert_eq!(h.view().renders, 1);
    assert_eq!(h.view().status_text(), Some(MSG_EMPTY_LIST));
    assert_eq!(h.manager.status().unwrap().severity, Severity::Info);
    assert!(!h.manager.status().unwrap().transient);
}

#[test]
fn test_existing_items_rendered_in_order() {
    let h = Harness::with_items(&["one", "two", "three"]);
    assert_eq!(h.view().texts(), vec!["one", "two", "three"]);
    let indices: Vec<usize> = h.view().rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(h.view().status, None);
}

#[test]
fn test_corrupt_store_is_repaired_silently() {
    let h = Harness::with_store(MemoryStore::new().with_entry(STORAGE_KEY, "{oops"));
    assert!(h.manager.is_empty());
    assert_eq!(h.stored().as_deref(), Some("[]"));
    assert_eq!(h.view().status_text(), Some(MSG_EMPTY_LIST));
}

#[test]
fn test_failed_repair_is_surfaced() {
    let mut store = MemoryStore::new().with_entry(STORAGE_KEY, "{\"not\":\"a list\"}");
    store.set_fail_writes(true);
    let h = Harness::with_store(store);

    assert!(h.manager.is_empty());
    let status = h.manager.status().unwrap();
    assert!(status.is_error());
    assert_eq!(status.text, "Error loading tasks. Storage might be corrupted.");
}

#[test]
fn test_unreadable_store_keeps_stored_tasks() {
    let mut store = MemoryStore::new().with_entry(STORAGE_KEY, "[\"precious\"]");
    store.set_fail_reads(true);
    let h = Harness::with_store(store);

    assert!(h.manager.is_empty());
    assert_eq!(h.view().status_text(), Some(MSG_LOAD_FAILED));
    assert!(h.manager.status().unwrap().is_error());
    assert_eq!(h.store.borrow().write_count(), 0);
    assert_eq!(h.stored().as_deref(), Some("[\"precious\"]"));
}

// --- Add ---

#[test]
fn test_add_appends_trimmed_text_last() {
    let mut h = Harness::with_items(&["first"]);
    h.manager.add_item("   second  ");

    assert_eq!(h.manager.items(), &["first".to_string(), "second".to_string()]);
    assert_eq!(h.stored().as_deref(), Some("[\"first\",\"second\"]"));
    assert_eq!(h.view().texts(), vec!["first", "second"]);
    assert_eq!(h.view().input_cleared, 1);
    assert_eq!(h.view().focused, 1);

    let status = h.manager.status().unwrap();
    assert_eq!(status.text, "Task \"second...\" added.");
    assert!(status.transient);
    assert!(!status.is_error());
}

#[test]
fn test_add_rejects_blank_input() {
    for raw in ["", "   ", "\t\n "] {
        let mut h = Harness::with_items(&["keep"]);
        let writes_before = h.store.borrow().write_count();

        h.manager.add_item(raw);

        assert_eq!(h.manager.len(), 1, "input: {:?}", raw);
        assert_eq!(h.store.borrow().write_count(), writes_before);
        assert_eq!(h.view().input_cleared, 0);
        assert_eq!(h.view().focused, 1);
        let status = h.manager.status().unwrap();
        assert!(status.is_error());
        assert_eq!(status.text, MSG_EMPTY_INPUT);
    }
}

#[test]
fn test_add_preview_is_truncated() {
    let mut h = Harness::empty();
    h.manager.add_item("Write the quarterly report for finance");
    assert_eq!(
        h.manager.status().unwrap().text,
        "Task \"Write the quarterly ...\" added."
    );
}

#[test]
fn test_success_message_clears_after_timeout() {
    let mut h = Harness::empty();
    h.manager.add_item("Buy milk");

    h.advance(2999);
    assert!(h.view().status_text().unwrap().contains("added"));

    h.advance(1);
    assert_eq!(h.view().status, None);
    assert_eq!(h.manager.status(), None);
}

// --- Remove ---

#[test]
fn test_remove_shifts_later_items() {
    let mut h = Harness::with_items(&["a", "b", "c", "d"]);
    h.manager.remove_item(1);

    assert_eq!(h.manager.items(), &["a", "c", "d"].map(String::from));
    assert_eq!(h.stored().as_deref(), Some("[\"a\",\"c\",\"d\"]"));
    let rows: Vec<(usize, &str)> = h
        .view()
        .rows
        .iter()
        .map(|r| (r.index, r.text.as_str()))
        .collect();
    assert_eq!(rows, vec![(0, "a"), (1, "c"), (2, "d")]);
    assert_eq!(h.manager.status().unwrap().text, "Task \"b...\" removed.");
}

#[test]
fn test_remove_out_of_range_is_rejected() {
    let mut h = Harness::with_items(&["a", "b"]);
    let writes_before = h.store.borrow().write_count();

    h.manager.remove_item(2);
    h.manager.remove_item(usize::MAX);

    assert_eq!(h.manager.len(), 2);
    assert_eq!(h.store.borrow().write_count(), writes_before);
    let status = h.manager.status().unwrap();
    assert!(status.is_error());
    assert_eq!(status.text, MSG_REMOVE_FAILED);
}

#[test]
fn test_stale_index_after_removal() {
    let mut h = Harness::with_items(&["a", "b"]);
    // Both remove controls were bound before the first click re-rendered.
    h.manager.dispatch(Intent::Remove(1));
    h.manager.dispatch(Intent::Remove(1));

    assert_eq!(h.manager.items(), &["a".to_string()]);
    assert_eq!(h.manager.status().unwrap().text, MSG_REMOVE_FAILED);
}

// --- Status timing ---

#[test]
fn test_old_timer_does_not_clear_newer_status() {
    let mut h = Harness::with_items(&["a"]);
    h.manager
        .set_status("A", Severity::Info, Some(Duration::from_millis(3000)));
    h.advance(1000);
    h.manager.set_status("B", Severity::Info, None);

    h.advance(2000);
    assert_eq!(h.view().status_text(), Some("B"));
    h.advance(60_000);
    assert_eq!(h.view().status_text(), Some("B"));
}

#[test]
fn test_error_after_success_is_persistent() {
    let mut h = Harness::empty();
    h.manager.add_item("x");
    h.advance(500);
    h.manager.add_item(" ");

    h.advance(5000);
    assert_eq!(h.view().status_text(), Some(MSG_EMPTY_INPUT));
}

// --- Storage failures ---

#[test]
fn test_save_failure_keeps_memory_state() {
    let mut h = Harness::with_items(&["a"]);
    h.store.borrow_mut().set_fail_writes(true);

    h.manager.add_item("b");

    assert_eq!(h.manager.items(), &["a".to_string(), "b".to_string()]);
    assert_eq!(h.view().texts(), vec!["a", "b"]);
    assert_eq!(h.stored().as_deref(), Some("[\"a\"]"));
    let status = h.manager.status().unwrap();
    assert!(status.is_error());
    assert_eq!(status.text, MSG_SAVE_FAILED);

    // Not retried on its own; the next mutation writes everything.
    h.advance(10_000);
    assert_eq!(h.stored().as_deref(), Some("[\"a\"]"));
    h.store.borrow_mut().set_fail_writes(false);
    h.manager.remove_item(0);
    assert_eq!(h.stored().as_deref(), Some("[\"b\"]"));
}

#[test]
fn test_save_failure_on_last_removal_is_not_hidden() {
    let mut h = Harness::with_items(&["only"]);
    h.store.borrow_mut().set_fail_writes(true);

    h.manager.remove_item(0);

    assert!(h.manager.is_empty());
    assert_eq!(h.view().status_text(), Some(MSG_SAVE_FAILED));
}

// --- Full scenario ---

#[test]
fn test_add_reject_remove_scenario() {
    let mut h = Harness::empty();
    assert_eq!(h.view().status_text(), Some(MSG_EMPTY_LIST));

    h.manager.dispatch(Intent::Submit("Buy milk".to_string()));
    assert_eq!(h.manager.items(), &["Buy milk".to_string()]);
    assert_eq!(h.stored().as_deref(), Some("[\"Buy milk\"]"));
    assert_eq!(h.view().rows.len(), 1);

    h.manager.dispatch(Intent::Submit("  ".to_string()));
    assert_eq!(h.manager.items(), &["Buy milk".to_string()]);
    assert!(h.manager.status().unwrap().is_error());

    h.manager.dispatch(Intent::Remove(0));
    assert!(h.manager.is_empty());
    assert_eq!(h.stored().as_deref(), Some("[]"));
    assert!(h.view().rows.is_empty());
    assert_eq!(h.view().status_text(), Some("Task \"Buy milk...\" removed."));

    h.advance(3000);
    assert_eq!(h.view().status_text(), Some(MSG_EMPTY_LIST));
}

#[test]
fn test_reload_reconstructs_list() {
    let mut h = Harness::empty();
    for t in ["alpha", "beta", "gamma"] {
        h.manager.add_item(t);
    }
    h.manager.remove_item(0);

    let stored = h.stored().unwrap();
    let reloaded = Harness::with_store(MemoryStore::new().with_entry(STORAGE_KEY, &stored));
    assert_eq!(reloaded.manager.items(), h.manager.items());
}
