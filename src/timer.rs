// One-shot deferred tasks driven by the owner's event loop.
//
// Nothing runs on its own: the loop asks `fire_due` which tasks have come due
// and reacts to the returned ids. A `ScheduledTask` handle cancels its entry.
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

pub type TimerId = u64;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<RefCell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(RefCell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.borrow_mut();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.borrow()
    }
}

/// Handle to a pending entry in a `TimerQueue`.
#[derive(Debug)]
pub struct ScheduledTask {
    id: TimerId,
    cancelled: Rc<Cell<bool>>,
}

impl ScheduledTask {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[derive(Debug)]
struct Entry {
    id: TimerId,
    deadline: Instant,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: TimerId,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) -> ScheduledTask {
        self.next_id += 1;
        let cancelled = Rc::new(Cell::new(false));
        self.entries.push(Entry {
            id: self.next_id,
            deadline: now + delay,
            cancelled: cancelled.clone(),
        });
        ScheduledTask {
            id: self.next_id,
            cancelled,
        }
    }

    /// Removes every entry due at `now` and returns the uncancelled ones,
    /// earliest deadline first.
    pub fn fire_due(&mut self, now: Instant) -> Vec<TimerId> {
        self.entries.retain(|e| !e.cancelled.get());

        let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
            self.entries.drain(..).partition(|e| e.deadline <= now);
        self.entries = pending;

        due.sort_by_key(|e| (e.deadline, e.id));
        due.into_iter().map(|e| e.id).collect()
    }

    /// Earliest deadline among live entries.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter(|e| !e.cancelled.get())
            .map(|e| e.deadline)
            .min()
    }

    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.cancelled.get()).count()
    }
}
