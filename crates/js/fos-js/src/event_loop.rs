//! Event Loop Implementation
//!
//! Single-threaded cooperative loop: timers become macrotasks once due, and
//! a task queued while the current tick runs only becomes runnable on the
//! next `tick`.

use std::collections::VecDeque;

/// Task in the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task<T> {
    pub id: u32,
    pub payload: T,
}

/// Timer task
#[derive(Debug, Clone)]
struct Timer<T> {
    id: u32,
    payload: T,
    delay_ms: u64,
    scheduled_at: u64,
}

impl<T> Timer<T> {
    fn due_at(&self) -> u64 {
        self.scheduled_at + self.delay_ms
    }
}

/// Cooperative event loop
#[derive(Debug)]
pub struct EventLoop<T> {
    /// Macrotask queue (due timers)
    macrotasks: VecDeque<Task<T>>,
    /// Pending timers
    timers: Vec<Timer<T>>,
    /// Next timer ID
    next_timer_id: u32,
    /// Current timestamp (ms)
    current_time: u64,
    /// A turn is being run
    running: bool,
}

impl<T> Default for EventLoop<T> {
    fn default() -> Self {
        Self {
            macrotasks: VecDeque::new(),
            timers: Vec::new(),
            next_timer_id: 1,
            current_time: 0,
            running: false,
        }
    }
}

impl<T> EventLoop<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `payload` once after `delay_ms`, on a future tick
    pub fn set_timeout(&mut self, payload: T, delay_ms: u64) -> u32 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        self.timers.push(Timer {
            id,
            payload,
            delay_ms,
            scheduled_at: self.current_time,
        });
        tracing::trace!(timer = id, delay_ms, "timer scheduled");
        id
    }

    /// Advance time and move due timers to the macrotask queue, earliest
    /// deadline first and in scheduling order among equal deadlines.
    /// Returns how many timers became due.
    pub fn tick(&mut self, delta_ms: u64) -> usize {
        self.current_time += delta_ms;
        let now = self.current_time;

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.due_at() <= now);
        self.timers = pending;

        due.sort_by_key(|t| (t.due_at(), t.id));
        let count = due.len();
        self.macrotasks.extend(due.into_iter().map(|t| Task {
            id: t.id,
            payload: t.payload,
        }));
        count
    }

    /// Mark the start of a turn. Returns `false` when a turn is already
    /// running; the caller must not run tasks then.
    pub fn begin_turn(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    pub fn end_turn(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get next macrotask (if any)
    pub fn next_macrotask(&mut self) -> Option<Task<T>> {
        self.macrotasks.pop_front()
    }

    /// Check if there's pending work
    pub fn has_pending_work(&self) -> bool {
        !self.macrotasks.is_empty() || !self.timers.is_empty()
    }

    /// Timers not yet due
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Get current time
    pub fn current_time(&self) -> u64 {
        self.current_time
    }
}
