//! Frame-driven task scheduling.
//!
//! A [`FrameClock`] owns a set of tick functions and runs each of them once per
//! call to [`FrameClock::advance`]. A tick returns [`TickFlow::Continue`] to be
//! invoked again next frame or [`TickFlow::Done`] to be dropped. Scheduling
//! returns a [`TaskHandle`] that can cancel the task at any time, including
//! from inside another task's tick.
//!
//! ## Ordering
//!
//! - Tasks scheduled while a frame is running first run on the *next* frame.
//! - Within a frame, tasks run in slot order.
//! - Work done outside `advance` (gesture handlers) is fully applied before the
//!   next frame's ticks observe it, since everything happens on one thread.
//!
//! ```
//! use std::time::Duration;
//! use sombrero_ui::frame_clock::{FrameClock, TickFlow};
//!
//! let clock = FrameClock::new();
//! let mut remaining = 2;
//! let handle = clock.schedule(move |_frame| {
//!     remaining -= 1;
//!     if remaining == 0 { TickFlow::Done } else { TickFlow::Continue }
//! });
//!
//! clock.advance(Duration::from_millis(16));
//! assert!(clock.is_scheduled(handle));
//! clock.advance(Duration::from_millis(32));
//! assert!(!clock.is_scheduled(handle));
//! ```

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};
use tracing::trace;

new_key_type! {
    struct TaskKey;
}

/// What a tick function wants to happen after it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// Run again on the next frame.
    Continue,
    /// Deschedule the task.
    Done,
}

/// Timing information handed to every tick of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Timestamp of this frame, relative to the host's time origin.
    pub now: Duration,
    /// Time since the previous frame; zero on the first frame.
    pub delta: Duration,
    /// One-based frame counter.
    pub frame: u64,
}

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    key: TaskKey,
}

type TickFn = Box<dyn FnMut(&FrameInfo) -> TickFlow + Send>;

struct TaskEntry {
    /// Taken out while the tick runs so the clock lock is not held.
    tick: Option<TickFn>,
    first_frame: u64,
}

#[derive(Default)]
struct ClockInner {
    tasks: SlotMap<TaskKey, TaskEntry>,
    frame: u64,
    last_now: Option<Duration>,
}

/// Shared per-frame scheduler.
///
/// Cloning yields another handle to the same clock, so tick functions can
/// capture a clone and schedule follow-up work.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl FrameClock {
    /// Creates an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `tick` to run once per frame until it returns
    /// [`TickFlow::Done`] or the returned handle is cancelled.
    pub fn schedule<F>(&self, tick: F) -> TaskHandle
    where
        F: FnMut(&FrameInfo) -> TickFlow + Send + 'static,
    {
        let mut inner = self.inner.lock();
        let first_frame = inner.frame + 1;
        let key = inner.tasks.insert(TaskEntry {
            tick: Some(Box::new(tick)),
            first_frame,
        });
        trace!(?key, first_frame, "task scheduled");
        TaskHandle { key }
    }

    /// Cancels a task. Returns `false` if it had already finished.
    pub fn cancel(&self, handle: TaskHandle) -> bool {
        let removed = self.inner.lock().tasks.remove(handle.key).is_some();
        if removed {
            trace!(key = ?handle.key, "task cancelled");
        }
        removed
    }

    /// Whether the task is still scheduled.
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.inner.lock().tasks.contains_key(handle.key)
    }

    /// Number of scheduled tasks.
    pub fn task_count(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    /// Index of the last frame that was run.
    pub fn frame(&self) -> u64 {
        self.inner.lock().frame
    }

    /// Runs one frame at timestamp `now` and returns how many ticks ran.
    ///
    /// `now` is expected to be monotonic; a timestamp earlier than the
    /// previous one yields a zero `delta`.
    pub fn advance(&self, now: Duration) -> usize {
        let (info, due) = {
            let mut inner = self.inner.lock();
            inner.frame += 1;
            let delta = inner
                .last_now
                .map(|last| now.saturating_sub(last))
                .unwrap_or_default();
            inner.last_now = Some(now);
            let frame = inner.frame;
            let due: Vec<TaskKey> = inner
                .tasks
                .iter()
                .filter(|(_, entry)| entry.first_frame <= frame)
                .map(|(key, _)| key)
                .collect();
            (FrameInfo { now, delta, frame }, due)
        };

        let mut ran = 0;
        for key in due {
            let tick = match self.inner.lock().tasks.get_mut(key) {
                Some(entry) => entry.tick.take(),
                None => continue,
            };
            let Some(mut tick) = tick else {
                continue;
            };

            let flow = tick(&info);
            ran += 1;

            let mut inner = self.inner.lock();
            match flow {
                TickFlow::Continue => {
                    // A task cancelled during its own tick has no entry left.
                    if let Some(entry) = inner.tasks.get_mut(key) {
                        entry.tick = Some(tick);
                    }
                }
                TickFlow::Done => {
                    inner.tasks.remove(key);
                    trace!(?key, frame = info.frame, "task done");
                }
            }
        }
        ran
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("FrameClock")
            .field("frame", &inner.frame)
            .field("tasks", &inner.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn continue_keeps_task_alive_until_done() {
        let clock = FrameClock::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = clock.schedule(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                TickFlow::Continue
            } else {
                TickFlow::Done
            }
        });

        for frame in 1..=5 {
            clock.advance(ms(frame * 16));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!clock.is_scheduled(handle));
        assert_eq!(clock.task_count(), 0);
    }

    #[test]
    fn frame_info_reports_delta() {
        let clock = FrameClock::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        clock.schedule(move |info| {
            sink.lock().push(*info);
            TickFlow::Continue
        });

        clock.advance(ms(100));
        clock.advance(ms(116));

        let seen = seen.lock();
        assert_eq!(seen[0].delta, Duration::ZERO);
        assert_eq!(seen[0].frame, 1);
        assert_eq!(seen[1].delta, ms(16));
        assert_eq!(seen[1].now, ms(116));
    }

    #[test]
    fn cancel_stops_future_ticks() {
        let clock = FrameClock::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = clock.schedule(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            TickFlow::Continue
        });

        clock.advance(ms(16));
        assert!(clock.cancel(handle));
        assert!(!clock.cancel(handle));
        clock.advance(ms(32));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn task_can_cancel_itself_mid_tick() {
        let clock = FrameClock::new();
        let handle_slot: Arc<Mutex<Option<TaskHandle>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let inner_clock = clock.clone();
        let inner_slot = Arc::clone(&handle_slot);
        let counter = Arc::clone(&calls);
        let handle = clock.schedule(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(handle) = *inner_slot.lock() {
                inner_clock.cancel(handle);
            }
            TickFlow::Continue
        });
        *handle_slot.lock() = Some(handle);

        clock.advance(ms(16));
        clock.advance(ms(32));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!clock.is_scheduled(handle));
    }

    #[test]
    fn tasks_scheduled_during_a_frame_start_next_frame() {
        let clock = FrameClock::new();
        let child_calls = Arc::new(AtomicUsize::new(0));

        let spawner = clock.clone();
        let counter = Arc::clone(&child_calls);
        clock.schedule(move |_| {
            let counter = Arc::clone(&counter);
            spawner.schedule(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                TickFlow::Done
            });
            TickFlow::Done
        });

        assert_eq!(clock.advance(ms(16)), 1);
        assert_eq!(child_calls.load(Ordering::SeqCst), 0);
        assert_eq!(clock.advance(ms(32)), 1);
        assert_eq!(child_calls.load(Ordering::SeqCst), 1);
        assert_eq!(clock.task_count(), 0);
    }
}
