use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::time::FrameTime;

type FrameCallback = Box<dyn FnOnce(FrameTime)>;

struct SchedulerState {
    now: Instant,
    last_frame: u64,
    pending: Vec<FrameCallback>,
}

/// Once-per-tick callback queue (the `requestAnimationFrame` of this crate).
///
/// Callbacks requested during a tick are deferred to the next tick, so a
/// callback that re-requests itself runs exactly once per tick. Clones share
/// the same queue; everything is single-threaded.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerState>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Scheduler whose clock reads `now` until the first tick.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerState {
                now,
                last_frame: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// Timestamp of the latest tick.
    #[inline]
    pub fn now(&self) -> Instant {
        self.inner.borrow().now
    }

    /// A `FrameTime` for work started between ticks (at [`now`](Self::now)).
    pub fn current_frame(&self) -> FrameTime {
        let s = self.inner.borrow();
        FrameTime {
            dt: Duration::ZERO,
            now: s.now,
            frame_index: s.last_frame,
        }
    }

    /// Queues `callback` for the next tick.
    pub fn request_frame<F>(&self, callback: F)
    where
        F: FnOnce(FrameTime) + 'static,
    {
        self.inner.borrow_mut().pending.push(Box::new(callback));
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Runs every callback queued before this call, in request order.
    ///
    /// Returns how many callbacks ran.
    pub fn tick(&self, time: FrameTime) -> usize {
        let batch = {
            let mut s = self.inner.borrow_mut();
            s.now = time.now;
            s.last_frame = time.frame_index;
            std::mem::take(&mut s.pending)
        };

        let ran = batch.len();
        for callback in batch {
            callback(time);
        }

        log::trace!("scheduler tick {}: {ran} callbacks", time.frame_index);
        ran
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("now", &s.now)
            .field("pending", &s.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::time::FrameClock;

    #[test]
    fn callbacks_run_on_next_tick_in_order() {
        let t0 = Instant::now();
        let scheduler = FrameScheduler::starting_at(t0);
        let mut clock = FrameClock::starting_at(t0);
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = Rc::clone(&log);
            scheduler.request_frame(move |_| log.borrow_mut().push(i));
        }
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.pending(), 3);

        let ft = clock.tick_at(t0 + Duration::from_millis(16));
        assert_eq!(scheduler.tick(ft), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.now(), ft.now);
    }

    #[test]
    fn rerequest_is_deferred_to_following_tick() {
        let t0 = Instant::now();
        let scheduler = FrameScheduler::starting_at(t0);
        let mut clock = FrameClock::starting_at(t0);
        let runs = Rc::new(Cell::new(0));

        fn again(s: FrameScheduler, runs: Rc<Cell<u32>>) {
            let next = s.clone();
            s.request_frame(move |_| {
                runs.set(runs.get() + 1);
                again(next, runs);
            });
        }
        again(scheduler.clone(), Rc::clone(&runs));

        for i in 1..=5 {
            scheduler.tick(clock.tick_at(t0 + Duration::from_millis(16 * i)));
            assert_eq!(runs.get(), i as u32);
        }
        assert_eq!(scheduler.pending(), 1);
    }
}
