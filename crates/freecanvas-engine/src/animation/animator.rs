use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Instant;

use crate::error::AnimationError;
use crate::time::{Timing, TimingConfig};

use super::FrameScheduler;

/// Directive returned by an animation update callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AnimationControl {
    Continue,
    /// End the animation after this frame, finished or not.
    Stop,
}

impl From<()> for AnimationControl {
    #[inline]
    fn from(_: ()) -> Self {
        Self::Continue
    }
}

impl From<bool> for AnimationControl {
    /// `false` stops; `true` continues.
    #[inline]
    fn from(keep_going: bool) -> Self {
        if keep_going { Self::Continue } else { Self::Stop }
    }
}

/// Per-call data handed to an update callback next to its target.
#[derive(Debug, Copy, Clone)]
pub struct AnimationFrame<'a> {
    /// 0 on the first call, +1 on every following tick.
    pub frame_index: u64,
    /// Timing sampled at this tick.
    pub timing: &'a Timing,
}

/// Drives an update callback once per scheduler tick against a [`Timing`].
///
/// An `Animator` is a reusable configuration; every [`animate`](Self::animate)
/// call starts an independent run with its own `Timing`. Runs never coordinate:
/// two runs writing the same field simply overwrite each other in tick order.
///
/// ```rust,ignore
/// let spin = Animator::new(TimingConfig::new(Duration::from_secs(1)).infinite())?;
/// spin.animate(&scheduler, square.clone(), |square, frame| {
///     square.borrow_mut().set_rotation(FRAC_PI_2 * frame.timing.p());
/// });
/// ```
#[derive(Debug, Clone)]
pub struct Animator {
    config: TimingConfig,
}

impl Animator {
    /// Fails on a zero duration or a non-positive iteration count.
    pub fn new(config: TimingConfig) -> Result<Self, AnimationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Starts a run on `target`.
    ///
    /// `update` is called immediately (frame 0, at the scheduler's current
    /// time), then once per tick. The run ends after the first call that returns
    /// `false` / [`AnimationControl::Stop`], or after the call during which the
    /// timing reports finished. That final call sees `timing.p() == 1.0` when
    /// the run finished normally. The returned handle resolves with the timing
    /// of the final call.
    pub fn animate<T, F, R>(&self, scheduler: &FrameScheduler, target: T, update: F) -> AnimationHandle
    where
        T: 'static,
        F: FnMut(&mut T, AnimationFrame<'_>) -> R + 'static,
        R: Into<AnimationControl>,
    {
        let handle = AnimationHandle::pending();
        let completion = handle.clone();
        self.run(scheduler, target, update, move |_, timing| completion.resolve(timing));
        handle
    }

    /// Like `animate`, but hands the target back to `done` on completion.
    pub(crate) fn run<T, F, R, D>(&self, scheduler: &FrameScheduler, target: T, update: F, done: D)
    where
        T: 'static,
        F: FnMut(&mut T, AnimationFrame<'_>) -> R + 'static,
        R: Into<AnimationControl>,
        D: FnOnce(T, Timing) + 'static,
    {
        let now = scheduler.now();
        let run = Run {
            target,
            update,
            timing: Timing::started(self.config.clone(), now),
            frame_index: 0,
            done,
        };
        step(run, scheduler.clone(), now);
    }
}

struct Run<T, F, D> {
    target: T,
    update: F,
    timing: Timing,
    frame_index: u64,
    done: D,
}

fn step<T, F, R, D>(mut run: Run<T, F, D>, scheduler: FrameScheduler, now: Instant)
where
    T: 'static,
    F: FnMut(&mut T, AnimationFrame<'_>) -> R + 'static,
    R: Into<AnimationControl>,
    D: FnOnce(T, Timing) + 'static,
{
    run.timing.advance_to(now);

    let frame = AnimationFrame {
        frame_index: run.frame_index,
        timing: &run.timing,
    };
    let control: AnimationControl = (run.update)(&mut run.target, frame).into();

    run.frame_index += 1;

    if control == AnimationControl::Continue && !run.timing.is_finished() {
        let next = scheduler.clone();
        scheduler.request_frame(move |ft| step(run, next, ft.now));
    } else {
        log::trace!(
            "animation ended after {} frames (finished: {})",
            run.frame_index,
            run.timing.is_finished()
        );
        (run.done)(run.target, run.timing);
    }
}

struct Completion {
    timing: Option<Timing>,
    waker: Option<Waker>,
}

/// Awaitable completion of one animation run.
///
/// Resolves with the [`Timing`] of the run's final frame. Clones observe the
/// same run. The handle never drives the animation; the scheduler does.
#[derive(Clone)]
pub struct AnimationHandle {
    shared: Rc<RefCell<Completion>>,
}

impl AnimationHandle {
    pub(crate) fn pending() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Completion {
                timing: None,
                waker: None,
            })),
        }
    }

    pub(crate) fn resolve(&self, timing: Timing) {
        let waker = {
            let mut c = self.shared.borrow_mut();
            c.timing = Some(timing);
            c.waker.take()
        };
        if let Some(w) = waker {
            w.wake();
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.shared.borrow().timing.is_some()
    }

    /// Final timing, once complete.
    pub fn timing(&self) -> Option<Timing> {
        self.shared.borrow().timing.clone()
    }
}

impl Future for AnimationHandle {
    type Output = Timing;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Timing> {
        let mut c = self.shared.borrow_mut();
        match &c.timing {
            Some(t) => Poll::Ready(t.clone()),
            None => {
                c.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("complete", &self.is_complete())
            .finish()
    }
}
