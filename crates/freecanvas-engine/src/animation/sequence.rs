use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::time::Timing;

use super::{AnimationControl, AnimationFrame, AnimationHandle, Animator, FrameScheduler};

type StepUpdate<T> = Box<dyn FnMut(&mut T, AnimationFrame<'_>) -> AnimationControl>;

/// One animation run inside a [`Sequence`].
pub struct SequenceStep<T> {
    animator: Animator,
    update: StepUpdate<T>,
}

impl<T> SequenceStep<T> {
    pub fn new<F, R>(animator: Animator, mut update: F) -> Self
    where
        F: FnMut(&mut T, AnimationFrame<'_>) -> R + 'static,
        R: Into<AnimationControl>,
    {
        Self {
            animator,
            update: Box::new(move |target, frame| update(target, frame).into()),
        }
    }

    #[inline]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

impl<T> fmt::Debug for SequenceStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceStep")
            .field("animator", &self.animator)
            .finish_non_exhaustive()
    }
}

/// Animations played back to back on one target.
///
/// Steps are pulled lazily: the next one is produced only when the previous
/// run has ended, so an unbounded or data-dependent chain (a bounce whose
/// height decays until it falls below a threshold) is just an iterator that
/// eventually returns `None`.
///
/// A step that stops early (`false` / [`AnimationControl::Stop`]) ends only
/// that step; the sequence moves on to the next one.
pub struct Sequence<T> {
    steps: Box<dyn Iterator<Item = SequenceStep<T>>>,
}

impl<T: 'static> Sequence<T> {
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = SequenceStep<T>>,
        I::IntoIter: 'static,
    {
        Self {
            steps: Box::new(steps.into_iter()),
        }
    }

    /// Starts the first step now.
    ///
    /// The handle resolves with the timing of the last step's final frame.
    /// Returns `None`, without touching the target, when there are no steps.
    pub fn play(mut self, scheduler: &FrameScheduler, target: T) -> Option<AnimationHandle> {
        let first = self.steps.next()?;
        let handle = AnimationHandle::pending();
        let chain = Chain {
            rest: self.steps,
            scheduler: scheduler.clone(),
            handle: handle.clone(),
        };
        chain.play(first, target);
        Some(handle)
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

/// What a sequence still has to play once the current step ends.
struct Chain<T> {
    rest: Box<dyn Iterator<Item = SequenceStep<T>>>,
    scheduler: FrameScheduler,
    handle: AnimationHandle,
}

/// Where the target goes when a step ends.
enum Handoff<T> {
    /// The step is still inside its first frame.
    Starting,
    /// The step ended during its first frame.
    Ended(T, Timing),
    /// The step is waiting on the scheduler; its end resumes the chain.
    Waiting(Chain<T>),
}

impl<T: 'static> Chain<T> {
    /// Plays `step`, then keeps pulling steps for as long as each one ends
    /// within its first frame. Returns once a step is waiting on the scheduler
    /// or the steps run out.
    fn play(mut self, mut step: SequenceStep<T>, mut target: T) {
        loop {
            let SequenceStep { animator, update } = step;
            let handoff = Rc::new(RefCell::new(Handoff::Starting));
            let on_done = Rc::clone(&handoff);

            animator.run(&self.scheduler, target, update, move |target, timing: Timing| {
                let prev = mem::replace(&mut *on_done.borrow_mut(), Handoff::Starting);
                match prev {
                    Handoff::Waiting(chain) => chain.step_ended(target, timing),
                    _ => *on_done.borrow_mut() = Handoff::Ended(target, timing),
                }
            });

            let prev = mem::replace(&mut *handoff.borrow_mut(), Handoff::Starting);
            match prev {
                Handoff::Ended(ended, timing) => match self.rest.next() {
                    Some(next) => {
                        step = next;
                        target = ended;
                    }
                    None => {
                        self.handle.resolve(timing);
                        return;
                    }
                },
                _ => {
                    *handoff.borrow_mut() = Handoff::Waiting(self);
                    return;
                }
            }
        }
    }

    fn step_ended(mut self, target: T, timing: Timing) {
        match self.rest.next() {
            Some(next) => self.play(next, target),
            None => self.handle.resolve(timing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::time::{FrameClock, TimingConfig};

    fn animator(ms: u64) -> Animator {
        Animator::new(TimingConfig::new(Duration::from_millis(ms))).unwrap()
    }

    fn drive(scheduler: &FrameScheduler, t0: Instant, every_ms: u64, ticks: u64) {
        let mut clock = FrameClock::starting_at(t0);
        for k in 1..=ticks {
            scheduler.tick(clock.tick_at(t0 + Duration::from_millis(k * every_ms)));
        }
    }

    #[test]
    fn empty_sequence_yields_no_handle() {
        let scheduler = FrameScheduler::new();
        let seq: Sequence<()> = Sequence::new(Vec::new());
        assert!(seq.play(&scheduler, ()).is_none());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn steps_run_back_to_back() {
        let t0 = Instant::now();
        let scheduler = FrameScheduler::starting_at(t0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let shared = Rc::clone(&log);
        let steps = ["a", "b"].into_iter().map(move |name| {
            let log = Rc::clone(&shared);
            SequenceStep::new(animator(20), move |_: &mut (), f: AnimationFrame<'_>| {
                log.borrow_mut().push((name, f.frame_index));
            })
        });
        let handle = Sequence::new(steps).play(&scheduler, ()).unwrap();

        drive(&scheduler, t0, 10, 4);

        assert!(handle.is_complete());
        assert_eq!(
            *log.borrow(),
            vec![("a", 0), ("a", 1), ("a", 2), ("b", 0), ("b", 1), ("b", 2)]
        );
    }

    #[test]
    fn stop_ends_only_the_current_step() {
        let t0 = Instant::now();
        let scheduler = FrameScheduler::starting_at(t0);

        let steps = vec![
            SequenceStep::new(animator(1000), |v: &mut Vec<u8>, _: AnimationFrame<'_>| {
                v.push(1);
                false
            }),
            SequenceStep::new(animator(10), |v: &mut Vec<u8>, _: AnimationFrame<'_>| {
                v.push(2);
            }),
        ];
        let out = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&out);
        let steps = steps.into_iter().chain(std::iter::once(SequenceStep::new(
            animator(10),
            move |v: &mut Vec<u8>, f: AnimationFrame<'_>| {
                if f.timing.is_finished() {
                    sink.borrow_mut().extend(v.iter().copied());
                }
            },
        )));

        let handle = Sequence::new(steps).play(&scheduler, Vec::new()).unwrap();
        drive(&scheduler, t0, 10, 3);

        assert!(handle.is_complete());
        assert_eq!(*out.borrow(), vec![1, 2, 2]);
    }

    #[test]
    fn lazily_generated_decaying_chain() {
        let t0 = Instant::now();
        let scheduler = FrameScheduler::starting_at(t0);

        let durations = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&durations);
        let steps = std::iter::successors(Some(80u64), |ms| Some(ms / 2))
            .take_while(|ms| *ms >= 10)
            .map(move |ms| {
                seen.borrow_mut().push(ms);
                SequenceStep::new(animator(ms), |_: &mut (), _: AnimationFrame<'_>| {})
            });

        let handle = Sequence::new(steps).play(&scheduler, ()).unwrap();
        // Only the first step has been produced so far.
        assert_eq!(*durations.borrow(), vec![80]);

        drive(&scheduler, t0, 10, 20);
        assert!(handle.is_complete());
        assert_eq!(*durations.borrow(), vec![80, 40, 20, 10]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn long_run_of_instant_steps_does_not_grow_the_stack() {
        let t0 = Instant::now();
        let scheduler = FrameScheduler::starting_at(t0);
        let step = animator(1000);

        let steps = (0..200_000).map(move |_| {
            SequenceStep::new(step.clone(), |n: &mut u32, _: AnimationFrame<'_>| {
                *n += 1;
                false
            })
        });
        let counted = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&counted);
        let tail = std::iter::once(SequenceStep::new(
            animator(10),
            move |n: &mut u32, _: AnimationFrame<'_>| {
                *sink.borrow_mut() = *n;
            },
        ));

        let handle = Sequence::new(steps.chain(tail)).play(&scheduler, 0).unwrap();
        assert!(!handle.is_complete());
        assert_eq!(*counted.borrow(), 200_000);

        drive(&scheduler, t0, 10, 1);
        assert!(handle.is_complete());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn instant_final_step_resolves_during_play() {
        let scheduler = FrameScheduler::new();
        let steps = (0..3).map(|_| SequenceStep::new(animator(50), |_: &mut (), _: AnimationFrame<'_>| false));

        let handle = Sequence::new(steps).play(&scheduler, ()).unwrap();
        assert!(handle.is_complete());
        assert_eq!(handle.timing().unwrap().elapsed(), Duration::ZERO);
        assert!(scheduler.is_idle());
    }
}
