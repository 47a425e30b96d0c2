//! Frame-driven animation.
//!
//! - [`FrameScheduler`] queues callbacks for the next display tick.
//! - [`Animator`] runs an update callback once per tick until its timing
//!   finishes or the callback asks to stop.
//! - [`Sequence`] plays animators back to back on one target.
//!
//! Completion is observable through [`AnimationHandle`], which is also a
//! `Future`. Awaiting it only makes sense from code that is itself driven by
//! the same scheduler ticks.

mod animator;
mod scheduler;
mod sequence;

pub use animator::{AnimationControl, AnimationFrame, AnimationHandle, Animator};
pub use scheduler::FrameScheduler;
pub use sequence::{Sequence, SequenceStep};
