//! Time subsystem.
//!
//! - [`FrameClock`] produces one [`FrameTime`] per display tick.
//! - [`Timing`] turns wall-clock instants into eased, iteration-aware progress.
//!
//! Nothing here reads the system clock implicitly except `FrameClock::tick`;
//! every other entry point takes an explicit `Instant`, which keeps animation
//! behavior reproducible under a simulated clock.

mod easing;
mod frame_clock;
mod timing;

pub use easing::Easing;
pub use frame_clock::{FrameClock, FrameTime};
pub use timing::{Iterations, Timing, TimingConfig};
