//! Surface controller.
//!
//! - [`Viewport`] owns the model-to-screen transform, the render-task registry,
//!   pointer/wheel navigation and the dirty-driven redraw.
//! - [`FrameLoop`] ties a viewport to a [`FrameScheduler`] and a clock so that
//!   animation steps and redraws happen once per display tick.
//!
//! [`FrameScheduler`]: crate::animation::FrameScheduler

mod config;
mod frame_loop;
mod viewport;

pub use config::ViewportConfig;
pub use frame_loop::{FrameLoop, FrameReport};
pub use viewport::Viewport;
