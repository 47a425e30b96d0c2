//! Render-task contract and the surface abstraction it draws through.
//!
//! Responsibilities:
//! - define what a drawable task must provide ([`RenderTask`])
//! - define what a host surface must provide ([`Surface`], [`DrawContext`])
//! - carry dirty notifications from tasks to the viewport ([`DirtyChannel`])
//! - record drawing for headless hosts ([`recording`])

mod dirty;
mod surface;
mod task;

pub mod recording;

pub use dirty::{DirtyChannel, ListenerId, RedrawFlag};
pub use surface::{DrawContext, Surface};
pub use task::{PointerContext, RenderTask, TaskId, TaskRef, same_task};
