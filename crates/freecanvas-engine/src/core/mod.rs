//! Host-facing contracts of the window runtime.
//!
//! A host implements [`App`]; the runtime calls it with a [`FrameCtx`] once per
//! display tick. Nothing here depends on how the host draws.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
