//! Window runtime.
//!
//! Owns the winit event loop and its windows and turns redraw requests into
//! display ticks for a [`core::App`](crate::core::App).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::window::CursorIcon;
