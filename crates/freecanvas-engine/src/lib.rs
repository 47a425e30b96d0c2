//! freecanvas engine.
//!
//! Pan/zoom/fit navigation over a 2D model space, dirty-driven redraw of
//! registered render tasks, and frame-driven animation with easing.
//!
//! Layout:
//! - [`coords`]: vectors, bounds and the model-to-screen [`coords::Matrix3`]
//! - [`render`]: the render-task and surface contracts
//! - [`canvas`]: the [`canvas::Viewport`] and its per-tick [`canvas::FrameLoop`]
//! - [`time`] and [`animation`]: timing, easing, scheduling and animators
//! - [`input`], [`core`], [`window`]: platform input and the winit host runtime

pub mod animation;
pub mod canvas;
pub mod coords;
pub mod core;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;
