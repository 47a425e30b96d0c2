//! Coordinate and geometry types shared by the viewport and render tasks.
//!
//! Two spaces are involved:
//! - model space: where task geometry is authored, +Y up
//! - screen space: logical pixels of the surface, origin top-left, +Y down
//!
//! The viewport's [`Matrix3`] maps model space to screen space.

mod bound;
mod matrix3;
mod size;
mod vec2;

pub use bound::Bound;
pub use matrix3::{Matrix3, RenderTransform};
pub use size::SurfaceSize;
pub use vec2::{DEFAULT_TOLERANCE, Vec2};
