//! Construction-time errors.
//!
//! Per-frame work never returns these; geometry edge cases are absorbed with
//! defined fallback values instead.

use std::time::Duration;

/// Errors raised while building a [`Viewport`](crate::canvas::Viewport).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// The surface could not hand out a 2D drawing context.
    #[error("canvas context is not supported by this surface")]
    UnsupportedSurface,

    /// Zoom limits must be finite, positive and ordered.
    #[error("invalid zoom limits [{min}, {max}]")]
    InvalidZoomLimits { min: f64, max: f64 },

    /// Per-notch wheel factors must be finite and positive.
    #[error("invalid zoom factor {0}")]
    InvalidZoomFactor(f64),
}

/// Errors raised while configuring an animation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    #[error("animation duration must be positive, got {0:?}")]
    ZeroDuration(Duration),

    #[error("iteration count must be a positive number, got {0}")]
    InvalidIterations(f64),

    /// Bézier easing control points: `x` in `[0, 1]`, `y` finite.
    #[error("invalid cubic Bezier control points ({x1}, {y1}), ({x2}, {y2})")]
    InvalidBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}
