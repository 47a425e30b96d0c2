use std::fmt;
use std::rc::Rc;

use crate::error::AnimationError;

/// Easing curve mapping linear progress in `[0, 1]` to eased progress.
///
/// Output is not clamped: overshooting curves (e.g. a Bézier with control
/// points outside the unit square) may leave `[0, 1]`.
#[derive(Clone, Default)]
pub enum Easing {
    /// `p`
    #[default]
    Linear,

    /// `p²`, accelerating.
    QuadIn,

    /// `p·(2 − p)`, decelerating.
    QuadOut,

    /// Quadratic ease-in for the first half, ease-out for the second.
    QuadInOut,

    /// CSS-style cubic Bézier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    ///
    /// Built with [`Easing::cubic_bezier`]. `x1`/`x2` outside `[0, 1]` are
    /// clamped when evaluated.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// Caller-supplied curve.
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Custom cubic Bézier easing.
    ///
    /// `x1` and `x2` must lie in `[0, 1]` so the curve stays a function of
    /// time; `y1` and `y2` may be any finite value.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, AnimationError> {
        let unit = 0.0..=1.0;
        if !(unit.contains(&x1) && unit.contains(&x2) && y1.is_finite() && y2.is_finite()) {
            return Err(AnimationError::InvalidBezier { x1, y1, x2, y2 });
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        Self::Custom(Rc::new(f))
    }

    /// Evaluates the curve at `p` (clamped into `[0, 1]`).
    pub fn evaluate(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);

        match self {
            Self::Linear => p,
            Self::QuadIn => p * p,
            Self::QuadOut => p * (2.0 - p),
            Self::QuadInOut => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    -1.0 + (4.0 - 2.0 * p) * p
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => {
                cubic_bezier(x1.clamp(0.0, 1.0), *y1, x2.clamp(0.0, 1.0), *y2, p)
            }
            Self::Custom(f) => f(p),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::QuadIn => f.write_str("QuadIn"),
            Self::QuadOut => f.write_str("QuadOut"),
            Self::QuadInOut => f.write_str("QuadInOut"),
            Self::CubicBezier { x1, y1, x2, y2 } => f
                .debug_struct("CubicBezier")
                .field("x1", x1)
                .field("y1", y1)
                .field("x2", x2)
                .field("y2", y2)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

/// Newton-Raphson on x(t) = progress, with a bisection fallback for flat spots.
fn solve_bezier_x(x1: f64, x2: f64, target: f64) -> f64 {
    let mut t = target;

    for _ in 0..8 {
        let x = bezier_component(x1, x2, t) - target;
        if x.abs() < 1e-7 {
            return t;
        }

        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-7 {
            break;
        }

        t = (t - x / dx).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = target;
    for _ in 0..32 {
        let x = bezier_component(x1, x2, t);
        if (x - target).abs() < 1e-7 {
            break;
        }
        if x < target {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }

    t
}

/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`
#[inline]
fn bezier_component(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn linear_is_identity() {
        for p in [0.0, 0.25, 0.5, 0.999] {
            assert_eq!(Easing::Linear.evaluate(p), p);
        }
    }

    #[test]
    fn quadratic_curves() {
        assert!((Easing::QuadIn.evaluate(0.5) - 0.25).abs() < EPS);
        assert!((Easing::QuadOut.evaluate(0.5) - 0.75).abs() < EPS);
        assert!((Easing::QuadInOut.evaluate(0.25) - 0.125).abs() < EPS);
        assert!((Easing::QuadInOut.evaluate(0.75) - 0.875).abs() < EPS);
    }

    #[test]
    fn bezier_endpoints_and_linear_case() {
        let e = Easing::cubic_bezier(0.42, 0.0, 0.58, 1.0).unwrap();
        assert_eq!(e.evaluate(0.0), 0.0);
        assert_eq!(e.evaluate(1.0), 1.0);
        assert!((e.evaluate(0.5) - 0.5).abs() < 1e-4);

        let straight = Easing::cubic_bezier(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0).unwrap();
        assert!((straight.evaluate(0.3) - 0.3).abs() < 1e-4);
    }

    #[test]
    fn bezier_may_overshoot() {
        let e = Easing::cubic_bezier(0.5, -1.5, 0.5, 2.5).unwrap();
        let samples: Vec<f64> = (1..100).map(|i| e.evaluate(i as f64 / 100.0)).collect();
        assert!(samples.iter().any(|&v| v < 0.0));
        assert!(samples.iter().any(|&v| v > 1.0));
    }

    #[test]
    fn bezier_rejects_x_out_of_range() {
        assert_eq!(
            Easing::cubic_bezier(1.5, 0.0, 0.5, 1.0).unwrap_err(),
            AnimationError::InvalidBezier { x1: 1.5, y1: 0.0, x2: 0.5, y2: 1.0 }
        );
        assert!(Easing::cubic_bezier(0.2, 0.0, -0.1, 1.0).is_err());
        assert!(Easing::cubic_bezier(f64::NAN, 0.0, 0.5, 1.0).is_err());
        assert!(Easing::cubic_bezier(0.2, f64::INFINITY, 0.5, 1.0).is_err());
    }

    #[test]
    fn hand_built_bezier_clamps_x() {
        let wild = Easing::CubicBezier { x1: -3.0, y1: 0.0, x2: 4.0, y2: 1.0 };
        let tame = Easing::cubic_bezier(0.0, 0.0, 1.0, 1.0).unwrap();
        for p in [0.1, 0.4, 0.8] {
            assert!((wild.evaluate(p) - tame.evaluate(p)).abs() < 1e-9);
        }
    }

    #[test]
    fn custom_curve_is_called() {
        let e = Easing::custom(|p| 1.0 - p);
        assert_eq!(e.evaluate(0.25), 0.75);
        assert_eq!(format!("{e:?}"), "Custom(..)");
    }
}
