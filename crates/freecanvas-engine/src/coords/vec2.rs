use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::f64::consts::PI;

use super::Matrix3;

/// Default tolerance used by [`Vec2::nearly_equals`] callers.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// 2D point or vector.
///
/// Points mapped through a [`Matrix3`] always include the translation column.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub const fn from_array(a: [f64; 2]) -> Self {
        Self { x: a[0], y: a[1] }
    }

    #[inline]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(self, rhs: Vec2) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    #[inline]
    pub fn negate(self) -> Vec2 {
        self.scale(-1.0)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction.
    ///
    /// A zero vector is treated as having length 1 and comes back unchanged.
    #[inline]
    pub fn normalize(self) -> Vec2 {
        let len = self.length();
        let len = if len == 0.0 { 1.0 } else { len };
        self.scale(1.0 / len)
    }

    #[inline]
    pub fn set_length(self, length: f64) -> Vec2 {
        self.normalize().scale(length)
    }

    /// Angle from +X, counter-clockwise, in `[0, 2π)`.
    #[inline]
    pub fn angle(self) -> f64 {
        (-self.y).atan2(-self.x) + PI
    }

    /// Rotates by `angle` radians about `center`.
    pub fn rotate_about(self, angle: f64, center: Vec2) -> Vec2 {
        let (s, c) = angle.sin_cos();
        let x = self.x - center.x;
        let y = self.y - center.y;
        Vec2::new(x * c - y * s + center.x, x * s + y * c + center.y)
    }

    #[inline]
    pub fn rotate(self, angle: f64) -> Vec2 {
        self.rotate_about(angle, Vec2::zero())
    }

    #[inline]
    pub fn distance_to(self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component-wise comparison with a strict `tolerance`.
    #[inline]
    pub fn nearly_equals(self, other: Vec2, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }

    /// Maps this point through `m`, translation included.
    #[inline]
    pub fn apply_matrix3(self, m: &Matrix3) -> Vec2 {
        m.transform_point(self)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        self.negate()
    }
}

impl From<(f64, f64)> for Vec2 {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}
