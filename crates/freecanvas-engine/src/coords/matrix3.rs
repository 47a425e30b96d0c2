use core::ops::Mul;

use super::Vec2;

/// 3×3 homogeneous 2D transform.
///
/// Entries are stored column-major:
///
/// ```text
/// ┌ n11 n12 n13 ┐     ┌ 0 3 6 ┐
/// │ n21 n22 n23 │  →  │ 1 4 7 │
/// └ n31 n32 n33 ┘     └ 2 5 8 ┘
/// ```
///
/// The bottom row is `[0, 0, 1]` by convention only; nothing enforces it.
///
/// `scale`, `rotate` and `translate` left-multiply an elementary matrix, so each
/// new operation is applied after (on top of) everything already in the
/// transform. `identity().translate(-c).scale(z, z).translate(o)` therefore maps
/// `c` to `o`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix3 {
    m: [f64; 9],
}

/// The six affine coefficients in canvas order.
///
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl RenderTransform {
    #[inline]
    pub const fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    pub const ZERO: Matrix3 = Matrix3 { m: [0.0; 9] };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Builds a matrix from its entries in row order.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn from_rows(
        n11: f64, n12: f64, n13: f64,
        n21: f64, n22: f64, n23: f64,
        n31: f64, n32: f64, n33: f64,
    ) -> Self {
        Self {
            m: [n11, n21, n31, n12, n22, n32, n13, n23, n33],
        }
    }

    /// Builds a matrix from column-major entries.
    #[inline]
    pub const fn from_array(m: [f64; 9]) -> Self {
        Self { m }
    }

    /// Column-major entries.
    #[inline]
    pub const fn to_array(&self) -> [f64; 9] {
        self.m
    }

    /// Entry at zero-based `row`, `col`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[col * 3 + row]
    }

    /// Resets to the identity matrix.
    #[inline]
    pub fn set_identity(&mut self) -> &mut Self {
        self.m = Self::IDENTITY.m;
        self
    }

    /// `self = self × other`.
    #[inline]
    pub fn multiply(&mut self, other: &Matrix3) -> &mut Self {
        let a = *self;
        self.multiply_matrices(&a, other)
    }

    /// `self = other × self`.
    #[inline]
    pub fn premultiply(&mut self, other: &Matrix3) -> &mut Self {
        let b = *self;
        self.multiply_matrices(other, &b)
    }

    /// Writes `a × b` into `self`.
    pub fn multiply_matrices(&mut self, a: &Matrix3, b: &Matrix3) -> &mut Self {
        let [a11, a21, a31, a12, a22, a32, a13, a23, a33] = a.m;
        let [b11, b21, b31, b12, b22, b32, b13, b23, b33] = b.m;

        self.m[0] = a11 * b11 + a12 * b21 + a13 * b31;
        self.m[3] = a11 * b12 + a12 * b22 + a13 * b32;
        self.m[6] = a11 * b13 + a12 * b23 + a13 * b33;

        self.m[1] = a21 * b11 + a22 * b21 + a23 * b31;
        self.m[4] = a21 * b12 + a22 * b22 + a23 * b32;
        self.m[7] = a21 * b13 + a22 * b23 + a23 * b33;

        self.m[2] = a31 * b11 + a32 * b21 + a33 * b31;
        self.m[5] = a31 * b12 + a32 * b22 + a33 * b32;
        self.m[8] = a31 * b13 + a32 * b23 + a33 * b33;

        self
    }

    pub fn multiply_scalar(&mut self, s: f64) -> &mut Self {
        for v in &mut self.m {
            *v *= s;
        }
        self
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, e, f, g, h, i] = self.m;
        a * e * i - a * f * h - b * d * i + b * f * g + c * d * h - c * e * g
    }

    /// Inverts in place.
    ///
    /// A singular matrix (determinant exactly zero) becomes [`Matrix3::ZERO`].
    pub fn invert(&mut self) -> &mut Self {
        let [n11, n21, n31, n12, n22, n32, n13, n23, n33] = self.m;

        let t11 = n33 * n22 - n32 * n23;
        let t12 = n32 * n13 - n33 * n12;
        let t13 = n23 * n12 - n22 * n13;

        let det = n11 * t11 + n21 * t12 + n31 * t13;
        if det == 0.0 {
            self.m = Self::ZERO.m;
            return self;
        }

        let inv = 1.0 / det;

        self.m = [
            t11 * inv,
            (n31 * n23 - n33 * n21) * inv,
            (n32 * n21 - n31 * n22) * inv,
            t12 * inv,
            (n33 * n11 - n31 * n13) * inv,
            (n31 * n12 - n32 * n11) * inv,
            t13 * inv,
            (n21 * n13 - n23 * n11) * inv,
            (n22 * n11 - n21 * n12) * inv,
        ];
        self
    }

    /// Inverse copy; the zero matrix when singular.
    #[inline]
    pub fn inverse(&self) -> Matrix3 {
        let mut out = *self;
        out.invert();
        out
    }

    /// Inverse copy, or `None` when the determinant is exactly zero.
    #[inline]
    pub fn try_inverse(&self) -> Option<Matrix3> {
        if self.determinant() == 0.0 {
            None
        } else {
            Some(self.inverse())
        }
    }

    #[inline]
    pub fn is_invertible(&self) -> bool {
        self.determinant() != 0.0
    }

    pub fn transpose(&mut self) -> &mut Self {
        self.m.swap(1, 3);
        self.m.swap(2, 6);
        self.m.swap(5, 7);
        self
    }

    /// Left-multiplies `diag(sx, sy, 1)`.
    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.m[0] *= sx;
        self.m[3] *= sx;
        self.m[6] *= sx;

        self.m[1] *= sy;
        self.m[4] *= sy;
        self.m[7] *= sy;
        self
    }

    /// Left-multiplies
    ///
    /// ```text
    /// ┌  cos θ  sin θ  0 ┐
    /// │ -sin θ  cos θ  0 │
    /// └  0      0      1 ┘
    /// ```
    pub fn rotate(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        let [a11, a21, _, a12, a22, _, a13, a23, _] = self.m;

        self.m[0] = c * a11 + s * a21;
        self.m[3] = c * a12 + s * a22;
        self.m[6] = c * a13 + s * a23;

        self.m[1] = -s * a11 + c * a21;
        self.m[4] = -s * a12 + c * a22;
        self.m[7] = -s * a13 + c * a23;
        self
    }

    /// Left-multiplies a translation by `(tx, ty)`.
    ///
    /// The amounts are weighted by the homogeneous row, so they stay in the
    /// output frame of the current transform.
    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.m[0] += tx * self.m[2];
        self.m[3] += tx * self.m[5];
        self.m[6] += tx * self.m[8];

        self.m[1] += ty * self.m[2];
        self.m[4] += ty * self.m[5];
        self.m[7] += ty * self.m[8];
        self
    }

    /// Maps a point (translation included).
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0] * p.x + self.m[3] * p.y + self.m[6],
            self.m[1] * p.x + self.m[4] * p.y + self.m[7],
        )
    }

    /// Maps a direction (translation ignored).
    #[inline]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0] * v.x + self.m[3] * v.y,
            self.m[1] * v.x + self.m[4] * v.y,
        )
    }

    /// Length of the first row of the linear part.
    ///
    /// For a uniform scale with optional rotation/flip this is the scale factor.
    #[inline]
    pub fn uniform_scale(&self) -> f64 {
        self.m[0].hypot(self.m[3])
    }

    #[inline]
    pub fn to_render_transform(&self) -> RenderTransform {
        RenderTransform {
            a: self.m[0],
            b: self.m[1],
            c: self.m[3],
            d: self.m[4],
            e: self.m[6],
            f: self.m[7],
        }
    }

    pub fn nearly_equals(&self, other: &Matrix3, tolerance: f64) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() < tolerance)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;
    #[inline]
    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut out = Matrix3::ZERO;
        out.multiply_matrices(&self, &rhs);
        out
    }
}

impl Mul<Vec2> for Matrix3 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point(rhs)
    }
}
