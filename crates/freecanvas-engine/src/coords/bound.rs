use super::Vec2;

/// Axis-aligned bounding box in model space.
///
/// A fresh `Bound` is empty: it contains nothing and reports zero size, which is
/// distinct from a degenerate box around a single point. Once any point has been
/// added, `min <= max` holds on both axes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bound {
    min: Vec2,
    max: Vec2,
}

impl Default for Bound {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bound {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Box spanning two corners given in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        let mut out = Self::empty();
        out.add_point(a).add_point(b);
        out
    }

    /// Box centered on `center` with the given full `width` and `height`.
    pub fn from_center_size(center: Vec2, width: f64, height: f64) -> Self {
        let half = Vec2::new(width.abs() / 2.0, height.abs() / 2.0);
        Self::new(center - half, center + half)
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut out = Self::empty();
        for p in points {
            out.add_point(p);
        }
        out
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Min corner, or `None` while empty.
    #[inline]
    pub fn min(&self) -> Option<Vec2> {
        (!self.is_empty()).then_some(self.min)
    }

    /// Max corner, or `None` while empty.
    #[inline]
    pub fn max(&self) -> Option<Vec2> {
        (!self.is_empty()).then_some(self.max)
    }

    pub fn add_point(&mut self, p: Vec2) -> &mut Self {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self
    }

    /// Grows to the union with `other`. Adding an empty box is a no-op.
    pub fn add_bound(&mut self, other: &Bound) -> &mut Self {
        if !other.is_empty() {
            self.add_point(other.min);
            self.add_point(other.max);
        }
        self
    }

    #[inline]
    pub fn union(mut self, other: &Bound) -> Bound {
        self.add_bound(other);
        self
    }

    /// Grows by `margin` on every side. Empty boxes stay empty.
    pub fn expand(&mut self, margin: f64) -> &mut Self {
        if !self.is_empty() {
            self.min -= Vec2::new(margin, margin);
            self.max += Vec2::new(margin, margin);
        }
        self
    }

    #[inline]
    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.x - self.min.x }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.y - self.min.y }
    }

    /// Center point; the origin while empty.
    #[inline]
    pub fn center(&self) -> Vec2 {
        if self.is_empty() {
            Vec2::zero()
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Closed containment: `[min, max]`.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
