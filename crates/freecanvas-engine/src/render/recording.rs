use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{RenderTransform, SurfaceSize, Vec2};

use super::surface::{DrawContext, Surface};

/// Renderer-agnostic record of one drawing call.
///
/// Coordinates are whatever the caller passed: screen space for `ClearRect`,
/// model space for shapes drawn by render tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    Save,
    Restore,
    Transform(RenderTransform),
    FillPolygon { points: Vec<Vec2> },
    FillCircle { center: Vec2, radius: f64 },
    StrokeCircle { center: Vec2, radius: f64, line_width: f64 },
    StrokeLine { from: Vec2, to: Vec2, line_width: f64 },
}

impl DrawCmd {
    #[inline]
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            Self::FillPolygon { .. } | Self::FillCircle { .. } | Self::StrokeCircle { .. } | Self::StrokeLine { .. }
        )
    }
}

/// Recorded command stream shared between a [`RecordingContext`] and whoever
/// inspects it.
///
/// `push` is O(1). Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    items: Rc<RefCell<Vec<DrawCmd>>>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&self, cmd: DrawCmd) {
        self.items.borrow_mut().push(cmd);
    }

    /// Copy of everything recorded so far, in call order.
    pub fn commands(&self) -> Vec<DrawCmd> {
        self.items.borrow().clone()
    }

    /// Returns and clears the recorded commands. Keeps allocated capacity.
    pub fn drain(&self) -> Vec<DrawCmd> {
        self.items.borrow_mut().drain(..).collect()
    }

    #[inline]
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of frames drawn, counted as full clears.
    pub fn frame_count(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|c| matches!(c, DrawCmd::ClearRect { .. }))
            .count()
    }
}

/// A [`DrawContext`] that records calls instead of rasterizing them.
///
/// Used by headless hosts and tests. Besides the viewport's own calls it offers
/// a few shape primitives for render tasks.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    list: DrawList,
}

impl RecordingContext {
    pub fn new(list: DrawList) -> Self {
        Self { list }
    }

    #[inline]
    pub fn list(&self) -> &DrawList {
        &self.list
    }

    pub fn fill_polygon(&mut self, points: &[Vec2]) {
        self.list.push(DrawCmd::FillPolygon {
            points: points.to_vec(),
        });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f64) {
        self.list.push(DrawCmd::FillCircle { center, radius });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f64, line_width: f64) {
        self.list.push(DrawCmd::StrokeCircle {
            center,
            radius,
            line_width,
        });
    }

    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, line_width: f64) {
        self.list.push(DrawCmd::StrokeLine { from, to, line_width });
    }
}

impl DrawContext for RecordingContext {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.list.push(DrawCmd::ClearRect { x, y, width, height });
    }

    fn save(&mut self) {
        self.list.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.list.push(DrawCmd::Restore);
    }

    fn transform(&mut self, t: RenderTransform) {
        self.list.push(DrawCmd::Transform(t));
    }
}

/// In-memory surface handing out a [`RecordingContext`].
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: SurfaceSize,
    list: DrawList,
}

impl RecordingSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            list: DrawList::new(),
        }
    }

    /// The stream every context from this surface records into.
    #[inline]
    pub fn list(&self) -> &DrawList {
        &self.list
    }
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn context_2d(&mut self) -> Option<RecordingContext> {
        Some(RecordingContext::new(self.list.clone()))
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}
