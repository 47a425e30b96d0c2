//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{Bound, SurfaceSize, Vec2};
use crate::render::recording::{RecordingContext, RecordingSurface};
use crate::render::{DirtyChannel, PointerContext, RenderTask, Surface, TaskRef};

pub(crate) fn surface(width: f64, height: f64) -> RecordingSurface {
    RecordingSurface::new(SurfaceSize::new(width, height))
}

/// A surface that has no 2D context to offer.
pub(crate) struct NoContextSurface;

impl Surface for NoContextSurface {
    type Context = RecordingContext;

    fn context_2d(&mut self) -> Option<RecordingContext> {
        None
    }

    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(100.0, 100.0)
    }

    fn resize(&mut self, _: SurfaceSize) {}
}

/// Render task that records every hook invocation.
#[derive(Debug, Default)]
pub(crate) struct SpyTask {
    pub name: &'static str,
    pub bounds: Option<Bound>,
    pub position: Vec2,
    pub dirty: DirtyChannel,
    pub pixel_sizes: Vec<f64>,
    pub removed: u32,
    pub wheels: u32,
    pub pointer_moves: Vec<PointerContext>,
    /// Draw order shared between spies.
    pub order: Option<Rc<RefCell<Vec<&'static str>>>>,
}

impl SpyTask {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, bounds: Bound) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_order(mut self, order: &Rc<RefCell<Vec<&'static str>>>) -> Self {
        self.order = Some(Rc::clone(order));
        self
    }

    pub fn shared(self) -> Rc<RefCell<SpyTask>> {
        Rc::new(RefCell::new(self))
    }

    /// Moves the spy and reports it dirty.
    pub fn move_to(&mut self, p: Vec2) {
        self.position = p;
        self.dirty.emit();
    }
}

impl RenderTask<RecordingContext> for SpyTask {
    fn render(&mut self, ctx: &mut RecordingContext, pixel_size: f64) {
        self.pixel_sizes.push(pixel_size);
        if let Some(order) = &self.order {
            order.borrow_mut().push(self.name);
        }
        ctx.fill_circle(self.position, 4.0 * pixel_size);
    }

    fn bounds(&self) -> Option<Bound> {
        self.bounds
    }

    fn on_removed(&mut self) {
        self.removed += 1;
    }

    fn on_wheel(&mut self) {
        self.wheels += 1;
    }

    fn on_pointer_move(&mut self, ctx: &PointerContext) {
        self.pointer_moves.push(*ctx);
    }

    fn dirty(&self) -> &DirtyChannel {
        &self.dirty
    }
}

pub(crate) fn task_ref(spy: &Rc<RefCell<SpyTask>>) -> TaskRef<RecordingContext> {
    spy.clone()
}
