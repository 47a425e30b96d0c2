use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{Bound, Vec2};
use crate::input::PointerMoveEvent;

use super::dirty::DirtyChannel;
use super::surface::DrawContext;

/// Identity of a task inside one viewport's registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

/// Pointer payload forwarded to every registered task.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerContext {
    /// The raw input event.
    pub event: PointerMoveEvent,
    /// Pointer location in screen space.
    pub location: Vec2,
    /// Pointer location in model space.
    pub model_location: Vec2,
}

/// Drawable entity registered into a viewport.
///
/// `C` is the concrete drawing context of the host surface. Only `render` and
/// `dirty` are required; every other hook has a no-op default.
///
/// # Implementing a task
///
/// ```rust,ignore
/// struct Dot { at: Vec2, dirty: DirtyChannel }
///
/// impl RenderTask<MyContext> for Dot {
///     fn render(&mut self, ctx: &mut MyContext, pixel_size: f64) {
///         ctx.fill_circle(self.at, 3.0 * pixel_size);
///     }
///     fn dirty(&self) -> &DirtyChannel { &self.dirty }
/// }
/// ```
pub trait RenderTask<C: DrawContext> {
    /// Draws in model space. The viewport transform is already applied.
    ///
    /// `pixel_size` is the model-space length of one screen pixel; multiply
    /// stroke widths by it to keep them visually constant across zoom levels.
    fn render(&mut self, ctx: &mut C, pixel_size: f64);

    /// Model-space bounds, queried on demand by `fit`. `None` opts out.
    fn bounds(&self) -> Option<Bound> {
        None
    }

    /// Called once when the task is removed from a viewport.
    fn on_removed(&mut self) {}

    /// Called after every wheel zoom.
    fn on_wheel(&mut self) {}

    /// Called on every pointer move, whether or not the pointer is over the task.
    fn on_pointer_move(&mut self, ctx: &PointerContext) {
        let _ = ctx;
    }

    /// The task's dirty notification channel.
    fn dirty(&self) -> &DirtyChannel;
}

/// Shared handle to a registered task.
///
/// Tasks are shared between the viewport (which draws them) and whatever
/// mutates them (input handlers, animations).
pub type TaskRef<C> = Rc<RefCell<dyn RenderTask<C>>>;

/// Identity comparison of two task handles (ignores vtables).
#[inline]
pub fn same_task<C: DrawContext>(a: &TaskRef<C>, b: &TaskRef<C>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
