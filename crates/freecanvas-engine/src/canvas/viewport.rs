use log::{debug, trace, warn};

use crate::coords::{Bound, Matrix3, SurfaceSize, Vec2};
use crate::error::CanvasError;
use crate::input::{InputEvent, MouseButtonState, PointerMoveEvent};
use crate::render::{
    DrawContext, ListenerId, PointerContext, RedrawFlag, Surface, TaskId, TaskRef, same_task,
};

use super::ViewportConfig;

struct TaskEntry<C: DrawContext> {
    id: TaskId,
    task: TaskRef<C>,
    listener: ListenerId,
}

/// Owns the model-to-screen transform, the render-task registry and the
/// redraw policy of one surface.
///
/// Model space is +Y up; screen space is +Y down. Every transform the viewport
/// builds itself keeps that flip.
///
/// Tasks draw in registration order. A frame is drawn only when something
/// marked the viewport dirty since the last drawn frame: a registry change, a
/// navigation gesture, a resize, or a task emitting on its [`DirtyChannel`].
///
/// [`DirtyChannel`]: crate::render::DirtyChannel
pub struct Viewport<S: Surface> {
    surface: S,
    ctx: S::Context,
    size: SurfaceSize,
    matrix: Matrix3,
    config: ViewportConfig,

    /// Last pointer position while a drag is in progress.
    drag_anchor: Option<Vec2>,
    /// Last known pointer position over the surface.
    pointer: Option<Vec2>,

    tasks: Vec<TaskEntry<S::Context>>,
    /// Removed while borrowed elsewhere; removal hooks still owed.
    detached: Vec<TaskEntry<S::Context>>,
    next_task_id: u64,
    redraw: RedrawFlag,
}

impl<S: Surface> Viewport<S> {
    /// Viewport with the default navigation policy.
    pub fn new(surface: S) -> Result<Self, CanvasError> {
        Self::with_config(surface, ViewportConfig::default())
    }

    /// Fails if the config is invalid or the surface has no 2D context.
    pub fn with_config(mut surface: S, config: ViewportConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        let ctx = surface.context_2d().ok_or(CanvasError::UnsupportedSurface)?;
        let size = surface.size();

        let mut matrix = Matrix3::identity();
        matrix.scale(1.0, -1.0);

        debug!("viewport created: {}x{}", size.width, size.height);

        Ok(Self {
            surface,
            ctx,
            size,
            matrix,
            config,
            drag_anchor: None,
            pointer: None,
            tasks: Vec::new(),
            detached: Vec::new(),
            next_task_id: 0,
            redraw: RedrawFlag::new(true),
        })
    }

    // ── registry ──────────────────────────────────────────────────────────

    /// Registers `task`, refits the view and marks the viewport dirty.
    ///
    /// Registering a task that is already present is a no-op returning its
    /// existing id.
    ///
    /// # Panics
    /// If `task` is mutably borrowed at the time of the call.
    pub fn add_task(&mut self, task: TaskRef<S::Context>) -> TaskId {
        if let Some(entry) = self.tasks.iter().find(|e| same_task(&e.task, &task)) {
            debug!("task {:?} already registered", entry.id);
            return entry.id;
        }

        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;

        let flag = self.redraw.clone();
        let listener = task.borrow().dirty().subscribe(move || flag.mark());

        self.tasks.push(TaskEntry { id, task, listener });
        debug!("task {id:?} added ({} registered)", self.tasks.len());

        self.fit();
        self.mark_dirty();
        id
    }

    /// Unregisters `task` and runs its removal hook. Returns `false` if it was
    /// not registered here.
    ///
    /// A task that is mutably borrowed at the time of the call leaves the
    /// registry immediately; its listener is dropped and its removal hook runs
    /// at the start of the next [`render_frame`](Self::render_frame).
    pub fn remove_task(&mut self, task: &TaskRef<S::Context>) -> bool {
        match self.tasks.iter().position(|e| same_task(&e.task, task)) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Like [`remove_task`](Self::remove_task), by id. Returns the removed task.
    pub fn remove_task_by_id(&mut self, id: TaskId) -> Option<TaskRef<S::Context>> {
        let index = self.tasks.iter().position(|e| e.id == id)?;
        Some(self.remove_at(index))
    }

    fn remove_at(&mut self, index: usize) -> TaskRef<S::Context> {
        let entry = self.tasks.remove(index);
        let task = entry.task.clone();
        debug!("task {:?} removed ({} registered)", entry.id, self.tasks.len());

        if let Err(entry) = detach(entry) {
            warn!("task {:?} is busy; removal hook deferred", entry.id);
            self.detached.push(entry);
        }

        self.mark_dirty();
        task
    }

    /// Runs the removal hooks of tasks that were busy when removed.
    fn flush_detached(&mut self) {
        if self.detached.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.detached);
        for entry in pending {
            if let Err(entry) = detach(entry) {
                self.detached.push(entry);
            }
        }
    }

    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn contains(&self, task: &TaskRef<S::Context>) -> bool {
        self.tasks.iter().any(|e| same_task(&e.task, task))
    }

    /// Registered tasks in draw order.
    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &TaskRef<S::Context>)> {
        self.tasks.iter().map(|e| (e.id, &e.task))
    }

    // ── fit ───────────────────────────────────────────────────────────────

    /// Union of every registered task's bounds, queried now.
    ///
    /// Tasks that report no bounds are skipped; the result is empty when none
    /// report any.
    pub fn content_bounds(&self) -> Bound {
        let mut out = Bound::empty();
        for entry in &self.tasks {
            match entry.task.try_borrow() {
                Ok(task) => {
                    if let Some(b) = task.bounds() {
                        out.add_bound(&b);
                    }
                }
                Err(_) => warn!("task {:?} is busy; left out of content bounds", entry.id),
            }
        }
        out
    }

    /// Centers the content and scales it to fill the surface, aspect preserved.
    ///
    /// Without content bounds a surface-sized box around the model origin is
    /// used instead. Also usable as a "reset view" action.
    pub fn fit(&mut self) {
        let (w, h) = (self.size.width, self.size.height);

        let mut bounds = self.content_bounds();
        if bounds.is_empty() {
            bounds = Bound::from_center_size(Vec2::zero(), w, h);
        }

        let mut zoom = (w / bounds.width()).min(h / bounds.height());
        if !(zoom.is_finite() && zoom > 0.0) {
            warn!("cannot fit {bounds:?} into {w}x{h}; using unit zoom");
            zoom = 1.0;
        }

        let c = bounds.center();
        let mut m = Matrix3::identity();
        m.translate(-c.x, -c.y).scale(zoom, -zoom).translate(w / 2.0, h / 2.0);
        self.matrix = m;

        debug!("fit: center=({:.3}, {:.3}) zoom={zoom:.4}", c.x, c.y);
        self.mark_dirty();
    }

    // ── navigation ────────────────────────────────────────────────────────

    /// Zooms one wheel notch about `position` (screen space).
    ///
    /// `delta_y > 0` zooms in, `< 0` zooms out, zero is ignored. The model point
    /// under `position` stays put; the resulting zoom is clamped to the
    /// configured limits.
    pub fn handle_wheel(&mut self, position: Vec2, delta_y: f64) {
        if delta_y == 0.0 || delta_y.is_nan() {
            return;
        }

        let factor = if delta_y > 0.0 {
            self.config.zoom_in_factor
        } else {
            self.config.zoom_out_factor
        };

        self.matrix.translate(-position.x, -position.y).scale(factor, factor);

        let zoom = self.matrix.uniform_scale();
        if zoom.is_finite() && zoom > 0.0 {
            let clamped = self.config.clamp_zoom(zoom);
            if clamped != zoom {
                let k = clamped / zoom;
                self.matrix.scale(k, k);
            }
        }

        self.matrix.translate(position.x, position.y);

        for entry in &self.tasks {
            match entry.task.try_borrow_mut() {
                Ok(mut task) => task.on_wheel(),
                Err(_) => warn!("task {:?} is busy; wheel notification dropped", entry.id),
            }
        }

        trace!("wheel at ({:.1}, {:.1}): zoom={:.4}", position.x, position.y, self.zoom());
        self.mark_dirty();
    }

    /// Starts a drag at `position` (screen space).
    pub fn pointer_down(&mut self, position: Vec2) {
        self.pointer = Some(position);
        self.drag_anchor = Some(position);
    }

    /// Broadcasts the move to every task, then pans if a drag is in progress.
    ///
    /// Tasks receive the model location computed before the pan is applied.
    pub fn pointer_move(&mut self, event: PointerMoveEvent) {
        let location = event.position();
        self.pointer = Some(location);

        let ctx = PointerContext {
            event,
            location,
            model_location: self.screen_to_model(location),
        };

        for entry in &self.tasks {
            match entry.task.try_borrow_mut() {
                Ok(mut task) => task.on_pointer_move(&ctx),
                Err(_) => warn!("task {:?} is busy; pointer move dropped", entry.id),
            }
        }

        if let Some(last) = self.drag_anchor {
            let delta = location - last;
            self.matrix.translate(delta.x, delta.y);
            self.drag_anchor = Some(location);
            self.mark_dirty();
        }
    }

    /// Ends a drag.
    pub fn pointer_up(&mut self) {
        self.drag_anchor = None;
    }

    /// The pointer left the surface: ends a drag and forgets the position.
    pub fn pointer_left(&mut self) {
        self.drag_anchor = None;
        self.pointer = None;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Routes a platform-agnostic input event to the matching handler.
    ///
    /// Wheel events zoom about the last known pointer position, or about the
    /// surface center when the pointer position is unknown.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMoved(e) => self.pointer_move(*e),

            InputEvent::PointerButton(e) => match e.state {
                MouseButtonState::Pressed => self.pointer_down(e.position()),
                MouseButtonState::Released => self.pointer_up(),
            },

            InputEvent::MouseWheel { delta, .. } => {
                let at = self
                    .pointer
                    .unwrap_or(Vec2::new(self.size.width / 2.0, self.size.height / 2.0));
                self.handle_wheel(at, delta.vertical());
            }

            InputEvent::PointerLeft => self.pointer_left(),

            InputEvent::Focused(false) => self.pointer_up(),

            InputEvent::Focused(true) | InputEvent::ModifiersChanged(_) => {}
        }
    }

    // ── coordinates ───────────────────────────────────────────────────────

    /// Maps a screen point into model space.
    ///
    /// A singular transform maps every point to the model origin.
    #[inline]
    pub fn screen_to_model(&self, p: Vec2) -> Vec2 {
        self.matrix.inverse().transform_point(p)
    }

    #[inline]
    pub fn model_to_screen(&self, p: Vec2) -> Vec2 {
        self.matrix.transform_point(p)
    }

    /// Screen pixels per model unit.
    #[inline]
    pub fn zoom(&self) -> f64 {
        self.matrix.uniform_scale()
    }

    /// Model-space length of one screen pixel; 1 for a collapsed transform.
    #[inline]
    pub fn pixel_size(&self) -> f64 {
        let zoom = self.zoom();
        if zoom > 0.0 { 1.0 / zoom } else { 1.0 }
    }

    #[inline]
    pub fn transform(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Replaces the model-to-screen transform as is (no flip or clamp).
    pub fn set_transform(&mut self, matrix: Matrix3) {
        if !matrix.is_invertible() {
            warn!("singular viewport transform; screen-to-model collapses to the origin");
        }
        self.matrix = matrix;
        self.mark_dirty();
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn mark_dirty(&self) {
        self.redraw.mark();
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw.is_set()
    }

    /// Draws one frame if dirty. Returns whether a frame was drawn.
    ///
    /// A task that is mutably borrowed elsewhere is skipped and the viewport
    /// stays dirty so the next frame picks it up.
    pub fn render_frame(&mut self) -> bool {
        self.flush_detached();
        if !self.redraw.take() {
            return false;
        }

        let pixel_size = self.pixel_size();

        self.ctx.clear_rect(0.0, 0.0, self.size.width, self.size.height);
        self.ctx.save();
        self.ctx.transform(self.matrix.to_render_transform());

        let mut skipped = 0usize;
        for entry in &self.tasks {
            match entry.task.try_borrow_mut() {
                Ok(mut task) => task.render(&mut self.ctx, pixel_size),
                Err(_) => {
                    warn!("task {:?} is busy; skipped this frame", entry.id);
                    skipped += 1;
                }
            }
        }

        self.ctx.restore();

        if skipped > 0 {
            self.redraw.mark();
        }

        trace!("frame drawn: {} tasks, pixel_size={pixel_size:.5}", self.tasks.len() - skipped);
        true
    }

    /// Records the new surface size and marks dirty. Does not refit.
    pub fn resize(&mut self, size: SurfaceSize) {
        debug!("viewport resized to {}x{}", size.width, size.height);
        self.size = size;
        self.surface.resize(size);
        self.mark_dirty();
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    #[inline]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The drawing context tasks render into.
    #[inline]
    pub fn context(&self) -> &S::Context {
        &self.ctx
    }
}

/// Unsubscribes `entry` and runs its removal hook, or hands it back if the
/// task is borrowed.
fn detach<C: DrawContext>(entry: TaskEntry<C>) -> Result<(), TaskEntry<C>> {
    let busy = match entry.task.try_borrow_mut() {
        Ok(mut task) => {
            task.dirty().unsubscribe(entry.listener);
            task.on_removed();
            false
        }
        Err(_) => true,
    };
    if busy { Err(entry) } else { Ok(()) }
}

impl<S: Surface> Drop for Viewport<S> {
    fn drop(&mut self) {
        for entry in &self.tasks {
            if let Ok(task) = entry.task.try_borrow() {
                task.dirty().unsubscribe(entry.listener);
            }
        }
        self.flush_detached();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::coords::DEFAULT_TOLERANCE;
    use crate::input::{MouseButton, Modifiers, MouseWheelDelta, PointerButtonEvent};
    use crate::render::recording::{DrawCmd, RecordingSurface};
    use crate::testing::{NoContextSurface, SpyTask, surface, task_ref};

    fn square(half: f64) -> Bound {
        Bound::new(Vec2::new(-half, -half), Vec2::new(half, half))
    }

    fn viewport(w: f64, h: f64) -> Viewport<RecordingSurface> {
        Viewport::new(surface(w, h)).unwrap()
    }

    fn assert_near(a: Vec2, b: Vec2) {
        assert!(a.nearly_equals(b, 1e-6), "{a:?} != {b:?}");
    }

    fn moved(x: f64, y: f64) -> PointerMoveEvent {
        PointerMoveEvent { x, y }
    }

    #[test]
    fn surface_without_context_is_rejected() {
        assert_eq!(
            Viewport::new(NoContextSurface).err(),
            Some(CanvasError::UnsupportedSurface)
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = ViewportConfig::default().with_zoom_limits(5.0, 1.0);
        assert!(matches!(
            Viewport::with_config(surface(10.0, 10.0), cfg),
            Err(CanvasError::InvalidZoomLimits { .. })
        ));
    }

    #[test]
    fn starts_with_flipped_y_and_dirty() {
        let vp = viewport(100.0, 100.0);
        assert_near(vp.model_to_screen(Vec2::new(1.0, 2.0)), Vec2::new(1.0, -2.0));
        assert!(vp.needs_redraw());
    }

    #[test]
    fn fit_single_task_centers_and_uses_smaller_ratio() {
        let mut vp = viewport(200.0, 100.0);
        let spy = SpyTask::new("a").with_bounds(square(10.0)).shared();
        vp.add_task(task_ref(&spy));

        assert!((vp.zoom() - 5.0).abs() < DEFAULT_TOLERANCE);
        assert_near(vp.model_to_screen(Vec2::zero()), Vec2::new(100.0, 50.0));
        // +Y up in model space lands at the top of the screen.
        assert_near(vp.model_to_screen(Vec2::new(10.0, 10.0)), Vec2::new(150.0, 0.0));
    }

    #[test]
    fn fit_unions_bounds_and_skips_tasks_without_any() {
        let mut vp = viewport(100.0, 100.0);
        let a = SpyTask::new("a")
            .with_bounds(Bound::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)))
            .shared();
        let b = SpyTask::new("b")
            .with_bounds(Bound::new(Vec2::new(30.0, 0.0), Vec2::new(40.0, 20.0)))
            .shared();
        let c = SpyTask::new("c").shared();
        vp.add_task(task_ref(&a));
        vp.add_task(task_ref(&b));
        vp.add_task(task_ref(&c));

        let bounds = vp.content_bounds();
        assert_eq!(bounds.width(), 40.0);
        assert_eq!(bounds.height(), 20.0);

        // 100 / 40 < 100 / 20
        assert!((vp.zoom() - 2.5).abs() < DEFAULT_TOLERANCE);
        assert_near(vp.model_to_screen(Vec2::new(20.0, 10.0)), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn fit_without_bounds_falls_back_to_surface_box() {
        let mut vp = viewport(300.0, 200.0);
        vp.add_task(task_ref(&SpyTask::new("a").shared()));

        assert!((vp.zoom() - 1.0).abs() < DEFAULT_TOLERANCE);
        assert_near(vp.model_to_screen(Vec2::zero()), Vec2::new(150.0, 100.0));
        assert_near(vp.model_to_screen(Vec2::new(0.0, 100.0)), Vec2::new(150.0, 0.0));
    }

    #[test]
    fn fit_of_point_content_uses_unit_zoom() {
        let mut vp = viewport(100.0, 100.0);
        let p = Vec2::new(3.0, 4.0);
        vp.add_task(task_ref(&SpyTask::new("a").with_bounds(Bound::new(p, p)).shared()));

        assert!((vp.zoom() - 1.0).abs() < DEFAULT_TOLERANCE);
        assert_near(vp.model_to_screen(p), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn fit_queries_bounds_on_demand() {
        let mut vp = viewport(100.0, 100.0);
        let spy = SpyTask::new("a").with_bounds(square(10.0)).shared();
        vp.add_task(task_ref(&spy));
        assert!((vp.zoom() - 5.0).abs() < DEFAULT_TOLERANCE);

        spy.borrow_mut().bounds = Some(square(50.0));
        vp.fit();
        assert!((vp.zoom() - 1.0).abs() < DEFAULT_TOLERANCE);
    }

    #[test]
    fn screen_model_round_trip() {
        let mut vp = viewport(640.0, 480.0);
        vp.add_task(task_ref(&SpyTask::new("a").with_bounds(square(7.0)).shared()));
        vp.handle_wheel(Vec2::new(13.0, 200.0), 1.0);
        vp.pointer_down(Vec2::new(10.0, 10.0));
        vp.pointer_move(moved(-35.0, 72.5));
        vp.pointer_up();

        for p in [Vec2::new(0.0, 0.0), Vec2::new(320.0, 240.0), Vec2::new(-50.0, 999.0)] {
            assert_near(vp.model_to_screen(vp.screen_to_model(p)), p);
        }
    }

    #[test]
    fn wheel_zoom_keeps_point_under_cursor() {
        let mut vp = viewport(400.0, 300.0);
        vp.add_task(task_ref(&SpyTask::new("a").with_bounds(square(20.0)).shared()));

        let at = Vec2::new(123.0, 77.0);
        let anchor = vp.screen_to_model(at);
        let z0 = vp.zoom();

        vp.handle_wheel(at, 1.0);
        assert_near(vp.screen_to_model(at), anchor);
        assert!((vp.zoom() - z0 * 1.25).abs() < 1e-9);

        vp.handle_wheel(at, 3.0);
        assert_near(vp.screen_to_model(at), anchor);

        vp.handle_wheel(at, -1.0);
        assert_near(vp.screen_to_model(at), anchor);
        assert!((vp.zoom() - z0 * 1.25).abs() < 1e-9);
    }

    #[test]
    fn wheel_zoom_is_clamped_and_still_anchored() {
        let cfg = ViewportConfig::default().with_zoom_limits(0.5, 2.0);
        let mut vp = Viewport::with_config(surface(100.0, 100.0), cfg).unwrap();

        let at = Vec2::new(30.0, 60.0);
        let anchor = vp.screen_to_model(at);

        for _ in 0..10 {
            vp.handle_wheel(at, 1.0);
        }
        assert!((vp.zoom() - 2.0).abs() < 1e-9);
        assert_near(vp.screen_to_model(at), anchor);

        for _ in 0..20 {
            vp.handle_wheel(at, -1.0);
        }
        assert!((vp.zoom() - 0.5).abs() < 1e-9);
        assert_near(vp.screen_to_model(at), anchor);

        // The Y flip survives clamping.
        assert!(vp.transform().get(1, 1) < 0.0);
    }

    #[test]
    fn wheel_notifies_tasks_and_ignores_zero_delta() {
        let mut vp = viewport(100.0, 100.0);
        let a = SpyTask::new("a").shared();
        let b = SpyTask::new("b").shared();
        vp.add_task(task_ref(&a));
        vp.add_task(task_ref(&b));
        vp.render_frame();

        let before = *vp.transform();
        vp.handle_wheel(Vec2::new(5.0, 5.0), 0.0);
        assert_eq!(*vp.transform(), before);
        assert_eq!(a.borrow().wheels, 0);
        assert!(!vp.needs_redraw());

        vp.handle_wheel(Vec2::new(5.0, 5.0), -2.0);
        assert_eq!(a.borrow().wheels, 1);
        assert_eq!(b.borrow().wheels, 1);
        assert!(vp.needs_redraw());
    }

    #[test]
    fn drag_pans_by_screen_delta_until_released() {
        let mut vp = viewport(100.0, 100.0);
        vp.render_frame();
        let origin = vp.model_to_screen(Vec2::zero());

        vp.pointer_down(Vec2::new(10.0, 10.0));
        vp.pointer_move(moved(15.0, 20.0));
        vp.pointer_move(moved(18.0, 25.0));
        assert_near(vp.model_to_screen(Vec2::zero()), origin + Vec2::new(8.0, 15.0));
        assert!(vp.needs_redraw());

        vp.pointer_up();
        vp.pointer_move(moved(90.0, 90.0));
        assert_near(vp.model_to_screen(Vec2::zero()), origin + Vec2::new(8.0, 15.0));
    }

    #[test]
    fn pointer_leave_ends_drag() {
        let mut vp = viewport(100.0, 100.0);
        vp.pointer_down(Vec2::new(0.0, 0.0));
        assert!(vp.is_dragging());

        vp.pointer_left();
        assert!(!vp.is_dragging());

        let before = *vp.transform();
        vp.pointer_move(moved(40.0, 40.0));
        assert_eq!(*vp.transform(), before);
    }

    #[test]
    fn pointer_moves_are_broadcast_in_model_space() {
        let mut vp = viewport(200.0, 100.0);
        let a = SpyTask::new("a").with_bounds(square(10.0)).shared();
        let b = SpyTask::new("b").shared();
        vp.add_task(task_ref(&a));
        vp.add_task(task_ref(&b));

        vp.pointer_move(moved(150.0, 0.0));

        for spy in [&a, &b] {
            let p = spy.borrow();
            assert_eq!(p.pointer_moves.len(), 1);
            let ctx = p.pointer_moves[0];
            assert_eq!(ctx.location, Vec2::new(150.0, 0.0));
            assert_near(ctx.model_location, Vec2::new(10.0, 10.0));
        }
    }

    #[test]
    fn broadcast_during_drag_uses_pre_pan_location() {
        let mut vp = viewport(100.0, 100.0);
        let a = SpyTask::new("a").shared();
        vp.add_task(task_ref(&a));

        vp.pointer_down(Vec2::new(50.0, 50.0));
        let expected = vp.screen_to_model(Vec2::new(60.0, 50.0));
        vp.pointer_move(moved(60.0, 50.0));

        assert_near(a.borrow().pointer_moves[0].model_location, expected);
    }

    #[test]
    fn add_then_remove_restores_registry() {
        let mut vp = viewport(100.0, 100.0);
        let keep = SpyTask::new("keep").shared();
        vp.add_task(task_ref(&keep));

        let spy = SpyTask::new("p").shared();
        let t = task_ref(&spy);
        vp.add_task(t.clone());
        assert_eq!(vp.task_count(), 2);
        assert_eq!(spy.borrow().dirty.listener_count(), 1);

        assert!(vp.remove_task(&t));
        assert_eq!(vp.task_count(), 1);
        assert_eq!(spy.borrow().removed, 1);
        assert_eq!(spy.borrow().dirty.listener_count(), 0);
        assert!(!vp.contains(&t));

        assert!(!vp.remove_task(&t));
        assert_eq!(spy.borrow().removed, 1);
    }

    #[test]
    fn remove_by_id_returns_the_task() {
        let mut vp = viewport(100.0, 100.0);
        let spy = SpyTask::new("p").shared();
        let id = vp.add_task(task_ref(&spy));

        let removed = vp.remove_task_by_id(id).unwrap();
        assert!(same_task(&removed, &task_ref(&spy)));
        assert!(vp.remove_task_by_id(id).is_none());
        assert_eq!(spy.borrow().removed, 1);
    }

    #[test]
    fn removing_a_busy_task_defers_its_hook() {
        let mut vp = viewport(100.0, 100.0);
        let spy = SpyTask::new("p").shared();
        let t = task_ref(&spy);
        vp.add_task(t.clone());
        vp.render_frame();

        {
            let _guard = spy.borrow_mut();
            assert!(vp.remove_task(&t));
            assert!(!vp.contains(&t));
            assert_eq!(vp.task_count(), 0);
            // Still held by the caller; nothing drawn for it either.
            assert!(vp.render_frame());
        }
        assert_eq!(spy.borrow().removed, 0);
        assert_eq!(spy.borrow().pixel_sizes.len(), 1);

        assert!(!vp.render_frame());
        assert_eq!(spy.borrow().removed, 1);
        assert_eq!(spy.borrow().dirty.listener_count(), 0);

        vp.render_frame();
        assert_eq!(spy.borrow().removed, 1);
    }

    #[test]
    fn adding_twice_registers_once() {
        let mut vp = viewport(100.0, 100.0);
        let spy = SpyTask::new("p").shared();
        let first = vp.add_task(task_ref(&spy));
        let second = vp.add_task(task_ref(&spy));

        assert_eq!(first, second);
        assert_eq!(vp.task_count(), 1);
        assert_eq!(spy.borrow().dirty.listener_count(), 1);
    }

    #[test]
    fn frames_are_drawn_only_when_dirty() {
        let mut vp = viewport(100.0, 100.0);
        let spy = SpyTask::new("p").shared();
        vp.add_task(task_ref(&spy));

        assert!(vp.render_frame());
        assert!(!vp.render_frame());
        assert_eq!(spy.borrow().pixel_sizes.len(), 1);

        spy.borrow_mut().move_to(Vec2::new(1.0, 1.0));
        assert!(vp.needs_redraw());
        assert!(vp.render_frame());
        assert_eq!(spy.borrow().pixel_sizes.len(), 2);
    }

    #[test]
    fn frame_wraps_tasks_in_transform_and_draws_in_registration_order() {
        let mut vp = viewport(200.0, 100.0);
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let spy = SpyTask::new(name).with_bounds(square(10.0)).with_order(&order).shared();
            vp.add_task(task_ref(&spy));
        }
        vp.surface().list().clear();

        assert!(vp.render_frame());
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);

        let cmds = vp.surface().list().commands();
        assert_eq!(
            cmds[0],
            DrawCmd::ClearRect { x: 0.0, y: 0.0, width: 200.0, height: 100.0 }
        );
        assert_eq!(cmds[1], DrawCmd::Save);
        assert_eq!(cmds[2], DrawCmd::Transform(vp.transform().to_render_transform()));
        assert_eq!(cmds.iter().filter(|c| c.is_shape()).count(), 3);
        assert_eq!(cmds.last(), Some(&DrawCmd::Restore));
    }

    #[test]
    fn pixel_size_tracks_zoom() {
        let mut vp = viewport(200.0, 100.0);
        let spy = SpyTask::new("p").with_bounds(square(10.0)).shared();
        vp.add_task(task_ref(&spy));

        vp.render_frame();
        vp.handle_wheel(Vec2::new(100.0, 50.0), 1.0);
        vp.render_frame();

        let sizes = spy.borrow().pixel_sizes.clone();
        assert!((sizes[0] - 0.2).abs() < 1e-12);
        assert!((sizes[1] - 0.2 / 1.25).abs() < 1e-12);
    }

    #[test]
    fn busy_task_is_skipped_and_retried() {
        let mut vp = viewport(100.0, 100.0);
        let busy = SpyTask::new("busy").shared();
        let free = SpyTask::new("free").shared();
        vp.add_task(task_ref(&busy));
        vp.add_task(task_ref(&free));

        {
            let _guard = busy.borrow_mut();
            assert!(vp.render_frame());
        }
        assert_eq!(free.borrow().pixel_sizes.len(), 1);
        assert!(vp.needs_redraw());

        assert!(vp.render_frame());
        assert_eq!(busy.borrow().pixel_sizes.len(), 1);
        assert!(!vp.needs_redraw());
    }

    #[test]
    fn resize_marks_dirty_without_refit() {
        let mut vp = viewport(200.0, 100.0);
        vp.add_task(task_ref(&SpyTask::new("a").with_bounds(square(10.0)).shared()));
        vp.render_frame();
        let before = *vp.transform();

        vp.resize(SurfaceSize::new(400.0, 400.0));
        assert!(vp.needs_redraw());
        assert_eq!(*vp.transform(), before);
        assert_eq!(vp.size(), SurfaceSize::new(400.0, 400.0));
        assert_eq!(vp.surface().size(), SurfaceSize::new(400.0, 400.0));
    }

    #[test]
    fn singular_transform_collapses_to_origin() {
        let mut vp = viewport(100.0, 100.0);
        vp.set_transform(Matrix3::ZERO);

        assert_eq!(vp.screen_to_model(Vec2::new(12.0, 34.0)), Vec2::zero());
        assert_eq!(vp.pixel_size(), 1.0);
        assert!(vp.render_frame());
    }

    #[test]
    fn input_events_drive_navigation() {
        let mut vp = viewport(100.0, 100.0);
        let origin = vp.model_to_screen(Vec2::zero());

        let press = |state| {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x: 10.0,
                y: 10.0,
                modifiers: Modifiers::default(),
            })
        };

        vp.handle_input(&press(MouseButtonState::Pressed));
        vp.handle_input(&InputEvent::PointerMoved(moved(20.0, 10.0)));
        vp.handle_input(&press(MouseButtonState::Released));
        assert_near(vp.model_to_screen(Vec2::zero()), origin + Vec2::new(10.0, 0.0));

        let at = Vec2::new(20.0, 10.0);
        let anchor = vp.screen_to_model(at);
        vp.handle_input(&InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        });
        assert_near(vp.screen_to_model(at), anchor);
        assert!((vp.zoom() - 1.25).abs() < 1e-9);

        vp.handle_input(&InputEvent::PointerLeft);
        vp.handle_input(&InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 0.0, y: -3.0 },
            modifiers: Modifiers::default(),
        });
        assert!((vp.zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dropping_viewport_unsubscribes_tasks() {
        let spy = SpyTask::new("p").shared();
        {
            let mut vp = viewport(100.0, 100.0);
            vp.add_task(task_ref(&spy));
            assert_eq!(spy.borrow().dirty.listener_count(), 1);
        }
        assert_eq!(spy.borrow().dirty.listener_count(), 0);
    }
}
