use crate::coords::{RenderTransform, SurfaceSize};

/// A raster surface supplied by the host.
///
/// The viewport asks for the 2D context once, at construction, and keeps it for
/// its whole lifetime.
pub trait Surface {
    /// Drawing context handed to render tasks.
    type Context: DrawContext;

    /// Returns the 2D drawing context, or `None` if the surface has none.
    fn context_2d(&mut self) -> Option<Self::Context>;

    /// Current size in logical pixels.
    fn size(&self) -> SurfaceSize;

    /// Resizes the backing store.
    fn resize(&mut self, size: SurfaceSize);
}

/// The part of a 2D drawing API the viewport itself needs.
///
/// Concrete contexts add their own drawing calls (paths, fills, text); render
/// tasks are written against the concrete context type.
pub trait DrawContext {
    /// Clears a screen-space rectangle, ignoring the current transform.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Pushes the current drawing state (transform included).
    fn save(&mut self);

    /// Pops the drawing state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Multiplies `t` onto the current transform.
    fn transform(&mut self, t: RenderTransform);
}
