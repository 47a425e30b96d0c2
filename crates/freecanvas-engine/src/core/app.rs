use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Directive returned by host callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Contract between the window runtime and a host application.
///
/// Input has already been folded into `FrameCtx::input` / `input_frame` by the
/// time `on_frame` runs; `on_window_event` sees the raw platform event first,
/// for things the input layer does not cover (resize, close).
pub trait App {
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per display tick per window, dirty or not.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
