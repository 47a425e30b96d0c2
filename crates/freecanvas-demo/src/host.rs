use std::time::{Duration, Instant};

use freecanvas_engine::canvas::FrameLoop;
use freecanvas_engine::coords::Vec2;
use freecanvas_engine::core::{App, AppControl, FrameCtx};
use freecanvas_engine::input::{InputEvent, MouseButtonState};
use freecanvas_engine::render::recording::RecordingSurface;
use freecanvas_engine::window::CursorIcon;

use crate::scene::Scene;

const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);
const DOUBLE_CLICK_SLOP: f64 = 4.0;

/// Recognizes two presses close together in time and space.
#[derive(Debug, Default)]
struct DoubleClick {
    last: Option<(Instant, Vec2)>,
}

impl DoubleClick {
    /// Records a press; returns `true` when it completes a double click.
    fn press(&mut self, at: Instant, pos: Vec2) -> bool {
        let hit = self.last.is_some_and(|(t, p)| {
            at.saturating_duration_since(t) <= DOUBLE_CLICK_INTERVAL && p.distance_to(pos) <= DOUBLE_CLICK_SLOP
        });
        self.last = if hit { None } else { Some((at, pos)) };
        hit
    }
}

/// Windowed host: real winit input and display ticks, drawing into a
/// recording surface that tracks the window size.
///
/// Double click resets the view to fit the content.
pub struct DemoApp {
    frame_loop: FrameLoop<RecordingSurface>,
    _scene: Scene,
    double_click: DoubleClick,
    frames_drawn: u64,
    commands: usize,
}

impl DemoApp {
    pub fn new(frame_loop: FrameLoop<RecordingSurface>, scene: Scene) -> Self {
        Self {
            frame_loop,
            _scene: scene,
            double_click: DoubleClick::default(),
            frames_drawn: 0,
            commands: 0,
        }
    }
}

impl App for DemoApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let size = ctx.window.logical_size();
        if size.is_valid() && size != self.frame_loop.viewport().size() {
            self.frame_loop.viewport_mut().resize(size);
        }

        for event in &ctx.input_frame.events {
            self.frame_loop.handle_input(event);

            if let InputEvent::PointerButton(b) = event {
                if b.state == MouseButtonState::Pressed && self.double_click.press(ctx.time.now, Vec2::new(b.x, b.y)) {
                    log::debug!("double click: reset view");
                    self.frame_loop.viewport_mut().fit();
                }
            }
        }

        let cursor = if self.frame_loop.viewport().is_dragging() {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Default
        };
        ctx.window.set_cursor(cursor);

        let report = self.frame_loop.advance(ctx.time);
        if report.redrawn {
            self.frames_drawn += 1;
            self.commands += self.frame_loop.viewport().surface().list().drain().len();
        }

        if report.time.frame_index % 600 == 0 {
            log::info!(
                "tick {}: {} frames drawn, {} commands, zoom {:.3}",
                report.time.frame_index,
                self.frames_drawn,
                self.commands,
                self.frame_loop.viewport().zoom()
            );
        }

        AppControl::Continue
    }
}
