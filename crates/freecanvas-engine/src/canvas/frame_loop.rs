use std::time::Instant;

use crate::animation::FrameScheduler;
use crate::input::InputEvent;
use crate::render::Surface;
use crate::time::{FrameClock, FrameTime};

use super::Viewport;

/// What one tick did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub time: FrameTime,
    /// Scheduler callbacks (animation steps) that ran.
    pub callbacks: usize,
    /// Whether the viewport drew a frame.
    pub redrawn: bool,
}

/// Per-display-tick driver: runs scheduled animation steps, then lets the
/// viewport redraw if anything marked it dirty.
///
/// The host calls one of the tick methods once per refresh, unconditionally.
/// Dirtiness set by an animation step during tick N is drawn in tick N.
pub struct FrameLoop<S: Surface> {
    viewport: Viewport<S>,
    scheduler: FrameScheduler,
    clock: FrameClock,
}

impl<S: Surface> FrameLoop<S> {
    pub fn new(viewport: Viewport<S>) -> Self {
        Self::starting_at(viewport, Instant::now())
    }

    /// Loop whose clock and scheduler start at `start` (simulated time).
    pub fn starting_at(viewport: Viewport<S>, start: Instant) -> Self {
        Self {
            viewport,
            scheduler: FrameScheduler::starting_at(start),
            clock: FrameClock::starting_at(start),
        }
    }

    /// The scheduler animations should be started on.
    #[inline]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport<S> {
        &self.viewport
    }

    #[inline]
    pub fn viewport_mut(&mut self) -> &mut Viewport<S> {
        &mut self.viewport
    }

    #[inline]
    pub fn handle_input(&mut self, event: &InputEvent) {
        self.viewport.handle_input(event);
    }

    /// Ticks at the current wall-clock time.
    pub fn tick(&mut self) -> FrameReport {
        self.tick_at(Instant::now())
    }

    /// Ticks at `now` using the loop's own clock.
    pub fn tick_at(&mut self, now: Instant) -> FrameReport {
        let time = self.clock.tick_at(now);
        self.advance(time)
    }

    /// Ticks with a `FrameTime` produced by the host's clock.
    pub fn advance(&mut self, time: FrameTime) -> FrameReport {
        let callbacks = self.scheduler.tick(time);
        let redrawn = self.viewport.render_frame();

        FrameReport {
            time,
            callbacks,
            redrawn,
        }
    }

    pub fn into_viewport(self) -> Viewport<S> {
        self.viewport
    }
}
