use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use freecanvas_engine::animation::{AnimationFrame, AnimationHandle, Animator, Sequence, SequenceStep};
use freecanvas_engine::canvas::FrameLoop;
use freecanvas_engine::coords::{Bound, Vec2};
use freecanvas_engine::render::recording::{RecordingContext, RecordingSurface};
use freecanvas_engine::render::{DirtyChannel, PointerContext, RenderTask};
use freecanvas_engine::time::{Easing, TimingConfig};

const GRID_EXTENT: f64 = 4000.0;
const GRID_STEP: f64 = 100.0;

/// Grid plus an arrow from the origin to the pointer.
pub struct PointerArrow {
    tip: Vec2,
    /// Phase animated by the scene; spins the arrow head.
    pub offset: f64,
    dirty: DirtyChannel,
}

impl PointerArrow {
    pub fn new() -> Self {
        Self {
            tip: Vec2::new(600.0, 0.0),
            offset: 0.0,
            dirty: DirtyChannel::new(),
        }
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.dirty.emit();
    }
}

impl RenderTask<RecordingContext> for PointerArrow {
    fn render(&mut self, ctx: &mut RecordingContext, pixel_size: f64) {
        let n = (GRID_EXTENT / GRID_STEP) as i32;
        for i in (-n + 1)..n {
            let at = f64::from(i) * GRID_STEP;
            let width = if i == 0 { 2.0 * pixel_size } else { pixel_size };
            ctx.stroke_line(Vec2::new(at, -GRID_EXTENT), Vec2::new(at, GRID_EXTENT), width);
            ctx.stroke_line(Vec2::new(-GRID_EXTENT, at), Vec2::new(GRID_EXTENT, at), width);
        }

        let back = self.tip.negate().set_length(30.0 * pixel_size);
        let spread = PI / 10.0 + 0.05 * self.offset.sin();
        let a = back.rotate(spread) + self.tip;
        let b = back.rotate(-spread) + self.tip;

        ctx.stroke_line(Vec2::zero(), (a + b) * 0.5, 3.0 * pixel_size);
        ctx.fill_polygon(&[self.tip, a, b]);
    }

    fn bounds(&self) -> Option<Bound> {
        Some(Bound::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0)))
    }

    fn on_pointer_move(&mut self, ctx: &PointerContext) {
        self.tip = ctx.model_location;
        self.dirty.emit();
    }

    fn dirty(&self) -> &DirtyChannel {
        &self.dirty
    }
}

/// Axis-aligned square that rotates about its center.
pub struct Square {
    center: Vec2,
    side: f64,
    rotation: f64,
    dirty: DirtyChannel,
}

impl Square {
    /// `origin` is the min corner.
    pub fn new(origin: Vec2, side: f64) -> Self {
        Self {
            center: origin + Vec2::new(side / 2.0, side / 2.0),
            side,
            rotation: 0.0,
            dirty: DirtyChannel::new(),
        }
    }

    pub fn set_rotation(&mut self, theta: f64) {
        self.rotation = theta;
        self.dirty.emit();
    }

    fn corners(&self) -> [Vec2; 4] {
        let h = self.side / 2.0;
        [Vec2::new(-h, -h), Vec2::new(h, -h), Vec2::new(h, h), Vec2::new(-h, h)]
            .map(|c| c.rotate(-self.rotation) + self.center)
    }
}

impl RenderTask<RecordingContext> for Square {
    fn render(&mut self, ctx: &mut RecordingContext, pixel_size: f64) {
        let corners = self.corners();
        ctx.fill_polygon(&corners);
        for i in 0..corners.len() {
            ctx.stroke_line(corners[i], corners[(i + 1) % corners.len()], pixel_size);
        }
    }

    fn dirty(&self) -> &DirtyChannel {
        &self.dirty
    }
}

/// Bouncing ball.
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    dirty: DirtyChannel,
}

impl Ball {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            radius,
            dirty: DirtyChannel::new(),
        }
    }

    pub fn set_height(&mut self, y: f64) {
        self.y = y;
        self.dirty.emit();
    }
}

impl RenderTask<RecordingContext> for Ball {
    fn render(&mut self, ctx: &mut RecordingContext, pixel_size: f64) {
        let center = Vec2::new(self.x, self.y);
        ctx.fill_circle(center, self.radius);
        ctx.stroke_circle(center, self.radius, pixel_size);
    }

    fn dirty(&self) -> &DirtyChannel {
        &self.dirty
    }
}

type Shared<T> = Rc<RefCell<T>>;

/// Fall/rise steps of a bounce whose height and duration decay each time.
///
/// Heights shrink by `decay`, durations by `sqrt(decay)`; the chain ends once
/// the next duration would not exceed `min_duration`.
pub struct Bounce {
    height: f64,
    duration: Duration,
    decay: f64,
    min_duration: Duration,
    rising: bool,
    done: bool,
}

impl Bounce {
    pub fn new(height: f64, duration: Duration, decay: f64, min_duration: Duration) -> Self {
        Self {
            height,
            duration,
            decay,
            min_duration,
            rising: false,
            done: false,
        }
    }

    fn step(&self, easing: Easing) -> Option<Animator> {
        match Animator::new(TimingConfig::new(self.duration).easing(easing)) {
            Ok(a) => Some(a),
            Err(e) => {
                log::warn!("bounce ended early: {e}");
                None
            }
        }
    }
}

impl Iterator for Bounce {
    type Item = SequenceStep<Shared<Ball>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let h = self.height;
        if self.rising {
            let animator = self.step(Easing::QuadOut)?;
            self.rising = false;
            return Some(SequenceStep::new(animator, move |ball: &mut Shared<Ball>, f: AnimationFrame<'_>| {
                let mut ball = ball.borrow_mut();
                let y = ball.radius + h * f.timing.p();
                ball.set_height(y);
            }));
        }

        let animator = self.step(Easing::QuadIn)?;
        let next = self.duration.mul_f64(self.decay.sqrt());
        if next > self.min_duration {
            self.height *= self.decay;
            self.duration = next;
            self.rising = true;
        } else {
            self.done = true;
        }

        Some(SequenceStep::new(animator, move |ball: &mut Shared<Ball>, f: AnimationFrame<'_>| {
            let mut ball = ball.borrow_mut();
            let y = ball.radius + h * (1.0 - f.timing.p());
            ball.set_height(y);
        }))
    }
}

/// Handles to the scene's tasks and long-running animations.
pub struct Scene {
    pub arrow: Shared<PointerArrow>,
    pub squares: [Shared<Square>; 2],
    pub ball: Shared<Ball>,
    pub bounce: Option<AnimationHandle>,
}

/// Registers the demo tasks and starts their animations on `lp`'s scheduler.
pub fn build(lp: &mut FrameLoop<RecordingSurface>) -> Result<Scene> {
    let arrow = Rc::new(RefCell::new(PointerArrow::new()));
    lp.viewport_mut().add_task(arrow.clone());

    let spin = Animator::new(TimingConfig::new(Duration::from_secs(10)).infinite())
        .context("arrow animation")?;
    spin.animate(lp.scheduler(), arrow.clone(), |arrow, f| {
        arrow.borrow_mut().set_offset(TAU * f.timing.p());
    });

    let ease_out = Rc::new(RefCell::new(Square::new(Vec2::new(45.0, 45.0), 10.0)));
    let overshoot = Rc::new(RefCell::new(Square::new(Vec2::new(-55.0, -55.0), 10.0)));
    lp.viewport_mut().add_task(ease_out.clone());
    lp.viewport_mut().add_task(overshoot.clone());

    let quarter_turns = [
        (ease_out.clone(), Easing::QuadOut),
        (
            overshoot.clone(),
            Easing::cubic_bezier(0.5, -1.5, 0.5, 2.5).context("overshoot easing")?,
        ),
    ];
    for (square, easing) in quarter_turns {
        let turn = Animator::new(TimingConfig::new(Duration::from_secs(1)).infinite().easing(easing))
            .context("square animation")?;
        turn.animate(lp.scheduler(), square, |sq, f| {
            sq.borrow_mut().set_rotation(FRAC_PI_2 * f.timing.p());
        });
    }

    let ball = Rc::new(RefCell::new(Ball::new(0.0, 95.0, 5.0)));
    lp.viewport_mut().add_task(ball.clone());

    let bounce = Bounce::new(90.0, Duration::from_secs(1), 0.9, Duration::from_millis(16));
    let bounce = Sequence::new(bounce).play(lp.scheduler(), ball.clone());

    log::info!("scene ready: {} tasks", lp.viewport().task_count());

    Ok(Scene {
        arrow,
        squares: [ease_out, overshoot],
        ball,
        bounce,
    })
}
