mod host;
mod scene;

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use freecanvas_engine::canvas::{FrameLoop, Viewport};
use freecanvas_engine::coords::SurfaceSize;
use freecanvas_engine::input::{
    InputEvent, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
};
use freecanvas_engine::logging::{LoggingConfig, init_logging};
use freecanvas_engine::render::recording::RecordingSurface;
use freecanvas_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const FRAME: Duration = Duration::from_micros(16_667);

enum Mode {
    /// Simulated clock and scripted input for the given span.
    Headless(Duration),
    Window,
}

fn parse_args() -> Result<Mode> {
    let mut mode = Mode::Headless(Duration::from_secs(45));
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--window" => mode = Mode::Window,
            "--seconds" => {
                let value = args.next().context("--seconds needs a value")?;
                let secs: f64 = value.parse().with_context(|| format!("invalid --seconds value {value:?}"))?;
                if !(secs.is_finite() && secs > 0.0) {
                    bail!("--seconds must be positive, got {secs}");
                }
                mode = Mode::Headless(Duration::from_secs_f64(secs));
            }
            other => bail!("unknown argument {other:?} (expected --window or --seconds <n>)"),
        }
    }
    Ok(mode)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    match parse_args()? {
        Mode::Headless(span) => run_headless(span),
        Mode::Window => run_window(),
    }
}

fn run_window() -> Result<()> {
    let surface = RecordingSurface::new(SurfaceSize::new(WIDTH, HEIGHT));
    let mut frame_loop = FrameLoop::new(Viewport::new(surface).context("viewport setup failed")?);
    let scene = scene::build(&mut frame_loop)?;

    let config = RuntimeConfig {
        title: "freecanvas demo".to_string(),
        initial_size: LogicalSize::new(WIDTH, HEIGHT),
    };
    Runtime::run(config, host::DemoApp::new(frame_loop, scene))
}

/// Scripted pointer input, keyed by tick.
fn scripted_input(tick: u64) -> Vec<InputEvent> {
    let button = |state, x, y| {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    };
    let wheel = |y| InputEvent::MouseWheel {
        delta: MouseWheelDelta::Line { x: 0.0, y },
        modifiers: Modifiers::default(),
    };

    match tick {
        // Sweep the pointer across the surface.
        30..=90 => {
            let t = (tick - 30) as f64 / 60.0;
            vec![InputEvent::PointerMoved(PointerMoveEvent {
                x: WIDTH * t,
                y: HEIGHT * (1.0 - t),
            })]
        }
        120 | 125 | 130 => vec![wheel(1.0)],
        180 => vec![button(MouseButtonState::Pressed, 400.0, 300.0)],
        181..=200 => vec![InputEvent::PointerMoved(PointerMoveEvent {
            x: 400.0 + 5.0 * (tick - 180) as f64,
            y: 300.0,
        })],
        201 => vec![button(MouseButtonState::Released, 500.0, 300.0)],
        240 | 245 => vec![wheel(-1.0)],
        300 => vec![InputEvent::PointerLeft],
        _ => Vec::new(),
    }
}

fn run_headless(span: Duration) -> Result<()> {
    let t0 = Instant::now();
    let surface = RecordingSurface::new(SurfaceSize::new(WIDTH, HEIGHT));
    let mut frame_loop = FrameLoop::starting_at(Viewport::new(surface).context("viewport setup failed")?, t0);
    let scene = scene::build(&mut frame_loop)?;

    let ticks = (span.as_secs_f64() / FRAME.as_secs_f64()).ceil() as u64;
    let mut drawn = 0u64;
    let mut commands = 0usize;
    let mut bounce_done_at = None;

    for tick in 1..=ticks {
        for event in scripted_input(tick) {
            frame_loop.handle_input(&event);
        }

        let now = t0 + FRAME.mul_f64(tick as f64);
        let report = frame_loop.tick_at(now);
        if report.redrawn {
            drawn += 1;
            commands += frame_loop.viewport().surface().list().drain().len();
        }

        if bounce_done_at.is_none() && scene.bounce.as_ref().is_some_and(|h| h.is_complete()) {
            bounce_done_at = Some(now - t0);
            log::info!("bounce settled after {:.2}s", (now - t0).as_secs_f64());
        }
    }

    let viewport = frame_loop.viewport();
    log::info!(
        "{ticks} ticks, {drawn} frames drawn, {commands} draw commands, zoom {:.3}, ball at y={:.2}",
        viewport.zoom(),
        scene.ball.borrow().y
    );
    log::debug!(
        "arrow offset {:.3}, squares {}",
        scene.arrow.borrow().offset,
        scene.squares.len()
    );

    if bounce_done_at.is_none() {
        log::info!("bounce still running when the simulation ended");
    }
    Ok(())
}
