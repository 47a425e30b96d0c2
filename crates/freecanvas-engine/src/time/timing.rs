use std::time::{Duration, Instant};

use crate::error::AnimationError;

use super::Easing;

/// How many times an animation replays its easing curve.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Iterations {
    /// A positive (possibly fractional) count.
    Count(f64),
    /// Runs until the update callback opts out.
    Infinite,
}

impl Iterations {
    pub const ONCE: Iterations = Iterations::Count(1.0);

    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Count(n) => n,
            Self::Infinite => f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl Default for Iterations {
    fn default() -> Self {
        Self::ONCE
    }
}

/// Immutable animation timing configuration.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    pub duration: Duration,
    pub iterations: Iterations,
    pub easing: Easing,
}

impl TimingConfig {
    /// One linear iteration of `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            iterations: Iterations::ONCE,
            easing: Easing::Linear,
        }
    }

    pub fn iterations(mut self, iterations: Iterations) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn infinite(self) -> Self {
        self.iterations(Iterations::Infinite)
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Rejects zero durations and iteration counts that are not finite and
    /// positive. Use [`Iterations::Infinite`] for unbounded runs.
    pub fn validate(&self) -> Result<(), AnimationError> {
        if self.duration.is_zero() {
            return Err(AnimationError::ZeroDuration(self.duration));
        }
        if let Iterations::Count(n) = self.iterations {
            if !n.is_finite() || n <= 0.0 {
                return Err(AnimationError::InvalidIterations(n));
            }
        }
        Ok(())
    }
}

/// Wall-clock progress of one running animation.
///
/// A `Timing` is sampled at an explicit instant: [`Timing::advance_to`] moves
/// its notion of "now", and every derived value (`elapsed`, `raw_progress`,
/// `p`, `is_finished`) is computed from that sample. The animation driver
/// advances it once per scheduler tick.
#[derive(Debug, Clone)]
pub struct Timing {
    start: Instant,
    now: Instant,
    config: TimingConfig,
}

impl Timing {
    /// Starts a timing at `start` (elapsed zero).
    pub fn new(config: TimingConfig, start: Instant) -> Result<Self, AnimationError> {
        config.validate()?;
        Ok(Self {
            start,
            now: start,
            config,
        })
    }

    /// Starts a timing from a config that was validated upstream.
    pub(crate) fn started(config: TimingConfig, start: Instant) -> Self {
        debug_assert!(config.validate().is_ok());
        Self {
            start,
            now: start,
            config,
        }
    }

    /// Moves the sample point. Instants before `start` read as elapsed zero.
    #[inline]
    pub fn advance_to(&mut self, now: Instant) {
        self.now = now;
    }

    #[inline]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[inline]
    pub fn now(&self) -> Instant {
        self.now
    }

    #[inline]
    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.config.duration
    }

    #[inline]
    pub fn iterations(&self) -> Iterations {
        self.config.iterations
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.now.saturating_duration_since(self.start)
    }

    /// `elapsed / duration`, uncapped.
    #[inline]
    fn ratio(&self) -> f64 {
        self.elapsed().as_secs_f64() / self.config.duration.as_secs_f64()
    }

    /// Linear progress in iterations, capped at the iteration count.
    #[inline]
    pub fn raw_progress(&self) -> f64 {
        self.ratio().min(self.config.iterations.as_f64())
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.ratio() >= self.config.iterations.as_f64()
    }

    /// Index of the iteration currently playing (0-based).
    #[inline]
    pub fn iteration(&self) -> u64 {
        self.raw_progress().floor() as u64
    }

    /// Eased progress.
    ///
    /// Exactly `1.0` once finished. Otherwise the easing curve is replayed on
    /// the fractional part of the current iteration, so a looping animation
    /// restarts at the beginning of its curve on every iteration boundary.
    pub fn p(&self) -> f64 {
        if self.is_finished() {
            1.0
        } else {
            self.config.easing.evaluate(self.raw_progress().fract())
        }
    }
}
