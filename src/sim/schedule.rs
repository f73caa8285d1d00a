//! Fixed timestep scheduling
//!
//! The host supplies time through a [`Clock`]; [`FixedStep`] converts the
//! elapsed wall time into a whole number of simulation ticks. Time that does
//! not make up a full tick is carried to the next frame.

use super::state::MatchState;
use crate::consts::MAX_FRAME_TIME;
use crate::settings::MatchConfig;

/// Absorbs float drift when the accumulator lands right on a tick boundary
const EPSILON: f64 = 1e-9;

/// Source of monotonic time, in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, seconds: f64) {
        self.time += seconds;
    }

    /// Jump to an absolute time (host timestamps)
    pub fn set(&mut self, seconds: f64) {
        self.time = seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time
    }
}

/// Wall clock backed by `std::time::Instant`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Fixed-step accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f64,
    max_substeps: u32,
    accumulator: f64,
    last_time: Option<f64>,
}

impl FixedStep {
    pub fn new(tick_rate: f32, max_substeps: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate as f64,
            max_substeps,
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.tick_rate, config.max_substeps)
    }

    /// Seconds per tick
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Time banked toward the next tick
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Bank `elapsed` seconds and return how many ticks are due now.
    ///
    /// A single frame counts for at most `MAX_FRAME_TIME` and yields at most
    /// `max_substeps` ticks; anything beyond the substep cap stays banked.
    pub fn accumulate(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME as f64);

        let mut ticks = 0;
        while self.accumulator + EPSILON >= self.dt && ticks < self.max_substeps {
            self.accumulator = (self.accumulator - self.dt).max(0.0);
            ticks += 1;
        }
        ticks
    }

    /// Read the clock and run every tick that is due. Returns ticks run.
    ///
    /// The first call only starts the clock.
    pub fn pump(&mut self, clock: &impl Clock, state: &mut MatchState) -> u32 {
        let now = clock.now();
        let elapsed = self.last_time.map_or(0.0, |last| now - last);
        self.last_time = Some(now);

        let due = self.accumulate(elapsed);
        let mut ran = 0;
        for _ in 0..due {
            if state.is_over() {
                break;
            }
            state.advance();
            ran += 1;
        }
        ran
    }
}
