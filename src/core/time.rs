//! Tick timing for the update loop

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of recent ticks kept for rolling cost statistics
const HISTORY_LEN: usize = 120;

/// Rolling statistics over recent update ticks
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TickStats {
    pub avg_ms: f32,
    pub min_ms: f32,
    pub max_ms: f32,
    pub tick_count: u64,
    pub simulated_secs: f64,
}

/// Drives a fixed- or variable-timestep loop and measures how long each
/// update takes in wall-clock time.
pub struct TickTimer {
    fixed_dt: Option<f32>,
    last_tick: Instant,
    delta: Duration,
    tick_count: u64,
    simulated_secs: f64,
    tick_started: Option<Instant>,
    /// Wall-clock cost of recent ticks in milliseconds
    cost_history: VecDeque<f32>,
}

impl TickTimer {
    /// Create a timer that reports the wall-clock delta between ticks
    pub fn variable() -> Self {
        Self::with_step(None)
    }

    /// Create a timer that always reports `dt` seconds per tick
    pub fn fixed(dt: f32) -> Self {
        Self::with_step(Some(dt))
    }

    fn with_step(fixed_dt: Option<f32>) -> Self {
        Self {
            fixed_dt,
            last_tick: Instant::now(),
            delta: Duration::ZERO,
            tick_count: 0,
            simulated_secs: 0.0,
            tick_started: None,
            cost_history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    /// Call once at the start of every tick. Returns the delta in seconds.
    pub fn begin(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = match self.fixed_dt {
            Some(dt) => Duration::from_secs_f32(dt),
            None => now - self.last_tick,
        };
        self.last_tick = now;
        self.tick_started = Some(now);
        self.tick_count += 1;
        self.simulated_secs += self.delta.as_secs_f64();
        self.delta.as_secs_f32()
    }

    /// Call once at the end of every tick to record its cost
    pub fn end(&mut self) {
        if let Some(started) = self.tick_started.take() {
            if self.cost_history.len() == HISTORY_LEN {
                self.cost_history.pop_front();
            }
            self.cost_history.push_back(started.elapsed().as_secs_f32() * 1000.0);
        }
    }

    /// Delta time of the current tick in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total ticks begun so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seconds of simulated time elapsed
    pub fn simulated_secs(&self) -> f64 {
        self.simulated_secs
    }

    /// Rolling cost statistics over the last ticks
    pub fn stats(&self) -> TickStats {
        let (mut min_ms, mut max_ms, mut total) = (f32::INFINITY, 0.0f32, 0.0f32);
        for &ms in &self.cost_history {
            min_ms = min_ms.min(ms);
            max_ms = max_ms.max(ms);
            total += ms;
        }

        let avg_ms = if self.cost_history.is_empty() {
            min_ms = 0.0;
            0.0
        } else {
            total / self.cost_history.len() as f32
        };

        TickStats {
            avg_ms,
            min_ms,
            max_ms,
            tick_count: self.tick_count,
            simulated_secs: self.simulated_secs,
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::variable()
    }
}
