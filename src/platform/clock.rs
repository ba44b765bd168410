//! Frame pacing
//!
//! Converts wall-clock frame deltas into a whole number of fixed ticks, and
//! tracks the presented frame rate.

use std::time::Duration;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted, in seconds. Anything longer (a stalled tab,
/// a debugger pause) is treated as this much time.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::at_tick_rate()
    }
}

impl FixedStep {
    /// The game's own tick rate
    pub fn at_tick_rate() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }

    pub fn new(step: f32, max_substeps: u32) -> Self {
        debug_assert!(step > 0.0);
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Bank `elapsed` seconds and return how many ticks are due now
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_DELTA);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_substeps && self.accumulator >= self.step {
            log::debug!("Dropping {:.3}s of backlog", self.accumulator);
            self.accumulator %= self.step;
        }
        ticks
    }

    /// Time left until the next tick is due
    pub fn until_next_tick(&self) -> Duration {
        Duration::from_secs_f32((self.step - self.accumulator).max(0.0))
    }
}

const FPS_WINDOW: usize = 60;

/// Rolling frame rate over the last 60 presented frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame presented at `now_secs`
    pub fn record(&mut self, now_secs: f64) {
        self.frame_times[self.frame_index] = now_secs;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // The slot just past the newest is the oldest; the window spans
        // one interval fewer than it has frames
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_secs - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_step_yields_one_tick() {
        let mut clock = FixedStep::new(0.5, 8);
        assert_eq!(clock.advance(0.05), 0);
        let mut clock = FixedStep::new(0.025, 8);
        assert_eq!(clock.advance(0.025), 1);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut clock = FixedStep::new(0.04, 8);
        assert_eq!(clock.advance(0.05), 1);
        assert_eq!(clock.advance(0.05), 1);
        assert_eq!(clock.advance(0.03), 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FixedStep::new(0.01, 100);
        // 5s stall counts as 0.1s
        let ticks = clock.advance(5.0);
        assert!((9..=10).contains(&ticks), "ticks={ticks}");
    }

    #[test]
    fn test_substeps_are_capped_and_backlog_dropped() {
        let mut clock = FixedStep::new(0.01, 3);
        assert_eq!(clock.advance(0.1), 3);
        assert!(clock.until_next_tick() > Duration::ZERO);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_sleeping_the_hint_makes_a_tick_due() {
        let mut clock = FixedStep::new(0.0625, 8);
        assert_eq!(clock.advance(0.03125), 0);
        let wait = clock.until_next_tick();
        assert_eq!(wait, Duration::from_micros(31_250));

        assert_eq!(clock.advance(wait.as_secs_f32()), 1);
        assert_eq!(clock.until_next_tick(), Duration::from_micros(62_500));
    }

    #[test]
    fn test_negative_elapsed_is_ignored() {
        let mut clock = FixedStep::at_tick_rate();
        assert_eq!(clock.advance(-1.0), 0);
        assert!(clock.until_next_tick() <= Duration::from_secs_f32(SIM_DT));
    }

    #[test]
    fn test_fps_counter_steady_rate() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 / 30.0);
        }
        assert_eq!(fps.fps(), 30);
    }

    #[test]
    fn test_fps_counter_waits_for_full_window() {
        let mut fps = FpsCounter::default();
        for i in 1..=10 {
            fps.record(i as f64);
        }
        assert_eq!(fps.fps(), 0);
    }
}
