//! Frame clock: scheduler timestamps to clamped tick durations, and the
//! fixed-step accumulator that turns them into whole ticks

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Converts animation-frame timestamps (milliseconds) into elapsed seconds
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Elapsed seconds since the previous frame. The first frame after a
    /// reset yields one nominal step; gaps are clamped to `MAX_FRAME_DT`.
    pub fn frame(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_ms = Some(timestamp_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (after pause/resume or a restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Fixed-step pacing: whole `SIM_DT` steps per frame, at most
/// `MAX_SUBSTEPS`, with the remainder carried to the next frame
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    clock: FrameClock,
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps to run for the frame at `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        let dt = self.clock.frame(timestamp_ms);
        self.accumulate(dt)
    }

    /// Add `dt` seconds and take out as many whole steps as allowed
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Seconds carried over to the next frame
    pub fn carried(&self) -> f32 {
        self.accumulator
    }

    /// Drop carried time and the last timestamp (start, resume, restart)
    pub fn reset(&mut self) {
        self.clock.reset();
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_nominal() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(123_456.0), SIM_DT);
        let dt = clock.frame(123_456.0 + 16.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_gap_clamped() {
        let mut clock = FrameClock::new();
        clock.frame(0.0);
        assert_eq!(clock.frame(5_000.0), MAX_FRAME_DT);
        // Timestamps going backwards never produce negative time
        assert_eq!(clock.frame(4_000.0), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.frame(0.0);
        clock.reset();
        assert_eq!(clock.frame(60_000.0), SIM_DT);
    }

    #[test]
    fn test_steps_capped_and_rest_carried() {
        let mut pacing = FixedStep::new();
        // 12.6 steps worth of time
        assert_eq!(pacing.accumulate(0.21), MAX_SUBSTEPS);
        assert_eq!(pacing.accumulate(0.0), 4);
        assert_eq!(pacing.accumulate(0.0), 0);
        assert!(pacing.carried() > 0.0 && pacing.carried() < SIM_DT);
    }

    #[test]
    fn test_remainder_adds_up_across_frames() {
        let mut pacing = FixedStep::new();
        assert_eq!(pacing.frame(1_000.0), 1);
        assert_eq!(pacing.frame(1_025.0), 1);
        // 8.3 ms carried plus 10 ms makes another step
        assert_eq!(pacing.frame(1_035.0), 1);
        assert_eq!(pacing.frame(1_040.0), 0);
    }

    #[test]
    fn test_frame_gap_limited() {
        let mut pacing = FixedStep::new();
        pacing.frame(0.0);
        // A long stall yields one clamped frame of steps, not a catch-up burst
        let steps = pacing.frame(30_000.0);
        assert!(steps > 0 && steps < MAX_SUBSTEPS);
        assert!(pacing.carried() < SIM_DT);
    }

    #[test]
    fn test_reset_forgets_paused_time() {
        let mut pacing = FixedStep::new();
        pacing.frame(0.0);
        pacing.frame(10.0);
        assert!(pacing.carried() > 0.0);

        pacing.reset();
        assert_eq!(pacing.carried(), 0.0);
        // First frame after resuming is one nominal step, not the gap
        assert_eq!(pacing.frame(90_000.0), 1);
    }
}
