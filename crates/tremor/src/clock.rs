//! Fixed-timestep accumulator
//!
//! Frame deltas of any size go in; whole physics ticks of exactly
//! `fixed_step` come out. The remainder carries to the next frame.

/// Accumulated wall-clock time awaiting conversion into fixed ticks
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    accumulated: f64,
    fixed_step: f64,
}

impl SimulationClock {
    pub fn new(fixed_step: f64) -> Self {
        Self {
            accumulated: 0.0,
            fixed_step,
        }
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Add a frame delta and return how many fixed ticks are now due
    ///
    /// The returned ticks are already subtracted from the accumulator.
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, frame_dt: f64) -> usize {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulated += frame_dt;
        }
        let mut ticks = 0;
        while self.accumulated >= self.fixed_step {
            self.accumulated -= self.fixed_step;
            ticks += 1;
        }
        ticks
    }

    /// Drop any carried-over time
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ticks_and_remainder() {
        let mut clock = SimulationClock::new(0.01);
        assert_eq!(clock.advance(0.025), 2);
        assert!((clock.accumulated() - 0.005).abs() < 1e-12);
        assert_eq!(clock.advance(0.006), 1);
        assert!((clock.accumulated() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_small_frames_accumulate() {
        let mut clock = SimulationClock::new(0.01);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!((clock.accumulated() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_frame_rate_independence() {
        // One simulated second at 60 fps and at 25 fps gives the same tick count
        let mut fast = SimulationClock::new(0.01);
        let mut slow = SimulationClock::new(0.01);
        let fast_ticks: usize = (0..60).map(|_| fast.advance(1.0 / 60.0)).sum();
        let slow_ticks: usize = (0..25).map(|_| slow.advance(1.0 / 25.0)).sum();
        assert!((99..=100).contains(&fast_ticks));
        assert!((99..=100).contains(&slow_ticks));
        assert!((fast_ticks as i64 - slow_ticks as i64).abs() <= 1);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = SimulationClock::new(0.01);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f64::NAN), 0);
        assert_eq!(clock.advance(f64::INFINITY), 0);
        assert_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn test_long_pause_bursts_unless_reset() {
        let mut clock = SimulationClock::new(0.01);
        assert_eq!(clock.advance(0.009), 0);
        clock.reset();
        assert_eq!(clock.advance(0.002), 0);
        assert!((clock.accumulated() - 0.002).abs() < 1e-12);

        // A five second stall is paid back in one frame
        assert_eq!(clock.advance(5.0), 500);
    }
}
