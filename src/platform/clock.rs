//! Fixed-step clock
//!
//! Converts variable frame times into a whole number of fixed simulation
//! ticks, carrying the remainder to the next frame.

use crate::consts::MAX_SUBSTEPS;

/// Accumulates wall time and hands out fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    interval_ms: f32,
    accumulator_ms: f32,
    last_time_ms: Option<f64>,
}

impl FixedStepClock {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            accumulator_ms: 0.0,
            last_time_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Add `elapsed_ms` and return how many ticks are due (at most `MAX_SUBSTEPS`)
    ///
    /// Time beyond the cap is dropped to prevent a spiral of death.
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        self.accumulator_ms += elapsed_ms.max(0.0);
        let mut ticks = 0;
        while self.accumulator_ms >= self.interval_ms && ticks < MAX_SUBSTEPS {
            self.accumulator_ms -= self.interval_ms;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS && self.accumulator_ms >= self.interval_ms {
            log::debug!("Dropping {:.1}ms of backlog", self.accumulator_ms);
            self.accumulator_ms %= self.interval_ms;
        }
        ticks
    }

    /// Like `advance`, from an absolute timestamp (e.g. requestAnimationFrame time)
    pub fn advance_to(&mut self, now_ms: f64) -> u32 {
        let elapsed = match self.last_time_ms {
            Some(last) => (now_ms - last) as f32,
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        self.advance(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carries_remainder() {
        let mut clock = FixedStepClock::new(20.0);
        assert_eq!(clock.advance(16.0), 0);
        assert_eq!(clock.advance(16.0), 1);
        assert_eq!(clock.advance(28.0), 2);
    }

    #[test]
    fn test_caps_substeps() {
        let mut clock = FixedStepClock::new(20.0);
        assert_eq!(clock.advance(10_000.0), MAX_SUBSTEPS);
        // Backlog was dropped
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_absolute_timestamps() {
        let mut clock = FixedStepClock::new(20.0);
        assert_eq!(clock.advance_to(1000.0), 0);
        assert_eq!(clock.advance_to(1045.0), 2);
        assert_eq!(clock.advance_to(1060.0), 1);
    }
}
