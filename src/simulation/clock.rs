//! Simulation clock
//!
//! Wall-clock time shifted by an adjustable offset. Timestamps on readings and
//! violations come from here, which lets tests and demos fast-forward through
//! a violation's lifetime without waiting for it.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Clock used for every timestamp the monitor records
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    offset: Duration,
}

impl SimulationClock {
    /// Clock that follows wall-clock time
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock pinned `offset` ahead of wall-clock time
    pub fn with_offset(offset: Duration) -> Self {
        Self { offset }
    }

    /// Current simulated time
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now() + self.offset
    }

    /// Move the clock forward; negative durations are ignored
    pub fn advance_by(&mut self, duration: Duration) {
        if duration <= Duration::zero() {
            return;
        }
        self.offset = self.offset + duration;
        debug!(advanced_by = %duration, total_offset = %self.offset, "Advanced simulation clock");
    }

    /// Total offset from wall-clock time
    pub fn offset(&self) -> Duration {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_tracks_wall_time() {
        let clock = SimulationClock::new();
        let before = Utc::now();
        let now = clock.now();
        assert!(now >= before);
        assert!(now - before < Duration::seconds(5));
    }

    #[test]
    fn test_advance_moves_forward_only() {
        let mut clock = SimulationClock::new();
        clock.advance_by(Duration::minutes(90));
        assert_eq!(clock.offset(), Duration::minutes(90));

        clock.advance_by(Duration::minutes(-30));
        assert_eq!(clock.offset(), Duration::minutes(90));

        let ahead = clock.now() - Utc::now();
        assert!(ahead > Duration::minutes(89));
    }
}
