//! Platform abstraction layer
//!
//! The out-of-play grace timer runs on wall-clock milliseconds, not tick
//! count, so changing the simulation rate never exempts a ball from timing
//! out. `Monotonic` reads the host clock; `Manual` lets tests and headless
//! drivers advance time explicitly (a paused host clock must not be
//! reinterpreted as infinite grace).

use std::time::Instant;

/// Millisecond time source for the simulation
#[derive(Debug, Clone)]
pub enum Clock {
    /// Monotonic wall clock, measured from creation
    Monotonic { epoch: Instant },
    /// Manually advanced clock (tests, scripted drivers)
    Manual { now_ms: u64 },
}

impl Default for Clock {
    fn default() -> Self {
        Self::monotonic()
    }
}

impl Clock {
    pub fn monotonic() -> Self {
        Self::Monotonic {
            epoch: Instant::now(),
        }
    }

    pub fn manual(now_ms: u64) -> Self {
        Self::Manual { now_ms }
    }

    /// Current time in milliseconds
    pub fn now_ms(&self) -> u64 {
        match self {
            Self::Monotonic { epoch } => epoch.elapsed().as_millis() as u64,
            Self::Manual { now_ms } => *now_ms,
        }
    }

    /// Advance a manual clock; no-op for the monotonic clock
    pub fn advance(&mut self, ms: u64) {
        if let Self::Manual { now_ms } = self {
            *now_ms += ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = Clock::manual(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 116);
    }

    #[test]
    fn test_monotonic_clock_is_non_decreasing() {
        let clock = Clock::monotonic();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
