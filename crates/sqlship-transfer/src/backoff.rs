//! Backoff between upload attempts

use std::time::Duration;

/// Delay before the first retry
pub const BASE_DELAY: Duration = Duration::from_millis(500);

/// Largest exponent applied to `BASE_DELAY` (multiplier cap of 64)
pub const MAX_EXPONENT: u32 = 6;

/// Delay after failed attempt `attempt` (1-based): `500ms * 2^(attempt-1)`,
/// with the multiplier capped at `2^6`
pub fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(MAX_EXPONENT);
    BASE_DELAY * (1u32 << exponent)
}

/// Blocks the calling sequence between attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_millis(500));
        assert_eq!(backoff_delay(2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(3), Duration::from_millis(2000));
        assert_eq!(backoff_delay(7), Duration::from_millis(32_000));
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(8), Duration::from_millis(32_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(32_000));
    }

    #[test]
    fn test_backoff_non_decreasing() {
        let delays: Vec<_> = (1..20).map(backoff_delay).collect();
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_attempt_zero_treated_as_first() {
        assert_eq!(backoff_delay(0), BASE_DELAY);
    }
}
