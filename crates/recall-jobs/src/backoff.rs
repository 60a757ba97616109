//! Exponential retry backoff (spec §4.12: "exponential backoff, 2-5s").

use std::time::Duration;

const BASE_SECS: f64 = 2.0;
const MAX_SECS: f64 = 300.0;

/// Delay before the `attempt`-th retry (1-indexed). Doubles from a 2s base,
/// capped at 5 minutes so a chronically failing job doesn't starve its
/// topic's rate limiter, but starts in the 2-5s band the spec calls out.
pub fn backoff_duration(attempt: u32) -> Duration {
    let secs = BASE_SECS * 2f64.powi(attempt.saturating_sub(1) as i32);
    Duration::from_secs_f64(secs.min(MAX_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_two_to_five_second_band() {
        let d = backoff_duration(1);
        assert!(d.as_secs_f64() >= 2.0 && d.as_secs_f64() <= 5.0);
    }

    #[test]
    fn grows_and_caps() {
        assert!(backoff_duration(2) > backoff_duration(1));
        assert_eq!(backoff_duration(20).as_secs_f64(), MAX_SECS);
    }
}
