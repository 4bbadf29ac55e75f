//! Bounded retry policy for catalog requests.

use std::time::Duration;

/// Upper bound on network attempts per logical call, and the default budget.
pub const MAX_ATTEMPTS: u32 = 3;

/// Default backoff step after HTTP 429.
const DEFAULT_RATE_LIMIT_STEP: Duration = Duration::from_millis(1000);

/// Default backoff step after a network fault or non-429 error status.
const DEFAULT_FAILURE_STEP: Duration = Duration::from_millis(500);

/// Why an attempt did not produce a usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// HTTP 429.
    RateLimited,
    /// Network fault or any other non-2xx status.
    Hard,
}

/// Attempt budget and backoff steps.
///
/// Rate limiting and hard failures share one attempt budget. The wait
/// before attempt `n + 1` is `step * n`, where the step depends on why
/// attempt `n` failed, and is never shorter than the previous wait plus
/// `failure_step`. Waits within one call are therefore strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    rate_limit_step: Duration,
    failure_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            rate_limit_step: DEFAULT_RATE_LIMIT_STEP,
            failure_step: DEFAULT_FAILURE_STEP,
        }
    }
}

impl RetryPolicy {
    /// Sets the attempt budget. The client builder accepts `1..=MAX_ATTEMPTS`.
    #[must_use]
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the backoff step after HTTP 429.
    #[must_use]
    pub const fn rate_limit_step(mut self, step: Duration) -> Self {
        self.rate_limit_step = step;
        self
    }

    /// Sets the backoff step after a hard failure.
    #[must_use]
    pub const fn failure_step(mut self, step: Duration) -> Self {
        self.failure_step = step;
        self
    }

    /// Attempt budget.
    #[must_use]
    pub const fn attempt_budget(&self) -> u32 {
        self.max_attempts
    }

    /// Whether the budget is within `1..=MAX_ATTEMPTS`.
    #[must_use]
    pub const fn is_within_ceiling(&self) -> bool {
        self.max_attempts >= 1 && self.max_attempts <= MAX_ATTEMPTS
    }

    /// Whether `attempt` (1-based) is the last one the budget allows.
    #[must_use]
    pub const fn is_last(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }

    /// Wait before the attempt following `attempt` (1-based).
    ///
    /// `previous` is the wait taken before `attempt`, if any.
    #[must_use]
    pub fn delay(
        &self,
        failure: AttemptFailure,
        attempt: u32,
        previous: Option<Duration>,
    ) -> Duration {
        let step = match failure {
            AttemptFailure::RateLimited => self.rate_limit_step,
            AttemptFailure::Hard => self.failure_step,
        };
        let scaled = step.saturating_mul(attempt);
        previous.map_or(scaled, |prev| {
            scaled.max(prev.saturating_add(self.failure_step))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        // Arrange & Act
        let policy = RetryPolicy::default();

        // Assert
        assert_eq!(policy.attempt_budget(), 3);
        assert!(!policy.is_last(1));
        assert!(!policy.is_last(2));
        assert!(policy.is_last(3));
        assert!(policy.is_within_ceiling());
    }

    #[test]
    fn test_ceiling_bounds() {
        // Arrange & Act & Assert
        assert!(!RetryPolicy::default().max_attempts(0).is_within_ceiling());
        assert!(RetryPolicy::default().max_attempts(1).is_within_ceiling());
        assert!(!RetryPolicy::default().max_attempts(4).is_within_ceiling());
    }

    #[test]
    fn test_rate_limit_delays_scale_with_attempt() {
        // Arrange
        let policy = RetryPolicy::default();

        // Act
        let first = policy.delay(AttemptFailure::RateLimited, 1, None);
        let second = policy.delay(AttemptFailure::RateLimited, 2, Some(first));

        // Assert
        assert_eq!(first, Duration::from_millis(1000));
        assert_eq!(second, Duration::from_millis(2000));
    }

    #[test]
    fn test_hard_failure_delays_scale_with_attempt() {
        // Arrange
        let policy = RetryPolicy::default();

        // Act
        let first = policy.delay(AttemptFailure::Hard, 1, None);
        let second = policy.delay(AttemptFailure::Hard, 2, Some(first));

        // Assert
        assert_eq!(first, Duration::from_millis(500));
        assert_eq!(second, Duration::from_millis(1000));
    }

    #[test]
    fn test_mixed_failures_stay_strictly_increasing() {
        // Arrange
        let policy = RetryPolicy::default();

        // Act: 429 on attempt 1 (1000ms), hard failure on attempt 2 (500 * 2 = 1000ms).
        let first = policy.delay(AttemptFailure::RateLimited, 1, None);
        let second = policy.delay(AttemptFailure::Hard, 2, Some(first));

        // Assert
        assert!(second > first);
        assert_eq!(second, Duration::from_millis(1500));
    }

    #[test]
    fn test_custom_steps() {
        // Arrange
        let policy = RetryPolicy::default()
            .max_attempts(5)
            .rate_limit_step(Duration::from_millis(10))
            .failure_step(Duration::from_millis(2));

        // Act & Assert
        assert_eq!(policy.attempt_budget(), 5);
        assert_eq!(
            policy.delay(AttemptFailure::RateLimited, 3, None),
            Duration::from_millis(30)
        );
        assert_eq!(
            policy.delay(AttemptFailure::Hard, 4, None),
            Duration::from_millis(8)
        );
    }
}
