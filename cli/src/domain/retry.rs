//! Retry policy value object consumed by the generic poll primitive.

use std::time::Duration;

/// How often and how many times a condition is re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before the first attempt.
    pub initial_delay: Duration,
    /// Wait between subsequent attempts.
    pub interval: Duration,
    /// `None` polls until the condition resolves.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    #[must_use]
    pub const fn unbounded(interval: Duration) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval,
            max_attempts: None,
        }
    }

    #[must_use]
    pub const fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    /// Policy polling every `interval` for at most `budget` (rounded up).
    #[must_use]
    pub fn within(interval: Duration, budget: Option<Duration>) -> Self {
        match budget {
            None => Self::unbounded(interval),
            Some(budget) => {
                let step = interval.as_millis().max(1);
                let attempts = budget.as_millis().div_ceil(step).max(1);
                Self::bounded(interval, u32::try_from(attempts).unwrap_or(u32::MAX))
            }
        }
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay to sleep before the zero-based `attempt`.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            self.initial_delay
        } else {
            self.interval
        }
    }

    /// Whether the zero-based `attempt` may run.
    #[must_use]
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }
}
