//! Generic "poll until" primitive driven by a `RetryPolicy`.

use std::future::Future;

use anyhow::Result;
use tracing::trace;

use crate::domain::error::LifecycleError;
use crate::domain::retry::RetryPolicy;

/// Outcome of one poll attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// Condition met; stop polling.
    Ready(T),
    /// Not yet; try again after the policy interval.
    Pending,
    /// Terminal failure; stop polling and propagate.
    Fatal(anyhow::Error),
}

/// Run `attempt` until it is ready, fatal, or the policy runs out.
///
/// The zero-based attempt number is passed to each call.
///
/// # Errors
///
/// Returns the fatal error of an attempt, or `LifecycleError::WaitExhausted`
/// when a bounded policy runs out of attempts.
pub async fn poll_until<T, F, Fut>(policy: &RetryPolicy, what: &str, mut attempt: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut n: u32 = 0;
    while policy.allows(n) {
        let delay = policy.delay_before(n);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match attempt(n).await {
            Attempt::Ready(value) => return Ok(value),
            Attempt::Fatal(err) => return Err(err),
            Attempt::Pending => trace!(what, attempt = n, "not ready yet"),
        }
        n = n.saturating_add(1);
    }
    Err(LifecycleError::WaitExhausted {
        what: what.to_string(),
        attempts: n,
    }
    .into())
}
