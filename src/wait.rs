//! Resource readiness polling with exponential backoff and cancellation.
//!
//! Provides a single bounded-wait abstraction for any asynchronously
//! provisioned resource: poll a state-fetch function until a terminal
//! predicate holds, with configurable backoff, jitter, timeout, and
//! cancellation. The same abstraction serves NAT gateway activation and
//! NAT gateway deletion; nothing is duplicated per resource kind.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Configuration for resource waiting with exponential backoff.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Initial delay between checks
    pub initial_delay: Duration,
    /// Maximum delay between checks (cap for exponential growth)
    pub max_delay: Duration,
    /// Maximum total time to wait before timeout
    pub timeout: Duration,
    /// Jitter factor (0.0 - 1.0) to add randomness to delays
    pub jitter: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
            jitter: 0.25,
        }
    }
}

impl WaitConfig {
    /// Create a new WaitConfig with the given timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Fixed-interval polling: no backoff growth, no jitter.
    pub fn fixed_interval(interval: Duration, timeout: Duration) -> Self {
        Self {
            initial_delay: interval,
            max_delay: interval,
            timeout,
            jitter: 0.0,
        }
    }
}

/// Failure modes of a bounded wait.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The timeout elapsed before any terminal state was observed.
    #[error("Timeout waiting for {resource} after {timeout:?} ({attempts} attempts)")]
    Timeout {
        resource: String,
        timeout: Duration,
        attempts: u32,
    },

    /// The caller cancelled the wait. The remote resource is untouched;
    /// only the polling stops.
    #[error("Wait for {resource} cancelled")]
    Cancelled { resource: String },

    /// The state fetch itself failed.
    #[error("State check for {resource} failed")]
    Check {
        resource: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Wait until a fetched state satisfies a terminal predicate.
///
/// Repeatedly invokes `fetch`, backing off exponentially between
/// attempts, and returns the first state for which `is_terminal` is
/// true. No fetch is issued after a terminal state, timeout, or
/// cancellation has been returned.
///
/// # Example
/// ```ignore
/// let state = wait_for_state(
///     WaitConfig::default(),
///     Some(&cancel_token),
///     || async { net.describe_nat_gateway(&nat_id).await.map(|n| n.state) },
///     |state| state.is_terminal(),
///     &nat_id,
/// )
/// .await?;
/// ```
pub async fn wait_for_state<S, F, Fut, P>(
    config: WaitConfig,
    cancel: Option<&CancellationToken>,
    fetch: F,
    is_terminal: P,
    resource_name: &str,
) -> Result<S, WaitError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<S>>,
    P: Fn(&S) -> bool,
    S: std::fmt::Debug,
{
    let start = std::time::Instant::now();
    let mut delay = config.initial_delay;
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        // Check cancellation before each attempt
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(WaitError::Cancelled {
                    resource: resource_name.to_string(),
                });
            }
        }

        // Check timeout
        if start.elapsed() >= config.timeout {
            return Err(WaitError::Timeout {
                resource: resource_name.to_string(),
                timeout: config.timeout,
                attempts,
            });
        }

        let state = fetch().await.map_err(|e| WaitError::Check {
            resource: resource_name.to_string(),
            source: e,
        })?;

        if is_terminal(&state) {
            debug!(resource = %resource_name, attempts, state = ?state, "Terminal state reached");
            return Ok(state);
        }

        let jittered = jittered_delay(delay, config.jitter);
        debug!(
            resource = %resource_name,
            attempt = attempts,
            state = ?state,
            delay_ms = jittered.as_millis(),
            "Not yet terminal, retrying"
        );

        // Wait with cancellation support
        tokio::select! {
            _ = tokio::time::sleep(jittered) => {}
            _ = async {
                if let Some(token) = cancel {
                    token.cancelled().await
                } else {
                    std::future::pending::<()>().await
                }
            } => {
                return Err(WaitError::Cancelled {
                    resource: resource_name.to_string(),
                });
            }
        }

        // Exponential backoff
        delay = (delay * 2).min(config.max_delay);
    }
}

/// Add jitter to a duration to prevent thundering herd.
fn jittered_delay(base: Duration, jitter_factor: f64) -> Duration {
    if jitter_factor <= 0.0 {
        return base;
    }
    let jitter = rand::thread_rng().gen_range(0.0..jitter_factor);
    Duration::from_secs_f64(base.as_secs_f64() * (1.0 + jitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum TestState {
        Waiting,
        Ready,
    }

    #[tokio::test]
    async fn terminal_immediately() {
        let result = wait_for_state(
            WaitConfig::default(),
            None,
            || async { Ok(TestState::Ready) },
            |s| *s == TestState::Ready,
            "test-resource",
        )
        .await;

        assert_eq!(result.unwrap(), TestState::Ready);
    }

    #[tokio::test]
    async fn retries_then_reaches_terminal() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = wait_for_state(
            WaitConfig {
                initial_delay: Duration::from_millis(10),
                max_delay: Duration::from_millis(50),
                timeout: Duration::from_secs(5),
                jitter: 0.0,
            },
            None,
            || {
                let c = counter_clone.clone();
                async move {
                    let count = c.fetch_add(1, Ordering::SeqCst);
                    Ok(if count >= 2 {
                        TestState::Ready
                    } else {
                        TestState::Waiting
                    })
                }
            },
            |s| *s == TestState::Ready,
            "test-resource",
        )
        .await;

        assert_eq!(result.unwrap(), TestState::Ready);
        // Terminal on the 3rd fetch, and no fetch afterwards
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn times_out() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = wait_for_state(
            WaitConfig {
                initial_delay: Duration::from_millis(10),
                max_delay: Duration::from_millis(50),
                timeout: Duration::from_millis(100),
                jitter: 0.0,
            },
            None,
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(TestState::Waiting)
                }
            },
            |s| *s == TestState::Ready,
            "test-resource",
        )
        .await;

        assert!(matches!(result, Err(WaitError::Timeout { .. })));
        let fetches_at_timeout = counter.load(Ordering::SeqCst);

        // No fetch after the timeout was returned
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), fetches_at_timeout);
    }

    #[tokio::test]
    async fn cancellation_stops_polling() {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let result = wait_for_state(
            WaitConfig {
                initial_delay: Duration::from_millis(10),
                max_delay: Duration::from_millis(100),
                timeout: Duration::from_secs(10),
                jitter: 0.0,
            },
            Some(&cancel),
            || async { Ok(TestState::Waiting) },
            |s| *s == TestState::Ready,
            "test-resource",
        )
        .await;

        assert!(matches!(result, Err(WaitError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn fetch_error_propagates() {
        let result = wait_for_state(
            WaitConfig::default(),
            None,
            || async { anyhow::bail!("describe failed") },
            |_: &TestState| true,
            "test-resource",
        )
        .await;

        assert!(matches!(result, Err(WaitError::Check { .. })));
    }

    #[test]
    fn fixed_interval_has_no_growth() {
        let config =
            WaitConfig::fixed_interval(Duration::from_secs(5), Duration::from_secs(60));
        assert_eq!(config.initial_delay, config.max_delay);
        assert_eq!(config.jitter, 0.0);
    }

    #[test]
    fn zero_jitter_is_identity() {
        let base = Duration::from_millis(500);
        assert_eq!(jittered_delay(base, 0.0), base);
    }
}
