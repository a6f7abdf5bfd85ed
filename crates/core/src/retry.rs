//! Bounded retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// Attempt budget and backoff base for one retried sequence.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	pub attempts: u32,
	pub base_delay: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			attempts: 3,
			base_delay: Duration::from_millis(400),
		}
	}
}

/// Runs `op` up to `policy.attempts` times, sleeping `base_delay * n`
/// after the n-th failure. The last error is returned unchanged.
pub async fn retry_with_backoff<T, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let attempts = policy.attempts.max(1);
	let mut last_err = None;

	for attempt in 1..=attempts {
		match op().await {
			Ok(value) => return Ok(value),
			Err(err) => {
				debug!(
					target = "wv.retry",
					%label,
					attempt,
					attempts,
					error = %err,
					"attempt failed"
				);
				last_err = Some(err);
				if attempt < attempts {
					tokio::time::sleep(policy.base_delay * attempt).await;
				}
			}
		}
	}

	Err(last_err.expect("at least one attempt ran"))
}
