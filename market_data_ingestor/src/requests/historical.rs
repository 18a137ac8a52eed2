//! Historical bar requests with bounded retry.

use std::time::Duration;

use tracing::warn;

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError},
};

/// How many times to re-issue a failed request, and how long to wait in between.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff: `base_delay * 2^attempt`, capped at 2^10.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(10))
    }
}

/// Fetches bars, retrying transient failures according to `policy`.
///
/// Non-transient errors (bad parameters, unknown symbols) are returned immediately.
pub async fn fetch_with_retry(
    provider: &dyn DataProvider,
    params: BarsRequestParams,
    policy: &RetryPolicy,
) -> Result<Vec<BarSeries>, ProviderError> {
    let mut attempt = 0;
    loop {
        match provider.fetch_bars(params.clone()).await {
            Ok(series) => return Ok(series),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    ?delay,
                    error = %e,
                    "transient provider error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
