//! Retry with exponential back-off and jitter for idempotent reads.
//!
//! Only GET requests go through [`retry_transient`]. Creates, updates,
//! deletes and uploads are sent once.

use std::future::Future;
use std::time::Duration;

use lumizo_core::AppConfig;

use crate::error::ApiError;

/// `true` for errors worth another attempt: timeouts, refused connections
/// and 5xx responses. Client errors and malformed bodies are final.
pub(crate) fn is_retriable(err: &ApiError) -> bool {
    match err {
        ApiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ApiError::UnexpectedStatus { status, .. } => *status >= 500,
        ApiError::NotFound { .. }
        | ApiError::Deserialize { .. }
        | ApiError::InvalidBaseUrl { .. }
        | ApiError::Io { .. } => false,
    }
}

/// Back-off schedule for idempotent reads.
///
/// Retry `n` (1-based) may wait up to `base_delay_ms * multiplier^(n-1)`,
/// never more than `max_delay_ms`. The actual wait is drawn uniformly from
/// the upper half of that ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub multiplier: u32,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Sends every request once.
    pub const NONE: Self = Self {
        max_retries: 0,
        base_delay_ms: 0,
        multiplier: 1,
        max_delay_ms: 0,
    };

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_backoff_base_ms,
            multiplier: config.retry_backoff_multiplier,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }

    /// `max_retries` attempts with no waiting in between.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::NONE
        }
    }

    /// Longest wait before retry `retry`. Zero for `retry == 0`.
    #[must_use]
    pub fn ceiling(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let ms = u64::from(self.multiplier)
            .checked_pow(retry - 1)
            .and_then(|factor| self.base_delay_ms.checked_mul(factor))
            .map_or(self.max_delay_ms, |ms| ms.min(self.max_delay_ms));
        Duration::from_millis(ms)
    }

    fn delay(&self, retry: u32) -> Duration {
        let ceiling = self.ceiling(retry);
        let half = ceiling / 2;
        half + (ceiling - half).mul_f64(rand::random::<f64>())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Runs `operation` until it succeeds, fails permanently, or `policy`
/// runs out of retries.
pub(crate) async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry == policy.max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retry += 1;
        let delay = policy.delay(retry);
        tracing::warn!(
            retry,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "Lumizo API transient error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_error() -> ApiError {
        ApiError::UnexpectedStatus {
            status: 503,
            url: "http://localhost/api/products".to_owned(),
            body: String::new(),
        }
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&server_error()));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&ApiError::UnexpectedStatus {
            status: 400,
            url: "u".to_owned(),
            body: "name is required".to_owned(),
        }));
        assert!(!is_retriable(&ApiError::NotFound {
            url: "u".to_owned()
        }));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_retriable(&ApiError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_transient(&RetryPolicy::immediate(2), || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_transient(&RetryPolicy::immediate(1), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(server_error())
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(ApiError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_returned_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_transient(&RetryPolicy::immediate(3), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ApiError::NotFound {
                    url: "u".to_owned(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 5,
            base_delay_ms: 200,
            multiplier: 3,
            max_delay_ms: 5_000,
        }
    }

    #[test]
    fn ceiling_grows_by_multiplier_up_to_cap() {
        let policy = policy();
        assert_eq!(policy.ceiling(0), Duration::ZERO);
        assert_eq!(policy.ceiling(1), Duration::from_millis(200));
        assert_eq!(policy.ceiling(2), Duration::from_millis(600));
        assert_eq!(policy.ceiling(3), Duration::from_millis(1_800));
        assert_eq!(policy.ceiling(4), Duration::from_millis(5_000));
        assert_eq!(policy.ceiling(60), Duration::from_millis(5_000));
    }

    #[test]
    fn delay_stays_in_upper_half_of_ceiling() {
        let policy = policy();
        for retry in 1..=4 {
            let ceiling = policy.ceiling(retry);
            for _ in 0..50 {
                let delay = policy.delay(retry);
                assert!(delay >= ceiling / 2 && delay <= ceiling, "{delay:?} vs {ceiling:?}");
            }
        }
    }

    #[test]
    fn policy_reads_config() {
        let config = AppConfig {
            api_base_url: "http://localhost:5000/api".to_owned(),
            env: lumizo_core::Environment::Test,
            log_level: "info".to_owned(),
            request_timeout_secs: 30,
            user_agent: "lumizo-test".to_owned(),
            max_retries: 4,
            retry_backoff_base_ms: 100,
            retry_backoff_multiplier: 2,
            retry_max_delay_ms: 1_000,
            page_limit: 12,
            cart_path: "cart.json".into(),
            fallback_path: None,
            image_timeout_secs: 10,
            company_name: "Lumizo".to_owned(),
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.ceiling(5), Duration::from_millis(1_000));
    }
}
