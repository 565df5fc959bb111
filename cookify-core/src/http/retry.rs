//! Bounded retries with exponential backoff.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::error::FetchError;

use super::client::HttpClient;

/// How many times to try a request and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(initial_delay_ms),
        }
    }

    /// Delay after the given failed attempt (1-based): `initial * 2^(attempt-1)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

/// Fetch `url` and decode it as JSON, retrying failed attempts.
///
/// A non-success status or an undecodable body counts as a failed attempt.
/// Once every attempt has failed, returns `FetchError::RetriesExhausted`
/// carrying the last attempt's error message.
pub async fn fetch_json_with_retry<C, T>(
    client: &C,
    url: &str,
    policy: RetryPolicy,
) -> Result<T, FetchError>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        tracing::debug!(url, attempt, attempts, "remote fetch attempt");

        let result = match client.fetch_text(url).await {
            Ok(body) => serde_json::from_str::<T>(&body)
                .map_err(|e| FetchError::InvalidBody(e.to_string())),
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(url, attempt, attempts, error = %e, "remote fetch attempt failed");
                last_error = e.to_string();
            }
        }

        if attempt < attempts {
            sleep(policy.delay_after(attempt)).await;
        }
    }

    Err(FetchError::RetriesExhausted {
        attempts,
        message: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockClient;
    use serde_json::Value;

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(4, 500);
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_failures() {
        let url = "http://x/filter";
        let client = MockClient::new()
            .with_status(url, 500)
            .with_error(url, "connection reset")
            .with_body(url, r#"{"meals": []}"#);

        let start = tokio::time::Instant::now();
        let value: Value = fetch_json_with_retry(&client, url, RetryPolicy::new(3, 100))
            .await
            .unwrap();

        assert_eq!(value["meals"], serde_json::json!([]));
        assert_eq!(client.call_count(url), 3);
        // 100ms after the first failure, 200ms after the second
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_carries_last_error() {
        let url = "http://x/lookup";
        let client = MockClient::new()
            .with_error(url, "first")
            .with_status(url, 502);

        let err = fetch_json_with_retry::<_, Value>(&client, url, RetryPolicy::new(2, 300))
            .await
            .unwrap_err();

        match err {
            FetchError::RetriesExhausted { attempts, message } => {
                assert_eq!(attempts, 2);
                assert!(message.contains("502"), "message was {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.call_count(url), 2);
    }

    #[tokio::test]
    async fn test_bad_json_is_retried() {
        let url = "http://x/search";
        let client = MockClient::new()
            .with_body(url, "<html>oops</html>")
            .with_body(url, r#"{"meals": null}"#);

        let value: Value = fetch_json_with_retry(&client, url, RetryPolicy::new(2, 0))
            .await
            .unwrap();
        assert!(value["meals"].is_null());
    }
}
