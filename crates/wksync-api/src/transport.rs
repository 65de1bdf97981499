use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::ApiError;

pub const RATE_LIMIT_REMAINING: &str = "RateLimit-Remaining";
pub const RATE_LIMIT_RESET: &str = "RateLimit-Reset";
pub const WANIKANI_REVISION: &str = "20170710";

/// Wait applied when a 429 arrives without a usable reset header.
const FALLBACK_WAIT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: String) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
        }
    }
}

/// A response with the rate-limit headers carried along as raw strings;
/// parsing them is the back-off policy's job.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    pub rate_limit_remaining: Option<String>,
    pub rate_limit_reset: Option<String>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One request/response exchange. The trait seam lets tests script
/// responses without a live server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Real transport over reqwest, attaching WaniKani auth headers.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
        };

        let mut builder = builder
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Wanikani-Revision", WANIKANI_REVISION);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let rate_limit_remaining = header_value(response.headers(), RATE_LIMIT_REMAINING);
        let rate_limit_reset = header_value(response.headers(), RATE_LIMIT_RESET);
        let body = response.text().await?;

        Ok(ApiResponse {
            status,
            body,
            rate_limit_remaining,
            rate_limit_reset,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Wraps a transport with the quota back-off policy: when a response signals
/// an exhausted quota or comes back 429, wait for the reset and resend the
/// identical request exactly once. The resend's response is final.
pub struct RateLimited<T> {
    pub(crate) inner: T,
}

impl<T: Transport> RateLimited<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// At most one automatic resend per logical call. A failure that
    /// survives the resend is returned as-is, never raised.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.inner.send(request).await?;

        let Some(wait) = backoff_wait(&response) else {
            return Ok(response);
        };

        tracing::warn!(
            url = %request.url,
            wait_secs = wait.as_secs(),
            "rate limit reached, waiting before resend"
        );
        countdown(wait).await;
        self.inner.send(request).await
    }
}

/// How long to wait before the single resend, or None to accept the
/// response as-is.
fn backoff_wait(response: &ApiResponse) -> Option<Duration> {
    let reset = response
        .rate_limit_reset
        .as_deref()
        .and_then(|value| value.parse::<u64>().ok());

    if response.status == 429 {
        return Some(match reset {
            Some(reset) => until_reset(reset),
            None => Duration::from_secs(FALLBACK_WAIT_SECS),
        });
    }

    let remaining = response
        .rate_limit_remaining
        .as_deref()
        .and_then(|value| value.parse::<u64>().ok());
    if remaining == Some(0) {
        if let Some(reset) = reset {
            return Some(until_reset(reset));
        }
    }

    None
}

fn until_reset(reset_epoch: u64) -> Duration {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    Duration::from_secs(reset_epoch.saturating_sub(now).max(1))
}

/// Sleep in one-second ticks so the wait stays visible in the logs.
async fn countdown(wait: Duration) {
    let total = wait.as_secs().max(1);
    for elapsed in 0..total {
        let left = total - elapsed;
        if left == total || left % 10 == 0 {
            tracing::info!(seconds_left = left, "waiting for rate limit reset");
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, ok};
    use tokio::time::Instant;

    fn epoch_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn response(
        status: u16,
        remaining: Option<&str>,
        reset: Option<String>,
    ) -> ApiResponse {
        ApiResponse {
            status,
            body: String::new(),
            rate_limit_remaining: remaining.map(str::to_string),
            rate_limit_reset: reset,
        }
    }

    #[tokio::test]
    async fn healthy_response_passes_through() {
        let transport = RateLimited::new(ScriptedTransport::new(vec![ok("{}")]));

        let response = transport
            .send(&ApiRequest::get("http://x/subjects".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.inner.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_quota_waits_until_reset_and_resends_once() {
        let reset = epoch_now() + 5;
        let transport = RateLimited::new(ScriptedTransport::new(vec![
            response(200, Some("0"), Some(reset.to_string())),
            response(500, Some("59"), None),
        ]));

        let started = Instant::now();
        let response = transport
            .send(&ApiRequest::get("http://x/subjects".to_string()))
            .await
            .unwrap();

        // The resend's response is final even when it is another failure.
        assert_eq!(response.status, 500);
        assert_eq!(transport.inner.request_count(), 2);
        let waited = started.elapsed().as_secs();
        assert!((3..=6).contains(&waited), "waited {waited}s");
    }

    #[tokio::test(start_paused = true)]
    async fn too_many_requests_without_reset_uses_fallback_wait() {
        let transport = RateLimited::new(ScriptedTransport::new(vec![
            response(429, None, None),
            ok("{}"),
        ]));

        let started = Instant::now();
        let response = transport
            .send(&ApiRequest::get("http://x/subjects".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.inner.request_count(), 2);
        assert_eq!(started.elapsed().as_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn unparsable_reset_on_429_uses_fallback_wait() {
        let transport = RateLimited::new(ScriptedTransport::new(vec![
            response(429, None, Some("soon".to_string())),
            ok("{}"),
        ]));

        let started = Instant::now();
        transport
            .send(&ApiRequest::get("http://x/subjects".to_string()))
            .await
            .unwrap();

        assert_eq!(transport.inner.request_count(), 2);
        assert_eq!(started.elapsed().as_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn resend_is_never_retried_again() {
        // The second response is another 429; it must be surfaced, not
        // retried.
        let reset = epoch_now() + 2;
        let transport = RateLimited::new(ScriptedTransport::new(vec![
            response(429, Some("0"), Some(reset.to_string())),
            response(429, Some("0"), Some((reset + 60).to_string())),
        ]));

        let response = transport
            .send(&ApiRequest::get("http://x/subjects".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, 429);
        assert_eq!(transport.inner.request_count(), 2);
    }

    #[tokio::test]
    async fn zero_remaining_without_reset_is_accepted_as_is() {
        let transport = RateLimited::new(ScriptedTransport::new(vec![response(
            200,
            Some("0"),
            None,
        )]));

        let response = transport
            .send(&ApiRequest::get("http://x/subjects".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.inner.request_count(), 1);
    }

    #[test]
    fn reset_in_the_past_still_waits_one_second() {
        let response = response(200, Some("0"), Some("1".to_string()));
        assert_eq!(backoff_wait(&response), Some(Duration::from_secs(1)));
    }
}
