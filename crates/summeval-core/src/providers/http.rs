//! JSON-over-HTTP transport shared by the live judge providers: status
//! mapping and retry.
//!
//! Provider clients never interpret status codes themselves.

use crate::errors::{ProviderError, ProviderResult};
use rand::Rng;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub max_retries: u32,
    /// First retry waits up to `2 * backoff_base`, doubling per attempt.
    pub backoff_base: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonHttp {
    provider: &'static str,
    client: reqwest::Client,
    settings: HttpSettings,
}

impl JsonHttp {
    pub fn new(provider: &'static str, settings: HttpSettings) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ProviderError::Network {
                provider: provider.to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            provider,
            client,
            settings,
        })
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// POST `body` and return the decoded JSON reply, retrying transient failures.
    pub async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> ProviderResult<serde_json::Value> {
        super::network::check_outbound(url)?;

        let mut retries = 0;
        loop {
            match self.post_once(url, headers.clone(), body).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries < self.settings.max_retries => {
                    retries += 1;
                    let backoff = self.backoff_for(&e, retries);
                    warn!(
                        provider = self.provider,
                        error = %e,
                        retry = retries,
                        max_retries = self.settings.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "retrying judge request"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn backoff_for(&self, err: &ProviderError, retries: u32) -> Duration {
        match err {
            ProviderError::RateLimited {
                retry_after: Some(retry_after),
                ..
            } => {
                let base_ms = (*retry_after).min(MAX_BACKOFF).as_millis() as u64;
                let jitter: f64 = rand::thread_rng().gen_range(0.9_f64..=1.1_f64);
                let jittered = ((base_ms as f64) * jitter).round() as u64;
                Duration::from_millis(jittered.max(100))
            }
            _ => {
                let factor = 1u32 << retries.min(16);
                let base = self
                    .settings
                    .backoff_base
                    .saturating_mul(factor)
                    .min(MAX_BACKOFF);
                let jittered = rand::thread_rng().gen_range(0..=base.as_millis() as u64);
                Duration::from_millis(jittered.max(1))
            }
        }
    }

    async fn post_once(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> ProviderResult<serde_json::Value> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| self.network(e))?;

        let status = response.status();
        debug!(provider = self.provider, status = status.as_u16(), "judge response");

        if status.is_success() {
            return response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: self.provider.to_string(),
                    message: format!("response body is not JSON: {}", e),
                });
        }

        let retry_after = parse_retry_after(response.headers());
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());

        Err(map_status(self.provider, status, retry_after, message))
    }

    fn network(&self, err: reqwest::Error) -> ProviderError {
        let message = if err.is_timeout() {
            format!(
                "request timed out after {}s",
                self.settings.timeout.as_secs()
            )
        } else {
            err.to_string()
        };
        ProviderError::Network {
            provider: self.provider.to_string(),
            message,
        }
    }
}

/// `Retry-After` in delay-seconds form. The HTTP-date form is not supported
/// and yields `None`, so the request falls back to exponential backoff.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn map_status(
    provider: &str,
    status: StatusCode,
    retry_after: Option<Duration>,
    message: String,
) -> ProviderError {
    let provider = provider.to_string();
    match status.as_u16() {
        401 | 403 => ProviderError::Unauthorized {
            provider,
            status: status.as_u16(),
            message,
        },
        429 => ProviderError::RateLimited {
            provider,
            retry_after,
        },
        500..=599 => ProviderError::Server {
            provider,
            status: status.as_u16(),
            message,
        },
        code => ProviderError::Rejected {
            provider,
            status: code,
            message,
        },
    }
}
