//! Error types for metrics, providers and suite configuration.

use crate::model::TestCaseParam;
use reqwest::header::HeaderValue;
use std::time::Duration;

/// Metric construction and measurement errors.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    /// Metric definition rejected at build time.
    #[error("invalid metric '{name}': {reason}")]
    InvalidMetric { name: String, reason: String },

    /// Test case lacks a field the metric evaluates.
    #[error("metric '{metric}' requires test case params that are missing or empty: {}", join_params(.params))]
    MissingTestCaseParams {
        metric: String,
        params: Vec<TestCaseParam>,
    },

    /// Judge answered, but not with something we can use.
    #[error("judge response for metric '{metric}' is invalid: {message}")]
    JudgeResponse { metric: String, message: String },
}

impl MetricError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMetric {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn judge_response(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JudgeResponse {
            metric: metric.into(),
            message: message.into(),
        }
    }
}

fn join_params(params: &[TestCaseParam]) -> String {
    params
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider}: API key not set (expected one of: {})", .env_vars.join(", "))]
    MissingApiKey {
        provider: String,
        env_vars: Vec<String>,
    },

    /// Key was supplied but cannot be sent as a header value.
    #[error("{provider}: API key is malformed: {message}")]
    InvalidApiKey { provider: String, message: String },

    #[error("{provider}: unauthorized (HTTP {status}): {message}")]
    Unauthorized {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider}: rate limited: retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("{provider}: provider error (HTTP {status}): {message}")]
    Server {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider}: request rejected (HTTP {status}): {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider}: network error: {message}")]
    Network { provider: String, message: String },

    #[error("{provider}: invalid response: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("outbound network blocked by policy (target={target}): {reason}")]
    Blocked { target: String, reason: String },
}

impl ProviderError {
    /// Whether the request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Server { .. } | Self::Network { .. }
        )
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Header value for a credential; control characters and non-visible bytes are rejected.
pub(crate) fn api_key_header(provider: &str, value: &str) -> ProviderResult<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| ProviderError::InvalidApiKey {
        provider: provider.to_string(),
        message: "contains characters not allowed in an HTTP header".to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Suite file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse YAML: {0}")]
    Parse(String),

    #[error("unsupported config version {found} (supported: {supported})")]
    Version { found: u32, supported: u32 },

    #[error("config error: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_message_lists_fields() {
        let err = MetricError::MissingTestCaseParams {
            metric: "Accuracy".into(),
            params: vec![TestCaseParam::Input, TestCaseParam::ActualOutput],
        };
        assert_eq!(
            err.to_string(),
            "metric 'Accuracy' requires test case params that are missing or empty: input, actual_output"
        );
    }

    #[test]
    fn retryable_classes() {
        let p = "openai".to_string();
        assert!(ProviderError::RateLimited {
            provider: p.clone(),
            retry_after: None
        }
        .is_retryable());
        assert!(ProviderError::Server {
            provider: p.clone(),
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!ProviderError::Unauthorized {
            provider: p.clone(),
            status: 401,
            message: String::new()
        }
        .is_retryable());
        assert!(!ProviderError::Rejected {
            provider: p.clone(),
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!ProviderError::InvalidResponse {
            provider: p,
            message: String::new()
        }
        .is_retryable());
    }
}
