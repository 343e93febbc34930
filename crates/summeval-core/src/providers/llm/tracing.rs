use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::field::Empty;
use tracing::{Instrument, Span};

/// Judge client decorator: one `gen_ai.client.request` span per completion.
///
/// Prompt and reply text stay out of the span; it carries sizes, token
/// usage, latency and the error if any.
pub struct TracingLlmClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }

    fn request_span(&self, prompt: &str) -> Span {
        tracing::info_span!(
            "gen_ai.client.request",
            "gen_ai.system" = self.inner.provider_name(),
            "gen_ai.request.model" = self.inner.model(),
            "gen_ai.response.model" = Empty,
            "gen_ai.usage.input_tokens" = Empty,
            "gen_ai.usage.output_tokens" = Empty,
            "summeval.prompt_chars" = prompt.chars().count() as u64,
            "summeval.latency_ms" = Empty,
            "error" = Empty,
            "error.message" = Empty
        )
    }
}

fn usage_tokens(resp: &LlmResponse, key: &str) -> Option<u64> {
    resp.meta.pointer(&format!("/usage/{key}"))?.as_u64()
}

fn record_outcome(span: &Span, started: Instant, result: &anyhow::Result<LlmResponse>) {
    span.record("summeval.latency_ms", started.elapsed().as_millis() as u64);
    match result {
        Ok(resp) => {
            span.record("gen_ai.response.model", resp.model.as_str());
            if let Some(n) = usage_tokens(resp, "input_tokens") {
                span.record("gen_ai.usage.input_tokens", n);
            }
            if let Some(n) = usage_tokens(resp, "output_tokens") {
                span.record("gen_ai.usage.output_tokens", n);
            }
            tracing::debug!(reply_chars = resp.text.len(), "judge reply received");
        }
        Err(e) => {
            span.record("error", true);
            span.record("error.message", tracing::field::display(e));
            tracing::warn!(error = %e, "judge request failed");
        }
    }
}

#[async_trait]
impl LlmClient for TracingLlmClient {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        let span = self.request_span(prompt);
        let started = Instant::now();
        let result = self
            .inner
            .complete(prompt, system)
            .instrument(span.clone())
            .await;
        span.in_scope(|| record_outcome(&span, started, &result));
        result
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
