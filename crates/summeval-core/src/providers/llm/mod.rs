use crate::model::LlmResponse;
use async_trait::async_trait;

pub mod fake;
pub mod gemini;
pub mod openai;
pub mod tracing;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one user prompt, optionally preceded by system instructions.
    async fn complete(&self, prompt: &str, system: Option<&[String]>)
        -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;

    fn model(&self) -> &str;
}

/// Pull `usage` token counts into the normalized `{input_tokens, output_tokens}` shape.
pub(crate) fn usage_meta(input: Option<u64>, output: Option<u64>) -> serde_json::Value {
    serde_json::json!({
        "usage": {
            "input_tokens": input,
            "output_tokens": output,
        }
    })
}
