use super::super::args::{JudgeArgs, JudgeProvider};
use std::sync::Arc;
use std::time::Duration;
use summeval_core::judge::{JudgeRuntimeConfig, JudgeService};
use summeval_core::providers::http::HttpSettings;
use summeval_core::providers::llm::fake::FakeClient;
use summeval_core::providers::llm::gemini::{self, GeminiClient};
use summeval_core::providers::llm::openai::{self, OpenAIClient};
use summeval_core::providers::llm::tracing::TracingLlmClient;
use summeval_core::providers::llm::LlmClient;

pub(crate) fn build_judge(args: &JudgeArgs) -> anyhow::Result<JudgeService> {
    let config = JudgeRuntimeConfig {
        provider: args.judge.as_str().to_string(),
        model: args.judge_model.clone(),
        samples: args.judge_samples,
        temperature: args.judge_temperature,
        max_tokens: args.judge_max_tokens,
    };

    let http = HttpSettings {
        timeout: Duration::from_secs(args.judge_timeout_secs),
        max_retries: args.judge_max_retries,
        ..HttpSettings::default()
    };

    let client: Arc<dyn LlmClient> = match args.judge {
        JudgeProvider::Openai => {
            let key = match &args.judge_api_key {
                Some(k) => k.clone(),
                None => OpenAIClient::api_key_from_env()?,
            };
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
            let mut client =
                OpenAIClient::new(model, key, config.temperature, config.max_tokens, http)?;
            if let Some(url) = &args.judge_base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        JudgeProvider::Gemini => {
            let key = match &args.judge_api_key {
                Some(k) => k.clone(),
                None => GeminiClient::api_key_from_env()?,
            };
            let model = config
                .model
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
            let mut client =
                GeminiClient::new(model, key, config.temperature, config.max_tokens, http)?;
            if let Some(url) = &args.judge_base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        JudgeProvider::Fake => Arc::new(FakeClient::new(
            config
                .model
                .clone()
                .unwrap_or_else(|| "fake-judge".to_string()),
        )),
    };

    tracing::debug!(
        provider = client.provider_name(),
        model = client.model(),
        samples = config.samples,
        "judge configured"
    );

    Ok(JudgeService::new(
        config,
        Arc::new(TracingLlmClient::new(client)),
    ))
}
