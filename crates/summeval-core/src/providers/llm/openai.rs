use super::LlmClient;
use crate::errors::{api_key_header, ProviderError, ProviderResult};
use crate::model::LlmResponse;
use crate::providers::http::{HttpSettings, JsonHttp};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct OpenAIClient {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    auth: HeaderValue,
    base_url: String,
    http: JsonHttp,
}

impl OpenAIClient {
    pub fn new(
        model: String,
        api_key: String,
        temperature: f32,
        max_tokens: u32,
        http: HttpSettings,
    ) -> ProviderResult<Self> {
        let auth = api_key_header("openai", &format!("Bearer {}", api_key.trim()))?;
        Ok(Self {
            model,
            temperature,
            max_tokens,
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: JsonHttp::new("openai", http)?,
        })
    }

    /// Point at an OpenAI-compatible endpoint (proxy, local server, test double).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key_from_env() -> ProviderResult<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: "openai".to_string(),
                env_vars: vec![API_KEY_ENV.to_string()],
            })
    }

    fn request_body(&self, prompt: &str, system: Option<&[String]>) -> serde_json::Value {
        let mut messages = Vec::new();
        for s in system.unwrap_or_default() {
            messages.push(json!({ "role": "system", "content": s }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" },
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(prompt, system);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth.clone());

        let json = self.http.post_json(&url, headers, &body).await?;

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: "openai".to_string(),
                message: "response missing choices[0].message.content".to_string(),
            })?
            .to_string();

        let usage = json.get("usage");
        let meta = super::usage_meta(
            usage
                .and_then(|u| u.get("prompt_tokens"))
                .and_then(|v| v.as_u64()),
            usage
                .and_then(|u| u.get("completion_tokens"))
                .and_then(|v| v.as_u64()),
        );

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model: json
                .get("model")
                .and_then(|v| v.as_str())
                .unwrap_or(&self.model)
                .to_string(),
            meta,
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
