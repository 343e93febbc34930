use super::LlmClient;
use crate::errors::{api_key_header, ProviderError, ProviderResult};
use crate::model::LlmResponse;
use crate::providers::http::{HttpSettings, JsonHttp};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
/// Checked in order.
pub const API_KEY_ENVS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub struct GeminiClient {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    api_key: HeaderValue,
    base_url: String,
    http: JsonHttp,
}

impl GeminiClient {
    pub fn new(
        model: String,
        api_key: String,
        temperature: f32,
        max_tokens: u32,
        http: HttpSettings,
    ) -> ProviderResult<Self> {
        let api_key = api_key_header("gemini", api_key.trim())?;
        Ok(Self {
            model,
            temperature,
            max_tokens,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: JsonHttp::new("gemini", http)?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key_from_env() -> ProviderResult<String> {
        API_KEY_ENVS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: "gemini".to_string(),
                env_vars: API_KEY_ENVS.iter().map(|s| s.to_string()).collect(),
            })
    }

    fn request_body(&self, prompt: &str, system: Option<&[String]>) -> serde_json::Value {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens,
                "responseMimeType": "application/json",
            },
        });
        if let Some(system) = system.filter(|s| !s.is_empty()) {
            body["systemInstruction"] = json!({ "parts": [{ "text": system.join("\n\n") }] });
        }
        body
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = self.request_body(prompt, system);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", self.api_key.clone());

        let json = self.http.post_json(&url, headers, &body).await?;

        let parts = json
            .pointer("/candidates/0/content/parts")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: "gemini".to_string(),
                message: match json.pointer("/promptFeedback/blockReason") {
                    Some(reason) => format!("prompt blocked: {}", reason),
                    None => "response missing candidates[0].content.parts".to_string(),
                },
            })?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        let usage = json.get("usageMetadata");
        let meta = super::usage_meta(
            usage
                .and_then(|u| u.get("promptTokenCount"))
                .and_then(|v| v.as_u64()),
            usage
                .and_then(|u| u.get("candidatesTokenCount"))
                .and_then(|v| v.as_u64()),
        );

        Ok(LlmResponse {
            text,
            provider: "gemini".to_string(),
            model: json
                .get("modelVersion")
                .and_then(|v| v.as_str())
                .unwrap_or(&self.model)
                .to_string(),
            meta,
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
