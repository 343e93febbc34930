use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Reply accepted by both the step-generation and the scoring parser.
pub const DEFAULT_FAKE_REPLY: &str = r#"{"steps": ["Read the actual output.", "Check it against the criteria.", "Assign a score from 0 to 10."], "score": 7, "reason": "Deterministic fake judge: the text satisfies most of the criteria."}"#;

/// Offline judge for tests and dry runs.
#[derive(Debug)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
    script: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(model: String) -> Self {
        Self {
            model,
            fixed_response: None,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: String) -> Self {
        self.fixed_response = Some(response);
        self
    }

    /// Replies consumed in order before falling back to the fixed/default reply.
    pub fn with_script<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
            script.extend(replies.into_iter().map(Into::into));
        }
        self
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        prompt: &str,
        _system: Option<&[String]>,
    ) -> anyhow::Result<LlmResponse> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let text = scripted
            .or_else(|| self.fixed_response.clone())
            .unwrap_or_else(|| DEFAULT_FAKE_REPLY.to_string());

        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
