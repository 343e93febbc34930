mod client;
mod prompt;

pub(crate) use client::MAX_RAW_SCORE;

use crate::model::{Rubric, TestCase, TestCaseParam};
use crate::providers::llm::LlmClient;
use std::sync::Arc;
use tracing::debug;

/// Upper bound on judge calls per measurement.
pub const MAX_JUDGE_SAMPLES: u32 = 20;

#[derive(Clone, Debug)]
pub struct JudgeRuntimeConfig {
    pub provider: String, // "openai", "gemini", "fake"
    pub model: Option<String>,
    /// Judge calls per measurement, clamped to `1..=MAX_JUDGE_SAMPLES`; the raw score is their mean.
    pub samples: u32,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for JudgeRuntimeConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            samples: 1,
            temperature: 0.0,
            max_tokens: 800,
        }
    }
}

/// What the judge needs to score one test case.
pub struct ScoringRequest<'a> {
    pub metric: &'a str,
    pub steps: &'a [String],
    pub rubric: &'a [Rubric],
    pub test_case: &'a TestCase,
    pub params: &'a [TestCaseParam],
}

#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    /// Mean of `samples`, on the judge's 0-10 scale.
    pub raw_score: f64,
    pub reason: String,
    pub samples: Vec<f64>,
}

#[derive(Clone)]
pub struct JudgeService {
    config: JudgeRuntimeConfig,
    client: Arc<dyn LlmClient>,
}

impl JudgeService {
    pub fn new(config: JudgeRuntimeConfig, client: Arc<dyn LlmClient>) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &JudgeRuntimeConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn LlmClient> {
        &self.client
    }

    /// Ask the judge to turn free-text criteria into concrete evaluation steps.
    pub async fn generate_steps(
        &self,
        metric: &str,
        criteria: &str,
        params: &[TestCaseParam],
    ) -> anyhow::Result<Vec<String>> {
        let prompt = prompt::build_steps_prompt(criteria, params);
        let value = client::call_judge(self.client.as_ref(), metric, &prompt).await?;
        let steps = client::parse_steps(metric, &value)?;
        debug!(metric, steps = steps.len(), "generated evaluation steps");
        Ok(steps)
    }

    /// Score a test case; samples are taken sequentially and averaged.
    pub async fn evaluate(&self, req: &ScoringRequest<'_>) -> anyhow::Result<JudgeVerdict> {
        let prompt = prompt::build_scoring_prompt(req.steps, req.rubric, req.test_case, req.params);
        let samples = self.config.samples.clamp(1, MAX_JUDGE_SAMPLES);

        let mut scores = Vec::new();
        let mut reasons = Vec::new();
        for sample in 0..samples {
            let value = client::call_judge(self.client.as_ref(), req.metric, &prompt).await?;
            let reply = client::parse_score(req.metric, &value)?;
            debug!(
                metric = req.metric,
                sample,
                score = reply.score,
                "judge sample"
            );
            scores.push(reply.score);
            reasons.push(reply.reason);
        }

        let raw_score = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(JudgeVerdict {
            raw_score,
            reason: reasons.into_iter().next().unwrap_or_default(),
            samples: scores,
        })
    }
}
