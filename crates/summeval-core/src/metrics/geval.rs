//! G-Eval: an LLM judge turns free-text criteria into evaluation steps,
//! then scores the test case against them on a 0-10 scale.

use super::Metric;
use crate::errors::MetricError;
use crate::judge::{JudgeService, ScoringRequest, MAX_RAW_SCORE};
use crate::model::{Rubric, TestCase, TestCaseParam};
use async_trait::async_trait;
use tracing::info;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

pub struct GEval {
    name: String,
    criteria: Option<String>,
    evaluation_steps: Option<Vec<String>>,
    evaluation_params: Vec<TestCaseParam>,
    rubric: Vec<Rubric>,
    threshold: f64,
    strict_mode: bool,
    judge: JudgeService,
    score: Option<f64>,
    reason: Option<String>,
    success: Option<bool>,
}

impl std::fmt::Debug for GEval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GEval")
            .field("name", &self.name)
            .field("evaluation_params", &self.evaluation_params)
            .field("threshold", &self.threshold)
            .field("strict_mode", &self.strict_mode)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GEvalBuilder {
    name: String,
    criteria: Option<String>,
    evaluation_steps: Option<Vec<String>>,
    evaluation_params: Vec<TestCaseParam>,
    rubric: Vec<Rubric>,
    threshold: Option<f64>,
    strict_mode: bool,
}

impl GEvalBuilder {
    pub fn criteria(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = Some(criteria.into());
        self
    }

    /// Fixed steps; skips step generation.
    pub fn evaluation_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evaluation_steps = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    pub fn evaluation_params(mut self, params: impl IntoIterator<Item = TestCaseParam>) -> Self {
        self.evaluation_params = params.into_iter().collect();
        self
    }

    pub fn rubric(mut self, rubric: Vec<Rubric>) -> Self {
        self.rubric = rubric;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Binary scoring: 1.0 only when the judge gives full marks.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn build(self, judge: JudgeService) -> Result<GEval, MetricError> {
        if self.name.trim().is_empty() {
            return Err(MetricError::invalid(&self.name, "name must not be empty"));
        }
        let name = self.name;
        if self.evaluation_params.is_empty() {
            return Err(MetricError::invalid(
                &name,
                "evaluation_params must name at least one test case field",
            ));
        }

        let criteria = self
            .criteria
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let evaluation_steps = match self.evaluation_steps {
            Some(steps) => {
                let steps: Vec<String> = steps
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if steps.is_empty() {
                    return Err(MetricError::invalid(
                        &name,
                        "evaluation_steps must not be empty when provided",
                    ));
                }
                Some(steps)
            }
            None => None,
        };
        if criteria.is_none() && evaluation_steps.is_none() {
            return Err(MetricError::invalid(
                &name,
                "either criteria or evaluation_steps must be provided",
            ));
        }

        validate_rubric(&name, &self.rubric)?;

        let threshold = if self.strict_mode {
            1.0
        } else {
            self.threshold.unwrap_or(DEFAULT_THRESHOLD)
        };
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MetricError::invalid(
                &name,
                format!("threshold {} outside [0, 1]", threshold),
            ));
        }

        let mut params = Vec::with_capacity(self.evaluation_params.len());
        for p in self.evaluation_params {
            if !params.contains(&p) {
                params.push(p);
            }
        }

        Ok(GEval {
            name,
            criteria,
            evaluation_steps,
            evaluation_params: params,
            rubric: self.rubric,
            threshold,
            strict_mode: self.strict_mode,
            judge,
            score: None,
            reason: None,
            success: None,
        })
    }
}

fn validate_rubric(name: &str, rubric: &[Rubric]) -> Result<(), MetricError> {
    let mut ranges: Vec<(u8, u8)> = Vec::with_capacity(rubric.len());
    for r in rubric {
        let (start, end) = r.score_range;
        if start > end || f64::from(end) > MAX_RAW_SCORE {
            return Err(MetricError::invalid(
                name,
                format!("rubric range {}-{} must satisfy 0 <= start <= end <= 10", start, end),
            ));
        }
        if r.expected_outcome.trim().is_empty() {
            return Err(MetricError::invalid(
                name,
                format!("rubric range {}-{} has no expected outcome", start, end),
            ));
        }
        ranges.push((start, end));
    }
    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        if pair[1].0 <= pair[0].1 {
            return Err(MetricError::invalid(
                name,
                format!(
                    "rubric ranges {}-{} and {}-{} overlap",
                    pair[0].0, pair[0].1, pair[1].0, pair[1].1
                ),
            ));
        }
    }
    Ok(())
}

impl GEval {
    pub fn builder(name: impl Into<String>) -> GEvalBuilder {
        GEvalBuilder {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn criteria(&self) -> Option<&str> {
        self.criteria.as_deref()
    }

    pub fn evaluation_params(&self) -> &[TestCaseParam] {
        &self.evaluation_params
    }

    pub fn rubric(&self) -> &[Rubric] {
        &self.rubric
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    async fn steps(&mut self) -> anyhow::Result<Vec<String>> {
        if let Some(steps) = &self.evaluation_steps {
            return Ok(steps.clone());
        }
        // build() guarantees criteria when no steps were given
        let criteria = self.criteria.clone().unwrap_or_default();
        let steps = self
            .judge
            .generate_steps(&self.name, &criteria, &self.evaluation_params)
            .await?;
        self.evaluation_steps = Some(steps.clone());
        Ok(steps)
    }
}

#[async_trait]
impl Metric for GEval {
    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    async fn measure(&mut self, tc: &TestCase) -> anyhow::Result<f64> {
        self.score = None;
        self.reason = None;
        self.success = None;

        let missing = tc.missing_params(&self.evaluation_params);
        if !missing.is_empty() {
            return Err(MetricError::MissingTestCaseParams {
                metric: self.name.clone(),
                params: missing,
            }
            .into());
        }

        let steps = self.steps().await?;
        let verdict = self
            .judge
            .evaluate(&ScoringRequest {
                metric: &self.name,
                steps: &steps,
                rubric: &self.rubric,
                test_case: tc,
                params: &self.evaluation_params,
            })
            .await?;

        let mut score = (verdict.raw_score / MAX_RAW_SCORE).clamp(0.0, 1.0);
        if self.strict_mode {
            score = if score >= self.threshold { 1.0 } else { 0.0 };
        }
        let success = score >= self.threshold;

        info!(
            metric = %self.name,
            raw_score = verdict.raw_score,
            score,
            success,
            samples = verdict.samples.len(),
            "metric measured"
        );

        self.score = Some(score);
        self.reason = Some(verdict.reason);
        self.success = Some(success);
        Ok(score)
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    fn is_successful(&self) -> bool {
        self.success.unwrap_or(false)
    }

    fn evaluation_steps(&self) -> &[String] {
        self.evaluation_steps.as_deref().unwrap_or_default()
    }
}
