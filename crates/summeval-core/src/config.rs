//! Optional YAML suite: which metrics to run and on what test case.

use crate::errors::ConfigError;
use crate::judge::JudgeService;
use crate::metrics::{summary, GEval};
use crate::model::{Rubric, TestCase, TestCaseParam};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

pub const PLACEHOLDER_INPUT: &str = "[Paste your full audio transcript here]";
pub const PLACEHOLDER_ACTUAL_OUTPUT: &str = "[Paste the summary your web tool generated here]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    pub version: u32,
    #[serde(default)]
    pub test_case: Option<TestCase>,
    /// Empty means the built-in Coherence and Accuracy metrics.
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    pub name: String,
    #[serde(default)]
    pub criteria: Option<String>,
    #[serde(default)]
    pub evaluation_steps: Option<Vec<String>>,
    pub evaluation_params: Vec<TestCaseParam>,
    #[serde(default)]
    pub rubric: Vec<Rubric>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub strict_mode: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            test_case: None,
            metrics: Vec::new(),
        }
    }
}

impl EvalConfig {
    pub fn test_case(&self) -> TestCase {
        self.test_case
            .clone()
            .unwrap_or_else(|| TestCase::new(PLACEHOLDER_INPUT, PLACEHOLDER_ACTUAL_OUTPUT))
    }

    pub fn build_metrics(&self, judge: &JudgeService) -> anyhow::Result<Vec<GEval>> {
        if self.metrics.is_empty() {
            return Ok(summary::default_metrics(judge)?);
        }
        let mut out = Vec::with_capacity(self.metrics.len());
        for m in &self.metrics {
            out.push(m.build(judge.clone())?);
        }
        Ok(out)
    }
}

impl MetricConfig {
    pub fn build(&self, judge: JudgeService) -> Result<GEval, crate::errors::MetricError> {
        let mut builder = GEval::builder(&self.name)
            .evaluation_params(self.evaluation_params.iter().copied())
            .rubric(self.rubric.clone())
            .strict_mode(self.strict_mode);
        if let Some(c) = &self.criteria {
            builder = builder.criteria(c);
        }
        if let Some(steps) = &self.evaluation_steps {
            builder = builder.evaluation_steps(steps.iter().cloned());
        }
        if let Some(t) = self.threshold {
            builder = builder.threshold(t);
        }
        builder.build(judge)
    }
}

pub fn load_config(path: &Path) -> Result<EvalConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<EvalConfig, ConfigError> {
    let cfg: EvalConfig =
        serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError::Version {
            found: cfg.version,
            supported: SUPPORTED_CONFIG_VERSION,
        });
    }
    let mut seen = HashSet::new();
    for m in &cfg.metrics {
        if !seen.insert(m.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate metric name '{}'",
                m.name
            )));
        }
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::JudgeRuntimeConfig;
    use crate::metrics::Metric;
    use crate::providers::llm::fake::FakeClient;
    use std::sync::Arc;

    fn judge() -> JudgeService {
        JudgeService::new(
            JudgeRuntimeConfig::default(),
            Arc::new(FakeClient::new("fake".into())),
        )
    }

    #[test]
    fn empty_suite_uses_builtins_and_placeholders() {
        let cfg = parse_config("version: 1\n").unwrap();
        let tc = cfg.test_case();
        assert_eq!(tc.input, PLACEHOLDER_INPUT);
        assert_eq!(tc.actual_output, PLACEHOLDER_ACTUAL_OUTPUT);
        let names: Vec<String> = cfg
            .build_metrics(&judge())
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["Coherence", "Accuracy"]);
    }

    #[test]
    fn custom_metrics_are_built_in_order() {
        let yaml = r#"
version: 1
test_case:
  input: "The sky is blue."
  actual_output: "The sky has a blue color."
metrics:
  - name: Conciseness
    criteria: "Is the summary free of filler?"
    evaluation_params: [actual_output]
    threshold: 0.6
  - name: Faithfulness
    evaluation_steps: ["List claims.", "Check each claim against the input."]
    evaluation_params: [input, actual_output]
    rubric:
      - score_range: [0, 4]
        expected_outcome: "Contains invented facts."
      - score_range: [5, 10]
        expected_outcome: "Every claim is supported."
"#;
        let cfg = parse_config(yaml).unwrap();
        assert_eq!(cfg.test_case().input, "The sky is blue.");
        let metrics = cfg.build_metrics(&judge()).unwrap();
        assert_eq!(metrics[0].name(), "Conciseness");
        assert_eq!(metrics[0].threshold(), 0.6);
        assert_eq!(metrics[1].rubric().len(), 2);
        assert_eq!(metrics[1].evaluation_steps().len(), 2);
    }

    #[test]
    fn rejects_wrong_version_and_unknown_fields() {
        assert!(matches!(
            parse_config("version: 2\n"),
            Err(ConfigError::Version { found: 2, .. })
        ));
        assert!(matches!(
            parse_config("version: 1\nsuite: x\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse_config("version: 1\nmetrics:\n  - name: A\n    evaluation_params: [summary]\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_duplicate_metric_names() {
        let yaml = "version: 1\nmetrics:\n  - {name: A, criteria: c, evaluation_params: [input]}\n  - {name: A, criteria: d, evaluation_params: [input]}\n";
        let err = parse_config(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate metric name 'A'"));
    }

    #[test]
    fn names_differing_only_in_whitespace_are_distinct() {
        let yaml = "version: 1\nmetrics:\n  - {name: 'A', criteria: c, evaluation_params: [input]}\n  - {name: ' A', criteria: d, evaluation_params: [input]}\n";
        let cfg = parse_config(yaml).unwrap();
        let metrics = cfg.build_metrics(&judge()).unwrap();
        assert_eq!(metrics[1].name(), " A");
    }

    #[test]
    fn invalid_metric_surfaces_at_build() {
        let cfg = parse_config("version: 1\nmetrics:\n  - {name: A, evaluation_params: [input]}\n")
            .unwrap();
        let err = cfg.build_metrics(&judge()).unwrap_err();
        assert!(err.to_string().contains("criteria or evaluation_steps"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
