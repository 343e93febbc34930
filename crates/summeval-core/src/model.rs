use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields of a [`TestCase`] a metric can examine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseParam {
    Input,
    ActualOutput,
    ExpectedOutput,
    Context,
    RetrievalContext,
}

impl TestCaseParam {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::ActualOutput => "actual_output",
            Self::ExpectedOutput => "expected_output",
            Self::Context => "context",
            Self::RetrievalContext => "retrieval_context",
        }
    }

    /// Heading used for this field inside judge prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::ActualOutput => "Actual Output",
            Self::ExpectedOutput => "Expected Output",
            Self::Context => "Context",
            Self::RetrievalContext => "Retrieval Context",
        }
    }
}

impl fmt::Display for TestCaseParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input/output pair submitted for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub input: String,
    pub actual_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_context: Option<Vec<String>>,
}

impl TestCase {
    pub fn new(input: impl Into<String>, actual_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            actual_output: actual_output.into(),
            ..Default::default()
        }
    }

    pub fn with_expected_output(mut self, expected: impl Into<String>) -> Self {
        self.expected_output = Some(expected.into());
        self
    }

    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_retrieval_context(mut self, context: Vec<String>) -> Self {
        self.retrieval_context = Some(context);
        self
    }

    /// Text for `param`, or `None` when the field is absent or blank.
    pub fn param_text(&self, param: TestCaseParam) -> Option<String> {
        let text = match param {
            TestCaseParam::Input => Some(self.input.clone()),
            TestCaseParam::ActualOutput => Some(self.actual_output.clone()),
            TestCaseParam::ExpectedOutput => self.expected_output.clone(),
            TestCaseParam::Context => self.context.as_ref().map(|c| join_list(c)),
            TestCaseParam::RetrievalContext => {
                self.retrieval_context.as_ref().map(|c| join_list(c))
            }
        }?;
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Params from `required` that are absent or blank, in the given order.
    pub fn missing_params(&self, required: &[TestCaseParam]) -> Vec<TestCaseParam> {
        required
            .iter()
            .copied()
            .filter(|p| self.param_text(*p).is_none())
            .collect()
    }
}

fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expected outcome for a band of raw judge scores (0-10, inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rubric {
    pub score_range: (u8, u8),
    pub expected_outcome: String,
}

impl Rubric {
    pub fn new(start: u8, end: u8, expected_outcome: impl Into<String>) -> Self {
        Self {
            score_range: (start, end),
            expected_outcome: expected_outcome.into(),
        }
    }
}

/// Raw completion returned by an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}
