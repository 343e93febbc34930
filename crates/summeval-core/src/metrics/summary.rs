//! Built-in metrics for judging a generated summary against its transcript.

use super::GEval;
use crate::errors::MetricError;
use crate::judge::JudgeService;
use crate::model::TestCaseParam;

pub const COHERENCE: &str = "Coherence";
pub const COHERENCE_CRITERIA: &str =
    "Coherence (1-5) - Does the summary flow logically and avoid being a 'heap' of sentences?";

pub const ACCURACY: &str = "Accuracy";
pub const ACCURACY_CRITERIA: &str =
    "Accuracy (1-5) - Does the summary contain ONLY facts present in the original transcript?";

pub fn coherence(judge: JudgeService) -> Result<GEval, MetricError> {
    GEval::builder(COHERENCE)
        .criteria(COHERENCE_CRITERIA)
        .evaluation_params([TestCaseParam::ActualOutput])
        .build(judge)
}

pub fn accuracy(judge: JudgeService) -> Result<GEval, MetricError> {
    GEval::builder(ACCURACY)
        .criteria(ACCURACY_CRITERIA)
        .evaluation_params([TestCaseParam::Input, TestCaseParam::ActualOutput])
        .build(judge)
}

/// Coherence then Accuracy, the order they are reported in.
pub fn default_metrics(judge: &JudgeService) -> Result<Vec<GEval>, MetricError> {
    Ok(vec![coherence(judge.clone())?, accuracy(judge.clone())?])
}
