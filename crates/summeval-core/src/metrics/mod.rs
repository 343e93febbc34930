pub mod geval;
pub mod summary;

pub use geval::{GEval, GEvalBuilder};

use crate::model::TestCase;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named evaluator that scores one attribute of a test case on `[0, 1]`.
///
/// `measure` stores its outcome on the metric; `score` and `reason` read it back.
#[async_trait]
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;

    fn threshold(&self) -> f64;

    async fn measure(&mut self, tc: &TestCase) -> anyhow::Result<f64>;

    fn score(&self) -> Option<f64>;

    fn reason(&self) -> Option<&str>;

    fn is_successful(&self) -> bool;

    fn evaluation_steps(&self) -> &[String] {
        &[]
    }

    /// Snapshot of the last successful measurement.
    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement {
            metric: self.name().to_string(),
            score: self.score()?,
            reason: self.reason()?.to_string(),
            threshold: self.threshold(),
            success: self.is_successful(),
            evaluation_steps: self.evaluation_steps().to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub metric: String,
    pub score: f64,
    pub reason: String,
    pub threshold: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluation_steps: Vec<String>,
}
