pub mod console;
pub mod json;

use crate::engine::RunReporter;
use crate::metrics::Measurement;

pub const BANNER: &str = "=== LinguaSummarize AI - Summary Evaluation ===";

/// Reporter for output formats that render once at the end.
#[derive(Debug, Default)]
pub struct NullReporter;

impl RunReporter for NullReporter {
    fn metric_started(&mut self, _metric: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn metric_measured(&mut self, _measurement: &Measurement) -> anyhow::Result<()> {
        Ok(())
    }
}
