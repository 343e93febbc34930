use crate::metrics::Measurement;
use crate::model::TestCase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub banner: String,
    pub test_case: TestCase,
    pub measurements: Vec<Measurement>,
}

impl JsonReport {
    pub fn new(test_case: &TestCase, measurements: Vec<Measurement>) -> Self {
        Self {
            banner: super::BANNER.to_string(),
            test_case: test_case.clone(),
            measurements,
        }
    }

    pub fn to_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
