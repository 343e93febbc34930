pub mod config;
pub mod engine;
pub mod errors;
pub mod judge;
pub mod metrics;
pub mod model;
pub mod providers;
pub mod report;

pub use errors::{ConfigError, MetricError, ProviderError};
pub use metrics::{GEval, Metric};
pub use model::{TestCase, TestCaseParam};
