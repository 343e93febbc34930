use crate::metrics::{Measurement, Metric};
use crate::model::TestCase;
use tracing::{error, info};

/// Receives progress while metrics run, in order.
pub trait RunReporter {
    fn metric_started(&mut self, metric: &str) -> anyhow::Result<()>;

    fn metric_measured(&mut self, measurement: &Measurement) -> anyhow::Result<()>;
}

/// Applies each metric to one test case, strictly one after another.
pub struct Runner {
    metrics: Vec<Box<dyn Metric>>,
}

impl Runner {
    pub fn new(metrics: Vec<Box<dyn Metric>>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    /// Stops at the first failing metric; later metrics are not run.
    pub async fn run(
        &mut self,
        tc: &TestCase,
        reporter: &mut dyn RunReporter,
    ) -> anyhow::Result<Vec<Measurement>> {
        let mut out = Vec::with_capacity(self.metrics.len());
        for metric in self.metrics.iter_mut() {
            reporter.metric_started(metric.name())?;
            if let Err(e) = metric.measure(tc).await {
                error!(metric = metric.name(), error = %e, "measurement failed");
                return Err(e);
            }
            let measurement = metric.measurement().ok_or_else(|| {
                anyhow::anyhow!("metric '{}' finished without a result", metric.name())
            })?;
            reporter.metric_measured(&measurement)?;
            out.push(measurement);
        }
        info!(metrics = out.len(), "evaluation finished");
        Ok(out)
    }
}
