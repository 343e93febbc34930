use crate::engine::RunReporter;
use crate::metrics::Measurement;
use std::io::Write;

pub fn write_banner(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", super::BANNER)?;
    writeln!(out)
}

/// Human-readable report, written as each metric progresses.
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    started: usize,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            started: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RunReporter for ConsoleReporter<W> {
    fn metric_started(&mut self, metric: &str) -> anyhow::Result<()> {
        if self.started > 0 {
            writeln!(self.out)?;
        }
        self.started += 1;
        writeln!(self.out, "Evaluating {}...", metric)?;
        self.out.flush()?;
        Ok(())
    }

    fn metric_measured(&mut self, m: &Measurement) -> anyhow::Result<()> {
        writeln!(self.out, "{} Score: {}", m.metric, m.score)?;
        writeln!(self.out, "Reasoning: {}", m.reason)?;
        if self.verbose && !m.evaluation_steps.is_empty() {
            writeln!(self.out, "Evaluation Steps:")?;
            for (i, step) in m.evaluation_steps.iter().enumerate() {
                writeln!(self.out, "  {}. {}", i + 1, step)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(name: &str) -> Measurement {
        Measurement {
            metric: name.to_string(),
            score: 0.8,
            reason: "Flows well.".to_string(),
            threshold: 0.5,
            success: true,
            evaluation_steps: vec!["Check order.".to_string()],
        }
    }

    #[test]
    fn blocks_are_separated_by_one_blank_line() {
        let mut buf = Vec::new();
        write_banner(&mut buf).unwrap();
        let mut rep = ConsoleReporter::new(buf, false);
        rep.metric_started("Coherence").unwrap();
        rep.metric_measured(&measurement("Coherence")).unwrap();
        rep.metric_started("Accuracy").unwrap();
        rep.metric_measured(&measurement("Accuracy")).unwrap();

        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert_eq!(
            text,
            "=== LinguaSummarize AI - Summary Evaluation ===\n\n\
             Evaluating Coherence...\n\
             Coherence Score: 0.8\n\
             Reasoning: Flows well.\n\n\
             Evaluating Accuracy...\n\
             Accuracy Score: 0.8\n\
             Reasoning: Flows well.\n"
        );
    }

    #[test]
    fn verbose_lists_steps() {
        let mut rep = ConsoleReporter::new(Vec::new(), true);
        rep.metric_started("Coherence").unwrap();
        rep.metric_measured(&measurement("Coherence")).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert!(text.ends_with("Evaluation Steps:\n  1. Check order.\n"));
    }
}
