use super::super::args::{Cli, OutputFormat};
use super::judge_builder::build_judge;
use crate::exit_codes;
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use summeval_core::config::{load_config, EvalConfig};
use summeval_core::engine::Runner;
use summeval_core::metrics::Metric;
use summeval_core::model::TestCase;
use summeval_core::report::console::{write_banner, ConsoleReporter};
use summeval_core::report::json::JsonReport;
use summeval_core::report::NullReporter;

pub(crate) async fn run(cli: Cli) -> anyhow::Result<i32> {
    let cfg = match &cli.config {
        Some(path) => load_config(path)?,
        None => EvalConfig::default(),
    };
    let test_case = resolve_test_case(&cli, &cfg)?;

    if cli.format == OutputFormat::Text {
        let mut out = std::io::stdout();
        write_banner(&mut out)?;
        out.flush()?;
    }

    let judge = build_judge(&cli.judge)?;
    let metrics: Vec<Box<dyn Metric>> = cfg
        .build_metrics(&judge)?
        .into_iter()
        .map(|m| Box::new(m) as Box<dyn Metric>)
        .collect();
    tracing::info!(
        metrics = metrics.len(),
        judge = judge.config().provider.as_str(),
        "starting evaluation"
    );

    let mut runner = Runner::new(metrics);
    match cli.format {
        OutputFormat::Text => {
            let mut reporter = ConsoleReporter::new(std::io::stdout(), cli.verbose);
            runner.run(&test_case, &mut reporter).await?;
        }
        OutputFormat::Json => {
            let measurements = runner.run(&test_case, &mut NullReporter).await?;
            let report = JsonReport::new(&test_case, measurements);
            println!("{}", report.to_pretty()?);
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Flags and files win over the suite file, which wins over the placeholders.
fn resolve_test_case(cli: &Cli, cfg: &EvalConfig) -> anyhow::Result<TestCase> {
    let mut tc = cfg.test_case();
    if let Some(text) = pick_text(cli.input.as_deref(), cli.input_file.as_deref())? {
        tc.input = text;
    }
    if let Some(text) = pick_text(
        cli.actual_output.as_deref(),
        cli.actual_output_file.as_deref(),
    )? {
        tc.actual_output = text;
    }
    Ok(tc)
}

fn pick_text(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<Option<String>> {
    if let Some(text) = inline {
        return Ok(Some(text.to_string()));
    }
    match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
        }
        None => Ok(None),
    }
}
