use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use summeval_core::judge::MAX_JUDGE_SAMPLES;

#[derive(Parser, Debug)]
#[command(
    name = "summeval",
    version,
    about = "Score a generated summary against its source transcript with LLM-as-judge metrics"
)]
pub struct Cli {
    /// YAML suite defining the test case and metrics (default: Coherence + Accuracy)
    #[arg(long, env = "SUMMEVAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source text (the full transcript)
    #[arg(long, env = "SUMMEVAL_INPUT", conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Read the source text from a file
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Generated text under evaluation (the summary)
    #[arg(long, env = "SUMMEVAL_ACTUAL_OUTPUT", conflicts_with = "actual_output_file")]
    pub actual_output: Option<String>,

    /// Read the generated text from a file
    #[arg(long)]
    pub actual_output_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t, env = "SUMMEVAL_FORMAT")]
    pub format: OutputFormat,

    /// Also print the evaluation steps each metric used
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub judge: JudgeArgs,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum JudgeProvider {
    #[default]
    Openai,
    Gemini,
    /// Deterministic offline judge (tests/dev)
    Fake,
}

impl JudgeProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Gemini => "gemini",
            Self::Fake => "fake",
        }
    }
}

#[derive(clap::Args, Clone, Debug)]
pub struct JudgeArgs {
    /// LLM provider acting as judge
    /// - openai: live judge calls via OpenAI (OPENAI_API_KEY)
    /// - gemini: live judge calls via Gemini (GEMINI_API_KEY or API_KEY)
    /// - fake: deterministic fake judge (tests/dev)
    #[arg(long, value_enum, default_value_t, env = "SUMMEVAL_JUDGE")]
    pub judge: JudgeProvider,

    /// Judge model identifier (provider-specific)
    /// Example: gpt-4o-mini
    #[arg(long, env = "SUMMEVAL_JUDGE_MODEL")]
    pub judge_model: Option<String>,

    /// Judge calls per metric (1-20); the score is their mean
    #[arg(
        long,
        default_value_t = 1,
        env = "SUMMEVAL_JUDGE_SAMPLES",
        value_parser = clap::value_parser!(u32).range(1..=MAX_JUDGE_SAMPLES as i64)
    )]
    pub judge_samples: u32,

    /// Temperature used for judge calls
    #[arg(long, default_value_t = 0.0, env = "SUMMEVAL_JUDGE_TEMPERATURE")]
    pub judge_temperature: f32,

    /// Max tokens for each judge response
    #[arg(long, default_value_t = 800, env = "SUMMEVAL_JUDGE_MAX_TOKENS")]
    pub judge_max_tokens: u32,

    /// Retries for rate-limited, 5xx or network failures
    #[arg(long, default_value_t = 3, env = "SUMMEVAL_JUDGE_MAX_RETRIES")]
    pub judge_max_retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60, env = "SUMMEVAL_JUDGE_TIMEOUT_SECS")]
    pub judge_timeout_secs: u64,

    /// Override the provider API base URL (OpenAI-compatible proxies, local servers)
    #[arg(long, env = "SUMMEVAL_JUDGE_BASE_URL")]
    pub judge_base_url: Option<String>,

    /// Provider API key; defaults to the provider's environment variable
    #[arg(long, hide = true)]
    pub judge_api_key: Option<String>,
}

impl Default for JudgeArgs {
    fn default() -> Self {
        Self {
            judge: JudgeProvider::Openai,
            judge_model: None,
            judge_samples: 1,
            judge_temperature: 0.0,
            judge_max_tokens: 800,
            judge_max_retries: 3,
            judge_timeout_secs: 60,
            judge_base_url: None,
            judge_api_key: None,
        }
    }
}
