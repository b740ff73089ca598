use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Postgres URL, or `memory` for a throwaway in-process store
    #[arg(long)]
    pub store: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    #[arg(long, env = "BPA_TEMPLATE_DIR", default_value = "templates")]
    pub template_dir: PathBuf,
    #[arg(long, env = "BPA_DOCUMENT_DIR", default_value = ".")]
    pub document_dir: PathBuf,
    #[arg(long, env = "BPA_WEBDRIVER_URL", default_value = "http://localhost:4444")]
    pub webdriver_url: String,
    /// WebDriver session capabilities as a JSON object
    #[arg(long, env = "BPA_WEBDRIVER_CAPABILITIES")]
    pub webdriver_capabilities: Option<String>,
    /// Per-request browser timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub browser_timeout: u64,
    /// Upper bound for a single step, in seconds
    #[arg(long, default_value_t = 300)]
    pub step_timeout: u64,
    #[arg(long, env = "BPA_AI_MODEL", default_value = "gpt-3.5-turbo")]
    pub ai_model: String,
    #[arg(long, env = "BPA_AI_BASE_URL")]
    pub ai_base_url: Option<String>,
    #[arg(long, default_value_t = 8)]
    pub ai_max_turns: usize,
}
