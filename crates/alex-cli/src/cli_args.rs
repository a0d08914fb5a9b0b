use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "alex-cli")]
#[command(about = "Interactive Rhai session over a captured host binding")]
pub(crate) struct Cli {
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub(crate) log_level: LogLevel,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Start a session on stdin/stdout.
    Session(SessionArgs),
    /// Print the effective configuration as JSON.
    CheckConfig(CheckConfigArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SessionArgs {
    #[arg(long = "config")]
    pub(crate) config: Option<String>,
    /// Host script run into the binding before the session starts.
    #[arg(long = "preload")]
    pub(crate) preload: Option<String>,
    #[arg(long = "helpers-dir")]
    pub(crate) helpers_dir: Option<String>,
    #[arg(long = "prompt")]
    pub(crate) prompt: Option<String>,
    /// Detect complete input by parsing only, without a trial run.
    #[arg(long = "parse-only")]
    pub(crate) parse_only: bool,
}

#[derive(Debug, Args)]
pub(crate) struct CheckConfigArgs {
    #[arg(long = "config")]
    pub(crate) config: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
