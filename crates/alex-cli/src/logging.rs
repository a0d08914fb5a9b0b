use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

use crate::cli_args::LogLevel;

/// Logs go to stderr so they never interleave with session output on stdout.
pub(crate) fn init_logging(level: LogLevel) {
    let filter = LevelFilter::from_level(level.into());
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    // Already set when run_cli_from_args runs more than once in a process.
    let _ = Registry::default().with(layer).try_init();
}
