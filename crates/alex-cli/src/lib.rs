use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use alex_api::{create_session, preload_binding, CreateSessionOptions};
use alex_core::{AlexError, CompletenessMode, SessionConfig};
use clap::Parser;

mod cli_args;
mod error_map;
mod logging;

pub(crate) use cli_args::{CheckConfigArgs, Cli, Mode, SessionArgs};
pub(crate) use error_map::{emit_error, map_cli_preload_read};
pub(crate) use logging::init_logging;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging(cli.log_level);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, AlexError> {
    match cli.command {
        Mode::Session(args) => run_session(args),
        Mode::CheckConfig(args) => run_check_config(args),
    }
}

fn load_config(path: Option<&str>) -> Result<SessionConfig, AlexError> {
    match path {
        Some(path) => SessionConfig::load(Path::new(path)),
        None => Ok(SessionConfig::default()),
    }
}

fn session_config(args: &SessionArgs) -> Result<SessionConfig, AlexError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = &args.helpers_dir {
        config.helpers_dir = Some(PathBuf::from(dir));
    }
    if let Some(prompt) = &args.prompt {
        config.input_prompt = prompt.clone();
    }
    if args.parse_only {
        config.completeness = CompletenessMode::ParseOnly;
    }
    config.validate()?;
    Ok(config)
}

fn run_session(args: SessionArgs) -> Result<i32, AlexError> {
    let config = session_config(&args)?;
    let preload = match &args.preload {
        Some(path) => Some(fs::read_to_string(path).map_err(map_cli_preload_read)?),
        None => None,
    };

    let session = create_session(CreateSessionOptions {
        config,
        ..CreateSessionOptions::default()
    })?;
    let mut binding = preload_binding(&session, preload.as_deref())?;
    session.start(&mut binding)?;
    Ok(0)
}

fn run_check_config(args: CheckConfigArgs) -> Result<i32, AlexError> {
    let config = load_config(Some(&args.config))?;
    let rendered = serde_json::to_string_pretty(&config)
        .map_err(|error| AlexError::new("CONFIG_INVALID", error.to_string()))?;
    println!("{}", rendered);
    Ok(0)
}
