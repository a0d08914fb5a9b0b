use std::rc::Rc;

use alex_core::{AlexError, Console, SessionConfig, SessionScope};
use alex_runtime::{
    Binding, HelperRegistryBuilder, HostFunctions, RhaiEvaluator, RhaiEvaluatorOptions,
};
use alex_session::{Session, SessionTrigger};

pub use alex_core;
pub use alex_runtime;
pub use alex_session;

#[derive(Default)]
pub struct CreateSessionOptions {
    pub config: SessionConfig,
    /// Helpers defined in Rust. Scripts under `config.helpers_dir` are added on top.
    pub helpers: HelperRegistryBuilder,
    /// Native functions and types over live host state.
    pub host_functions: Option<Rc<dyn HostFunctions>>,
    /// Defaults to standard output with the configured discard sink.
    pub console: Option<Console>,
}

pub fn create_session(options: CreateSessionOptions) -> Result<Session<RhaiEvaluator>, AlexError> {
    let CreateSessionOptions {
        config,
        mut helpers,
        host_functions,
        console,
    } = options;
    config.validate()?;

    if let Some(dir) = &config.helpers_dir {
        helpers.add_scripts_dir(dir)?;
    }
    let helpers = helpers.build();
    tracing::debug!(helpers = helpers.len(), "helper registry built");

    let console = match console {
        Some(console) => console,
        None => Console::stdout(config.discard_path.as_deref())?,
    };
    let evaluator = RhaiEvaluator::new(RhaiEvaluatorOptions {
        console,
        scope: SessionScope::new(),
        helpers: Some(Rc::new(helpers)),
        host_functions,
        max_operations: config.max_operations,
    });

    Ok(Session::new(config, evaluator))
}

pub fn create_trigger(
    options: CreateSessionOptions,
) -> Result<SessionTrigger<RhaiEvaluator>, AlexError> {
    let session = create_session(options)?;
    Ok(SessionTrigger::new(Rc::new(session)))
}

/// Builds the binding a session starts on by running host code in it.
pub fn preload_binding(
    session: &Session<RhaiEvaluator>,
    source: Option<&str>,
) -> Result<Binding, AlexError> {
    let mut binding = Binding::new();
    if let Some(source) = source {
        session.evaluator().run_in(&mut binding, source)?;
    }
    Ok(binding)
}
