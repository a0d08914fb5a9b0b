use std::rc::Rc;

use alex_core::{AlexError, Console, ContextEvaluator, EvaluationResult, SessionScope, TrialOutcome};
use rhai::{Dynamic, Engine, Position, AST};

use crate::binding::Binding;
use crate::builtins::register_builtins;
use crate::dispatch::install_helpers;
use crate::helpers::HelperRegistry;
use crate::host::HostFunctions;

#[derive(Clone)]
pub struct RhaiEvaluatorOptions {
    pub console: Console,
    pub scope: SessionScope,
    pub helpers: Option<Rc<HelperRegistry>>,
    pub host_functions: Option<Rc<dyn HostFunctions>>,
    pub max_operations: Option<u64>,
}

/// [`ContextEvaluator`] backed by a Rhai engine. Script output (`print`, `debug`)
/// is routed through the shared console.
pub struct RhaiEvaluator {
    engine: Engine,
    console: Console,
    scope: SessionScope,
}

impl RhaiEvaluator {
    pub fn new(options: RhaiEvaluatorOptions) -> Self {
        let mut engine = Engine::new();
        if let Some(max_operations) = options.max_operations {
            engine.set_max_operations(max_operations);
        }

        let print_console = options.console.clone();
        engine.on_print(move |text| print_console.script_output(text));
        let debug_console = options.console.clone();
        engine.on_debug(move |text, source, position| {
            debug_console.script_output(&debug_line(text, source, position));
        });

        register_builtins(&mut engine, options.console.clone());
        if let Some(helpers) = options.helpers {
            install_helpers(&mut engine, helpers, options.scope.clone());
        }
        if let Some(host) = &options.host_functions {
            host.register(&mut engine);
        }

        Self {
            engine,
            console: options.console,
            scope: options.scope,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Runs host code into `binding` with visible output, e.g. to set up the state
    /// a session is then started on.
    pub fn run_in(&self, binding: &mut Binding, source: &str) -> Result<Dynamic, AlexError> {
        let ast = self
            .engine
            .compile_with_scope(binding.scope(), source)
            .map_err(|error| AlexError::new("PRELOAD_FAILED", error.to_string()))?;
        self.eval_program(binding, &ast)
            .map_err(|message| AlexError::new("PRELOAD_FAILED", message))
    }

    fn eval_program(&self, binding: &mut Binding, ast: &AST) -> Result<Dynamic, String> {
        let program = binding.library().merge(ast);
        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(binding.scope_mut(), &program);
        binding.set_library(program.clone_functions_only());
        result.map_err(|error| error.to_string())
    }
}

impl ContextEvaluator for RhaiEvaluator {
    type Context = Binding;

    fn console(&self) -> &Console {
        &self.console
    }

    fn session_scope(&self) -> &SessionScope {
        &self.scope
    }

    fn trial_run(&self, source: &str, binding: &Binding) -> TrialOutcome {
        let ast = match self.engine.compile_with_scope(binding.scope(), source) {
            Ok(ast) => ast,
            Err(error) => return TrialOutcome::Syntax(error.to_string()),
        };
        let mut scratch = binding.scope().clone();
        let program = binding.library().merge(&ast);
        match self.engine.run_ast_with_scope(&mut scratch, &program) {
            Ok(()) => TrialOutcome::Accepted,
            Err(error) => TrialOutcome::Raised(error.to_string()),
        }
    }

    fn parse_only(&self, source: &str, binding: &Binding) -> Option<TrialOutcome> {
        Some(match self.engine.compile_with_scope(binding.scope(), source) {
            Ok(_) => TrialOutcome::Accepted,
            Err(error) => TrialOutcome::Syntax(error.to_string()),
        })
    }

    fn evaluate(&self, source: &str, binding: &mut Binding) -> EvaluationResult {
        let ast = match self.engine.compile_with_scope(binding.scope(), source) {
            Ok(ast) => ast,
            Err(error) => return EvaluationResult::Error(error.to_string()),
        };
        match self.eval_program(binding, &ast) {
            Ok(value) => EvaluationResult::Value(render_value(&value)),
            Err(message) => EvaluationResult::Error(message),
        }
    }
}

/// Textual form of a value as shown after `=> `: strings quoted, unit as `()`.
pub fn render_value(value: &Dynamic) -> String {
    format!("{:?}", value)
}

fn debug_line(text: &str, source: Option<&str>, position: Position) -> String {
    match (source, position.is_none()) {
        (Some(source), false) => format!("{} @ {:?} | {}", source, position, text),
        (None, false) => format!("{:?} | {}", position, text),
        (_, true) => text.to_string(),
    }
}
