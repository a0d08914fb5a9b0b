use std::io::BufRead;

use alex_core::{
    map_session_input, AlexError, Console, ContextEvaluator, NestedSessionPolicy, SessionConfig,
    SessionScope, CLEAR_SENTINEL, EXIT_SENTINEL,
};

use crate::accumulator::{IndentRules, InputAccumulator};
use crate::completeness::CompletenessChecker;
use crate::line_reader::stdin_lines;

enum ReadOutcome {
    Unit(String),
    Exit,
}

/// Prompt, read until complete, evaluate, print; until `exit`.
///
/// `start` takes `&self` so code evaluated inside a session can start another
/// one on the same instance. The run-state is a depth counter shared with the
/// helper dispatch.
pub struct Session<E: ContextEvaluator> {
    config: SessionConfig,
    rules: IndentRules,
    checker: CompletenessChecker,
    evaluator: E,
    console: Console,
    scope: SessionScope,
}

impl<E: ContextEvaluator> Session<E> {
    pub fn new(config: SessionConfig, evaluator: E) -> Self {
        let console = evaluator.console().clone();
        let scope = evaluator.session_scope().clone();
        let rules = IndentRules::from_config(&config);
        let checker = CompletenessChecker::new(console.clone(), config.completeness);
        Self {
            config,
            rules,
            checker,
            evaluator,
            console,
            scope,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scope.is_active()
    }

    pub fn depth(&self) -> usize {
        self.scope.depth()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn scope(&self) -> &SessionScope {
        &self.scope
    }

    /// Runs a session on standard input. Blocks until `exit`.
    ///
    /// Stdin is locked per line, never across an evaluation, so a nested `start`
    /// reads the following lines.
    pub fn start(&self, context: &mut E::Context) -> Result<(), AlexError> {
        self.start_with_input(context, &mut stdin_lines())
    }

    pub fn start_with_input(
        &self,
        context: &mut E::Context,
        reader: &mut dyn BufRead,
    ) -> Result<(), AlexError> {
        if self.scope.is_active() && self.config.nested_sessions == NestedSessionPolicy::Forbid {
            return Err(AlexError::new(
                "SESSION_NESTED",
                "A session is already running and nested sessions are forbidden.",
            ));
        }

        let active = self.scope.enter();
        tracing::info!(depth = active.depth(), "session started");
        loop {
            self.console.write_text(&self.config.input_prompt)?;
            match self.read_unit(context, reader)? {
                ReadOutcome::Exit => break,
                ReadOutcome::Unit(source) => self.commit(&source, context)?,
            }
        }
        tracing::info!(depth = active.depth(), "session exited");
        Ok(())
    }

    fn read_unit(
        &self,
        context: &E::Context,
        reader: &mut dyn BufRead,
    ) -> Result<ReadOutcome, AlexError> {
        let mut input = InputAccumulator::new(&self.rules);
        loop {
            let Some(line) = read_line(reader)? else {
                tracing::info!("end of input; leaving session");
                return Ok(ReadOutcome::Exit);
            };

            match line.trim() {
                EXIT_SENTINEL => {
                    if !input.is_empty() {
                        tracing::debug!(lines = input.line_count(), "partial input dropped on exit");
                    }
                    return Ok(ReadOutcome::Exit);
                }
                CLEAR_SENTINEL => {
                    self.console.clear_screen()?;
                    self.prompt_continuation(&input)?;
                    continue;
                }
                _ => {}
            }

            input.append(&line);
            let complete = self
                .checker
                .is_complete(&self.evaluator, input.buffer(), context);
            if let Some(failure) = self.console.take_failure() {
                return Err(failure);
            }
            if complete {
                return Ok(ReadOutcome::Unit(input.into_buffer()));
            }
            self.prompt_continuation(&input)?;
        }
    }

    fn prompt_continuation(&self, input: &InputAccumulator<'_>) -> Result<(), AlexError> {
        self.console.write_text(&self.config.input_prompt)?;
        self.console.write_text(&input.current_indent())
    }

    fn commit(&self, source: &str, context: &mut E::Context) -> Result<(), AlexError> {
        let result = self.evaluator.evaluate(source, context);
        if let Some(failure) = self.console.take_failure() {
            return Err(failure);
        }
        self.console.write_line(&result.to_string())
    }
}

fn read_line(reader: &mut dyn BufRead) -> Result<Option<String>, AlexError> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(map_session_input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
