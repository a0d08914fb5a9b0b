use std::fmt;

use crate::{Console, SessionScope};

/// Result of one committed evaluation, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    Value(String),
    Error(String),
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(text) => write!(f, "=> {}", text),
            Self::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// What happened when a candidate buffer was tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// The buffer does not form a syntactically complete unit (yet).
    Syntax(String),
    /// The buffer parsed (and, for trial runs, executed) without failure.
    Accepted,
    /// The buffer parsed but raised while running.
    Raised(String),
}

impl TrialOutcome {
    pub fn is_complete(&self) -> bool {
        !matches!(self, Self::Syntax(_))
    }
}

/// Capability to run code inside a captured context.
///
/// Output of the evaluated code must go through [`ContextEvaluator::console`] so
/// callers can suppress it. A session takes its console and run-state from the
/// evaluator, so helper dispatch and the session always see the same scope.
pub trait ContextEvaluator {
    type Context;

    fn console(&self) -> &Console;

    fn session_scope(&self) -> &SessionScope;

    /// Runs `source` for completeness detection. Must not touch the local
    /// bindings of `context`; side effects on host state are allowed.
    fn trial_run(&self, source: &str, context: &Self::Context) -> TrialOutcome;

    /// Parses without running. `None` when this evaluator cannot separate the two.
    fn parse_only(&self, _source: &str, _context: &Self::Context) -> Option<TrialOutcome> {
        None
    }

    fn evaluate(&self, source: &str, context: &mut Self::Context) -> EvaluationResult;
}
