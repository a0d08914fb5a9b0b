use alex_core::{CompletenessMode, Console, ContextEvaluator, TrialOutcome};

/// Decides whether a buffer is one complete unit by trying it with all output
/// suppressed.
#[derive(Clone)]
pub struct CompletenessChecker {
    console: Console,
    mode: CompletenessMode,
}

impl CompletenessChecker {
    pub fn new(console: Console, mode: CompletenessMode) -> Self {
        Self { console, mode }
    }

    pub fn mode(&self) -> CompletenessMode {
        self.mode
    }

    pub fn is_complete<E: ContextEvaluator>(
        &self,
        evaluator: &E,
        buffer: &str,
        context: &E::Context,
    ) -> bool {
        let _quiet = self.console.suppress();
        let outcome = match self.mode {
            CompletenessMode::ParseOnly => evaluator
                .parse_only(buffer, context)
                .unwrap_or_else(|| evaluator.trial_run(buffer, context)),
            CompletenessMode::Trial => evaluator.trial_run(buffer, context),
        };

        match &outcome {
            TrialOutcome::Syntax(message) => {
                tracing::debug!(%message, "buffer incomplete");
            }
            TrialOutcome::Raised(message) => {
                tracing::debug!(%message, "trial raised; buffer treated as complete");
            }
            TrialOutcome::Accepted => {}
        }
        outcome.is_complete()
    }
}
