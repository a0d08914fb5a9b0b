use std::io::BufRead;
use std::rc::Rc;

use alex_core::{AlexError, ContextEvaluator};

use crate::Session;

/// Per-tick input state of the host, e.g. its keyboard poller.
pub trait TriggerSource {
    /// True on the tick `key` was activated (edge, not level).
    fn is_triggered(&self, key: &str) -> bool;
}

impl<F> TriggerSource for F
where
    F: Fn(&str) -> bool,
{
    fn is_triggered(&self, key: &str) -> bool {
        self(key)
    }
}

/// Entry point the host loop calls to open a session on its current context.
pub struct SessionTrigger<E: ContextEvaluator> {
    session: Rc<Session<E>>,
    start_key: String,
}

impl<E: ContextEvaluator> SessionTrigger<E> {
    pub fn new(session: Rc<Session<E>>) -> Self {
        let start_key = session.config().start_key.clone();
        Self { session, start_key }
    }

    pub fn session(&self) -> &Rc<Session<E>> {
        &self.session
    }

    pub fn start_key(&self) -> &str {
        &self.start_key
    }

    /// Blocks until the session exits.
    pub fn trigger_start(&self, context: &mut E::Context) -> Result<(), AlexError> {
        self.session.start(context)
    }

    pub fn trigger_start_with_input(
        &self,
        context: &mut E::Context,
        reader: &mut dyn BufRead,
    ) -> Result<(), AlexError> {
        self.session.start_with_input(context, reader)
    }

    /// Called once per host tick. Returns whether a session ran.
    pub fn poll(
        &self,
        source: &dyn TriggerSource,
        context: &mut E::Context,
        reader: &mut dyn BufRead,
    ) -> Result<bool, AlexError> {
        if !source.is_triggered(&self.start_key) {
            return Ok(false);
        }
        tracing::debug!(key = %self.start_key, "start key triggered");
        self.trigger_start_with_input(context, reader)?;
        Ok(true)
    }
}
