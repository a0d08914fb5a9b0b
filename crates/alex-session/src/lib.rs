mod accumulator;
mod completeness;
mod line_reader;
mod session;
mod trigger;

pub use accumulator::{IndentChange, IndentRules, InputAccumulator};
pub use completeness::CompletenessChecker;
pub use line_reader::{stdin_lines, LineReader};
pub use session::Session;
pub use trigger::{SessionTrigger, TriggerSource};

#[cfg(test)]
mod test_support;
