mod binding;
mod builtins;
mod dispatch;
mod evaluator;
mod helpers;
mod host;

pub use binding::{Binding, RECEIVER_NAME};
pub use dispatch::install_helpers;
pub use evaluator::{render_value, RhaiEvaluator, RhaiEvaluatorOptions};
pub use helpers::{Helper, HelperFn, HelperRegistry, HelperRegistryBuilder, MAX_HELPER_ARITY};
pub use host::HostFunctions;

pub use rhai;
