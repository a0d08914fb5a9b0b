pub mod config;
pub mod console;
pub mod error;
pub mod evaluator;
pub mod scope_state;

pub use config::*;
pub use console::*;
pub use error::{
    map_config_invalid, map_config_read, map_console_io, map_discard_open, map_session_input,
    AlexError,
};
pub use evaluator::*;
pub use scope_state::*;
