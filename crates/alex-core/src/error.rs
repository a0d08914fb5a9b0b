use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct AlexError {
    pub code: String,
    pub message: String,
}

impl AlexError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

fn map_error(code: &'static str, error: impl Display) -> AlexError {
    AlexError::new(code, error.to_string())
}

pub fn map_console_io(error: std::io::Error) -> AlexError {
    map_error("CONSOLE_IO", error)
}

pub fn map_session_input(error: std::io::Error) -> AlexError {
    map_error("SESSION_INPUT", error)
}

pub fn map_discard_open(error: std::io::Error) -> AlexError {
    map_error("DISCARD_OPEN", error)
}

pub fn map_config_read(error: std::io::Error) -> AlexError {
    map_error("CONFIG_READ", error)
}

pub fn map_config_invalid(error: serde_json::Error) -> AlexError {
    map_error("CONFIG_INVALID", error)
}
