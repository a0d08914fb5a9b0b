use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{map_config_invalid, map_config_read};
use crate::AlexError;

pub const DEFAULT_START_KEY: &str = "Z";
pub const DEFAULT_INPUT_PROMPT: &str = "alex: ";
pub const DEFAULT_INDENT_SPACES: usize = 2;
pub const EXIT_SENTINEL: &str = "exit";
pub const CLEAR_SENTINEL: &str = "cls";

const DEFAULT_INDENT_FIRST: [&str; 8] = [
    "def", "class", "module", "while", "until", "begin", "if", "unless",
];
const DEFAULT_INDENT_LAST: [&str; 1] = ["do"];
const DEFAULT_DEDENT_LAST: [&str; 1] = ["end"];

/// How the completeness checker decides that a buffer is one full unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletenessMode {
    /// Run the buffer with output suppressed; only syntax failures mean "incomplete".
    #[default]
    Trial,
    /// Ask the evaluator to parse without executing. Falls back to `Trial` when the
    /// evaluator cannot parse separately.
    ParseOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NestedSessionPolicy {
    #[default]
    Allow,
    Forbid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SessionConfig {
    pub start_key: String,
    pub input_prompt: String,
    pub indent_spaces: usize,
    pub indent_first_tokens: BTreeSet<String>,
    pub indent_last_tokens: BTreeSet<String>,
    pub dedent_last_tokens: BTreeSet<String>,
    pub completeness: CompletenessMode,
    pub nested_sessions: NestedSessionPolicy,
    pub discard_path: Option<PathBuf>,
    pub max_operations: Option<u64>,
    pub helpers_dir: Option<PathBuf>,
}

fn token_set(tokens: &[&str]) -> BTreeSet<String> {
    tokens.iter().map(|token| (*token).to_string()).collect()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_key: DEFAULT_START_KEY.to_string(),
            input_prompt: DEFAULT_INPUT_PROMPT.to_string(),
            indent_spaces: DEFAULT_INDENT_SPACES,
            indent_first_tokens: token_set(&DEFAULT_INDENT_FIRST),
            indent_last_tokens: token_set(&DEFAULT_INDENT_LAST),
            dedent_last_tokens: token_set(&DEFAULT_DEDENT_LAST),
            completeness: CompletenessMode::default(),
            nested_sessions: NestedSessionPolicy::default(),
            discard_path: None,
            max_operations: None,
            helpers_dir: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, AlexError> {
        let config: Self = serde_json::from_str(raw).map_err(map_config_invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file. Relative `helpersDir`/`discardPath` entries are
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, AlexError> {
        if !path.exists() {
            return Err(AlexError::new(
                "CONFIG_NOT_FOUND",
                format!("Config file does not exist: {}", path.display()),
            ));
        }
        let raw = fs::read_to_string(path).map_err(map_config_read)?;
        let mut config = Self::from_json_str(&raw)?;

        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if let Some(dir) = config.helpers_dir.take() {
            config.helpers_dir = Some(resolve_relative(&base, dir));
        }
        if let Some(discard) = config.discard_path.take() {
            config.discard_path = Some(resolve_relative(&base, discard));
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlexError> {
        if self.indent_spaces == 0 {
            return Err(AlexError::new(
                "CONFIG_INVALID",
                "indentSpaces must be at least 1.",
            ));
        }
        if self.input_prompt.contains('\n') {
            return Err(AlexError::new(
                "CONFIG_INVALID",
                "inputPrompt must be a single line.",
            ));
        }
        let all_tokens = self
            .indent_first_tokens
            .iter()
            .chain(&self.indent_last_tokens)
            .chain(&self.dedent_last_tokens);
        for token in all_tokens {
            if token.is_empty() || !token.chars().all(|ch| ch.is_alphanumeric() || ch == '_') {
                return Err(AlexError::new(
                    "CONFIG_INVALID",
                    format!("Indent token \"{}\" must be a single word.", token),
                ));
            }
        }
        Ok(())
    }
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
