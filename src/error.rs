//! Error types for the scripting bridge.

use thiserror::Error;

use crate::options::OptionKind;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced across the host/script boundary.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Command registration with an empty name.
    #[error("command name must not be empty")]
    InvalidCommandName,

    /// Dispatch of a name no callback is registered under.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A registered callback raised during execution.
    #[error("command '{name}' failed: {source}")]
    CommandFailed {
        name: String,
        #[source]
        source: Box<rhai::EvalAltResult>,
    },

    /// Read or write of an unrecognized option key.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Write with a value of the wrong kind for the option.
    #[error("invalid value for option '{key}': expected {expected}, got {found}")]
    InvalidOptionValue {
        key: String,
        expected: OptionKind,
        found: OptionKind,
    },

    /// A script failed to parse.
    #[error("script parse error: {0}")]
    Compile(#[from] rhai::ParseError),

    /// A script raised while running at the top level.
    #[error("script error: {0}")]
    Script(#[source] Box<rhai::EvalAltResult>),

    /// A script file could not be read.
    #[error("failed to read script file: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// True for errors that mean the named command/option does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownCommand(_) | Self::UnknownOption(_))
    }
}
