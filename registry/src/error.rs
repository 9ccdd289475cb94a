//! Error types for registration, configuration and dispatch.
//!
//! Wraps the argument errors from `cmdarg-core` together with the failure
//! modes the registry adds: I/O, serialization, naming conflicts, guard
//! rejections and missing required arguments.

use cmdarg_core::{ArgError, SchemaError};
use thiserror::Error;

/// Errors that can occur while building a registry or dispatching a message.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Schema declaration or argument binding failure.
    #[error(transparent)]
    Argument(#[from] ArgError),

    /// A command schema failed structural validation.
    #[error("invalid schema for `{command}`: {}", join_errors(.errors))]
    InvalidSchema {
        /// Command path, space separated.
        command: String,
        /// Every problem found.
        errors: Vec<SchemaError>,
    },

    /// A command was registered without a name.
    #[error("command cannot be registered without a name")]
    UnnamedCommand,

    /// A name or alias is already taken by another command.
    #[error("duplicate command name or alias: {0}")]
    DuplicateCommand(String),

    /// No command matches the given name or alias.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A guard denied the invocation.
    #[error("`{command}` was rejected by guard `{guard}`")]
    GuardRejected {
        /// Command path whose guard failed, space separated.
        command: String,
        /// Name of the failing guard.
        guard: String,
    },

    /// A required argument had no token.
    #[error("`{command}` is missing required argument `{name}`")]
    MissingArgument {
        /// Command path, space separated.
        command: String,
        /// Schema entry name.
        name: String,
    },
}

fn join_errors(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
