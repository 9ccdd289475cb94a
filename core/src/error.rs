//! Error types for schema construction and argument binding.

use thiserror::Error;

use crate::ArgKind;

/// Errors raised while declaring a schema or binding arguments to it.
///
/// Every variant aborts the operation that produced it; binding never
/// returns a partially bound argument list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// Two schema entries share a name.
    #[error("duplicate argument name: {0}")]
    DuplicateSchemaName(String),

    /// A token cannot be converted to the kind its schema entry declares.
    #[error("invalid type: `{value}` is not assignable to type {kind}")]
    TypeCoercion {
        /// The offending value, as it was before coercion.
        value: String,
        /// The declared kind.
        kind: ArgKind,
    },

    /// A validator rejected an otherwise coerced value.
    #[error("{0}")]
    Validation(String),
}

impl ArgError {
    pub(crate) fn coercion(value: impl Into<String>, kind: ArgKind) -> Self {
        Self::TypeCoercion {
            value: value.into(),
            kind,
        }
    }
}

/// Convenience alias for results with [`ArgError`].
pub type Result<T> = std::result::Result<T, ArgError>;
