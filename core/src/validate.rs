//! Schema validation.
//!
//! Checks the structure of a list of schema entries before it is used for
//! binding: empty or repeated names, validators that can never pass for the
//! declared kind, malformed patterns and bounds, and required arguments that
//! follow optional ones.
//!
//! A validator on a transformed entry sees the transform's output, whose type
//! is unknown here, so kind mismatches are only reported for entries without
//! a transform.
//!
//! # Examples
//!
//! ```
//! use cmdarg_core::*;
//!
//! let entries = vec![
//!     ArgSpec::required("count", ArgKind::Uint),
//!     ArgSpec::optional("reason", ArgKind::String),
//! ];
//! assert!(validate_schema(&entries).is_empty());
//!
//! // Invalid: a required argument after an optional one
//! let bad = vec![
//!     ArgSpec::optional("reason", ArgKind::String),
//!     ArgSpec::required("count", ArgKind::Uint),
//! ];
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgKind, ArgSpec, Validator};

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Entry name is empty or whitespace-only.
    #[error("argument name cannot be empty (position {0})")]
    EmptyArgumentName(usize),
    /// Two entries share a name.
    #[error("duplicate argument name: {0}")]
    DuplicateArgumentName(String),
    /// A required entry follows an optional one, so it can never be omitted
    /// without shifting positions.
    #[error("required argument `{0}` follows an optional argument")]
    RequiredAfterOptional(String),
    /// A `pattern` validator does not compile.
    #[error("invalid pattern for `{name}`: {message}")]
    InvalidPattern {
        /// Entry name.
        name: String,
        /// Regex compiler message.
        message: String,
    },
    /// A `range` or `length` validator has `min` greater than `max`.
    #[error("invalid bounds for `{0}`: min is greater than max")]
    InvalidBounds(String),
    /// A validator can never accept values of the declared kind.
    #[error("validator for `{name}` cannot apply to kind {kind}")]
    ValidatorKindMismatch {
        /// Entry name.
        name: String,
        /// Declared kind.
        kind: ArgKind,
    },
    /// A `one_of` validator lists no choices.
    #[error("`{0}` must list at least one choice")]
    EmptyChoices(String),
}

/// Validates a list of schema entries.
///
/// Returns every problem found, in entry order.
pub fn validate_schema(entries: &[ArgSpec]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut saw_optional = false;

    for (position, entry) in entries.iter().enumerate() {
        let name = entry.name.trim();
        if name.is_empty() {
            errors.push(SchemaError::EmptyArgumentName(position));
            continue;
        }

        if !seen.insert(name) {
            errors.push(SchemaError::DuplicateArgumentName(name.to_string()));
        }

        if entry.required && saw_optional {
            errors.push(SchemaError::RequiredAfterOptional(name.to_string()));
        }
        saw_optional |= !entry.required;

        if let Some(validator) = &entry.validator {
            let transformed = entry.transform.is_some();
            errors.extend(validate_validator(name, entry.kind, transformed, validator));
        }
    }

    errors
}

fn validate_validator(
    name: &str,
    kind: Option<ArgKind>,
    transformed: bool,
    validator: &Validator,
) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let kind = kind.unwrap_or_default();

    match validator {
        Validator::Range { min, max } => {
            if matches!((min, max), (Some(min), Some(max)) if min > max) {
                errors.push(SchemaError::InvalidBounds(name.to_string()));
            }
            if !transformed && matches!(kind, ArgKind::Boolean | ArgKind::Code) {
                errors.push(mismatch(name, kind));
            }
        }
        Validator::Length { min, max } => {
            if matches!((min, max), (Some(min), Some(max)) if min > max) {
                errors.push(SchemaError::InvalidBounds(name.to_string()));
            }
            if !transformed && (kind.is_numeric() || kind == ArgKind::Boolean) {
                errors.push(mismatch(name, kind));
            }
        }
        Validator::Pattern(pattern) => {
            if let Err(err) = pattern.regex() {
                errors.push(SchemaError::InvalidPattern {
                    name: name.to_string(),
                    message: err.to_string(),
                });
            }
        }
        Validator::OneOf(choices) => {
            if choices.is_empty() {
                errors.push(SchemaError::EmptyChoices(name.to_string()));
            }
        }
        Validator::Custom(_) => {}
    }

    errors
}

fn mismatch(name: &str, kind: ArgKind) -> SchemaError {
    SchemaError::ValidatorKindMismatch {
        name: name.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgValue;

    #[test]
    fn test_validate_accepts_valid_schema() {
        let entries = vec![
            ArgSpec::required("count", ArgKind::Uint)
                .with_validator(Validator::range(Some(0.0), Some(400.0))),
            ArgSpec::optional("reason", ArgKind::String)
                .with_validator(Validator::length(None, Some(200))),
            ArgSpec::new("extra"),
        ];
        assert!(validate_schema(&entries).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicate_names() {
        let entries = vec![ArgSpec::new(" "), ArgSpec::new("a"), ArgSpec::new("a")];
        assert_eq!(
            validate_schema(&entries),
            vec![
                SchemaError::EmptyArgumentName(0),
                SchemaError::DuplicateArgumentName("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_validate_rejects_required_after_optional() {
        let entries = vec![
            ArgSpec::optional("a", ArgKind::Int),
            ArgSpec::required("b", ArgKind::Int),
        ];
        assert_eq!(
            validate_schema(&entries),
            vec![SchemaError::RequiredAfterOptional("b".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_bad_validators() {
        let entries = vec![
            ArgSpec::required("a", ArgKind::Int)
                .with_validator(Validator::range(Some(5.0), Some(1.0))),
            ArgSpec::required("b", ArgKind::String).with_validator(Validator::pattern("(")),
            ArgSpec::required("c", ArgKind::Boolean)
                .with_validator(Validator::range(None, Some(1.0))),
            ArgSpec::required("d", ArgKind::Any).with_validator(Validator::OneOf(Vec::new())),
        ];
        let errors = validate_schema(&entries);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], SchemaError::InvalidBounds("a".to_string()));
        assert!(matches!(errors[1], SchemaError::InvalidPattern { .. }));
        assert_eq!(
            errors[2],
            SchemaError::ValidatorKindMismatch {
                name: "c".to_string(),
                kind: ArgKind::Boolean,
            }
        );
        assert_eq!(errors[3], SchemaError::EmptyChoices("d".to_string()));
    }

    #[test]
    fn test_validate_allows_any_validator_after_transform() {
        let entries = vec![
            ArgSpec::required("n", ArgKind::Uint)
                .with_transform(|arg| ArgValue::Str(format!("#{}", arg.value)))
                .with_validator(Validator::length(Some(1), Some(5))),
            ArgSpec::required("flag", ArgKind::Boolean)
                .with_transform(|_| ArgValue::Int(1))
                .with_validator(Validator::range(Some(0.0), Some(1.0))),
        ];
        assert!(validate_schema(&entries).is_empty());
    }

    #[test]
    fn test_validate_transform_keeps_bounds_checks() {
        let entries = vec![
            ArgSpec::required("n", ArgKind::Uint)
                .with_transform(|arg| ArgValue::Str(arg.value.to_string()))
                .with_validator(Validator::length(Some(5), Some(1))),
        ];
        assert_eq!(
            validate_schema(&entries),
            vec![SchemaError::InvalidBounds("n".to_string())]
        );
    }
}
