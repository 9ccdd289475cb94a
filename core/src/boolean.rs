//! Loose boolean coercion.

use crate::error::{ArgError, Result};
use crate::{ArgKind, ArgValue};

const TRUE_WORDS: [&str; 4] = ["y", "yes", "t", "true"];
const FALSE_WORDS: [&str; 4] = ["n", "no", "f", "false"];

/// Converts a loosely typed value into a boolean.
///
/// Strings are trimmed and compared case-insensitively against
/// `y`/`yes`/`t`/`true` and `n`/`no`/`f`/`false`. The numbers `1` and `0`
/// map to `true` and `false`. Booleans pass through, and an absent value is
/// `false`.
///
/// # Errors
///
/// Returns [`ArgError::TypeCoercion`] naming the value for any other input.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{ArgValue, to_boolean};
///
/// assert!(to_boolean(Some(&ArgValue::from("YES"))).unwrap());
/// assert!(to_boolean(Some(&ArgValue::Int(1))).unwrap());
/// assert!(!to_boolean(None).unwrap());
/// assert!(to_boolean(Some(&ArgValue::from("maybe"))).is_err());
/// ```
pub fn to_boolean(value: Option<&ArgValue>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };

    let parsed = match value {
        ArgValue::Bool(b) => Some(*b),
        ArgValue::Str(s) => {
            let s = s.trim().to_lowercase();
            if TRUE_WORDS.contains(&s.as_str()) {
                Some(true)
            } else if FALSE_WORDS.contains(&s.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        ArgValue::Int(n) => from_number(*n as f64),
        ArgValue::Uint(n) => from_number(*n as f64),
        ArgValue::Float(n) => from_number(*n),
    };

    parsed.ok_or_else(|| ArgError::coercion(value.to_string(), ArgKind::Boolean))
}

fn from_number(n: f64) -> Option<bool> {
    if n == 1.0 {
        Some(true)
    } else if n == 0.0 {
        Some(false)
    } else {
        None
    }
}
