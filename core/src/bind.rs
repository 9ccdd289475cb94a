//! Positional binding of tokens against an [`ArgSchema`].
//!
//! Token `i` pairs with schema entry `i`. For each paired token the value
//! goes through three steps, in this order:
//!
//! 1. coercion to the entry's [`ArgKind`]
//! 2. the entry's transform
//! 3. the entry's validator, labeled with the entry name
//!
//! The first failure aborts binding. Tokens past the end of the schema pass
//! through untouched, and missing required arguments are not reported here.
//!
//! Numeric parsing is lenient about trailing text: the longest numeric
//! prefix is used (`"12px"` binds to `12` as an `Int`).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArgError, Result};
use crate::{ArgKind, ArgSchema, ArgSpec, ArgValue, Token, TokenFormat, to_boolean};

/// A token annotated by binding.
///
/// Arguments past the end of the schema keep `name` and `kind` unset and
/// their raw string value.
///
/// When deserialized, a numeric value is restored to the variant its `kind`
/// produces, so `{"value": 5, "kind": "uint"}` reads back as
/// [`ArgValue::Uint`] and `"Infinity"` under a `float` kind as an infinite
/// [`ArgValue::Float`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundArgumentRepr")]
pub struct BoundArgument {
    /// Coerced, transformed value.
    pub value: ArgValue,
    /// Delimiter style of the source token.
    pub format: TokenFormat,
    /// Language tag of a fenced code block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Name of the schema entry this argument was bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kind declared by the schema entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ArgKind>,
}

impl BoundArgument {
    /// Returns `true` when this argument was paired with a schema entry.
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

impl From<Token> for BoundArgument {
    fn from(token: Token) -> Self {
        Self {
            value: ArgValue::Str(token.value),
            format: token.format,
            language: token.language,
            name: None,
            kind: None,
        }
    }
}

impl From<&Token> for BoundArgument {
    fn from(token: &Token) -> Self {
        Self::from(token.clone())
    }
}

#[derive(Deserialize)]
struct BoundArgumentRepr {
    value: ArgValue,
    format: TokenFormat,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: Option<ArgKind>,
}

impl From<BoundArgumentRepr> for BoundArgument {
    fn from(repr: BoundArgumentRepr) -> Self {
        let value = match repr.kind {
            Some(kind) => restore_numeric(repr.value, kind),
            None => repr.value,
        };
        Self {
            value,
            format: repr.format,
            language: repr.language,
            name: repr.name,
            kind: repr.kind,
        }
    }
}

/// Maps a deserialized scalar back to the variant `kind` coerces to.
///
/// Only exact conversions are made; anything else (such as a transform
/// result of another type) is kept as read.
fn restore_numeric(value: ArgValue, kind: ArgKind) -> ArgValue {
    match (kind, value) {
        (ArgKind::Uint, ArgValue::Int(n)) if n >= 0 => ArgValue::Uint(n.unsigned_abs()),
        (ArgKind::Int, ArgValue::Uint(n)) => {
            i64::try_from(n).map_or(ArgValue::Uint(n), ArgValue::Int)
        }
        (ArgKind::Float, ArgValue::Int(n)) => ArgValue::Float(n as f64),
        (ArgKind::Float, ArgValue::Uint(n)) => ArgValue::Float(n as f64),
        (ArgKind::Float, ArgValue::Str(s)) if s == "Infinity" => ArgValue::Float(f64::INFINITY),
        (ArgKind::Float, ArgValue::Str(s)) if s == "-Infinity" => {
            ArgValue::Float(f64::NEG_INFINITY)
        }
        (_, value) => value,
    }
}

/// Binds tokens against a schema.
///
/// # Errors
///
/// Returns [`ArgError::TypeCoercion`] when a token cannot be converted to
/// its declared kind, or [`ArgError::Validation`] when a validator rejects
/// the final value.
///
/// # Examples
///
/// ```
/// use cmdarg_core::*;
///
/// let schema = ArgSchema::from_entries([
///     ArgSpec::required("count", ArgKind::Uint),
///     ArgSpec::optional("loud", ArgKind::Boolean),
/// ])
/// .unwrap();
///
/// let bound = bind(&tokenize("5 yes extra"), &schema).unwrap();
/// assert_eq!(bound[0].value, ArgValue::Uint(5));
/// assert_eq!(bound[1].value, ArgValue::Bool(true));
/// assert_eq!(bound[2].name, None);
/// assert_eq!(bound[2].value, ArgValue::from("extra"));
///
/// assert!(bind(&tokenize("-1"), &schema).is_err());
/// ```
pub fn bind(tokens: &[Token], schema: &ArgSchema) -> Result<Vec<BoundArgument>> {
    bind_arguments(tokens.iter().map(BoundArgument::from).collect(), schema)
}

/// Binds already-built arguments against a schema.
///
/// Re-binding the output of [`bind`] against the same schema leaves values
/// unchanged as long as the schema has no transforms.
///
/// # Errors
///
/// Same as [`bind`].
pub fn bind_arguments(args: Vec<BoundArgument>, schema: &ArgSchema) -> Result<Vec<BoundArgument>> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| match schema.at(index) {
            Some(spec) => bind_one(arg, spec),
            None => Ok(arg),
        })
        .collect()
}

fn bind_one(mut arg: BoundArgument, spec: &ArgSpec) -> Result<BoundArgument> {
    let kind = spec.kind.unwrap_or_default();
    arg.name = Some(spec.name.clone());
    arg.kind = Some(kind);
    arg.value = coerce(&arg.value, arg.format, kind)?;

    if let Some(transform) = &spec.transform {
        arg.value = transform.apply(&arg);
    }

    if let Some(validator) = &spec.validator {
        validator.check(&spec.name, &arg.value)?;
    }

    debug!(name = %spec.name, %kind, value = %arg.value, "bound argument");
    Ok(arg)
}

/// Coerces a value to `kind`.
///
/// `format` is the delimiter style of the source token, consulted by
/// [`ArgKind::Code`].
///
/// # Errors
///
/// Returns [`ArgError::TypeCoercion`] carrying the value and `kind`.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{ArgKind, ArgValue, TokenFormat, coerce};
///
/// let raw = ArgValue::from("0x1f");
/// assert_eq!(coerce(&raw, TokenFormat::UnquotedWord, ArgKind::Int).unwrap(), ArgValue::Int(31));
///
/// let code = ArgValue::from("x + 1");
/// assert!(coerce(&code, TokenFormat::InlineCode, ArgKind::Code).is_ok());
/// assert!(coerce(&code, TokenFormat::DoubleQuoted, ArgKind::Code).is_err());
/// ```
pub fn coerce(value: &ArgValue, format: TokenFormat, kind: ArgKind) -> Result<ArgValue> {
    let fail = || ArgError::coercion(value.to_string(), kind);

    match kind {
        ArgKind::Any | ArgKind::String | ArgKind::User => Ok(value.clone()),
        ArgKind::Code => {
            if format.is_code() {
                Ok(value.clone())
            } else {
                Err(fail())
            }
        }
        ArgKind::Boolean => to_boolean(Some(value)).map(ArgValue::Bool),
        ArgKind::Int => parse_int_prefix(&value.to_string())
            .and_then(|n| i64::try_from(n).ok())
            .map(ArgValue::Int)
            .ok_or_else(fail),
        ArgKind::Uint => parse_int_prefix(&value.to_string())
            .and_then(|n| u64::try_from(n).ok())
            .map(ArgValue::Uint)
            .ok_or_else(fail),
        ArgKind::Float => parse_float_prefix(&value.to_string())
            .map(ArgValue::Float)
            .ok_or_else(fail),
    }
}

/// Parses the longest integer prefix: optional sign, then decimal digits or
/// `0x` followed by hex digits.
fn parse_int_prefix(s: &str) -> Option<i128> {
    let s = s.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = i128::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses the longest float prefix: optional sign, digits with an optional
/// fraction and exponent, or `Infinity`.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let sign_len = s.len() - unsigned.len();

    if unsigned.starts_with("Infinity") {
        let negative = s.starts_with('-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let bytes = unsigned.as_bytes();
    let int_digits = count_digits(bytes, 0);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(bytes, end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_digits = count_digits(bytes, exp_start);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    s[..sign_len + end].parse().ok()
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Validator, tokenize};

    fn schema_of(entries: Vec<ArgSpec>) -> ArgSchema {
        ArgSchema::from_entries(entries).unwrap()
    }

    fn bind_str(raw: &str, schema: &ArgSchema) -> Result<Vec<BoundArgument>> {
        bind(&tokenize(raw), schema)
    }

    #[test]
    fn test_uint_coercion() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Uint)]);
        let bound = bind_str("5", &schema).unwrap();
        assert_eq!(bound[0].value, ArgValue::Uint(5));
        assert_eq!(bound[0].name.as_deref(), Some("n"));
        assert_eq!(bound[0].kind, Some(ArgKind::Uint));
    }

    #[test]
    fn test_uint_rejects_negative_and_text() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Uint)]);
        assert_eq!(
            bind_str("-1", &schema).unwrap_err(),
            ArgError::TypeCoercion {
                value: "-1".to_string(),
                kind: ArgKind::Uint,
            }
        );
        assert_eq!(
            bind_str("abc", &schema).unwrap_err(),
            ArgError::TypeCoercion {
                value: "abc".to_string(),
                kind: ArgKind::Uint,
            }
        );
    }

    #[test]
    fn test_uint_accepts_negative_zero() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Uint)]);
        assert_eq!(bind_str("-0", &schema).unwrap()[0].value, ArgValue::Uint(0));
    }

    #[test]
    fn test_int_uses_numeric_prefix() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Int)]);
        assert_eq!(bind_str("-42", &schema).unwrap()[0].value, ArgValue::Int(-42));
        assert_eq!(bind_str("12px", &schema).unwrap()[0].value, ArgValue::Int(12));
        assert_eq!(bind_str("3.9", &schema).unwrap()[0].value, ArgValue::Int(3));
        assert_eq!(bind_str("0xff", &schema).unwrap()[0].value, ArgValue::Int(255));
        assert!(bind_str("px12", &schema).is_err());
        assert!(bind_str("0x", &schema).is_err());
    }

    #[test]
    fn test_int_overflow_is_coercion_error() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Int)]);
        assert!(bind_str("99999999999999999999", &schema).is_err());
    }

    #[test]
    fn test_float_coercion() {
        let schema = schema_of(vec![ArgSpec::required("x", ArgKind::Float)]);
        assert_eq!(bind_str("2.5", &schema).unwrap()[0].value, ArgValue::Float(2.5));
        assert_eq!(bind_str(".5", &schema).unwrap()[0].value, ArgValue::Float(0.5));
        assert_eq!(bind_str("-1e3", &schema).unwrap()[0].value, ArgValue::Float(-1000.0));
        assert_eq!(bind_str("7e", &schema).unwrap()[0].value, ArgValue::Float(7.0));
        assert_eq!(bind_str("1.5kg", &schema).unwrap()[0].value, ArgValue::Float(1.5));
        assert_eq!(
            bind_str("-Infinity", &schema).unwrap()[0].value,
            ArgValue::Float(f64::NEG_INFINITY)
        );
        assert!(bind_str("nan", &schema).is_err());
        assert!(bind_str(".", &schema).is_err());
    }

    #[test]
    fn test_boolean_coercion() {
        let schema = schema_of(vec![ArgSpec::required("b", ArgKind::Boolean)]);
        assert_eq!(bind_str("Yes", &schema).unwrap()[0].value, ArgValue::Bool(true));
        assert_eq!(bind_str("f", &schema).unwrap()[0].value, ArgValue::Bool(false));
        assert!(matches!(
            bind_str("maybe", &schema).unwrap_err(),
            ArgError::TypeCoercion {
                kind: ArgKind::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn test_code_requires_code_format() {
        let schema = schema_of(vec![ArgSpec::required("src", ArgKind::Code)]);
        let bound = bind_str("```rs\nlet a = 1;\n```", &schema).unwrap();
        assert_eq!(bound[0].value, ArgValue::from("let a = 1;"));
        assert_eq!(bound[0].language.as_deref(), Some("rs"));
        assert!(bind_str("`inline`", &schema).is_ok());
        assert!(bind_str("\"quoted\"", &schema).is_err());
        assert!(bind_str("plain", &schema).is_err());
    }

    #[test]
    fn test_entry_without_kind_records_any() {
        let schema = schema_of(vec![ArgSpec::new("free")]);
        let bound = bind_str("'anything at all'", &schema).unwrap();
        assert_eq!(bound[0].kind, Some(ArgKind::Any));
        assert_eq!(bound[0].value, ArgValue::from("anything at all"));
        assert_eq!(bound[0].format, TokenFormat::SingleQuoted);
    }

    #[test]
    fn test_extra_tokens_pass_through() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Int)]);
        let bound = bind_str("1 2 three", &schema).unwrap();
        assert_eq!(bound.len(), 3);
        assert_eq!(bound[1].value, ArgValue::from("2"));
        assert_eq!(bound[1].name, None);
        assert_eq!(bound[1].kind, None);
    }

    #[test]
    fn test_missing_required_is_not_synthesized() {
        let schema = schema_of(vec![
            ArgSpec::required("a", ArgKind::Int),
            ArgSpec::required("b", ArgKind::Int),
        ]);
        let bound = bind_str("1", &schema).unwrap();
        assert_eq!(bound.len(), 1);
    }

    #[test]
    fn test_first_failure_aborts() {
        let schema = schema_of(vec![
            ArgSpec::required("a", ArgKind::Int),
            ArgSpec::required("b", ArgKind::Int),
            ArgSpec::required("c", ArgKind::Boolean),
        ]);
        let err = bind_str("1 x maybe", &schema).unwrap_err();
        assert_eq!(
            err,
            ArgError::TypeCoercion {
                value: "x".to_string(),
                kind: ArgKind::Int,
            }
        );
    }

    #[test]
    fn test_transform_runs_after_coercion() {
        let schema = schema_of(vec![ArgSpec::required("n", ArgKind::Uint).with_transform(
            |arg| match arg.value {
                ArgValue::Uint(n) => ArgValue::Uint(n * 2),
                ref other => other.clone(),
            },
        )]);
        assert_eq!(bind_str("21", &schema).unwrap()[0].value, ArgValue::Uint(42));
    }

    #[test]
    fn test_validator_sees_transformed_value() {
        let schema = schema_of(vec![
            ArgSpec::required("n", ArgKind::Uint)
                .with_transform(|arg| ArgValue::Uint(arg.value.as_u64().unwrap_or(0) * 10))
                .with_validator(Validator::range(None, Some(50.0))),
        ]);
        assert!(bind_str("5", &schema).is_ok());
        assert_eq!(
            bind_str("6", &schema).unwrap_err(),
            ArgError::Validation("\"n\" must be less than or equal to 50".to_string())
        );
    }

    #[test]
    fn test_transform_output_is_not_recoerced() {
        let schema = schema_of(vec![
            ArgSpec::required("n", ArgKind::Uint)
                .with_transform(|arg| ArgValue::Str(format!("#{}", arg.value))),
        ]);
        assert_eq!(bind_str("3", &schema).unwrap()[0].value, ArgValue::from("#3"));
    }

    #[test]
    fn test_custom_validator_message_is_kept() {
        let schema = schema_of(vec![ArgSpec::required("who", ArgKind::User).with_validator(
            Validator::custom(|label, value| {
                if value.as_str().is_some_and(|s| s.starts_with('@')) {
                    Ok(())
                } else {
                    Err(format!("{label} must be a mention"))
                }
            }),
        )]);
        assert!(bind_str("@ferris", &schema).is_ok());
        assert_eq!(
            bind_str("ferris", &schema).unwrap_err(),
            ArgError::Validation("who must be a mention".to_string())
        );
    }

    #[test]
    fn test_rebinding_is_idempotent() {
        let schema = schema_of(vec![
            ArgSpec::required("u", ArgKind::Uint),
            ArgSpec::required("i", ArgKind::Int),
            ArgSpec::required("f", ArgKind::Float),
            ArgSpec::required("b", ArgKind::Boolean),
            ArgSpec::required("c", ArgKind::Code),
            ArgSpec::required("s", ArgKind::String),
        ]);
        let first = bind_str("7 -3 1e3 yes `x` word", &schema).unwrap();
        let second = bind_arguments(first.clone(), &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_infinity_round_trips_through_json() {
        let schema = schema_of(vec![ArgSpec::required("f", ArgKind::Float)]);
        let bound = bind_str("Infinity", &schema).unwrap();

        let json = serde_json::to_string(&bound[0]).unwrap();
        assert!(json.contains(r#""value":"Infinity""#), "got: {json}");

        let back: BoundArgument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bound[0]);
        assert_eq!(back.value, ArgValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_numeric_kinds_round_trip_through_json() {
        let schema = schema_of(vec![
            ArgSpec::required("u", ArgKind::Uint),
            ArgSpec::required("i", ArgKind::Int),
            ArgSpec::required("f", ArgKind::Float),
            ArgSpec::required("s", ArgKind::String),
        ]);
        let bound = bind_str("5 -5 3 \"Infinity\" extra", &schema).unwrap();

        let json = serde_json::to_string(&bound).unwrap();
        let back: Vec<BoundArgument> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bound);
        assert_eq!(back[0].value, ArgValue::Uint(5));
        assert_eq!(back[2].value, ArgValue::Float(3.0));
        assert_eq!(back[3].value, ArgValue::from("Infinity"));
    }

    #[test]
    fn test_transformed_value_of_other_type_is_kept_on_read() {
        let json = r##"{"value":"#42","format":"unquoted_word","name":"n","kind":"uint"}"##;
        let back: BoundArgument = serde_json::from_str(json).unwrap();
        assert_eq!(back.value, ArgValue::from("#42"));
    }

    #[test]
    fn test_float_infinity_rebinds() {
        let schema = schema_of(vec![ArgSpec::required("f", ArgKind::Float)]);
        let first = bind_str("Infinity", &schema).unwrap();
        assert_eq!(bind_arguments(first.clone(), &schema).unwrap(), first);
    }
}
