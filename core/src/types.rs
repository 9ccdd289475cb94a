//! Argument schema type definitions.
//!
//! An [`ArgSchema`] is an ordered list of [`ArgSpec`] entries. Entry `i`
//! describes the `i`-th token of a command's argument text: its name, the
//! [`ArgKind`] it is coerced to, and optional transform and validation
//! steps. Schemas serialize as a plain list of entries so they can be kept in
//! YAML or JSON files; transforms and custom validators are code-only.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ArgError, Result};
use crate::BoundArgument;

/// Kind an argument is coerced to during binding.
///
/// # Examples
///
/// ```
/// use cmdarg_core::ArgKind;
///
/// assert_eq!(ArgKind::default(), ArgKind::Any);
/// assert_eq!(ArgKind::Uint.to_string(), "UINT");
/// assert!(ArgKind::Float.is_numeric());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// Anything, no coercion (the default).
    #[default]
    Any,
    /// `y`/`yes`/`t`/`true`/`1` or `n`/`no`/`f`/`false`/`0`.
    Boolean,
    /// Text taken from an inline code span or a fenced code block.
    Code,
    /// Any string.
    String,
    /// Floating point number.
    Float,
    /// Positive or negative whole number.
    Int,
    /// Non-negative whole number.
    Uint,
    /// A user identifier, kept as a string.
    User,
}

impl ArgKind {
    /// Returns `true` for `Float`, `Int` and `Uint`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Int | Self::Uint)
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "ANY",
            Self::Boolean => "BOOLEAN",
            Self::Code => "CODE",
            Self::String => "STRING",
            Self::Float => "FLOAT",
            Self::Int => "INT",
            Self::Uint => "UINT",
            Self::User => "USER",
        };
        f.write_str(name)
    }
}

/// Runtime value of a bound argument.
///
/// Tokens start out as [`ArgValue::Str`]; binding replaces the value with
/// the variant matching the declared [`ArgKind`].
///
/// Values serialize as plain JSON/YAML scalars. Infinite floats serialize as
/// the strings `"Infinity"` and `"-Infinity"`; a
/// [`BoundArgument`](crate::BoundArgument) restores them (and integer
/// variants) from its declared kind when deserialized.
///
/// # Examples
///
/// ```
/// use cmdarg_core::ArgValue;
///
/// let value = ArgValue::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// assert_eq!(ArgValue::Uint(7).as_f64(), Some(7.0));
/// assert_eq!(ArgValue::Bool(true).to_string(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(#[serde(serialize_with = "serialize_float")] f64),
    /// Raw or transformed text.
    Str(String),
}

impl ArgValue {
    /// Returns the text of a [`ArgValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as `i64` when it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(n) => Some(n),
            Self::Uint(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Returns the value as `u64` when it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Int(n) => u64::try_from(n).ok(),
            Self::Uint(n) => Some(n),
            _ => None,
        }
    }

    /// Returns any numeric value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(n) => Some(n as f64),
            Self::Uint(n) => Some(n as f64),
            Self::Float(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value of a [`ArgValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

fn serialize_float<S: Serializer>(n: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if n.is_finite() {
        serializer.serialize_f64(*n)
    } else {
        serializer.collect_str(&ArgValue::Float(*n))
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Regular expression source, compiled on first use and then reused.
///
/// Serializes as the plain source string.
///
/// # Examples
///
/// ```
/// use cmdarg_core::Pattern;
///
/// let digits = Pattern::new(r"^\d+$");
/// assert!(digits.regex().unwrap().is_match("42"));
/// assert!(Pattern::new("(").regex().is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: OnceLock<std::result::Result<Regex, regex::Error>>,
}

impl Pattern {
    /// Wraps a pattern source without compiling it.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    /// Returns the pattern source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the compiled regex, compiling it on the first call.
    ///
    /// # Errors
    ///
    /// Returns the compiler error when the source is not a valid regex.
    pub fn regex(&self) -> std::result::Result<&Regex, &regex::Error> {
        self.compiled
            .get_or_init(|| Regex::new(&self.source))
            .as_ref()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.source, f)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

/// Signature of a [`Validator::Custom`] check: `(label, value)`.
pub type CheckFn = dyn Fn(&str, &ArgValue) -> std::result::Result<(), String> + Send + Sync;

/// Validation applied to a bound value after coercion and transform.
///
/// Failure messages are labeled with the argument name.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{ArgValue, Validator};
///
/// let range = Validator::range(Some(0.0), Some(400.0));
/// assert!(range.check("count", &ArgValue::Uint(10)).is_ok());
///
/// let err = range.check("count", &ArgValue::Uint(500)).unwrap_err();
/// assert_eq!(err.to_string(), "\"count\" must be less than or equal to 400");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Inclusive numeric bounds.
    Range {
        /// Lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Inclusive bounds on the character count of a string value.
    Length {
        /// Minimum number of characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        /// Maximum number of characters.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    /// Regular expression the rendered value must match.
    Pattern(Pattern),
    /// The rendered value must equal one of these choices.
    OneOf(Vec<String>),
    /// Arbitrary check supplied in code.
    #[serde(skip)]
    Custom(Arc<CheckFn>),
}

impl Validator {
    /// Creates an inclusive numeric range validator.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range { min, max }
    }

    /// Creates a string length validator.
    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self::Length { min, max }
    }

    /// Creates a regular expression validator.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(Pattern::new(pattern))
    }

    /// Creates a choice validator.
    pub fn one_of<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(choices.into_iter().map(Into::into).collect())
    }

    /// Creates a validator from a closure returning an error message.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdarg_core::{ArgValue, Validator};
    ///
    /// let even = Validator::custom(|label, value| match value.as_i64() {
    ///     Some(n) if n % 2 == 0 => Ok(()),
    ///     _ => Err(format!("\"{label}\" must be even")),
    /// });
    /// assert!(even.check("n", &ArgValue::Int(4)).is_ok());
    /// assert!(even.check("n", &ArgValue::Int(3)).is_err());
    /// ```
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&str, &ArgValue) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(check))
    }

    /// Runs the validator against `value`, labeling failures with `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::Validation`] with a labeled message when the
    /// value is rejected.
    pub fn check(&self, label: &str, value: &ArgValue) -> Result<()> {
        match self {
            Self::Range { min, max } => {
                let Some(n) = value.as_f64() else {
                    return Err(invalid(format!("\"{label}\" must be a number")));
                };
                if let Some(min) = min.filter(|min| n < *min) {
                    return Err(invalid(format!(
                        "\"{label}\" must be greater than or equal to {min}"
                    )));
                }
                if let Some(max) = max.filter(|max| n > *max) {
                    return Err(invalid(format!(
                        "\"{label}\" must be less than or equal to {max}"
                    )));
                }
                Ok(())
            }
            Self::Length { min, max } => {
                let Some(s) = value.as_str() else {
                    return Err(invalid(format!("\"{label}\" must be a string")));
                };
                let len = s.chars().count();
                if let Some(min) = min.filter(|min| len < *min) {
                    return Err(invalid(format!(
                        "\"{label}\" length must be at least {min} characters long"
                    )));
                }
                if let Some(max) = max.filter(|max| len > *max) {
                    return Err(invalid(format!(
                        "\"{label}\" length must be less than or equal to {max} characters long"
                    )));
                }
                Ok(())
            }
            Self::Pattern(pattern) => {
                let re = pattern
                    .regex()
                    .map_err(|err| invalid(format!("\"{label}\" has an invalid pattern: {err}")))?;
                let rendered = value.to_string();
                if re.is_match(&rendered) {
                    Ok(())
                } else {
                    Err(invalid(format!(
                        "\"{label}\" with value \"{rendered}\" fails to match the required pattern: {pattern}"
                    )))
                }
            }
            Self::OneOf(choices) => {
                let rendered = value.to_string();
                if choices.iter().any(|choice| *choice == rendered) {
                    Ok(())
                } else {
                    Err(invalid(format!(
                        "\"{label}\" must be one of [{}]",
                        choices.join(", ")
                    )))
                }
            }
            Self::Custom(check) => check(label, value).map_err(ArgError::Validation),
        }
    }
}

fn invalid(message: String) -> ArgError {
    ArgError::Validation(message)
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Length { min, max } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::OneOf(choices) => f.debug_tuple("OneOf").field(choices).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Function replacing a bound argument's value after coercion.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&BoundArgument) -> ArgValue + Send + Sync>);

impl Transform {
    /// Wraps a closure as a transform.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&BoundArgument) -> ArgValue + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Applies the transform.
    pub fn apply(&self, arg: &BoundArgument) -> ArgValue {
        (self.0)(arg)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Schema entry for one positional argument.
///
/// Use [`required`](ArgSpec::required), [`optional`](ArgSpec::optional) or
/// [`new`](ArgSpec::new), then chain builder methods.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{ArgKind, ArgSpec, Validator};
///
/// let count = ArgSpec::required("count", ArgKind::Uint)
///     .with_validator(Validator::range(None, Some(400.0)))
///     .with_description("How many messages to delete");
/// assert!(count.required);
/// assert_eq!(count.kind, Some(ArgKind::Uint));
///
/// let any = ArgSpec::new("rest");
/// assert!(any.kind.is_none());
/// assert!(!any.required);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Argument name, unique within a schema.
    pub name: String,
    /// Kind to coerce to. `None` behaves like [`ArgKind::Any`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ArgKind>,
    /// Check run against the final value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    /// Replaces the value after coercion, before validation.
    #[serde(skip)]
    pub transform: Option<Transform>,
    /// Whether a dispatcher must see a token at this position.
    #[serde(default)]
    pub required: bool,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgSpec {
    /// Creates an optional entry with no declared kind.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Creates a required entry of the given kind.
    pub fn required(name: &str, kind: ArgKind) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind),
            required: true,
            ..Default::default()
        }
    }

    /// Creates an optional entry of the given kind.
    pub fn optional(name: &str, kind: ArgKind) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Sets the validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the transform.
    pub fn with_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoundArgument) -> ArgValue + Send + Sync + 'static,
    {
        self.transform = Some(Transform::new(f));
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Ordered list of schema entries with unique names.
///
/// Entry order defines positional binding. Construction and
/// deserialization both reject duplicate names.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{ArgError, ArgKind, ArgSchema, ArgSpec};
///
/// let schema = ArgSchema::new()
///     .with_arg(ArgSpec::required("user", ArgKind::User))
///     .unwrap()
///     .with_arg(ArgSpec::optional("reason", ArgKind::String))
///     .unwrap();
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.position("reason"), Some(1));
///
/// let err = schema.with_arg(ArgSpec::new("user")).unwrap_err();
/// assert_eq!(err, ArgError::DuplicateSchemaName("user".into()));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ArgSpec>", into = "Vec<ArgSpec>")]
pub struct ArgSchema {
    entries: Vec<ArgSpec>,
}

impl ArgSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from entries, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::DuplicateSchemaName`] for the first repeated name.
    pub fn from_entries(entries: impl IntoIterator<Item = ArgSpec>) -> Result<Self> {
        entries
            .into_iter()
            .try_fold(Self::new(), |schema, entry| schema.with_arg(entry))
    }

    /// Appends an entry, consuming and returning the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::DuplicateSchemaName`] when the name is taken.
    pub fn with_arg(mut self, spec: ArgSpec) -> Result<Self> {
        self.push(spec)?;
        Ok(self)
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::DuplicateSchemaName`] when the name is taken.
    pub fn push(&mut self, spec: ArgSpec) -> Result<()> {
        if self.get(&spec.name).is_some() {
            return Err(ArgError::DuplicateSchemaName(spec.name));
        }
        self.entries.push(spec);
        Ok(())
    }

    /// Finds an entry by name.
    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Returns the positional index of the named entry.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Returns the entry bound to position `index`.
    pub fn at(&self, index: usize) -> Option<&ArgSpec> {
        self.entries.get(index)
    }

    /// Returns all entries in positional order.
    pub fn entries(&self) -> &[ArgSpec] {
        &self.entries
    }

    /// Iterates over entries in positional order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArgSpec> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the schema declares no arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the names of required entries, in order.
    pub fn required_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.required)
            .map(|e| e.name.as_str())
            .collect()
    }
}

impl TryFrom<Vec<ArgSpec>> for ArgSchema {
    type Error = ArgError;

    fn try_from(entries: Vec<ArgSpec>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<ArgSchema> for Vec<ArgSpec> {
    fn from(schema: ArgSchema) -> Self {
        schema.entries
    }
}

impl<'a> IntoIterator for &'a ArgSchema {
    type Item = &'a ArgSpec;
    type IntoIter = std::slice::Iter<'a, ArgSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
