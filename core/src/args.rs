//! Parsed argument sets: a positional cursor and named lookup.
//!
//! [`ArgumentSet`] is created once per incoming command string and read
//! through a private cursor. [`BoundArguments`] adds the result of binding
//! the same tokens against a schema, so arguments can also be fetched by
//! name.

use std::fmt;

use crate::error::Result;
use crate::{ArgSchema, ArgValue, BoundArgument, Token, bind, tokenize};

/// Tokenized arguments with a read cursor.
///
/// Only [`next`](ArgumentSet::next) and
/// [`set_index`](ArgumentSet::set_index) move the cursor. Every other read
/// leaves it where it is.
///
/// # Examples
///
/// ```
/// use cmdarg_core::ArgumentSet;
///
/// let mut args = ArgumentSet::parse("ban @ferris \"being too cute\"");
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.peek().unwrap().value, "ban");
/// assert_eq!(args.next().unwrap().value, "ban");
/// assert_eq!(args.prev().unwrap().value, "ban");
///
/// let rest: Vec<_> = args.rest().iter().map(|t| t.value.as_str()).collect();
/// assert_eq!(rest, vec!["@ferris", "being too cute"]);
/// assert_eq!(args.index(), 1);
/// assert_eq!(args.to_string(), "ban @ferris \"being too cute\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSet {
    raw: String,
    tokens: Vec<Token>,
    index: usize,
}

impl ArgumentSet {
    /// Tokenizes `raw` and positions the cursor at the first token.
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tokens: tokenize(raw),
            index: 0,
        }
    }

    /// Returns the token at the cursor without advancing.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Returns the token at the cursor and advances past it.
    ///
    /// At the end this returns `None` and leaves the cursor alone.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    /// Returns the token just before the cursor.
    pub fn prev(&self) -> Option<&Token> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    /// Returns the token at absolute position `n`, ignoring the cursor.
    pub fn nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(n)
    }

    /// Returns every token from the cursor to the end without advancing.
    pub fn rest(&self) -> &[Token] {
        self.tokens.get(self.index..).unwrap_or_default()
    }

    /// Moves the cursor to `n`.
    pub fn set_index(&mut self, n: usize) -> &mut Self {
        self.index = n;
        self
    }

    /// Returns the cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the total number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when the raw text held no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns all tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the raw, unparsed text.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ArgumentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Tokenized arguments bound against a schema.
///
/// Keeps the positional [`ArgumentSet`] for cursor reads and the bound
/// arguments for lookup by name.
///
/// # Examples
///
/// ```
/// use cmdarg_core::*;
///
/// let schema = ArgSchema::from_entries([
///     ArgSpec::required("count", ArgKind::Uint),
///     ArgSpec::optional("silent", ArgKind::Boolean),
/// ])
/// .unwrap();
///
/// let args = BoundArguments::parse("20 no", &schema).unwrap();
/// assert_eq!(args.get_u64("count"), Some(20));
/// assert_eq!(args.get_bool("silent"), Some(false));
/// assert!(args.get("missing").is_none());
/// assert_eq!(args.cursor().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    args: ArgumentSet,
    bound: Vec<BoundArgument>,
}

impl BoundArguments {
    /// Tokenizes `raw` and binds the tokens against `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first coercion or validation error from [`bind`].
    pub fn parse(raw: &str, schema: &ArgSchema) -> Result<Self> {
        let args = ArgumentSet::parse(raw);
        let bound = bind(args.tokens(), schema)?;
        Ok(Self { args, bound })
    }

    /// Finds the argument bound to the named schema entry.
    pub fn get(&self, name: &str) -> Option<&BoundArgument> {
        self.bound.iter().find(|a| a.name.as_deref() == Some(name))
    }

    /// Returns the value of the named argument.
    pub fn value(&self, name: &str) -> Option<&ArgValue> {
        self.get(name).map(|a| &a.value)
    }

    /// Returns the named argument as a string slice.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(ArgValue::as_str)
    }

    /// Returns the named argument as `i64`.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(ArgValue::as_i64)
    }

    /// Returns the named argument as `u64`.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.value(name).and_then(ArgValue::as_u64)
    }

    /// Returns the named argument as `f64`.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(ArgValue::as_f64)
    }

    /// Returns the named argument as `bool`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(ArgValue::as_bool)
    }

    /// Returns all bound arguments in input order.
    pub fn bound(&self) -> &[BoundArgument] {
        &self.bound
    }

    /// Returns the positional cursor.
    pub fn cursor(&self) -> &ArgumentSet {
        &self.args
    }

    /// Returns the positional cursor for sequential reads.
    pub fn cursor_mut(&mut self) -> &mut ArgumentSet {
        &mut self.args
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns `true` when there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl fmt::Display for BoundArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.args, f)
    }
}
