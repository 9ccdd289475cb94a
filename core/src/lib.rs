//! Argument tokenizing, typed binding and cursor reads for chat-style
//! commands.
//!
//! This crate turns the argument text of one command invocation into
//! structured values:
//!
//! - [`tokenize`] splits raw text into [`Token`]s, recognizing quoted
//!   strings, fenced code blocks with an optional language tag, inline code
//!   spans and bare words.
//! - [`ArgSchema`] is an ordered list of [`ArgSpec`] entries describing the
//!   expected positional arguments and their [`ArgKind`].
//! - [`bind`] pairs tokens with schema entries, coercing, transforming and
//!   validating each one into a [`BoundArgument`].
//! - [`ArgumentSet`] reads tokens through a cursor, and [`BoundArguments`]
//!   adds lookup by name.
//!
//! Validation ([`validate_schema`]) catches structural schema errors such as
//! duplicate names and malformed validators.
//!
//! # Example
//!
//! ```
//! use cmdarg_core::*;
//!
//! let schema = ArgSchema::new()
//!     .with_arg(ArgSpec::required("count", ArgKind::Uint)
//!         .with_validator(Validator::range(None, Some(100.0))))
//!     .unwrap()
//!     .with_arg(ArgSpec::optional("snippet", ArgKind::Code))
//!     .unwrap();
//!
//! let args = BoundArguments::parse("42 ```rust\nfn main() {}\n```", &schema).unwrap();
//! assert_eq!(args.get_u64("count"), Some(42));
//!
//! let snippet = args.get("snippet").unwrap();
//! assert_eq!(snippet.language.as_deref(), Some("rust"));
//! assert_eq!(snippet.value, ArgValue::from("fn main() {}"));
//! ```

mod args;
mod bind;
mod boolean;
mod error;
mod lexer;
mod token;
mod types;
mod validate;

pub use args::{ArgumentSet, BoundArguments};
pub use bind::{BoundArgument, bind, bind_arguments, coerce};
pub use boolean::to_boolean;
pub use error::{ArgError, Result};
pub use lexer::tokenize;
pub use token::{Token, TokenFormat};
pub use types::*;
pub use validate::{SchemaError, validate_schema};
