//! Command definitions, guards and message dispatch on top of
//! [`cmdarg_core`].
//!
//! - [`CommandDefinition`] declares a command's name, aliases, argument
//!   schema, guards and sub-commands.
//! - [`CommandRegistry`] holds top-level commands and rejects name
//!   collisions and invalid schemas at registration.
//! - [`Dispatcher`] strips the prefix from a message, resolves the command
//!   path, runs guards and binds the remaining text.
//! - [`RegistryConfig`] loads all of the above from YAML.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cmdarg_core::{ArgKind, ArgSpec, Validator};
//! use cmdarg_registry::*;
//!
//! let purge = CommandDefinition::new("purge")
//!     .with_arg(
//!         ArgSpec::required("count", ArgKind::Uint)
//!             .with_validator(Validator::range(Some(1.0), Some(400.0))),
//!     )
//!     .unwrap()
//!     .with_guard(Arc::new(RequireAdmin::new(["42"])));
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(purge).unwrap();
//! let dispatcher = Dispatcher::new(DEFAULT_PREFIX, registry);
//!
//! let dispatch = dispatcher
//!     .dispatch(&Invocation::new("42", "!purge 25"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(dispatch.arguments.get_u64("count"), Some(25));
//!
//! let denied = dispatcher.dispatch(&Invocation::new("7", "!purge 25"));
//! assert!(matches!(denied, Err(RegistryError::GuardRejected { .. })));
//! ```

mod command;
mod config;
mod dispatch;
mod error;
mod guard;
mod merge;
mod registry;

pub use command::CommandDefinition;
pub use config::{CommandConfig, RegistryConfig};
pub use dispatch::{DEFAULT_PREFIX, Dispatch, Dispatcher};
pub use error::{RegistryError, Result};
pub use guard::{ADMINS_ENV, Disabled, Guard, GuardKind, Invocation, RequireAdmin};
pub use merge::{MergeStrategy, merge_definitions};
pub use registry::CommandRegistry;
