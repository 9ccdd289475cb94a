//! Message dispatch: prefix stripping, command resolution, guards and
//! argument binding.
//!
//! Dispatching a message walks these steps and stops at the first failure:
//!
//! 1. strip the configured prefix (no prefix means the message is not a
//!    command)
//! 2. resolve the first word as a command name or alias
//! 3. run that command's guards
//! 4. while the next word names a sub-command, descend into it and run its
//!    guards
//! 5. bind the remaining text against the resolved command's schema and
//!    check that every required argument received a token

use cmdarg_core::BoundArguments;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::{CommandDefinition, CommandRegistry, Invocation};

/// Default command prefix.
pub const DEFAULT_PREFIX: &str = "!";

/// A resolved command invocation.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Primary names from the top-level command down to the resolved
    /// sub-command.
    pub path: Vec<String>,
    /// Arguments bound against the resolved command's schema.
    pub arguments: BoundArguments,
}

impl Dispatch {
    /// Returns the command path joined by spaces.
    pub fn command_path(&self) -> String {
        self.path.join(" ")
    }
}

/// Routes messages to registered commands.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{ArgKind, ArgSpec};
/// use cmdarg_registry::*;
///
/// let mut registry = CommandRegistry::new();
/// registry
///     .register(
///         CommandDefinition::new("roll")
///             .with_arg(ArgSpec::required("sides", ArgKind::Uint))
///             .unwrap(),
///     )
///     .unwrap();
///
/// let dispatcher = Dispatcher::new("!", registry);
/// let dispatch = dispatcher
///     .dispatch(&Invocation::new("1", "!roll 20"))
///     .unwrap()
///     .unwrap();
/// assert_eq!(dispatch.command_path(), "roll");
/// assert_eq!(dispatch.arguments.get_u64("sides"), Some(20));
///
/// // Not a command
/// assert!(dispatcher.dispatch(&Invocation::new("1", "hello")).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    prefix: String,
    registry: CommandRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher for `registry` using `prefix`.
    pub fn new(prefix: impl Into<String>, registry: CommandRegistry) -> Self {
        Self {
            prefix: prefix.into(),
            registry,
        }
    }

    /// Returns the command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Resolves and binds a message.
    ///
    /// Returns `Ok(None)` when the message does not start with the prefix or
    /// has nothing after it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCommand`],
    /// [`RegistryError::GuardRejected`], [`RegistryError::Argument`] for
    /// binding failures, or [`RegistryError::MissingArgument`].
    pub fn dispatch(&self, invocation: &Invocation) -> Result<Option<Dispatch>> {
        let Some(body) = invocation.content.trim_start().strip_prefix(&self.prefix) else {
            return Ok(None);
        };

        let (word, mut rest) = split_word(body);
        if word.is_empty() {
            return Ok(None);
        }

        let mut command = self
            .registry
            .get(word)
            .ok_or_else(|| RegistryError::UnknownCommand(word.to_string()))?;
        let mut path = vec![command.name.clone()];
        run_guards(command, invocation, &path)?;

        loop {
            let (next, remaining) = split_word(rest);
            let Some(sub) = command.find_sub_command(next).filter(|_| !next.is_empty()) else {
                break;
            };
            path.push(sub.name.clone());
            run_guards(sub, invocation, &path)?;
            command = sub;
            rest = remaining;
        }

        debug!(command = %path.join(" "), args = rest.trim(), "resolved command");
        let arguments = BoundArguments::parse(rest.trim_start(), &command.schema)?;

        if let Some(missing) = command.schema.iter().skip(arguments.len()).find(|s| s.required) {
            return Err(RegistryError::MissingArgument {
                command: path.join(" "),
                name: missing.name.clone(),
            });
        }

        info!(command = %path.join(" "), author = %invocation.author_id, "dispatched command");
        Ok(Some(Dispatch { path, arguments }))
    }
}

fn run_guards(command: &CommandDefinition, invocation: &Invocation, path: &[String]) -> Result<()> {
    match command.guards.iter().find(|g| !g.check(invocation)) {
        Some(guard) => {
            warn!(
                command = %path.join(" "),
                guard = guard.name(),
                author = %invocation.author_id,
                "guard rejected invocation"
            );
            Err(RegistryError::GuardRejected {
                command: path.join(" "),
                guard: guard.name().to_string(),
            })
        }
        None => Ok(()),
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    s.split_at(end)
}
