//! Top-level command lookup.

use std::collections::HashSet;

use cmdarg_core::validate_schema;
use tracing::info;

use crate::error::{RegistryError, Result};
use crate::CommandDefinition;

/// Collection of top-level commands addressable by name or alias.
///
/// # Examples
///
/// ```
/// use cmdarg_registry::{CommandDefinition, CommandRegistry};
///
/// let mut registry = CommandRegistry::new();
/// registry
///     .register(CommandDefinition::new("ping").with_alias("p"))
///     .unwrap();
///
/// assert_eq!(registry.get("p").unwrap().name, "ping");
/// assert!(registry.get("pong").is_none());
/// assert!(registry.register(CommandDefinition::new("p")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command.
    ///
    /// The definition and all of its sub-commands must have valid schemas.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnnamedCommand`] for an empty name,
    /// [`RegistryError::DuplicateCommand`] when a name or alias is already
    /// taken (at the top level, or among sibling sub-commands, reported as
    /// the full path to the word), or [`RegistryError::InvalidSchema`] when a
    /// schema fails [`validate_schema`].
    pub fn register(&mut self, command: CommandDefinition) -> Result<&mut Self> {
        if command.name.trim().is_empty() {
            return Err(RegistryError::UnnamedCommand);
        }

        if let Some(taken) = command.names().find(|word| self.get(word).is_some()) {
            return Err(RegistryError::DuplicateCommand(taken.to_string()));
        }

        validate_definition(&command, &mut Vec::new())?;

        info!(command = %command.name, aliases = command.aliases.len(), "registered command");
        self.commands.push(command);
        Ok(self)
    }

    /// Finds a top-level command by name or alias.
    pub fn get(&self, word: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|c| c.matches(word))
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates over commands in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandDefinition> {
        self.commands.iter()
    }

    /// Returns the primary names of all commands.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }
}

fn validate_definition(command: &CommandDefinition, path: &mut Vec<String>) -> Result<()> {
    path.push(command.name.clone());

    let errors = validate_schema(command.schema.entries());
    if !errors.is_empty() {
        return Err(RegistryError::InvalidSchema {
            command: path.join(" "),
            errors,
        });
    }

    let mut siblings = HashSet::new();
    for sub in &command.sub_commands {
        if sub.name.trim().is_empty() {
            return Err(RegistryError::UnnamedCommand);
        }
        if let Some(taken) = sub.names().find(|word| !siblings.insert(*word)) {
            return Err(RegistryError::DuplicateCommand(format!("{} {taken}", path.join(" "))));
        }
        validate_definition(sub, path)?;
    }

    path.pop();
    Ok(())
}
