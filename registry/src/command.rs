//! Command definitions.
//!
//! A [`CommandDefinition`] declares everything the dispatcher needs about a
//! command: how it is addressed, which arguments it takes, which guards
//! protect it and which sub-commands it groups. Definitions are built once
//! and then only read.

use std::sync::Arc;

use cmdarg_core::{ArgSchema, ArgSpec};

use crate::Guard;

/// Declarative description of a command.
///
/// Guards and sub-commands have set semantics: adding a guard whose name is
/// already present, or a sub-command whose name is already present, is a
/// no-op. Use [`merge_definitions`](crate::merge_definitions) to combine
/// two definitions of the same command.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cmdarg_core::{ArgKind, ArgSpec};
/// use cmdarg_registry::{CommandDefinition, RequireAdmin};
///
/// let purge = CommandDefinition::new("purge")
///     .with_alias("clear")
///     .with_description("Delete recent messages")
///     .with_arg(ArgSpec::required("count", ArgKind::Uint))
///     .unwrap()
///     .with_guard(Arc::new(RequireAdmin::new(["42"])))
///     .with_sub_command(CommandDefinition::new("bots"));
///
/// assert!(purge.matches("clear"));
/// assert_eq!(purge.guard_names(), vec!["admin"]);
/// assert!(purge.find_sub_command("bots").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandDefinition {
    /// Primary name.
    pub name: String,
    /// Alternate names.
    pub aliases: Vec<String>,
    /// Help text.
    pub description: Option<String>,
    /// Positional argument schema.
    pub schema: ArgSchema,
    /// Checks run, in order, before the command executes.
    pub guards: Vec<Arc<dyn Guard>>,
    /// Nested commands, addressed by the next word after this one.
    pub sub_commands: Vec<CommandDefinition>,
}

impl CommandDefinition {
    /// Creates a definition with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        if !self.aliases.iter().any(|a| a == alias) {
            self.aliases.push(alias.to_string());
        }
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends a positional argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::DuplicateSchemaName`](cmdarg_core::ArgError::DuplicateSchemaName)
    /// when the name is already declared.
    pub fn with_arg(mut self, spec: ArgSpec) -> cmdarg_core::Result<Self> {
        self.schema.push(spec)?;
        Ok(self)
    }

    /// Replaces the whole argument schema.
    pub fn with_schema(mut self, schema: ArgSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Adds a guard unless one with the same name is present.
    pub fn with_guard(mut self, guard: Arc<dyn Guard>) -> Self {
        if !self.has_guard(guard.name()) {
            self.guards.push(guard);
        }
        self
    }

    /// Adds a sub-command unless one with the same name is present.
    ///
    /// Aliases are not compared here; a sibling alias collision is rejected
    /// when the command is registered.
    pub fn with_sub_command(mut self, sub: CommandDefinition) -> Self {
        if self.find_sub_command(&sub.name).is_none() {
            self.sub_commands.push(sub);
        }
        self
    }

    /// Returns `true` if `word` is the name or one of the aliases.
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|a| a == word)
    }

    /// Finds a direct sub-command by name or alias.
    pub fn find_sub_command(&self, word: &str) -> Option<&CommandDefinition> {
        self.sub_commands.iter().find(|s| s.matches(word))
    }

    /// Returns `true` if a guard with this name is attached.
    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.iter().any(|g| g.name() == name)
    }

    /// Returns the guard names in execution order.
    pub fn guard_names(&self) -> Vec<&str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    /// Returns the name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
