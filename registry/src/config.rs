//! Declarative command configuration.
//!
//! Defines the YAML-serializable configuration that declares the command
//! prefix, bot administrators, and commands with their argument schemas,
//! guards and sub-commands.
//!
//! # Example YAML
//!
//! ```yaml
//! prefix: "!"
//! admins:
//!   - "1234"
//! commands:
//!   - name: purge
//!     aliases: [clear]
//!     description: Delete recent messages
//!     guards: [admin]
//!     args:
//!       - name: count
//!         kind: uint
//!         required: true
//!         validator:
//!           range: { min: 1, max: 400 }
//!   - name: config
//!     sub_commands:
//!       - name: prefix
//!         args:
//!           - name: value
//!             kind: string
//!             required: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use cmdarg_core::ArgSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::guard::parse_admin_list;
use crate::{
    ADMINS_ENV, CommandDefinition, CommandRegistry, DEFAULT_PREFIX, Disabled, Dispatcher, Guard,
    GuardKind, RequireAdmin,
};

/// One command entry of a [`RegistryConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Primary name.
    pub name: String,
    /// Alternate names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Built-in guards, run in the listed order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<GuardKind>,
    /// Positional arguments.
    #[serde(default, skip_serializing_if = "ArgSchema::is_empty")]
    pub args: ArgSchema,
    /// Nested commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_commands: Vec<CommandConfig>,
}

/// Top-level command configuration.
///
/// Loaded from a YAML file to build a [`CommandRegistry`] or a ready
/// [`Dispatcher`].
///
/// # Examples
///
/// ```
/// use cmdarg_registry::{Invocation, RegistryConfig};
///
/// let yaml = r#"
/// prefix: "?"
/// commands:
///   - name: echo
///     args:
///       - name: text
///         required: true
/// "#;
/// let config = RegistryConfig::from_yaml_str(yaml).unwrap();
/// let dispatcher = config.into_dispatcher().unwrap();
///
/// let dispatch = dispatcher
///     .dispatch(&Invocation::new("1", "?echo 'hi there'"))
///     .unwrap()
///     .unwrap();
/// assert_eq!(dispatch.arguments.get_str("text"), Some("hi there"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Text a message must start with to be treated as a command.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// User ids accepted by the `admin` guard.
    #[serde(default)]
    pub admins: Vec<String>,
    /// Top-level commands.
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            admins: Vec::new(),
            commands: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Loads configuration from a file.
    ///
    /// Files with a `.json` extension are parsed as JSON, everything else as
    /// YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::RegistryError::YamlError) /
    /// [`JsonError`](crate::RegistryError::JsonError) if parsing fails
    /// (including duplicate argument names).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](crate::RegistryError::YamlError) if parsing fails.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](crate::RegistryError::JsonError) if parsing fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::RegistryError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Appends admin ids from the [`ADMINS_ENV`] environment variable.
    pub fn with_env_admins(mut self) -> Self {
        let from_env = parse_admin_list(&std::env::var(ADMINS_ENV).unwrap_or_default());
        self.merge_admins(from_env);
        self
    }

    fn merge_admins(&mut self, ids: Vec<String>) {
        for id in ids {
            if !self.admins.contains(&id) {
                self.admins.push(id);
            }
        }
    }

    /// Returns `true` if `id` is a configured admin.
    pub fn is_admin(&self, id: &str) -> bool {
        self.admins.iter().any(|a| a == id)
    }

    /// Builds a registry from the configured commands.
    ///
    /// # Errors
    ///
    /// Returns any [`CommandRegistry::register`] error.
    pub fn build_registry(&self) -> Result<CommandRegistry> {
        let admin: Arc<dyn Guard> = Arc::new(RequireAdmin::new(self.admins.iter().cloned()));
        let mut registry = CommandRegistry::new();

        for command in &self.commands {
            registry.register(self.definition(command, &admin))?;
        }

        debug!(commands = registry.len(), prefix = %self.prefix, "built registry from config");
        Ok(registry)
    }

    /// Builds a dispatcher using the configured prefix.
    ///
    /// # Errors
    ///
    /// Same as [`build_registry`](RegistryConfig::build_registry).
    pub fn into_dispatcher(self) -> Result<Dispatcher> {
        let registry = self.build_registry()?;
        Ok(Dispatcher::new(self.prefix, registry))
    }

    fn definition(&self, command: &CommandConfig, admin: &Arc<dyn Guard>) -> CommandDefinition {
        let mut def = CommandDefinition::new(&command.name).with_schema(command.args.clone());
        def.description = command.description.clone();

        for alias in &command.aliases {
            def = def.with_alias(alias);
        }

        for guard in &command.guards {
            def = match guard {
                GuardKind::Admin => def.with_guard(Arc::clone(admin)),
                GuardKind::Disabled => def.with_guard(Arc::new(Disabled)),
            };
        }

        for sub in &command.sub_commands {
            def = def.with_sub_command(self.definition(sub, admin));
        }

        def
    }
}
