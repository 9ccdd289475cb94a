//! Composition of command definitions.
//!
//! When a command is assembled from several pieces (a shared base plus a
//! specialization, or a library definition plus local additions),
//! [`merge_definitions`] combines them into a single definition using a
//! [`MergeStrategy`] to resolve conflicts.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cmdarg_core::{ArgKind, ArgSpec};
//! use cmdarg_registry::*;
//!
//! let base = CommandDefinition::new("config").with_guard(Arc::new(RequireAdmin::new(["1"])));
//! let overlay = CommandDefinition::new("config")
//!     .with_guard(Arc::new(Disabled))
//!     .with_arg(ArgSpec::required("key", ArgKind::String))
//!     .unwrap();
//!
//! let merged = merge_definitions(&base, &overlay, MergeStrategy::Union).unwrap();
//! assert_eq!(merged.guard_names(), vec!["admin", "disabled"]);
//! assert_eq!(merged.schema.len(), 1);
//! ```

use cmdarg_core::{ArgError, ArgSchema};

use crate::CommandDefinition;

/// Definition merge behavior.
///
/// Controls how conflicts between a base and an overlay definition are
/// resolved.
///
/// # Examples
///
/// ```
/// use cmdarg_registry::*;
///
/// let base = CommandDefinition::new("ping").with_description("base desc");
/// let overlay = CommandDefinition::new("ping").with_description("overlay desc");
///
/// let m1 = merge_definitions(&base, &overlay, MergeStrategy::PreferBase).unwrap();
/// assert_eq!(m1.description.as_deref(), Some("base desc"));
///
/// let m2 = merge_definitions(&base, &overlay, MergeStrategy::PreferOverlay).unwrap();
/// assert_eq!(m2.description.as_deref(), Some("overlay desc"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep base values when conflicts occur.
    PreferBase,
    /// Keep overlay values when conflicts occur.
    PreferOverlay,
    /// Combine both; a schema entry declared on both sides is an error.
    Union,
}

/// Merges two command definitions into one.
///
/// Aliases and guards are unioned, base first. Sub-commands with the same
/// name are merged recursively. Schema entries keep base order followed by
/// new overlay entries; an entry name present on both sides is resolved by
/// `strategy`.
///
/// # Errors
///
/// Returns [`ArgError::DuplicateSchemaName`] under [`MergeStrategy::Union`]
/// when both sides declare the same argument name.
pub fn merge_definitions(
    base: &CommandDefinition,
    overlay: &CommandDefinition,
    strategy: MergeStrategy,
) -> Result<CommandDefinition, ArgError> {
    let mut merged = base.clone();

    if merged.name.is_empty() {
        merged.name = overlay.name.clone();
    }

    merged.description = match strategy {
        MergeStrategy::PreferBase => base
            .description
            .clone()
            .or_else(|| overlay.description.clone()),
        MergeStrategy::PreferOverlay | MergeStrategy::Union => overlay
            .description
            .clone()
            .or_else(|| base.description.clone()),
    };

    for alias in &overlay.aliases {
        if !merged.aliases.contains(alias) {
            merged.aliases.push(alias.clone());
        }
    }

    for guard in &overlay.guards {
        if !merged.has_guard(guard.name()) {
            merged.guards.push(guard.clone());
        }
    }

    merged.schema = merge_schemas(&base.schema, &overlay.schema, strategy)?;
    merged.sub_commands = merge_sub_commands(&base.sub_commands, &overlay.sub_commands, strategy)?;

    Ok(merged)
}

fn merge_schemas(
    base: &ArgSchema,
    overlay: &ArgSchema,
    strategy: MergeStrategy,
) -> Result<ArgSchema, ArgError> {
    let mut entries = base.entries().to_vec();

    for spec in overlay {
        match entries.iter().position(|e| e.name == spec.name) {
            Some(index) => match strategy {
                MergeStrategy::PreferBase => {}
                MergeStrategy::PreferOverlay => entries[index] = spec.clone(),
                MergeStrategy::Union => {
                    return Err(ArgError::DuplicateSchemaName(spec.name.clone()));
                }
            },
            None => entries.push(spec.clone()),
        }
    }

    ArgSchema::from_entries(entries)
}

fn merge_sub_commands(
    base: &[CommandDefinition],
    overlay: &[CommandDefinition],
    strategy: MergeStrategy,
) -> Result<Vec<CommandDefinition>, ArgError> {
    let mut merged = base.to_vec();

    for sub in overlay {
        match merged.iter_mut().find(|s| s.name == sub.name) {
            Some(existing) => *existing = merge_definitions(existing, sub, strategy)?,
            None => merged.push(sub.clone()),
        }
    }

    Ok(merged)
}
