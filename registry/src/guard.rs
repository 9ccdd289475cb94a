//! Pre-execution permission checks.
//!
//! A [`Guard`] runs before a command executes. For a sub-command path
//! `a -> b -> c`, every guard of `a` must pass before `b` is considered, and
//! so on down the path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable holding a comma-separated list of admin user ids.
pub const ADMINS_ENV: &str = "admins";

/// The message being dispatched and who sent it.
///
/// # Examples
///
/// ```
/// use cmdarg_registry::Invocation;
///
/// let inv = Invocation::new("1234", "!ping");
/// assert_eq!(inv.author_id, "1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Platform id of the message author.
    pub author_id: String,
    /// Full message text, prefix included.
    pub content: String,
}

impl Invocation {
    /// Creates an invocation.
    pub fn new(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            content: content.into(),
        }
    }
}

/// A check that decides whether an invocation may proceed.
///
/// Guards are compared by [`name`](Guard::name): a command holds at most one
/// guard per name.
pub trait Guard: fmt::Debug + Send + Sync {
    /// Stable identifier of this guard.
    fn name(&self) -> &str;

    /// Returns `true` when the invocation is allowed.
    fn check(&self, invocation: &Invocation) -> bool;
}

/// Allows only configured bot administrators.
///
/// # Examples
///
/// ```
/// use cmdarg_registry::{Guard, Invocation, RequireAdmin};
///
/// let guard = RequireAdmin::new(["42"]);
/// assert!(guard.check(&Invocation::new("42", "!shutdown")));
/// assert!(!guard.check(&Invocation::new("7", "!shutdown")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequireAdmin {
    admins: Vec<String>,
}

impl RequireAdmin {
    /// Creates the guard from a list of admin ids.
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the guard from the [`ADMINS_ENV`] environment variable.
    ///
    /// A missing variable yields a guard that denies everyone.
    pub fn from_env() -> Self {
        Self::new(parse_admin_list(&std::env::var(ADMINS_ENV).unwrap_or_default()))
    }

    /// Returns the admin ids.
    pub fn admins(&self) -> &[String] {
        &self.admins
    }
}

impl Guard for RequireAdmin {
    fn name(&self) -> &str {
        "admin"
    }

    fn check(&self, invocation: &Invocation) -> bool {
        self.admins.iter().any(|id| *id == invocation.author_id)
    }
}

/// Denies every invocation, disabling the command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Disabled;

impl Guard for Disabled {
    fn name(&self) -> &str {
        "disabled"
    }

    fn check(&self, _invocation: &Invocation) -> bool {
        false
    }
}

/// Built-in guards that can be named in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardKind {
    /// [`RequireAdmin`] with the configured admin list.
    Admin,
    /// [`Disabled`].
    Disabled,
}

/// Splits a comma-separated id list, dropping blanks.
pub(crate) fn parse_admin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
