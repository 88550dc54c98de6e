mod defaults;

pub use defaults::{Defaults, StoreError};

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{error, warn};

/// The persisted mapping from short command names to full argument vectors.
/// The first element of each value is the executable path.
pub type CommandList = BTreeMap<String, Vec<String>>;

/// Defaults key the allow-list is stored under.
pub const VALID_COMMANDS_KEY: &str = "ValidCommands";

/// Shared suite used when the process has no bundle identity of its own.
pub const SHARED_SUITE: &str = "com.facebook.cpe.Sado";

/// Which persistence namespace the store targets.
///
/// A standalone CLI invocation has no bundle to scope storage to, so it uses
/// the fixed shared suite. An embedding that does run inside a bundle passes
/// its identifier explicitly rather than having the store re-derive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreScope {
    Bundle { identifier: String },
    SharedSuite,
}

impl StoreScope {
    fn domain(&self) -> &str {
        match self {
            StoreScope::Bundle { identifier } => identifier,
            StoreScope::SharedSuite => SHARED_SUITE,
        }
    }
}

/// Failures when resolving a registered short name to a runnable command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("`{0}` command does not exist")]
    Missing(String),

    #[error("`{0}` command is empty")]
    Empty(String),
}

/// Reads and writes the allow-list, and validates invocations against it.
///
/// Every call re-reads the persisted state; nothing is cached across calls,
/// so concurrent processes sharing the suite observe each other's writes.
#[derive(Debug, Clone)]
pub struct CommandStore {
    defaults: Defaults,
}

impl CommandStore {
    pub fn new(scope: StoreScope) -> Result<Self, StoreError> {
        Ok(Self {
            defaults: Defaults::suite(scope.domain())?,
        })
    }

    /// Build a store over an explicit defaults domain (tests, embedding).
    pub fn with_defaults(defaults: Defaults) -> Self {
        Self { defaults }
    }

    /// Returns the persisted allow-list, or `None` if none exists.
    ///
    /// A stored value that does not decode as a name-to-strings mapping is
    /// logged and treated the same as no list at all. That fails open on
    /// purpose: an unconfigured (or corrupted) store restricts nothing.
    pub fn get(&self) -> Option<CommandList> {
        let Some(value) = self.defaults.object(VALID_COMMANDS_KEY) else {
            warn!("unable to find defaults key for `{VALID_COMMANDS_KEY}`");
            return None;
        };
        match serde_json::from_value::<CommandList>(value.clone()) {
            Ok(list) => Some(list),
            Err(err) => {
                error!(%err, "unable to decode `{value}` as a command list");
                None
            }
        }
    }

    /// Persists the entire allow-list, replacing any prior value.
    pub fn set(&self, list: &CommandList) -> Result<(), StoreError> {
        let value = serde_json::to_value(list).map_err(|source| StoreError::Write {
            path: self.defaults.path().to_path_buf(),
            source: source.into(),
        })?;
        self.defaults.set_object(VALID_COMMANDS_KEY, value)
    }

    /// Removes the allow-list entirely, returning to the allow-all state.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.defaults.remove_object(VALID_COMMANDS_KEY)
    }

    /// Returns true if the invocation is allowed, or if no rules exist.
    ///
    /// Matching is exact ordered sequence equality against a stored value:
    /// no path resolution, no prefix matching, no case folding. Two entries
    /// for the same executable with different arguments are distinct.
    pub fn is_valid(&self, invocation: &[String]) -> bool {
        match self.get() {
            Some(list) => list.values().any(|command| command == invocation),
            None => true,
        }
    }

    /// Resolves a registered short name to its executable and arguments.
    ///
    /// An entry may legally be stored empty; that is only detected here, at
    /// launch time, not when the entry is added.
    pub fn lookup(&self, name: &str) -> Result<(String, Vec<String>), LookupError> {
        let list = self.get().ok_or_else(|| LookupError::Missing(name.to_string()))?;
        let command = list
            .get(name)
            .ok_or_else(|| LookupError::Missing(name.to_string()))?;
        match command.split_first() {
            Some((executable, args)) => Ok((executable.clone(), args.to_vec())),
            None => Err(LookupError::Empty(name.to_string())),
        }
    }
}
