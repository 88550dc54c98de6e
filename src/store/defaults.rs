use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

/// Errors from writing a defaults domain. Reads never error — a domain that
/// cannot be read behaves as an empty domain.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no home directory available to resolve the preferences path")]
    NoPreferencesDir,

    #[error("failed to write defaults domain {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file-backed key-value domain, one JSON object per domain file.
///
/// Domains live in the OS preferences directory (`~/Library/Preferences` on
/// macOS) as `<domain>.json`. Concurrent writers get last-writer-wins for the
/// whole file; there is no locking beyond the atomicity of a single write.
#[derive(Debug, Clone)]
pub struct Defaults {
    path: PathBuf,
}

impl Defaults {
    /// Open the domain for the given identifier, e.g. `com.facebook.cpe.Sado`.
    pub fn suite(identifier: &str) -> Result<Self, StoreError> {
        let dirs = directories::BaseDirs::new().ok_or(StoreError::NoPreferencesDir)?;
        let path = dirs.preference_dir().join(format!("{identifier}.json"));
        Ok(Self { path })
    }

    /// Open a domain at an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`, or `None` if the domain file or the
    /// key is absent. An unreadable or malformed domain file is logged and
    /// treated as absent.
    pub fn object(&self, key: &str) -> Option<Value> {
        let mut domain = self.read_domain();
        domain.remove(key)
    }

    /// Store `value` under `key`, replacing any prior value.
    pub fn set_object(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut domain = self.read_domain();
        domain.insert(key.to_string(), value);
        self.write_domain(&domain)
    }

    /// Remove `key` from the domain. Removing an absent key is a no-op.
    pub fn remove_object(&self, key: &str) -> Result<(), StoreError> {
        let mut domain = self.read_domain();
        if domain.remove(key).is_none() {
            return Ok(());
        }
        self.write_domain(&domain)
    }

    fn read_domain(&self) -> Map<String, Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Map::new(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unable to read defaults domain");
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                error!(
                    path = %self.path.display(),
                    "defaults domain is not a JSON object (found {})",
                    json_type_name(&other)
                );
                Map::new()
            }
            Err(err) => {
                error!(path = %self.path.display(), %err, "unable to parse defaults domain");
                Map::new()
            }
        }
    }

    fn write_domain(&self, domain: &Map<String, Value>) -> Result<(), StoreError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(domain)?;
            fs::write(&self.path, content)
        };
        write().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
