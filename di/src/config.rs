//! Externally loadable container settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// The number of alias hops allowed before resolution gives up.
pub const DEFAULT_ALIAS_RESOLVE_LIMIT: usize = 50;

/// Behavioral knobs plus seed data for a [`Container`](crate::Container).
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
///
/// ```yaml
/// alias_resolve_limit: 10
/// aliases:
///   db: Database
/// arguments:
///   dsn: "postgres://localhost/app"
///   pool_size: 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
  /// Maximum number of hops an alias chain may take.
  pub alias_resolve_limit: usize,
  /// Retry a failed `get` once with a lower-cased, case-insensitive lookup.
  pub case_insensitive_fallback: bool,
  /// Report re-entrant resolution as an error instead of recursing.
  pub detect_cycles: bool,
  /// Alias edges registered when the container is created.
  pub aliases: BTreeMap<String, String>,
  /// Fallback arguments registered when the container is created.
  pub arguments: BTreeMap<String, Value>,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      alias_resolve_limit: DEFAULT_ALIAS_RESOLVE_LIMIT,
      case_insensitive_fallback: true,
      detect_cycles: true,
      aliases: BTreeMap::new(),
      arguments: BTreeMap::new(),
    }
  }
}

impl ContainerConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
    Ok(serde_yaml::from_str(source)?)
  }

  pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(source)?)
  }

  /// Loads a config file. A `.json` extension selects JSON; anything else
  /// is parsed as YAML.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let is_json = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
      Self::from_json_str(&source)
    } else {
      Self::from_yaml_str(&source)
    }
  }

  pub fn alias_resolve_limit(mut self, limit: usize) -> Self {
    self.alias_resolve_limit = limit;
    self
  }

  pub fn case_insensitive_fallback(mut self, enabled: bool) -> Self {
    self.case_insensitive_fallback = enabled;
    self
  }

  pub fn detect_cycles(mut self, enabled: bool) -> Self {
    self.detect_cycles = enabled;
    self
  }

  pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
    self.aliases.insert(from.into(), to.into());
    self
  }

  pub fn argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.arguments.insert(key.into(), value.into());
    self
  }
}
