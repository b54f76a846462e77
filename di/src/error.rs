//! Error types reported by the container.

use std::fmt;
use thiserror::Error;

/// Why a type name could not be constructed reflectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvableReason {
  /// The name was declared as an abstract type.
  Abstract,
  /// The name was declared as an interface.
  Interface,
  /// The name was declared as a trait.
  Trait,
  /// The name is not in the type catalogue at all.
  Undefined,
}

impl fmt::Display for UnresolvableReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UnresolvableReason::Abstract => f.write_str("abstract type"),
      UnresolvableReason::Interface => f.write_str("interface"),
      UnresolvableReason::Trait => f.write_str("trait"),
      UnresolvableReason::Undefined => f.write_str("type"),
    }
  }
}

/// Errors raised while loading a [`ContainerConfig`](crate::ContainerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read container config: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid YAML container config: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("invalid JSON container config: {0}")]
  Json(#[from] serde_json::Error),
}

/// Every failure the container can report.
///
/// The variants form a flat hierarchy: all of them are container-level
/// failures, and the variant is the subkind. [`ContainerError::is_not_found`]
/// separates "nothing is registered under this name" from "something is
/// registered but could not be built". An entry that is known but needs an
/// unregistered identifier reports [`ContainerError::MissingDependency`].
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("no entry found for identifier [ {name} ]")]
  NotFound { name: String },

  #[error("[ {name} ] depends on [ {dependency} ], which is not registered")]
  MissingDependency { name: String, dependency: String },

  #[error("alias resolve limit ({limit}) reached for {alias} at alias {reached}")]
  UnresolvableAlias {
    alias: String,
    reached: String,
    limit: usize,
  },

  #[error("unresolvable {reason} [ {name} ]")]
  UnresolvableType {
    name: String,
    reason: UnresolvableReason,
  },

  #[error("unresolvable {type_name} - parameter ${parameter}")]
  UnresolvableParameter {
    type_name: String,
    parameter: String,
  },

  #[error("instance [ {name} ] must be an object, got scalar `{type_name}`")]
  InvalidInstance {
    name: String,
    type_name: &'static str,
  },

  #[error("entry [ {name} ] is not a `{expected}`")]
  TypeMismatch {
    name: String,
    expected: &'static str,
  },

  #[error("argument ${parameter} of {type_name} is invalid: {message}")]
  InvalidArgument {
    type_name: String,
    parameter: String,
    message: String,
  },

  #[error("circular dependency detected: {path}")]
  CircularDependency { path: String },

  #[error(transparent)]
  Config(#[from] ConfigError),
}

impl ContainerError {
  pub fn not_found(name: impl Into<String>) -> Self {
    Self::NotFound { name: name.into() }
  }

  pub fn unresolvable_type(name: impl Into<String>, reason: UnresolvableReason) -> Self {
    Self::UnresolvableType {
      name: name.into(),
      reason,
    }
  }

  pub fn unresolvable_parameter(type_name: impl Into<String>, parameter: impl Into<String>) -> Self {
    Self::UnresolvableParameter {
      type_name: type_name.into(),
      parameter: parameter.into(),
    }
  }

  /// True if the identifier was registered nowhere.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  /// The identifier that could not be found while building a known entry.
  pub fn missing_dependency(&self) -> Option<&str> {
    match self {
      Self::MissingDependency { dependency, .. } => Some(dependency.as_str()),
      _ => None,
    }
  }

  /// True for the alias, type and parameter resolution failures.
  pub fn is_unresolvable(&self) -> bool {
    matches!(
      self,
      Self::UnresolvableAlias { .. }
        | Self::UnresolvableType { .. }
        | Self::UnresolvableParameter { .. }
    )
  }

  /// The reason attached to an [`ContainerError::UnresolvableType`], if any.
  pub fn unresolvable_reason(&self) -> Option<UnresolvableReason> {
    match self {
      Self::UnresolvableType { reason, .. } => Some(*reason),
      _ => None,
    }
  }
}

pub type Result<T, E = ContainerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_name_the_unresolvable_category() {
    let abstract_err = ContainerError::unresolvable_type("Shape", UnresolvableReason::Abstract);
    let interface_err = ContainerError::unresolvable_type("Logger", UnresolvableReason::Interface);
    let trait_err = ContainerError::unresolvable_type("Greets", UnresolvableReason::Trait);
    let undefined_err = ContainerError::unresolvable_type("Nope", UnresolvableReason::Undefined);

    assert_eq!(abstract_err.to_string(), "unresolvable abstract type [ Shape ]");
    assert_eq!(interface_err.to_string(), "unresolvable interface [ Logger ]");
    assert_eq!(trait_err.to_string(), "unresolvable trait [ Greets ]");
    assert_eq!(undefined_err.to_string(), "unresolvable type [ Nope ]");
  }

  #[test]
  fn alias_error_names_both_ends() {
    let err = ContainerError::UnresolvableAlias {
      alias: "alias0".into(),
      reached: "alias51".into(),
      limit: 50,
    };
    assert_eq!(
      err.to_string(),
      "alias resolve limit (50) reached for alias0 at alias alias51"
    );
    assert!(err.is_unresolvable());
    assert!(!err.is_not_found());
  }

  #[test]
  fn missing_dependency_is_not_a_not_found() {
    let err = ContainerError::MissingDependency {
      name: "users".into(),
      dependency: "db".into(),
    };
    assert_eq!(err.to_string(), "[ users ] depends on [ db ], which is not registered");
    assert_eq!(err.missing_dependency(), Some("db"));
    assert!(!err.is_not_found());
    assert!(ContainerError::not_found("db").missing_dependency().is_none());
  }

  #[test]
  fn config_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.yaml");
    let err: ContainerError = ConfigError::from(io).into();
    assert!(matches!(err, ContainerError::Config(ConfigError::Io(_))));
    assert!(err.unresolvable_reason().is_none());
  }
}
