//! Constructor metadata used for auto-construction.
//!
//! Rust has no runtime reflection, so a type that should be buildable by name
//! describes its constructor up front: an ordered parameter list and a
//! function that builds the value from the resolved [`Arguments`]. The
//! [`Injectable`] trait is the usual way to provide this; [`TypeDescriptor`]
//! can also be assembled by hand.

use crate::core::Object;
use crate::error::{ContainerError, Result, UnresolvableReason};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Builds an object from its resolved constructor arguments.
pub type Constructor = Rc<dyn Fn(&Arguments) -> Result<Object>>;

/// The category of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// Instantiable through its constructor.
  Concrete,
  Abstract,
  Interface,
  Trait,
}

impl TypeKind {
  /// The diagnostic for a kind that cannot be instantiated.
  pub fn unresolvable_reason(self) -> Option<UnresolvableReason> {
    match self {
      TypeKind::Concrete => None,
      TypeKind::Abstract => Some(UnresolvableReason::Abstract),
      TypeKind::Interface => Some(UnresolvableReason::Interface),
      TypeKind::Trait => Some(UnresolvableReason::Trait),
    }
  }
}

/// One constructor parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
  name: String,
  dependency: Option<String>,
  default: Option<Value>,
}

impl Parameter {
  /// A parameter satisfied by resolving `dependency` from the container.
  pub fn service(name: impl Into<String>, dependency: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      dependency: Some(dependency.into()),
      default: None,
    }
  }

  /// A plain value parameter, satisfied from the container's argument table
  /// or from its default.
  pub fn value(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      dependency: None,
      default: None,
    }
  }

  pub fn with_default(mut self, default: impl Into<Value>) -> Self {
    self.default = Some(default.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dependency(&self) -> Option<&str> {
    self.dependency.as_deref()
  }

  pub fn default_value(&self) -> Option<&Value> {
    self.default.as_ref()
  }
}

/// A resolved constructor argument.
#[derive(Clone)]
pub enum Argument {
  Service(Object),
  Value(Value),
}

impl fmt::Debug for Argument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Argument::Service(_) => f.write_str("Service(..)"),
      Argument::Value(value) => f.debug_tuple("Value").field(value).finish(),
    }
  }
}

/// The ordered argument list handed to a [`Constructor`].
#[derive(Debug, Clone)]
pub struct Arguments {
  type_name: String,
  entries: Vec<(String, Argument)>,
}

impl Arguments {
  pub(crate) fn new(type_name: impl Into<String>) -> Self {
    Self {
      type_name: type_name.into(),
      entries: Vec::new(),
    }
  }

  pub(crate) fn push(&mut self, parameter: impl Into<String>, argument: Argument) {
    self.entries.push((parameter.into(), argument));
  }

  /// The name of the type being constructed.
  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, parameter: &str) -> Option<&Argument> {
    self
      .entries
      .iter()
      .find(|(name, _)| name == parameter)
      .map(|(_, argument)| argument)
  }

  /// Arguments in constructor order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
    self.entries.iter().map(|(name, argument)| (name.as_str(), argument))
  }

  /// The resolved dependency for `parameter`, downcast to `T`.
  pub fn service<T: Any>(&self, parameter: &str) -> Result<Rc<T>> {
    match self.get(parameter) {
      Some(Argument::Service(object)) => Rc::clone(object)
        .downcast::<T>()
        .map_err(|_| self.invalid(parameter, format!("expected a `{}`", type_name::<T>()))),
      Some(Argument::Value(_)) => Err(self.invalid(parameter, "expected a service, got a value")),
      None => Err(self.invalid(parameter, "no such parameter")),
    }
  }

  /// The plain value for `parameter`, deserialized into `T`.
  pub fn value<T: DeserializeOwned>(&self, parameter: &str) -> Result<T> {
    match self.get(parameter) {
      Some(Argument::Value(value)) => {
        T::deserialize(value).map_err(|err| self.invalid(parameter, err.to_string()))
      }
      Some(Argument::Service(_)) => Err(self.invalid(parameter, "expected a value, got a service")),
      None => Err(self.invalid(parameter, "no such parameter")),
    }
  }

  fn invalid(&self, parameter: &str, message: impl Into<String>) -> ContainerError {
    ContainerError::InvalidArgument {
      type_name: self.type_name.clone(),
      parameter: parameter.to_owned(),
      message: message.into(),
    }
  }
}

/// A type that can be constructed by name from the container.
///
/// ```
/// use fibre_di::{Arguments, Container, Injectable, Parameter, Result};
/// use std::rc::Rc;
///
/// struct Config;
/// impl Injectable for Config {
///   const NAME: &'static str = "Config";
///   fn construct(_: &Arguments) -> Result<Self> {
///     Ok(Config)
///   }
/// }
///
/// struct Mailer {
///   _config: Rc<Config>,
///   host: String,
/// }
/// impl Injectable for Mailer {
///   const NAME: &'static str = "Mailer";
///   fn parameters() -> Vec<Parameter> {
///     vec![
///       Parameter::service("config", "Config"),
///       Parameter::value("host").with_default("localhost"),
///     ]
///   }
///   fn construct(args: &Arguments) -> Result<Self> {
///     Ok(Mailer {
///       _config: args.service("config")?,
///       host: args.value("host")?,
///     })
///   }
/// }
///
/// let mut container = Container::new();
/// container.declare::<Config>();
/// container.declare::<Mailer>();
///
/// let mailer = container.get::<Mailer>("Mailer").unwrap();
/// assert_eq!(mailer.host, "localhost");
/// ```
pub trait Injectable: Any + Sized {
  /// The identifier the type is resolvable under.
  const NAME: &'static str;

  /// Constructor parameters in declaration order.
  fn parameters() -> Vec<Parameter> {
    Vec::new()
  }

  fn construct(args: &Arguments) -> Result<Self>;
}

/// Everything the container knows about a declared type.
#[derive(Clone)]
pub struct TypeDescriptor {
  name: String,
  kind: TypeKind,
  parameters: Vec<Parameter>,
  constructor: Option<Constructor>,
}

impl TypeDescriptor {
  /// A concrete type built by `constructor`.
  pub fn concrete<T, F>(name: impl Into<String>, constructor: F) -> Self
  where
    T: Any,
    F: Fn(&Arguments) -> Result<T> + 'static,
  {
    Self {
      name: name.into(),
      kind: TypeKind::Concrete,
      parameters: Vec::new(),
      constructor: Some(Rc::new(move |args: &Arguments| {
        constructor(args).map(|value| Rc::new(value) as Object)
      })),
    }
  }

  /// A declared but non-instantiable type.
  pub fn non_instantiable(name: impl Into<String>, kind: TypeKind) -> Self {
    Self {
      name: name.into(),
      kind,
      parameters: Vec::new(),
      constructor: None,
    }
  }

  pub fn of<T: Injectable>() -> Self {
    Self::concrete(T::NAME, T::construct).parameters(T::parameters())
  }

  pub fn parameter(mut self, parameter: Parameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
    self.parameters.extend(parameters);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> TypeKind {
    self.kind
  }

  pub fn parameter_list(&self) -> &[Parameter] {
    &self.parameters
  }

  /// The constructor, present only for instantiable types.
  pub fn constructor(&self) -> Option<&Constructor> {
    match self.kind {
      TypeKind::Concrete => self.constructor.as_ref(),
      _ => None,
    }
  }

  pub fn is_instantiable(&self) -> bool {
    self.constructor().is_some()
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("parameters", &self.parameters)
      .finish_non_exhaustive()
  }
}

/// Declared types, keyed by name.
#[derive(Debug, Default)]
pub(crate) struct TypeCatalog {
  types: HashMap<String, TypeDescriptor>,
}

impl TypeCatalog {
  pub(crate) fn insert(&mut self, descriptor: TypeDescriptor) -> Option<TypeDescriptor> {
    self.types.insert(descriptor.name.clone(), descriptor)
  }

  pub(crate) fn get(&self, name: &str) -> Option<&TypeDescriptor> {
    self.types.get(name)
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.types.contains_key(name)
  }

  pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
    self.types.keys().map(String::as_str)
  }
}
