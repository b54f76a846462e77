//! The main `Container` struct and its associated methods.

use crate::alias;
use crate::config::ContainerConfig;
use crate::core::{
  callback_from, try_callback_from, Callback, Lifetime, Object, RegistrationKind, ResolutionGuard,
  ResolutionPhase, ResolutionStack,
};
use crate::descriptor::{Argument, Arguments, Injectable, Parameter, TypeCatalog, TypeDescriptor, TypeKind};
use crate::error::{ContainerError, Result, UnresolvableReason};
use crate::registry::{folds_to, is_scalar, Registry};
use serde_json::Value;
use std::any::{type_name, Any};
use std::rc::Rc;
use tracing::{debug, trace};

/// A name-keyed dependency injection container.
///
/// Entries are registered under string identifiers as pre-built instances,
/// lazily-initialized singletons or factories, and can be redirected with
/// aliases. Names that are not registered fall back to auto-construction
/// from the declared [`TypeDescriptor`]s.
///
/// The container is single-threaded: it hands out `Rc`s and keeps its
/// singleton cache in a `RefCell`. Registration takes `&mut self`;
/// resolution takes `&self`, so callbacks receive the container and can
/// resolve their own dependencies.
#[derive(Debug, Default)]
pub struct Container {
  registry: Registry,
  types: TypeCatalog,
  config: ContainerConfig,
  resolving: ResolutionStack,
}

impl Container {
  /// Creates a new, empty `Container` with the default settings.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a container with `config`'s settings, seeding its aliases and
  /// arguments.
  pub fn with_config(mut config: ContainerConfig) -> Self {
    let aliases = std::mem::take(&mut config.aliases);
    let arguments = std::mem::take(&mut config.arguments);

    let mut container = Self {
      config,
      ..Self::default()
    };
    for (from, to) in aliases {
      container.alias(from, to);
    }
    for (key, value) in arguments {
      container.set_argument(key, value);
    }
    container
  }

  /// The active settings. Seed aliases and arguments are not retained here.
  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- Registration ---

  /// Sets a fallback value for constructor parameters named `key`.
  pub fn set_argument(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    let key = key.into();
    debug!(key = key.as_str(), "argument set");
    self.registry.set_argument(key, value.into());
  }

  /// Registers a singleton callback. It runs on the first `get` and its
  /// result is cached under `name` from then on.
  pub fn register<T, F>(&mut self, name: impl Into<String>, f: F) -> Callback
  where
    T: Any,
    F: Fn(&Container) -> T + 'static,
  {
    self.register_callback(name.into(), callback_from(f), Lifetime::Singleton)
  }

  /// Like [`Container::register`], for callbacks that can fail.
  pub fn try_register<T, F>(&mut self, name: impl Into<String>, f: F) -> Callback
  where
    T: Any,
    F: Fn(&Container) -> Result<T> + 'static,
  {
    self.register_callback(name.into(), try_callback_from(f), Lifetime::Singleton)
  }

  /// Registers a factory callback. It runs on every `get`; results are
  /// never cached.
  pub fn factory<T, F>(&mut self, name: impl Into<String>, f: F) -> Callback
  where
    T: Any,
    F: Fn(&Container) -> T + 'static,
  {
    self.register_callback(name.into(), callback_from(f), Lifetime::Factory)
  }

  /// Like [`Container::factory`], for callbacks that can fail.
  pub fn try_factory<T, F>(&mut self, name: impl Into<String>, f: F) -> Callback
  where
    T: Any,
    F: Fn(&Container) -> Result<T> + 'static,
  {
    self.register_callback(name.into(), try_callback_from(f), Lifetime::Factory)
  }

  /// Registers an already-normalized callback with an explicit lifetime.
  pub fn register_callback(&mut self, name: impl Into<String>, callback: Callback, lifetime: Lifetime) -> Callback {
    let name = name.into();
    debug!(name = name.as_str(), ?lifetime, "callback registered");
    self.registry.register_callback(name, callback, lifetime)
  }

  /// Registers a pre-built object. Scalars (numbers, `bool`, `char`,
  /// strings and `()`) are rejected with [`ContainerError::InvalidInstance`].
  pub fn instance<T: Any>(&mut self, name: impl Into<String>, value: T) -> Result<Rc<T>> {
    self.instance_shared(name, Rc::new(value))
  }

  /// Like [`Container::instance`], for an object that is already shared.
  pub fn instance_shared<T: Any>(&mut self, name: impl Into<String>, value: Rc<T>) -> Result<Rc<T>> {
    let name = name.into();
    if is_scalar::<T>() {
      return Err(ContainerError::InvalidInstance {
        name,
        type_name: type_name::<T>(),
      });
    }
    debug!(name = name.as_str(), type_name = type_name::<T>(), "instance registered");
    self.registry.register_instance(name, Rc::clone(&value) as Object);
    Ok(value)
  }

  /// Redirects `from` to `to`. Aliases may chain.
  pub fn alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
    let (from, to) = (from.into(), to.into());
    debug!(from = from.as_str(), to = to.as_str(), "alias registered");
    self.registry.alias(from, to);
  }

  /// Removes `name` from the object, callback, alias and argument tables.
  /// Returns whether anything was removed.
  pub fn unregister(&mut self, name: &str) -> bool {
    let removed = self.registry.unregister(name);
    debug!(name, removed, "unregistered");
    removed
  }

  // --- Type declarations ---

  /// Makes `T` constructible by `T::NAME`.
  pub fn declare<T: Injectable>(&mut self) {
    self.declare_type(TypeDescriptor::of::<T>());
  }

  pub fn declare_type(&mut self, descriptor: TypeDescriptor) {
    debug!(name = descriptor.name(), kind = ?descriptor.kind(), "type declared");
    self.types.insert(descriptor);
  }

  pub fn declare_abstract(&mut self, name: impl Into<String>) {
    self.declare_type(TypeDescriptor::non_instantiable(name, TypeKind::Abstract));
  }

  pub fn declare_interface(&mut self, name: impl Into<String>) {
    self.declare_type(TypeDescriptor::non_instantiable(name, TypeKind::Interface));
  }

  pub fn declare_trait(&mut self, name: impl Into<String>) {
    self.declare_type(TypeDescriptor::non_instantiable(name, TypeKind::Trait));
  }

  pub fn is_declared(&self, name: &str) -> bool {
    self.types.contains(name)
  }

  // --- Queries ---

  /// True if `name` is present in any of the four tables. Aliases are not
  /// followed and declared types do not count.
  pub fn has(&self, name: &str) -> bool {
    self.registry.has(name)
  }

  /// True only if `name` holds a factory callback.
  pub fn is_factory(&self, name: &str) -> bool {
    self.registry.is_factory(name)
  }

  pub fn kind(&self, name: &str) -> Option<RegistrationKind> {
    self.registry.kind(name)
  }

  /// Follows the alias chain from `name` to its canonical identifier.
  pub fn resolve_alias(&self, name: &str) -> Result<String> {
    alias::resolve(self.registry.aliases(), name, self.config.alias_resolve_limit)
  }

  // --- Resolution ---

  /// Resolves `name` and downcasts the result to `T`.
  pub fn get<T: Any>(&self, name: &str) -> Result<Rc<T>> {
    self
      .get_any(name)?
      .downcast::<T>()
      .map_err(|_| ContainerError::TypeMismatch {
        name: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// Resolves `name` to an object.
  ///
  /// The alias chain is followed, then the cached object is returned, or the
  /// registered callback runs, or the name is auto-constructed from its
  /// declared type. If that fails, the lookup is retried once
  /// case-insensitively. When neither spelling is known anywhere the error is
  /// [`ContainerError::NotFound`]; otherwise the underlying failure surfaces.
  pub fn get_any(&self, name: &str) -> Result<Object> {
    let first = match self.attempt(name) {
      Ok(object) => return Ok(object),
      Err(err) => err,
    };

    let retry = if self.config.case_insensitive_fallback {
      self.fold_case(name)
    } else {
      None
    };
    let Some(folded) = retry else {
      return Err(self.surface(name, first));
    };

    debug!(requested = name, retry = folded.as_str(), error = %first, "retrying case-insensitively");
    match self.attempt(&folded) {
      Ok(object) => Ok(object),
      Err(second) if self.is_known(&folded) => Err(self.surface(&folded, second)),
      Err(_) => Err(self.surface(name, first)),
    }
  }

  /// Auto-constructs the declared type `type_name`, bypassing the
  /// registration tables.
  ///
  /// A callback registered under a type's own name may call this to build
  /// the type and decorate the result.
  pub fn resolve(&self, type_name: &str) -> Result<Object> {
    self
      .construct(type_name)
      .map_err(|err| attribute_missing(type_name, err))
  }

  fn attempt(&self, name: &str) -> Result<Object> {
    let canonical = self.resolve_alias(name)?;

    if let Some(object) = self.registry.cached(&canonical) {
      trace!(name = canonical.as_str(), "cache hit");
      return Ok(object);
    }

    if let Some(provider) = self.registry.provider(&canonical) {
      let _guard = self.enter(ResolutionPhase::Callback, &canonical)?;
      trace!(name = canonical.as_str(), lifetime = ?provider.lifetime, "invoking callback");
      let object = (provider.callback)(self)?;
      if provider.lifetime == Lifetime::Singleton {
        self.registry.cache(&canonical, Rc::clone(&object));
      }
      return Ok(object);
    }

    self.construct(&canonical)
  }

  fn construct(&self, type_name: &str) -> Result<Object> {
    let descriptor = self
      .types
      .get(type_name)
      .ok_or_else(|| ContainerError::unresolvable_type(type_name, UnresolvableReason::Undefined))?;

    let Some(constructor) = descriptor.constructor() else {
      let reason = descriptor
        .kind()
        .unresolvable_reason()
        .unwrap_or(UnresolvableReason::Undefined);
      return Err(ContainerError::unresolvable_type(type_name, reason));
    };

    let _guard = self.enter(ResolutionPhase::Construct, type_name)?;

    let mut args = Arguments::new(descriptor.name());
    for parameter in descriptor.parameter_list() {
      let argument = self.resolve_parameter(descriptor, parameter)?;
      args.push(parameter.name(), argument);
    }

    trace!(name = type_name, arguments = args.len(), "constructing");
    constructor(&args)
  }

  fn resolve_parameter(&self, descriptor: &TypeDescriptor, parameter: &Parameter) -> Result<Argument> {
    if let Some(dependency) = parameter.dependency() {
      return self.get_any(dependency).map(Argument::Service);
    }

    if let Some(value) = self.registry.argument(parameter.name()) {
      return Ok(Argument::Value(value.clone()));
    }

    parameter
      .default_value()
      .map(|value| Argument::Value(value.clone()))
      .ok_or_else(|| ContainerError::unresolvable_parameter(descriptor.name(), parameter.name()))
  }

  fn enter(&self, phase: ResolutionPhase, name: &str) -> Result<Option<ResolutionGuard<'_>>> {
    if !self.config.detect_cycles {
      return Ok(None);
    }
    ResolutionGuard::enter(&self.resolving, phase, name).map(Some)
  }

  fn is_known(&self, name: &str) -> bool {
    self.registry.has(name) || self.types.contains(name)
  }

  fn surface(&self, name: &str, err: ContainerError) -> ContainerError {
    if self.is_known(name) {
      attribute_missing(name, err)
    } else {
      ContainerError::not_found(name)
    }
  }

  /// The identifier to retry with: the lower-cased name if it is known,
  /// otherwise the smallest registered key that matches it ignoring case.
  /// `None` when the retry would repeat the same lookup.
  fn fold_case(&self, name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let folded = if self.is_known(&lower) {
      lower
    } else {
      let declared = self.types.names().filter(|key| folds_to(key, &lower)).min();
      self
        .registry
        .min_key_folding_to(&lower)
        .into_iter()
        .chain(declared.map(str::to_owned))
        .min()?
    };
    (folded != name).then_some(folded)
  }

  // --- Cached objects ---

  /// True if an object is cached under `name`, either registered as an
  /// instance or produced by a singleton callback.
  pub fn is_cached(&self, name: &str) -> bool {
    self.registry.is_cached(name)
  }

  /// Drops the object cached under `name`, leaving its callback in place.
  /// A singleton callback runs again on the next `get`.
  pub fn forget(&mut self, name: &str) -> Option<Object> {
    let forgotten = self.registry.forget(name);
    debug!(name, forgotten = forgotten.is_some(), "cached object forgotten");
    forgotten
  }

  /// The cached objects, sorted by identifier.
  pub fn instances(&self) -> Vec<(String, Object)> {
    let mut instances: Vec<_> = self
      .registry
      .objects()
      .iter()
      .map(|(name, object)| (name.clone(), Rc::clone(object)))
      .collect();
    instances.sort_by(|(a, _), (b, _)| a.cmp(b));
    instances
  }
}

/// A known entry that failed because some other identifier is not
/// registered reports the missing dependency, so `NotFound` always refers to
/// the identifier that was asked for.
fn attribute_missing(name: &str, err: ContainerError) -> ContainerError {
  match err {
    ContainerError::NotFound { name: dependency } if dependency != name => ContainerError::MissingDependency {
      name: name.to_owned(),
      dependency,
    },
    err => err,
  }
}
