//! The four registration tables and their bookkeeping.

use crate::core::{Callback, Lifetime, Object, Provider, RegistrationKind};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Owns the objects, callbacks, aliases and arguments tables.
///
/// Only the object table needs interior mutability: it doubles as the
/// singleton cache and is written during resolution, while every other table
/// changes only through `&mut` registration calls.
#[derive(Debug, Default)]
pub(crate) struct Registry {
  objects: RefCell<HashMap<String, Object>>,
  callbacks: HashMap<String, Provider>,
  aliases: HashMap<String, String>,
  arguments: HashMap<String, Value>,
}

impl Registry {
  pub(crate) fn set_argument(&mut self, key: String, value: Value) {
    self.arguments.insert(key, value);
  }

  pub(crate) fn argument(&self, key: &str) -> Option<&Value> {
    self.arguments.get(key)
  }

  /// Stores `callback` under `name`. A result cached from an earlier
  /// registration under the same name is dropped so the new callback is the
  /// one that runs.
  pub(crate) fn register_callback(&mut self, name: String, callback: Callback, lifetime: Lifetime) -> Callback {
    self.objects.get_mut().remove(&name);
    self.callbacks.insert(
      name,
      Provider {
        callback: Callback::clone(&callback),
        lifetime,
      },
    );
    callback
  }

  /// Stores a pre-built object, replacing any callback under `name`.
  pub(crate) fn register_instance(&mut self, name: String, object: Object) {
    self.callbacks.remove(&name);
    self.objects.get_mut().insert(name, object);
  }

  pub(crate) fn alias(&mut self, from: String, to: String) {
    self.aliases.insert(from, to);
  }

  pub(crate) fn aliases(&self) -> &HashMap<String, String> {
    &self.aliases
  }

  /// Removes `name` from every table. Returns whether anything was removed.
  pub(crate) fn unregister(&mut self, name: &str) -> bool {
    let object = self.objects.get_mut().remove(name).is_some();
    let callback = self.callbacks.remove(name).is_some();
    let alias = self.aliases.remove(name).is_some();
    let argument = self.arguments.remove(name).is_some();
    object || callback || alias || argument
  }

  /// Shallow existence check across all four tables; aliases are not followed.
  pub(crate) fn has(&self, name: &str) -> bool {
    self.objects.borrow().contains_key(name)
      || self.callbacks.contains_key(name)
      || self.aliases.contains_key(name)
      || self.arguments.contains_key(name)
  }

  pub(crate) fn is_factory(&self, name: &str) -> bool {
    self
      .callbacks
      .get(name)
      .is_some_and(|provider| provider.lifetime == Lifetime::Factory)
  }

  pub(crate) fn kind(&self, name: &str) -> Option<RegistrationKind> {
    if let Some(provider) = self.callbacks.get(name) {
      return Some(provider.lifetime.into());
    }
    self
      .objects
      .borrow()
      .contains_key(name)
      .then_some(RegistrationKind::Instance)
  }

  pub(crate) fn provider(&self, name: &str) -> Option<Provider> {
    self.callbacks.get(name).cloned()
  }

  pub(crate) fn cached(&self, name: &str) -> Option<Object> {
    self.objects.borrow().get(name).cloned()
  }

  pub(crate) fn cache(&self, name: &str, object: Object) {
    self.objects.borrow_mut().insert(name.to_owned(), object);
  }

  pub(crate) fn is_cached(&self, name: &str) -> bool {
    self.objects.borrow().contains_key(name)
  }

  pub(crate) fn forget(&mut self, name: &str) -> Option<Object> {
    self.objects.get_mut().remove(name)
  }

  pub(crate) fn objects(&self) -> Ref<'_, HashMap<String, Object>> {
    self.objects.borrow()
  }

  /// The smallest identifier in any table that lower-cases to `lower`.
  pub(crate) fn min_key_folding_to(&self, lower: &str) -> Option<String> {
    let objects = self.objects.borrow();
    let found = objects
      .keys()
      .chain(self.callbacks.keys())
      .chain(self.aliases.keys())
      .chain(self.arguments.keys())
      .filter(|key| folds_to(key, lower))
      .min()
      .cloned();
    found
  }
}

/// True if `key` lower-cases to `lower`, without allocating.
pub(crate) fn folds_to(key: &str, lower: &str) -> bool {
  key.chars().flat_map(char::to_lowercase).eq(lower.chars())
}

macro_rules! scalar_type_ids {
  ($($ty:ty),* $(,)?) => {
    [$(TypeId::of::<$ty>(), TypeId::of::<Option<$ty>>()),*]
  };
}

/// True for the primitive and string-like types, and `Option`s of them,
/// that may not be registered as instances.
///
/// The set is closed: an `Option` of any other type is accepted like the
/// object it wraps.
pub(crate) fn is_scalar<T: Any>() -> bool {
  let id = TypeId::of::<T>();
  scalar_type_ids![
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Box<str>,
    Rc<str>,
    Cow<'static, str>,
    Value,
  ]
  .contains(&id)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn provider_for(value: u32) -> Callback {
    crate::core::callback_from(move |_| value)
  }

  #[test]
  fn has_checks_every_table() {
    let mut registry = Registry::default();
    assert!(!registry.has("x"));

    registry.set_argument("arg".into(), Value::from(1));
    registry.alias("alias".into(), "target".into());
    registry.register_instance("object".into(), Rc::new(1u8));
    registry.register_callback("callback".into(), provider_for(1), Lifetime::Singleton);

    for name in ["arg", "alias", "object", "callback"] {
      assert!(registry.has(name), "{name} should be registered");
    }
    // Shallow: the alias target itself is not registered.
    assert!(!registry.has("target"));
  }

  #[test]
  fn unregister_clears_all_tables() {
    let mut registry = Registry::default();
    registry.set_argument("name".into(), Value::from("Eric"));
    registry.alias("name".into(), "other".into());
    registry.register_callback("name".into(), provider_for(1), Lifetime::Factory);
    registry.cache("name", Rc::new(2u8));

    assert!(registry.is_factory("name"));
    assert!(registry.unregister("name"));
    assert!(!registry.has("name"));
    assert!(!registry.is_factory("name"));
    assert!(!registry.unregister("name"));
  }

  #[test]
  fn registrations_replace_each_other() {
    let mut registry = Registry::default();
    registry.register_callback("svc".into(), provider_for(1), Lifetime::Singleton);
    registry.cache("svc", Rc::new(1u32));
    assert_eq!(registry.kind("svc"), Some(RegistrationKind::Singleton));

    registry.register_instance("svc".into(), Rc::new(5u32));
    assert_eq!(registry.kind("svc"), Some(RegistrationKind::Instance));
    assert!(registry.provider("svc").is_none());

    registry.register_callback("svc".into(), provider_for(2), Lifetime::Factory);
    assert_eq!(registry.kind("svc"), Some(RegistrationKind::Factory));
    assert!(!registry.is_cached("svc"));
  }

  #[test]
  fn scalars_are_detected() {
    assert!(is_scalar::<i32>());
    assert!(is_scalar::<String>());
    assert!(is_scalar::<&'static str>());
    assert!(is_scalar::<bool>());
    assert!(is_scalar::<Option<u32>>());
    assert!(is_scalar::<Option<String>>());
    assert!(is_scalar::<Box<str>>());
    assert!(is_scalar::<Rc<str>>());
    assert!(is_scalar::<Cow<'static, str>>());
    assert!(is_scalar::<Value>());
    assert!(!is_scalar::<Vec<u8>>());
    assert!(!is_scalar::<Registry>());
    assert!(!is_scalar::<Option<Registry>>());
  }

  #[test]
  fn folding_lookup_scans_every_table() {
    let mut registry = Registry::default();
    registry.register_instance("Object".into(), Rc::new(1u8));
    registry.alias("ALIAS".into(), "Object".into());
    registry.set_argument("Arg".into(), Value::from(1));
    registry.set_argument("aRG".into(), Value::from(2));

    assert_eq!(registry.min_key_folding_to("object").as_deref(), Some("Object"));
    assert_eq!(registry.min_key_folding_to("alias").as_deref(), Some("ALIAS"));
    // Ties resolve to the smallest key.
    assert_eq!(registry.min_key_folding_to("arg").as_deref(), Some("Arg"));
    assert_eq!(registry.min_key_folding_to("missing"), None);
    assert!(folds_to("ÉCOLE", "école"));
  }
}
