//! Core, mostly non-public data structures shared by the container modules.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// A resolved entry. Every `get` for a cached entry hands out a clone of the
/// same `Rc`, so identity can be checked with `Rc::ptr_eq`.
pub type Object = Rc<dyn Any>;

/// The uniform shape every registered construction strategy is normalized
/// into. It receives the container so it can resolve its own dependencies.
pub type Callback = Rc<dyn Fn(&Container) -> Result<Object>>;

/// How often a registered callback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
  /// Runs on first resolution; the result is cached under the same name.
  Singleton,
  /// Runs on every resolution; the result is never cached.
  Factory,
}

/// What is stored under an identifier, as reported by [`Container::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
  /// A pre-built object, or only a cached result with no callback behind it.
  Instance,
  Singleton,
  Factory,
}

impl From<Lifetime> for RegistrationKind {
  fn from(lifetime: Lifetime) -> Self {
    match lifetime {
      Lifetime::Singleton => RegistrationKind::Singleton,
      Lifetime::Factory => RegistrationKind::Factory,
    }
  }
}

/// A registered callback together with its lifetime tag.
#[derive(Clone)]
pub(crate) struct Provider {
  pub(crate) callback: Callback,
  pub(crate) lifetime: Lifetime,
}

impl fmt::Debug for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Provider")
      .field("lifetime", &self.lifetime)
      .finish_non_exhaustive()
  }
}

/// Wraps an infallible constructor closure into a [`Callback`].
pub(crate) fn callback_from<T, F>(f: F) -> Callback
where
  T: Any,
  F: Fn(&Container) -> T + 'static,
{
  Rc::new(move |container: &Container| Ok(Rc::new(f(container)) as Object))
}

/// Wraps a fallible constructor closure into a [`Callback`].
pub(crate) fn try_callback_from<T, F>(f: F) -> Callback
where
  T: Any,
  F: Fn(&Container) -> Result<T> + 'static,
{
  Rc::new(move |container: &Container| f(container).map(|value| Rc::new(value) as Object))
}

/// The step of resolution a name is in.
///
/// A registered callback may build its own name through
/// [`Container::resolve`], so the callback and the construction of one name
/// are tracked as separate entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolutionPhase {
  Callback,
  Construct,
}

/// The container's stack of `(phase, name)` entries currently resolving.
pub(crate) type ResolutionStack = RefCell<Vec<(ResolutionPhase, String)>>;

/// An RAII guard that detects re-entrant resolution of the same name.
///
/// Entering pushes the entry onto the container's resolution stack and fails
/// if it is already there. Dropping the guard pops it again, including when
/// resolution unwinds with an error.
pub(crate) struct ResolutionGuard<'a> {
  stack: &'a ResolutionStack,
}

impl<'a> ResolutionGuard<'a> {
  pub(crate) fn enter(stack: &'a ResolutionStack, phase: ResolutionPhase, name: &str) -> Result<Self> {
    let mut entries = stack.borrow_mut();
    if entries.iter().any(|(p, resolving)| *p == phase && resolving == name) {
      let mut path = String::new();
      for (_, resolving) in entries.iter() {
        path.push_str(resolving);
        path.push_str(" -> ");
      }
      path.push_str(name);
      warn!(path = path.as_str(), ?phase, "circular dependency detected");
      return Err(ContainerError::CircularDependency { path });
    }
    entries.push((phase, name.to_owned()));
    Ok(Self { stack })
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.stack.borrow_mut().pop();
  }
}
