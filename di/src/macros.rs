//! Public macros for ergonomic service resolution.

/// Resolves a typed entry from a container, panicking if it cannot be
/// resolved.
///
/// This is for wiring code where a missing dependency is a programming error.
/// For a non-panicking version, call [`Container::get`](crate::Container::get)
/// directly.
///
/// # Panics
///
/// Panics with the underlying [`ContainerError`](crate::ContainerError) if
/// the entry is missing, fails to build, or is not a `$type`.
///
/// # Examples
///
/// ```
/// use fibre_di::{resolve, Container};
///
/// struct Greeting(String);
///
/// let mut container = Container::new();
/// container.register("greeting", |_| Greeting("hello".to_string()));
///
/// let greeting = resolve!(container, Greeting, "greeting");
/// assert_eq!(greeting.0, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($container:expr, $type:ty, $name:expr) => {
    $container.get::<$type>($name).unwrap_or_else(|err| {
      panic!(
        "Failed to resolve required service '{}' as {}: {}",
        $name,
        std::any::type_name::<$type>(),
        err
      )
    })
  };
}
