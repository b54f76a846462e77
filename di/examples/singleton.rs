use fibre_di::{resolve, Container};
use std::cell::Cell;
use std::rc::Rc;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() {
  let ids = Rc::new(Cell::new(0));
  let mut container = Container::new();

  // --- Singleton Registration ---
  // This callback will only be called ONCE.
  let next = Rc::clone(&ids);
  container.register("singleton_tracker", move |_| {
    println!("Creating SINGLETON RequestTracker...");
    let id = next.get();
    next.set(id + 1);
    RequestTracker { id }
  });

  // --- Factory Registration ---
  // This callback will be called EVERY time the service is resolved.
  let next = Rc::clone(&ids);
  container.factory("factory_tracker", move |_| {
    println!("Creating FACTORY RequestTracker...");
    let id = next.get();
    next.set(id + 1);
    RequestTracker { id }
  });

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(container, RequestTracker, "singleton_tracker");
  let s2 = resolve!(container, RequestTracker, "singleton_tracker");
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Rc::ptr_eq(&s1, &s2), "Singleton instances should be identical");
  println!("Singleton instances are the same pointer, as expected.\n");

  println!("--- Resolving Factories ---");
  let f1 = resolve!(container, RequestTracker, "factory_tracker");
  let f2 = resolve!(container, RequestTracker, "factory_tracker");
  println!("Factory 1 ID: {}, Factory 2 ID: {}", f1.id, f2.id);
  assert_eq!(f1.id, 1);
  assert_eq!(f2.id, 2);
  assert!(!Rc::ptr_eq(&f1, &f2), "Factory instances should be different");
  println!("Factory instances are different pointers, as expected.");
}
