//! # Fibre DI
//!
//! A name-keyed dependency injection container for Rust.
//!
//! Fibre DI maps string identifiers to ways of producing objects and resolves
//! them on demand, so calling code can ask for "the mailer" without knowing
//! how the mailer is built.
//!
//! ## Core Concepts
//!
//! - **Instances**: pre-built objects, returned as-is on every `get`.
//! - **Singletons**: callbacks that run on first resolution; the result is
//!   cached under the same name.
//! - **Factories**: callbacks that run on every resolution and are never cached.
//! - **Aliases**: redirects from one name to another, possibly chained, with a
//!   bounded number of hops.
//! - **Auto-construction**: names that are not registered are built from a
//!   declared [`TypeDescriptor`], resolving each dependency parameter through
//!   the container and each plain parameter from the argument table or its
//!   default.
//!
//! Lookups that fail are retried once case-insensitively.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{Arguments, Container, Injectable, Parameter, Result};
//! use std::rc::Rc;
//!
//! struct Database {
//!   dsn: String,
//! }
//!
//! impl Injectable for Database {
//!   const NAME: &'static str = "Database";
//!
//!   fn parameters() -> Vec<Parameter> {
//!     vec![Parameter::value("dsn")]
//!   }
//!
//!   fn construct(args: &Arguments) -> Result<Self> {
//!     Ok(Database { dsn: args.value("dsn")? })
//!   }
//! }
//!
//! struct UserService {
//!   db: Rc<Database>,
//! }
//!
//! let mut container = Container::new();
//! container.declare::<Database>();
//! container.set_argument("dsn", "postgres://localhost/app");
//! container.alias("db", "Database");
//! container.try_register("users", |c: &Container| {
//!   Ok(UserService { db: c.get("db")? })
//! });
//!
//! let users = container.get::<UserService>("users").unwrap();
//! assert_eq!(users.db.dsn, "postgres://localhost/app");
//!
//! // "users" is a singleton: the callback ran once and its result is cached.
//! let again = container.get::<UserService>("users").unwrap();
//! assert!(Rc::ptr_eq(&users, &again));
//!
//! // Auto-constructed types are built fresh on every resolution.
//! let db = container.get::<Database>("db").unwrap();
//! assert!(!Rc::ptr_eq(&users.db, &db));
//! ```

mod alias;
mod config;
mod container;
mod core;
mod descriptor;
mod error;
mod macros;
mod registry;

pub use config::{ContainerConfig, DEFAULT_ALIAS_RESOLVE_LIMIT};
pub use container::Container;
pub use crate::core::{Callback, Lifetime, Object, RegistrationKind};
pub use descriptor::{Argument, Arguments, Constructor, Injectable, Parameter, TypeDescriptor, TypeKind};
pub use error::{ConfigError, ContainerError, Result, UnresolvableReason};
