//! # Keystone IoC
//!
//! A small, string-keyed dependency-injection container.
//!
//! Values are registered under string keys either as providers (closures
//! that receive the container and run on every lookup) or as singletons
//! (evaluated once, at registration). Keys can be aliased, and types
//! described to the container with a [`TypeDescriptor`] can be built with
//! [`Container::make`], which resolves constructor parameters recursively.
//!
//! ## Core Concepts
//!
//! - **Binding**: a provider or cached value stored under a key.
//! - **Alias**: a second key that resolves, one hop, to a binding key.
//! - **Descriptor**: constructor metadata (parameter names, declared types
//!   and defaults) standing in for runtime reflection.
//! - **Global Container**: a process-wide instance, accessible via `global()`
//!   when the `global` feature is enabled (it is by default).
//!
//! ## Quick Start
//!
//! ```
//! use keystone_ioc::{Arguments, Container, Parameter, TypeDescriptor};
//!
//! struct Mailer {
//!   transport: String,
//!   retries: u32,
//! }
//!
//! let container = Container::new();
//! container.set("transport", String::from("smtp"));
//!
//! container.register_type(
//!   TypeDescriptor::new("Mailer", |args| {
//!     Ok(Mailer {
//!       transport: args.cloned("transport")?,
//!       retries: args.cloned("retries")?,
//!     })
//!   })
//!   .param(Parameter::builtin("transport", "string"))
//!   .param(Parameter::builtin("retries", "int").with_default(3u32)),
//! );
//!
//! let mailer = container
//!   .make("Mailer", Arguments::new())
//!   .unwrap()
//!   .downcast::<Mailer>()
//!   .unwrap();
//!
//! assert_eq!(mailer.transport, "smtp");
//! assert_eq!(mailer.retries, 3);
//! ```

mod container;
mod core;
mod descriptor;
mod error;
#[cfg(feature = "global")]
mod global;
mod macros;

pub use crate::core::Value;
pub use container::Container;
pub use descriptor::{Arguments, Injectable, ParamType, Parameter, ResolvedArgs, TypeDescriptor};
pub use error::{BoxError, ContainerError, Error, Result};
#[cfg(feature = "global")]
pub use global::{global, replace_global, reset_global};
