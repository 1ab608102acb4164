//! The process-wide container instance and access functions.

use crate::container::Container;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

// Created on first access in a thread-safe manner. The lock only guards
// swapping the instance, never lookups on it.
static GLOBAL_CONTAINER: Lazy<RwLock<Arc<Container>>> =
  Lazy::new(|| RwLock::new(Arc::new(Container::new())));

/// Provides the process-wide container.
///
/// Every call returns the same instance until it is swapped out with
/// [`replace_global`] or [`reset_global`].
///
/// # Examples
///
/// ```
/// use keystone_ioc::global;
///
/// global().set("app.name", String::from("keystone"));
/// assert!(global().has("app.name"));
/// ```
pub fn global() -> Arc<Container> {
  Arc::clone(&GLOBAL_CONTAINER.read())
}

/// Installs `container` as the process-wide instance and returns the
/// previous one. Handles obtained earlier from [`global`] keep pointing at
/// the old instance.
pub fn replace_global(container: Container) -> Arc<Container> {
  let mut slot = GLOBAL_CONTAINER.write();
  std::mem::replace(&mut *slot, Arc::new(container))
}

/// Replaces the process-wide instance with an empty container.
pub fn reset_global() -> Arc<Container> {
  tracing::debug!("resetting global container");
  replace_global(Container::new())
}
