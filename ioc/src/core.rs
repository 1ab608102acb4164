//! Core, non-public data structures for the container.

use crate::container::Container;
use crate::error::{BoxError, ContainerError};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;

/// A resolved value. Reference identity is observable through `Arc::ptr_eq`.
pub type Value = Arc<dyn Any + Send + Sync>;

pub(crate) type Provider = Arc<dyn Fn(&Container) -> Result<Value, BoxError> + Send + Sync>;

thread_local! {
  // Types currently being constructed by `make` on this thread.
  static CONSTRUCTING: RefCell<HashSet<ConstructionKey>> = RefCell::new(HashSet::new());
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct ConstructionKey {
  // Address of the owning container, so two containers never collide.
  container: usize,
  type_name: String,
}

/// An RAII guard marking a type as "under construction" on this thread.
///
/// Entering a type that is already under construction on the same container
/// means the constructor graph is cyclic. The guard removes its entry when
/// dropped, including on early returns with an error.
pub(crate) struct ResolutionGuard {
  key: ConstructionKey,
}

impl ResolutionGuard {
  pub(crate) fn enter(container: &Container, type_name: &str) -> Result<Self, ContainerError> {
    let key = ConstructionKey {
      container: container as *const Container as usize,
      type_name: type_name.to_owned(),
    };
    let inserted = CONSTRUCTING.with(|stack| stack.borrow_mut().insert(key.clone()));
    if !inserted {
      return Err(ContainerError::CircularDependency {
        type_name: type_name.to_owned(),
      });
    }
    Ok(Self { key })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    CONSTRUCTING.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}

/// A stored entry in the binding table.
///
/// The kind is fixed when the binding is created; rebinding a key replaces
/// the whole entry.
#[derive(Clone)]
pub(crate) enum Binding {
  /// Re-invoked on every lookup.
  Normal(Provider),
  /// Evaluated once at registration, returned as-is forever after.
  Singleton(Value),
}

impl Binding {
  pub(crate) fn is_singleton(&self) -> bool {
    matches!(self, Binding::Singleton(_))
  }
}
