//! The main `Container` struct and its associated methods.

use crate::core::{Binding, Provider, ResolutionGuard, Value};
use crate::descriptor::{Arguments, Injectable, ParamType, Parameter, ResolvedArgs, TypeDescriptor};
use crate::error::{BoxError, ContainerError, Error, Result};
use dashmap::DashMap;
use std::any::{type_name, Any};
use std::sync::Arc;
use tracing::{debug, trace};

/// The dependency-injection container.
///
/// Holds a binding table (key → provider or cached value), an alias table
/// (alias → canonical key) and a table of type descriptors used by
/// [`Container::make`]. All tables are safe to use from several threads, and
/// no table lock is held while user code (providers, constructors) runs, so
/// providers may freely call back into the container.
#[derive(Default)]
pub struct Container {
  bindings: DashMap<String, Binding>,
  aliases: DashMap<String, String>,
  types: DashMap<String, TypeDescriptor>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn store(&self, key: String, binding: Binding) {
    debug!(key = %key, singleton = binding.is_singleton(), "storing binding");
    self.bindings.insert(key, binding);
  }

  fn bind_provider(&self, key: String, provider: Provider) {
    self.store(key, Binding::Normal(provider));
  }

  /// Single-hop alias resolution. Aliases take precedence over bindings.
  fn canonical(&self, key: &str) -> String {
    match self.aliases.get(key) {
      Some(target) => target.value().clone(),
      None => key.to_owned(),
    }
  }

  fn resolve_parameter(
    &self,
    type_name: &str,
    parameter: &Parameter,
    arguments: &mut Arguments,
  ) -> Result<Option<Value>> {
    if let Some(explicit) = arguments.take(parameter.name()) {
      trace!(type_name, parameter = parameter.name(), "using explicit argument");
      return Ok(Some(explicit));
    }

    let dependency = |source: Error| -> Error {
      ContainerError::Dependency {
        type_name: type_name.to_owned(),
        parameter: parameter.name().to_owned(),
        source: Box::new(source),
      }
      .into()
    };

    match parameter.ty() {
      ParamType::Union(_) => Err(
        ContainerError::UnionParameter {
          type_name: type_name.to_owned(),
          parameter: parameter.name().to_owned(),
        }
        .into(),
      ),
      ParamType::Untyped | ParamType::Builtin(_) => {
        self.resolve_scalar(parameter).map_err(dependency)
      }
      ParamType::Class(class) => {
        trace!(type_name, parameter = parameter.name(), class = %class, "building class dependency");
        self.make(class, Arguments::new()).map(Some).map_err(dependency)
      }
    }
  }

  /// Scalars resolve by parameter name: a binding wins, then the declared
  /// default, then no value. Only a missing binding falls back; provider
  /// failures propagate.
  fn resolve_scalar(&self, parameter: &Parameter) -> Result<Option<Value>> {
    match self.lookup(parameter.name())? {
      Some(value) => Ok(Some(value)),
      None => {
        debug!(
          parameter = parameter.name(),
          has_default = parameter.default_value().is_some(),
          "no binding for scalar parameter, falling back"
        );
        Ok(parameter.default_value().cloned())
      }
    }
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Stores a provider that runs on every lookup of `key`.
  ///
  /// Replaces any existing binding for `key`, including a singleton.
  pub fn bind<T, F>(&self, key: impl Into<String>, provider: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    self.bind_provider(
      key.into(),
      Arc::new(move |container: &Container| -> Result<Value, BoxError> {
        Ok(Arc::new(provider(container)))
      }),
    );
  }

  /// Like [`Container::bind`], for providers that can fail.
  pub fn try_bind<T, E, F>(&self, key: impl Into<String>, provider: F)
  where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: Fn(&Container) -> std::result::Result<T, E> + Send + Sync + 'static,
  {
    self.bind_provider(
      key.into(),
      Arc::new(move |container: &Container| -> Result<Value, BoxError> {
        provider(container)
          .map(|value| Arc::new(value) as Value)
          .map_err(Into::into)
      }),
    );
  }

  /// Invokes `provider` immediately and caches its result under `key`.
  ///
  /// Every later lookup returns the identical value.
  pub fn singleton<T, F>(&self, key: impl Into<String>, provider: F)
  where
    T: Any + Send + Sync,
    F: FnOnce(&Container) -> T,
  {
    let value: Value = Arc::new(provider(self));
    self.store(key.into(), Binding::Singleton(value));
  }

  /// Like [`Container::singleton`], for providers that can fail. On failure
  /// nothing is stored.
  pub fn try_singleton<T, E, F>(&self, key: impl Into<String>, provider: F) -> Result<()>
  where
    T: Any + Send + Sync,
    E: Into<BoxError>,
    F: FnOnce(&Container) -> std::result::Result<T, E>,
  {
    let key = key.into();
    match provider(self) {
      Ok(value) => {
        self.store(key, Binding::Singleton(Arc::new(value)));
        Ok(())
      }
      Err(source) => Err(
        ContainerError::Provider {
          key,
          source: source.into(),
        }
        .into(),
      ),
    }
  }

  /// Stores an already-built value as a singleton.
  pub fn instance(&self, key: impl Into<String>, value: Value) {
    self.store(key.into(), Binding::Singleton(value));
  }

  /// Records `alias_key` as another name for `binding_key`.
  ///
  /// `binding_key` is not required to exist, now or later.
  pub fn alias(&self, binding_key: impl Into<String>, alias_key: impl Into<String>) {
    let binding_key = binding_key.into();
    let alias_key = alias_key.into();
    debug!(alias = %alias_key, target = %binding_key, "registering alias");
    self.aliases.insert(alias_key, binding_key);
  }

  /// Removes the binding for `key`. Aliases pointing at it are left in place.
  pub fn remove(&self, key: &str) {
    if self.bindings.remove(key).is_some() {
      debug!(key, "removed binding");
    }
  }

  // --- Lookup ---

  /// True if `key` is either bound or declared as an alias.
  pub fn has(&self, key: &str) -> bool {
    self.bindings.contains_key(key) || self.aliases.contains_key(key)
  }

  pub fn is_singleton(&self, key: &str) -> Result<bool> {
    let canonical = self.canonical(key);
    let singleton = self
      .bindings
      .get(&canonical)
      .map(|binding| binding.is_singleton());
    singleton.ok_or_else(|| Error::not_found(key))
  }

  /// Resolves `key`, returning `Ok(None)` when nothing is bound under it.
  ///
  /// This is the two-branch form of [`Container::get`]: "not bound" is a
  /// value, not an error, while provider failures are still errors.
  pub fn lookup(&self, key: &str) -> Result<Option<Value>> {
    let canonical = self.canonical(key);
    // Clone out of the table so the shard lock is released before the provider runs.
    let binding = match self.bindings.get(&canonical) {
      Some(entry) => entry.value().clone(),
      None => return Ok(None),
    };
    trace!(key, canonical = %canonical, singleton = binding.is_singleton(), "resolving");

    match binding {
      Binding::Singleton(value) => Ok(Some(value)),
      Binding::Normal(provider) => provider(self).map(Some).map_err(|source| {
        ContainerError::Provider {
          key: key.to_owned(),
          source,
        }
        .into()
      }),
    }
  }

  /// Resolves `key` to its value.
  ///
  /// Singletons return their cached value; normal bindings invoke their
  /// provider again on each call.
  pub fn get(&self, key: &str) -> Result<Value> {
    self.lookup(key)?.ok_or_else(|| Error::not_found(key))
  }

  /// Resolves `key` and downcasts the value to `T`.
  pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
    self.get(key)?.downcast::<T>().map_err(|_| {
      ContainerError::TypeMismatch {
        key: key.to_owned(),
        expected: type_name::<T>(),
      }
      .into()
    })
  }

  // --- Index-style access ---

  /// Binds a raw value. Every read returns that same value.
  pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
    let value: Value = Arc::new(value);
    self.bind_provider(
      key.into(),
      Arc::new(move |_: &Container| -> Result<Value, BoxError> { Ok(Arc::clone(&value)) }),
    );
  }

  /// Index-style read; same as [`Container::get`].
  pub fn offset_get(&self, key: &str) -> Result<Value> {
    self.get(key)
  }

  /// Index-style existence check; same as [`Container::has`].
  pub fn offset_exists(&self, key: &str) -> bool {
    self.has(key)
  }

  /// Index-style delete; same as [`Container::remove`].
  pub fn unset(&self, key: &str) {
    self.remove(key);
  }

  // --- Construction ---

  /// Registers (or replaces) the constructor descriptor for a type name.
  pub fn register_type(&self, descriptor: TypeDescriptor) {
    debug!(
      type_name = descriptor.name(),
      parameters = descriptor.parameters().len(),
      instantiable = descriptor.is_instantiable(),
      "registering type"
    );
    self.types.insert(descriptor.name().to_owned(), descriptor);
  }

  pub fn register<T: Injectable>(&self) {
    self.register_type(T::descriptor());
  }

  pub fn has_type(&self, type_name: &str) -> bool {
    self.types.contains_key(type_name)
  }

  /// Builds a fresh instance of `type_name`, resolving its constructor
  /// parameters in declaration order.
  ///
  /// Each parameter is taken from `arguments` if present there. Otherwise
  /// class-typed parameters are built recursively, scalar and untyped ones
  /// are looked up by parameter name (falling back to their default, then to
  /// no value), and union-typed ones fail. Nothing is cached: bindings
  /// registered under `type_name` are not consulted.
  pub fn make(&self, type_name: &str, mut arguments: Arguments) -> Result<Value> {
    let not_instantiable = || ContainerError::NotInstantiable {
      type_name: type_name.to_owned(),
    };
    let descriptor = self
      .types
      .get(type_name)
      .map(|entry| entry.value().clone())
      .ok_or_else(not_instantiable)?;
    let constructor = descriptor.constructor().ok_or_else(not_instantiable)?;

    let _guard = ResolutionGuard::enter(self, type_name)?;
    trace!(type_name, parameters = descriptor.parameters().len(), "making");

    let mut resolved = ResolvedArgs::with_capacity(descriptor.parameters().len());
    for parameter in descriptor.parameters() {
      let value = self.resolve_parameter(type_name, parameter, &mut arguments)?;
      resolved.push(parameter.name(), value);
    }

    constructor(&resolved).map_err(|source| {
      ContainerError::Construction {
        type_name: type_name.to_owned(),
        source,
      }
      .into()
    })
  }

  /// Builds a `T`, registering its descriptor first if the container has
  /// never seen it. Class-typed parameters of `T` must already be registered.
  pub fn make_as<T: Injectable>(&self, arguments: Arguments) -> Result<Arc<T>> {
    if !self.has_type(T::TYPE_NAME) {
      self.register::<T>();
    }
    self.make(T::TYPE_NAME, arguments)?.downcast::<T>().map_err(|_| {
      ContainerError::TypeMismatch {
        key: T::TYPE_NAME.to_owned(),
        expected: type_name::<T>(),
      }
      .into()
    })
  }
}
