//! Constructor descriptors used by `Container::make`.
//!
//! Rust has no runtime reflection, so types that the container should be able
//! to build are described up front: their name, whether they can be
//! instantiated at all, their constructor parameters (name, declared type and
//! optional default), and a constructor closure that receives the resolved
//! parameter values.

use crate::core::Value;
use crate::error::{BoxError, ContainerError};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Constructor = Arc<dyn Fn(&ResolvedArgs) -> Result<Value, BoxError> + Send + Sync>;

/// The declared type of a constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
  /// No type annotation. Resolved by parameter name.
  Untyped,
  /// A primitive or built-in type such as `"string"` or `"int"`.
  /// Resolved by parameter name, like `Untyped`.
  Builtin(&'static str),
  /// Another described type, built recursively through `make`.
  Class(String),
  /// A union of several types. Never resolved automatically.
  Union(Vec<String>),
}

impl ParamType {
  pub fn class(type_name: impl Into<String>) -> Self {
    ParamType::Class(type_name.into())
  }

  pub fn union<I, S>(members: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    ParamType::Union(members.into_iter().map(Into::into).collect())
  }
}

/// A single constructor parameter.
#[derive(Clone)]
pub struct Parameter {
  name: String,
  ty: ParamType,
  default: Option<Value>,
}

impl Parameter {
  pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
    Self {
      name: name.into(),
      ty,
      default: None,
    }
  }

  pub fn untyped(name: impl Into<String>) -> Self {
    Self::new(name, ParamType::Untyped)
  }

  pub fn builtin(name: impl Into<String>, ty: &'static str) -> Self {
    Self::new(name, ParamType::Builtin(ty))
  }

  pub fn class(name: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self::new(name, ParamType::class(type_name))
  }

  /// A parameter whose type is another [`Injectable`] type.
  pub fn of<T: Injectable>(name: impl Into<String>) -> Self {
    Self::new(name, ParamType::class(T::TYPE_NAME))
  }

  /// Sets the value used when scalar resolution finds no binding.
  pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.default = Some(Arc::new(value));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn ty(&self) -> &ParamType {
    &self.ty
  }

  pub fn default_value(&self) -> Option<&Value> {
    self.default.as_ref()
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("ty", &self.ty)
      .field("has_default", &self.default.is_some())
      .finish()
  }
}

/// Describes how to build one named type.
#[derive(Clone)]
pub struct TypeDescriptor {
  name: String,
  parameters: Vec<Parameter>,
  // `None` for abstract types and interfaces.
  constructor: Option<Constructor>,
}

impl TypeDescriptor {
  /// Describes a concrete type built by `constructor`.
  ///
  /// ```
  /// use keystone_ioc::{Parameter, TypeDescriptor};
  ///
  /// struct Greeting {
  ///   text: String,
  /// }
  ///
  /// let descriptor = TypeDescriptor::new("Greeting", |args| {
  ///   Ok(Greeting {
  ///     text: args.cloned::<String>("text")?,
  ///   })
  /// })
  /// .param(Parameter::builtin("text", "string").with_default(String::from("hello")));
  ///
  /// assert!(descriptor.is_instantiable());
  /// ```
  pub fn new<T, F>(name: impl Into<String>, constructor: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      parameters: Vec::new(),
      constructor: Some(Arc::new(move |args: &ResolvedArgs| {
        constructor(args).map(|instance| Arc::new(instance) as Value)
      })),
    }
  }

  /// Describes a type that exists but can never be instantiated directly,
  /// such as a trait or an abstract base.
  pub fn abstract_type(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      parameters: Vec::new(),
      constructor: None,
    }
  }

  /// Appends a constructor parameter. Declaration order is resolution order.
  pub fn param(mut self, parameter: Parameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  pub fn params(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
    self.parameters.extend(parameters);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub fn is_instantiable(&self) -> bool {
    self.constructor.is_some()
  }

  pub(crate) fn constructor(&self) -> Option<&Constructor> {
    self.constructor.as_ref()
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("parameters", &self.parameters)
      .field("instantiable", &self.is_instantiable())
      .finish()
  }
}

/// A Rust type that knows its own constructor descriptor.
///
/// ```
/// use keystone_ioc::{BoxError, Container, Injectable, Parameter, ResolvedArgs};
///
/// struct Config {
///   dsn: String,
/// }
///
/// impl Injectable for Config {
///   const TYPE_NAME: &'static str = "Config";
///
///   fn parameters() -> Vec<Parameter> {
///     vec![Parameter::builtin("dsn", "string").with_default(String::from("sqlite::memory:"))]
///   }
///
///   fn construct(args: &ResolvedArgs) -> Result<Self, BoxError> {
///     Ok(Config { dsn: args.cloned("dsn")? })
///   }
/// }
///
/// let container = Container::new();
/// let config = container.make_as::<Config>(Default::default()).unwrap();
/// assert_eq!(config.dsn, "sqlite::memory:");
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
  /// The name this type is registered and made under.
  const TYPE_NAME: &'static str;

  fn parameters() -> Vec<Parameter> {
    Vec::new()
  }

  fn construct(args: &ResolvedArgs) -> Result<Self, BoxError>;

  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::new(Self::TYPE_NAME, Self::construct).params(Self::parameters())
  }
}

/// Explicit constructor arguments passed to `make`, keyed by parameter name.
///
/// An explicit entry always wins over any other resolution strategy.
#[derive(Clone, Default)]
pub struct Arguments {
  values: HashMap<String, Value>,
}

impl Arguments {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
    self.with_value(name, Arc::new(value))
  }

  pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
    self.values.insert(name.into(), value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
    self.values.insert(name.into(), value)
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  pub(crate) fn take(&mut self, name: &str) -> Option<Value> {
    self.values.remove(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Arguments {
  fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
    }
  }
}

impl fmt::Debug for Arguments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.values.keys()).finish()
  }
}

/// The resolved constructor arguments handed to a constructor closure.
///
/// Every declared parameter has a slot, in declaration order. A slot holding
/// `None` means the parameter resolved to no value at all.
#[derive(Default)]
pub struct ResolvedArgs {
  slots: Vec<(String, Option<Value>)>,
}

impl ResolvedArgs {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: Vec::with_capacity(capacity),
    }
  }

  pub(crate) fn push(&mut self, name: &str, value: Option<Value>) {
    self.slots.push((name.to_owned(), value));
  }

  /// The raw value of a parameter, or `None` if it resolved to nothing
  /// (or no such parameter was declared).
  pub fn value(&self, name: &str) -> Option<&Value> {
    self
      .slots
      .iter()
      .find(|(slot, _)| slot == name)
      .and_then(|(_, value)| value.as_ref())
  }

  /// A parameter that may legitimately be absent.
  pub fn optional<T: Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>, ContainerError> {
    match self.value(name) {
      None => Ok(None),
      Some(value) => Arc::clone(value)
        .downcast::<T>()
        .map(Some)
        .map_err(|_| ContainerError::TypeMismatch {
          key: name.to_owned(),
          expected: type_name::<T>(),
        }),
    }
  }

  /// A parameter that must be present and of type `T`.
  pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
    self
      .optional::<T>(name)?
      .ok_or_else(|| ContainerError::MissingArgument {
        parameter: name.to_owned(),
      })
  }

  pub fn cloned<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T, ContainerError> {
    self.get::<T>(name).map(|value| (*value).clone())
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }
}
