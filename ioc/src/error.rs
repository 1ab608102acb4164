//! Error types returned by the container.

use thiserror::Error;

/// A boxed error produced by user code (providers and constructors).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error returned by container lookups and construction.
///
/// There are exactly two kinds: a key that has no binding, and everything
/// else that can go wrong while resolving or building a value.
#[derive(Debug, Error)]
pub enum Error {
  /// The requested key (after alias resolution) has no binding.
  /// Always carries the key as it was originally requested.
  #[error("no binding found for key '{key}'")]
  NotFound { key: String },

  #[error(transparent)]
  Container(#[from] ContainerError),
}

impl Error {
  pub(crate) fn not_found(key: &str) -> Self {
    Error::NotFound {
      key: key.to_owned(),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::NotFound { .. })
  }

  pub fn is_container_error(&self) -> bool {
    matches!(self, Error::Container(_))
  }
}

/// Failures raised while resolving providers or constructing types.
#[derive(Debug, Error)]
pub enum ContainerError {
  /// The type is unknown, abstract, or otherwise has no constructor.
  #[error("type '{type_name}' cannot be instantiated")]
  NotInstantiable { type_name: String },

  /// Union-typed parameters are never resolved automatically.
  #[error("cannot resolve union-typed parameter '{parameter}' of '{type_name}'")]
  UnionParameter { type_name: String, parameter: String },

  /// A constructor parameter could not be resolved.
  #[error("failed to resolve parameter '{parameter}' of '{type_name}'")]
  Dependency {
    type_name: String,
    parameter: String,
    #[source]
    source: Box<Error>,
  },

  /// A provider returned an error while being invoked.
  #[error("provider for '{key}' failed")]
  Provider {
    key: String,
    #[source]
    source: BoxError,
  },

  /// The constructor of a described type returned an error.
  #[error("constructor of '{type_name}' failed")]
  Construction {
    type_name: String,
    #[source]
    source: BoxError,
  },

  #[error("value for '{key}' is not a {expected}")]
  TypeMismatch { key: String, expected: &'static str },

  /// A required constructor argument resolved to no value.
  #[error("required argument '{parameter}' resolved to no value")]
  MissingArgument { parameter: String },

  #[error("circular dependency detected while constructing '{type_name}'")]
  CircularDependency { type_name: String },
}
