//! Public macros for ergonomic resolution against the global container.

/// Resolves a key from the global container.
///
/// `resolve!("key")` yields the raw value; `resolve!(Type, "key")` downcasts
/// it to `Arc<Type>`.
///
/// # Panics
///
/// Panics if the key cannot be resolved or has the wrong type. For a
/// non-panicking version, use `global().get(...)` or `global().get_as(...)`.
///
/// # Examples
///
/// ```
/// use keystone_ioc::{global, resolve};
///
/// global().singleton("greeting", |_| String::from("hello"));
///
/// let greeting = resolve!(String, "greeting");
/// assert_eq!(*greeting, "hello");
/// ```
#[cfg(feature = "global")]
#[macro_export]
macro_rules! resolve {
  ($type:ty, $key:expr) => {
    $crate::global()
      .get_as::<$type>($key)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service '{}' as {}: {}",
          $key,
          std::any::type_name::<$type>(),
          err
        )
      })
  };

  ($key:expr) => {
    $crate::global()
      .get($key)
      .unwrap_or_else(|err| panic!("Failed to resolve required service '{}': {}", $key, err))
  };
}

/// Builds an [`Arguments`](crate::Arguments) map from `name => value` pairs.
///
/// ```
/// use keystone_ioc::arguments;
///
/// let args = arguments! { "host" => String::from("localhost"), "port" => 5432u16 };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! arguments {
  () => {
    $crate::Arguments::new()
  };
  ($($name:expr => $value:expr),+ $(,)?) => {
    $crate::Arguments::new()$(.with($name, $value))+
  };
}

/// Calls `make` on the global container.
///
/// `make!("Type")` passes no explicit arguments;
/// `make!("Type", { "name" => value, ... })` passes the given ones.
/// Returns the `Result` from [`Container::make`](crate::Container::make).
#[cfg(feature = "global")]
#[macro_export]
macro_rules! make {
  ($type_name:expr, { $($name:expr => $value:expr),* $(,)? }) => {
    $crate::global().make($type_name, $crate::arguments!($($name => $value),*))
  };
  ($type_name:expr) => {
    $crate::global().make($type_name, $crate::Arguments::new())
  };
}
