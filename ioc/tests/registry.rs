use keystone_ioc::{Container, Error, Value};
use pretty_assertions::assert_eq;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::thread;

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

#[derive(Debug)]
struct ProviderFailure;

impl std::fmt::Display for ProviderFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("provider failure")
  }
}

impl std::error::Error for ProviderFailure {}

// --- Binding Registry Tests ---

#[test]
fn test_unbound_key_is_absent_and_not_found() {
  let container = Container::new();

  assert!(!container.has("missing"));
  let err = container.get("missing").unwrap_err();
  assert!(err.is_not_found());
  assert!(err.to_string().contains("missing"));
}

#[test]
fn test_normal_binding_builds_fresh_values() {
  // Arrange
  let container = Container::new();
  container.bind("service", |_| SimpleService { id: 7 });

  // Act
  let r1 = container.get_as::<SimpleService>("service").unwrap();
  let r2 = container.get_as::<SimpleService>("service").unwrap();

  // Assert
  assert_eq!(*r1, *r2);
  assert!(!Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_bind_does_not_invoke_provider() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);
  let container = Container::new();

  container.bind("lazy", |_| CALLS.fetch_add(1, Ordering::SeqCst));
  assert_eq!(CALLS.load(Ordering::SeqCst), 0);

  container.get("lazy").unwrap();
  container.get("lazy").unwrap();
  assert_eq!(CALLS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_singleton_is_evaluated_eagerly_and_once() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  // Arrange
  let container = Container::new();
  container.singleton("service", |_| {
    CALLS.fetch_add(1, Ordering::SeqCst);
    SimpleService { id: 101 }
  });

  // The provider already ran during registration.
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);

  // Act
  let r1 = container.get_as::<SimpleService>("service").unwrap();
  let r2 = container.get_as::<SimpleService>("service").unwrap();

  // Assert
  assert_eq!(r1.id, 101);
  assert!(Arc::ptr_eq(&r1, &r2));
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_singleton_provider_receives_container() {
  let container = Container::new();
  container.set("base", 40u32);

  container.singleton("answer", |c| *c.get_as::<u32>("base").unwrap() + 2);

  assert_eq!(*container.get_as::<u32>("answer").unwrap(), 42);
}

#[test]
fn test_failing_try_singleton_stores_nothing() {
  let container = Container::new();

  let result = container.try_singleton("broken", |_| Err::<u32, _>(ProviderFailure));

  let err = result.unwrap_err();
  assert!(err.is_container_error());
  assert!(!container.has("broken"));
}

#[test]
fn test_is_singleton_tracks_rebinding() {
  let container = Container::new();

  container.bind("key", |_| 1u8);
  assert!(!container.is_singleton("key").unwrap());

  container.singleton("key", |_| 2u8);
  assert!(container.is_singleton("key").unwrap());

  container.bind("key", |_| 3u8);
  assert!(!container.is_singleton("key").unwrap());
  assert_eq!(*container.get_as::<u8>("key").unwrap(), 3);
}

#[test]
fn test_is_singleton_on_missing_key_is_not_found() {
  let container = Container::new();

  let err = container.is_singleton("ghost").unwrap_err();
  assert!(matches!(err, Error::NotFound { ref key } if key == "ghost"));
}

#[test]
fn test_remove_deletes_binding() {
  let container = Container::new();
  container.singleton("key", |_| "value");

  container.remove("key");

  assert!(!container.has("key"));
  assert!(container.get("key").unwrap_err().is_not_found());
  // Removing again is a no-op.
  container.remove("key");
}

#[test]
fn test_instance_is_stored_as_singleton() {
  let container = Container::new();
  let value: Value = Arc::new(String::from("shared"));

  container.instance("shared", Arc::clone(&value));

  assert!(container.is_singleton("shared").unwrap());
  assert!(Arc::ptr_eq(&container.get("shared").unwrap(), &value));
}

// --- Alias Tests ---

#[test]
fn test_alias_resolves_dynamically() {
  // Arrange
  let container = Container::new();
  container.bind("db.primary", |_| String::from("first"));
  container.alias("db.primary", "db");

  // Act & Assert
  assert!(container.has("db"));
  assert_eq!(*container.get_as::<String>("db").unwrap(), "first");

  // Rebinding the target is visible through the alias.
  container.bind("db.primary", |_| String::from("second"));
  assert_eq!(*container.get_as::<String>("db").unwrap(), "second");
}

#[test]
fn test_alias_to_singleton_returns_same_instance() {
  let container = Container::new();
  container.singleton("config", |_| SimpleService { id: 1 });
  container.alias("config", "settings");

  let direct = container.get("config").unwrap();
  let aliased = container.get("settings").unwrap();

  assert!(Arc::ptr_eq(&direct, &aliased));
  assert!(container.is_singleton("settings").unwrap());
}

#[test]
fn test_alias_creation_is_not_validated() {
  let container = Container::new();

  container.alias("not.yet.bound", "later");
  assert!(container.has("later"));
  assert!(container.get("later").unwrap_err().is_not_found());

  container.set("not.yet.bound", 5i64);
  assert_eq!(*container.get_as::<i64>("later").unwrap(), 5);
}

#[test]
fn test_dangling_alias_reports_requested_key() {
  let container = Container::new();
  container.set("target", 1u8);
  container.alias("target", "shortcut");

  container.remove("target");

  // The alias entry itself survives removal of its target.
  assert!(container.has("shortcut"));
  let err = container.get("shortcut").unwrap_err();
  assert!(matches!(err, Error::NotFound { ref key } if key == "shortcut"));
}

#[test]
fn test_aliases_are_single_hop() {
  let container = Container::new();
  container.set("a", 1u8);
  container.alias("a", "b");
  container.alias("b", "c");

  // "c" resolves to the key "b", which has no binding of its own.
  assert!(container.get("c").unwrap_err().is_not_found());
}

// --- Lookup Tests ---

#[test]
fn test_lookup_distinguishes_missing_from_failing() {
  let container = Container::new();
  container.try_bind("broken", |_| Err::<u8, _>(ProviderFailure));

  assert!(container.lookup("missing").unwrap().is_none());
  let err = container.lookup("broken").unwrap_err();
  assert!(err.is_container_error());
  assert!(std::error::Error::source(&err)
    .map(|source| source.to_string().contains("provider failure"))
    .unwrap_or(false));
}

#[test]
fn test_get_as_reports_type_mismatch() {
  let container = Container::new();
  container.set("port", 8080u16);

  let err = container.get_as::<String>("port").unwrap_err();
  assert!(err.is_container_error());
}

#[test]
fn test_provider_can_resolve_other_bindings() {
  let container = Container::new();
  container.set("host", String::from("localhost"));
  container.bind("url", |c| format!("http://{}", c.get_as::<String>("host").unwrap()));

  assert_eq!(*container.get_as::<String>("url").unwrap(), "http://localhost");
}

#[test]
fn test_provider_can_rebind_its_own_key() {
  // No table lock is held while a provider runs.
  let container = Container::new();
  container.bind("self.replacing", |c| {
    c.set("self.replacing", 2u8);
    1u8
  });

  assert_eq!(*container.get_as::<u8>("self.replacing").unwrap(), 1);
  assert_eq!(*container.get_as::<u8>("self.replacing").unwrap(), 2);
}

// --- Index-Style Access ---

#[test]
fn test_set_returns_exact_value_and_unset_removes_it() {
  let container = Container::new();

  container.set("raw", String::from("exact"));
  assert!(container.offset_exists("raw"));
  let first = container.offset_get("raw").unwrap();
  let second = container.offset_get("raw").unwrap();

  assert_eq!(*first.downcast_ref::<String>().unwrap(), "exact");
  assert!(Arc::ptr_eq(&first, &second));
  assert!(!container.is_singleton("raw").unwrap());

  container.unset("raw");
  assert!(!container.offset_exists("raw"));
  assert!(!container.has("raw"));
  assert!(container.offset_get("raw").unwrap_err().is_not_found());
}

// --- Concurrency ---

#[test]
fn test_concurrent_registration_and_resolution() {
  let container = Container::new();
  container.singleton("common", |_| 42_i32);

  thread::scope(|s| {
    for i in 0..10usize {
      let container = &container;
      s.spawn(move || {
        container.set(format!("thread_service_{}", i), i);

        for _ in 0..100 {
          assert_eq!(*container.get_as::<i32>("common").unwrap(), 42);
        }

        let mine = container.get_as::<usize>(&format!("thread_service_{}", i)).unwrap();
        assert_eq!(*mine, i);
      });
    }
  });

  assert_eq!(*container.get_as::<usize>("thread_service_5").unwrap(), 5);
}
