use keystone_ioc::{arguments, BoxError, Container, Injectable, Parameter, ResolvedArgs};
use tracing_subscriber::EnvFilter;

struct Database {
  dsn: String,
}

impl Injectable for Database {
  const TYPE_NAME: &'static str = "Database";

  fn parameters() -> Vec<Parameter> {
    vec![Parameter::builtin("dsn", "string").with_default(String::from("sqlite::memory:"))]
  }

  fn construct(args: &ResolvedArgs) -> Result<Self, BoxError> {
    Ok(Database {
      dsn: args.cloned("dsn")?,
    })
  }
}

struct UserRepository {
  db: std::sync::Arc<Database>,
  table: String,
}

impl Injectable for UserRepository {
  const TYPE_NAME: &'static str = "UserRepository";

  fn parameters() -> Vec<Parameter> {
    vec![
      Parameter::of::<Database>("db"),
      Parameter::untyped("table").with_default(String::from("users")),
    ]
  }

  fn construct(args: &ResolvedArgs) -> Result<Self, BoxError> {
    Ok(UserRepository {
      db: args.get("db")?,
      table: args.cloned("table")?,
    })
  }
}

fn main() -> Result<(), keystone_ioc::Error> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::new("keystone_ioc=trace"))
    .init();

  let container = Container::new();
  container.register::<Database>();

  // `dsn` is looked up by name; the binding wins over the declared default.
  container.set("dsn", String::from("postgres://localhost/app"));

  let repo = container.make_as::<UserRepository>(arguments! {})?;
  println!("{} @ {}", repo.table, repo.db.dsn);
  assert_eq!(repo.db.dsn, "postgres://localhost/app");
  assert_eq!(repo.table, "users");

  // Explicit arguments win over everything else.
  let repo = container.make_as::<UserRepository>(arguments! { "table" => String::from("admins") })?;
  assert_eq!(repo.table, "admins");

  Ok(())
}
