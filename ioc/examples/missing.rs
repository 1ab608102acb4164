use keystone_ioc::{Arguments, Container, ParamType, Parameter, TypeDescriptor};

struct Report;

fn main() {
  let container = Container::new();

  // A key nobody registered.
  match container.get("does.not.exist") {
    Ok(_) => unreachable!("nothing was bound"),
    Err(err) => println!("lookup failed as expected: {}", err),
  }

  // A type whose only parameter is a union can never be resolved automatically.
  container.register_type(
    TypeDescriptor::new("Report", |_| Ok(Report))
      .param(Parameter::new("sink", ParamType::union(["FileSink", "HttpSink"]))),
  );
  match container.make("Report", Arguments::new()) {
    Ok(_) => unreachable!("union parameters are never resolved"),
    Err(err) => println!("make failed as expected: {}", err),
  }
}
