use keystone_ioc::Container;
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

type Sender = Arc<dyn MessageSender>;

fn main() -> Result<(), keystone_ioc::Error> {
  let container = Container::new();

  container.singleton("sender.email", |_| -> Sender { Arc::new(EmailSender) });
  container.singleton("sender.sms", |_| -> Sender { Arc::new(SmsSender) });

  // `notifier` follows whatever `sender.email` is bound to at lookup time.
  container.alias("sender.email", "notifier");

  let notifier = container.get_as::<Sender>("notifier")?;
  let result = notifier.send("test@example.com", "Hello from Keystone!");
  println!("{}", result);
  assert!(result.contains("email"));

  // Rebinding the target is visible through the alias.
  container.singleton("sender.email", |_| -> Sender { Arc::new(SmsSender) });
  let notifier = container.get_as::<Sender>("notifier")?;
  let result = notifier.send("+123456789", "Hello again!");
  println!("{}", result);
  assert!(result.contains("SMS"));

  // Removing the target leaves the alias dangling.
  container.remove("sender.email");
  assert!(container.has("notifier"));
  assert!(container.get("notifier").unwrap_err().is_not_found());

  Ok(())
}
