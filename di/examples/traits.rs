use fibre_di::{resolve, Container};

// --- Abstraction and Implementations ---
trait MessageSender {
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

type Sender = Box<dyn MessageSender>;

fn main() {
  let mut container = Container::new();

  // --- Registration ---
  // Both implementations are stored behind the same boxed trait object type.
  container.register("email", |_| -> Sender { Box::new(EmailSender) });
  container.register("sms", |_| -> Sender { Box::new(SmsSender) });

  // The abstraction's name points at the implementation the app should use.
  container.declare_interface("MessageSender");
  container.alias("MessageSender", "email");

  // --- Resolution ---
  let default_notifier = resolve!(container, Sender, "MessageSender");
  let sms_notifier = resolve!(container, Sender, "sms");

  let result1 = default_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));

  // Without the alias, the interface itself cannot be built.
  container.unregister("MessageSender");
  match container.get_any("MessageSender") {
    Err(err) => println!("Expected failure: {}", err),
    Ok(_) => unreachable!("an interface is not instantiable"),
  }
}
