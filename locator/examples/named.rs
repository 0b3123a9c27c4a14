use fibre_locator::{global, inject, Reassignment};
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

fn main() {
  // --- Registration ---
  // Register both implementations under their own keys.
  global()
    .register_singleton_trait_with_key::<dyn MessageSender>("email", Arc::new(EmailSender), Reassignment::Forbid)
    .unwrap();
  global()
    .register_lazy_singleton_trait_with_key::<dyn MessageSender>("sms", || Arc::new(SmsSender), Reassignment::Forbid)
    .unwrap();

  // A second registration under a taken key is refused.
  let refused = global().register_singleton_trait_with_key::<dyn MessageSender>(
    "email",
    Arc::new(SmsSender),
    Reassignment::Forbid,
  );
  println!("Re-registering 'email': {:?}", refused);
  assert!(refused.is_err());

  // --- Resolution ---
  let email_notifier = inject!(trait MessageSender, "email").get();
  let sms_notifier = inject!(trait MessageSender, "sms").get();

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
}
