use fibre_locator::{
  inject, locator, maybe_inject, reset, test_down, test_up, LocatorKind, Reassignment,
};

#[derive(Debug)]
struct PaymentGateway {
  endpoint: &'static str,
}

fn checkout() -> String {
  // Application code never names a locator; handles follow test mode.
  let gateway = inject!(PaymentGateway).get();
  format!("charging via {}", gateway.endpoint)
}

fn main() {
  tracing_subscriber::fmt().with_env_filter("debug").init();

  locator(LocatorKind::Default)
    .register_singleton(
      PaymentGateway {
        endpoint: "https://pay.example.com",
      },
      Reassignment::Forbid,
    )
    .unwrap();

  // --- Production ---
  println!("{}", checkout());
  assert!(checkout().contains("pay.example.com"));

  // --- Under Test ---
  test_up();
  locator(LocatorKind::Test)
    .register_singleton(
      PaymentGateway {
        endpoint: "in-memory stub",
      },
      Reassignment::Forbid,
    )
    .unwrap();
  println!("{}", checkout());
  assert!(checkout().contains("stub"));

  // Tearing the test registrations down leaves production alone.
  reset(&[LocatorKind::Test]);
  assert!(maybe_inject!(PaymentGateway).get().is_none());
  test_down();

  println!("{}", checkout());
  assert!(checkout().contains("pay.example.com"));
}
