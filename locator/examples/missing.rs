//! Required versus optional handles when a service was never registered.

use fibre_locator::{global, inject, maybe_inject, Reassignment};
use std::panic;

struct PaymentGateway;

struct FeatureFlags {
  beta_checkout: bool,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let gateway = inject!(PaymentGateway);

  // `try_get` reports the gap as `None` and leaves the caller in charge.
  match gateway.try_get() {
    Some(_) => unreachable!("no gateway was registered"),
    None => println!("try_get: no PaymentGateway registered, falling back to offline mode"),
  }

  // `get` treats a required dependency as a wiring bug and panics.
  let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    let _ = gateway.get();
  }));
  println!("get: panicked = {}", outcome.is_err());

  // An optional handle never panics; absence is part of its contract.
  let flags = maybe_inject!(FeatureFlags);
  let beta = flags.get().is_some_and(|flags| flags.beta_checkout);
  println!("maybe_inject: beta checkout enabled = {}", beta);

  // Once registered, the same handle starts resolving.
  global()
    .register_singleton(FeatureFlags { beta_checkout: true }, Reassignment::Forbid)
    .expect("FeatureFlags is registered once");
  let beta = flags.get().is_some_and(|flags| flags.beta_checkout);
  println!("maybe_inject after registration: beta checkout enabled = {}", beta);
}
