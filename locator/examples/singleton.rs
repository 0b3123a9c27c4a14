use fibre_locator::{global, inject, Reassignment};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing_subscriber::EnvFilter;

// A simple service that gets a unique ID upon creation.
#[derive(Debug)]
struct RequestTracker {
  id: usize,
}

impl Clone for RequestTracker {
  fn clone(&self) -> Self {
    println!("Duplicating FACTORY RequestTracker...");
    RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }
  }
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .init();

  // --- Lazy Singleton Registration ---
  // This recipe will only be called ONCE, on the first request.
  global()
    .register_lazy_singleton_with_key(
      "singleton_tracker",
      || {
        println!("Creating LAZY SINGLETON RequestTracker...");
        RequestTracker {
          id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
        }
      },
      Reassignment::Forbid,
    )
    .unwrap();

  // --- Factory Registration ---
  // Each consumer gets its own duplicate of the seed.
  global()
    .register_factory_with_key(
      "factory_tracker",
      RequestTracker { id: usize::MAX },
      Reassignment::Forbid,
    )
    .unwrap();

  println!("--- Resolving Singletons ---");
  let s1 = inject!(RequestTracker, "singleton_tracker").get();
  let s2 = inject!(RequestTracker, "singleton_tracker").get();
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");
  println!("Singleton instances are the same pointer, as expected.\n");

  println!("--- Resolving Factories ---");
  let first = inject!(RequestTracker, "factory_tracker");
  let second = inject!(RequestTracker, "factory_tracker");
  let f1 = first.get();
  let f2 = second.get();
  println!("Factory 1 ID: {}, Factory 2 ID: {}", f1.id, f2.id);
  assert!(!Arc::ptr_eq(&f1, &f2), "Factory objects should differ per consumer");
  assert!(
    Arc::ptr_eq(&f1, &first.get()),
    "A consumer keeps its own factory object"
  );
  println!("Each consumer holds its own factory object, as expected.");
}
