//! Consumer identities.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONSUMER_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque token identifying one access point into a [`Locator`](crate::Locator).
///
/// Ids are drawn from a process-wide counter and are never reused, so an id
/// that has been released stays released for the life of the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerId(u64);

impl ConsumerId {
  /// Generates a fresh, process-unique id.
  pub fn new() -> Self {
    Self(NEXT_CONSUMER_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl Default for ConsumerId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for ConsumerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ConsumerId({})", self.0)
  }
}

impl fmt::Display for ConsumerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}
