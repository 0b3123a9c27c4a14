//! The process-wide locator instances and the switches that govern them.

use crate::locator::Locator;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};

/// Selects one of the two process-wide locators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
  /// The production registry.
  Default,
  /// The registry accessors use while [test mode](test_up) is on.
  Test,
}

impl LocatorKind {
  pub const ALL: [LocatorKind; 2] = [LocatorKind::Default, LocatorKind::Test];

  fn index(self) -> usize {
    match self {
      LocatorKind::Default => 0,
      LocatorKind::Test => 1,
    }
  }
}

// Both instances are created together on first access.
static LOCATORS: Lazy<[Locator; 2]> =
  Lazy::new(|| [Locator::with_label("default"), Locator::with_label("test")]);

static TEST_MODE: AtomicBool = AtomicBool::new(false);
static AUTO_TEARDOWN: AtomicBool = AtomicBool::new(true);

/// Provides a reference to one of the process-wide locators.
pub fn locator(kind: LocatorKind) -> &'static Locator {
  &LOCATORS[kind.index()]
}

/// Provides a reference to the default locator.
///
/// # Examples
///
/// ```
/// use fibre_locator::{global, Reassignment};
///
/// fn register_services() {
///   global()
///     .register_singleton(String::from("Hello from global!"), Reassignment::Allow)
///     .unwrap();
/// }
/// ```
pub fn global() -> &'static Locator {
  locator(LocatorKind::Default)
}

/// The locator accessors target right now: the test locator while test mode
/// is on, the default locator otherwise.
pub fn active() -> &'static Locator {
  if is_test_mode() {
    locator(LocatorKind::Test)
  } else {
    locator(LocatorKind::Default)
  }
}

/// Routes accessors to the [`LocatorKind::Test`] instance.
pub fn test_up() {
  TEST_MODE.store(true, Ordering::SeqCst);
  tracing::debug!("locator test mode on");
}

/// Routes accessors back to the [`LocatorKind::Default`] instance.
pub fn test_down() {
  TEST_MODE.store(false, Ordering::SeqCst);
  tracing::debug!("locator test mode off");
}

pub fn is_test_mode() -> bool {
  TEST_MODE.load(Ordering::SeqCst)
}

/// Drops every registration of the selected locators; an empty selection
/// resets both.
pub fn reset(kinds: &[LocatorKind]) {
  let selected: &[LocatorKind] = if kinds.is_empty() { &LocatorKind::ALL } else { kinds };
  for kind in selected {
    locator(*kind).reset();
  }
}

pub fn reset_all() {
  reset(&LocatorKind::ALL);
}

/// Enables or disables removing a singleton registration once its last
/// active consumer releases it. Enabled by default; applies to every locator
/// in the process.
pub fn set_auto_teardown(enabled: bool) {
  AUTO_TEARDOWN.store(enabled, Ordering::SeqCst);
  tracing::debug!(enabled, "locator auto-teardown changed");
}

pub fn auto_teardown_enabled() -> bool {
  AUTO_TEARDOWN.load(Ordering::SeqCst)
}
