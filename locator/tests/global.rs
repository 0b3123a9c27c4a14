//! Tests for the process-wide locators, test mode and the auto-teardown switch.
//! They share global state, so every test runs serially from a clean slate.

use fibre_locator::{
  active, auto_teardown_enabled, global, is_test_mode, locator, reset, reset_all,
  set_auto_teardown, test_down, test_up, ConsumerId, LocatorError, LocatorKind, Reassignment,
  ServiceKey,
};
use serial_test::serial;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Widget {
  id: u32,
}

fn clean_slate() {
  test_down();
  set_auto_teardown(true);
  reset_all();
}

#[test]
#[serial]
fn test_widget_lifecycle_end_to_end() {
  clean_slate();

  // Arrange
  global()
    .register_singleton_with_key("Widget", Widget { id: 174 }, Reassignment::Forbid)
    .unwrap();
  let (one, two) = (ConsumerId::new(), ConsumerId::new());

  // Act & Assert: both accessors share the instance.
  let first = global().get_service::<Widget>(one).unwrap();
  let second = global().get_service::<Widget>(two).unwrap();
  assert_eq!(first.id, 174);
  assert!(Arc::ptr_eq(&first, &second));

  // Releasing one consumer only affects that consumer.
  global().unregister_consumer("Widget", one);
  assert!(global().get_service::<Widget>(one).is_none());
  assert_eq!(global().get_service::<Widget>(two).unwrap().id, 174);

  // Releasing the last consumer frees the key.
  global().unregister_consumer("Widget", two);
  assert!(!global().contains_key("Widget"));
  global()
    .register_singleton(Widget { id: 175 }, Reassignment::Forbid)
    .unwrap();
  assert_eq!(global().get_service::<Widget>(ConsumerId::new()).unwrap().id, 175);
}

#[test]
#[serial]
fn test_disabled_auto_teardown_keeps_empty_handlers() {
  clean_slate();
  set_auto_teardown(false);
  assert!(!auto_teardown_enabled());

  global()
    .register_singleton(Widget { id: 1 }, Reassignment::Forbid)
    .unwrap();
  let consumer = ConsumerId::new();
  global().get_service::<Widget>(consumer).unwrap();
  global().unregister_consumer("Widget", consumer);

  // Zero references, but still registered until removed explicitly.
  assert!(global().contains_type::<Widget>());
  assert_eq!(global().consumer_count("Widget"), Some(0));
  assert_eq!(
    global().register_singleton(Widget { id: 2 }, Reassignment::Forbid),
    Err(LocatorError::ForbiddenReassignment {
      key: ServiceKey::of::<Widget>()
    })
  );
  assert!(global().get_service::<Widget>(consumer).is_none());
  assert_eq!(global().get_service::<Widget>(ConsumerId::new()).unwrap().id, 1);

  assert!(global().unregister_type::<Widget>());
  set_auto_teardown(true);
}

#[test]
#[serial]
fn test_reset_test_leaves_default_untouched() {
  clean_slate();

  // Arrange
  let consumer = ConsumerId::new();
  locator(LocatorKind::Default)
    .register_factory(Widget { id: 1 }, Reassignment::Forbid)
    .unwrap();
  locator(LocatorKind::Test)
    .register_factory(Widget { id: 2 }, Reassignment::Forbid)
    .unwrap();
  let production = locator(LocatorKind::Default)
    .get_service::<Widget>(consumer)
    .unwrap();
  locator(LocatorKind::Test)
    .get_service::<Widget>(consumer)
    .unwrap();

  // Act
  reset(&[LocatorKind::Test]);

  // Assert
  assert!(locator(LocatorKind::Test).is_empty());
  assert_eq!(locator(LocatorKind::Default).consumer_count("Widget"), Some(1));
  let again = locator(LocatorKind::Default)
    .get_service::<Widget>(consumer)
    .unwrap();
  assert!(Arc::ptr_eq(&production, &again));
}

#[test]
#[serial]
fn test_reset_default_leaves_test_untouched() {
  clean_slate();

  let consumer = ConsumerId::new();
  locator(LocatorKind::Default)
    .register_singleton(Widget { id: 1 }, Reassignment::Forbid)
    .unwrap();
  locator(LocatorKind::Test)
    .register_lazy_singleton(|| Widget { id: 2 }, Reassignment::Forbid)
    .unwrap();
  let double = locator(LocatorKind::Test)
    .get_service::<Widget>(consumer)
    .unwrap();

  reset(&[LocatorKind::Default]);

  assert!(locator(LocatorKind::Default).is_empty());
  let again = locator(LocatorKind::Test)
    .get_service::<Widget>(consumer)
    .unwrap();
  assert!(Arc::ptr_eq(&double, &again));
  assert_eq!(again.id, 2);
}

#[test]
#[serial]
fn test_empty_reset_selection_resets_both() {
  clean_slate();

  for kind in LocatorKind::ALL {
    locator(kind)
      .register_singleton(Widget { id: 3 }, Reassignment::Forbid)
      .unwrap();
  }

  reset(&[]);

  assert!(locator(LocatorKind::Default).is_empty());
  assert!(locator(LocatorKind::Test).is_empty());
}

#[test]
#[serial]
fn test_test_mode_switches_the_active_locator() {
  clean_slate();

  locator(LocatorKind::Default)
    .register_singleton(Widget { id: 100 }, Reassignment::Forbid)
    .unwrap();
  locator(LocatorKind::Test)
    .register_singleton(Widget { id: 200 }, Reassignment::Forbid)
    .unwrap();
  let consumer = ConsumerId::new();

  assert!(!is_test_mode());
  assert_eq!(active().label(), "default");
  assert_eq!(active().get_service::<Widget>(consumer).unwrap().id, 100);

  test_up();
  assert!(is_test_mode());
  assert_eq!(active().label(), "test");
  assert_eq!(active().get_service::<Widget>(consumer).unwrap().id, 200);

  test_down();
  assert_eq!(active().get_service::<Widget>(consumer).unwrap().id, 100);
}

#[test]
#[serial]
fn test_global_is_the_default_locator() {
  clean_slate();

  global()
    .register_singleton_with_key("marker", 1u8, Reassignment::Forbid)
    .unwrap();

  assert!(locator(LocatorKind::Default).contains_key("marker"));
  assert!(!locator(LocatorKind::Test).contains_key("marker"));
}
