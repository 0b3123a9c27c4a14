//! Accessor handles: one consumer identity per access point.

use crate::consumer::ConsumerId;
use crate::global::active;
use crate::key::ServiceKey;
use crate::locator::Locator;
use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A handle to a required service.
///
/// The handle generates its [`ConsumerId`] when it is constructed and keeps it
/// for its whole life, so repeated reads of a factory registration return the
/// same per-consumer object. Reads go to the [active](crate::active) locator
/// unless a locator is passed explicitly.
///
/// # Examples
///
/// ```
/// use fibre_locator::{global, Inject, Reassignment};
///
/// struct Clock { offset: i64 }
///
/// global().register_singleton(Clock { offset: 3 }, Reassignment::Allow).unwrap();
///
/// let clock: Inject<Clock> = Inject::new();
/// assert_eq!(clock.get().offset, 3);
/// ```
pub struct Inject<T: ?Sized> {
  consumer: ConsumerId,
  key: ServiceKey,
  _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Any + Send + Sync> Inject<T> {
  /// Creates a handle for the service registered under the key derived from `T`.
  pub fn new() -> Self {
    Self::with_key(ServiceKey::of::<T>())
  }

  pub fn with_key(key: impl Into<ServiceKey>) -> Self {
    Self {
      consumer: ConsumerId::new(),
      key: key.into(),
      _marker: PhantomData,
    }
  }

  /// Resolves the service from the active locator.
  ///
  /// # Panics
  ///
  /// Panics if the service cannot be resolved. Use [`try_get`](Self::try_get)
  /// for a non-panicking version.
  pub fn get(&self) -> Arc<T> {
    self.get_in(active())
  }

  /// Resolves the service from `locator`.
  ///
  /// # Panics
  ///
  /// Panics if the service cannot be resolved.
  pub fn get_in(&self, locator: &Locator) -> Arc<T> {
    self.try_get_in(locator).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required service for key {}: {}",
        self.key,
        type_name::<T>()
      )
    })
  }

  pub fn try_get(&self) -> Option<Arc<T>> {
    self.try_get_in(active())
  }

  pub fn try_get_in(&self, locator: &Locator) -> Option<Arc<T>> {
    locator.get_service_with_key(&self.key, self.consumer)
  }

  pub fn consumer(&self) -> ConsumerId {
    self.consumer
  }

  pub fn key(&self) -> &ServiceKey {
    &self.key
  }
}

impl<T: ?Sized + Any + Send + Sync> Default for Inject<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Inject")
      .field("key", &self.key)
      .field("consumer", &self.consumer)
      .finish()
  }
}

/// A handle to an optional service that can give its claim back.
///
/// Reads return `None` instead of panicking. [`release`](Self::release)
/// unregisters this handle's consumer; afterwards every read returns `None`,
/// and a singleton registration with no active consumers left may be torn
/// down.
///
/// # Examples
///
/// ```
/// use fibre_locator::{Locator, MaybeInject, Reassignment};
///
/// let locator = Locator::new();
/// locator.register_factory(vec![1u8, 2, 3], Reassignment::Allow).unwrap();
///
/// let buffer: MaybeInject<Vec<u8>> = MaybeInject::new();
/// assert_eq!(buffer.get_in(&locator).unwrap().len(), 3);
///
/// buffer.release_in(&locator);
/// assert!(buffer.get_in(&locator).is_none());
/// ```
pub struct MaybeInject<T: ?Sized> {
  consumer: ConsumerId,
  key: ServiceKey,
  _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Any + Send + Sync> MaybeInject<T> {
  pub fn new() -> Self {
    Self::with_key(ServiceKey::of::<T>())
  }

  pub fn with_key(key: impl Into<ServiceKey>) -> Self {
    Self {
      consumer: ConsumerId::new(),
      key: key.into(),
      _marker: PhantomData,
    }
  }

  pub fn get(&self) -> Option<Arc<T>> {
    self.get_in(active())
  }

  pub fn get_in(&self, locator: &Locator) -> Option<Arc<T>> {
    locator.get_service_with_key(&self.key, self.consumer)
  }

  /// Releases this handle's claim on the active locator.
  pub fn release(&self) {
    self.release_in(active());
  }

  pub fn release_in(&self, locator: &Locator) {
    locator.unregister_consumer(&self.key, self.consumer);
  }

  /// Assigning `None` releases the claim; assigning a value does nothing,
  /// since services can only be supplied through registration.
  pub fn assign(&self, value: Option<Arc<T>>) {
    if value.is_none() {
      self.release();
    }
  }

  pub fn consumer(&self) -> ConsumerId {
    self.consumer
  }

  pub fn key(&self) -> &ServiceKey {
    &self.key
  }
}

impl<T: ?Sized + Any + Send + Sync> Default for MaybeInject<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> fmt::Debug for MaybeInject<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MaybeInject")
      .field("key", &self.key)
      .field("consumer", &self.consumer)
      .finish()
  }
}
