//! The `Locator` registry and its reassignment policy.

use crate::consumer::ConsumerId;
use crate::error::{LocatorError, Result};
use crate::global;
use crate::handler::{HandlerKind, ServiceHandler};
use crate::key::{self, ServiceKey};
use crate::scope::{self, Scope};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// What a registration does when its key is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Reassignment {
  /// Replace the existing registration.
  #[default]
  Allow,
  /// Fail with [`LocatorError::ForbiddenReassignment`] and keep the existing one.
  Forbid,
}

impl Reassignment {
  fn evaluate(self, key: &ServiceKey, occupied: bool) -> Result<()> {
    match self {
      Reassignment::Forbid if occupied => Err(LocatorError::ForbiddenReassignment {
        key: key.clone(),
      }),
      _ => Ok(()),
    }
  }
}

/// A service registry mapping keys to managed objects.
///
/// Each registration pairs a [`ServiceKey`] with a lifecycle: a factory
/// (each consumer gets its own duplicate of a seed), a singleton (every
/// consumer shares one object) or a lazy singleton (one object built on
/// first request). Consumers identify themselves with a [`ConsumerId`] and can
/// release their claim later; a released consumer is never served again by
/// that registration.
///
/// A `Locator` is thread-safe and can be used standalone, but most
/// applications go through the two process-wide instances in
/// [`locator`](crate::locator) and [`active`](crate::active).
///
/// # Examples
///
/// ```
/// use fibre_locator::{ConsumerId, Locator, Reassignment, ServiceKey};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let locator = Locator::new();
/// locator
///   .register_singleton(Database { url: "postgres://localhost".into() }, Reassignment::Forbid)
///   .unwrap();
///
/// let (a, b) = (ConsumerId::new(), ConsumerId::new());
/// let db_a = locator.get_service::<Database>(a).unwrap();
/// let db_b = locator.get_service::<Database>(b).unwrap();
/// assert!(Arc::ptr_eq(&db_a, &db_b));
/// assert_eq!(db_a.url, "postgres://localhost");
///
/// locator.unregister_consumer(ServiceKey::of::<Database>(), a);
/// assert!(locator.get_service::<Database>(a).is_none());
/// assert!(locator.get_service::<Database>(b).is_some());
/// ```
pub struct Locator {
  label: Cow<'static, str>,
  handlers: DashMap<ServiceKey, Arc<ServiceHandler>>,
}

impl Default for Locator {
  fn default() -> Self {
    Self::with_label("custom")
  }
}

impl Locator {
  /// Creates a new, empty `Locator`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Locator` whose log events carry `label`.
  pub fn with_label(label: impl Into<Cow<'static, str>>) -> Self {
    Self {
      label: label.into(),
      handlers: DashMap::new(),
    }
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  // --- PRIVATE HELPERS ---

  fn install(&self, key: ServiceKey, scope: Scope, reassign: Reassignment) -> Result<()> {
    let handler = Arc::new(ServiceHandler::for_scope(scope));
    let scope_name = handler.scope_name();

    // The policy check and the insertion happen under the same shard lock.
    let previous = match self.handlers.entry(key.clone()) {
      Entry::Occupied(mut occupied) => {
        if let Err(err) = reassign.evaluate(&key, true) {
          tracing::warn!(locator = %self.label, key = %key, "forbidden reassignment");
          return Err(err);
        }
        Some(occupied.insert(handler))
      }
      Entry::Vacant(vacant) => {
        reassign.evaluate(&key, false)?;
        vacant.insert(handler);
        None
      }
    };

    if previous.is_some() {
      tracing::debug!(locator = %self.label, key = %key, scope = scope_name, "replaced service");
    } else {
      tracing::debug!(locator = %self.label, key = %key, scope = scope_name, "registered service");
    }
    // The replaced handler is dropped here, after the shard lock is released.
    drop(previous);
    Ok(())
  }

  fn warn_if_optional<T: Any>(&self) {
    if key::is_optional::<T>() {
      tracing::warn!(
        locator = %self.label,
        registered = type_name::<T>(),
        "optional value registered as-is; it resolves only as the `Option` type"
      );
    }
  }

  fn handler(&self, key: &ServiceKey) -> Option<Arc<ServiceHandler>> {
    self.handlers.get(key).map(|entry| Arc::clone(entry.value()))
  }

  fn resolve<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &ServiceKey,
    consumer: ConsumerId,
  ) -> Option<Arc<T>> {
    // Clone the handler out so no map lock is held while a recipe runs.
    let handler = self.handler(key)?;
    let instance = handler.request(consumer);
    tracing::trace!(
      locator = %self.label,
      key = %key,
      consumer = %consumer,
      served = instance.is_some(),
      "service requested"
    );

    let typed = scope::downcast::<T>(&instance?);
    if typed.is_none() {
      tracing::warn!(
        locator = %self.label,
        key = %key,
        requested = type_name::<T>(),
        "registered service has a different type"
      );
    }
    typed
  }

  // --- PUBLIC API ---

  // --- Factory Registration ---

  /// Registers `seed` as a factory under the key derived from `T`.
  ///
  /// Every consumer receives its own duplicate of the seed, made with
  /// [`Clone`] on the consumer's first request and kept until it releases.
  pub fn register_factory<T: Clone + Any + Send + Sync>(
    &self,
    seed: T,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(ServiceKey::of::<T>(), Scope::factory(seed), reassign)
  }

  pub fn register_factory_with_key<T: Clone + Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    seed: T,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(key.into(), Scope::factory(seed), reassign)
  }

  // --- Singleton Registration ---

  /// Registers `instance` as a singleton shared by every consumer.
  ///
  /// An `Option<T>` passed here is stored as the `Option` itself under the
  /// `T` key; use [`register_singleton_optional`](Self::register_singleton_optional)
  /// to make it resolvable as `T`.
  pub fn register_singleton<T: Any + Send + Sync>(
    &self,
    instance: T,
    reassign: Reassignment,
  ) -> Result<()> {
    self.warn_if_optional::<T>();
    self.install(ServiceKey::of::<T>(), Scope::singleton(Arc::new(instance)), reassign)
  }

  pub fn register_singleton_with_key<T: Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    instance: T,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(key.into(), Scope::singleton(Arc::new(instance)), reassign)
  }

  /// Registers a value that may be absent, resolvable as `T`.
  ///
  /// `Some(value)` behaves like [`register_singleton`](Self::register_singleton).
  /// `None` still takes the key, so [`Reassignment::Forbid`] applies to it,
  /// but every request resolves to `None`.
  pub fn register_singleton_optional<T: Any + Send + Sync>(
    &self,
    instance: Option<T>,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(ServiceKey::of::<T>(), Scope::optional_singleton(instance), reassign)
  }

  pub fn register_singleton_optional_with_key<T: Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    instance: Option<T>,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(key.into(), Scope::optional_singleton(instance), reassign)
  }

  /// Registers an already shared `Arc<I>`, typically a trait object, as a singleton.
  ///
  /// Consumers resolve it as `Arc<I>` and receive this very allocation.
  pub fn register_singleton_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    instance: Arc<I>,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(ServiceKey::of::<I>(), Scope::singleton(instance), reassign)
  }

  pub fn register_singleton_trait_with_key<I: ?Sized + Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    instance: Arc<I>,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(key.into(), Scope::singleton(instance), reassign)
  }

  // --- Lazy Singleton Registration ---

  /// Registers a singleton that `recipe` builds on its first request.
  ///
  /// The recipe runs at most once, even when consumers race for the first
  /// resolution. A recipe that only hands out an object built before
  /// registration behaves like [`register_singleton`](Self::register_singleton).
  pub fn register_lazy_singleton<T: Any + Send + Sync>(
    &self,
    recipe: impl Fn() -> T + Send + Sync + 'static,
    reassign: Reassignment,
  ) -> Result<()> {
    self.warn_if_optional::<T>();
    self.install(
      ServiceKey::of::<T>(),
      Scope::lazy_singleton(move || Arc::new(recipe())),
      reassign,
    )
  }

  pub fn register_lazy_singleton_with_key<T: Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    recipe: impl Fn() -> T + Send + Sync + 'static,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(
      key.into(),
      Scope::lazy_singleton(move || Arc::new(recipe())),
      reassign,
    )
  }

  /// Registers a lazy singleton whose recipe may produce nothing.
  ///
  /// The recipe still runs at most once; a `None` result is cached and every
  /// request resolves to `None`.
  pub fn register_lazy_singleton_optional<T: Any + Send + Sync>(
    &self,
    recipe: impl Fn() -> Option<T> + Send + Sync + 'static,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(ServiceKey::of::<T>(), Scope::optional_lazy_singleton(recipe), reassign)
  }

  pub fn register_lazy_singleton_optional_with_key<T: Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    recipe: impl Fn() -> Option<T> + Send + Sync + 'static,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(key.into(), Scope::optional_lazy_singleton(recipe), reassign)
  }

  pub fn register_lazy_singleton_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    recipe: impl Fn() -> Arc<I> + Send + Sync + 'static,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(ServiceKey::of::<I>(), Scope::lazy_singleton(recipe), reassign)
  }

  pub fn register_lazy_singleton_trait_with_key<I: ?Sized + Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    recipe: impl Fn() -> Arc<I> + Send + Sync + 'static,
    reassign: Reassignment,
  ) -> Result<()> {
    self.install(key.into(), Scope::lazy_singleton(recipe), reassign)
  }

  // --- Resolution ---

  /// Resolves the service registered under the key derived from `T`.
  ///
  /// Returns `None` if nothing is registered, `consumer` has been released,
  /// or the registered object is not a `T`.
  ///
  /// On a singleton registration the consumer counts as active even when the
  /// request yields `None` for a type mismatch, and keeps the registration
  /// from being torn down until it is released.
  pub fn get_service<T: ?Sized + Any + Send + Sync>(&self, consumer: ConsumerId) -> Option<Arc<T>> {
    self.resolve(&ServiceKey::of::<T>(), consumer)
  }

  pub fn get_service_with_key<T: ?Sized + Any + Send + Sync>(
    &self,
    key: impl Into<ServiceKey>,
    consumer: ConsumerId,
  ) -> Option<Arc<T>> {
    self.resolve(&key.into(), consumer)
  }

  // --- Release & Removal ---

  /// Releases `consumer`'s claim on the service under `key`.
  ///
  /// When this leaves a singleton registration without active consumers and
  /// [auto-teardown](crate::set_auto_teardown) is enabled, the registration
  /// is removed and the key becomes free.
  pub fn unregister_consumer(&self, key: impl Into<ServiceKey>, consumer: ConsumerId) {
    let key = key.into();
    let Some(handler) = self.handler(&key) else {
      return;
    };

    let now_empty = handler.release(consumer);
    tracing::trace!(locator = %self.label, key = %key, consumer = %consumer, "consumer released");

    if now_empty && handler.kind() == HandlerKind::Single && global::auto_teardown_enabled() {
      // Only tear down if nobody re-registered or re-acquired in the meantime.
      let removed = self.handlers.remove_if(&key, |_, current| {
        Arc::ptr_eq(current, &handler) && current.is_idle_single()
      });
      if removed.is_some() {
        tracing::debug!(locator = %self.label, key = %key, "tore down released service");
      }
    }
  }

  /// Removes whatever is registered under `key`. Returns whether anything was.
  pub fn unregister_key(&self, key: impl Into<ServiceKey>) -> bool {
    let key = key.into();
    let removed = self.handlers.remove(&key).is_some();
    if removed {
      tracing::debug!(locator = %self.label, key = %key, "unregistered service");
    }
    removed
  }

  /// Removes whatever is registered under the key derived from `T`.
  pub fn unregister_type<T: ?Sized + Any>(&self) -> bool {
    self.unregister_key(ServiceKey::of::<T>())
  }

  /// Drops every registration.
  ///
  /// Services are dropped after they leave the map, so a `Drop` impl may use
  /// this locator.
  pub fn reset(&self) {
    let keys: Vec<ServiceKey> = self.handlers.iter().map(|entry| entry.key().clone()).collect();
    let removed: Vec<Arc<ServiceHandler>> = keys
      .iter()
      .filter_map(|key| self.handlers.remove(key).map(|(_, handler)| handler))
      .collect();
    tracing::debug!(locator = %self.label, dropped = removed.len(), "locator reset");
    drop(removed);
  }

  // --- Inspection ---

  pub fn contains_key(&self, key: impl Into<ServiceKey>) -> bool {
    self.handlers.contains_key(&key.into())
  }

  pub fn contains_type<T: ?Sized + Any>(&self) -> bool {
    self.contains_key(ServiceKey::of::<T>())
  }

  /// The number of registrations.
  pub fn len(&self) -> usize {
    self.handlers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handlers.is_empty()
  }

  /// The kind of bookkeeping behind `key`, if registered.
  pub fn handler_kind(&self, key: impl Into<ServiceKey>) -> Option<HandlerKind> {
    self.handler(&key.into()).map(|handler| handler.kind())
  }

  /// Active consumers of a singleton registration, or live per-consumer
  /// objects of a factory registration.
  pub fn consumer_count(&self, key: impl Into<ServiceKey>) -> Option<usize> {
    self.handler(&key.into()).map(|handler| handler.consumer_count())
  }
}

impl fmt::Debug for Locator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Locator")
      .field("label", &self.label)
      .field("services", &self.handlers.len())
      .finish()
  }
}
