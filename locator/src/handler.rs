//! Per-consumer bookkeeping between a locator and a scope.

use crate::consumer::ConsumerId;
use crate::scope::{Instance, Scope};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Which bookkeeping a registration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
  /// One shared object (singleton and lazy singleton registrations).
  Single,
  /// One manufactured object per consumer (factory registrations).
  Multi,
}

#[derive(Default)]
struct SingleState {
  active: HashSet<ConsumerId>,
  released: HashSet<ConsumerId>,
}

/// Serves one shared object to many consumers and reports when the last
/// active consumer lets go.
pub(crate) struct SingleServiceHandler {
  scope: Scope,
  state: Mutex<SingleState>,
}

impl SingleServiceHandler {
  pub(crate) fn new(scope: Scope) -> Self {
    Self {
      scope,
      state: Mutex::new(SingleState::default()),
    }
  }

  pub(crate) fn request(&self, consumer: ConsumerId) -> Option<Instance> {
    {
      let mut state = self.state.lock();
      if state.released.contains(&consumer) {
        return None;
      }
      state.active.insert(consumer);
    }
    // Resolve outside the lock so a lazy recipe may consult the locator.
    self.scope.resolve()
  }

  /// Returns `true` when no active consumers remain.
  pub(crate) fn release(&self, consumer: ConsumerId) -> bool {
    let mut state = self.state.lock();
    state.released.insert(consumer);
    state.active.remove(&consumer);
    state.active.is_empty()
  }

  pub(crate) fn active_count(&self) -> usize {
    self.state.lock().active.len()
  }
}

#[derive(Default)]
struct MultiState {
  manufactured: HashMap<ConsumerId, Instance>,
  released: HashSet<ConsumerId>,
}

/// Manufactures and caches one object per consumer.
pub(crate) struct MultiServiceHandler {
  scope: Scope,
  state: Mutex<MultiState>,
}

impl MultiServiceHandler {
  pub(crate) fn new(scope: Scope) -> Self {
    Self {
      scope,
      state: Mutex::new(MultiState::default()),
    }
  }

  pub(crate) fn request(&self, consumer: ConsumerId) -> Option<Instance> {
    let mut state = self.state.lock();
    if state.released.contains(&consumer) {
      return None;
    }
    if let Some(instance) = state.manufactured.get(&consumer) {
      return Some(Instance::clone(instance));
    }
    let instance = self.scope.resolve()?;
    state.manufactured.insert(consumer, Instance::clone(&instance));
    Some(instance)
  }

  /// Never signals teardown: other consumers may still hold their own objects.
  pub(crate) fn release(&self, consumer: ConsumerId) -> bool {
    let mut state = self.state.lock();
    state.released.insert(consumer);
    state.manufactured.remove(&consumer);
    false
  }

  pub(crate) fn manufactured_count(&self) -> usize {
    self.state.lock().manufactured.len()
  }
}

pub(crate) enum ServiceHandler {
  Single(SingleServiceHandler),
  Multi(MultiServiceHandler),
}

impl ServiceHandler {
  /// Wraps a scope in the bookkeeping it calls for.
  pub(crate) fn for_scope(scope: Scope) -> Self {
    if scope.is_shared() {
      ServiceHandler::Single(SingleServiceHandler::new(scope))
    } else {
      ServiceHandler::Multi(MultiServiceHandler::new(scope))
    }
  }

  pub(crate) fn kind(&self) -> HandlerKind {
    match self {
      ServiceHandler::Single(_) => HandlerKind::Single,
      ServiceHandler::Multi(_) => HandlerKind::Multi,
    }
  }

  pub(crate) fn request(&self, consumer: ConsumerId) -> Option<Instance> {
    match self {
      ServiceHandler::Single(handler) => handler.request(consumer),
      ServiceHandler::Multi(handler) => handler.request(consumer),
    }
  }

  pub(crate) fn release(&self, consumer: ConsumerId) -> bool {
    match self {
      ServiceHandler::Single(handler) => handler.release(consumer),
      ServiceHandler::Multi(handler) => handler.release(consumer),
    }
  }

  /// Active consumers of a single handler, or live objects of a multi handler.
  pub(crate) fn consumer_count(&self) -> usize {
    match self {
      ServiceHandler::Single(handler) => handler.active_count(),
      ServiceHandler::Multi(handler) => handler.manufactured_count(),
    }
  }

  /// A single handler with no active consumers may be torn down.
  pub(crate) fn is_idle_single(&self) -> bool {
    match self {
      ServiceHandler::Single(handler) => handler.active_count() == 0,
      ServiceHandler::Multi(_) => false,
    }
  }

  pub(crate) fn scope_name(&self) -> &'static str {
    match self {
      ServiceHandler::Single(handler) => handler.scope.name(),
      ServiceHandler::Multi(handler) => handler.scope.name(),
    }
  }
}

impl fmt::Debug for ServiceHandler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (kind, scope) = match self {
      ServiceHandler::Single(handler) => ("Single", &handler.scope),
      ServiceHandler::Multi(handler) => ("Multi", &handler.scope),
    };
    f.debug_struct(kind)
      .field("scope", scope)
      .field("consumers", &self.consumer_count())
      .finish()
  }
}
