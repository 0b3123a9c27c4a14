//! Creation strategies: when a registered value is produced.

use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A resolved object with its type erased.
///
/// The payload is always an `Arc<T>` boxed once more, which lets `T` be an
/// unsized trait object.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

type Recipe = Box<dyn Fn() -> Option<Instance> + Send + Sync>;

pub(crate) fn erase<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Instance {
  Arc::new(value)
}

/// Recovers the typed handle from an erased instance, or `None` if it holds
/// something other than an `Arc<T>`.
pub(crate) fn downcast<T: ?Sized + Any + Send + Sync>(instance: &Instance) -> Option<Arc<T>> {
  instance.downcast_ref::<Arc<T>>().cloned()
}

pub(crate) enum Scope {
  /// A fresh duplicate of the seed on every resolution.
  Factory { recipe: Recipe },
  /// The instance supplied at registration. `None` occupies the key but
  /// serves nothing.
  Singleton { instance: Option<Instance> },
  /// Built on first resolution, then cached.
  LazySingleton {
    cell: OnceCell<Option<Instance>>,
    recipe: Recipe,
  },
}

impl Scope {
  pub(crate) fn factory<T: Clone + Any + Send + Sync>(seed: T) -> Self {
    Scope::Factory {
      recipe: Box::new(move || Some(erase(Arc::new(seed.clone())))),
    }
  }

  pub(crate) fn singleton<T: ?Sized + Any + Send + Sync>(instance: Arc<T>) -> Self {
    Scope::Singleton {
      instance: Some(erase(instance)),
    }
  }

  /// A singleton for a value that may be absent. A present value is stored
  /// as its inner `T`.
  pub(crate) fn optional_singleton<T: Any + Send + Sync>(instance: Option<T>) -> Self {
    Scope::Singleton {
      instance: instance.map(|value| erase(Arc::new(value))),
    }
  }

  pub(crate) fn lazy_singleton<T: ?Sized + Any + Send + Sync>(
    recipe: impl Fn() -> Arc<T> + Send + Sync + 'static,
  ) -> Self {
    Scope::LazySingleton {
      cell: OnceCell::new(),
      recipe: Box::new(move || Some(erase(recipe()))),
    }
  }

  pub(crate) fn optional_lazy_singleton<T: Any + Send + Sync>(
    recipe: impl Fn() -> Option<T> + Send + Sync + 'static,
  ) -> Self {
    Scope::LazySingleton {
      cell: OnceCell::new(),
      recipe: Box::new(move || recipe().map(|value| erase(Arc::new(value)))),
    }
  }

  /// Produces the object for one resolution, or `None` if the registration
  /// holds no value.
  pub(crate) fn resolve(&self) -> Option<Instance> {
    match self {
      Scope::Factory { recipe } => recipe(),
      Scope::Singleton { instance } => instance.clone(),
      Scope::LazySingleton { cell, recipe } => cell
        .get_or_init(|| {
          tracing::trace!("materializing lazy singleton");
          recipe()
        })
        .clone(),
    }
  }

  /// Whether every resolution yields the same object.
  pub(crate) fn is_shared(&self) -> bool {
    !matches!(self, Scope::Factory { .. })
  }

  pub(crate) fn name(&self) -> &'static str {
    match self {
      Scope::Factory { .. } => "factory",
      Scope::Singleton { .. } => "singleton",
      Scope::LazySingleton { .. } => "lazy_singleton",
    }
  }
}

impl fmt::Debug for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scope::LazySingleton { cell, .. } => f
        .debug_struct("LazySingleton")
        .field("materialized", &cell.get().is_some())
        .finish(),
      other => f.write_str(other.name()),
    }
  }
}
