//! Public macros for constructing accessor handles.

/// Creates an [`Inject`](crate::Inject) handle for a required service.
///
/// # Examples
///
/// ```
/// use fibre_locator::{global, inject, Reassignment};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct English;
/// impl Greeter for English { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global().register_singleton_trait::<dyn Greeter>(Arc::new(English), Reassignment::Allow).unwrap();
/// global().register_singleton_with_key("motd", String::from("hi"), Reassignment::Allow).unwrap();
///
/// let greeter = inject!(trait Greeter);
/// let motd = inject!(String, "motd");
/// assert_eq!(greeter.get().greet(), "Hello!");
/// assert_eq!(*motd.get(), "hi");
/// ```
#[macro_export]
macro_rules! inject {
  // inject!(trait MyTrait)
  (trait $trait_ident:ident) => {
    $crate::Inject::<dyn $trait_ident>::new()
  };

  // inject!(trait MyTrait, key)
  (trait $trait_ident:ident, $key:expr) => {
    $crate::Inject::<dyn $trait_ident>::with_key($key)
  };

  // inject!(MyService)
  ($type:ty) => {
    $crate::Inject::<$type>::new()
  };

  // inject!(MyService, key)
  ($type:ty, $key:expr) => {
    $crate::Inject::<$type>::with_key($key)
  };
}

/// Creates a [`MaybeInject`](crate::MaybeInject) handle for an optional service.
///
/// Accepts the same forms as [`inject!`](crate::inject).
#[macro_export]
macro_rules! maybe_inject {
  (trait $trait_ident:ident) => {
    $crate::MaybeInject::<dyn $trait_ident>::new()
  };

  (trait $trait_ident:ident, $key:expr) => {
    $crate::MaybeInject::<dyn $trait_ident>::with_key($key)
  };

  ($type:ty) => {
    $crate::MaybeInject::<$type>::new()
  };

  ($type:ty, $key:expr) => {
    $crate::MaybeInject::<$type>::with_key($key)
  };
}
