//! # Fibre Locator
//!
//! A thread-safe service locator for Rust with per-consumer lifecycle tracking.
//!
//! Services are registered under a key (derived from their type, or given
//! explicitly) with one of three lifecycles, and handed out to consumers that
//! identify themselves with a [`ConsumerId`]:
//!
//! - **Factory**: every consumer gets its own duplicate of a seed value.
//! - **Singleton**: every consumer shares the instance supplied at registration.
//! - **Lazy singleton**: every consumer shares one instance, built on the first request.
//!
//! A consumer can release its claim. A released consumer is never served again
//! by that registration, and a singleton registration whose last active
//! consumer releases it is removed automatically (see [`set_auto_teardown`]).
//!
//! ## Core Concepts
//!
//! - **Locator**: one registry. Create your own with [`Locator::new`], or use
//!   the two process-wide instances, `Default` and `Test`, via [`locator`].
//! - **Reassignment**: every registration says whether it may replace an
//!   existing one ([`Reassignment::Allow`]) or must fail ([`Reassignment::Forbid`]).
//! - **Test mode**: [`test_up`] routes accessors to the `Test` locator so test
//!   doubles never mix with production registrations; [`reset`] clears either.
//! - **Accessors**: [`Inject`] and [`MaybeInject`] carry a consumer identity for
//!   one access point; [`inject!`] and [`maybe_inject!`] build them.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_locator::{global, inject, maybe_inject, Reassignment};
//!
//! #[derive(Debug, Clone)]
//! struct Widget { id: u32 }
//!
//! global().register_singleton(Widget { id: 174 }, Reassignment::Forbid).unwrap();
//!
//! let first = inject!(Widget);
//! let second = maybe_inject!(Widget);
//! assert_eq!(first.get().id, 174);
//! assert_eq!(second.get().unwrap().id, 174);
//!
//! // Give the second handle's claim back.
//! second.release();
//! assert!(second.get().is_none());
//! assert_eq!(first.get().id, 174);
//! ```

mod consumer;
mod error;
mod global;
mod handler;
mod inject;
mod key;
mod locator;
mod macros;
mod scope;

pub use consumer::ConsumerId;
pub use error::{LocatorError, Result};
pub use global::{
  active, auto_teardown_enabled, global, is_test_mode, locator, reset, reset_all,
  set_auto_teardown, test_down, test_up, LocatorKind,
};
pub use handler::HandlerKind;
pub use inject::{Inject, MaybeInject};
pub use key::ServiceKey;
pub use locator::{Locator, Reassignment};
