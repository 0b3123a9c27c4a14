use crate::key::ServiceKey;
use thiserror::Error;

/// The error type for `fibre_locator` registration.
///
/// Lookups never fail: an unknown key, a released consumer or a type mismatch
/// all resolve to `None`. The only failing operation is a registration made
/// with [`Reassignment::Forbid`](crate::Reassignment::Forbid) against an
/// occupied key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
  #[error("A service is already registered for key {key} and reassignment is forbidden")]
  ForbiddenReassignment { key: ServiceKey },
}

/// A specialized `Result` type for `fibre_locator` operations.
pub type Result<T, E = LocatorError> = std::result::Result<T, E>;
