//! Registration keys and their normalization.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Object-safe view of an arbitrary `Hash + Eq` key.
trait DynKey: Any + Send + Sync + fmt::Debug {
  fn as_any(&self) -> &dyn Any;
  fn dyn_eq(&self, other: &dyn DynKey) -> bool;
  fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<K> DynKey for K
where
  K: Any + Hash + Eq + Send + Sync + fmt::Debug,
{
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn dyn_eq(&self, other: &dyn DynKey) -> bool {
    other
      .as_any()
      .downcast_ref::<K>()
      .is_some_and(|other| other == self)
  }

  fn dyn_hash(&self, mut state: &mut dyn Hasher) {
    TypeId::of::<K>().hash(&mut state);
    self.hash(&mut state);
  }
}

#[derive(Clone)]
enum Repr {
  Name(Arc<str>),
  Custom(Arc<dyn DynKey>),
}

/// The normalized identifier of one registration slot in a [`Locator`](crate::Locator).
///
/// A key is either a name or an arbitrary caller-supplied hashable value.
/// Keys derived from a type (see [`ServiceKey::of`]) are names too, so a
/// service registered under the explicit key `"Widget"` is the same slot a
/// `Widget` type lookup resolves.
///
/// # Examples
///
/// ```
/// use fibre_locator::ServiceKey;
///
/// struct Widget;
///
/// assert_eq!(ServiceKey::of::<Widget>(), ServiceKey::from("Widget"));
/// assert_eq!(ServiceKey::of::<Option<Widget>>(), ServiceKey::from("Widget"));
///
/// #[derive(Debug, Hash, PartialEq, Eq)]
/// enum Slot { Primary, Replica }
/// assert_ne!(ServiceKey::custom(Slot::Primary), ServiceKey::custom(Slot::Replica));
/// ```
#[derive(Clone)]
pub struct ServiceKey(Repr);

impl ServiceKey {
  /// Derives the key for a type from its nominal name.
  ///
  /// Module paths are stripped from every path segment and one enclosing
  /// `Option<..>` is unwrapped. The name comes from [`std::any::type_name`],
  /// so it is only meaningful within one build of a program.
  pub fn of<T: ?Sized + Any>() -> Self {
    let nominal = nominal_type_name(type_name::<T>());
    Self::from(unwrap_optional(&nominal))
  }

  /// Wraps an arbitrary hashable value as a key.
  ///
  /// `String` and `&'static str` values are normalized to name keys.
  pub fn custom<K>(key: K) -> Self
  where
    K: Any + Hash + Eq + Send + Sync + fmt::Debug,
  {
    let any: &dyn Any = &key;
    if let Some(name) = any.downcast_ref::<String>() {
      return Self::from(name.as_str());
    }
    if let Some(name) = any.downcast_ref::<&'static str>() {
      return Self::from(*name);
    }
    Self(Repr::Custom(Arc::new(key)))
  }

  /// Returns the name if this is a name key.
  pub fn as_str(&self) -> Option<&str> {
    match &self.0 {
      Repr::Name(name) => Some(name),
      Repr::Custom(_) => None,
    }
  }
}

impl From<&str> for ServiceKey {
  fn from(name: &str) -> Self {
    Self(Repr::Name(Arc::from(name)))
  }
}

impl From<String> for ServiceKey {
  fn from(name: String) -> Self {
    Self(Repr::Name(Arc::from(name)))
  }
}

impl From<&String> for ServiceKey {
  fn from(name: &String) -> Self {
    Self::from(name.as_str())
  }
}

impl From<&ServiceKey> for ServiceKey {
  fn from(key: &ServiceKey) -> Self {
    key.clone()
  }
}

impl PartialEq for ServiceKey {
  fn eq(&self, other: &Self) -> bool {
    match (&self.0, &other.0) {
      (Repr::Name(a), Repr::Name(b)) => a == b,
      (Repr::Custom(a), Repr::Custom(b)) => a.dyn_eq(b.as_ref()),
      _ => false,
    }
  }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    match &self.0 {
      Repr::Name(name) => {
        0u8.hash(state);
        name.hash(state);
      }
      Repr::Custom(key) => {
        1u8.hash(state);
        key.dyn_hash(state);
      }
    }
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.0 {
      Repr::Name(name) => write!(f, "ServiceKey({:?})", name),
      Repr::Custom(key) => write!(f, "ServiceKey(Custom({:?}))", key),
    }
  }
}

impl fmt::Display for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.0 {
      Repr::Name(name) => write!(f, "'{}'", name),
      Repr::Custom(key) => write!(f, "{:?}", key),
    }
  }
}

/// Strips module paths from every segment of a fully qualified type name.
fn nominal_type_name(full: &str) -> String {
  let mut out = String::with_capacity(full.len());
  let mut segment_start = 0;
  let mut chars = full.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      ':' if chars.peek() == Some(&':') => {
        chars.next();
        out.truncate(segment_start);
      }
      c if c.is_alphanumeric() || c == '_' => out.push(c),
      c => {
        out.push(c);
        segment_start = out.len();
      }
    }
  }
  out
}

/// Whether the key derived from `T` unwrapped an `Option<..>` layer.
pub(crate) fn is_optional<T: ?Sized + Any>() -> bool {
  let nominal = nominal_type_name(type_name::<T>());
  unwrap_optional(&nominal).len() != nominal.len()
}

fn unwrap_optional(name: &str) -> &str {
  name
    .strip_prefix("Option<")
    .and_then(|inner| inner.strip_suffix('>'))
    .unwrap_or(name)
}
