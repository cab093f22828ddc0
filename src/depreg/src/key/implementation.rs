use std::any;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

use crate::key::Key;
use crate::registry::Dependency;

/// A typed dependency slot, optionally carrying a lazy default.
///
/// Keys are plain values and are meant to be declared once, usually as a
/// `static`:
///
/// ```
/// use depreg::key::DependencyKey;
///
/// static RETRIES: DependencyKey<u32> = DependencyKey::with_default("retries", || 3);
/// static ENDPOINT: DependencyKey<String> = DependencyKey::new("endpoint");
///
/// assert_eq!(RETRIES.name(), "retries");
/// assert_eq!(RETRIES.default_value(), Some(3));
/// assert_eq!(ENDPOINT.default_value(), None);
/// ```
///
/// The default factory is never compared; equality and hashing only look at
/// the name.
pub struct DependencyKey<T> {
    name: &'static str,
    default: Option<fn() -> T>,
}

impl<T> DependencyKey<T> {
    /// Creates a key without a default. Resolving it before anything is
    /// registered is an error.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
        }
    }

    /// Creates a key whose slot falls back to `default` on a total miss.
    pub const fn with_default(name: &'static str, default: fn() -> T) -> Self {
        Self {
            name,
            default: Some(default),
        }
    }

    /// Creates a key named after the fully-qualified name of `T`.
    pub fn of() -> Self {
        Self::new(any::type_name::<T>())
    }

    /// Like [`DependencyKey::of`], with a default factory.
    pub fn of_with_default(default: fn() -> T) -> Self {
        Self::with_default(any::type_name::<T>(), default)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Runs the default factory, if any. Every call produces a fresh value.
    pub fn default_value(&self) -> Option<T> {
        self.default.map(|default| default())
    }
}

impl<T> Clone for DependencyKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DependencyKey<T> {}

impl<T> Debug for DependencyKey<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DependencyKey")
            .field("name", &self.name)
            .field("target", &any::type_name::<T>())
            .field("has_default", &self.has_default())
            .finish()
    }
}

impl<T> Display for DependencyKey<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name)
    }
}

impl<T> PartialEq for DependencyKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for DependencyKey<T> {}

impl<T> Hash for DependencyKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T: Dependency> Key for DependencyKey<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn target_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}
