use std::any;

use snafu::prelude::*;
use tracing::{trace, warn};

use crate::key::{DependencyKey, Key};
use crate::registry::{Dependency, Stored};
use crate::util::any::{AsAny, Downcast};

/// The object-safe half of dependency resolution.
///
/// A [`Resolver`] only knows how to find a type-erased value somewhere along
/// its lookup chain and how to cache a freshly built default locally. The
/// typed resolution algorithm lives in [`TypedResolver`] and is shared by every
/// implementation.
#[cfg_attr(test, mockall::automock)]
pub trait Resolver: Send + Sync {
    /// A human-readable name used in diagnostics.
    fn label(&self) -> &'static str;

    /// Looks `key` up locally and then along the parent chain, without ever
    /// running a default factory.
    fn dyn_lookup(&self, key: &dyn Key) -> Option<Box<dyn Stored>>;

    /// Caches `value` locally unless the slot already holds a value of the
    /// same type, and returns whichever value the slot ends up with.
    fn dyn_fill(&self, key: &dyn Key, value: Box<dyn Stored>) -> Box<dyn Stored>;
}

pub trait TypedResolver: Resolver {
    /// Resolves `key` to a value of type `T`.
    ///
    /// A value found along the lookup chain wins. A value of the wrong type is
    /// reported and treated as a miss. On a total miss the key's default
    /// factory runs and the result is cached in this resolver only.
    fn resolve<T>(&self, key: &DependencyKey<T>) -> Result<T, ResolveError>
    where
        T: Dependency,
    {
        let mismatched = match self.dyn_lookup(key) {
            Some(stored) => match stored.downcast::<T>() {
                Ok(value) => return Ok(*value),
                Err(stored) => {
                    let found = AsAny::type_name(&*stored);
                    warn!(
                        registry = self.label(),
                        key = key.name(),
                        expected = any::type_name::<T>(),
                        found,
                        "slot holds a value of an unexpected type, falling back to the default"
                    );
                    Some(found)
                }
            },
            None => None,
        };

        let Some(value) = key.default_value() else {
            return Err(match mismatched {
                Some(found) => ResolveError::TypeMismatch {
                    key: key.name(),
                    expected: any::type_name::<T>(),
                    found,
                },
                None => ResolveError::NotRegistered {
                    key: key.name(),
                    expected: any::type_name::<T>(),
                },
            });
        };

        trace!(
            registry = self.label(),
            key = key.name(),
            "constructed default value"
        );
        match self.dyn_fill(key, Box::new(value)).downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(stored) => TypeMismatchSnafu {
                key: key.name(),
                expected: any::type_name::<T>(),
                found: AsAny::type_name(&*stored),
            }
            .fail(),
        }
    }
}

impl<R: Resolver + ?Sized> TypedResolver for R {}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum ResolveError {
    #[snafu(display(
        "required dependency {key} of type {expected} was never registered and has no default"
    ))]
    #[non_exhaustive]
    NotRegistered {
        key: &'static str,
        expected: &'static str,
    },
    #[snafu(display(
        "dependency {key} holds a {found} where a {expected} was expected, and has no default"
    ))]
    #[non_exhaustive]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}
