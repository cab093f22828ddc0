mod core;
mod dynamic;
mod handle;
mod resolver;
mod storage;

use std::any::TypeId;

use crate::util::any::AsAny;

pub(crate) use self::core::RegistryCore;
pub use dynamic::SubscribeError;
pub use handle::{Registry, RegistryBuilder};
pub use resolver::{ResolveError, Resolver, TypedResolver};

/// A value that can be stored in a [`Registry`].
///
/// Resolving hands out a clone of the stored value, so the choice of `T`
/// decides the sharing semantics: an `Arc<_>` resolves to the very same
/// allocation every time, while a plain value resolves to an equal copy.
pub trait Dependency: Clone + Send + Sync + 'static {}

impl<T> Dependency for T where T: Clone + Send + Sync + 'static {}

/// The type-erased form of a [`Dependency`] as it sits in the storage map.
pub trait Stored: AsAny + Send + Sync {
    fn dyn_clone(&self) -> Box<dyn Stored>;

    fn stored_type(&self) -> TypeId;
}

impl<T: Dependency> Stored for T {
    fn dyn_clone(&self) -> Box<dyn Stored> {
        Box::new(self.clone())
    }

    fn stored_type(&self) -> TypeId {
        TypeId::of::<T>()
    }
}
