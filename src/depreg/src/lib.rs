#![allow(clippy::new_without_default)]

extern crate self as depreg;

pub mod key;
pub mod link;
pub mod registration;
pub mod registry;
mod global;
mod util;

pub use global::global;

pub mod prelude {
    pub use crate::key::{self, DependencyKey, Key};
    pub use crate::link::{AsBaseDependency, BaseDependency, HasRegistryLink, RegistryLink};
    pub use crate::registration::{bind, Registration};
    pub use crate::registry::{
        Dependency, Registry, RegistryBuilder, ResolveError, Resolver, SubscribeError,
        TypedResolver,
    };
}
