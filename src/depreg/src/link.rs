//! Back-references from registered dependencies to their registry.
//!
//! A dependency that needs to resolve further dependencies on its own embeds a
//! [`RegistryLink`] and implements [`BaseDependency`]. Registering it with
//! [`Registry::register_linked`] points the link at that registry. The link is
//! weak: the registry owns the dependency, never the other way round.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use tracing::error;

use crate::registry::{Registry, RegistryCore};

pub use depreg_derive::HasRegistryLink;

/// A non-owning reference to the registry a dependency was last registered
/// with.
pub struct RegistryLink {
    registry: Mutex<Weak<RegistryCore>>,
    linking: ReentrantMutex<()>,
}

impl RegistryLink {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Weak::new()),
            linking: ReentrantMutex::new(()),
        }
    }

    // Held from `attach` until the setup hook returns.
    pub(crate) fn lock_linking(&self) -> ReentrantMutexGuard<'_, ()> {
        self.linking.lock()
    }

    // A link whose registry has been dropped counts as unset.
    pub(crate) fn attach(&self, registry: &Registry) -> bool {
        let mut current = self.registry.lock();
        let was_unset = current.strong_count() == 0;
        *current = registry.downgrade();
        was_unset
    }

    pub fn is_attached(&self) -> bool {
        self.registry.lock().strong_count() > 0
    }

    /// Returns the linked registry, if it is still alive.
    pub fn try_registry(&self) -> Option<Registry> {
        Registry::upgrade(&self.registry.lock())
    }

    /// Returns the linked registry.
    ///
    /// Using a link that was never attached is a programming error. It is
    /// logged and an empty, unrelated registry is returned so that the caller
    /// keeps running, but anything resolved through it will be defaults.
    pub fn registry(&self) -> Registry {
        self.try_registry().unwrap_or_else(|| {
            error!("registry link used before being attached, returning an empty placeholder");
            Registry::builder().label("placeholder").build()
        })
    }
}

impl Default for RegistryLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for RegistryLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RegistryLink")
            .field(
                "registry",
                &self.try_registry().as_ref().map(Registry::label),
            )
            .finish()
    }
}

/// Access to the [`RegistryLink`] embedded in a dependency.
///
/// Usually derived:
///
/// ```
/// use depreg::link::{HasRegistryLink, RegistryLink};
///
/// #[derive(HasRegistryLink)]
/// struct Session {
///     link: RegistryLink,
///     user: String,
/// }
/// ```
pub trait HasRegistryLink {
    fn registry_link(&self) -> &RegistryLink;
}

/// A dependency that resolves further dependencies through the registry
/// holding it.
pub trait BaseDependency: HasRegistryLink + Send + Sync + 'static {
    /// Called once the dependency gets linked to a registry while its link was
    /// unset. Runs synchronously inside the registering call, under the
    /// registry lock, and may use the registry.
    fn setup(&self) {}

    /// Never called by the registry. Owners call it once every dependency
    /// this one needs has been registered.
    fn added_to_dependency_registry(&self) {}

    /// The registry this dependency is linked to, see
    /// [`RegistryLink::registry`].
    fn registry(&self) -> Registry {
        self.registry_link().registry()
    }
}

/// A registrable handle to a [`BaseDependency`].
///
/// Implemented for `Arc<D>`, including `Arc<dyn Trait>` whenever `Trait` has
/// [`BaseDependency`] as a supertrait.
pub trait AsBaseDependency {
    fn base_link(&self) -> &RegistryLink;

    fn base_setup(&self);
}

impl<D> AsBaseDependency for Arc<D>
where
    D: BaseDependency + ?Sized,
{
    fn base_link(&self) -> &RegistryLink {
        (**self).registry_link()
    }

    fn base_setup(&self) {
        (**self).setup();
    }
}
