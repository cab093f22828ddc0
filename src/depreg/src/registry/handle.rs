use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Weak};

use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::key::{DependencyKey, Key};
use crate::link::AsBaseDependency;
use crate::registration::Registration;
use crate::registry::{Dependency, RegistryCore, ResolveError, Resolver, Stored, TypedResolver};

const DEFAULT_LABEL: &str = "registry";

/// A resolution context: a keyed store plus an optional parent to fall back
/// on.
///
/// `Registry` is a cheap handle; clones share the same storage. Every
/// operation is synchronous and may be called from any number of threads.
///
/// ```
/// use depreg::prelude::*;
///
/// static GREETING: DependencyKey<String> =
///     DependencyKey::with_default("greeting", || String::from("hello"));
///
/// let root = Registry::new();
/// let child = root.child();
///
/// assert_eq!(child.resolve(&GREETING).unwrap(), "hello");
///
/// root.register(&GREETING, String::from("hi"));
/// // The default is cached in `child`, which shadows the parent.
/// assert_eq!(child.resolve(&GREETING).unwrap(), "hello");
///
/// child.unregister(&GREETING);
/// assert_eq!(child.resolve(&GREETING).unwrap(), "hi");
/// ```
#[derive(Clone)]
pub struct Registry {
    pub(super) core: Arc<RegistryCore>,
}

impl Registry {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn child(&self) -> Self {
        Self::builder().parent(self).build()
    }

    pub(crate) fn downgrade(&self) -> Weak<RegistryCore> {
        Arc::downgrade(&self.core)
    }

    pub(crate) fn upgrade(core: &Weak<RegistryCore>) -> Option<Self> {
        core.upgrade().map(|core| Self { core })
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.core, &other.core)
    }

    pub fn label(&self) -> &'static str {
        self.core.label()
    }

    pub fn parent(&self) -> Option<&Registry> {
        self.core.parent()
    }

    /// Resolves `key`, see [`TypedResolver::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotRegistered`] if nothing is registered along
    /// the lookup chain and the key has no default, or
    /// [`ResolveError::TypeMismatch`] if the slot holds a value of another type
    /// and the key has no default.
    pub fn resolve<T>(&self, key: &DependencyKey<T>) -> Result<T, ResolveError>
    where
        T: Dependency,
    {
        TypedResolver::resolve(self, key)
    }

    /// Stores `value` in this registry, replacing whatever `key` held here.
    /// Parents and children are never touched.
    ///
    /// The value is not linked back to this registry. A
    /// [`BaseDependency`](crate::link::BaseDependency) stored this way keeps an
    /// unset link and resolves through a placeholder; register it with
    /// [`Registry::register_linked`] instead.
    pub fn register<T>(&self, key: &DependencyKey<T>, value: T)
    where
        T: Dependency,
    {
        self.core.insert(key, Box::new(value));
    }

    /// Like [`Registry::register`], and additionally links `value` back to
    /// this registry.
    ///
    /// If the value was not linked to a live registry before, its
    /// [`setup`](crate::link::BaseDependency::setup) hook runs before this
    /// call returns. Linking, storing and the hook happen under the registry
    /// lock, and the hook may freely register or resolve on this registry.
    /// Registering the same value into another registry meanwhile waits until
    /// the hook has returned.
    pub fn register_linked<T>(&self, key: &DependencyKey<T>, value: T)
    where
        T: Dependency + AsBaseDependency,
    {
        let hook = value.clone();
        self.core.with_lock(|| {
            let _linking = hook.base_link().lock_linking();
            let first_link = hook.base_link().attach(self);
            self.core.insert(key, Box::new(value));
            if first_link {
                trace!(
                    registry = self.label(),
                    key = key.name(),
                    "running setup hook of newly linked dependency"
                );
                hook.base_setup();
            }
        });
    }

    pub fn register_all<I>(&self, registrations: I)
    where
        I: IntoIterator<Item = Registration>,
    {
        for registration in registrations {
            registration.apply(self);
        }
    }

    /// Removes the local entry for `key`, uncovering the parent's entry or the
    /// default. Returns whether an entry was removed.
    pub fn unregister(&self, key: &dyn Key) -> bool {
        self.core.remove(key)
    }

    pub fn unregister_all(&self) {
        self.core.clear();
    }

    /// Returns true if `key` has an entry in this registry, ignoring parents.
    pub fn contains(&self, key: &dyn Key) -> bool {
        self.core.contains(key)
    }

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Registry")
            .field("label", &self.label())
            .field("parent", &self.parent().map(Registry::label))
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl Resolver for Registry {
    fn label(&self) -> &'static str {
        self.core.label()
    }

    fn dyn_lookup(&self, key: &dyn Key) -> Option<Box<dyn Stored>> {
        self.core.lookup(key)
    }

    fn dyn_fill(&self, key: &dyn Key, value: Box<dyn Stored>) -> Box<dyn Stored> {
        self.core.fill(key, value)
    }
}

/// Configures a [`Registry`] before it is created.
///
/// The parent can only be chosen here; it never changes afterwards.
#[derive(Debug)]
pub struct RegistryBuilder {
    label: &'static str,
    parent: Option<Registry>,
    runtime: Option<Handle>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            label: DEFAULT_LABEL,
            parent: None,
            runtime: None,
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn parent(mut self, parent: &Registry) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Sets the runtime dynamic subscriptions are spawned on. Without one the
    /// parent's runtime is used, and failing that the runtime current at
    /// subscription time.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Registry {
        let Self {
            label,
            parent,
            runtime,
        } = self;
        let runtime = runtime.or_else(|| {
            parent
                .as_ref()
                .and_then(|parent| parent.core.configured_runtime().cloned())
        });

        debug!(
            registry = label,
            parent = ?parent.as_ref().map(Registry::label),
            "created registry"
        );
        Registry {
            core: Arc::new(RegistryCore::new(label, parent, runtime)),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
