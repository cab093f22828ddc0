use std::cell::RefCell;

use parking_lot::ReentrantMutex;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::key::Key;
use crate::registry::dynamic::Subscriptions;
use crate::registry::storage::StorageMap;
use crate::registry::{Registry, Resolver, Stored};

// `RefCell` borrows never outlive a single map operation, so code running
// under `with_lock` may re-enter the registry.
pub struct RegistryCore {
    label: &'static str,
    parent: Option<Registry>,
    storage: ReentrantMutex<RefCell<StorageMap>>,
    runtime: Option<Handle>,
    subscriptions: Subscriptions,
}

impl RegistryCore {
    pub fn new(label: &'static str, parent: Option<Registry>, runtime: Option<Handle>) -> Self {
        Self {
            label,
            parent,
            storage: ReentrantMutex::new(RefCell::new(StorageMap::new())),
            runtime,
            subscriptions: Subscriptions::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn parent(&self) -> Option<&Registry> {
        self.parent.as_ref()
    }

    pub fn configured_runtime(&self) -> Option<&Handle> {
        self.runtime.as_ref()
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _storage = self.storage.lock();
        f()
    }

    pub fn lookup(&self, key: &dyn Key) -> Option<Box<dyn Stored>> {
        let local = {
            let storage = self.storage.lock();
            let map = storage.borrow();
            map.get(key.name())
        };
        if local.is_some() {
            trace!(registry = self.label, key = key.name(), "resolved locally");
            return local;
        }

        let parent = self.parent.as_ref()?;
        trace!(
            registry = self.label,
            parent = parent.label(),
            key = key.name(),
            "delegating lookup to parent"
        );
        parent.dyn_lookup(key)
    }

    pub fn insert(&self, key: &dyn Key, value: Box<dyn Stored>) {
        let storage = self.storage.lock();
        let previous = storage.borrow_mut().insert(key.name(), value);
        drop(storage);

        debug!(
            registry = self.label,
            key = key.name(),
            replaced = previous.is_some(),
            "registered dependency"
        );
    }

    pub fn fill(&self, key: &dyn Key, value: Box<dyn Stored>) -> Box<dyn Stored> {
        let storage = self.storage.lock();
        let (winner, _displaced) = storage.borrow_mut().fill(key.name(), value);
        drop(storage);
        winner
    }

    pub fn remove(&self, key: &dyn Key) -> bool {
        let storage = self.storage.lock();
        let removed = storage.borrow_mut().remove(key.name());
        drop(storage);

        debug!(
            registry = self.label,
            key = key.name(),
            removed = removed.is_some(),
            "unregistered dependency"
        );
        removed.is_some()
    }

    pub fn clear(&self) -> usize {
        let storage = self.storage.lock();
        let removed = storage.borrow_mut().take();
        drop(storage);

        debug!(
            registry = self.label,
            count = removed.len(),
            "unregistered all dependencies"
        );
        removed.len()
    }

    pub fn contains(&self, key: &dyn Key) -> bool {
        self.storage.lock().borrow().contains(key.name())
    }

    pub fn len(&self) -> usize {
        self.storage.lock().borrow().len()
    }
}
