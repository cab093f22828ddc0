use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use snafu::prelude::*;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

use crate::key::DependencyKey;
use crate::link::AsBaseDependency;
use crate::registry::{Dependency, Registry};

pub struct Subscriptions {
    tasks: Mutex<Vec<AbortHandle>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, task: AbortHandle) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }

    pub fn active(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}

impl Registry {
    /// Re-registers `key` with every value `stream` yields.
    ///
    /// Values are registered in emission order, each one before the next is
    /// polled. The subscription lives as long as this registry does and does
    /// not keep it alive. It runs on the registry's configured runtime, or on
    /// the runtime current at the time of the call.
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError::NoRuntime`] if there is no runtime to run the
    /// subscription on.
    ///
    /// Values are stored without linking; use
    /// [`Registry::subscribe_dynamic_linked`] for base dependencies.
    pub fn subscribe_dynamic<T, S>(
        &self,
        key: &DependencyKey<T>,
        stream: S,
    ) -> Result<(), SubscribeError>
    where
        T: Dependency,
        S: Stream<Item = T> + Send + 'static,
    {
        self.spawn_subscription(key, stream, |registry, key, value| {
            registry.register(key, value);
        })
    }

    /// Like [`Registry::subscribe_dynamic`], registering each value through
    /// [`Registry::register_linked`].
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError::NoRuntime`] if there is no runtime to run the
    /// subscription on.
    pub fn subscribe_dynamic_linked<T, S>(
        &self,
        key: &DependencyKey<T>,
        stream: S,
    ) -> Result<(), SubscribeError>
    where
        T: Dependency + AsBaseDependency,
        S: Stream<Item = T> + Send + 'static,
    {
        self.spawn_subscription(key, stream, |registry, key, value| {
            registry.register_linked(key, value);
        })
    }

    /// The number of subscriptions whose stream has not completed yet.
    pub fn active_subscriptions(&self) -> usize {
        self.core.subscriptions().active()
    }

    fn spawn_subscription<T, S, F>(
        &self,
        key: &DependencyKey<T>,
        stream: S,
        apply: F,
    ) -> Result<(), SubscribeError>
    where
        T: Dependency,
        S: Stream<Item = T> + Send + 'static,
        F: Fn(&Registry, &DependencyKey<T>, T) + Send + 'static,
    {
        let Some(runtime) = self.runtime() else {
            return Err(SubscribeError::NoRuntime { key: key.name() });
        };

        let key = *key;
        let label = self.label();
        let registry = Arc::downgrade(&self.core);
        let task = runtime.spawn(async move {
            let mut stream = pin!(stream);
            while let Some(value) = stream.next().await {
                let Some(registry) = Registry::upgrade(&registry) else {
                    break;
                };
                trace!(registry = label, key = key.name(), "stream emitted a value");
                apply(&registry, &key, value);
            }
            debug!(registry = label, key = key.name(), "dynamic subscription ended");
        });

        self.core.subscriptions().insert(task.abort_handle());
        debug!(registry = label, key = key.name(), "subscribed to dynamic stream");
        Ok(())
    }

    fn runtime(&self) -> Option<Handle> {
        self.core
            .configured_runtime()
            .cloned()
            .or_else(|| Handle::try_current().ok())
    }
}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum SubscribeError {
    #[snafu(display("could not subscribe {key} to a stream without a tokio runtime"))]
    #[non_exhaustive]
    NoRuntime { key: &'static str },
}
