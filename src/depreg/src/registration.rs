use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::warn;

use crate::key::DependencyKey;
use crate::link::AsBaseDependency;
use crate::registry::{Dependency, Registry};

/// A registration prepared ahead of time, applied by
/// [`Registry::register_all`].
pub struct Registration {
    key: &'static str,
    apply: Box<dyn FnOnce(&Registry) + Send>,
}

impl Registration {
    fn new(key: &'static str, apply: impl FnOnce(&Registry) + Send + 'static) -> Self {
        Self {
            key,
            apply: Box::new(apply),
        }
    }

    /// The name of the slot this registration writes to.
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub(crate) fn apply(self, registry: &Registry) {
        (self.apply)(registry);
    }
}

impl Debug for Registration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Starts describing a registration for `key`.
///
/// ```
/// use depreg::prelude::*;
///
/// static NAME: DependencyKey<String> = DependencyKey::new("name");
/// static PORT: DependencyKey<u16> = DependencyKey::new("port");
///
/// let registry = Registry::new();
/// registry.register_all([
///     bind(&NAME).to(String::from("server")),
///     bind(&PORT).to_with(|| 8080),
/// ]);
///
/// assert_eq!(registry.resolve(&PORT).unwrap(), 8080);
/// ```
pub fn bind<T>(key: &DependencyKey<T>) -> Binding<T>
where
    T: Dependency,
{
    Binding { key: *key }
}

pub struct Binding<T>
where
    T: Dependency,
{
    key: DependencyKey<T>,
}

impl<T> Binding<T>
where
    T: Dependency,
{
    /// Registers `value` as is. Base dependencies want [`Binding::to_linked`].
    pub fn to(self, value: T) -> Registration {
        let key = self.key;
        Registration::new(key.name(), move |registry| registry.register(&key, value))
    }

    /// Builds the value when the registration is applied.
    pub fn to_with<F>(self, factory: F) -> Registration
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let key = self.key;
        Registration::new(key.name(), move |registry| {
            registry.register(&key, factory());
        })
    }

    /// Builds the key's default when the registration is applied, instead of
    /// on the first miss. A key without a default registers nothing.
    pub fn to_default(self) -> Registration {
        let key = self.key;
        Registration::new(key.name(), move |registry| match key.default_value() {
            Some(value) => registry.register(&key, value),
            None => warn!(
                registry = registry.label(),
                key = key.name(),
                "eager default requested for a key without a default"
            ),
        })
    }

    pub fn to_linked(self, value: T) -> Registration
    where
        T: AsBaseDependency,
    {
        let key = self.key;
        Registration::new(key.name(), move |registry| {
            registry.register_linked(&key, value);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::key;
    use crate::link::{BaseDependency, HasRegistryLink, RegistryLink};

    use super::*;

    #[derive(HasRegistryLink)]
    struct Database {
        link: RegistryLink,
    }

    impl BaseDependency for Database {
        fn setup(&self) {
            self.registry()
                .register(&key::named::<bool>("database_ready"), true);
        }
    }

    #[test]
    fn register_all_applies_registrations_in_order() {
        let registry = Registry::new();
        let key = key::named::<i32>("value");

        let registrations = vec![bind(&key).to(1), bind(&key).to_with(|| 2)];
        assert_eq!(registrations[0].key(), "value");
        registry.register_all(registrations);

        assert_eq!(registry.resolve(&key).unwrap(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn to_default_materialises_default_eagerly() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);
        static RETRIES: DependencyKey<u32> = DependencyKey::with_default("retries", || {
            BUILT.fetch_add(1, Ordering::SeqCst);
            3
        });

        let registry = Registry::new();
        registry.register_all([bind(&RETRIES).to_default()]);

        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
        assert!(registry.contains(&RETRIES));
        assert_eq!(registry.resolve(&RETRIES).unwrap(), 3);
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn to_default_skips_keys_without_default() {
        let registry = Registry::new();
        let key = key::named::<u32>("retries");

        registry.register_all([bind(&key).to_default()]);

        assert!(registry.is_empty());
    }

    #[test]
    fn register_all_links_base_dependencies() {
        let registry = Registry::new();
        let database = Arc::new(Database {
            link: RegistryLink::new(),
        });

        registry.register_all([
            bind(&key::named::<&'static str>("url")).to("postgres://localhost"),
            bind(&key::of::<Arc<Database>>()).to_linked(Arc::clone(&database)),
        ]);

        assert!(registry.resolve(&key::named::<bool>("database_ready")).unwrap());
        assert!(Registry::ptr_eq(&database.registry(), &registry));
    }
}
