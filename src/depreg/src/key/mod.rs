mod implementation;

use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

use crate::registry::Dependency;

pub use crate::key::implementation::DependencyKey;

/// A type-erased view of a dependency slot.
///
/// Two keys denote the same slot iff their names are equal, regardless of the
/// type each of them was declared with. Storage, removal and parent
/// delegation all work on `dyn Key`, while typed access goes through
/// [`DependencyKey`].
pub trait Key: Debug + Display + Send + Sync + 'static {
    /// The stable identity of the slot.
    fn name(&self) -> &'static str;

    /// The name of the type this key was declared for. Only used in
    /// diagnostics.
    fn target_name(&self) -> &'static str;
}

impl PartialEq for dyn Key {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for dyn Key {}

impl Hash for dyn Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

/// Returns a key named after the fully-qualified name of `T`.
pub fn of<T>() -> DependencyKey<T>
where
    T: Dependency,
{
    DependencyKey::of()
}

/// Returns a key with an explicit name.
pub fn named<T>(name: &'static str) -> DependencyKey<T>
where
    T: Dependency,
{
    DependencyKey::new(name)
}
