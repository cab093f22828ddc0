use std::sync::LazyLock;

use crate::registry::Registry;

static GLOBAL: LazyLock<Registry> = LazyLock::new(|| Registry::builder().label("global").build());

/// The process-wide default registry, created on first use.
pub fn global() -> &'static Registry {
    &GLOBAL
}
