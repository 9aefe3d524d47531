//! Silo adapters and their registry.
//!
//! Adapters are plain values implementing the [`SiloAdapter`] port,
//! registered in an explicit table built at startup. Lookup is by
//! case-insensitive name; an unknown name is simply absent, never an
//! error. Each run constructs its own registry, so there is no process
//! state to invalidate between tests.

pub mod dev;
pub mod medium;

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Client;

use crate::ports::SiloAdapter;

pub use dev::DevAdapter;
pub use medium::MediumAdapter;

/// The startup-built table of known silo adapters.
#[derive(Default)]
pub struct SiloRegistry {
    adapters: BTreeMap<String, Arc<dyn SiloAdapter>>,
}

impl SiloRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in silo adapter.
    #[must_use]
    pub fn builtin() -> Self {
        let client = Client::new();
        let mut registry = Self::new();
        registry.register(Arc::new(DevAdapter::new(client.clone())));
        registry.register(Arc::new(MediumAdapter::new(client)));
        registry
    }

    /// Registers an adapter under its lowercased name.
    pub fn register(&mut self, adapter: Arc<dyn SiloAdapter>) {
        self.adapters.insert(adapter.name().to_lowercase(), adapter);
    }

    /// Looks up an adapter by case-insensitive name.
    #[must_use]
    pub fn locate(&self, silo: &str) -> Option<Arc<dyn SiloAdapter>> {
        self.adapters.get(&silo.to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_knows_dev_and_medium() {
        let registry = SiloRegistry::builtin();
        assert!(registry.locate("dev").is_some());
        assert!(registry.locate("medium").is_some());
        assert!(registry.locate("tumblr").is_none());
    }

    #[test]
    fn locate_is_case_insensitive() {
        let registry = SiloRegistry::builtin();
        assert!(registry.locate("DEV").is_some());
        assert!(registry.locate("Medium").is_some());
    }
}
