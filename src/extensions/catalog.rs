//! Extension catalog - The set of extensions this binary can construct
//!
//! The compiled-in equivalent of a module registry: there is no runtime
//! module import, so loadable extensions are declared here as factories.

use std::collections::HashMap;

use super::builtin;
use super::trait_def::Extension;

/// Factory producing a fresh instance of one extension
pub type ExtensionFactory = Box<dyn Fn() -> Box<dyn Extension> + Send + Sync>;

#[derive(Default)]
pub struct ExtensionCatalog {
    factories: HashMap<String, ExtensionFactory>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in extension registered
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register("utility", || Box::new(builtin::UtilityExtension));
        catalog
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Extension> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn get(&self, name: &str) -> Option<&ExtensionFactory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
