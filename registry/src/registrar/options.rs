use std::path::PathBuf;

use crate::store::StoreEngine;

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrarOptions {
    pub store_engine: StoreEngine,
    pub showcase: bool,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl RegistrarOptions {
    pub fn set_store_engine(mut self, store_engine: StoreEngine) -> Self {
        self.store_engine = store_engine;
        self
    }

    /// Puts the demonstration registrants at the top of the listing
    pub fn set_showcase(mut self, showcase: bool) -> Self {
        self.showcase = showcase;
        self
    }
}

impl Default for RegistrarOptions {
    fn default() -> Self {
        // Defaults to $CWD/data
        Self {
            store_engine: StoreEngine::File(PathBuf::from("data")),
            showcase: false,
        }
    }
}

#[cfg(test)]
impl RegistrarOptions {
    pub fn new_test() -> Self {
        RegistrarOptions::default().set_store_engine(StoreEngine::Memory)
    }
}
