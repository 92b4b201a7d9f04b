// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter registry.
//!
//! Maps adapter paths (a configurable prefix plus the integration name) to
//! factory closures. Loading an adapter is the moment of "import": the
//! factory runs arbitrary adapter construction code and may fail. Nothing is
//! constructed at registration time.

use std::collections::HashMap;

use graft_core::{GraftError, IntegrationAdapter};

/// Default prefix under which integration adapters are resolved.
pub const DEFAULT_ADAPTER_PREFIX: &str = "graft.contrib";

/// Adapter path for an integration under a prefix.
pub fn adapter_path(prefix: &str, integration: &str) -> String {
    format!("{prefix}.{integration}")
}

type AdapterFactory = Box<dyn Fn() -> Result<Box<dyn IntegrationAdapter>, GraftError> + Send + Sync>;

/// Registry of compiled-in adapter factories keyed by adapter path.
#[derive(Default)]
pub struct AdapterRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("factories", &self.factories.len())
            .finish()
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory at the given adapter path. A later registration at
    /// the same path replaces the earlier one.
    pub fn register<F>(&mut self, path: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn IntegrationAdapter>, GraftError> + Send + Sync + 'static,
    {
        self.factories.insert(path.into(), Box::new(factory));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.factories.contains_key(path)
    }

    /// Construct the adapter registered at `path`.
    ///
    /// A missing registration or a failing factory both surface as an
    /// adapter-load failure for the given integration.
    pub fn load(
        &self,
        path: &str,
        integration: &str,
    ) -> Result<Box<dyn IntegrationAdapter>, GraftError> {
        let factory = self
            .factories
            .get(path)
            .ok_or_else(|| GraftError::AdapterLoad {
                integration: integration.to_string(),
                path: path.to_string(),
                message: "no adapter registered at this path".to_string(),
            })?;
        factory().map_err(|err| GraftError::AdapterLoad {
            integration: integration.to_string(),
            path: path.to_string(),
            message: err.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
