// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module-load event bus.
//!
//! The bus is the loader-interception shim: integrations subscribe hooks
//! against module names, and the host signals loads through
//! [`ModuleHookBus::notify_loaded`]. Each hook fires exactly once, either at
//! notification time (in registration order) or synchronously at registration
//! time if the module was already loaded. Registering never triggers a load.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use graft_core::GraftError;

/// A one-shot module-load hook.
pub type HookFn = Box<dyn FnOnce() -> Result<(), GraftError> + Send>;

#[derive(Default)]
struct ModuleState {
    loaded: bool,
    hooks: Vec<HookFn>,
}

/// Process-wide module-load event bus.
///
/// Safe to share across threads; registration order per module name is
/// preserved and determines firing order. Hooks run outside the internal
/// lock, so a slow hook never blocks hooks on other modules.
pub struct ModuleHookBus {
    modules: Mutex<HashMap<String, ModuleState>>,
}

impl ModuleHookBus {
    pub fn new() -> Self {
        Self {
            modules: Mutex::new(HashMap::new()),
        }
    }

    /// Register a hook for `module`.
    ///
    /// If the module is already loaded the hook fires immediately on the
    /// calling thread and its error (if any) is returned to the registrant.
    pub fn register(&self, module: &str, hook: HookFn) -> Result<(), GraftError> {
        let immediate = {
            let mut modules = self.modules.lock();
            let state = modules.entry(module.to_string()).or_default();
            if state.loaded {
                Some(hook)
            } else {
                state.hooks.push(hook);
                None
            }
        };
        match immediate {
            Some(hook) => {
                debug!(module, "module already loaded; firing hook immediately");
                hook()
            }
            None => {
                debug!(module, "registered module-load hook");
                Ok(())
            }
        }
    }

    /// Signal that `module` has been loaded.
    ///
    /// Pending hooks are drained and run in registration order on the calling
    /// thread; their errors are returned to the caller. Later notifications
    /// for the same module are no-ops for already-fired hooks.
    pub fn notify_loaded(&self, module: &str) -> Vec<GraftError> {
        let hooks = {
            let mut modules = self.modules.lock();
            let state = modules.entry(module.to_string()).or_default();
            state.loaded = true;
            std::mem::take(&mut state.hooks)
        };
        if !hooks.is_empty() {
            debug!(module, count = hooks.len(), "firing module-load hooks");
        }
        let mut errors = Vec::new();
        for hook in hooks {
            if let Err(err) = hook() {
                errors.push(err);
            }
        }
        errors
    }

    /// Whether the bus has seen a load notification for `module`.
    pub fn is_loaded(&self, module: &str) -> bool {
        self.modules
            .lock()
            .get(module)
            .is_some_and(|state| state.loaded)
    }

    /// Number of hooks waiting for `module` to load.
    pub fn pending_hooks(&self, module: &str) -> usize {
        self.modules
            .lock()
            .get(module)
            .map_or(0, |state| state.hooks.len())
    }
}

impl Default for ModuleHookBus {
    fn default() -> Self {
        Self::new()
    }
}
