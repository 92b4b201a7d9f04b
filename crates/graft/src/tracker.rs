// SPDX-FileCopyrightText: 2026 Graft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrency-safe record of which integrations have attempted activation.

use std::collections::BTreeSet;

use parking_lot::Mutex;

/// Insert-only set of integration names, one entry per activation attempt
/// (successful or not) in the current process.
#[derive(Debug, Default)]
pub struct PatchedSet {
    inner: Mutex<BTreeSet<String>>,
}

impl PatchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an activation attempt. Returns true iff `name` was not already
    /// present. The check-then-insert happens under one lock acquisition.
    pub fn mark_attempted(&self, name: &str) -> bool {
        self.inner.lock().insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains(name)
    }

    /// Sorted owned copy of the set; never a live reference.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
