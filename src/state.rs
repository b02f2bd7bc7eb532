// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

use std::sync::Arc;

use crate::provenance::ProvenanceService;
use crate::store::{MemoryObjectStore, ObjectStore};

/// Shared application state.
///
/// The object store handle is constructed once at the entry point and
/// injected here; nothing in the crate reaches for a global store.
#[derive(Clone)]
pub struct AppState {
    pub provenance: Arc<ProvenanceService>,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            provenance: Arc::new(ProvenanceService::new(store)),
        }
    }
}

impl Default for AppState {
    /// State over an in-memory store, for tests.
    fn default() -> Self {
        Self::new(Arc::new(MemoryObjectStore::new()))
    }
}
