// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use metastore::{ClientFactory, MemoryMetaStore, MetaStoreSettings};
use std::fmt;
use std::sync::Arc;

/// Configuration handed to every operation: settings plus the client source
#[derive(Clone)]
pub struct HiveConf {
    settings: MetaStoreSettings,
    factory: Arc<dyn ClientFactory>,
}

impl HiveConf {
    pub fn new<F: ClientFactory + 'static>(settings: MetaStoreSettings, factory: F) -> Self {
        Self::with_factory(settings, Arc::new(factory))
    }

    pub fn with_factory(settings: MetaStoreSettings, factory: Arc<dyn ClientFactory>) -> Self {
        Self { settings, factory }
    }

    /// Settings backed by a fresh in-memory store
    pub fn embedded(settings: MetaStoreSettings) -> Self {
        Self::new(settings, MemoryMetaStore::new())
    }

    #[must_use]
    pub fn settings(&self) -> &MetaStoreSettings {
        &self.settings
    }

    #[must_use]
    pub fn factory(&self) -> &dyn ClientFactory {
        self.factory.as_ref()
    }
}

impl fmt::Debug for HiveConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HiveConf")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
