// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory metadata store
//!
//! Behaves like a Hive metastore for everything the operations layer
//! observes: names are case-insensitive, duplicate creation fails with
//! `AlreadyExists`, missing objects fail with `NoSuchObject` and managed
//! tables without a location are placed under the warehouse.

use crate::client::{ClientFactory, MetaStoreClient};
use crate::error::{MetastoreError, Result};
use crate::model::{DEFAULT_DATABASE, Database, Table, TableType, qualified_name};
use crate::settings::MetaStoreSettings;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct State {
    databases: BTreeMap<String, Database>,
    // (database, table) -> table
    tables: BTreeMap<(String, String), Table>,
    open_clients: usize,
    acquired_clients: usize,
}

/// Shared in-memory store; clones see the same databases and tables
#[derive(Debug, Clone)]
pub struct MemoryMetaStore(Arc<Mutex<State>>);

impl Default for MemoryMetaStore {
    fn default() -> Self {
        let mut state = State::default();
        _ = state
            .databases
            .insert(DEFAULT_DATABASE.to_string(), Database::new(DEFAULT_DATABASE));
        Self(Arc::new(Mutex::new(state)))
    }
}

impl MemoryMetaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clients acquired and not yet released
    pub fn open_clients(&self) -> Result<usize> {
        Ok(self.0.lock()?.open_clients)
    }

    /// Clients handed out since the store was created
    pub fn acquired_clients(&self) -> Result<usize> {
        Ok(self.0.lock()?.acquired_clients)
    }

    /// A client that is not tracked by the open/acquired counters
    #[must_use]
    pub fn client(&self, settings: &MetaStoreSettings) -> MemoryClient {
        MemoryClient {
            state: self.0.clone(),
            settings: settings.clone(),
        }
    }
}

impl ClientFactory for MemoryMetaStore {
    fn acquire(&self, settings: &MetaStoreSettings) -> Result<Box<dyn MetaStoreClient>> {
        {
            let mut state = self.0.lock()?;
            state.open_clients += 1;
            state.acquired_clients += 1;
            diagnostics::debug!(
                "Acquired memory metastore client, {open} open",
                open: state.open_clients
            );
        }
        Ok(Box::new(self.client(settings)))
    }

    fn release(&self, client: Box<dyn MetaStoreClient>) {
        drop(client);
        match self.0.lock() {
            Ok(mut state) => {
                state.open_clients = state.open_clients.saturating_sub(1);
                diagnostics::debug!(
                    "Released memory metastore client, {open} open",
                    open: state.open_clients
                );
            }
            Err(e) => {
                let reason = e.to_string();
                diagnostics::warn!(
                    "Could not record client release: {reason}",
                    reason: reason.as_str()
                );
            }
        }
    }
}

/// Client handle onto a [`MemoryMetaStore`]
pub struct MemoryClient {
    state: Arc<Mutex<State>>,
    settings: MetaStoreSettings,
}

fn key(database: &str, table: &str) -> (String, String) {
    (database.to_ascii_lowercase(), table.to_ascii_lowercase())
}

impl MetaStoreClient for MemoryClient {
    fn create_database(&self, database: &Database) -> Result<()> {
        let name = database.name.to_ascii_lowercase();
        if name.is_empty() {
            return Err(MetastoreError::InvalidObject(
                "database name cannot be empty".to_string(),
            ));
        }

        let mut state = self.state.lock()?;
        if state.databases.contains_key(&name) {
            return Err(MetastoreError::already_exists(&name));
        }

        let mut stored = database.clone();
        stored.name = name.clone();
        _ = state.databases.insert(name, stored);
        Ok(())
    }

    fn get_database(&self, name: &str) -> Result<Database> {
        self.state
            .lock()?
            .databases
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| MetastoreError::no_such_object(name))
    }

    fn database_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()?
            .databases
            .contains_key(&name.to_ascii_lowercase()))
    }

    fn create_table(&self, table: &Table) -> Result<()> {
        if table.table_name.is_empty() {
            return Err(MetastoreError::InvalidObject(
                "table name cannot be empty".to_string(),
            ));
        }

        let (db_name, table_name) = key(&table.db_name, &table.table_name);
        let mut stored = table.clone();
        stored.db_name = db_name.clone();
        stored.table_name = table_name.clone();

        let mut state = self.state.lock()?;
        let Some(database) = state.databases.get(&db_name) else {
            return Err(MetastoreError::no_such_object(&db_name));
        };

        if stored.sd.location.is_none() {
            if stored.table_type == TableType::External {
                return Err(MetastoreError::InvalidObject(format!(
                    "external table {} requires a location",
                    qualified_name(&db_name, &table_name)
                )));
            }
            let location = self.settings.managed_table_location(database, &table_name)?;
            stored.sd.location = Some(location.to_string());
        }

        let table_key = (db_name, table_name);
        if state.tables.contains_key(&table_key) {
            return Err(MetastoreError::already_exists(qualified_name(
                &table_key.0,
                &table_key.1,
            )));
        }
        _ = state.tables.insert(table_key, stored);
        Ok(())
    }

    fn get_table(&self, database: &str, table: &str) -> Result<Table> {
        self.state
            .lock()?
            .tables
            .get(&key(database, table))
            .cloned()
            .ok_or_else(|| MetastoreError::no_such_object(qualified_name(database, table)))
    }

    fn table_exists(&self, database: &str, table: &str) -> Result<bool> {
        Ok(self.state.lock()?.tables.contains_key(&key(database, table)))
    }

    fn list_tables(&self, database: &str) -> Result<Vec<String>> {
        let database = database.to_ascii_lowercase();
        let state = self.state.lock()?;
        if !state.databases.contains_key(&database) {
            return Err(MetastoreError::no_such_object(&database));
        }
        Ok(state
            .tables
            .keys()
            .filter(|(db, _)| *db == database)
            .map(|(_, table)| table.clone())
            .collect())
    }

    fn drop_table(&self, database: &str, table: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()?
            .tables
            .remove(&key(database, table))
            .is_some())
    }
}
