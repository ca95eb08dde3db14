// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::model::{Database, Table};
use crate::settings::MetaStoreSettings;

/// An open connection to the metadata store
///
/// Calls block until the store answers. Failures other than the
/// `AlreadyExists`/`NoSuchObject` conditions are transport failures.
pub trait MetaStoreClient {
    fn create_database(&self, database: &Database) -> Result<()>;
    fn get_database(&self, name: &str) -> Result<Database>;
    fn database_exists(&self, name: &str) -> Result<bool>;

    fn create_table(&self, table: &Table) -> Result<()>;
    /// Fails with `NoSuchObject` when the table is absent
    fn get_table(&self, database: &str, table: &str) -> Result<Table>;
    fn table_exists(&self, database: &str, table: &str) -> Result<bool>;
    fn list_tables(&self, database: &str) -> Result<Vec<String>>;
    /// Returns false when there was nothing to drop
    fn drop_table(&self, database: &str, table: &str) -> Result<bool>;
}

/// Source of client handles
///
/// Every acquired handle is handed back through `release` exactly once.
/// `release` never fails; a connection that cannot be closed cleanly is
/// logged and forgotten.
pub trait ClientFactory: Send + Sync {
    fn acquire(&self, settings: &MetaStoreSettings) -> Result<Box<dyn MetaStoreClient>>;
    fn release(&self, client: Box<dyn MetaStoreClient>);
}
