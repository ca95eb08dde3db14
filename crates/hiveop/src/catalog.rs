// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Database and table operations
//!
//! Creation is idempotent: an object that already exists yields `false`
//! instead of a failure. Concurrent creators of the same object are not
//! coordinated here; the store decides what each of them observes.

use crate::descriptor::TableDescriptor;
use crate::guard::mandatory;
use crate::op::ManagedOp;
use crate::outcome::Failure;
use crate::schema_check;
use metastore::{Database, MetastoreError, Table, TableType, qualified_name};

/// Create `name`; `false` when it already exists
pub fn create_database(name: &str) -> ManagedOp<bool> {
    create_database_with(Database::new(name))
}

/// Create a database with a description, location or parameters
pub fn create_database_with(database: Database) -> ManagedOp<bool> {
    ManagedOp::with_client(move |client| match client.create_database(&database) {
        Ok(()) => {
            diagnostics::info!("Created database {db}", db: database.name.as_str());
            Ok(true)
        }
        Err(e) if e.is_already_exists() => {
            diagnostics::info!("Database {db} already exists", db: database.name.as_str());
            Ok(false)
        }
        Err(e) => Err(Failure::error(
            format!("Failed to create database {}", database.name),
            e,
        )),
    })
}

pub fn exists_database(name: &str) -> ManagedOp<bool> {
    let name = name.to_string();
    ManagedOp::with_client(move |client| {
        client.database_exists(&name).map_err(|e| {
            Failure::error(format!("Failed to check existence of database {name}"), e)
        })
    })
}

/// Create the table described by `descriptor`, creating its database first.
///
/// `false` when a table of that name already exists. The existing table's
/// schema is not compared; use [`ensure_table`] or [`exists_table_strict`]
/// to detect drift.
pub fn create_table(descriptor: &TableDescriptor) -> ManagedOp<bool> {
    let descriptor = descriptor.clone();
    let database = descriptor.database.clone();

    let create = ManagedOp::new(move |conf, client| {
        let name = descriptor.qualified_name();
        let failed = |e: MetastoreError| Failure::error(format!("Failed to create table {name}"), e);

        let table = descriptor.to_table(conf.settings()).map_err(failed)?;
        match client.create_table(&table) {
            Ok(()) => {
                diagnostics::info!("Created table {name}", name: name.as_str());
                Ok(true)
            }
            Err(e) if e.is_already_exists() => {
                diagnostics::info!("Table {name} already exists", name: name.as_str());
                Ok(false)
            }
            Err(e) => Err(failed(e)),
        }
    });

    create_database(&database).flat_map(move |_| create.clone())
}

/// Fetch the live definition of `database.table`
pub fn get_table(database: &str, table: &str) -> ManagedOp<Table> {
    let database = database.to_string();
    let table = table.to_string();
    ManagedOp::with_client(move |client| {
        client.get_table(&database, &table).map_err(|e| {
            Failure::error(
                format!("Failed to get table {}", qualified_name(&database, &table)),
                e,
            )
        })
    })
}

/// Whether a table of that name exists, whatever its schema
pub fn exists_table(database: &str, table: &str) -> ManagedOp<bool> {
    let database = database.to_string();
    let table = table.to_string();
    ManagedOp::with_client(move |client| {
        client.table_exists(&database, &table).map_err(|e| {
            Failure::error(
                format!(
                    "Failed to check existence of {}",
                    qualified_name(&database, &table)
                ),
                e,
            )
        })
    })
}

/// Whether the table exists and matches `descriptor` structurally.
///
/// An absent table is `false`, not a failure.
pub fn exists_table_strict(descriptor: &TableDescriptor) -> ManagedOp<bool> {
    let descriptor = descriptor.clone();
    ManagedOp::new(move |conf, client| {
        let name = descriptor.qualified_name();
        let failed = |e: MetastoreError| {
            Failure::error(format!("Failed to check strict existence of {name}"), e)
        };

        let table = match client.get_table(&descriptor.database, &descriptor.table) {
            Ok(table) => table,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(failed(e)),
        };

        // Managed tables live under their database's location
        let database = match descriptor.table_type() {
            TableType::Managed => match client.get_database(&descriptor.database) {
                Ok(database) => Some(database),
                Err(e) if e.is_not_found() => return Ok(false),
                Err(e) => return Err(failed(e)),
            },
            TableType::External => None,
        };

        schema_check::is_equivalent_in(&descriptor, database.as_ref(), &table, conf.settings())
            .map_err(failed)
    })
}

/// Create the table, or require that the existing one matches `descriptor`.
///
/// `true` when the table was created, `false` when an equivalent table was
/// already there.
pub fn ensure_table(descriptor: &TableDescriptor) -> ManagedOp<bool> {
    let strict = mandatory(
        exists_table_strict(descriptor),
        format!(
            "{} already exists with a different schema",
            descriptor.qualified_name()
        ),
    );

    create_table(descriptor).flat_map(move |created| {
        if created {
            ManagedOp::value(true)
        } else {
            strict.clone().map(|()| false)
        }
    })
}

pub fn list_tables(database: &str) -> ManagedOp<Vec<String>> {
    let database = database.to_string();
    ManagedOp::with_client(move |client| {
        client
            .list_tables(&database)
            .map_err(|e| Failure::error(format!("Failed to list tables in {database}"), e))
    })
}

/// Drop `database.table`; `false` when there was nothing to drop
pub fn drop_table(database: &str, table: &str) -> ManagedOp<bool> {
    let database = database.to_string();
    let table = table.to_string();
    ManagedOp::with_client(move |client| {
        client.drop_table(&database, &table).map_err(|e| {
            Failure::error(
                format!("Failed to drop table {}", qualified_name(&database, &table)),
                e,
            )
        })
    })
}
