// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Metastore - the metadata store seen through a client handle
//!
//! This crate defines what the operations layer needs from a Hive-style
//! metadata store: the metadata objects, the client and factory traits,
//! connection settings with the location rules, and an in-memory store
//! that honours the same contract.

pub mod client;
pub mod error;
pub mod memory;
pub mod model;
pub mod settings;

pub use client::{ClientFactory, MetaStoreClient};
pub use error::{MetastoreError, Result};
pub use memory::{MemoryClient, MemoryMetaStore};
pub use model::{
    DEFAULT_DATABASE, Database, EXTERNAL_PARAM, FieldSchema, SerDeInfo, StorageDescriptor, Table,
    TableType, qualified_name,
};
pub use settings::{DEFAULT_TEXT_DELIMITER, MetaStoreSettings};
