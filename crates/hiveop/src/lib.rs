// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hiveop - managed operations against a Hive-style metadata store
//!
//! Operations are values. They are composed with [`ManagedOp::flat_map`]
//! and friends, and nothing touches the store until [`ManagedOp::run`]
//! acquires a client from the configured [`metastore::ClientFactory`],
//! evaluates the pipeline with it and releases it again.
//!
//! ```no_run
//! use hiveop::{Column, HiveConf, StorageFormat, TableDescriptor, catalog, guard};
//! use metastore::MetaStoreSettings;
//!
//! let conf = HiveConf::embedded(MetaStoreSettings::new("/tmp/warehouse"));
//! let events = TableDescriptor::new(
//!     "analytics",
//!     "events",
//!     vec![Column::new("id", "bigint")],
//!     vec![Column::new("day", "string")],
//!     StorageFormat::Parquet,
//!     None,
//! );
//!
//! let pipeline = catalog::create_table(&events)
//!     .flat_map(move |_| guard::mandatory(catalog::exists_table_strict(&events), "schema drift"));
//! let outcome = pipeline.run(&conf);
//! ```

pub mod catalog;
pub mod conf;
pub mod contain;
pub mod descriptor;
pub mod guard;
pub mod lifecycle;
pub mod op;
pub mod outcome;
pub mod schema_check;

pub use conf::HiveConf;
pub use contain::{FatalSignal, is_fatal};
pub use descriptor::{Column, Record, StorageFormat, TableDescriptor};
pub use lifecycle::{CREATE_CLIENT_FAILED, RUN_OPERATION_FAILED};
pub use op::ManagedOp;
pub use outcome::{Cause, Failure, Outcome, OutcomeExt, PanicError, error, fail, ok};
pub use schema_check::{Mismatch, SchemaItem};
