// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Metadata objects exchanged with the store
//!
//! These mirror the Hive metastore thrift objects closely enough that a
//! remote client can translate them field for field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the database every store starts with
pub const DEFAULT_DATABASE: &str = "default";

/// Table parameter marking a table whose data the store does not own
pub const EXTERNAL_PARAM: &str = "EXTERNAL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location_uri: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Database {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            location_uri: None,
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location_uri = Some(location.into());
        self
    }
}

/// A column as the store records it: a name and a Hive type string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub type_name: String,
}

impl FieldSchema {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, type_name: T) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerDeInfo {
    pub serialization_lib: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    pub cols: Vec<FieldSchema>,
    #[serde(default)]
    pub location: Option<String>,
    pub input_format: String,
    pub output_format: String,
    pub serde_info: SerDeInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    #[serde(rename = "MANAGED_TABLE")]
    Managed,
    #[serde(rename = "EXTERNAL_TABLE")]
    External,
}

impl TableType {
    /// The wire name used by the store
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Managed => "MANAGED_TABLE",
            TableType::External => "EXTERNAL_TABLE",
        }
    }

    /// Parse a wire name, ignoring case
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("MANAGED_TABLE") {
            Some(TableType::Managed)
        } else if name.eq_ignore_ascii_case("EXTERNAL_TABLE") {
            Some(TableType::External)
        } else {
            None
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub db_name: String,
    pub table_name: String,
    pub table_type: TableType,
    #[serde(default)]
    pub partition_keys: Vec<FieldSchema>,
    pub sd: StorageDescriptor,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Table {
    /// `db.table`, the form used in messages
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.db_name, &self.table_name)
    }
}

#[must_use]
pub fn qualified_name(database: &str, table: &str) -> String {
    format!("{database}.{table}")
}
