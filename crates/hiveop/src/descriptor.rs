// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Table descriptors: the expected shape of a table
//!
//! A descriptor is built from a logical record type, its partition columns,
//! a storage format and an optional location. The same value drives table
//! creation and the strict existence check.

use metastore::{
    Database, EXTERNAL_PARAM, FieldSchema, MetaStoreSettings, SerDeInfo, StorageDescriptor, Table,
    TableType, qualified_name,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

pub const PARQUET_INPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat";
pub const PARQUET_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat";
pub const PARQUET_SERDE: &str = "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe";

pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
pub const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
pub const TEXT_SERDE: &str = "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";

/// Serde parameter holding the text field delimiter
pub const FIELD_DELIM: &str = "field.delim";
pub const SERIALIZATION_FORMAT: &str = "serialization.format";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageFormat {
    Parquet,
    Text { delimiter: String },
}

impl StorageFormat {
    pub fn text<S: Into<String>>(delimiter: S) -> Self {
        StorageFormat::Text {
            delimiter: delimiter.into(),
        }
    }

    /// Text with the configured default delimiter
    #[must_use]
    pub fn default_text(settings: &MetaStoreSettings) -> Self {
        Self::text(settings.text_delimiter.as_str())
    }

    #[must_use]
    pub fn input_format(&self) -> &'static str {
        match self {
            StorageFormat::Parquet => PARQUET_INPUT_FORMAT,
            StorageFormat::Text { .. } => TEXT_INPUT_FORMAT,
        }
    }

    #[must_use]
    pub fn output_format(&self) -> &'static str {
        match self {
            StorageFormat::Parquet => PARQUET_OUTPUT_FORMAT,
            StorageFormat::Text { .. } => TEXT_OUTPUT_FORMAT,
        }
    }

    #[must_use]
    pub fn serialization_lib(&self) -> &'static str {
        match self {
            StorageFormat::Parquet => PARQUET_SERDE,
            StorageFormat::Text { .. } => TEXT_SERDE,
        }
    }

    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        match self {
            StorageFormat::Parquet => None,
            StorageFormat::Text { delimiter } => Some(delimiter.as_str()),
        }
    }

    #[must_use]
    pub fn serde_info(&self) -> SerDeInfo {
        let mut parameters = BTreeMap::new();
        if let Some(delimiter) = self.delimiter() {
            _ = parameters.insert(FIELD_DELIM.to_string(), delimiter.to_string());
            _ = parameters.insert(SERIALIZATION_FORMAT.to_string(), delimiter.to_string());
        }
        SerDeInfo {
            serialization_lib: self.serialization_lib().to_string(),
            parameters,
        }
    }
}

/// A named, typed column; types are Hive type strings such as `string` or `bigint`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub hive_type: String,
}

impl Column {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, hive_type: T) -> Self {
        Self {
            name: name.into(),
            hive_type: hive_type.into(),
        }
    }

    #[must_use]
    pub fn to_field_schema(&self) -> FieldSchema {
        FieldSchema::new(self.name.as_str(), self.hive_type.as_str())
    }
}

/// A logical record type stored as rows of a table
pub trait Record {
    /// Columns in declaration order
    fn columns() -> Vec<Column>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub database: String,
    pub table: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub partition_columns: Vec<Column>,
    pub format: StorageFormat,
    #[serde(default)]
    pub location: Option<String>,
}

impl TableDescriptor {
    pub fn new<D: Into<String>, T: Into<String>>(
        database: D,
        table: T,
        columns: Vec<Column>,
        partition_columns: Vec<Column>,
        format: StorageFormat,
        location: Option<String>,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            columns,
            partition_columns,
            format,
            location,
        }
    }

    /// Describe the table holding records of type `R`.
    ///
    /// Record columns named like a partition column are left out: the
    /// partition column carries that value.
    pub fn for_record<R: Record, D: Into<String>, T: Into<String>>(
        database: D,
        table: T,
        partition_columns: Vec<Column>,
        format: StorageFormat,
        location: Option<String>,
    ) -> Self {
        let columns = R::columns()
            .into_iter()
            .filter(|column| {
                !partition_columns
                    .iter()
                    .any(|partition| partition.name.eq_ignore_ascii_case(&column.name))
            })
            .collect();
        Self::new(database, table, columns, partition_columns, format, location)
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.database, &self.table)
    }

    /// External when an explicit location is given, managed otherwise
    #[must_use]
    pub fn table_type(&self) -> TableType {
        if self.location.is_some() {
            TableType::External
        } else {
            TableType::Managed
        }
    }

    /// Where the table's data is expected to live, fully qualified
    pub fn expected_location(&self, settings: &MetaStoreSettings) -> metastore::Result<Url> {
        self.expected_location_in(settings, None)
    }

    /// Like [`Self::expected_location`], with managed tables placed under
    /// `database`'s own location when it has one
    pub fn expected_location_in(
        &self,
        settings: &MetaStoreSettings,
        database: Option<&Database>,
    ) -> metastore::Result<Url> {
        match (&self.location, database) {
            (Some(location), _) => settings.qualify(location),
            (None, Some(database)) => settings.managed_table_location(database, &self.table),
            (None, None) => settings.default_table_location(&self.database, &self.table),
        }
    }

    /// The table definition sent to the store on creation.
    ///
    /// Managed tables carry no location; the store assigns the default one.
    pub fn to_table(&self, settings: &MetaStoreSettings) -> metastore::Result<Table> {
        let location = match &self.location {
            Some(location) => Some(settings.qualify(location)?.to_string()),
            None => None,
        };

        let mut parameters = BTreeMap::new();
        if self.table_type() == TableType::External {
            _ = parameters.insert(EXTERNAL_PARAM.to_string(), "TRUE".to_string());
        }

        Ok(Table {
            db_name: self.database.clone(),
            table_name: self.table.clone(),
            table_type: self.table_type(),
            partition_keys: self
                .partition_columns
                .iter()
                .map(Column::to_field_schema)
                .collect(),
            sd: StorageDescriptor {
                cols: self.columns.iter().map(Column::to_field_schema).collect(),
                location,
                input_format: self.format.input_format().to_string(),
                output_format: self.format.output_format().to_string(),
                serde_info: self.format.serde_info(),
            },
            parameters,
        })
    }
}
