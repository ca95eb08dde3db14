// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Structural comparison of a live table against a descriptor
//!
//! Items are checked in a fixed order: table type, location, columns,
//! partition columns, input format, output format, and for text tables the
//! field delimiter. Names, types and format identifiers compare without
//! regard to case; column lists compare in order. Locations compare after
//! both sides are qualified with the same settings.

use crate::descriptor::{FIELD_DELIM, TableDescriptor};
use metastore::{Database, FieldSchema, MetaStoreSettings, Table};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaItem {
    TableType,
    Location,
    Columns,
    PartitionColumns,
    InputFormat,
    OutputFormat,
    Delimiter,
}

impl fmt::Display for SchemaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaItem::TableType => "table type",
            SchemaItem::Location => "location",
            SchemaItem::Columns => "columns",
            SchemaItem::PartitionColumns => "partition columns",
            SchemaItem::InputFormat => "input format",
            SchemaItem::OutputFormat => "output format",
            SchemaItem::Delimiter => "field delimiter",
        };
        f.write_str(name)
    }
}

/// One item on which the live table differs from the descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub item: SchemaItem,
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    fn new<E: Into<String>, A: Into<String>>(item: SchemaItem, expected: E, actual: A) -> Self {
        Self {
            item,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} differs: expected {}, found {}",
            self.item, self.expected, self.actual
        )
    }
}

fn render_fields(fields: &[FieldSchema]) -> String {
    let rendered: Vec<String> = fields
        .iter()
        .map(|field| format!("{}:{}", field.name, field.type_name))
        .collect();
    format!("[{}]", rendered.join(", "))
}

fn same_fields(expected: &[FieldSchema], actual: &[FieldSchema]) -> bool {
    expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| {
            e.name.eq_ignore_ascii_case(&a.name) && e.type_name.eq_ignore_ascii_case(&a.type_name)
        })
}

/// Every item on which `actual` differs from `expected`, in check order.
///
/// Fails only when a location cannot be qualified.
pub fn compare(
    expected: &TableDescriptor,
    actual: &Table,
    settings: &MetaStoreSettings,
) -> metastore::Result<Vec<Mismatch>> {
    compare_in(expected, None, actual, settings)
}

/// [`compare`] for a table of `database`, whose own location decides where
/// a managed table is expected
pub fn compare_in(
    expected: &TableDescriptor,
    database: Option<&Database>,
    actual: &Table,
    settings: &MetaStoreSettings,
) -> metastore::Result<Vec<Mismatch>> {
    let mut mismatches = Vec::new();

    if expected.table_type() != actual.table_type {
        mismatches.push(Mismatch::new(
            SchemaItem::TableType,
            expected.table_type().as_str(),
            actual.table_type.as_str(),
        ));
    }

    let expected_location = expected.expected_location_in(settings, database)?;
    let actual_location = match &actual.sd.location {
        Some(location) => Some(settings.qualify(location)?),
        None => None,
    };
    if actual_location.as_ref() != Some(&expected_location) {
        mismatches.push(Mismatch::new(
            SchemaItem::Location,
            expected_location.as_str(),
            actual_location
                .as_ref()
                .map_or("<none>", |location| location.as_str()),
        ));
    }

    let expected_columns: Vec<FieldSchema> =
        expected.columns.iter().map(|c| c.to_field_schema()).collect();
    if !same_fields(&expected_columns, &actual.sd.cols) {
        mismatches.push(Mismatch::new(
            SchemaItem::Columns,
            render_fields(&expected_columns),
            render_fields(&actual.sd.cols),
        ));
    }

    let expected_partitions: Vec<FieldSchema> = expected
        .partition_columns
        .iter()
        .map(|c| c.to_field_schema())
        .collect();
    if !same_fields(&expected_partitions, &actual.partition_keys) {
        mismatches.push(Mismatch::new(
            SchemaItem::PartitionColumns,
            render_fields(&expected_partitions),
            render_fields(&actual.partition_keys),
        ));
    }

    let input_format = expected.format.input_format();
    if !input_format.eq_ignore_ascii_case(&actual.sd.input_format) {
        mismatches.push(Mismatch::new(
            SchemaItem::InputFormat,
            input_format,
            actual.sd.input_format.as_str(),
        ));
    }

    let output_format = expected.format.output_format();
    if !output_format.eq_ignore_ascii_case(&actual.sd.output_format) {
        mismatches.push(Mismatch::new(
            SchemaItem::OutputFormat,
            output_format,
            actual.sd.output_format.as_str(),
        ));
    }

    // Parquet tables have no delimiter to compare
    if let Some(delimiter) = expected.format.delimiter() {
        let recorded = actual.sd.serde_info.parameters.get(FIELD_DELIM);
        if recorded.map(String::as_str) != Some(delimiter) {
            mismatches.push(Mismatch::new(
                SchemaItem::Delimiter,
                format!("{delimiter:?}"),
                recorded.map_or_else(|| "<none>".to_string(), |d| format!("{d:?}")),
            ));
        }
    }

    for mismatch in &mismatches {
        let name = expected.qualified_name();
        let detail = mismatch.to_string();
        diagnostics::debug!(
            "Schema of {table}: {detail}",
            table: name.as_str(),
            detail: detail.as_str()
        );
    }

    Ok(mismatches)
}

/// True when the live table matches the descriptor on every item
pub fn is_equivalent(
    expected: &TableDescriptor,
    actual: &Table,
    settings: &MetaStoreSettings,
) -> metastore::Result<bool> {
    Ok(compare(expected, actual, settings)?.is_empty())
}

pub fn is_equivalent_in(
    expected: &TableDescriptor,
    database: Option<&Database>,
    actual: &Table,
    settings: &MetaStoreSettings,
) -> metastore::Result<bool> {
    Ok(compare_in(expected, database, actual, settings)?.is_empty())
}
