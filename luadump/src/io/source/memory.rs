//! A [DataSource] over tables held in memory.

use std::collections::HashMap;

use crate::{
    datavalues::Row,
    export::{LookupSpec, SideLookup},
    schema::TableSchema,
};

use super::{DataSource, SourceError};

/// Tables held in memory, mostly useful for tests and for embedding.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    tables: HashMap<String, (TableSchema, Vec<Row>)>,
}

impl MemorySource {
    /// Create an empty [MemorySource].
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table of the same name.
    pub fn add_table(&mut self, schema: TableSchema, rows: Vec<Row>) {
        self.tables
            .insert(schema.table().to_string(), (schema, rows));
    }

    /// Builder-style variant of [MemorySource::add_table].
    pub fn with_table(mut self, schema: TableSchema, rows: Vec<Row>) -> Self {
        self.add_table(schema, rows);
        self
    }

    fn table(&self, table: &str) -> Result<&(TableSchema, Vec<Row>), SourceError> {
        self.tables
            .get(table)
            .ok_or_else(|| SourceError::UnknownTable(table.to_string()))
    }
}

impl DataSource for MemorySource {
    fn resolve_schema(&mut self, table: &str) -> Result<TableSchema, SourceError> {
        self.table(table).map(|(schema, _)| schema.clone())
    }

    fn fetch_rows(&mut self, schema: &TableSchema) -> Result<Vec<Row>, SourceError> {
        self.table(schema.table()).map(|(_, rows)| rows.clone())
    }

    fn fetch_side_lookup(&mut self, spec: &LookupSpec) -> Result<SideLookup, SourceError> {
        let (schema, rows) = self.table(&spec.table)?;

        let position = |column: &str| {
            schema
                .columns()
                .iter()
                .position(|descriptor| descriptor.name() == column)
                .ok_or_else(|| SourceError::UnknownColumn {
                    table: spec.table.clone(),
                    column: column.to_string(),
                })
        };
        let key_index = position(&spec.key_column)?;
        let value_index = position(&spec.value_column)?;

        let integer = |row: &Row, index: usize, column: &str| {
            row.get(index)
                .and_then(|cell| cell.as_i64())
                .ok_or_else(|| SourceError::Decode {
                    table: spec.table.clone(),
                    column: column.to_string(),
                    message: "expected an integer".to_string(),
                })
        };

        rows.iter()
            .map(|row| -> Result<(i64, i64), SourceError> {
                Ok((
                    integer(row, key_index, &spec.key_column)?,
                    integer(row, value_index, &spec.value_column)?,
                ))
            })
            .collect()
    }
}
