//! Serialization of one row into a Lua table constructor.

use crate::{datavalues::CellValue, error::Error, schema::TableSchema};

use super::value_format::LuaValueEncoder;

/// Separator between the fields of a record.
const FIELD_SEPARATOR: &str = ", ";

/// Turns rows into records of the form `{ name1=value1, name2=value2 }`.
#[derive(Debug, Default)]
pub struct RecordSerializer {
    encoder: LuaValueEncoder,
}

impl RecordSerializer {
    /// Create a new [RecordSerializer] using the given [LuaValueEncoder].
    pub fn new(encoder: LuaValueEncoder) -> Self {
        Self { encoder }
    }

    /// Serialize a row of the given table.
    ///
    /// Cells are paired with the columns of `schema` by position. The `extra_fields`
    /// are appended after the last column, in the given order, with their values
    /// taken verbatim.
    pub fn serialize(
        &self,
        schema: &TableSchema,
        row: &[CellValue],
        extra_fields: &[(&str, String)],
    ) -> Result<String, Error> {
        if row.len() != schema.arity() {
            return Err(Error::ArityMismatch {
                table: schema.table().to_string(),
                expected: schema.arity(),
                found: row.len(),
            });
        }

        let fields = schema
            .columns()
            .iter()
            .zip(row)
            .map(|(column, value)| {
                format!("{}={}", column.name(), self.encoder.encode(value, column))
            })
            .chain(
                extra_fields
                    .iter()
                    .map(|(name, value)| format!("{name}={value}")),
            )
            .collect::<Vec<_>>();

        if fields.is_empty() {
            return Ok("{ }".to_string());
        }

        Ok(format!("{{ {} }}", fields.join(FIELD_SEPARATOR)))
    }
}
