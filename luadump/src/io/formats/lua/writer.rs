//! The writer for Lua table files.

use std::io::Write;

use crate::{
    datavalues::{CellValue, Row},
    error::Error,
    export::SideLookup,
    io::formats::PROGRESS_NOTIFY_INCREMENT,
    schema::TableSchema,
};

use super::record::RecordSerializer;

/// Extra field appended to every record of a table, with its value looked up by the
/// first cell of the row.
#[derive(Debug, Clone, Copy)]
pub struct RowEnrichment<'a> {
    /// Name of the appended field
    pub field: &'a str,
    /// Map from the first cell of a row to the value of the field
    pub lookup: &'a SideLookup,
}

impl RowEnrichment<'_> {
    fn value_for(&self, table: &str, row: &[CellValue]) -> Result<i64, Error> {
        let key = match row.first() {
            Some(cell) => cell.as_i64().ok_or_else(|| Error::InvalidLookupKey {
                table: table.to_string(),
                value: cell.to_string(),
            })?,
            None => {
                return Err(Error::InvalidLookupKey {
                    table: table.to_string(),
                    value: "an empty row".to_string(),
                })
            }
        };

        self.lookup.get(key).ok_or_else(|| Error::LookupMiss {
            table: table.to_string(),
            key,
        })
    }
}

/// Writes tables as Lua assignments and finishes the file with a `return`
/// statement that exposes them by name.
pub struct LuaWriter<W: Write> {
    /// Buffer to write into
    writer: W,
    /// Turns single rows into records
    serializer: RecordSerializer,
}

impl<W: Write> LuaWriter<W> {
    /// Create a new [LuaWriter] with the default [RecordSerializer].
    pub fn new(writer: W) -> Self {
        Self::with_serializer(writer, RecordSerializer::default())
    }

    /// Create a new [LuaWriter] with the given [RecordSerializer].
    pub fn with_serializer(writer: W, serializer: RecordSerializer) -> Self {
        Self { writer, serializer }
    }

    /// Write one table as `<name> = { ... };` with one record per line.
    ///
    /// Returns the number of rows written.
    pub fn write_table(
        &mut self,
        schema: &TableSchema,
        rows: impl IntoIterator<Item = Row>,
        enrichment: Option<RowEnrichment<'_>>,
    ) -> Result<u64, Error> {
        log::info!("Writing table {}", schema.table());

        writeln!(self.writer, "{} = {{", schema.table())?;

        let mut line_count: u64 = 0;
        for row in rows {
            let extra_fields = match enrichment {
                Some(enrichment) => vec![(
                    enrichment.field,
                    enrichment.value_for(schema.table(), &row)?.to_string(),
                )],
                None => Vec::new(),
            };

            let record = self.serializer.serialize(schema, &row, &extra_fields)?;
            writeln!(self.writer, "\t{record},")?;

            line_count += 1;
            if (line_count % PROGRESS_NOTIFY_INCREMENT) == 0 {
                log::info!("... processed {line_count} rows");
            }
        }

        writeln!(self.writer, "}};")?;
        self.writer.flush()?;

        log::info!(
            "Finished table {}: processed {line_count} rows",
            schema.table()
        );

        Ok(line_count)
    }

    /// Write the final `return { name = name, ... }` statement.
    pub fn write_index<S: AsRef<str>>(&mut self, tables: &[S]) -> Result<(), Error> {
        write!(self.writer, "\nreturn {{\n")?;
        for table in tables {
            writeln!(self.writer, "\t{0} = {0},", table.as_ref())?;
        }
        write!(self.writer, "}}")?;
        self.writer.flush()?;

        Ok(())
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> std::fmt::Debug for LuaWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuaWriter")
            .field("writer", &"<unspecified std::io::Write>")
            .field("serializer", &self.serializer)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::{
        datavalues::CellValue,
        error::Error,
        export::SideLookup,
        schema::{ColumnDescriptor, TableSchema},
    };

    use super::{LuaWriter, RowEnrichment};

    fn zone_schema() -> TableSchema {
        TableSchema::new(
            "fishing_zone",
            vec![
                ColumnDescriptor::new("zoneid", "smallint(3) unsigned"),
                ColumnDescriptor::new("name", "varchar(40)"),
            ],
        )
    }

    fn written(writer: LuaWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn table_block() {
        let schema = TableSchema::new(
            "fishing_rod",
            vec![
                ColumnDescriptor::new("rodid", "tinyint(3) unsigned"),
                ColumnDescriptor::new("name", "varchar(64)"),
            ],
        );

        let mut writer = LuaWriter::new(Vec::<u8>::new());
        let count = writer
            .write_table(
                &schema,
                vec![
                    vec![CellValue::Unsigned(1), CellValue::from("Willow Fishing Rod")],
                    vec![CellValue::Unsigned(2), CellValue::Null],
                ],
                None,
            )
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            written(writer),
            "fishing_rod = {\n\
             \t{ rodid=1, name='Willow Fishing Rod' },\n\
             \t{ rodid=2, name=nil },\n\
             };\n"
        );
    }

    #[test]
    fn empty_table_block() {
        let mut writer = LuaWriter::new(Vec::<u8>::new());
        let count = writer.write_table(&zone_schema(), Vec::new(), None).unwrap();

        assert_eq!(count, 0);
        assert_eq!(written(writer), "fishing_zone = {\n};\n");
    }

    #[test]
    fn enrichment_appends_looked_up_value() {
        let lookup = [(3, 2)].into_iter().collect::<SideLookup>();
        let enrichment = RowEnrichment {
            field: "type",
            lookup: &lookup,
        };

        let mut writer = LuaWriter::new(Vec::<u8>::new());
        writer
            .write_table(
                &zone_schema(),
                vec![vec![CellValue::Unsigned(3), CellValue::from("Bastok")]],
                Some(enrichment),
            )
            .unwrap();

        assert_eq!(
            written(writer),
            "fishing_zone = {\n\t{ zoneid=3, name='Bastok', type=2 },\n};\n"
        );
    }

    #[test]
    fn enrichment_miss_is_fatal() {
        let lookup = [(4, 2)].into_iter().collect::<SideLookup>();
        let enrichment = RowEnrichment {
            field: "type",
            lookup: &lookup,
        };

        let result = LuaWriter::new(Vec::<u8>::new()).write_table(
            &zone_schema(),
            vec![vec![CellValue::Unsigned(3), CellValue::from("Bastok")]],
            Some(enrichment),
        );

        assert!(matches!(
            result,
            Err(Error::LookupMiss { table, key: 3 }) if table == "fishing_zone"
        ));
    }

    #[test]
    fn enrichment_needs_integer_key() {
        let lookup = SideLookup::default();
        let enrichment = RowEnrichment {
            field: "type",
            lookup: &lookup,
        };

        let result = LuaWriter::new(Vec::<u8>::new()).write_table(
            &zone_schema(),
            vec![vec![CellValue::Null, CellValue::from("Bastok")]],
            Some(enrichment),
        );

        assert!(matches!(result, Err(Error::InvalidLookupKey { .. })));
    }

    #[test]
    fn index_lists_tables_in_order() {
        let mut writer = LuaWriter::new(Vec::<u8>::new());
        writer
            .write_index(&["fishing_area", "fishing_bait", "fishing_zone"])
            .unwrap();

        assert_eq!(
            written(writer),
            "\nreturn {\n\
             \tfishing_area = fishing_area,\n\
             \tfishing_bait = fishing_bait,\n\
             \tfishing_zone = fishing_zone,\n\
             }"
        );
    }
}
