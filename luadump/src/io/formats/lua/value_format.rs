//! Encoding of single cell values as Lua literals.

use crate::{
    datavalues::CellValue,
    schema::{ColumnClass, ColumnDescriptor},
};

use super::{
    blob_format::{BlobFormat, PlanarCoordinates},
    NIL,
};

/// Encodes [CellValue]s as Lua literals.
///
/// The rules are applied in this order:
///  * `NULL` and empty strings become `nil`
///  * blobs are handed to the configured [BlobFormat] (empty blobs become `nil`)
///  * values of [ColumnClass::Text] columns become single quoted strings
///  * everything else is written in its natural textual form
#[derive(Debug)]
pub struct LuaValueEncoder {
    blob_format: Box<dyn BlobFormat>,
}

impl Default for LuaValueEncoder {
    fn default() -> Self {
        Self::new(Box::new(PlanarCoordinates))
    }
}

impl LuaValueEncoder {
    /// Create a new [LuaValueEncoder] that uses the given [BlobFormat] for binary cells.
    pub fn new(blob_format: Box<dyn BlobFormat>) -> Self {
        Self { blob_format }
    }

    /// Encode a single value of the given column.
    pub fn encode(&self, value: &CellValue, column: &ColumnDescriptor) -> String {
        if value.is_absent() {
            return NIL.to_string();
        }

        match value {
            CellValue::Blob(bytes) => self.encode_blob(bytes, column),
            _ if column.class() == ColumnClass::Text => Self::quote(&value.to_string()),
            _ => value.to_string(),
        }
    }

    fn encode_blob(&self, bytes: &[u8], column: &ColumnDescriptor) -> String {
        if bytes.is_empty() {
            return NIL.to_string();
        }

        let literal = self.blob_format.encode(bytes);
        if literal.dropped_bytes > 0 {
            log::warn!(
                "column {}: ignoring {} trailing bytes of a {} byte blob ({})",
                column.name(),
                literal.dropped_bytes,
                bytes.len(),
                self.blob_format.name()
            );
        }

        literal.text
    }

    /// Wrap in single quotes as a Lua short string.
    ///
    /// Apostrophes and backslashes get a backslash prefix; line breaks and NUL,
    /// which may not appear raw in a short string, become escape sequences.
    fn quote(text: &str) -> String {
        let mut quoted = String::with_capacity(text.len() + 2);

        quoted.push('\'');
        for c in text.chars() {
            match c {
                '\\' => quoted.push_str("\\\\"),
                '\'' => quoted.push_str("\\'"),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                // three digits, so a following digit is not read as part of the escape
                '\0' => quoted.push_str("\\000"),
                _ => quoted.push(c),
            }
        }
        quoted.push('\'');

        quoted
    }
}

#[cfg(test)]
mod test {
    use byteorder::{LittleEndian, WriteBytesExt};
    use quickcheck_macros::quickcheck;
    use test_log::test;

    use crate::{datavalues::CellValue, schema::ColumnDescriptor};

    use super::{super::short_string::read_short_string, LuaValueEncoder};

    fn text_column() -> ColumnDescriptor {
        ColumnDescriptor::new("name", "varchar(64)")
    }

    fn int_column() -> ColumnDescriptor {
        ColumnDescriptor::new("id", "int(11)")
    }

    fn blob_column() -> ColumnDescriptor {
        ColumnDescriptor::new("bounds", "blob")
    }

    #[test]
    fn absent_values_are_nil() {
        let encoder = LuaValueEncoder::default();

        for column in [text_column(), int_column(), blob_column()] {
            assert_eq!(encoder.encode(&CellValue::Null, &column), "nil");
            assert_eq!(encoder.encode(&CellValue::from(""), &column), "nil");
            assert_eq!(encoder.encode(&CellValue::Blob(Vec::new()), &column), "nil");
        }
    }

    #[test]
    fn strings_are_quoted_and_escaped() {
        let encoder = LuaValueEncoder::default();

        assert_eq!(
            encoder.encode(&CellValue::from("fish"), &text_column()),
            "'fish'"
        );
        assert_eq!(
            encoder.encode(&CellValue::from("O'Brien"), &text_column()),
            r"'O\'Brien'"
        );
        assert_eq!(
            encoder.encode(&CellValue::from("''"), &text_column()),
            r"'\'\''"
        );
        assert_eq!(
            encoder.encode(&CellValue::from(r"C:\temp"), &text_column()),
            r"'C:\\temp'"
        );
        assert_eq!(
            encoder.encode(&CellValue::from("ends with \\"), &text_column()),
            r"'ends with \\'"
        );
        assert_eq!(
            encoder.encode(&CellValue::from("line\nbreak\r"), &text_column()),
            r"'line\nbreak\r'"
        );
    }

    #[test]
    fn escaped_strings_read_back_in_lua() {
        let encoder = LuaValueEncoder::default();

        for text in [
            r"C:\temp",
            "ends with \\",
            "line\nbreak",
            "O'Brien\\'s",
            "nul\u{0}1",
            "tab\there",
        ] {
            let literal = encoder.encode(&CellValue::from(text), &text_column());
            assert_eq!(read_short_string(&literal).as_deref(), Ok(text));
        }
    }

    #[test]
    fn numbers_in_text_columns_are_quoted() {
        let encoder = LuaValueEncoder::default();
        assert_eq!(encoder.encode(&CellValue::from(7i64), &text_column()), "'7'");
    }

    #[test]
    fn scalars_keep_their_natural_form() {
        let encoder = LuaValueEncoder::default();

        assert_eq!(encoder.encode(&CellValue::from(5i64), &int_column()), "5");
        assert_eq!(encoder.encode(&CellValue::from(-1i64), &int_column()), "-1");
        assert_eq!(encoder.encode(&CellValue::from(42u64), &int_column()), "42");
        assert_eq!(
            encoder.encode(
                &CellValue::from(0.25f32),
                &ColumnDescriptor::new("w", "float")
            ),
            "0.25"
        );
        assert_eq!(
            encoder.encode(
                &CellValue::Decimal("3.50".to_string()),
                &ColumnDescriptor::new("d", "decimal(4,2)")
            ),
            "3.50"
        );
        assert_eq!(
            encoder.encode(
                &CellValue::from("2024-01-01"),
                &ColumnDescriptor::new("t", "date")
            ),
            "2024-01-01"
        );
    }

    #[test]
    fn twelve_byte_blob_is_one_point() {
        let encoder = LuaValueEncoder::default();

        let mut bytes = Vec::new();
        for float in [12.0f32, 0.5, -7.125] {
            bytes.write_f32::<LittleEndian>(float).unwrap();
        }
        assert_eq!(bytes.len(), 12);

        assert_eq!(
            encoder.encode(&CellValue::Blob(bytes), &blob_column()),
            "{{x=12.000,z=-7.125}}"
        );
    }

    #[test]
    fn short_blob_is_empty_table() {
        let encoder = LuaValueEncoder::default();
        assert_eq!(
            encoder.encode(&CellValue::Blob(vec![0, 0, 128, 63]), &blob_column()),
            "{}"
        );
    }

    #[quickcheck]
    fn null_is_always_nil(declared_type: String) -> bool {
        let column = ColumnDescriptor::new("c", declared_type);
        LuaValueEncoder::default().encode(&CellValue::Null, &column) == "nil"
    }

    #[quickcheck]
    fn quoted_strings_read_back(text: String) -> bool {
        if text.is_empty() {
            return true;
        }

        let literal =
            LuaValueEncoder::default().encode(&CellValue::Text(text.clone()), &text_column());

        read_short_string(&literal) == Ok(text)
    }
}
