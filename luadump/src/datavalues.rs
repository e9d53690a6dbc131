//! Cell values as delivered by a data source.

use std::fmt;

/// One row of a table; position `i` belongs to column `i` of the [TableSchema][crate::TableSchema].
pub type Row = Vec<CellValue>;

/// A raw cell value.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL `NULL`
    Null,
    /// Signed integer
    Integer(i64),
    /// Unsigned integer
    Unsigned(u64),
    /// Single precision floating point number
    Float(f32),
    /// Double precision floating point number
    Double(f64),
    /// Fixed point number, kept in its exact decimal representation
    Decimal(String),
    /// Character data
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
}

impl CellValue {
    /// Whether the cell carries no value, i.e. it is `NULL` or an empty string.
    pub fn is_absent(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(text) | CellValue::Decimal(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Return the value as `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            CellValue::Unsigned(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    /// Natural textual form of the value. Floating point numbers keep a decimal
    /// point or exponent so they read back as floats.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Unsigned(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value:?}"),
            CellValue::Double(value) => write!(f, "{value:?}"),
            CellValue::Decimal(value) | CellValue::Text(value) => f.write_str(value),
            CellValue::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Unsigned(value)
    }
}

impl From<f32> for CellValue {
    fn from(value: f32) -> Self {
        CellValue::Float(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Double(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(value: Vec<u8>) -> Self {
        CellValue::Blob(value)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}
