//! Column descriptors and their classification.
//!
//! The declared type of a column is the raw type signature reported by the database
//! (for example `varchar(32)` or `int(11) unsigned`). It is classified once, when the
//! descriptor is built, so that encoding a cell never has to look at the string again.

/// Coarse classification of a declared column type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColumnClass {
    /// Character data; values are written as quoted string literals.
    Text,
    /// Binary data; values are passed through the blob format.
    Blob,
    /// Integer, fixed point, and floating point numbers.
    Numeric,
    /// Everything not covered by the other classes.
    Other,
}

impl ColumnClass {
    /// Classify a declared type such as `varchar(32)`, `INT(11) UNSIGNED` or `mediumblob`.
    pub fn from_declared_type(declared_type: &str) -> Self {
        let lowercase = declared_type.trim().to_ascii_lowercase();
        let base = lowercase
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        match base {
            "varchar" | "char" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum"
            | "set" => ColumnClass::Text,
            "tinyblob" | "blob" | "mediumblob" | "longblob" | "binary" | "varbinary" => {
                ColumnClass::Blob
            }
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "decimal"
            | "numeric" | "dec" | "fixed" | "float" | "double" | "real" | "bit" | "bool"
            | "boolean" | "year" => ColumnClass::Numeric,
            _ => ColumnClass::Other,
        }
    }
}

/// Name and declared type of a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    declared_type: String,
    class: ColumnClass,
}

impl ColumnDescriptor {
    /// Create a new [ColumnDescriptor], classifying its declared type.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        let class = ColumnClass::from_declared_type(&declared_type);

        Self {
            name: name.into(),
            declared_type,
            class,
        }
    }

    /// Return the name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the declared type as reported by the database.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Return the [ColumnClass] derived from the declared type.
    pub fn class(&self) -> ColumnClass {
        self.class
    }
}

/// Ordered column descriptors of one table, in physical column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
    columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Create a new [TableSchema].
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Return the name of the table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Return the columns in physical order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Return the number of columns.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }
}
