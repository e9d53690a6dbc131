//! A [DataSource] backed by a MySQL or MariaDB server.
//!
//! The driver is asynchronous; every call is run to completion on a
//! current-thread runtime owned by the source.

use std::fmt;

use sqlx::{
    error::BoxDynError,
    mysql::{MySqlConnectOptions, MySqlRow, MySqlValueRef},
    Column as _, Connection as _, Decode, MySql, MySqlConnection, Row as _, TypeInfo as _,
    ValueRef as _,
};
use tokio::runtime::Runtime;

use crate::{
    datavalues::{CellValue, Row},
    export::{LookupSpec, SideLookup},
    schema::{ColumnClass, ColumnDescriptor, TableSchema},
};

use super::{DataSource, SourceError};

/// Columns of a table in physical order, with their full type signature.
const SCHEMA_QUERY: &str = "SELECT CAST(column_name AS CHAR), CAST(column_type AS CHAR) \
    FROM information_schema.columns \
    WHERE table_schema = DATABASE() AND table_name = ? \
    ORDER BY ordinal_position";

/// Parameters for connecting to the database server.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Host name or address of the server
    pub host: String,
    /// TCP port of the server
    pub port: u16,
    /// User name
    pub user: String,
    /// Password of the user
    pub password: String,
    /// Name of the database holding the tables
    pub database: String,
}

impl ConnectionSettings {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<hidden>")
            .field("database", &self.database)
            .finish()
    }
}

/// Check that `name` only consists of ASCII letters, digits, and underscores,
/// so it can be spliced into a query.
fn validate_identifier(name: &str) -> Result<&str, SourceError> {
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(name)
    } else {
        Err(SourceError::InvalidIdentifier(name.to_string()))
    }
}

/// Rust representation a cell is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Integer,
    Unsigned,
    Float,
    Double,
    Decimal,
    Text,
    Blob,
}

impl CellKind {
    /// Pick the representation of a cell.
    ///
    /// Text and binary columns follow the class of their declared type, since the
    /// wire type of a character column depends on its collation. All other cells
    /// are decoded according to their wire type.
    fn resolve(class: Option<ColumnClass>, type_name: &str) -> Option<Self> {
        match class {
            Some(ColumnClass::Text) => return Some(Self::Text),
            Some(ColumnClass::Blob) => return Some(Self::Blob),
            _ => {}
        }

        let kind = match type_name {
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                Self::Integer
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => Self::Unsigned,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DECIMAL" => Self::Decimal,
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => Self::Text,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => Self::Blob,
            _ => return None,
        };

        Some(kind)
    }
}

/// Reason why a single cell could not be turned into a [CellValue].
enum CellDecodingError {
    UnsupportedType(String),
    Invalid(BoxDynError),
}

impl From<BoxDynError> for CellDecodingError {
    fn from(error: BoxDynError) -> Self {
        Self::Invalid(error)
    }
}

/// A single connection to a MySQL or MariaDB database.
pub struct MySqlSource {
    runtime: Runtime,
    connection: MySqlConnection,
}

impl MySqlSource {
    /// Connect to the database described by `settings`.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, SourceError> {
        log::info!(
            "Connecting to {}@{}:{}/{}",
            settings.user,
            settings.host,
            settings.port,
            settings.database
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceError::Runtime)?;
        let connection = runtime
            .block_on(MySqlConnection::connect_with(&settings.connect_options()))
            .map_err(SourceError::Connection)?;

        Ok(Self {
            runtime,
            connection,
        })
    }

    /// Close the connection.
    pub fn close(self) -> Result<(), SourceError> {
        let Self {
            runtime,
            connection,
        } = self;

        runtime
            .block_on(connection.close())
            .map_err(SourceError::Connection)
    }

    fn query(&mut self, table: &str, sql: &str) -> Result<Vec<MySqlRow>, SourceError> {
        log::trace!("{sql}");

        self.runtime
            .block_on(sqlx::query(sql).fetch_all(&mut self.connection))
            .map_err(|error| SourceError::Query {
                table: table.to_string(),
                error,
            })
    }

    fn decode<'r, T: Decode<'r, MySql>>(raw: MySqlValueRef<'r>) -> Result<T, CellDecodingError> {
        Ok(T::decode(raw)?)
    }

    /// Convert a raw value of a column with the given class, if known.
    fn decode_cell(
        raw: MySqlValueRef<'_>,
        class: Option<ColumnClass>,
    ) -> Result<CellValue, CellDecodingError> {
        if raw.is_null() {
            return Ok(CellValue::Null);
        }

        let type_name = raw.type_info().name().to_string();
        let value = match CellKind::resolve(class, &type_name) {
            Some(CellKind::Integer) => CellValue::Integer(Self::decode(raw)?),
            Some(CellKind::Unsigned) => CellValue::Unsigned(Self::decode(raw)?),
            Some(CellKind::Float) => CellValue::Float(Self::decode(raw)?),
            Some(CellKind::Double) => CellValue::Double(Self::decode(raw)?),
            Some(CellKind::Decimal) => CellValue::Decimal(Self::decode(raw)?),
            Some(CellKind::Text) => CellValue::Text(Self::decode(raw)?),
            Some(CellKind::Blob) => CellValue::Blob(Self::decode(raw)?),
            None => return Err(CellDecodingError::UnsupportedType(type_name)),
        };

        Ok(value)
    }

    /// Decode all cells of `row`; `columns` gives the declared types, where known.
    fn decode_row(
        table: &str,
        columns: &[ColumnDescriptor],
        row: &MySqlRow,
    ) -> Result<Row, SourceError> {
        (0..row.len())
            .map(|index| {
                let column = row.column(index).name();
                let class = columns.get(index).map(ColumnDescriptor::class);
                let raw = row.try_get_raw(index).map_err(|error| SourceError::Decode {
                    table: table.to_string(),
                    column: column.to_string(),
                    message: error.to_string(),
                })?;

                Self::decode_cell(raw, class).map_err(|error| match error {
                    CellDecodingError::UnsupportedType(type_name) => {
                        SourceError::UnsupportedType {
                            table: table.to_string(),
                            column: column.to_string(),
                            type_name,
                        }
                    }
                    CellDecodingError::Invalid(error) => SourceError::Decode {
                        table: table.to_string(),
                        column: column.to_string(),
                        message: error.to_string(),
                    },
                })
            })
            .collect()
    }
}

impl DataSource for MySqlSource {
    fn resolve_schema(&mut self, table: &str) -> Result<TableSchema, SourceError> {
        let columns: Vec<(String, String)> = self
            .runtime
            .block_on(
                sqlx::query_as(SCHEMA_QUERY)
                    .bind(table)
                    .fetch_all(&mut self.connection),
            )
            .map_err(|error| SourceError::Query {
                table: table.to_string(),
                error,
            })?;

        if columns.is_empty() {
            return Err(SourceError::UnknownTable(table.to_string()));
        }

        log::debug!("Columns of {table}: {columns:?}");

        Ok(TableSchema::new(
            table,
            columns
                .into_iter()
                .map(|(name, declared_type)| ColumnDescriptor::new(name, declared_type))
                .collect(),
        ))
    }

    fn fetch_rows(&mut self, schema: &TableSchema) -> Result<Vec<Row>, SourceError> {
        let table = validate_identifier(schema.table())?;
        let rows = self.query(table, &format!("SELECT * FROM `{table}`"))?;

        rows.iter()
            .map(|row| Self::decode_row(table, schema.columns(), row))
            .collect()
    }

    fn fetch_side_lookup(&mut self, spec: &LookupSpec) -> Result<SideLookup, SourceError> {
        let table = validate_identifier(&spec.table)?;
        let key_column = validate_identifier(&spec.key_column)?;
        let value_column = validate_identifier(&spec.value_column)?;

        let rows = self.query(
            table,
            &format!("SELECT `{key_column}`, `{value_column}` FROM `{table}`"),
        )?;

        rows.iter()
            .map(|row| -> Result<(i64, i64), SourceError> {
                let cells = Self::decode_row(table, &[], row)?;
                let integer = |index: usize, column: &str| {
                    cells
                        .get(index)
                        .and_then(CellValue::as_i64)
                        .ok_or_else(|| SourceError::Decode {
                            table: table.to_string(),
                            column: column.to_string(),
                            message: "expected an integer".to_string(),
                        })
                };

                Ok((integer(0, key_column)?, integer(1, value_column)?))
            })
            .collect()
    }
}

impl fmt::Debug for MySqlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlSource")
            .field("runtime", &self.runtime)
            .field("connection", &"<mysql connection>")
            .finish()
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::schema::ColumnClass;

    use super::{validate_identifier, CellKind, SourceError};

    #[test]
    fn identifiers() {
        assert!(validate_identifier("fishing_bait_affinity").is_ok());
        assert!(validate_identifier("zone_settings").is_ok());

        for name in ["", "fish; DROP TABLE fish", "a`b", "zone settings"] {
            assert!(matches!(
                validate_identifier(name),
                Err(SourceError::InvalidIdentifier(_))
            ));
        }
    }

    #[test]
    fn declared_class_decides_text_and_blob() {
        // binary collations put character columns on the wire as VARBINARY or BLOB
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Text), "VARBINARY"),
            Some(CellKind::Text)
        );
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Text), "BLOB"),
            Some(CellKind::Text)
        );
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Blob), "VARCHAR"),
            Some(CellKind::Blob)
        );
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Blob), "BLOB"),
            Some(CellKind::Blob)
        );
    }

    #[test]
    fn other_classes_follow_the_wire_type() {
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Numeric), "INT UNSIGNED"),
            Some(CellKind::Unsigned)
        );
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Numeric), "SMALLINT"),
            Some(CellKind::Integer)
        );
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Numeric), "DECIMAL"),
            Some(CellKind::Decimal)
        );
        assert_eq!(
            CellKind::resolve(Some(ColumnClass::Numeric), "FLOAT"),
            Some(CellKind::Float)
        );
        assert_eq!(
            CellKind::resolve(None, "VARBINARY"),
            Some(CellKind::Blob)
        );
        assert_eq!(CellKind::resolve(None, "TEXT"), Some(CellKind::Text));
        assert_eq!(CellKind::resolve(Some(ColumnClass::Other), "DATE"), None);
        assert_eq!(CellKind::resolve(None, "DATETIME"), None);
    }
}
