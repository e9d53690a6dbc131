//! The export driver: which tables are written, in which order, and how the
//! designated table is enriched.

use std::{collections::HashMap, io::Write};

use crate::{
    error::Error,
    io::{
        formats::lua::{LuaWriter, RowEnrichment},
        source::DataSource,
    },
};

/// Prefix shared by all tables of the fishing database.
pub const FISHING_TABLE_PREFIX: &str = "fishing_";

/// Tables of the fishing database, without prefix, in export order.
const FISHING_TABLES: [&str; 9] = [
    "area",
    "bait",
    "bait_affinity",
    "catch",
    "fish",
    "group",
    "mob",
    "rod",
    "zone",
];

/// Where the values of a [SideLookup] come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSpec {
    /// Table holding the pairs
    pub table: String,
    /// Column holding the keys
    pub key_column: String,
    /// Column holding the values
    pub value_column: String,
}

impl LookupSpec {
    /// Create a new [LookupSpec].
    pub fn new(
        table: impl Into<String>,
        key_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            key_column: key_column.into(),
            value_column: value_column.into(),
        }
    }

    /// The zone type of every zone, taken from `zone_settings`.
    pub fn zone_types() -> Self {
        Self::new("zone_settings", "zoneid", "zonetype")
    }
}

/// Map from integer keys to integer values, built once per export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideLookup(HashMap<i64, i64>);

impl SideLookup {
    /// Return the value stored for `key`.
    pub fn get(&self, key: i64) -> Option<i64> {
        self.0.get(&key).copied()
    }

    /// Return the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, i64)> for SideLookup {
    /// Later pairs replace earlier pairs with the same key.
    fn from_iter<T: IntoIterator<Item = (i64, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An extra field for every row of one table, looked up by the row's first cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    /// Table whose rows are enriched
    pub table: String,
    /// Name of the added field
    pub field: String,
    /// Source of the field values
    pub lookup: LookupSpec,
}

impl Enrichment {
    /// Add the zone type as `type` to every row of `fishing_zone`.
    pub fn zone_types() -> Self {
        Self {
            table: format!("{FISHING_TABLE_PREFIX}zone"),
            field: "type".to_string(),
            lookup: LookupSpec::zone_types(),
        }
    }
}

/// Fixed description of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    tables: Vec<String>,
    enrichment: Option<Enrichment>,
}

impl ExportPlan {
    /// Create a plan exporting `tables` in the given order, without enrichment.
    pub fn new(tables: Vec<String>) -> Self {
        Self {
            tables,
            enrichment: None,
        }
    }

    /// Set the [Enrichment] of the plan.
    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    /// The plan for the fishing database: all `fishing_*` tables, with the zone
    /// table enriched by the zone types.
    pub fn fishing() -> Self {
        Self::new(
            FISHING_TABLES
                .iter()
                .map(|table| format!("{FISHING_TABLE_PREFIX}{table}"))
                .collect(),
        )
        .with_enrichment(Enrichment::zone_types())
    }

    /// Return the tables in export order.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Return the [Enrichment], if any.
    pub fn enrichment(&self) -> Option<&Enrichment> {
        self.enrichment.as_ref()
    }
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self::fishing()
    }
}

/// Number of rows written per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    tables: Vec<(String, u64)>,
}

impl ExportSummary {
    /// Return the tables with their row counts, in export order.
    pub fn tables(&self) -> &[(String, u64)] {
        &self.tables
    }

    /// Return the number of rows over all tables.
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// Runs an [ExportPlan] against a [DataSource].
///
/// Exporting happens in two steps, so that everything that has to be read up front
/// is known to be available before any output is produced:
///
/// ```no_run
/// # use luadump::{io::source::MemorySource, ExportPlan, Exporter};
/// # fn main() -> Result<(), luadump::error::Error> {
/// let mut source = MemorySource::new();
/// let exporter = Exporter::prepare(&mut source, ExportPlan::fishing())?;
/// exporter.write_to(std::io::stdout())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Exporter<'s, S: DataSource> {
    source: &'s mut S,
    plan: ExportPlan,
    side_lookup: Option<SideLookup>,
}

impl<'s, S: DataSource> Exporter<'s, S> {
    /// Load the side lookup of the plan, if it has an [Enrichment].
    pub fn prepare(source: &'s mut S, plan: ExportPlan) -> Result<Self, Error> {
        let side_lookup = match plan.enrichment() {
            Some(enrichment) => {
                log::info!(
                    "Loading side lookup from {} ({} -> {})",
                    enrichment.lookup.table,
                    enrichment.lookup.key_column,
                    enrichment.lookup.value_column
                );
                let lookup = source.fetch_side_lookup(&enrichment.lookup)?;
                log::info!("Side lookup has {} entries", lookup.len());

                Some(lookup)
            }
            None => None,
        };

        Ok(Self {
            source,
            plan,
            side_lookup,
        })
    }

    /// Return the loaded side lookup.
    pub fn side_lookup(&self) -> Option<&SideLookup> {
        self.side_lookup.as_ref()
    }

    /// Write all tables of the plan to `writer`, followed by the `return` statement.
    pub fn write_to<W: Write>(self, writer: W) -> Result<ExportSummary, Error> {
        let mut writer = LuaWriter::new(writer);
        let mut summary = ExportSummary::default();

        for table in self.plan.tables() {
            let schema = self.source.resolve_schema(table)?;
            log::debug!("Schema of {table}: {:?}", schema.columns());

            let rows = self.source.fetch_rows(&schema)?;

            let enrichment = match (self.plan.enrichment(), &self.side_lookup) {
                (Some(enrichment), Some(lookup)) if enrichment.table == *table => {
                    Some(RowEnrichment {
                        field: &enrichment.field,
                        lookup,
                    })
                }
                _ => None,
            };

            let count = writer.write_table(&schema, rows, enrichment)?;
            summary.tables.push((table.clone(), count));
        }

        writer.write_index(self.plan.tables())?;

        Ok(summary)
    }
}
