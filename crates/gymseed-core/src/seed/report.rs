//! Per-table outcome counts of a seed run.

use serde::Serialize;

use super::SeedTable;

/// Rows inserted into and records skipped for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: SeedTable,
    pub inserted: u64,
    pub skipped: u64,
}

impl TableReport {
    pub fn new(table: SeedTable) -> Self {
        Self {
            table,
            inserted: 0,
            skipped: 0,
        }
    }
}

/// Outcome of a complete seed run, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub tables: Vec<TableReport>,
}

impl SeedReport {
    pub fn table(&self, table: SeedTable) -> Option<&TableReport> {
        self.tables.iter().find(|report| report.table == table)
    }

    pub fn inserted(&self, table: SeedTable) -> u64 {
        self.table(table).map_or(0, |report| report.inserted)
    }

    pub fn skipped(&self, table: SeedTable) -> u64 {
        self.table(table).map_or(0, |report| report.skipped)
    }

    pub fn total_inserted(&self) -> u64 {
        self.tables.iter().map(|report| report.inserted).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.tables.iter().map(|report| report.skipped).sum()
    }
}
