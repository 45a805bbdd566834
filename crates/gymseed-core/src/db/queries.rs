//! Parameterized inserts and identifier read-back.
//!
//! Table and column names passed to these helpers come from the fixed seed
//! schema, never from seed data, and are quoted as identifiers.

use log::trace;
use rusqlite::{params_from_iter, OptionalExtension};

use crate::{
    coerce::FieldValue,
    error::{DatabaseResultExt, Result},
};

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

impl super::Database {
    /// Executes a single parameterized statement.
    ///
    /// Returns the rowid of the inserted row when the statement changed a
    /// row. Callers that need the store-assigned key of a specific table read
    /// it back explicitly.
    pub fn run_parameterized(&self, statement: &str, values: &[FieldValue]) -> Result<Option<i64>> {
        trace!("{statement} <- {values:?}");
        let changed = self
            .connection
            .execute(statement, params_from_iter(values.iter()))
            .db_context_lazy(|| format!("Failed to execute: {statement}"))?;

        Ok((changed > 0).then(|| self.connection.last_insert_rowid()))
    }

    /// Looks up the id of the first row whose natural key equals `key`.
    pub fn get_id_by_key(
        &self,
        table: &str,
        key_column: &str,
        key: &str,
        id_column: &str,
    ) -> Result<Option<i64>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {} LIMIT 1",
            quote(id_column),
            quote(table),
            quote(key_column),
            quote(id_column)
        );
        self.connection
            .query_row(&sql, [key], |row| row.get(0))
            .optional()
            .db_context_lazy(|| format!("Failed to look up {table}.{id_column} by {key_column}"))
    }

    /// Returns the highest id assigned in `table`, if any row exists.
    pub fn max_id(&self, table: &str, id_column: &str) -> Result<Option<i64>> {
        let sql = format!("SELECT MAX({}) FROM {}", quote(id_column), quote(table));
        self.connection
            .query_row(&sql, [], |row| row.get(0))
            .db_context_lazy(|| format!("Failed to read the latest {table}.{id_column}"))
    }

    /// Returns every id in `table`, ascending.
    pub fn ids_in_order(&self, table: &str, id_column: &str) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            quote(id_column),
            quote(table),
            quote(id_column)
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context_lazy(|| format!("Failed to prepare read-back of {table}"))?;
        let ids = stmt
            .query_map([], |row| row.get(0))
            .db_context_lazy(|| format!("Failed to read back {table}"))?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .db_context_lazy(|| format!("Failed to read back {table}"))?;
        Ok(ids)
    }

    /// Counts the rows in `table`.
    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote(table));
        let count: i64 = self
            .connection
            .query_row(&sql, [], |row| row.get(0))
            .db_context_lazy(|| format!("Failed to count rows in {table}"))?;
        Ok(count as u64)
    }
}
