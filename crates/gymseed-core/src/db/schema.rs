//! Application of the table, relationship and query scripts.

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;
use serde::Serialize;

use super::{batch::split_statements, Database};
use crate::error::{Result, SeedError};

/// Table definitions bundled with the crate.
pub const TABLES_SQL: &str = include_str!("../../assets/schema/tables.sql");
/// Relationship indexes and constraints bundled with the crate.
pub const RELATIONSHIPS_SQL: &str = include_str!("../../assets/schema/relationships.sql");
/// Saved query views bundled with the crate.
pub const QUERIES_SQL: &str = include_str!("../../assets/schema/queries.sql");

/// The three scripts of a build, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    Tables,
    Relationships,
    Queries,
}

impl ScriptKind {
    /// File name of the script inside a schema directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ScriptKind::Tables => "tables.sql",
            ScriptKind::Relationships => "relationships.sql",
            ScriptKind::Queries => "queries.sql",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A statement that failed without aborting its script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptWarning {
    pub script: ScriptKind,
    pub statement: String,
    pub message: String,
}

impl fmt::Display for ScriptWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.script, self.message, self.statement)
    }
}

/// Result of applying one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    PartialFailure(Vec<ScriptWarning>),
}

impl ApplyOutcome {
    pub fn warnings(&self) -> &[ScriptWarning] {
        match self {
            ApplyOutcome::Applied => &[],
            ApplyOutcome::PartialFailure(warnings) => warnings,
        }
    }
}

/// Applies DDL scripts to an open database.
pub trait SchemaApplier {
    fn apply_script(&self, db: &Database, kind: ScriptKind, script: &str) -> Result<ApplyOutcome>;
}

/// Applies scripts statement by statement.
///
/// In fail-fast mode the first failing statement ends the script and is
/// reported as a single warning. Otherwise every statement is attempted and
/// each failure becomes a warning.
#[derive(Debug, Clone, Copy)]
pub struct ScriptApplier {
    fail_fast: bool,
}

impl ScriptApplier {
    pub fn fail_fast() -> Self {
        Self { fail_fast: true }
    }

    pub fn continue_on_error() -> Self {
        Self { fail_fast: false }
    }
}

impl SchemaApplier for ScriptApplier {
    fn apply_script(&self, db: &Database, kind: ScriptKind, script: &str) -> Result<ApplyOutcome> {
        let as_warning = |err: SeedError| match err {
            SeedError::Statement { statement, source } => Ok(ScriptWarning {
                script: kind,
                statement,
                message: source.to_string(),
            }),
            other => Err(other),
        };

        let warnings = if self.fail_fast {
            match db.execute_batch(script) {
                Ok(_) => Vec::new(),
                Err(err) => vec![as_warning(err)?],
            }
        } else {
            let mut warnings = Vec::new();
            for statement in split_statements(script) {
                if let Err(err) = db.execute_statement(&statement) {
                    let warning = as_warning(err)?;
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
            warnings
        };

        if warnings.is_empty() {
            Ok(ApplyOutcome::Applied)
        } else {
            Ok(ApplyOutcome::PartialFailure(warnings))
        }
    }
}

/// The scripts applied during a build.
#[derive(Debug, Clone)]
pub struct ScriptSet {
    pub tables: String,
    pub relationships: String,
    pub queries: String,
}

impl ScriptSet {
    /// The scripts compiled into the crate.
    pub fn embedded() -> Self {
        Self {
            tables: TABLES_SQL.to_string(),
            relationships: RELATIONSHIPS_SQL.to_string(),
            queries: QUERIES_SQL.to_string(),
        }
    }

    /// Reads `tables.sql`, `relationships.sql` and `queries.sql` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let read = |kind: ScriptKind| {
            let path = dir.join(kind.file_name());
            fs::read_to_string(&path).map_err(|e| SeedError::file_system(path, e))
        };

        Ok(Self {
            tables: read(ScriptKind::Tables)?,
            relationships: read(ScriptKind::Relationships)?,
            queries: read(ScriptKind::Queries)?,
        })
    }

    pub fn script(&self, kind: ScriptKind) -> &str {
        match kind {
            ScriptKind::Tables => &self.tables,
            ScriptKind::Relationships => &self.relationships,
            ScriptKind::Queries => &self.queries,
        }
    }
}

impl Default for ScriptSet {
    fn default() -> Self {
        Self::embedded()
    }
}
