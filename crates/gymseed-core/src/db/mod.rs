//! Connection and execution gateway for the SQLite store.
//!
//! This module opens the target database, executes scripts statement by
//! statement and runs the parameterized inserts issued by the seed pipeline.
//! Driver failures are translated into [`SeedError`] values with context.
//!
//! ## Submodules
//!
//! - [`batch`]: script splitting and sequential batch execution
//! - [`queries`]: parameterized inserts and identifier read-back
//! - [`provision`]: creation of an empty database file
//! - [`schema`]: application of the table, relationship and query scripts

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{Connection, OpenFlags};

use crate::error::{DatabaseResultExt, Result, SeedError};

pub mod batch;
pub mod provision;
pub mod queries;
pub mod schema;

/// A way of opening an existing database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMechanism {
    /// Open the file path read-write
    Direct,
    /// Open a `file:` URI in read-write mode
    Uri,
}

impl AccessMechanism {
    /// Mechanisms tried by [`Database::connect`], in order.
    pub const DEFAULT_ORDER: [AccessMechanism; 2] = [AccessMechanism::Direct, AccessMechanism::Uri];

    fn open(self, path: &Path) -> rusqlite::Result<Connection> {
        match self {
            AccessMechanism::Direct => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
            AccessMechanism::Uri => {
                let absolute = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    std::env::current_dir()
                        .map(|cwd| cwd.join(path))
                        .unwrap_or_else(|_| path.to_path_buf())
                };
                let uri = format!("file:{}?mode=rw", uri_path(&absolute));
                Connection::open_with_flags(
                    uri,
                    OpenFlags::SQLITE_OPEN_READ_WRITE
                        | OpenFlags::SQLITE_OPEN_URI
                        | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
            }
        }
    }
}

/// Escapes the characters SQLite's URI parser treats specially in a path.
fn uri_path(path: &Path) -> String {
    let mut escaped = String::new();
    for c in path.display().to_string().chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3f"),
            '#' => escaped.push_str("%23"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl fmt::Display for AccessMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMechanism::Direct => f.write_str("direct file access"),
            AccessMechanism::Uri => f.write_str("file URI"),
        }
    }
}

/// Database connection and operations handler.
///
/// The connection stays in autocommit mode, so every insert is durable as
/// soon as it returns.
pub struct Database {
    connection: Connection,
    path: PathBuf,
    mechanism: AccessMechanism,
}

impl Database {
    /// Opens an existing database file using the default mechanisms.
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::connect_with(path, &AccessMechanism::DEFAULT_ORDER)
    }

    /// Opens an existing database file, trying each mechanism in turn.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Connection` naming every attempted mechanism when
    /// none of them succeeds.
    pub fn connect_with<P: AsRef<Path>>(path: P, mechanisms: &[AccessMechanism]) -> Result<Self> {
        let path = path.as_ref();
        let mut failures = Vec::new();

        for &mechanism in mechanisms {
            match mechanism.open(path) {
                Ok(connection) => {
                    debug!("Opened {} using {}", path.display(), mechanism);
                    let db = Self {
                        connection,
                        path: path.to_path_buf(),
                        mechanism,
                    };
                    db.configure()?;
                    info!("Connected to {} ({})", path.display(), mechanism);
                    return Ok(db);
                }
                Err(e) => {
                    debug!("{} failed for {}: {}", mechanism, path.display(), e);
                    failures.push((mechanism, e));
                }
            }
        }

        let attempted = if mechanisms.is_empty() {
            "no mechanisms".to_string()
        } else {
            mechanisms
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let message = failures
            .iter()
            .map(|(mechanism, e)| format!("{mechanism}: {e}"))
            .collect::<Vec<_>>()
            .join("; ");

        Err(SeedError::Connection {
            path: path.to_path_buf(),
            attempted,
            message,
        })
    }

    fn configure(&self) -> Result<()> {
        self.connection
            .execute_batch("PRAGMA foreign_keys = ON")
            .db_context("Failed to enable foreign keys")
    }

    /// Path of the open database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mechanism that opened the connection.
    pub fn mechanism(&self) -> AccessMechanism {
        self.mechanism
    }

    /// Direct access to the underlying connection, for ad-hoc queries.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}
