//! Error types for the seeding library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for provisioning and seeding operations.
///
/// Every variant here aborts a build. Per-record problems are reported as
/// [`SkipReason`] values and only become an error in strict mode.
#[derive(Error, Debug)]
pub enum SeedError {
    /// The database file could not be created
    #[error("Provisioning failed for '{path}': {reason}")]
    Provisioning { path: PathBuf, reason: String },
    /// No access mechanism could open the database
    #[error("Could not connect to '{path}' (tried {attempted}): {message}")]
    Connection {
        path: PathBuf,
        attempted: String,
        message: String,
    },
    /// The table definition script failed
    #[error("Schema script '{script}' failed: {message}")]
    Schema { script: String, message: String },
    /// A single statement of a batch failed
    #[error("Statement failed: {statement}")]
    Statement {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Database query errors during seeding
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A seed file that the CSV reader could not parse
    #[error("CSV error in '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A record skip promoted to an error by strict mode
    #[error("Rejected {table} record on line {line}: {reason}")]
    RecordRejected {
        table: &'static str,
        line: u64,
        reason: SkipReason,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Why a seed record was left out of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A mandatory column is blank or missing
    MissingField(&'static str),
    /// A value could not be read as the type its column requires
    Malformed { field: &'static str, value: String },
    /// A 1-based position beyond the rows loaded for the referenced table
    OutOfRange {
        field: &'static str,
        position: i64,
        available: usize,
    },
    /// A load-order index that no earlier insert was assigned
    UnknownIndex { field: &'static str, index: i64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "{field} is blank"),
            SkipReason::Malformed { field, value } => {
                write!(f, "{field} has unreadable value '{value}'")
            }
            SkipReason::OutOfRange {
                field,
                position,
                available,
            } => write!(
                f,
                "{field} position {position} is outside the {available} loaded rows"
            ),
            SkipReason::UnknownIndex { field, index } => {
                write!(f, "{field} index {index} was never loaded")
            }
        }
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SeedError {
        SeedError::Database {
            message: self.message,
            source,
        }
    }
}

impl SeedError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a file system error for the given path.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeedError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        SeedError::Configuration {
            message: message.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;

    /// Map database errors with a lazily built message.
    fn db_context_lazy<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SeedError::database(message).with_source(e))
    }

    fn db_context_lazy<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SeedError::database(f()).with_source(e))
    }
}

/// Result type alias for seeding operations
pub type Result<T> = std::result::Result<T, SeedError>;
