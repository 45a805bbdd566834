//! Creation of an empty database file.

use std::fs;
use std::path::Path;

use log::info;
use rusqlite::{Connection, OpenFlags};

use crate::error::{Result, SeedError};

/// Creates the empty store the seed pipeline populates.
pub trait DatabaseProvisioner {
    /// Creates an empty database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Provisioning` when the file cannot be created.
    fn create_empty_database(&self, path: &Path) -> Result<()>;
}

/// Provisions a SQLite database file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteProvisioner;

impl DatabaseProvisioner for SqliteProvisioner {
    fn create_empty_database(&self, path: &Path) -> Result<()> {
        let provisioning = |reason: String| SeedError::Provisioning {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| provisioning(e.to_string()))?;
        }

        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| provisioning(e.to_string()))?;
        // An empty SQLite file has no header until something is written
        connection
            .execute_batch("PRAGMA user_version = 1")
            .map_err(|e| provisioning(e.to_string()))?;
        connection
            .close()
            .map_err(|(_, e)| provisioning(e.to_string()))?;

        info!("Created new database: {}", path.display());
        Ok(())
    }
}

/// Deletes a database left over from an earlier run.
///
/// Returns whether a file was removed.
pub fn remove_existing(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    info!("Removing existing database: {}", path.display());
    fs::remove_file(path).map_err(|e| SeedError::file_system(path, e))?;
    Ok(true)
}
