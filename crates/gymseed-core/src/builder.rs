//! Builder that provisions, seeds and finishes a database in one run.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::{
    db::{
        provision::{remove_existing, DatabaseProvisioner, SqliteProvisioner},
        schema::{ApplyOutcome, SchemaApplier, ScriptApplier, ScriptKind, ScriptSet, ScriptWarning},
        Database,
    },
    error::{Result, SeedError},
    seed::{
        encoding_for_label,
        events::{LogObserver, SeedObserver},
        report::SeedReport,
        SeedMode, SeedOptions, SeedPipeline,
    },
};

/// Default output file, relative to the working directory.
pub const DEFAULT_DATABASE_FILE: &str = "smart_gym.db";
/// Default seed directory, relative to the working directory.
pub const DEFAULT_SEED_DIR: &str = "seed";

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub database_path: PathBuf,
    pub replaced_existing: bool,
    pub seed: SeedReport,
    pub warnings: Vec<ScriptWarning>,
}

impl BuildReport {
    /// The report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for creating and populating a database file.
pub struct DatabaseBuilder<'a> {
    database_path: PathBuf,
    seed_dir: PathBuf,
    schema_dir: Option<PathBuf>,
    encoding: String,
    mode: SeedMode,
    observer: Box<dyn SeedObserver + 'a>,
    provisioner: Box<dyn DatabaseProvisioner + 'a>,
}

impl<'a> DatabaseBuilder<'a> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            seed_dir: PathBuf::from(DEFAULT_SEED_DIR),
            schema_dir: None,
            encoding: "utf-8".to_string(),
            mode: SeedMode::default(),
            observer: Box::new(LogObserver),
            provisioner: Box::new(SqliteProvisioner),
        }
    }

    /// Sets the output database file. An existing file there is replaced.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = path.as_ref().to_path_buf();
        }
        self
    }

    pub fn with_seed_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.seed_dir = dir.as_ref().to_path_buf();
        }
        self
    }

    /// Reads the scripts from `dir` instead of the ones compiled in.
    pub fn with_schema_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        self.schema_dir = dir.map(|dir| dir.as_ref().to_path_buf());
        self
    }

    /// Sets the seed file encoding by label; validated by [`Self::build`].
    pub fn with_encoding(mut self, label: Option<&str>) -> Self {
        if let Some(label) = label {
            self.encoding = label.to_string();
        }
        self
    }

    pub fn with_mode(mut self, mode: SeedMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_observer(mut self, observer: impl SeedObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_provisioner(mut self, provisioner: impl DatabaseProvisioner + 'a) -> Self {
        self.provisioner = Box::new(provisioner);
        self
    }

    /// Builds the database.
    ///
    /// Steps, in order: remove any existing file, provision an empty one,
    /// connect, create tables, seed, then apply relationships and queries.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Configuration` for an unknown encoding before any
    /// file is touched, `SeedError::Provisioning`, `SeedError::Connection` or
    /// `SeedError::Schema` when the store cannot be prepared, and any fatal
    /// seeding error. Relationship and query failures are only warnings.
    pub fn build(self) -> Result<BuildReport> {
        let encoding = encoding_for_label(&self.encoding)?;
        let scripts = match &self.schema_dir {
            Some(dir) => ScriptSet::from_dir(dir)?,
            None => ScriptSet::embedded(),
        };

        let replaced_existing = remove_existing(&self.database_path)?;
        self.provisioner.create_empty_database(&self.database_path)?;
        let db = Database::connect(&self.database_path)?;

        info!("Creating tables...");
        let outcome = ScriptApplier::fail_fast().apply_script(&db, ScriptKind::Tables, &scripts.tables)?;
        if let ApplyOutcome::PartialFailure(warnings) = outcome {
            let message = warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SeedError::Schema {
                script: ScriptKind::Tables.to_string(),
                message,
            });
        }

        info!("Inserting seed data...");
        let options = SeedOptions {
            seed_dir: self.seed_dir,
            encoding,
            mode: self.mode,
        };
        let seed = SeedPipeline::new(&db, options)
            .with_observer(self.observer)
            .run()?;

        let mut warnings = Vec::new();
        for kind in [ScriptKind::Relationships, ScriptKind::Queries] {
            info!("Applying {kind}...");
            let outcome = ScriptApplier::continue_on_error().apply_script(&db, kind, scripts.script(kind))?;
            if let ApplyOutcome::PartialFailure(failed) = outcome {
                warn!("{} statement(s) of {} failed", failed.len(), kind);
                warnings.extend(failed);
            }
        }

        info!("{} successfully created and populated", self.database_path.display());
        Ok(BuildReport {
            database_path: self.database_path,
            replaced_existing,
            seed,
            warnings,
        })
    }
}

impl Default for DatabaseBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
