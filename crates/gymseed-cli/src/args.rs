use std::path::PathBuf;

use clap::Parser;
use gymseed_core::SeedMode;

/// Provision the smart gym database and load its seed data
///
/// Creates an empty SQLite database (replacing any file already at the
/// path), creates the tables, loads the seed CSV files and finally applies
/// the relationship and saved query scripts. Seed files refer to parent rows
/// by their position in the parent file; every such reference is remapped to
/// the id the database assigned.
#[derive(Parser)]
#[command(version, about, name = "gymseed")]
pub struct Args {
    /// Path of the database file to create. Defaults to ./smart_gym.db
    #[arg(long)]
    pub database_file: Option<PathBuf>,

    /// Directory holding the seed CSV files. Defaults to ./seed
    #[arg(long)]
    pub seed_dir: Option<PathBuf>,

    /// Directory holding tables.sql, relationships.sql and queries.sql.
    /// The built-in scripts are used when omitted
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Encoding of the seed files, e.g. utf-8 or windows-1252
    #[arg(long)]
    pub encoding: Option<String>,

    /// Fail on the first record that would otherwise be skipped
    #[arg(long)]
    pub strict: bool,

    /// Print the build report as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output and use plain text
    #[arg(long)]
    pub no_color: bool,

    /// Do not print per-table progress
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn mode(&self) -> SeedMode {
        if self.strict {
            SeedMode::Strict
        } else {
            SeedMode::Permissive
        }
    }
}
