//! Core library for provisioning and seeding the smart gym database.
//!
//! This crate creates an empty SQLite database, applies the schema scripts
//! and loads the seed CSV files. Seed files refer to parent rows by position
//! rather than by id, so the seed pipeline remaps every such reference to the
//! key the store assigned when the parent row was inserted.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gymseed_core::{DatabaseBuilder, SeedMode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let report = DatabaseBuilder::new()
//!     .with_database_path(Some("smart_gym.db"))
//!     .with_seed_dir(Some("seed"))
//!     .with_mode(SeedMode::Permissive)
//!     .build()?;
//!
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod coerce;
pub mod db;
pub mod display;
pub mod error;
pub mod seed;

// Re-export commonly used types
pub use builder::{BuildReport, DatabaseBuilder};
pub use coerce::{FieldKind, FieldValue};
pub use db::{
    provision::{DatabaseProvisioner, SqliteProvisioner},
    schema::{ApplyOutcome, SchemaApplier, ScriptApplier, ScriptKind, ScriptSet, ScriptWarning},
    AccessMechanism, Database,
};
pub use error::{Result, SeedError, SkipReason};
pub use seed::{
    events::{EventLog, LogObserver, SeedEvent, SeedObserver},
    report::{SeedReport, TableReport},
    SeedMode, SeedOptions, SeedPipeline, SeedTable,
};
