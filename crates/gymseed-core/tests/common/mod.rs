#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use gymseed_core::{
    db::schema::TABLES_SQL, Database, DatabaseProvisioner, SeedTable, SqliteProvisioner,
};
use tempfile::TempDir;

/// A provisioned database with tables and a seed directory whose files hold
/// only their header row.
pub struct SeedFixture {
    pub db: Database,
    pub seed_dir: PathBuf,
    pub temp_dir: TempDir,
}

impl SeedFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let seed_dir = temp_dir.path().join("seed");
        fs::create_dir(&seed_dir).expect("Failed to create seed dir");
        for table in SeedTable::LOAD_ORDER {
            write_seed_file(&seed_dir, table, &[]);
        }

        let db_path = temp_dir.path().join("test.db");
        SqliteProvisioner
            .create_empty_database(&db_path)
            .expect("Failed to provision database");
        let db = Database::connect(&db_path).expect("Failed to connect");
        db.execute_batch(TABLES_SQL).expect("Failed to create tables");

        Self {
            db,
            seed_dir,
            temp_dir,
        }
    }

    /// Replaces the seed file of `table` with its header and `rows`.
    pub fn seed(&self, table: SeedTable, rows: &[&str]) -> &Self {
        write_seed_file(&self.seed_dir, table, rows);
        self
    }

    /// Starts the AUTOINCREMENT counter of `table` at `seq + 1`.
    pub fn offset_ids(&self, table: SeedTable, seq: i64) {
        self.db
            .execute_statement(&format!(
                "INSERT INTO sqlite_sequence (name, seq) VALUES ('{}', {})",
                table.name(),
                seq
            ))
            .expect("Failed to offset ids");
    }

    pub fn ids(&self, table: SeedTable, id_column: &str) -> Vec<i64> {
        self.db
            .ids_in_order(table.name(), id_column)
            .expect("Failed to read ids")
    }

    /// Runs a single-column integer query.
    pub fn column(&self, sql: &str) -> Vec<Option<i64>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(sql).expect("Failed to prepare query");
        let rows = stmt
            .query_map([], |row| row.get(0))
            .expect("Failed to run query")
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to read rows");
        rows
    }
}

/// Writes a seed file with the table's header row followed by `rows`.
pub fn write_seed_file(seed_dir: &Path, table: SeedTable, rows: &[&str]) {
    let mut contents = table.columns().join(",");
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(seed_dir.join(table.file_name()), contents).expect("Failed to write seed file");
}

/// The sample seed set shipped with the crate.
pub fn sample_seed_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("seed")
}
