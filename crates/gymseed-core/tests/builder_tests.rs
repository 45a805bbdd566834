mod common;

use std::fs;
use std::path::Path;

use common::{sample_seed_dir, SeedFixture};
use gymseed_core::{
    BuildReport, Database, DatabaseBuilder, EventLog, ScriptKind, SeedMode, SeedTable,
};
use tempfile::TempDir;

fn build_sample(db_path: &Path) -> BuildReport {
    DatabaseBuilder::new()
        .with_database_path(Some(db_path))
        .with_seed_dir(Some(sample_seed_dir()))
        .build()
        .expect("Sample build should succeed")
}

fn count(db: &Database, sql: &str) -> i64 {
    db.connection()
        .query_row(sql, [], |row| row.get(0))
        .expect("Failed to run count query")
}

#[test]
fn test_sample_seed_set_builds_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("smart_gym.db");

    let report = build_sample(&db_path);

    assert!(!report.replaced_existing);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.seed.tables.len(), 13);
    assert_eq!(report.seed.total_inserted(), 78);
    assert_eq!(report.seed.total_skipped(), 8);

    let expected = [
        (SeedTable::Members, 6, 1),
        (SeedTable::MembershipPlans, 4, 0),
        (SeedTable::MemberMemberships, 6, 1),
        (SeedTable::Payments, 7, 1),
        (SeedTable::Exercises, 8, 0),
        (SeedTable::WorkoutPlans, 3, 0),
        (SeedTable::PlanExercises, 9, 1),
        (SeedTable::TrainingSessions, 5, 1),
        (SeedTable::SessionExercises, 7, 1),
        (SeedTable::SetLogs, 10, 1),
        (SeedTable::BodyMetrics, 5, 0),
        (SeedTable::Goals, 3, 1),
        (SeedTable::Recommendations, 5, 0),
    ];
    for (table, inserted, skipped) in expected {
        assert_eq!(report.seed.inserted(table), inserted, "{table} inserted");
        assert_eq!(report.seed.skipped(table), skipped, "{table} skipped");
    }
}

#[test]
fn test_sample_references_are_sound() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("smart_gym.db");
    build_sample(&db_path);

    let db = Database::connect(&db_path).unwrap();
    let violations: usize = {
        let mut stmt = db.connection().prepare("PRAGMA foreign_key_check").unwrap();
        let rows = stmt.query_map([], |_| Ok(())).unwrap();
        rows.count()
    };
    assert_eq!(violations, 0);

    // Dev is the fourth loaded member once the blank email row is skipped
    assert_eq!(
        count(
            &db,
            "SELECT p.DurationMonths FROM MemberMemberships mm \
             JOIN Members m ON m.MemberID = mm.MemberID \
             JOIN MembershipPlans p ON p.PlanID = mm.PlanID \
             WHERE m.Email = 'dev.patel@example.com'"
        ),
        1
    );
    assert_eq!(
        count(
            &db,
            "SELECT p.DurationMonths FROM MemberMemberships mm \
             JOIN Members m ON m.MemberID = mm.MemberID \
             JOIN MembershipPlans p ON p.PlanID = mm.PlanID \
             WHERE m.Email = 'ben.carter@example.com'"
        ),
        12
    );
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM Recommendations WHERE RelatedExerciseID IS NULL"
        ),
        3
    );
}

#[test]
fn test_sample_views_are_queryable() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("smart_gym.db");
    build_sample(&db_path);

    let db = Database::connect(&db_path).unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM qryActiveMemberships"), 4);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM qryPersonalRecords"), 2);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM qryMemberPaymentTotals"), 6);
    assert!(count(&db, "SELECT COUNT(*) FROM qrySessionVolume") > 0);
    assert!(count(&db, "SELECT COUNT(*) FROM qryLatestBodyMetrics") > 0);
    assert!(count(&db, "SELECT COUNT(*) FROM qryPlanTemplates") > 0);
}

#[test]
fn test_rebuild_replaces_existing_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("smart_gym.db");

    let first = build_sample(&db_path);
    let second = build_sample(&db_path);

    assert!(!first.replaced_existing);
    assert!(second.replaced_existing);
    assert_eq!(second.seed, first.seed);

    let db = Database::connect(&db_path).unwrap();
    assert_eq!(db.count_rows("Members").unwrap(), 6);
}

#[test]
fn test_duplicate_emails_surface_as_warnings() {
    let fixture = SeedFixture::new();
    fixture
        .seed(
            SeedTable::Members,
            &[
                "Ana,Ortiz,ana@example.com,,,2024-01-08,Active",
                "Ana,Ortiz,ana@example.com,,,2024-02-08,Active",
            ],
        )
        .seed(SeedTable::MembershipPlans, &["Basic,1,29.99,No"])
        .seed(
            SeedTable::MemberMemberships,
            &["1,1,2024-01-08,,Active,", "2,1,2024-02-08,,Active,"],
        );

    let db_path = fixture.temp_dir.path().join("dupes.db");
    let mut log = EventLog::default();
    let report = DatabaseBuilder::new()
        .with_database_path(Some(&db_path))
        .with_seed_dir(Some(&fixture.seed_dir))
        .with_observer(&mut log)
        .build()
        .unwrap();

    assert_eq!(report.seed.inserted(SeedTable::Members), 2);
    assert_eq!(report.seed.inserted(SeedTable::MemberMemberships), 1);
    assert_eq!(report.seed.skipped(SeedTable::MemberMemberships), 1);
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.script == ScriptKind::Relationships
            && warning.statement.contains("Members")));
    assert!(report.to_string().contains("## Warnings"));
    assert_eq!(log.skips(SeedTable::MemberMemberships).len(), 1);
}

#[test]
fn test_strict_build_stops_on_first_rejection() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("smart_gym.db");

    let err = DatabaseBuilder::new()
        .with_database_path(Some(&db_path))
        .with_seed_dir(Some(sample_seed_dir()))
        .with_mode(SeedMode::Strict)
        .build()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Rejected Members record on line 5: Email is blank"
    );
    assert!(db_path.exists());
}

#[test]
fn test_custom_schema_dir_and_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let schema_dir = temp_dir.path().join("schema");
    fs::create_dir(&schema_dir).unwrap();
    for kind in [ScriptKind::Tables, ScriptKind::Relationships, ScriptKind::Queries] {
        let embedded = gymseed_core::ScriptSet::embedded();
        fs::write(schema_dir.join(kind.file_name()), embedded.script(kind)).unwrap();
    }
    fs::write(
        schema_dir.join(ScriptKind::Queries.file_name()),
        "CREATE VIEW qryMembers AS SELECT * FROM Members;\nCREATE VIEW qryMembers AS SELECT Email FROM Members;",
    )
    .unwrap();

    let seed_dir = temp_dir.path().join("seed");
    fs::create_dir(&seed_dir).unwrap();
    for table in SeedTable::LOAD_ORDER {
        common::write_seed_file(&seed_dir, table, &[]);
    }
    // "José" in windows-1252
    let mut members = b"FirstName,LastName,Email,Phone,DateOfBirth,JoinDate,Status\n".to_vec();
    members.extend_from_slice(b"Jos\xe9,Lima,jose@example.com,,,2024-01-08,Active\n");
    fs::write(seed_dir.join(SeedTable::Members.file_name()), members).unwrap();

    let db_path = temp_dir.path().join("custom.db");
    let report = DatabaseBuilder::new()
        .with_database_path(Some(&db_path))
        .with_seed_dir(Some(&seed_dir))
        .with_schema_dir(Some(&schema_dir))
        .with_encoding(Some("windows-1252"))
        .build()
        .unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].script, ScriptKind::Queries);

    let db = Database::connect(&db_path).unwrap();
    let name: String = db
        .connection()
        .query_row("SELECT FirstName FROM qryMembers", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "José");
}
