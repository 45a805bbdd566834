//! Script splitting and sequential batch execution.
//!
//! Scripts are split on `;` outside string literals and quoted identifiers.
//! `BEGIN ... END` bodies (triggers) are not understood and must not appear
//! in scripts run through here.

use log::debug;

use crate::error::{Result, SeedError};

/// Splits a script into individual statements.
///
/// Line comments (`--`) and block comments (`/* */`) are removed, and
/// statements that are empty once comments are gone are dropped.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                current.push(c);
                // A doubled quote inside the literal is an escape and simply
                // reopens the literal on the next iteration.
                for inner in chars.by_ref() {
                    current.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
                current.push(' ');
            }
            ';' => push_statement(&mut statements, &mut current),
            _ => current.push(c),
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

impl super::Database {
    /// Executes a single statement that takes no parameters.
    pub fn execute_statement(&self, statement: &str) -> Result<()> {
        debug!("Executing: {statement}");
        self.connection
            .execute_batch(statement)
            .map_err(|source| SeedError::Statement {
                statement: statement.to_string(),
                source,
            })
    }

    /// Executes every statement of a script in order, stopping at the first
    /// failure. Returns the number of statements executed.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Statement` carrying the failing statement. The
    /// statements before it stay applied.
    pub fn execute_batch(&self, script: &str) -> Result<usize> {
        let statements = split_statements(script);
        for statement in &statements {
            self.execute_statement(statement)?;
        }
        Ok(statements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use tempfile::TempDir;

    fn create_test_db() -> (TempDir, Database) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("batch.db");
        rusqlite::Connection::open(&path).expect("Failed to create database");
        let db = Database::connect(&path).expect("Failed to connect");
        (temp_dir, db)
    }

    #[test]
    fn test_split_discards_comments_and_empty_statements() {
        let script = "-- Members\nCREATE TABLE A (x INTEGER); -- trailing\n\n;\n/* block\n comment */\nCREATE TABLE B (y TEXT);\n-- only a comment;\n";
        assert_eq!(
            split_statements(script),
            vec!["CREATE TABLE A (x INTEGER)", "CREATE TABLE B (y TEXT)"]
        );
    }

    #[test]
    fn test_split_respects_quotes() {
        let script = "INSERT INTO T VALUES ('a;b', 'it''s -- fine');\nSELECT \"odd;name\" FROM T";
        assert_eq!(
            split_statements(script),
            vec![
                "INSERT INTO T VALUES ('a;b', 'it''s -- fine')",
                "SELECT \"odd;name\" FROM T",
            ]
        );
    }

    #[test]
    fn test_execute_batch_runs_all_statements() {
        let (_temp_dir, db) = create_test_db();
        let executed = db
            .execute_batch("CREATE TABLE T (x INTEGER);\nINSERT INTO T VALUES (1);\nINSERT INTO T VALUES (2);")
            .expect("Batch should succeed");
        assert_eq!(executed, 3);
        assert_eq!(db.count_rows("T").unwrap(), 2);
    }

    #[test]
    fn test_execute_batch_surfaces_failing_statement() {
        let (_temp_dir, db) = create_test_db();
        let err = db
            .execute_batch("CREATE TABLE T (x INTEGER);\nINSERT INTO Missing VALUES (1);\nCREATE TABLE U (y INTEGER);")
            .unwrap_err();

        match err {
            SeedError::Statement { statement, .. } => {
                assert_eq!(statement, "INSERT INTO Missing VALUES (1)");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Statements before the failure remain applied, later ones never ran
        assert_eq!(db.count_rows("T").unwrap(), 0);
        assert!(db.count_rows("U").is_err());
    }
}
