//! Markdown Display implementations for build and seed reports.
//!
//! The CLI renders this output through its terminal renderer; other callers
//! can print it as plain text.

use std::fmt;

use crate::{builder::BuildReport, seed::report::SeedReport};

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| Table | Inserted | Skipped |")?;
        writeln!(f, "|:-|-:|-:|")?;
        for report in &self.tables {
            writeln!(
                f,
                "| {} | {} | {} |",
                report.table, report.inserted, report.skipped
            )?;
        }
        writeln!(
            f,
            "| **Total** | **{}** | **{}** |",
            self.total_inserted(),
            self.total_skipped()
        )
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Built {}", self.database_path.display())?;
        writeln!(f)?;
        if self.replaced_existing {
            writeln!(f, "Replaced an existing database at this path.")?;
            writeln!(f)?;
        }
        write!(f, "{}", self.seed)?;

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Warnings")?;
            writeln!(f)?;
            for warning in &self.warnings {
                writeln!(f, "- {warning}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        db::schema::{ScriptKind, ScriptWarning},
        seed::{report::TableReport, SeedTable},
    };

    fn sample_report() -> BuildReport {
        BuildReport {
            database_path: PathBuf::from("smart_gym.db"),
            replaced_existing: false,
            seed: SeedReport {
                tables: vec![
                    TableReport {
                        table: SeedTable::Members,
                        inserted: 2,
                        skipped: 1,
                    },
                    TableReport {
                        table: SeedTable::MembershipPlans,
                        inserted: 2,
                        skipped: 0,
                    },
                ],
            },
            warnings: vec![],
        }
    }

    #[test]
    fn test_seed_report_table() {
        let output = sample_report().seed.to_string();
        assert!(output.contains("| Members | 2 | 1 |"));
        assert!(output.contains("| MembershipPlans | 2 | 0 |"));
        assert!(output.contains("| **Total** | **4** | **1** |"));
    }

    #[test]
    fn test_build_report_lists_warnings() {
        let mut report = sample_report();
        assert!(!report.to_string().contains("## Warnings"));

        report.warnings.push(ScriptWarning {
            script: ScriptKind::Relationships,
            statement: "CREATE UNIQUE INDEX ux_Members_Email ON Members (Email)".to_string(),
            message: "UNIQUE constraint failed: Members.Email".to_string(),
        });
        let output = report.to_string();
        assert!(output.starts_with("# Built smart_gym.db"));
        assert!(output.contains("## Warnings"));
        assert!(output.contains("- relationships.sql: UNIQUE constraint failed"));
    }
}
