//! Runs a build and presents its outcome.

use anyhow::{Context, Result};
use gymseed_core::{DatabaseBuilder, LogObserver, SeedEvent, SeedObserver};

use crate::{args::Args, renderer::TerminalRenderer};

/// Prints table progress to stderr and forwards every event to the log.
///
/// Progress goes to stderr so that `--json` output stays parseable.
pub struct ConsoleObserver {
    quiet: bool,
    log: LogObserver,
}

impl ConsoleObserver {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            log: LogObserver,
        }
    }
}

impl SeedObserver for ConsoleObserver {
    fn on_event(&mut self, event: &SeedEvent) {
        self.log.on_event(event);
        if self.quiet {
            return;
        }
        match event {
            SeedEvent::TableStarted(table) => eprintln!("  Loading {table}..."),
            SeedEvent::TableFinished(report) if report.skipped > 0 => {
                eprintln!("    {} skipped", report.skipped)
            }
            _ => {}
        }
    }
}

pub struct Cli {
    renderer: TerminalRenderer,
    json: bool,
}

impl Cli {
    pub fn new(renderer: TerminalRenderer, json: bool) -> Self {
        Self { renderer, json }
    }

    /// Builds the database described by `args` and prints the report.
    pub fn build(&self, args: Args) -> Result<()> {
        let mode = args.mode();
        let report = DatabaseBuilder::new()
            .with_database_path(args.database_file)
            .with_seed_dir(args.seed_dir)
            .with_schema_dir(args.schema_dir)
            .with_encoding(args.encoding.as_deref())
            .with_mode(mode)
            .with_observer(ConsoleObserver::new(args.quiet))
            .build()
            .context("Failed to build database")?;

        if self.json {
            println!("{}", report.to_json()?);
        } else {
            self.renderer.render(&report.to_string())?;
        }
        Ok(())
    }
}
