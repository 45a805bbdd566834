//! Progress events emitted while seeding.

use log::{debug, info};

use super::{report::TableReport, SeedTable};
use crate::error::SkipReason;

/// A step of the seed pipeline worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedEvent {
    TableStarted(SeedTable),
    RecordSkipped {
        table: SeedTable,
        line: u64,
        reason: SkipReason,
    },
    TableFinished(TableReport),
}

/// Receives pipeline progress.
pub trait SeedObserver {
    fn on_event(&mut self, event: &SeedEvent);
}

impl<T: SeedObserver + ?Sized> SeedObserver for &mut T {
    fn on_event(&mut self, event: &SeedEvent) {
        (**self).on_event(event);
    }
}

impl<T: SeedObserver + ?Sized> SeedObserver for Box<T> {
    fn on_event(&mut self, event: &SeedEvent) {
        (**self).on_event(event);
    }
}

/// Reports progress through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SeedObserver for LogObserver {
    fn on_event(&mut self, event: &SeedEvent) {
        match event {
            SeedEvent::TableStarted(table) => info!("Loading {}...", table.name()),
            SeedEvent::RecordSkipped {
                table,
                line,
                reason,
            } => debug!("Skipped {} line {}: {}", table.name(), line, reason),
            SeedEvent::TableFinished(report) => info!(
                "Loaded {}: {} inserted, {} skipped",
                report.table.name(),
                report.inserted,
                report.skipped
            ),
        }
    }
}

/// Keeps every event, in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<SeedEvent>,
}

impl EventLog {
    /// The skip events of one table.
    pub fn skips(&self, table: SeedTable) -> Vec<&SkipReason> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SeedEvent::RecordSkipped {
                    table: skipped,
                    reason,
                    ..
                } if *skipped == table => Some(reason),
                _ => None,
            })
            .collect()
    }
}

impl SeedObserver for EventLog {
    fn on_event(&mut self, event: &SeedEvent) {
        self.events.push(event.clone());
    }
}
