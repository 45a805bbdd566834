//! Seed pipeline: loads the seed CSV files and remaps their references.
//!
//! Tables are loaded one after another in [`SeedTable::LOAD_ORDER`]. Seed
//! files refer to parent rows by position, never by real id, so every stage
//! records the ids the store assigned in the arenas of [`SeedKeys`] before
//! later stages consume them.
//!
//! ```text
//! CSV file ─▶ SeedSource ─▶ coerce ─▶ resolve references ─▶ INSERT ─▶ read back id
//!                                         ▲                               │
//!                                         └────────── SeedKeys ◀──────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`source`]: decoding and parsing of seed files
//! - [`keys`]: position and load-order arenas
//! - [`events`]: progress observers
//! - [`report`]: per-table counts
//!
//! The per-table loaders live in `membership`, `training` and `tracking`.

use std::fmt;
use std::path::PathBuf;

use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::{
    coerce::{FieldKind, FieldValue},
    db::Database,
    error::{Result, SeedError, SkipReason},
};

pub mod events;
pub mod keys;
pub mod report;
pub mod source;

mod membership;
mod tracking;
mod training;

use events::{LogObserver, SeedEvent, SeedObserver};
use keys::{parse_reference, KeyArena, KeyedArena, LoadOrderIndex};
use report::{SeedReport, TableReport};
use source::{SeedRecord, SeedSource};

/// The seeded tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeedTable {
    Members,
    MembershipPlans,
    MemberMemberships,
    Payments,
    Exercises,
    WorkoutPlans,
    PlanExercises,
    TrainingSessions,
    SessionExercises,
    SetLogs,
    BodyMetrics,
    Goals,
    Recommendations,
}

impl SeedTable {
    /// Every table, parents before children.
    pub const LOAD_ORDER: [SeedTable; 13] = [
        SeedTable::Members,
        SeedTable::MembershipPlans,
        SeedTable::MemberMemberships,
        SeedTable::Payments,
        SeedTable::Exercises,
        SeedTable::WorkoutPlans,
        SeedTable::PlanExercises,
        SeedTable::TrainingSessions,
        SeedTable::SessionExercises,
        SeedTable::SetLogs,
        SeedTable::BodyMetrics,
        SeedTable::Goals,
        SeedTable::Recommendations,
    ];

    /// Table name in the store.
    pub fn name(&self) -> &'static str {
        match self {
            SeedTable::Members => "Members",
            SeedTable::MembershipPlans => "MembershipPlans",
            SeedTable::MemberMemberships => "MemberMemberships",
            SeedTable::Payments => "Payments",
            SeedTable::Exercises => "Exercises",
            SeedTable::WorkoutPlans => "WorkoutPlans",
            SeedTable::PlanExercises => "PlanExercises",
            SeedTable::TrainingSessions => "TrainingSessions",
            SeedTable::SessionExercises => "SessionExercises",
            SeedTable::SetLogs => "SetLogs",
            SeedTable::BodyMetrics => "BodyMetrics",
            SeedTable::Goals => "Goals",
            SeedTable::Recommendations => "Recommendations",
        }
    }

    /// Seed file name inside the seed directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SeedTable::Members => "members.csv",
            SeedTable::MembershipPlans => "membership_plans.csv",
            SeedTable::MemberMemberships => "member_memberships.csv",
            SeedTable::Payments => "payments.csv",
            SeedTable::Exercises => "exercises.csv",
            SeedTable::WorkoutPlans => "workout_plans.csv",
            SeedTable::PlanExercises => "plan_exercises.csv",
            SeedTable::TrainingSessions => "training_sessions.csv",
            SeedTable::SessionExercises => "session_exercises.csv",
            SeedTable::SetLogs => "set_logs.csv",
            SeedTable::BodyMetrics => "body_metrics.csv",
            SeedTable::Goals => "goals.csv",
            SeedTable::Recommendations => "recommendations.csv",
        }
    }

    /// Header columns of the seed file.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            SeedTable::Members => &[
                "FirstName",
                "LastName",
                "Email",
                "Phone",
                "DateOfBirth",
                "JoinDate",
                "Status",
            ],
            SeedTable::MembershipPlans => &[
                "PlanName",
                "DurationMonths",
                "MonthlyFee",
                "IncludesPTSessions",
            ],
            SeedTable::MemberMemberships => &[
                "MemberID",
                "PlanID",
                "StartDate",
                "EndDate",
                "Status",
                "CancelReason",
            ],
            SeedTable::Payments => &["MemberMembershipID", "Amount", "PaidOn", "Method", "Status"],
            SeedTable::Exercises => &[
                "Name",
                "MuscleGroup",
                "EquipmentType",
                "Difficulty",
                "VideoURL",
            ],
            SeedTable::WorkoutPlans => &["PlanName", "GoalType", "Level"],
            SeedTable::PlanExercises => &[
                "PlanTemplateID",
                "ExerciseID",
                "DayNumber",
                "SortOrder",
                "TargetSets",
                "TargetRepsMin",
                "TargetRepsMax",
                "TargetRPE",
            ],
            SeedTable::TrainingSessions => &[
                "MemberID",
                "SessionDateTime",
                "DurationMinutes",
                "SessionType",
                "Notes",
            ],
            SeedTable::SessionExercises => &["SessionID", "ExerciseID", "SortOrder"],
            SeedTable::SetLogs => &[
                "SessionExerciseID",
                "SetNumber",
                "Reps",
                "WeightKg",
                "RPE",
                "IsPR",
            ],
            SeedTable::BodyMetrics => &[
                "MemberID",
                "MeasuredOn",
                "WeightKg",
                "BodyFatPct",
                "ChestCm",
                "WaistCm",
                "HipCm",
            ],
            SeedTable::Goals => &[
                "MemberID",
                "GoalType",
                "TargetValue",
                "StartDate",
                "TargetDate",
                "Status",
            ],
            SeedTable::Recommendations => &[
                "MemberID",
                "CreatedOn",
                "RecommendationType",
                "ReasonText",
                "RelatedExerciseID",
            ],
        }
    }
}

impl fmt::Display for SeedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How record-level problems are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Skip the record and keep loading; unreadable typed values are stored
    /// as their raw text.
    #[default]
    Permissive,
    /// Abort on the first skipped record or unreadable typed value.
    Strict,
}

/// Where seed files live and how they are read.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub seed_dir: PathBuf,
    pub encoding: &'static Encoding,
    pub mode: SeedMode,
}

impl SeedOptions {
    pub fn new(seed_dir: impl Into<PathBuf>) -> Self {
        Self {
            seed_dir: seed_dir.into(),
            encoding: UTF_8,
            mode: SeedMode::default(),
        }
    }

    /// Sets the text encoding of the seed files by WHATWG label
    /// (`utf-8`, `windows-1252`, `latin1`, ...).
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Configuration` for an unknown label.
    pub fn with_encoding_label(mut self, label: &str) -> Result<Self> {
        self.encoding = encoding_for_label(label)?;
        Ok(self)
    }

    pub fn with_mode(mut self, mode: SeedMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Resolves an encoding label. `utf-8-sig` is accepted as UTF-8, since a
/// byte-order mark is honoured regardless of the configured encoding.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("utf-8-sig") || label.eq_ignore_ascii_case("utf8-sig") {
        return Ok(UTF_8);
    }
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| SeedError::configuration(format!("Unknown encoding label '{label}'")))
}

/// Store-assigned ids collected while seeding.
#[derive(Debug, Clone, Default)]
pub struct SeedKeys {
    pub members: KeyedArena,
    pub membership_plans: KeyArena,
    pub memberships: LoadOrderIndex,
    pub exercises: KeyedArena,
    pub workout_plans: KeyedArena,
    pub sessions: LoadOrderIndex,
    pub session_exercises: LoadOrderIndex,
}

/// A record-level failure: either skip the record or abort the run.
pub(crate) enum RowError {
    Skip(SkipReason),
    Fatal(SeedError),
}

impl From<SkipReason> for RowError {
    fn from(reason: SkipReason) -> Self {
        RowError::Skip(reason)
    }
}

impl From<SeedError> for RowError {
    fn from(err: SeedError) -> Self {
        RowError::Fatal(err)
    }
}

pub(crate) type RowResult<T = ()> = std::result::Result<T, RowError>;

/// Loads every seed file into an empty database.
pub struct SeedPipeline<'a> {
    db: &'a Database,
    options: SeedOptions,
    observer: Box<dyn SeedObserver + 'a>,
    keys: SeedKeys,
}

impl<'a> SeedPipeline<'a> {
    pub fn new(db: &'a Database, options: SeedOptions) -> Self {
        Self {
            db,
            options,
            observer: Box::new(LogObserver),
            keys: SeedKeys::default(),
        }
    }

    /// Replaces the default [`LogObserver`].
    pub fn with_observer(mut self, observer: impl SeedObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The ids collected so far.
    pub fn keys(&self) -> &SeedKeys {
        &self.keys
    }

    /// Loads all tables in [`SeedTable::LOAD_ORDER`].
    ///
    /// # Errors
    ///
    /// Fails on unreadable seed files, store errors and, in strict mode, on
    /// the first rejected record. Rows inserted before the failure remain.
    pub fn run(&mut self) -> Result<SeedReport> {
        let mut report = SeedReport::default();
        for table in SeedTable::LOAD_ORDER {
            let table_report = match table {
                SeedTable::Members => self.load_members()?,
                SeedTable::MembershipPlans => self.load_membership_plans()?,
                SeedTable::MemberMemberships => self.load_member_memberships()?,
                SeedTable::Payments => self.load_payments()?,
                SeedTable::Exercises => self.load_exercises()?,
                SeedTable::WorkoutPlans => self.load_workout_plans()?,
                SeedTable::PlanExercises => self.load_plan_exercises()?,
                SeedTable::TrainingSessions => self.load_training_sessions()?,
                SeedTable::SessionExercises => self.load_session_exercises()?,
                SeedTable::SetLogs => self.load_set_logs()?,
                SeedTable::BodyMetrics => self.load_body_metrics()?,
                SeedTable::Goals => self.load_goals()?,
                SeedTable::Recommendations => self.load_recommendations()?,
            };
            report.tables.push(table_report);
        }
        Ok(report)
    }

    /// Runs `load_row` over every record of `table`'s seed file.
    fn load_table<F>(&mut self, table: SeedTable, mut load_row: F) -> Result<TableReport>
    where
        F: FnMut(&mut Self, &SeedSource, &SeedRecord) -> RowResult,
    {
        self.observer.on_event(&SeedEvent::TableStarted(table));

        let path = self.options.seed_dir.join(table.file_name());
        let source = SeedSource::open(&path, self.options.encoding, table.columns())?;
        let mut report = TableReport::new(table);

        for record in source.records() {
            match load_row(self, &source, record) {
                Ok(()) => report.inserted += 1,
                Err(RowError::Skip(reason)) => {
                    report.skipped += 1;
                    self.observer.on_event(&SeedEvent::RecordSkipped {
                        table,
                        line: record.line(),
                        reason: reason.clone(),
                    });
                    if self.options.mode == SeedMode::Strict {
                        return Err(SeedError::RecordRejected {
                            table: table.name(),
                            line: record.line(),
                            reason,
                        });
                    }
                }
                Err(RowError::Fatal(err)) => return Err(err),
            }
        }

        self.observer.on_event(&SeedEvent::TableFinished(report));
        Ok(report)
    }

    /// A typed field. Unreadable values pass through as text unless the
    /// pipeline is strict.
    fn typed(
        &self,
        source: &SeedSource,
        record: &SeedRecord,
        column: &'static str,
        kind: FieldKind,
    ) -> RowResult<FieldValue> {
        let value = source.value(record, column);
        match self.options.mode {
            SeedMode::Permissive => Ok(value.coerce(kind)),
            SeedMode::Strict => value.try_coerce(kind).map_err(|err| {
                RowError::Skip(SkipReason::Malformed {
                    field: column,
                    value: err.value.to_string(),
                })
            }),
        }
    }

    /// A Yes/No field, read as "No" when the file has no such column.
    fn yes_no(
        &self,
        source: &SeedSource,
        record: &SeedRecord,
        column: &'static str,
    ) -> RowResult<FieldValue> {
        if source.has_column(column) {
            self.typed(source, record, column, FieldKind::YesNo)
        } else {
            Ok(FieldValue::YesNo(false))
        }
    }
}

/// A mandatory field; blank skips the record.
fn required<'r>(
    source: &SeedSource,
    record: &'r SeedRecord,
    column: &'static str,
) -> RowResult<&'r str> {
    source
        .get(record, column)
        .ok_or(RowError::Skip(SkipReason::MissingField(column)))
}

/// A mandatory numeric reference (position or load-order index).
fn reference(source: &SeedSource, record: &SeedRecord, column: &'static str) -> RowResult<i64> {
    let raw = required(source, record, column)?;
    Ok(parse_reference(column, raw)?)
}
