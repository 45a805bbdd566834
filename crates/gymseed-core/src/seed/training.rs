//! Exercises, workout plan templates and logged training.

use super::source::{SeedRecord, SeedSource};
use super::{reference, report::TableReport, required, RowResult, SeedPipeline, SeedTable};
use crate::{
    coerce::{FieldKind, FieldValue},
    error::Result,
};

const INSERT_EXERCISE_SQL: &str = "INSERT INTO Exercises (Name, MuscleGroup, EquipmentType, Difficulty, VideoURL) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_WORKOUT_PLAN_SQL: &str =
    "INSERT INTO WorkoutPlans (PlanName, GoalType, Level) VALUES (?1, ?2, ?3)";
const INSERT_PLAN_EXERCISE_SQL: &str = "INSERT INTO PlanExercises (PlanTemplateID, ExerciseID, DayNumber, SortOrder, TargetSets, TargetRepsMin, TargetRepsMax, TargetRPE) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const INSERT_TRAINING_SESSION_SQL: &str = "INSERT INTO TrainingSessions (MemberID, SessionDateTime, DurationMinutes, SessionType, Notes) VALUES (?1, ?2, ?3, ?4, ?5)";
const INSERT_SESSION_EXERCISE_SQL: &str =
    "INSERT INTO SessionExercises (SessionID, ExerciseID, SortOrder) VALUES (?1, ?2, ?3)";
const INSERT_SET_LOG_SQL: &str = "INSERT INTO SetLogs (SessionExerciseID, SetNumber, Reps, WeightKg, RPE, IsPR) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

impl SeedPipeline<'_> {
    pub(super) fn load_exercises(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::Exercises, Self::load_exercise)
    }

    fn load_exercise(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let name = required(source, record, "Name")?;
        let values = [
            FieldValue::Text(name.to_string()),
            source.value(record, "MuscleGroup"),
            source.value(record, "EquipmentType"),
            source.value(record, "Difficulty"),
            source.value(record, "VideoURL"),
        ];
        self.db.run_parameterized(INSERT_EXERCISE_SQL, &values)?;

        if let Some(id) = self.db.get_id_by_key("Exercises", "Name", name, "ExerciseID")? {
            self.keys.exercises.insert(name, id);
        }
        Ok(())
    }

    pub(super) fn load_workout_plans(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::WorkoutPlans, Self::load_workout_plan)
    }

    fn load_workout_plan(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let name = required(source, record, "PlanName")?;
        let values = [
            FieldValue::Text(name.to_string()),
            source.value(record, "GoalType"),
            source.value(record, "Level"),
        ];
        self.db.run_parameterized(INSERT_WORKOUT_PLAN_SQL, &values)?;

        if let Some(id) =
            self.db
                .get_id_by_key("WorkoutPlans", "PlanName", name, "PlanTemplateID")?
        {
            self.keys.workout_plans.insert(name, id);
        }
        Ok(())
    }

    pub(super) fn load_plan_exercises(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::PlanExercises, Self::load_plan_exercise)
    }

    fn load_plan_exercise(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        required(source, record, "PlanTemplateID")?;
        required(source, record, "ExerciseID")?;
        let plan_position = reference(source, record, "PlanTemplateID")?;
        let exercise_position = reference(source, record, "ExerciseID")?;
        let plan_id = self.keys.workout_plans.resolve("PlanTemplateID", plan_position)?;
        let exercise_id = self.keys.exercises.resolve("ExerciseID", exercise_position)?;

        let values = [
            FieldValue::Integer(plan_id),
            FieldValue::Integer(exercise_id),
            self.typed(source, record, "DayNumber", FieldKind::Integer)?,
            self.typed(source, record, "SortOrder", FieldKind::Integer)?,
            self.typed(source, record, "TargetSets", FieldKind::Integer)?,
            self.typed(source, record, "TargetRepsMin", FieldKind::Integer)?,
            self.typed(source, record, "TargetRepsMax", FieldKind::Integer)?,
            self.typed(source, record, "TargetRPE", FieldKind::Real)?,
        ];
        self.db.run_parameterized(INSERT_PLAN_EXERCISE_SQL, &values)?;
        Ok(())
    }

    pub(super) fn load_training_sessions(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::TrainingSessions, Self::load_training_session)
    }

    fn load_training_session(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let member_position = reference(source, record, "MemberID")?;
        let member_id = self.keys.members.resolve("MemberID", member_position)?;

        let values = [
            FieldValue::Integer(member_id),
            self.typed(source, record, "SessionDateTime", FieldKind::DateTime)?,
            self.typed(source, record, "DurationMinutes", FieldKind::Integer)?,
            source.value(record, "SessionType"),
            source.value(record, "Notes"),
        ];
        self.db.run_parameterized(INSERT_TRAINING_SESSION_SQL, &values)?;

        let id = self.latest_id(SeedTable::TrainingSessions, "SessionID")?;
        self.keys.sessions.record(id);
        Ok(())
    }

    pub(super) fn load_session_exercises(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::SessionExercises, Self::load_session_exercise)
    }

    fn load_session_exercise(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        required(source, record, "SessionID")?;
        required(source, record, "ExerciseID")?;
        let session_index = reference(source, record, "SessionID")?;
        let exercise_position = reference(source, record, "ExerciseID")?;
        let session_id = self.keys.sessions.resolve("SessionID", session_index)?;
        let exercise_id = self.keys.exercises.resolve("ExerciseID", exercise_position)?;

        let values = [
            FieldValue::Integer(session_id),
            FieldValue::Integer(exercise_id),
            self.typed(source, record, "SortOrder", FieldKind::Integer)?,
        ];
        self.db.run_parameterized(INSERT_SESSION_EXERCISE_SQL, &values)?;

        let id = self.latest_id(SeedTable::SessionExercises, "SessionExerciseID")?;
        self.keys.session_exercises.record(id);
        Ok(())
    }

    pub(super) fn load_set_logs(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::SetLogs, Self::load_set_log)
    }

    fn load_set_log(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let index = reference(source, record, "SessionExerciseID")?;
        let session_exercise_id = self.keys.session_exercises.resolve("SessionExerciseID", index)?;

        let values = [
            FieldValue::Integer(session_exercise_id),
            self.typed(source, record, "SetNumber", FieldKind::Integer)?,
            self.typed(source, record, "Reps", FieldKind::Integer)?,
            self.typed(source, record, "WeightKg", FieldKind::Real)?,
            self.typed(source, record, "RPE", FieldKind::Real)?,
            self.yes_no(source, record, "IsPR")?,
        ];
        self.db.run_parameterized(INSERT_SET_LOG_SQL, &values)?;
        Ok(())
    }
}
