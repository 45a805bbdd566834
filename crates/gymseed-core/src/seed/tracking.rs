//! Body metrics, goals and recommendations, all owned by a member.

use super::keys::parse_reference;
use super::source::{SeedRecord, SeedSource};
use super::{reference, report::TableReport, RowResult, SeedPipeline, SeedTable};
use crate::{
    coerce::{FieldKind, FieldValue},
    error::Result,
};

const INSERT_BODY_METRIC_SQL: &str = "INSERT INTO BodyMetrics (MemberID, MeasuredOn, WeightKg, BodyFatPct, ChestCm, WaistCm, HipCm) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const INSERT_GOAL_SQL: &str = "INSERT INTO Goals (MemberID, GoalType, TargetValue, StartDate, TargetDate, Status) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const INSERT_RECOMMENDATION_SQL: &str = "INSERT INTO Recommendations (MemberID, CreatedOn, RecommendationType, ReasonText, RelatedExerciseID) VALUES (?1, ?2, ?3, ?4, ?5)";

impl SeedPipeline<'_> {
    pub(super) fn load_body_metrics(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::BodyMetrics, Self::load_body_metric)
    }

    fn load_body_metric(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let member_id = self.member(source, record)?;
        let values = [
            FieldValue::Integer(member_id),
            self.typed(source, record, "MeasuredOn", FieldKind::Date)?,
            self.typed(source, record, "WeightKg", FieldKind::Real)?,
            self.typed(source, record, "BodyFatPct", FieldKind::Real)?,
            self.typed(source, record, "ChestCm", FieldKind::Real)?,
            self.typed(source, record, "WaistCm", FieldKind::Real)?,
            self.typed(source, record, "HipCm", FieldKind::Real)?,
        ];
        self.db.run_parameterized(INSERT_BODY_METRIC_SQL, &values)?;
        Ok(())
    }

    pub(super) fn load_goals(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::Goals, Self::load_goal)
    }

    fn load_goal(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let member_id = self.member(source, record)?;
        let values = [
            FieldValue::Integer(member_id),
            source.value(record, "GoalType"),
            self.typed(source, record, "TargetValue", FieldKind::Real)?,
            self.typed(source, record, "StartDate", FieldKind::Date)?,
            self.typed(source, record, "TargetDate", FieldKind::Date)?,
            source.value(record, "Status"),
        ];
        self.db.run_parameterized(INSERT_GOAL_SQL, &values)?;
        Ok(())
    }

    pub(super) fn load_recommendations(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::Recommendations, Self::load_recommendation)
    }

    /// The related exercise is optional: a position outside the loaded
    /// exercises stores NULL, an unreadable one skips the record.
    fn load_recommendation(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let member_id = self.member(source, record)?;
        let related_exercise = match source.get(record, "RelatedExerciseID") {
            Some(raw) => {
                let position = parse_reference("RelatedExerciseID", raw)?;
                self.keys
                    .exercises
                    .resolve("RelatedExerciseID", position)
                    .map_or(FieldValue::Absent, FieldValue::Integer)
            }
            None => FieldValue::Absent,
        };

        let values = [
            FieldValue::Integer(member_id),
            self.typed(source, record, "CreatedOn", FieldKind::Date)?,
            source.value(record, "RecommendationType"),
            source.value(record, "ReasonText"),
            related_exercise,
        ];
        self.db.run_parameterized(INSERT_RECOMMENDATION_SQL, &values)?;
        Ok(())
    }

    /// Resolves the record's MemberID position.
    fn member(&self, source: &SeedSource, record: &SeedRecord) -> RowResult<i64> {
        let position = reference(source, record, "MemberID")?;
        Ok(self.keys.members.resolve("MemberID", position)?)
    }
}
