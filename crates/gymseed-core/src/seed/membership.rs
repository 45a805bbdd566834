//! Members, membership plans, memberships and payments.

use super::{
    keys::KeyArena, reference, report::TableReport, required, RowResult, SeedPipeline, SeedTable,
};
use super::source::{SeedRecord, SeedSource};
use crate::{
    coerce::{FieldKind, FieldValue},
    error::{Result, SeedError},
};

const INSERT_MEMBER_SQL: &str = "INSERT INTO Members (FirstName, LastName, Email, Phone, DateOfBirth, JoinDate, Status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const INSERT_MEMBERSHIP_PLAN_SQL: &str = "INSERT INTO MembershipPlans (PlanName, DurationMonths, MonthlyFee, IncludesPTSessions) VALUES (?1, ?2, ?3, ?4)";
const INSERT_MEMBER_MEMBERSHIP_SQL: &str = "INSERT INTO MemberMemberships (MemberID, PlanID, StartDate, EndDate, Status, CancelReason) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const INSERT_PAYMENT_SQL: &str = "INSERT INTO Payments (MemberMembershipID, Amount, PaidOn, Method, Status) VALUES (?1, ?2, ?3, ?4, ?5)";

impl SeedPipeline<'_> {
    /// Members are keyed by email; positions follow the first insert of each
    /// distinct email.
    pub(super) fn load_members(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::Members, Self::load_member)
    }

    fn load_member(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let email = required(source, record, "Email")?;
        let values = [
            source.value(record, "FirstName"),
            source.value(record, "LastName"),
            FieldValue::Text(email.to_string()),
            source.value(record, "Phone"),
            self.typed(source, record, "DateOfBirth", FieldKind::Date)?,
            self.typed(source, record, "JoinDate", FieldKind::Date)?,
            source.value(record, "Status"),
        ];
        self.db.run_parameterized(INSERT_MEMBER_SQL, &values)?;

        if let Some(id) = self.db.get_id_by_key("Members", "Email", email, "MemberID")? {
            self.keys.members.insert(email, id);
        }
        Ok(())
    }

    /// Plan names repeat across durations, so positions come from reading
    /// the table back in id order once the file is loaded.
    pub(super) fn load_membership_plans(&mut self) -> Result<TableReport> {
        let report = self.load_table(SeedTable::MembershipPlans, Self::load_membership_plan)?;
        self.keys.membership_plans = KeyArena::from(self.db.ids_in_order("MembershipPlans", "PlanID")?);
        Ok(report)
    }

    fn load_membership_plan(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let name = required(source, record, "PlanName")?;
        let values = [
            FieldValue::Text(name.to_string()),
            self.typed(source, record, "DurationMonths", FieldKind::Integer)?,
            self.typed(source, record, "MonthlyFee", FieldKind::Real)?,
            self.yes_no(source, record, "IncludesPTSessions")?,
        ];
        self.db.run_parameterized(INSERT_MEMBERSHIP_PLAN_SQL, &values)?;
        Ok(())
    }

    pub(super) fn load_member_memberships(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::MemberMemberships, Self::load_member_membership)
    }

    fn load_member_membership(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        required(source, record, "MemberID")?;
        required(source, record, "PlanID")?;
        let member_position = reference(source, record, "MemberID")?;
        let plan_position = reference(source, record, "PlanID")?;
        let member_id = self.keys.members.resolve("MemberID", member_position)?;
        let plan_id = self.keys.membership_plans.resolve("PlanID", plan_position)?;

        let values = [
            FieldValue::Integer(member_id),
            FieldValue::Integer(plan_id),
            self.typed(source, record, "StartDate", FieldKind::Date)?,
            self.typed(source, record, "EndDate", FieldKind::Date)?,
            source.value(record, "Status"),
            source.value(record, "CancelReason"),
        ];
        self.db.run_parameterized(INSERT_MEMBER_MEMBERSHIP_SQL, &values)?;

        let id = self.latest_id(SeedTable::MemberMemberships, "MemberMembershipID")?;
        self.keys.memberships.record(id);
        Ok(())
    }

    pub(super) fn load_payments(&mut self) -> Result<TableReport> {
        self.load_table(SeedTable::Payments, Self::load_payment)
    }

    fn load_payment(&mut self, source: &SeedSource, record: &SeedRecord) -> RowResult {
        let index = reference(source, record, "MemberMembershipID")?;
        let membership_id = self.keys.memberships.resolve("MemberMembershipID", index)?;

        let values = [
            FieldValue::Integer(membership_id),
            self.typed(source, record, "Amount", FieldKind::Real)?,
            self.typed(source, record, "PaidOn", FieldKind::Date)?,
            source.value(record, "Method"),
            source.value(record, "Status"),
        ];
        self.db.run_parameterized(INSERT_PAYMENT_SQL, &values)?;
        Ok(())
    }

    /// The id just assigned in `table`, for entities without a unique
    /// natural key.
    pub(super) fn latest_id(&self, table: SeedTable, id_column: &str) -> Result<i64> {
        self.db.max_id(table.name(), id_column)?.ok_or_else(|| {
            SeedError::database(format!("{} is empty after an insert", table.name()))
                .with_source(rusqlite::Error::QueryReturnedNoRows)
        })
    }
}
