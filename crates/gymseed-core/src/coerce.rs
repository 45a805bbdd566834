//! Null-preserving type coercion for seed fields.
//!
//! Seed files carry every value as text. Before insertion each field is
//! coerced to the type its column holds. Blank text always becomes
//! [`FieldValue::Absent`], which binds as SQL `NULL`.
//!
//! Coercion comes in two flavours: [`FieldValue::try_coerce`] reports a
//! failure, [`FieldValue::coerce`] hands the input back unchanged so the raw
//! text still reaches the store. Both are idempotent.

use std::fmt;

use jiff::civil::{Date, DateTime, Time};
use jiff::fmt::strtime;
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

const DATE_FORMATS: &[&str] = &["%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
const STORED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The semantic type of a seed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    /// Access-style boolean written as "Yes"/"No"
    YesNo,
    Date,
    DateTime,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Real => "real",
            FieldKind::YesNo => "yes/no",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A field value ready to be bound to an insert statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Blank or missing in the source
    Absent,
    Text(String),
    Integer(i64),
    Real(f64),
    YesNo(bool),
    Date(Date),
    DateTime(DateTime),
}

/// A value that does not read as the requested kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionError {
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot read {} as {}", self.value, self.kind)
    }
}

impl std::error::Error for CoercionError {}

impl FieldValue {
    /// Normalizes a raw source field. Missing or whitespace-only text is
    /// `Absent`; anything else is kept as written. Typed coercions trim.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(text) if !text.trim().is_empty() => FieldValue::Text(text.to_string()),
            _ => FieldValue::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Coerces the value, falling back to the unchanged input on failure.
    pub fn coerce(self, kind: FieldKind) -> Self {
        match self.try_coerce(kind) {
            Ok(value) => value,
            Err(err) => err.value,
        }
    }

    /// Coerces the value, reporting values that do not fit `kind`.
    pub fn try_coerce(self, kind: FieldKind) -> Result<Self, CoercionError> {
        let coerced = match (kind, &self) {
            (_, FieldValue::Absent) => Some(FieldValue::Absent),
            (_, FieldValue::Text(text)) if text.trim().is_empty() => Some(FieldValue::Absent),
            (FieldKind::Text, FieldValue::Text(_)) => Some(self.clone()),
            (FieldKind::Text, other) => Some(FieldValue::Text(other.to_string())),
            (FieldKind::Integer, FieldValue::Integer(_)) => Some(self.clone()),
            (FieldKind::Integer, FieldValue::Text(text)) => {
                text.trim().parse().ok().map(FieldValue::Integer)
            }
            (FieldKind::Real, FieldValue::Real(_)) => Some(self.clone()),
            (FieldKind::Real, FieldValue::Integer(i)) => Some(FieldValue::Real(*i as f64)),
            (FieldKind::Real, FieldValue::Text(text)) => parse_real(text).map(FieldValue::Real),
            (FieldKind::YesNo, FieldValue::YesNo(_)) => Some(self.clone()),
            (FieldKind::YesNo, FieldValue::Text(text)) => parse_yes_no(text).map(FieldValue::YesNo),
            (FieldKind::Date, FieldValue::Date(_)) => Some(self.clone()),
            (FieldKind::Date, FieldValue::Text(text)) => parse_date(text).map(FieldValue::Date),
            (FieldKind::DateTime, FieldValue::DateTime(_)) => Some(self.clone()),
            (FieldKind::DateTime, FieldValue::Date(date)) => {
                Some(FieldValue::DateTime(date.to_datetime(Time::midnight())))
            }
            (FieldKind::DateTime, FieldValue::Text(text)) => {
                parse_datetime(text).map(FieldValue::DateTime)
            }
            _ => None,
        };

        coerced.ok_or(CoercionError { kind, value: self })
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => Ok(()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Real(r) => write!(f, "{r}"),
            FieldValue::YesNo(true) => f.write_str("Yes"),
            FieldValue::YesNo(false) => f.write_str("No"),
            FieldValue::Date(date) => write!(f, "{date}"),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.strftime(STORED_DATETIME_FORMAT)),
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Absent => ToSqlOutput::Owned(Value::Null),
            FieldValue::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
            FieldValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Real(r) => ToSqlOutput::Owned(Value::Real(*r)),
            FieldValue::YesNo(flag) => ToSqlOutput::Owned(Value::Integer(i64::from(*flag))),
            FieldValue::Date(_) | FieldValue::DateTime(_) => {
                ToSqlOutput::Owned(Value::Text(self.to_string()))
            }
        })
    }
}

fn parse_real(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "-1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    text.parse::<Date>().ok().or_else(|| {
        DATE_FORMATS
            .iter()
            .find_map(|format| strtime::parse(format, text).ok()?.to_date().ok())
    })
}

fn parse_datetime(text: &str) -> Option<DateTime> {
    let text = text.trim();
    text.parse::<DateTime>()
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| strtime::parse(format, text).ok()?.to_datetime().ok())
        })
        .or_else(|| parse_date(text).map(|date| date.to_datetime(Time::midnight())))
}
