use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Attendance record joined with the employee's name and department at read
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAttendance {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = 18)]
    pub total_present: u64,
    #[schema(example = 2)]
    pub total_absent: u64,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_id: Option<String>,
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: Option<String>,
    #[schema(example = "Present", value_type = String)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Exact employee id match
    pub employee_id: Option<String>,
    /// Inclusive lower bound, applied only together with `endDate`
    pub start_date: Option<String>,
    /// Inclusive upper bound, applied only together with `startDate`
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Calendar month as `YYYY-MM`
    pub month: Option<String>,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Every day of the month `first` falls in.
    pub fn month_of(first: NaiveDate) -> Option<Self> {
        let start = first.with_day0(0)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self::new(start, end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Query over the attendance collection. Empty filter matches everything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub range: Option<DateRange>,
}

impl AttendanceFilter {
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            range: None,
        }
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        let employee_matches = self
            .employee_id
            .as_deref()
            .is_none_or(|id| id == record.employee_id);
        let date_matches = self.range.is_none_or(|range| range.contains(record.date));

        employee_matches && date_matches
    }
}
