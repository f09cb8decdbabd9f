use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::{
    errors::ApiError,
    model::attendance::{
        AttendanceFilter, AttendanceQuery, AttendanceRecord, AttendanceStatus, AttendanceSummary,
        DateRange, EnrichedAttendance, MarkAttendance, NewAttendance,
    },
    store::{AttendanceStore, EmployeeStore, StoreError, UniqueKey},
};

use super::duplicate;

const UNKNOWN_EMPLOYEE: &str = "Unknown";
const UNKNOWN_DEPARTMENT: &str = "N/A";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct AttendanceService {
    employees: Arc<dyn EmployeeStore>,
    attendance: Arc<dyn AttendanceStore>,
}

impl AttendanceService {
    pub fn new(employees: Arc<dyn EmployeeStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self {
            employees,
            attendance,
        }
    }

    /// Lists attendance ascending by date. The date range only applies when
    /// both bounds are given.
    pub async fn list(&self, query: AttendanceQuery) -> Result<Vec<EnrichedAttendance>, ApiError> {
        let mut filter = AttendanceFilter {
            employee_id: non_empty(query.employee_id),
            range: None,
        };
        if let (Some(start), Some(end)) = (non_empty(query.start_date), non_empty(query.end_date)) {
            filter.range = Some(DateRange::new(parse_filter_date(&start)?, parse_filter_date(&end)?));
        }

        let records = self
            .attendance
            .find(&filter)
            .await
            .map_err(ApiError::internal("Failed to load attendance records"))?;

        self.enrich(records)
            .await
            .map_err(ApiError::internal("Failed to load attendance records"))
    }

    pub async fn mark(&self, input: MarkAttendance) -> Result<AttendanceRecord, ApiError> {
        let (Some(employee_id), Some(date), Some(status)) = (
            non_empty(input.employee_id),
            non_empty(input.date),
            non_empty(input.status),
        ) else {
            return Err(ApiError::validation("All fields are required"));
        };

        let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|_| ApiError::validation("Date must be in YYYY-MM-DD format"))?;
        let status = status
            .parse::<AttendanceStatus>()
            .map_err(|_| ApiError::validation("Status must be either Present or Absent"))?;

        self.employees
            .find_by_employee_id(&employee_id)
            .await
            .map_err(ApiError::internal("Failed to mark attendance"))?
            .ok_or_else(|| ApiError::not_found("Employee not found"))?;

        let existing = self
            .attendance
            .find_one(&employee_id, date)
            .await
            .map_err(ApiError::internal("Failed to mark attendance"))?;
        if existing.is_some() {
            return Err(already_marked());
        }

        match self
            .attendance
            .create(NewAttendance {
                employee_id,
                date,
                status,
            })
            .await
        {
            Ok(record) => {
                info!(employee_id = %record.employee_id, date = %record.date, status = %record.status, "Attendance marked");
                Ok(record)
            }
            Err(StoreError::Duplicate(_)) => Err(already_marked()),
            Err(e) => Err(ApiError::internal("Failed to mark attendance")(e)),
        }
    }

    /// Present/absent totals for one employee. An unknown employee yields a
    /// zeroed summary named "Unknown" instead of an error.
    pub async fn summary(&self, employee_id: &str) -> Result<AttendanceSummary, ApiError> {
        let employee = self
            .employees
            .find_by_employee_id(employee_id)
            .await
            .map_err(ApiError::internal("Failed to fetch attendance summary"))?;

        let Some(employee) = employee else {
            debug!(employee_id, "Summary requested for unknown employee");
            return Ok(AttendanceSummary {
                employee_id: employee_id.to_string(),
                employee_name: UNKNOWN_EMPLOYEE.to_string(),
                total_present: 0,
                total_absent: 0,
            });
        };

        let records = self
            .attendance
            .find(&AttendanceFilter::for_employee(employee_id))
            .await
            .map_err(ApiError::internal("Failed to fetch attendance summary"))?;

        let (total_present, total_absent) =
            records
                .iter()
                .fold((0, 0), |(present, absent), record| match record.status {
                    AttendanceStatus::Present => (present + 1, absent),
                    AttendanceStatus::Absent => (present, absent + 1),
                });

        Ok(AttendanceSummary {
            employee_id: employee_id.to_string(),
            employee_name: employee.full_name,
            total_present,
            total_absent,
        })
    }

    /// One employee's marks within the calendar month `month` (`YYYY-MM`), or
    /// the whole history when no month is given.
    pub async fn history(
        &self,
        employee_id: &str,
        month: Option<String>,
    ) -> Result<Vec<EnrichedAttendance>, ApiError> {
        let mut filter = AttendanceFilter::for_employee(employee_id);
        if let Some(month) = non_empty(month) {
            filter = filter.within(parse_month(&month)?);
        }

        let records = self
            .attendance
            .find(&filter)
            .await
            .map_err(ApiError::internal("Failed to load attendance history"))?;

        self.enrich(records)
            .await
            .map_err(ApiError::internal("Failed to load attendance history"))
    }

    /// Joins each record with its employee, one lookup per record.
    async fn enrich(
        &self,
        records: Vec<AttendanceRecord>,
    ) -> Result<Vec<EnrichedAttendance>, StoreError> {
        let lookups = records.into_iter().map(|record| async move {
            let employee = self
                .employees
                .find_by_employee_id(&record.employee_id)
                .await?;
            let (employee_name, department) = match employee {
                Some(e) => (e.full_name, e.department),
                None => (UNKNOWN_EMPLOYEE.to_string(), UNKNOWN_DEPARTMENT.to_string()),
            };

            Ok::<_, StoreError>(EnrichedAttendance {
                id: record.id,
                employee_id: record.employee_id,
                employee_name,
                department,
                date: record.date,
                status: record.status,
            })
        });

        // try_join_all keeps input order, so the date ordering survives.
        try_join_all(lookups).await
    }
}

fn already_marked() -> ApiError {
    duplicate(UniqueKey::AttendanceDay)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_filter_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ApiError::validation(format!("Invalid date '{value}', expected YYYY-MM-DD"))
    })
}

fn parse_month(value: &str) -> Result<DateRange, ApiError> {
    NaiveDate::parse_from_str(&format!("{value}-01"), DATE_FORMAT)
        .ok()
        .and_then(DateRange::month_of)
        .ok_or_else(|| ApiError::validation(format!("Invalid month '{value}', expected YYYY-MM")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::employee::NewEmployee,
        store::{InMemoryAttendanceStore, InMemoryEmployeeStore, MockAttendanceStore},
    };

    struct Fixture {
        employees: Arc<InMemoryEmployeeStore>,
        attendance: Arc<InMemoryAttendanceStore>,
        service: AttendanceService,
    }

    fn fixture() -> Fixture {
        let employees = Arc::new(InMemoryEmployeeStore::new());
        let attendance = Arc::new(InMemoryAttendanceStore::new());
        let service = AttendanceService::new(employees.clone(), attendance.clone());
        Fixture {
            employees,
            attendance,
            service,
        }
    }

    async fn hire(fixture: &Fixture, id: &str, name: &str) {
        fixture
            .employees
            .create(NewEmployee {
                employee_id: id.to_string(),
                full_name: name.to_string(),
                email: format!("{}@corp.io", id.to_lowercase()),
                department: "Ops".to_string(),
            })
            .await
            .unwrap();
    }

    fn mark(id: &str, date: &str, status: &str) -> MarkAttendance {
        MarkAttendance {
            employee_id: Some(id.to_string()),
            date: Some(date.to_string()),
            status: Some(status.to_string()),
        }
    }

    #[actix_web::test]
    async fn missing_field_is_a_validation_error() {
        let fixture = fixture();
        let mut input = mark("E1", "2024-01-01", "Present");
        input.status = None;

        let err = fixture.service.mark(input).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[actix_web::test]
    async fn unrecognized_status_is_rejected_at_write() {
        let fixture = fixture();
        hire(&fixture, "E1", "Ada").await;

        let err = fixture
            .service
            .mark(mark("E1", "2024-01-01", "Late"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[actix_web::test]
    async fn marking_requires_an_existing_employee() {
        let fixture = fixture();

        let err = fixture
            .service
            .mark(mark("GHOST", "2024-01-01", "Present"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[actix_web::test]
    async fn remarking_a_day_is_rejected_even_with_new_status() {
        let fixture = fixture();
        hire(&fixture, "E1", "Ada").await;
        fixture
            .service
            .mark(mark("E1", "2024-01-01", "Present"))
            .await
            .unwrap();

        let err = fixture
            .service
            .mark(mark("E1", "2024-01-01", "Absent"))
            .await
            .unwrap_err();
        let next_day = fixture.service.mark(mark("E1", "2024-01-02", "Absent")).await;

        assert!(matches!(err, ApiError::Duplicate(_)));
        assert_eq!(err.to_string(), "Attendance already marked for this date");
        assert!(next_day.is_ok());
    }

    #[actix_web::test]
    async fn summary_counts_each_status() {
        let fixture = fixture();
        hire(&fixture, "E1", "Ada").await;
        for (day, status) in [
            ("01", "Present"),
            ("02", "Present"),
            ("03", "Absent"),
            ("04", "Present"),
            ("05", "Absent"),
        ] {
            fixture
                .service
                .mark(mark("E1", &format!("2024-01-{day}"), status))
                .await
                .unwrap();
        }

        let summary = fixture.service.summary("E1").await.unwrap();

        assert_eq!(summary.employee_name, "Ada");
        assert_eq!((summary.total_present, summary.total_absent), (3, 2));
    }

    #[actix_web::test]
    async fn summary_is_lenient_for_unknown_employee() {
        let fixture = fixture();

        let summary = fixture.service.summary("NOBODY").await.unwrap();

        assert_eq!(
            summary,
            AttendanceSummary {
                employee_id: "NOBODY".to_string(),
                employee_name: "Unknown".to_string(),
                total_present: 0,
                total_absent: 0,
            }
        );
    }

    #[actix_web::test]
    async fn list_applies_range_only_with_both_bounds() {
        let fixture = fixture();
        hire(&fixture, "E1", "Ada").await;
        for date in ["2024-02-03", "2023-12-31", "2024-01-31", "2024-01-01"] {
            fixture
                .service
                .mark(mark("E1", date, "Present"))
                .await
                .unwrap();
        }

        let ranged = fixture
            .service
            .list(AttendanceQuery {
                employee_id: None,
                start_date: Some("2024-01-01".to_string()),
                end_date: Some("2024-01-31".to_string()),
            })
            .await
            .unwrap();
        let half_open = fixture
            .service
            .list(AttendanceQuery {
                employee_id: None,
                start_date: Some("2024-01-01".to_string()),
                end_date: None,
            })
            .await
            .unwrap();

        let dates = |rows: &[EnrichedAttendance]| -> Vec<String> {
            rows.iter().map(|r| r.date.to_string()).collect()
        };
        assert_eq!(dates(&ranged), ["2024-01-01", "2024-01-31"]);
        assert_eq!(
            dates(&half_open),
            ["2023-12-31", "2024-01-01", "2024-01-31", "2024-02-03"]
        );
    }

    #[actix_web::test]
    async fn orphaned_record_is_listed_as_unknown() {
        let fixture = fixture();
        fixture
            .attendance
            .create(NewAttendance {
                employee_id: "GONE".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                status: AttendanceStatus::Absent,
            })
            .await
            .unwrap();

        let rows = fixture
            .service
            .list(AttendanceQuery::default())
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_name, "Unknown");
        assert_eq!(rows[0].department, "N/A");
    }

    #[actix_web::test]
    async fn list_rejects_malformed_range() {
        let fixture = fixture();

        let err = fixture
            .service
            .list(AttendanceQuery {
                employee_id: None,
                start_date: Some("01/01/2024".to_string()),
                end_date: Some("2024-01-31".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[actix_web::test]
    async fn history_is_limited_to_the_month() {
        let fixture = fixture();
        hire(&fixture, "E1", "Ada").await;
        for date in ["2024-01-31", "2024-02-01", "2024-02-29", "2024-03-01"] {
            fixture
                .service
                .mark(mark("E1", date, "Present"))
                .await
                .unwrap();
        }

        let february = fixture
            .service
            .history("E1", Some("2024-02".to_string()))
            .await
            .unwrap();
        let everything = fixture.service.history("E1", None).await.unwrap();

        let dates: Vec<String> = february.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, ["2024-02-01", "2024-02-29"]);
        assert_eq!(everything.len(), 4);
        assert!(
            fixture
                .service
                .history("E1", Some("2024-13".to_string()))
                .await
                .is_err()
        );
    }

    #[actix_web::test]
    async fn mark_reports_duplicate_lost_to_a_concurrent_insert() {
        let fixture = fixture();
        hire(&fixture, "E1", "Ada").await;
        let mut attendance = MockAttendanceStore::new();
        attendance.expect_find_one().once().return_once(|_, _| Ok(None));
        attendance
            .expect_create()
            .once()
            .return_once(|_| Err(StoreError::Duplicate(UniqueKey::AttendanceDay)));
        let service = AttendanceService::new(fixture.employees.clone(), Arc::new(attendance));

        let err = service
            .mark(mark("E1", "2024-01-01", "Present"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Duplicate(_)));
        assert_eq!(err.to_string(), "Attendance already marked for this date");
    }
}
