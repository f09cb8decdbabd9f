use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    errors::ApiError,
    model::{
        attendance::{AttendanceFilter, AttendanceStatus, DateRange},
        dashboard::DashboardStats,
    },
    store::{AttendanceStore, EmployeeStore},
};

const STATS_FAILED: &str = "Error fetching dashboard statistics";

#[derive(Debug, Clone)]
pub struct DashboardService {
    employees: Arc<dyn EmployeeStore>,
    attendance: Arc<dyn AttendanceStore>,
}

impl DashboardService {
    pub fn new(employees: Arc<dyn EmployeeStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self {
            employees,
            attendance,
        }
    }

    /// Totals plus the present/absent split for `today`.
    pub async fn stats(&self, today: NaiveDate) -> Result<DashboardStats, ApiError> {
        let total_employees = self
            .employees
            .count()
            .await
            .map_err(ApiError::internal(STATS_FAILED))?;
        let total_attendance_records = self
            .attendance
            .count()
            .await
            .map_err(ApiError::internal(STATS_FAILED))?;
        let departments = self
            .employees
            .count_by_department()
            .await
            .map_err(ApiError::internal(STATS_FAILED))?;

        let today_marks = self
            .attendance
            .find(&AttendanceFilter::default().within(DateRange::day(today)))
            .await
            .map_err(ApiError::internal(STATS_FAILED))?;
        let today_present = today_marks
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as u64;
        let today_absent = today_marks.len() as u64 - today_present;

        Ok(DashboardStats {
            total_employees,
            total_attendance_records,
            today_present,
            today_absent,
            departments,
        })
    }
}
