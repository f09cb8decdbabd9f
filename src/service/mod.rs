use std::sync::Arc;

use crate::{
    errors::ApiError,
    store::{
        AttendanceStore, EmployeeStore, InMemoryAttendanceStore, InMemoryEmployeeStore, UniqueKey,
    },
};

pub mod attendance;
pub mod dashboard;
pub mod employee;

pub use attendance::AttendanceService;
pub use dashboard::DashboardService;
pub use employee::EmployeeService;

/// Services shared by every worker, registered as `web::Data<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub attendance: AttendanceService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(employees: Arc<dyn EmployeeStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self {
            employees: EmployeeService::new(employees.clone(), attendance.clone()),
            attendance: AttendanceService::new(employees.clone(), attendance.clone()),
            dashboard: DashboardService::new(employees, attendance),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryEmployeeStore::new()),
            Arc::new(InMemoryAttendanceStore::new()),
        )
    }
}

/// Client-facing message for a write that collided with `key`.
pub(crate) fn duplicate(key: UniqueKey) -> ApiError {
    match key {
        UniqueKey::EmployeeId => ApiError::duplicate("Employee ID already exists"),
        UniqueKey::Email => ApiError::duplicate("Email already exists"),
        UniqueKey::AttendanceDay => {
            ApiError::duplicate("Attendance already marked for this date")
        }
    }
}
