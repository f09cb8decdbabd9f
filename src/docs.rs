use crate::model::{
    attendance::{
        AttendanceRecord, AttendanceStatus, AttendanceSummary, EnrichedAttendance, MarkAttendance,
    },
    dashboard::{DashboardStats, DepartmentCount},
    employee::{CreateEmployee, Employee},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "0.1.0",
        description = r#"
## HRMS Lite

A small human-resources record keeper: employee profiles, daily attendance
marks and the counts behind the dashboard.

### Key Features
- **Employees**: create, list and delete profiles. `employeeId` and `email`
  are unique (case-insensitive). Deleting an employee removes their attendance.
- **Attendance**: one Present/Absent mark per employee per day, listing with
  date-range filters, per-employee summaries and monthly history.
- **Dashboard**: head counts, today's attendance and department distribution.

### Response Format
Every response is an envelope `{ success, data?, message?, count? }`.
Validation and duplicate errors return 400, missing resources 404.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_summary,
        crate::api::attendance::attendance_history,

        crate::api::dashboard::dashboard_stats,

        crate::api::health::health
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            AttendanceStatus,
            AttendanceRecord,
            EnrichedAttendance,
            AttendanceSummary,
            MarkAttendance,
            DashboardStats,
            DepartmentCount
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Aggregated statistics"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;
