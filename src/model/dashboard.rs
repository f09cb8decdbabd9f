use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 4)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(example = 12)]
    pub total_employees: u64,
    #[schema(example = 240)]
    pub total_attendance_records: u64,
    #[schema(example = 10)]
    pub today_present: u64,
    #[schema(example = 1)]
    pub today_absent: u64,
    /// Largest department first
    pub departments: Vec<DepartmentCount>,
}
