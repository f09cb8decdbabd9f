use actix_web::{HttpResponse, web};

use crate::{
    errors::ApiError,
    model::attendance::{AttendanceQuery, HistoryQuery, MarkAttendance},
    models::ApiResponse,
    service::AppState,
};

/// List attendance, optionally filtered by employee and date range
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance ascending by date", body = Object, example = json!({
            "success": true,
            "data": [{
                "_id": "6c1f7d7e-2b7a-4d43-8c61-5f2a8d3f0e21",
                "employeeId": "EMP-001",
                "employeeName": "John Doe",
                "department": "Engineering",
                "date": "2024-01-15",
                "status": "Present"
            }]
        })),
        (status = 400, description = "Malformed date filter", body = Object),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "success": false,
            "message": "Failed to load attendance records"
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = state.attendance.list(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(records)))
}

/// Mark attendance for one employee and day
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked successfully", body = Object, example = json!({
            "success": true,
            "message": "Attendance marked successfully",
            "data": {
                "_id": "6c1f7d7e-2b7a-4d43-8c61-5f2a8d3f0e21",
                "employeeId": "EMP-001",
                "date": "2024-01-15",
                "status": "Present",
                "createdAt": "2024-01-15T09:00:00.000Z",
                "updatedAt": "2024-01-15T09:00:00.000Z"
            }
        })),
        (status = 400, description = "Missing field or already marked", body = Object, example = json!({
            "success": false,
            "message": "Attendance already marked for this date"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    state: web::Data<AppState>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let record = state.attendance.mark(payload.into_inner()).await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(record).with_message("Attendance marked successfully")))
}

/// Present/absent totals for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/summary/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee natural key")
    ),
    responses(
        (status = 200, description = "Summary; unknown employees get zeroed counts", body = Object, example = json!({
            "success": true,
            "data": {
                "employeeId": "EMP-001",
                "employeeName": "John Doe",
                "totalPresent": 18,
                "totalAbsent": 2
            }
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let summary = state.attendance.summary(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}

/// Monthly attendance history for the calendar view
#[utoipa::path(
    get,
    path = "/api/attendance/history/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee natural key"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Records in the month, ascending by date", body = Object),
        (status = 400, description = "Malformed month", body = Object, example = json!({
            "success": false,
            "message": "Invalid month '2024-13', expected YYYY-MM"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn attendance_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = state
        .attendance
        .history(&path.into_inner(), query.into_inner().month)
        .await?;

    let count = records.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(records).with_count(count)))
}
