use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::{errors::ApiError, models::ApiResponse, service::AppState};

/// Dashboard statistics
///
/// "Today" is the current UTC date.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Head counts and today's attendance", body = Object, example = json!({
            "success": true,
            "data": {
                "totalEmployees": 12,
                "totalAttendanceRecords": 240,
                "todayPresent": 10,
                "todayAbsent": 1,
                "departments": [
                    { "department": "Engineering", "count": 7 },
                    { "department": "Sales", "count": 5 }
                ]
            }
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stats = state.dashboard.stats(Utc::now().date_naive()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}
