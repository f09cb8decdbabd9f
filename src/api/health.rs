use actix_web::{HttpResponse, Responder, get};

use crate::models::ApiResponse;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::message("Welcome to HRMS Lite API"))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "success": true,
            "message": "HRMS Lite API is running"
        }))
    ),
    tag = "Health"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::message("HRMS Lite API is running"))
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiResponse::failure("Route not found"))
}
