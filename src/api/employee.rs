use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::{
    errors::ApiError,
    model::employee::CreateEmployee,
    models::ApiResponse,
    service::AppState,
};

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = Object, example = json!({
            "success": true,
            "count": 1,
            "data": [{
                "_id": "1f0c6a55-3c1e-4b8e-9d5b-2a7f2f3b9c11",
                "employeeId": "EMP-001",
                "fullName": "John Doe",
                "email": "john.doe@company.com",
                "department": "Engineering",
                "createdAt": "2024-01-01T09:00:00.000Z",
                "updatedAt": "2024-01-01T09:00:00.000Z"
            }]
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "success": false,
            "message": "Error fetching employees"
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let employees = state.employees.list().await?;
    let count = employees.len();
    debug!(count, "Listed employees");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(employees).with_count(count)))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Object, example = json!({
            "success": true,
            "message": "Employee created successfully",
            "data": {
                "_id": "1f0c6a55-3c1e-4b8e-9d5b-2a7f2f3b9c11",
                "employeeId": "EMP-001",
                "fullName": "John Doe",
                "email": "john.doe@company.com",
                "department": "Engineering",
                "createdAt": "2024-01-01T09:00:00.000Z",
                "updatedAt": "2024-01-01T09:00:00.000Z"
            }
        })),
        (status = 400, description = "Validation failure or duplicate key", body = Object, example = json!({
            "success": false,
            "message": "Employee ID already exists"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "success": false,
            "message": "Error creating employee"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    state: web::Data<AppState>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee = state.employees.create(payload.into_inner()).await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(employee).with_message("Employee created successfully")))
}

/// Delete Employee
///
/// Also removes every attendance record of the employee.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = String, Path, description = "Store identifier (`_id`) of the employee")
    ),
    responses(
        (status = 200, description = "Employee deleted successfully", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    state.employees.delete(&id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Employee deleted successfully")))
}
