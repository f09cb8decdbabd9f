use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "_id": "1f0c6a55-3c1e-4b8e-9d5b-2a7f2f3b9c11",
        "employeeId": "EMP-001",
        "fullName": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "createdAt": "2024-01-01T09:00:00.000Z",
        "updatedAt": "2024-01-01T09:00:00.000Z"
    })
)]
pub struct Employee {
    /// Store-assigned identifier, used for deletion.
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Natural key, always upper-case.
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    /// Always lower-case.
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request as received from the client. Every field is optional so
/// that missing values surface as validation errors rather than body
/// deserialization failures.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[schema(example = "emp-001", value_type = String)]
    pub employee_id: Option<String>,
    #[schema(example = "John Doe", value_type = String)]
    pub full_name: Option<String>,
    #[schema(example = "John.Doe@Company.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Engineering", value_type = String)]
    pub department: Option<String>,
}

/// Normalized and validated employee, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}
