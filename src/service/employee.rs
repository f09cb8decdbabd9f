use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use super::duplicate;
use crate::{
    errors::ApiError,
    model::employee::{CreateEmployee, Employee, NewEmployee},
    store::{AttendanceStore, EmployeeStore, StoreError, UniqueKey},
};

const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

#[derive(Debug, Clone)]
pub struct EmployeeService {
    employees: Arc<dyn EmployeeStore>,
    attendance: Arc<dyn AttendanceStore>,
}

impl EmployeeService {
    pub fn new(employees: Arc<dyn EmployeeStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self {
            employees,
            attendance,
        }
    }

    /// Every employee, most recently created first.
    pub async fn list(&self) -> Result<Vec<Employee>, ApiError> {
        self.employees
            .find_all()
            .await
            .map_err(ApiError::internal("Error fetching employees"))
    }

    pub async fn create(&self, input: CreateEmployee) -> Result<Employee, ApiError> {
        let employee = normalize(input)?;

        let existing = self
            .employees
            .find_by_employee_id_or_email(&employee.employee_id, &employee.email)
            .await
            .map_err(ApiError::internal("Error creating employee"))?;

        if let Some(existing) = existing {
            let key = if existing.employee_id == employee.employee_id {
                UniqueKey::EmployeeId
            } else {
                UniqueKey::Email
            };
            debug!(employee_id = %employee.employee_id, %key, "Rejected duplicate employee");
            return Err(duplicate(key));
        }

        match self.employees.create(employee).await {
            Ok(created) => {
                info!(id = %created.id, employee_id = %created.employee_id, "Employee created");
                Ok(created)
            }
            // Lost a race with a concurrent create between the check and the insert.
            Err(StoreError::Duplicate(key)) => Err(duplicate(key)),
            Err(e) => Err(ApiError::internal("Error creating employee")(e)),
        }
    }

    /// Deletes the employee with store id `id` along with all of its
    /// attendance. Unparsable ids are treated as unknown.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Err(ApiError::not_found(EMPLOYEE_NOT_FOUND));
        };

        let employee = self
            .employees
            .find_by_id(id)
            .await
            .map_err(ApiError::internal("Error deleting employee"))?
            .ok_or_else(|| ApiError::not_found(EMPLOYEE_NOT_FOUND))?;

        let removed = self
            .attendance
            .delete_by_employee(&employee.employee_id)
            .await
            .map_err(ApiError::internal("Error deleting employee"))?;

        let deleted = self
            .employees
            .delete_by_id(id)
            .await
            .map_err(ApiError::internal("Error deleting employee"))?;

        if deleted == 0 {
            warn!(%id, removed, "Employee vanished after attendance cascade");
            return Err(ApiError::internal("Error deleting employee")(
                StoreError::Inconsistent(format!(
                    "employee {id} was not deleted after removing {removed} attendance records"
                )),
            ));
        }

        info!(%id, employee_id = %employee.employee_id, removed, "Employee deleted");
        Ok(())
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::validation(message)),
    }
}

/// Trims every field, upper-cases the employee id and lower-cases the email,
/// then validates the result.
pub(crate) fn normalize(input: CreateEmployee) -> Result<NewEmployee, ApiError> {
    let employee_id = required(input.employee_id, "Employee ID is required")?.to_uppercase();

    let full_name = required(input.full_name, "Full name is required")?;
    if full_name.chars().count() < 2 {
        return Err(ApiError::validation(
            "Name must be at least 2 characters long",
        ));
    }

    let email = required(input.email, "Email is required")?.to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Please provide a valid email address"));
    }

    let department = required(input.department, "Department is required")?;

    Ok(NewEmployee {
        employee_id,
        full_name,
        email,
        department,
    })
}

/// Format check delegated to `validator`, plus a dotted domain so that
/// bare hosts such as `a@localhost` are refused.
fn is_valid_email(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{
        InMemoryAttendanceStore, InMemoryEmployeeStore, MockAttendanceStore, MockEmployeeStore,
    };
    use chrono::Utc;

    fn input(id: &str, name: &str, email: &str, department: &str) -> CreateEmployee {
        CreateEmployee {
            employee_id: Some(id.to_string()),
            full_name: Some(name.to_string()),
            email: Some(email.to_string()),
            department: Some(department.to_string()),
        }
    }

    fn service() -> EmployeeService {
        EmployeeService::new(
            Arc::new(InMemoryEmployeeStore::new()),
            Arc::new(InMemoryAttendanceStore::new()),
        )
    }

    fn message(err: ApiError) -> String {
        err.to_string()
    }

    #[test]
    fn normalize_trims_and_cases_fields() {
        let employee =
            normalize(input("  emp-7 ", " Ada Lovelace ", " Ada@Example.COM ", " R&D ")).unwrap();

        assert_eq!(employee.employee_id, "EMP-7");
        assert_eq!(employee.full_name, "Ada Lovelace");
        assert_eq!(employee.email, "ada@example.com");
        assert_eq!(employee.department, "R&D");
    }

    #[test]
    fn normalize_reports_first_missing_field() {
        let mut missing_email = input("E1", "Ada", "", "Ops");
        missing_email.email = None;

        assert_eq!(
            message(normalize(input("   ", "Ada", "a@b.io", "Ops")).unwrap_err()),
            "Employee ID is required"
        );
        assert_eq!(
            message(normalize(missing_email).unwrap_err()),
            "Email is required"
        );
        assert_eq!(
            message(normalize(input("E1", "Ada", "a@b.io", " ")).unwrap_err()),
            "Department is required"
        );
    }

    #[test]
    fn single_character_name_is_rejected() {
        let err = normalize(input("E1", " A ", "a@b.io", "Ops")).unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(message(err), "Name must be at least 2 characters long");
    }

    #[test]
    fn email_must_be_well_formed_with_a_dotted_domain() {
        for ok in ["a@b.io", "first.last+tag@mail.example.org", "user@müller.de"] {
            assert!(is_valid_email(ok), "{ok} should be accepted");
        }
        for bad in ["plain", "@b.io", "a@b", "a b@c.io", "a@-b.io"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
        assert_eq!(
            message(normalize(input("E1", "Ada", "ada@", "Ops")).unwrap_err()),
            "Please provide a valid email address"
        );
    }

    #[actix_web::test]
    async fn create_stores_normalized_keys() {
        let service = service();

        let created = service
            .create(input("emp-1", "Grace Hopper", "Grace@Navy.MIL", "Ops"))
            .await
            .unwrap();

        assert_eq!(created.employee_id, "EMP-1");
        assert_eq!(created.email, "grace@navy.mil");
        assert_eq!(created.created_at, created.updated_at);
    }

    #[actix_web::test]
    async fn duplicate_employee_id_ignores_case() {
        let service = service();
        service
            .create(input("emp-1", "Grace Hopper", "grace@navy.mil", "Ops"))
            .await
            .unwrap();

        let err = service
            .create(input("EMP-1", "Someone Else", "else@navy.mil", "Ops"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Duplicate(_)));
        assert_eq!(message(err), "Employee ID already exists");
    }

    #[actix_web::test]
    async fn employee_id_collision_wins_over_email() {
        let service = service();
        service
            .create(input("E1", "Grace Hopper", "grace@navy.mil", "Ops"))
            .await
            .unwrap();

        let both = service
            .create(input("e1", "Grace Hopper", "GRACE@navy.mil", "Ops"))
            .await
            .unwrap_err();
        let email_only = service
            .create(input("E2", "Grace Hopper", "GRACE@navy.mil", "Ops"))
            .await
            .unwrap_err();

        assert_eq!(message(both), "Employee ID already exists");
        assert_eq!(message(email_only), "Email already exists");
    }

    #[actix_web::test]
    async fn delete_unknown_or_malformed_id_is_not_found() {
        let service = service();

        let unknown = service.delete(&Uuid::new_v4().to_string()).await.unwrap_err();
        let malformed = service.delete("not-a-uuid").await.unwrap_err();

        assert!(matches!(unknown, ApiError::NotFound(_)));
        assert!(matches!(malformed, ApiError::NotFound(_)));
    }

    #[actix_web::test]
    async fn create_reports_duplicate_lost_to_a_concurrent_insert() {
        let mut employees = MockEmployeeStore::new();
        employees
            .expect_find_by_employee_id_or_email()
            .once()
            .withf(|employee_id, email| employee_id == "E9" && email == "late@corp.io")
            .return_once(|_, _| Ok(None));
        employees
            .expect_create()
            .once()
            .return_once(|_| Err(StoreError::Duplicate(UniqueKey::Email)));
        let service = EmployeeService::new(Arc::new(employees), Arc::new(MockAttendanceStore::new()));

        let err = service
            .create(input("e9", "Late Comer", "Late@corp.io", "Ops"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Duplicate(_)));
        assert_eq!(message(err), "Email already exists");
    }

    #[actix_web::test]
    async fn delete_fails_when_employee_row_vanishes_after_cascade() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let employee = Employee {
            id,
            employee_id: "EMP-1".to_string(),
            full_name: "Grace Hopper".to_string(),
            email: "grace@navy.mil".to_string(),
            department: "Ops".to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut employees = MockEmployeeStore::new();
        employees
            .expect_find_by_id()
            .once()
            .withf(move |got| *got == id)
            .return_once(move |_| Ok(Some(employee)));
        employees
            .expect_delete_by_id()
            .once()
            .return_once(|_| Ok(0));
        let mut attendance = MockAttendanceStore::new();
        attendance
            .expect_delete_by_employee()
            .once()
            .withf(|employee_id| employee_id == "EMP-1")
            .return_once(|_| Ok(3));
        let service = EmployeeService::new(Arc::new(employees), Arc::new(attendance));

        let err = service.delete(&id.to_string()).await.unwrap_err();

        assert!(matches!(
            err,
            ApiError::Internal {
                source: StoreError::Inconsistent(_),
                ..
            }
        ));
        assert_eq!(message(err), "Error deleting employee");
    }
}
