//! MySQL-backed stores (sqlx, runtime-checked queries).

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder, Row, mysql::MySqlRow};
use tracing::debug;
use uuid::Uuid;

use super::{AttendanceStore, EmployeeStore, StoreError, UniqueKey, new_id, now};
use crate::model::{
    attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, NewAttendance},
    dashboard::DepartmentCount,
    employee::{Employee, NewEmployee},
};

pub(crate) const CREATE_EMPLOYEES_SQL: &str = include_str!("sql/create_employees.sql");
pub(crate) const CREATE_ATTENDANCE_SQL: &str = include_str!("sql/create_attendance.sql");

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

fn decode_uuid(row: &MySqlRow, column: &str) -> sqlx::Result<Uuid> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| decode_error(column, e))
}

fn to_count(column: &str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|e| StoreError::Corrupt(format!("{column}: {e}")))
}

/// Unique index names come back in the MySQL duplicate-entry message.
fn employee_key(message: &str) -> UniqueKey {
    if message.contains("uq_employees_email") {
        UniqueKey::Email
    } else {
        UniqueKey::EmployeeId
    }
}

impl<'r> FromRow<'r, MySqlRow> for Employee {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: decode_uuid(row, "id")?,
            employee_id: row.try_get("employee_id")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            department: row.try_get("department")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, MySqlRow> for AttendanceRecord {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            id: decode_uuid(row, "id")?,
            employee_id: row.try_get("employee_id")?,
            date: row.try_get("date")?,
            status: status
                .parse::<AttendanceStatus>()
                .map_err(|e| decode_error("status", e))?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MySqlEmployeeStore {
    pool: MySqlPool,
}

impl MySqlEmployeeStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for MySqlEmployeeStore {
    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_employee_id_or_email(
        &self,
        employee_id: &str,
        email: &str,
    ) -> Result<Option<Employee>, StoreError> {
        // Prefer the employee_id hit so callers report the right collision.
        let row = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE employee_id = ? OR email = ?
            ORDER BY employee_id = ? DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .bind(email)
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, employee: NewEmployee) -> Result<Employee, StoreError> {
        let created_at = now();
        let record = Employee {
            id: new_id(),
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            email: employee.email,
            department: employee.department,
            created_at,
            updated_at: created_at,
        };

        sqlx::query(
            r#"
            INSERT INTO employees
            (id, employee_id, full_name, email, department, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.employee_id)
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(&record.department)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, employee_key))?;

        Ok(record)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        to_count("employees", total)
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT department, COUNT(*) AS total
            FROM employees
            GROUP BY department
            ORDER BY total DESC, department ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(department, total)| -> Result<DepartmentCount, StoreError> {
                Ok(DepartmentCount {
                    count: to_count(&department, total)?,
                    department,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn find(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT * FROM attendance WHERE 1 = 1");

        if let Some(employee_id) = filter.employee_id.as_deref() {
            builder.push(" AND employee_id = ").push_bind(employee_id);
        }
        if let Some(range) = filter.range {
            builder
                .push(" AND date BETWEEN ")
                .push_bind(range.start)
                .push(" AND ")
                .push_bind(range.end);
        }
        builder.push(" ORDER BY date ASC, employee_id ASC");

        debug!(sql = %builder.sql(), ?filter, "Fetching attendance");

        let rows = builder
            .build_query_as::<AttendanceRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_one(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, record: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let created_at = now();
        let record = AttendanceRecord {
            id: new_id(),
            employee_id: record.employee_id,
            date: record.date,
            status: record.status,
            created_at,
            updated_at: created_at,
        };

        sqlx::query(
            r#"
            INSERT INTO attendance
            (id, employee_id, date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.employee_id)
        .bind(record.date)
        .bind(record.status.to_string())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(e, |_| UniqueKey::AttendanceDay))?;

        Ok(record)
    }

    async fn delete_by_employee(&self, employee_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
            .fetch_one(&self.pool)
            .await?;

        to_count("attendance", total)
    }
}
