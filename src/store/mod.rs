//! Persistence seam for employees and attendance.
//!
//! Services only see the [`EmployeeStore`] and [`AttendanceStore`] traits;
//! MySQL and in-memory backends implement them.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockall::automock;
use strum_macros::Display;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    attendance::{AttendanceFilter, AttendanceRecord, NewAttendance},
    dashboard::DepartmentCount,
    employee::{Employee, NewEmployee},
};

pub mod memory;
pub mod mysql;

pub use memory::{InMemoryAttendanceStore, InMemoryEmployeeStore};
pub use mysql::{MySqlAttendanceStore, MySqlEmployeeStore};

/// Unique constraint that a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UniqueKey {
    #[strum(serialize = "employeeId")]
    EmployeeId,
    #[strum(serialize = "email")]
    Email,
    #[strum(serialize = "employeeId+date")]
    AttendanceDay,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique key `{0}`")]
    Duplicate(UniqueKey),

    #[error("storage error")]
    Sql(#[source] sqlx::Error),

    #[error("stored row could not be decoded: {0}")]
    Corrupt(String),

    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Classifies a sqlx failure, attributing unique violations to the key
    /// named by `key_for` (which receives the backend error message).
    pub(crate) fn from_sqlx(error: sqlx::Error, key_for: impl FnOnce(&str) -> UniqueKey) -> Self {
        let key = error
            .as_database_error()
            .filter(|db| db.is_unique_violation())
            .map(|db| key_for(db.message()));

        match key {
            Some(key) => Self::Duplicate(key),
            None => Self::Sql(error),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}

/// Timestamps are kept at millisecond precision so a record returned from a
/// write equals the same record read back from MySQL.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn new_id() -> Uuid {
    Uuid::new_v4()
}

#[automock]
#[async_trait]
pub trait EmployeeStore: std::fmt::Debug + Send + Sync {
    /// All employees, most recently created first.
    async fn find_all(&self) -> Result<Vec<Employee>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;

    /// Lookup by natural key, exact match.
    async fn find_by_employee_id(&self, employee_id: &str)
    -> Result<Option<Employee>, StoreError>;

    /// First employee matching either natural key.
    async fn find_by_employee_id_or_email(
        &self,
        employee_id: &str,
        email: &str,
    ) -> Result<Option<Employee>, StoreError>;

    /// Persists a new employee. Fails with [`StoreError::Duplicate`] when
    /// either unique key is taken.
    async fn create(&self, employee: NewEmployee) -> Result<Employee, StoreError>;

    /// Returns the number of rows removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Head count per department, largest first, ties by name.
    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, StoreError>;
}

#[automock]
#[async_trait]
pub trait AttendanceStore: std::fmt::Debug + Send + Sync {
    /// Records matching `filter`, ascending by date.
    async fn find(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_one(
        &self,
        employee_id: &str,
        date: chrono::NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Persists a new mark. Fails with [`StoreError::Duplicate`] when the
    /// employee already has a mark for that date.
    async fn create(&self, record: NewAttendance) -> Result<AttendanceRecord, StoreError>;

    /// Removes every record of `employee_id`, returning how many went.
    async fn delete_by_employee(&self, employee_id: &str) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
