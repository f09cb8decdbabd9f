//! Process-local stores. Used by the test suite and when no `DATABASE_URL`
//! is configured; contents are lost on restart.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{AttendanceStore, EmployeeStore, StoreError, UniqueKey, new_id, now};
use crate::model::{
    attendance::{AttendanceFilter, AttendanceRecord, NewAttendance},
    dashboard::DepartmentCount,
    employee::{Employee, NewEmployee},
};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| StoreError::Poisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| StoreError::Poisoned)
}

/// Employees kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    rows: RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(read(&self.rows)?.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        Ok(read(&self.rows)?.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<Employee>, StoreError> {
        Ok(read(&self.rows)?
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn find_by_employee_id_or_email(
        &self,
        employee_id: &str,
        email: &str,
    ) -> Result<Option<Employee>, StoreError> {
        Ok(read(&self.rows)?
            .iter()
            .find(|e| e.employee_id == employee_id || e.email == email)
            .cloned())
    }

    async fn create(&self, employee: NewEmployee) -> Result<Employee, StoreError> {
        let mut rows = write(&self.rows)?;

        if rows.iter().any(|e| e.employee_id == employee.employee_id) {
            return Err(StoreError::Duplicate(UniqueKey::EmployeeId));
        }
        if rows.iter().any(|e| e.email == employee.email) {
            return Err(StoreError::Duplicate(UniqueKey::Email));
        }

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
        rows.push(record.clone());

        Ok(record)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|e| e.id != id);

        Ok((before - rows.len()) as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, StoreError> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for employee in read(&self.rows)?.iter() {
            *counts.entry(employee.department.clone()).or_default() += 1;
        }

        let mut departments: Vec<DepartmentCount> = counts
            .into_iter()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect();
        // BTreeMap already yields names ascending; a stable sort keeps that
        // order among equal counts.
        departments.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(departments)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAttendanceStore {
    rows: RwLock<Vec<AttendanceRecord>>,
}

impl InMemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for InMemoryAttendanceStore {
    async fn find(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<AttendanceRecord> = read(&self.rows)?
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        Ok(records)
    }

    async fn find_one(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(read(&self.rows)?
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn create(&self, record: NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let mut rows = write(&self.rows)?;

        if rows
            .iter()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            return Err(StoreError::Duplicate(UniqueKey::AttendanceDay));
        }

        let created_at = now();
        let record = AttendanceRecord {
            id: new_id(),
            employee_id: record.employee_id,
            date: record.date,
            status: record.status,
            created_at,
            updated_at: created_at,
        };
        rows.push(record.clone());

        Ok(record)
    }

    async fn delete_by_employee(&self, employee_id: &str) -> Result<u64, StoreError> {
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|r| r.employee_id != employee_id);

        Ok((before - rows.len()) as u64)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
