//! Employee directory use-case service.
//!
//! # Responsibility
//! - Implement create/read/update/delete/search/statistics with validation
//!   and duplicate-phone enforcement on top of a repository.
//! - Convert every lower-layer failure into the outcome envelope; typed
//!   errors never cross to the presentation layer.
//!
//! # Invariants
//! - Phone numbers are unique across persisted records; the check runs
//!   here, not in the storage schema.
//! - Each call is stateless given the current table content.
//! - The duplicate checks are read-then-write with no isolation guarantee;
//!   the system is single-caller by construction.

use crate::model::employee::{Employee, EmployeeId, SearchCriteria, UpdateRequest};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, RepoResult};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

/// Operation-specific success payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Operations that change state without returning data (update, delete).
    None,
    /// Engine-assigned id of a newly created record.
    Created(EmployeeId),
    Record(Employee),
    Records(Vec<Employee>),
    Departments(Vec<String>),
    Stats(DirectoryStats),
}

/// Uniform envelope returned by every service operation.
///
/// Presentation branches on the discriminant and renders `message` plus any
/// payload fields; the failure arm carries no payload by construction, only
/// an error list (empty except for validation failures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { message: String, payload: Payload },
    Failure { message: String, errors: Vec<String> },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    fn success(message: impl Into<String>, payload: Payload) -> Self {
        Self::Success {
            message: message.into(),
            payload,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

/// Directory-wide aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    pub total_employees: i64,
    pub total_departments: usize,
    /// Sorted distinct department names.
    pub departments: Vec<String>,
    /// Member count per department, in deterministic name order.
    pub employees_per_department: BTreeMap<String, i64>,
}

/// Use-case service over a repository implementation.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new employee after validation and a duplicate-phone scan.
    pub fn create(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
        phone_number: &str,
    ) -> Outcome {
        let employee = Employee::new(first_name, last_name, department, phone_number);
        if !employee.is_valid() {
            return Outcome::Failure {
                message: "Validation failed".to_string(),
                errors: employee.validation_errors(),
            };
        }

        let existing = match self.repo.list_all() {
            Ok(employees) => employees,
            Err(err) => return storage_failure("create employee", &err),
        };
        if existing
            .iter()
            .any(|other| other.phone_number == employee.phone_number)
        {
            return Outcome::failure(format!(
                "Employee with phone number {} already exists",
                employee.phone_number
            ));
        }

        match self.repo.insert(
            &employee.first_name,
            &employee.last_name,
            &employee.department,
            &employee.phone_number,
        ) {
            Ok(id) => Outcome::success(
                format!("Employee created successfully with ID: {id}"),
                Payload::Created(id),
            ),
            Err(err) => storage_failure("create employee", &err),
        }
    }

    /// Looks up one employee by id.
    pub fn get(&self, id: EmployeeId) -> Outcome {
        match self.repo.get_by_id(id) {
            Ok(Some(employee)) => Outcome::success(
                "Employee retrieved successfully",
                Payload::Record(employee),
            ),
            Ok(None) => Outcome::failure(not_found_message(id)),
            Err(err) => storage_failure("retrieve employee", &err),
        }
    }

    /// Full listing; an empty directory is not an error.
    pub fn get_all(&self) -> Outcome {
        match self.repo.list_all() {
            Ok(employees) => Outcome::success(
                format!("Retrieved {} employees", employees.len()),
                Payload::Records(employees),
            ),
            Err(err) => storage_failure("retrieve employees", &err),
        }
    }

    /// Resolves search criteria to the matching record set.
    ///
    /// Dispatch: empty criteria lists everything; term plus department
    /// filters the full set in memory; a single criterion delegates to the
    /// matching repository read.
    pub fn search(&self, criteria: &SearchCriteria) -> Outcome {
        let matches = if criteria.is_empty() {
            self.repo.list_all()
        } else if criteria.has_term() && criteria.has_department() {
            self.search_by_term_and_department(criteria)
        } else if criteria.has_term() {
            self.repo.search_by_name(&criteria.search_term)
        } else {
            self.repo.list_by_department(&criteria.department_filter)
        };

        match matches {
            Ok(employees) => Outcome::success(
                format!("Found {} matching employees", employees.len()),
                Payload::Records(employees),
            ),
            Err(err) => storage_failure("search employees", &err),
        }
    }

    /// Applies a partial update after existence, non-empty-request, and
    /// duplicate-phone checks.
    pub fn update(&self, id: EmployeeId, request: &UpdateRequest) -> Outcome {
        match self.repo.get_by_id(id) {
            Ok(Some(_)) => {}
            Ok(None) => return Outcome::failure(not_found_message(id)),
            Err(err) => return storage_failure("update employee", &err),
        }

        if !request.has_updates() {
            return Outcome::failure("No fields provided for update");
        }

        if let Some(phone_number) = request.phone_number.as_ref() {
            let all = match self.repo.list_all() {
                Ok(employees) => employees,
                Err(err) => return storage_failure("update employee", &err),
            };
            if all
                .iter()
                .any(|other| other.id != Some(id) && other.phone_number == *phone_number)
            {
                return Outcome::failure(format!(
                    "Phone number {phone_number} is already in use by another employee"
                ));
            }
        }

        match self.repo.update(id, request) {
            Ok(true) => Outcome::success(
                format!("Employee {id} updated successfully"),
                Payload::None,
            ),
            // Unreachable under correct sequencing: the existence and
            // non-empty checks above already passed. Reported, not fatal.
            Ok(false) => {
                warn!("event=employee_update module=service status=anomaly id={id} detail=no_rows_matched");
                Outcome::failure(format!("Failed to update employee {id}"))
            }
            Err(err) => storage_failure("update employee", &err),
        }
    }

    /// Removes one employee by id.
    pub fn delete(&self, id: EmployeeId) -> Outcome {
        match self.repo.get_by_id(id) {
            Ok(Some(_)) => {}
            Ok(None) => return Outcome::failure(not_found_message(id)),
            Err(err) => return storage_failure("delete employee", &err),
        }

        match self.repo.delete(id) {
            Ok(true) => Outcome::success(
                format!("Employee {id} deleted successfully"),
                Payload::None,
            ),
            Ok(false) => Outcome::failure(format!("Failed to delete employee {id}")),
            Err(err) => storage_failure("delete employee", &err),
        }
    }

    /// Directory-wide aggregates, computed by re-querying per department.
    /// Acceptable at this scale; not a performance-sensitive path.
    pub fn statistics(&self) -> Outcome {
        match self.collect_statistics() {
            Ok(stats) => Outcome::success("Retrieved employee statistics", Payload::Stats(stats)),
            Err(err) => storage_failure("get statistics", &err),
        }
    }

    /// Distinct department list passthrough.
    pub fn departments(&self) -> Outcome {
        match self.repo.distinct_departments() {
            Ok(departments) => Outcome::success(
                format!("Retrieved {} departments", departments.len()),
                Payload::Departments(departments),
            ),
            Err(err) => storage_failure("get departments", &err),
        }
    }

    fn search_by_term_and_department(&self, criteria: &SearchCriteria) -> RepoResult<Vec<Employee>> {
        let term = criteria.search_term.to_lowercase();
        let employees = self
            .repo
            .list_all()?
            .into_iter()
            .filter(|employee| {
                (employee.first_name.to_lowercase().contains(&term)
                    || employee.last_name.to_lowercase().contains(&term))
                    && employee.department == criteria.department_filter
            })
            .collect();
        Ok(employees)
    }

    fn collect_statistics(&self) -> RepoResult<DirectoryStats> {
        let total_employees = self.repo.count()?;
        let departments = self.repo.distinct_departments()?;

        let mut employees_per_department = BTreeMap::new();
        for department in &departments {
            let members = self.repo.list_by_department(department)?;
            employees_per_department.insert(department.clone(), members.len() as i64);
        }

        Ok(DirectoryStats {
            total_employees,
            total_departments: departments.len(),
            departments,
            employees_per_department,
        })
    }
}

fn not_found_message(id: EmployeeId) -> String {
    format!("Employee with ID {id} not found")
}

fn storage_failure(operation: &str, err: &RepoError) -> Outcome {
    Outcome::failure(format!("Failed to {operation}: {err}"))
}
