//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record shape.
//! - Normalize string fields and report required-field violations.
//!
//! # Invariants
//! - String fields are whitespace-trimmed on every assignment; empty string
//!   is the "unset" sentinel, never `None`.
//! - `id` stays `None` until the record is persisted and is immutable after.
//! - A record is valid iff all four string fields are non-empty.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the storage engine on insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EmployeeId = i64;

/// Canonical employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// `None` until the record is persisted.
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    /// Stored under the legacy `phNumber` column; see the repo row mapping.
    pub phone_number: String,
}

impl Employee {
    /// Creates a transient (unpersisted) record with trimmed fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self::with_id_opt(None, first_name, last_name, department, phone_number)
    }

    /// Reconstructs a persisted record from its stored identity and fields.
    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self::with_id_opt(Some(id), first_name, last_name, department, phone_number)
    }

    fn with_id_opt(
        id: Option<EmployeeId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: clean(first_name),
            last_name: clean(last_name),
            department: clean(department),
            phone_number: clean(phone_number),
        }
    }

    /// Full name in `First Last` format, trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Returns whether all required fields are present.
    pub fn is_valid(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && !self.department.is_empty()
            && !self.phone_number.is_empty()
    }

    /// One message per missing required field, in fixed order: first name,
    /// last name, department, phone.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.first_name.is_empty() {
            errors.push("First name is required".to_string());
        }
        if self.last_name.is_empty() {
            errors.push("Last name is required".to_string());
        }
        if self.department.is_empty() {
            errors.push("Department is required".to_string());
        }
        if self.phone_number.is_empty() {
            errors.push("Phone number is required".to_string());
        }

        errors
    }
}

/// Search parameters for the directory.
///
/// Empty strings mean "no filter"; both filters unset means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring matched against first or last name.
    pub search_term: String,
    /// Exact department match.
    pub department_filter: String,
}

impl SearchCriteria {
    pub fn new(search_term: impl Into<String>, department_filter: impl Into<String>) -> Self {
        Self {
            search_term: clean(search_term),
            department_filter: clean(department_filter),
        }
    }

    pub fn has_term(&self) -> bool {
        !self.search_term.is_empty()
    }

    pub fn has_department(&self) -> bool {
        !self.department_filter.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_term() && !self.has_department()
    }
}

/// Partial-update request consumed once by the service layer.
///
/// Each field is either absent (untouched) or a trimmed non-empty
/// replacement. Empty or whitespace-only caller input normalizes to absent,
/// so "set to empty" cannot be requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateRequest {
    pub fn new(
        first_name: Option<&str>,
        last_name: Option<&str>,
        department: Option<&str>,
        phone_number: Option<&str>,
    ) -> Self {
        Self {
            first_name: normalize_field(first_name),
            last_name: normalize_field(last_name),
            department: normalize_field(department),
            phone_number: normalize_field(phone_number),
        }
    }

    /// Returns whether at least one field is present.
    pub fn has_updates(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.department.is_some()
            || self.phone_number.is_some()
    }
}

fn clean(value: impl Into<String>) -> String {
    value.into().trim().to_string()
}

fn normalize_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{Employee, SearchCriteria, UpdateRequest};

    #[test]
    fn new_trims_every_field() {
        let employee = Employee::new("  Ada ", "Lovelace  ", " Engineering ", " 555-0199 ");

        assert_eq!(employee.id, None);
        assert_eq!(employee.first_name, "Ada");
        assert_eq!(employee.last_name, "Lovelace");
        assert_eq!(employee.department, "Engineering");
        assert_eq!(employee.phone_number, "555-0199");
    }

    #[test]
    fn full_name_joins_and_trims() {
        let employee = Employee::new("Ada", "Lovelace", "Engineering", "555-0199");
        assert_eq!(employee.full_name(), "Ada Lovelace");

        let first_only = Employee::new("Ada", "", "Engineering", "555-0199");
        assert_eq!(first_only.full_name(), "Ada");
    }

    #[test]
    fn validation_errors_keep_fixed_order() {
        let employee = Employee::new("", "  ", "Engineering", "");

        assert!(!employee.is_valid());
        assert_eq!(
            employee.validation_errors(),
            vec![
                "First name is required".to_string(),
                "Last name is required".to_string(),
                "Phone number is required".to_string(),
            ]
        );
    }

    #[test]
    fn complete_record_is_valid() {
        let employee = Employee::new("Ada", "Lovelace", "Engineering", "555-0199");

        assert!(employee.is_valid());
        assert!(employee.validation_errors().is_empty());
    }

    #[test]
    fn criteria_predicates_follow_trimmed_content() {
        assert!(SearchCriteria::new("  ", " ").is_empty());

        let by_term = SearchCriteria::new(" an ", "");
        assert!(by_term.has_term());
        assert!(!by_term.has_department());
        assert_eq!(by_term.search_term, "an");

        let by_both = SearchCriteria::new("an", "Engineering");
        assert!(by_both.has_term());
        assert!(by_both.has_department());
        assert!(!by_both.is_empty());
    }

    #[test]
    fn update_request_normalizes_blank_input_to_absent() {
        let request = UpdateRequest::new(Some(""), Some("   "), Some(" Sales "), None);

        assert_eq!(request.first_name, None);
        assert_eq!(request.last_name, None);
        assert_eq!(request.department.as_deref(), Some("Sales"));
        assert_eq!(request.phone_number, None);
        assert!(request.has_updates());
    }

    #[test]
    fn empty_update_request_has_no_updates() {
        assert!(!UpdateRequest::default().has_updates());
        assert!(!UpdateRequest::new(Some(" "), None, Some(""), None).has_updates());
    }
}
