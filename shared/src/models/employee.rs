//! Employee data model.
//!
//! Employees are the technicians who record collections. They are identified
//! by their badge number (`employee_id`) and e-mail, both unique.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// A registered employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Employee {
    /// Unique identifier.
    pub id: String,

    /// Full name.
    #[validate(length(min = 1, message = "Employee name cannot be empty"))]
    pub name: String,

    /// Job role.
    #[validate(length(min = 1, message = "Employee role cannot be empty"))]
    pub role: String,

    /// Badge (registration) number.
    #[validate(length(min = 1, message = "Badge number cannot be empty"))]
    pub employee_id: String,

    /// Contact e-mail.
    #[validate(email(message = "Invalid e-mail address"))]
    pub email: String,

    /// Whether the employee administers the registry.
    #[serde(default)]
    pub is_admin: bool,
}

/// Input for registering a new employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    /// Full name.
    pub name: String,
    /// Job role.
    pub role: String,
    /// Badge number.
    pub employee_id: String,
    /// Contact e-mail.
    pub email: String,
    /// Administrator flag.
    #[serde(default)]
    pub is_admin: bool,
}

impl EmployeeDraft {
    /// Creates a draft for a regular (non-admin) employee.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        employee_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            employee_id: employee_id.into(),
            email: email.into(),
            is_admin: false,
        }
    }

    /// Marks the employee as an administrator.
    #[must_use]
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// Errors that can occur during employee validation.
#[derive(Debug, Error)]
pub enum EmployeeValidationError {
    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl Employee {
    /// Builds an employee from a draft, trimming text fields.
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: EmployeeDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name.trim().to_string(),
            role: draft.role.trim().to_string(),
            employee_id: draft.employee_id.trim().to_string(),
            email: draft.email.trim().to_string(),
            is_admin: draft.is_admin,
        }
    }

    /// Returns true if `email` matches this employee's address, ignoring case
    /// and surrounding whitespace.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Validates the employee.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is empty or the e-mail is malformed.
    pub fn validate_employee(&self) -> Result<(), EmployeeValidationError> {
        self.validate()?;
        Ok(())
    }
}
