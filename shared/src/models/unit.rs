//! Organizational unit model.
//!
//! A unit groups equipment (e.g. "Bloco A", "Linha de Produção 1").

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// An organizational unit that owns equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Unit {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    #[validate(length(min = 1, message = "Unit name cannot be empty"))]
    pub name: String,
}

/// Errors that can occur during unit validation.
#[derive(Debug, Error)]
pub enum UnitValidationError {
    /// The unit name is empty or only whitespace.
    #[error("Unit name cannot be empty")]
    EmptyName,

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl Unit {
    /// Creates a unit, trimming the name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.trim().to_string(),
        }
    }

    /// Validates the unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn validate_unit(&self) -> Result<(), UnitValidationError> {
        if self.name.trim().is_empty() {
            return Err(UnitValidationError::EmptyName);
        }
        self.validate()?;
        Ok(())
    }
}
