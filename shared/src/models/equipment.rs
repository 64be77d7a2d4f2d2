//! Equipment data model.
//!
//! Equipment belongs to a [`Unit`](super::Unit) and declares the custom
//! measurement fields that collections for it may carry, next to the three
//! fixed readings (vibration, temperature, pressure).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use validator::Validate;

/// Keys of the fixed readings; custom fields may not reuse them.
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["vibration", "temperature", "pressure"];

/// Maintenance priority of a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Criticality {
    /// Failure stops production.
    High,
    /// Failure degrades production.
    #[default]
    Medium,
    /// Failure has little impact.
    Low,
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// A measurement field declared on one piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomField {
    /// Field name, also the key used in collection values.
    #[validate(length(min = 1, message = "Custom field name cannot be empty"))]
    pub name: String,

    /// Unit of measure (may be empty).
    #[serde(default)]
    pub unit: String,
}

impl CustomField {
    /// Creates a custom field, trimming both name and unit.
    #[must_use]
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            unit: unit.trim().to_string(),
        }
    }
}

/// A built-in equipment type that prefills custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentTemplate {
    /// The equipment type name.
    pub equipment_type: &'static str,
    /// `(name, unit)` pairs for the prefilled fields.
    pub fields: &'static [(&'static str, &'static str)],
}

impl EquipmentTemplate {
    /// Returns the built-in templates.
    #[must_use]
    pub fn all() -> &'static [EquipmentTemplate] {
        &TEMPLATES
    }

    /// Looks up the template for an equipment type.
    #[must_use]
    pub fn for_type(equipment_type: &str) -> Option<&'static EquipmentTemplate> {
        TEMPLATES
            .iter()
            .find(|t| t.equipment_type == equipment_type)
    }

    /// Returns the template fields as owned [`CustomField`]s.
    #[must_use]
    pub fn custom_fields(&self) -> Vec<CustomField> {
        self.fields
            .iter()
            .map(|(name, unit)| CustomField::new(name, unit))
            .collect()
    }
}

static TEMPLATES: [EquipmentTemplate; 3] = [
    EquipmentTemplate {
        equipment_type: "Motor Elétrico",
        fields: &[("Corrente", "A"), ("Tensão", "V"), ("Rotação", "RPM")],
    },
    EquipmentTemplate {
        equipment_type: "Bomba Centrífuga",
        fields: &[
            ("Vazão", "m³/h"),
            ("Pressão de Sucção", "bar"),
            ("Pressão de Descarga", "bar"),
        ],
    },
    EquipmentTemplate {
        equipment_type: "Painel Elétrico",
        fields: &[
            ("Tensão de Entrada", "V"),
            ("Tensão de Saída", "V"),
            ("Temperatura Interna", "°C"),
        ],
    },
];

/// A monitored piece of equipment.
///
/// # Example
///
/// ```
/// use shared::models::{Criticality, Equipment, EquipmentDraft};
///
/// let draft = EquipmentDraft::new("Motor 01", "Motor Elétrico", "SN-001")
///     .with_criticality(Criticality::High);
/// let equipment = Equipment::from_draft("eq-1", "unit-1", draft);
///
/// assert_eq!(equipment.custom_fields.len(), 3);
/// assert!(equipment.validate_equipment().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Equipment {
    /// Unique identifier.
    pub id: String,

    /// The owning unit.
    pub unit_id: String,

    /// Display name.
    #[validate(length(min = 1, message = "Equipment name cannot be empty"))]
    pub name: String,

    /// Equipment type, e.g. "Motor Elétrico".
    #[validate(length(min = 1, message = "Equipment type cannot be empty"))]
    pub equipment_type: String,

    /// Manufacturer serial number.
    #[validate(length(min = 1, message = "Serial number cannot be empty"))]
    pub serial_number: String,

    /// Optional model designation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Optional manufacturer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Optional installation date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,

    /// Maintenance priority.
    #[serde(default)]
    pub criticality: Criticality,

    /// Declared custom measurement fields.
    #[serde(default)]
    #[validate(nested)]
    pub custom_fields: Vec<CustomField>,
}

/// Input for registering a new piece of equipment.
///
/// When `custom_fields` is `None` the fields of the matching
/// [`EquipmentTemplate`] are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDraft {
    /// Display name.
    pub name: String,
    /// Equipment type.
    pub equipment_type: String,
    /// Serial number.
    pub serial_number: String,
    /// Optional model.
    #[serde(default)]
    pub model: Option<String>,
    /// Optional manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Optional installation date.
    #[serde(default)]
    pub installation_date: Option<NaiveDate>,
    /// Maintenance priority.
    #[serde(default)]
    pub criticality: Criticality,
    /// Explicit custom fields.
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomField>>,
}

impl EquipmentDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        equipment_type: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            equipment_type: equipment_type.into(),
            serial_number: serial_number.into(),
            ..Self::default()
        }
    }

    /// Sets the criticality.
    #[must_use]
    pub fn with_criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = criticality;
        self
    }

    /// Adds an explicit custom field, replacing any template fields.
    #[must_use]
    pub fn with_custom_field(mut self, name: &str, unit: &str) -> Self {
        self.custom_fields
            .get_or_insert_with(Vec::new)
            .push(CustomField::new(name, unit));
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Sets the installation date.
    #[must_use]
    pub fn with_installation_date(mut self, date: NaiveDate) -> Self {
        self.installation_date = Some(date);
        self
    }
}

/// Errors that can occur during equipment validation.
#[derive(Debug, Error)]
pub enum EquipmentValidationError {
    /// A custom field has a blank name.
    #[error("Custom field name cannot be empty")]
    EmptyFieldName,

    /// A custom field name appears twice.
    #[error("Duplicate custom field: '{0}'")]
    DuplicateField(String),

    /// A custom field reuses a fixed reading key.
    #[error("Custom field '{0}' clashes with a fixed reading")]
    ReservedField(String),

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Equipment {
    /// Builds equipment from a draft, applying the type template when the
    /// draft declares no custom fields.
    #[must_use]
    pub fn from_draft(id: impl Into<String>, unit_id: impl Into<String>, draft: EquipmentDraft) -> Self {
        let custom_fields = draft
            .custom_fields
            .unwrap_or_else(|| {
                EquipmentTemplate::for_type(draft.equipment_type.trim())
                    .map(EquipmentTemplate::custom_fields)
                    .unwrap_or_default()
            })
            .iter()
            .map(|f| CustomField::new(&f.name, &f.unit))
            .collect();

        Self {
            id: id.into(),
            unit_id: unit_id.into(),
            name: draft.name.trim().to_string(),
            equipment_type: draft.equipment_type.trim().to_string(),
            serial_number: draft.serial_number.trim().to_string(),
            model: non_blank(draft.model),
            manufacturer: non_blank(draft.manufacturer),
            installation_date: draft.installation_date,
            criticality: draft.criticality,
            custom_fields,
        }
    }

    /// Returns the declared field with the given name.
    #[must_use]
    pub fn custom_field(&self, name: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.name == name)
    }

    /// Validates the equipment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required text field is empty
    /// - A custom field name is blank, duplicated or reserved
    pub fn validate_equipment(&self) -> Result<(), EquipmentValidationError> {
        let mut seen = HashSet::new();
        for field in &self.custom_fields {
            let name = field.name.trim();
            if name.is_empty() {
                return Err(EquipmentValidationError::EmptyFieldName);
            }
            if RESERVED_FIELD_NAMES.contains(&name) {
                return Err(EquipmentValidationError::ReservedField(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(EquipmentValidationError::DuplicateField(name.to_string()));
            }
        }

        self.validate()?;
        Ok(())
    }
}
