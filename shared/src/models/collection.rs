//! Data collection model.
//!
//! A collection is one set of readings taken by an employee on a piece of
//! equipment: the fixed readings, plus values for the custom fields that
//! equipment declares.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::equipment::Equipment;
use super::metric::MetricKey;

/// The fixed readings every collection carries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    /// Vibration level.
    pub vibration: f64,
    /// Temperature in °C.
    pub temperature: f64,
    /// Pressure in bar.
    pub pressure: f64,
}

/// A recorded data collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCollection {
    /// Unique identifier.
    pub id: String,

    /// The measured equipment.
    pub equipment_id: String,

    /// The employee who took the readings.
    pub employee_id: String,

    /// When the readings were taken.
    pub date: DateTime<Utc>,

    /// Fixed readings.
    pub measurements: Measurements,

    /// Free-form observations.
    #[serde(default)]
    pub notes: String,

    /// Optional photo as a `data:image/...;base64,` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Values for the equipment's custom fields, by field name.
    #[serde(default)]
    pub custom_values: BTreeMap<String, f64>,
}

/// Input for recording or updating a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDraft {
    /// The measured equipment.
    pub equipment_id: String,
    /// The employee who took the readings.
    pub employee_id: String,
    /// When the readings were taken; defaults to now.
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    /// Fixed readings.
    #[serde(default)]
    pub measurements: Measurements,
    /// Free-form observations.
    #[serde(default)]
    pub notes: String,
    /// Optional photo data URL.
    #[serde(default)]
    pub photo: Option<String>,
    /// Custom field values.
    #[serde(default)]
    pub custom_values: BTreeMap<String, f64>,
}

impl CollectionDraft {
    /// Creates a draft timestamped now with zeroed readings.
    #[must_use]
    pub fn new(equipment_id: impl Into<String>, employee_id: impl Into<String>) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            employee_id: employee_id.into(),
            date: Utc::now(),
            measurements: Measurements::default(),
            notes: String::new(),
            photo: None,
            custom_values: BTreeMap::new(),
        }
    }

    /// Sets the collection date.
    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Sets the fixed readings.
    #[must_use]
    pub fn with_measurements(mut self, vibration: f64, temperature: f64, pressure: f64) -> Self {
        self.measurements = Measurements {
            vibration,
            temperature,
            pressure,
        };
        self
    }

    /// Sets a custom field value.
    #[must_use]
    pub fn with_custom_value(mut self, field: impl Into<String>, value: f64) -> Self {
        self.custom_values.insert(field.into(), value);
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Attaches a photo data URL.
    #[must_use]
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

/// Display names resolved for a collection.
///
/// Used by listings and reports; a reference that no longer resolves shows
/// a placeholder name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionView {
    /// The collection itself.
    #[serde(flatten)]
    pub collection: DataCollection,
    /// Name of the employee who recorded it.
    pub employee_name: String,
    /// Name of the unit owning the equipment.
    pub unit_name: String,
    /// Name of the equipment.
    pub equipment_name: String,
}

/// Placeholder for an employee that no longer exists.
pub const UNKNOWN_EMPLOYEE: &str = "Desconhecido";
/// Placeholder for a unit that no longer exists.
pub const UNKNOWN_UNIT: &str = "Unidade Desconhecida";
/// Placeholder for equipment that no longer exists.
pub const UNKNOWN_EQUIPMENT: &str = "Equipamento Desconhecido";

/// Errors that can occur during collection validation.
#[derive(Debug, Error)]
pub enum CollectionValidationError {
    /// The collection was checked against a different equipment.
    #[error("Collection belongs to equipment '{expected}', not '{actual}'")]
    EquipmentMismatch {
        /// Equipment the collection references.
        expected: String,
        /// Equipment it was validated against.
        actual: String,
    },

    /// A custom value is not declared on the equipment.
    #[error("Field '{0}' is not declared on this equipment")]
    UndeclaredField(String),

    /// A reading is NaN or infinite.
    #[error("Reading '{0}' is not a finite number")]
    NonFiniteReading(String),

    /// The photo is not a base64 image data URL.
    #[error("Photo must be a base64 encoded image data URL")]
    InvalidPhoto,
}

impl DataCollection {
    /// Builds a collection from a draft.
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: CollectionDraft) -> Self {
        Self {
            id: id.into(),
            equipment_id: draft.equipment_id,
            employee_id: draft.employee_id,
            date: draft.date,
            measurements: draft.measurements,
            notes: draft.notes.trim().to_string(),
            photo: draft.photo.filter(|p| !p.is_empty()),
            custom_values: draft.custom_values,
        }
    }

    /// Reads the value of the given metric, if this collection has one.
    #[must_use]
    pub fn metric_value(&self, key: &MetricKey) -> Option<f64> {
        match key {
            MetricKey::Vibration => Some(self.measurements.vibration),
            MetricKey::Temperature => Some(self.measurements.temperature),
            MetricKey::Pressure => Some(self.measurements.pressure),
            MetricKey::Custom(name) => self.custom_values.get(name).copied(),
        }
    }

    /// Validates the collection against the equipment it was recorded for.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The equipment is not the one the collection references
    /// - A custom value is not declared on the equipment
    /// - A reading is not finite
    /// - The photo is not a decodable image data URL
    pub fn validate_against(&self, equipment: &Equipment) -> Result<(), CollectionValidationError> {
        if self.equipment_id != equipment.id {
            return Err(CollectionValidationError::EquipmentMismatch {
                expected: self.equipment_id.clone(),
                actual: equipment.id.clone(),
            });
        }

        let fixed = [
            ("vibration", self.measurements.vibration),
            ("temperature", self.measurements.temperature),
            ("pressure", self.measurements.pressure),
        ];
        for (name, value) in fixed {
            if !value.is_finite() {
                return Err(CollectionValidationError::NonFiniteReading(name.to_string()));
            }
        }

        for (name, value) in &self.custom_values {
            if equipment.custom_field(name).is_none() {
                return Err(CollectionValidationError::UndeclaredField(name.clone()));
            }
            if !value.is_finite() {
                return Err(CollectionValidationError::NonFiniteReading(name.clone()));
            }
        }

        if let Some(ref photo) = self.photo {
            validate_photo(photo)?;
        }

        Ok(())
    }
}

fn validate_photo(photo: &str) -> Result<(), CollectionValidationError> {
    let payload = photo
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or(CollectionValidationError::InvalidPhoto)?;

    STANDARD
        .decode(payload)
        .map_err(|_| CollectionValidationError::InvalidPhoto)?;
    Ok(())
}
