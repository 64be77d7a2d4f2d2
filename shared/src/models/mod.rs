//! Data models for the Predimaint maintenance registry.
//!
//! This module contains the core data structures for units, equipment,
//! employees and the data collections recorded against equipment.

pub mod collection;
pub mod employee;
pub mod equipment;
pub mod metric;
pub mod unit;

pub use collection::{
    CollectionDraft, CollectionValidationError, CollectionView, DataCollection, Measurements,
    UNKNOWN_EMPLOYEE, UNKNOWN_EQUIPMENT, UNKNOWN_UNIT,
};
pub use employee::{Employee, EmployeeDraft, EmployeeValidationError};
pub use equipment::{
    Criticality, CustomField, Equipment, EquipmentDraft, EquipmentTemplate,
    EquipmentValidationError, RESERVED_FIELD_NAMES,
};
pub use metric::{available_metrics, MetricDescriptor, MetricKey};
pub use unit::{Unit, UnitValidationError};
