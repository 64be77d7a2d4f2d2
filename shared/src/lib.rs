//! Predimaint Shared Library
//!
//! This crate contains the models, chart computation, storage and reporting
//! used across the Predimaint predictive-maintenance registry.
//!
//! # Modules
//!
//! - [`models`] - Units, equipment, employees and data collections
//! - [`chart`] - Time-series chart frames and pixel projection
//! - [`storage`] - Key-value store trait and implementations
//! - [`registry`] - Application operations over a key-value store
//! - [`report`] - Plain-text collection reports
//!
//! # Example
//!
//! ```
//! use shared::models::{CollectionDraft, EmployeeDraft, EquipmentDraft, MetricKey};
//! use shared::registry::Registry;
//!
//! let registry = Registry::in_memory();
//! let unit = registry.add_unit("Bloco A").unwrap();
//! let motor = registry
//!     .add_equipment(&unit.id, EquipmentDraft::new("Motor 01", "Motor Elétrico", "SN-1"))
//!     .unwrap();
//! let tech = registry
//!     .add_employee(EmployeeDraft::new("Ana", "Técnica", "1001", "ana@plant.com"))
//!     .unwrap();
//!
//! registry
//!     .record_collection(CollectionDraft::new(&motor.id, &tech.id).with_custom_value("Corrente", 11.2))
//!     .unwrap();
//!
//! let series = registry.series(&motor.id, &MetricKey::parse("Corrente")).unwrap();
//! assert_eq!(series.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chart;
pub mod models;
pub mod registry;
pub mod report;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
