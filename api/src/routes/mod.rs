//! API route definitions.
//!
//! This module organizes all HTTP routes for the Predimaint API server.

mod charts;
mod collections;
mod dashboard;
mod employees;
mod equipment;
pub mod error;
mod health;
mod reports;
mod units;

pub use charts::chart_routes;
pub use collections::collections_routes;
pub use dashboard::dashboard_routes;
pub use employees::employees_routes;
pub use equipment::equipment_routes;
pub use health::health_routes;
pub use reports::reports_routes;
pub use units::units_routes;
