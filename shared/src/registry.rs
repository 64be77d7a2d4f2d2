//! Maintenance registry.
//!
//! The registry owns the application rules on top of a [`KeyValueStore`]:
//! it keeps units, equipment, employees and collections as JSON arrays under
//! fixed keys and enforces referential and uniqueness constraints on every
//! write.

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::chart::{ChartDimensions, ChartLayout, ChartOutcome, MetricSeries};
use crate::models::{
    available_metrics, CollectionDraft, CollectionValidationError, CollectionView,
    DataCollection, Employee, EmployeeDraft, EmployeeValidationError, Equipment, EquipmentDraft,
    EquipmentValidationError, MetricDescriptor, MetricKey, Unit, UnitValidationError,
    UNKNOWN_EMPLOYEE, UNKNOWN_EQUIPMENT, UNKNOWN_UNIT,
};
use crate::report::{self, Report};
use crate::storage::{InMemoryKeyValueStore, KeyValueStore, StoreError};

/// Store key holding the unit list.
pub const UNITS_KEY: &str = "units";
/// Store key holding the equipment list.
pub const EQUIPMENT_KEY: &str = "equipment";
/// Store key holding the employee list.
pub const EMPLOYEES_KEY: &str = "employees";
/// Store key holding the collection list.
pub const COLLECTIONS_KEY: &str = "collections";

/// Kind of record, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// An organizational unit.
    Unit,
    /// A piece of equipment.
    Equipment,
    /// An employee.
    Employee,
    /// A data collection.
    Collection,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => write!(f, "unit"),
            Self::Equipment => write!(f, "equipment"),
            Self::Employee => write!(f, "employee"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The backing store failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored list could not be encoded or decoded.
    #[error("Failed to (de)serialize '{key}': {source}")]
    Serialization {
        /// Store key of the list.
        key: &'static str,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A referenced record does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Requested id.
        id: String,
    },

    /// Another employee already uses this badge number.
    #[error("Badge number '{0}' is already registered")]
    DuplicateBadge(String),

    /// Another employee already uses this e-mail.
    #[error("E-mail '{0}' is already in use")]
    DuplicateEmail(String),

    /// Deleting the employee would leave no administrator.
    #[error("Cannot delete the last administrator")]
    LastAdministrator,

    /// The metric is not offered by the equipment.
    #[error("Equipment '{equipment_id}' has no metric '{metric}'")]
    UnknownMetric {
        /// The equipment.
        equipment_id: String,
        /// The requested metric key.
        metric: String,
    },

    /// Unit failed validation.
    #[error(transparent)]
    InvalidUnit(#[from] UnitValidationError),

    /// Equipment failed validation.
    #[error(transparent)]
    InvalidEquipment(#[from] EquipmentValidationError),

    /// Employee failed validation.
    #[error(transparent)]
    InvalidEmployee(#[from] EmployeeValidationError),

    /// Collection failed validation.
    #[error(transparent)]
    InvalidCollection(#[from] CollectionValidationError),
}

impl RegistryError {
    fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    /// Registered units.
    pub units: usize,
    /// Registered equipment.
    pub equipment: usize,
    /// Registered employees.
    pub employees: usize,
    /// Recorded collections.
    pub collections: usize,
}

/// Typed access to the maintenance records held in a key-value store.
///
/// Reads go straight to the store; writes are serialized so that
/// read-modify-write cycles do not interleave.
pub struct Registry {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    last_id: AtomicI64,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("last_id", &self.last_id)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Creates a registry over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            last_id: AtomicI64::new(0),
        }
    }

    /// Creates a registry over a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()))
    }

    fn load<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, RegistryError> {
        match self.store.get(key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|source| RegistryError::Serialization { key, source }),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&self, key: &'static str, items: &[T]) -> Result<(), RegistryError> {
        self.store.set(key, Self::encode(key, items)?)?;
        Ok(())
    }

    fn encode<T: Serialize>(key: &'static str, items: &[T]) -> Result<String, RegistryError> {
        serde_json::to_string(items).map_err(|source| RegistryError::Serialization { key, source })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, RegistryError> {
        self.write_lock
            .lock()
            .map_err(|_| RegistryError::Store(StoreError::LockError))
    }

    /// Millisecond timestamp ids, strictly increasing within this registry.
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1).to_string()
    }

    // ------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------

    /// Lists all units.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_units(&self) -> Result<Vec<Unit>, RegistryError> {
        self.load(UNITS_KEY)
    }

    /// Registers a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the store fails.
    pub fn add_unit(&self, name: &str) -> Result<Unit, RegistryError> {
        let unit = Unit::new(self.next_id(), name);
        unit.validate_unit()?;

        let _guard = self.lock()?;
        let mut units: Vec<Unit> = self.load(UNITS_KEY)?;
        units.push(unit.clone());
        self.save(UNITS_KEY, &units)?;

        tracing::info!(unit_id = %unit.id, name = %unit.name, "Unit registered");
        Ok(unit)
    }

    /// Deletes a unit together with all of its equipment.
    ///
    /// Returns the number of equipment records removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit does not exist or the store fails.
    pub fn delete_unit(&self, id: &str) -> Result<usize, RegistryError> {
        let _guard = self.lock()?;
        let mut units: Vec<Unit> = self.load(UNITS_KEY)?;
        let before = units.len();
        units.retain(|u| u.id != id);
        if units.len() == before {
            return Err(RegistryError::not_found(EntityKind::Unit, id));
        }

        let mut equipment: Vec<Equipment> = self.load(EQUIPMENT_KEY)?;
        let equipment_before = equipment.len();
        equipment.retain(|e| e.unit_id != id);
        let removed = equipment_before - equipment.len();

        self.store.set_many(vec![
            (EQUIPMENT_KEY, Self::encode(EQUIPMENT_KEY, &equipment)?),
            (UNITS_KEY, Self::encode(UNITS_KEY, &units)?),
        ])?;

        tracing::info!(unit_id = %id, equipment_removed = removed, "Unit deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    /// Lists equipment, optionally restricted to one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_equipment(&self, unit_id: Option<&str>) -> Result<Vec<Equipment>, RegistryError> {
        let mut equipment: Vec<Equipment> = self.load(EQUIPMENT_KEY)?;
        if let Some(unit_id) = unit_id {
            equipment.retain(|e| e.unit_id == unit_id);
        }
        Ok(equipment)
    }

    /// Fetches one piece of equipment.
    ///
    /// # Errors
    ///
    /// Returns an error if it does not exist or the store fails.
    pub fn get_equipment(&self, id: &str) -> Result<Equipment, RegistryError> {
        self.load::<Equipment>(EQUIPMENT_KEY)?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Equipment, id))
    }

    /// Registers equipment under a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit does not exist, the draft is invalid or
    /// the store fails.
    pub fn add_equipment(
        &self,
        unit_id: &str,
        draft: EquipmentDraft,
    ) -> Result<Equipment, RegistryError> {
        let equipment = Equipment::from_draft(self.next_id(), unit_id, draft);
        equipment.validate_equipment()?;

        let _guard = self.lock()?;
        let units: Vec<Unit> = self.load(UNITS_KEY)?;
        if !units.iter().any(|u| u.id == unit_id) {
            return Err(RegistryError::not_found(EntityKind::Unit, unit_id));
        }

        let mut all: Vec<Equipment> = self.load(EQUIPMENT_KEY)?;
        all.push(equipment.clone());
        self.save(EQUIPMENT_KEY, &all)?;

        tracing::info!(
            equipment_id = %equipment.id,
            unit_id = %unit_id,
            custom_fields = equipment.custom_fields.len(),
            "Equipment registered"
        );
        Ok(equipment)
    }

    /// Deletes one piece of equipment. Its collections are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if it does not exist or the store fails.
    pub fn delete_equipment(&self, id: &str) -> Result<(), RegistryError> {
        let _guard = self.lock()?;
        let mut all: Vec<Equipment> = self.load(EQUIPMENT_KEY)?;
        let before = all.len();
        all.retain(|e| e.id != id);
        if all.len() == before {
            return Err(RegistryError::not_found(EntityKind::Equipment, id));
        }
        self.save(EQUIPMENT_KEY, &all)?;

        tracing::info!(equipment_id = %id, "Equipment deleted");
        Ok(())
    }

    /// Lists the metrics that can be charted for one piece of equipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the equipment does not exist or the store fails.
    pub fn metrics_for(&self, equipment_id: &str) -> Result<Vec<MetricDescriptor>, RegistryError> {
        Ok(available_metrics(&self.get_equipment(equipment_id)?))
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    /// Lists all employees.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_employees(&self) -> Result<Vec<Employee>, RegistryError> {
        self.load(EMPLOYEES_KEY)
    }

    /// Fetches one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist or the store fails.
    pub fn get_employee(&self, id: &str) -> Result<Employee, RegistryError> {
        self.load::<Employee>(EMPLOYEES_KEY)?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Employee, id))
    }

    /// Registers an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is invalid, the badge number or e-mail
    /// is already registered, or the store fails.
    pub fn add_employee(&self, draft: EmployeeDraft) -> Result<Employee, RegistryError> {
        let employee = Employee::from_draft(self.next_id(), draft);
        employee.validate_employee()?;

        let _guard = self.lock()?;
        let mut all: Vec<Employee> = self.load(EMPLOYEES_KEY)?;
        if all.iter().any(|e| e.employee_id == employee.employee_id) {
            return Err(RegistryError::DuplicateBadge(employee.employee_id));
        }
        if all.iter().any(|e| e.has_email(&employee.email)) {
            return Err(RegistryError::DuplicateEmail(employee.email));
        }
        all.push(employee.clone());
        self.save(EMPLOYEES_KEY, &all)?;

        tracing::info!(
            employee_id = %employee.id,
            badge = %employee.employee_id,
            is_admin = employee.is_admin,
            "Employee registered"
        );
        Ok(employee)
    }

    /// Deletes an employee. The last administrator cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist, is the last
    /// administrator, or the store fails.
    pub fn delete_employee(&self, id: &str) -> Result<(), RegistryError> {
        let _guard = self.lock()?;
        let mut all: Vec<Employee> = self.load(EMPLOYEES_KEY)?;
        let target = all
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Employee, id))?;

        if target.is_admin && all.iter().filter(|e| e.is_admin).count() <= 1 {
            tracing::warn!(employee_id = %id, "Refusing to delete the last administrator");
            return Err(RegistryError::LastAdministrator);
        }

        all.retain(|e| e.id != id);
        self.save(EMPLOYEES_KEY, &all)?;

        tracing::info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Lists collections, most recently recorded first, with display names
    /// resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_collections(&self) -> Result<Vec<CollectionView>, RegistryError> {
        let collections: Vec<DataCollection> = self.load(COLLECTIONS_KEY)?;
        let resolver = NameResolver::new(
            self.load(UNITS_KEY)?,
            self.load(EQUIPMENT_KEY)?,
            self.load(EMPLOYEES_KEY)?,
        );
        Ok(collections
            .into_iter()
            .rev()
            .map(|c| resolver.view(c))
            .collect())
    }

    /// Fetches one collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection does not exist or the store fails.
    pub fn get_collection(&self, id: &str) -> Result<DataCollection, RegistryError> {
        self.load::<DataCollection>(COLLECTIONS_KEY)?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Collection, id))
    }

    fn check_collection(&self, collection: &DataCollection) -> Result<(), RegistryError> {
        let equipment = self.get_equipment(&collection.equipment_id)?;
        self.get_employee(&collection.employee_id)?;
        collection.validate_against(&equipment)?;
        Ok(())
    }

    /// Records a new collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the equipment or employee does not exist, a
    /// custom value is not declared on the equipment, or the store fails.
    pub fn record_collection(&self, draft: CollectionDraft) -> Result<DataCollection, RegistryError> {
        let collection = DataCollection::from_draft(self.next_id(), draft);

        let _guard = self.lock()?;
        self.check_collection(&collection)?;
        let mut all: Vec<DataCollection> = self.load(COLLECTIONS_KEY)?;
        all.push(collection.clone());
        self.save(COLLECTIONS_KEY, &all)?;

        tracing::info!(
            collection_id = %collection.id,
            equipment_id = %collection.equipment_id,
            employee_id = %collection.employee_id,
            "Collection recorded"
        );
        Ok(collection)
    }

    /// Replaces the contents of an existing collection, keeping its id and
    /// position.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection does not exist, the new contents
    /// are invalid, or the store fails.
    pub fn update_collection(
        &self,
        id: &str,
        draft: CollectionDraft,
    ) -> Result<DataCollection, RegistryError> {
        let updated = DataCollection::from_draft(id, draft);

        let _guard = self.lock()?;
        let mut all: Vec<DataCollection> = self.load(COLLECTIONS_KEY)?;
        let slot = all
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Collection, id))?;
        self.check_collection(&updated)?;
        *slot = updated.clone();
        self.save(COLLECTIONS_KEY, &all)?;

        tracing::info!(collection_id = %id, "Collection updated");
        Ok(updated)
    }

    /// Deletes one collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection does not exist or the store fails.
    pub fn delete_collection(&self, id: &str) -> Result<(), RegistryError> {
        let _guard = self.lock()?;
        let mut all: Vec<DataCollection> = self.load(COLLECTIONS_KEY)?;
        let before = all.len();
        all.retain(|c| c.id != id);
        if all.len() == before {
            return Err(RegistryError::not_found(EntityKind::Collection, id));
        }
        self.save(COLLECTIONS_KEY, &all)?;

        tracing::info!(collection_id = %id, "Collection deleted");
        Ok(())
    }

    /// Deletes the whole collection history. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn clear_collections(&self) -> Result<usize, RegistryError> {
        let _guard = self.lock()?;
        let removed = self.load::<DataCollection>(COLLECTIONS_KEY)?.len();
        self.save::<DataCollection>(COLLECTIONS_KEY, &[])?;

        tracing::warn!(removed, "Collection history cleared");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Counts the records of each kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn dashboard(&self) -> Result<DashboardCounts, RegistryError> {
        Ok(DashboardCounts {
            units: self.load::<Unit>(UNITS_KEY)?.len(),
            equipment: self.load::<Equipment>(EQUIPMENT_KEY)?.len(),
            employees: self.load::<Employee>(EMPLOYEES_KEY)?.len(),
            collections: self.load::<DataCollection>(COLLECTIONS_KEY)?.len(),
        })
    }

    /// Extracts the history of one metric for one piece of equipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the equipment does not exist, does not offer the
    /// metric, or the store fails.
    pub fn series(&self, equipment_id: &str, metric: &MetricKey) -> Result<MetricSeries, RegistryError> {
        let equipment = self.get_equipment(equipment_id)?;
        if !available_metrics(&equipment).iter().any(|m| &m.key == metric) {
            return Err(RegistryError::UnknownMetric {
                equipment_id: equipment_id.to_string(),
                metric: metric.to_string(),
            });
        }
        let collections: Vec<DataCollection> = self.load(COLLECTIONS_KEY)?;
        Ok(MetricSeries::extract(&collections, equipment_id, metric))
    }

    /// Lays out the chart of one metric for one piece of equipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the equipment does not exist, does not offer the
    /// metric, or the store fails.
    pub fn chart(
        &self,
        equipment_id: &str,
        metric: &MetricKey,
        dims: &ChartDimensions,
    ) -> Result<ChartOutcome, RegistryError> {
        let series = self.series(equipment_id, metric)?;
        tracing::debug!(
            equipment_id = %equipment_id,
            metric = %metric,
            observations = series.len(),
            "Composing chart"
        );
        Ok(ChartLayout::compose(&series, dims))
    }

    /// Builds the report for one collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection does not exist or the store fails.
    pub fn collection_report(&self, id: &str) -> Result<Report, RegistryError> {
        self.list_collections()?
            .iter()
            .find(|v| v.collection.id == id)
            .map(report::collection_report)
            .ok_or_else(|| RegistryError::not_found(EntityKind::Collection, id))
    }

    /// Builds the consolidated report for one day, or `None` if nothing was
    /// collected that day.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn daily_report(&self, day: NaiveDate) -> Result<Option<Report>, RegistryError> {
        Ok(report::daily_report(&self.list_collections()?, day))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Resolves display names for collections.
struct NameResolver {
    units: HashMap<String, String>,
    equipment: HashMap<String, Equipment>,
    employees: HashMap<String, String>,
}

impl NameResolver {
    fn new(units: Vec<Unit>, equipment: Vec<Equipment>, employees: Vec<Employee>) -> Self {
        Self {
            units: units.into_iter().map(|u| (u.id, u.name)).collect(),
            equipment: equipment.into_iter().map(|e| (e.id.clone(), e)).collect(),
            employees: employees.into_iter().map(|e| (e.id, e.name)).collect(),
        }
    }

    fn view(&self, collection: DataCollection) -> CollectionView {
        let equipment = self.equipment.get(&collection.equipment_id);
        let employee_name = self
            .employees
            .get(&collection.employee_id)
            .map_or(UNKNOWN_EMPLOYEE, String::as_str)
            .to_string();
        let unit_name = equipment
            .and_then(|e| self.units.get(&e.unit_id))
            .map_or(UNKNOWN_UNIT, String::as_str)
            .to_string();
        let equipment_name = equipment
            .map_or(UNKNOWN_EQUIPMENT, |e| e.name.as_str())
            .to_string();

        CollectionView {
            collection,
            employee_name,
            unit_name,
            equipment_name,
        }
    }
}
