//! Metric selection.
//!
//! A [`MetricKey`] names one reading of a collection: one of the three fixed
//! readings or a custom field declared on the equipment.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::equipment::Equipment;

/// Identifies which reading of a collection to look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetricKey {
    /// Vibration reading.
    Vibration,
    /// Temperature reading, in °C.
    Temperature,
    /// Pressure reading, in bar.
    Pressure,
    /// A custom field, by name.
    Custom(String),
}

impl MetricKey {
    /// Parses a metric key. Anything other than the fixed keys is a custom
    /// field name.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key {
            "vibration" => Self::Vibration,
            "temperature" => Self::Temperature,
            "pressure" => Self::Pressure,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns the key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vibration => "vibration",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Self::parse(&key))
    }
}

/// Display information for a selectable metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    /// The metric key.
    pub key: MetricKey,
    /// Human-readable name.
    pub name: String,
    /// Unit of measure (may be empty).
    pub unit: String,
}

impl MetricDescriptor {
    fn new(key: MetricKey, name: &str, unit: &str) -> Self {
        Self {
            key,
            name: name.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Axis title, e.g. `Temperatura (°C)`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.unit.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.unit)
        }
    }
}

/// Lists the metrics that can be charted for a piece of equipment: the fixed
/// readings first, then every declared custom field.
#[must_use]
pub fn available_metrics(equipment: &Equipment) -> Vec<MetricDescriptor> {
    let mut metrics = vec![
        MetricDescriptor::new(MetricKey::Temperature, "Temperatura", "°C"),
        MetricDescriptor::new(MetricKey::Vibration, "Vibração", ""),
        MetricDescriptor::new(MetricKey::Pressure, "Pressão", "bar"),
    ];
    metrics.extend(equipment.custom_fields.iter().map(|f| {
        MetricDescriptor::new(MetricKey::Custom(f.name.clone()), &f.name, &f.unit)
    }));
    metrics
}
