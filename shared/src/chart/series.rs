//! Metric series extraction.

use serde::Serialize;

use super::frame::{ChartFrame, FrameOutcome, Observation};
use crate::models::{DataCollection, MetricKey};

/// Observations of one metric for one equipment, sorted by timestamp.
///
/// Equal timestamps keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSeries {
    observations: Vec<Observation>,
}

impl MetricSeries {
    /// Creates a series, sorting the observations.
    #[must_use]
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self { observations }
    }

    /// Extracts the series for `metric` from the collections of one
    /// equipment. Collections without a value for the metric are skipped.
    #[must_use]
    pub fn extract(collections: &[DataCollection], equipment_id: &str, metric: &MetricKey) -> Self {
        let observations = collections
            .iter()
            .filter(|c| c.equipment_id == equipment_id)
            .filter_map(|c| {
                c.metric_value(metric)
                    .map(|value| Observation::new(c.date, value))
            })
            .collect();
        Self::new(observations)
    }

    /// The sorted observations.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns true if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Builds the chart frame for this series.
    #[must_use]
    pub fn frame(&self) -> FrameOutcome {
        ChartFrame::from_sorted(&self.observations)
            .map_or(FrameOutcome::InsufficientData, FrameOutcome::Ready)
    }
}

impl From<Vec<Observation>> for MetricSeries {
    fn from(observations: Vec<Observation>) -> Self {
        Self::new(observations)
    }
}
