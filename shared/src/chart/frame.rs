//! Chart frame computation.
//!
//! Computes the axis domains and tick sets for a line chart of one metric
//! series, and maps observations into pixel space.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::series::MetricSeries;

/// Number of ticks on the value axis.
pub const Y_TICK_COUNT: usize = 5;

/// Upper bound on the number of ticks on the time axis.
pub const MAX_X_TICKS: usize = 4;

/// Minimum number of observations needed to draw a line.
pub const MIN_OBSERVATIONS: usize = 2;

/// Fraction of the value range added above and below the data.
const RANGE_PADDING: f64 = 0.1;

/// Padding applied to a flat series, in raw metric units.
const FLAT_PADDING: f64 = 1.0;

/// A single dated sample of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// When the sample was taken.
    pub timestamp: DateTime<Utc>,
    /// The sampled value.
    pub value: f64,
}

impl Observation {
    /// Creates an observation.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Space reserved around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin (holds the time axis labels).
    pub bottom: f64,
    /// Left margin (holds the value axis labels).
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 50.0,
            left: 50.0,
        }
    }
}

/// Target pixel size of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDimensions {
    /// Total width.
    pub width: f64,
    /// Total height.
    pub height: f64,
    /// Margins around the plotting area.
    #[serde(default)]
    pub margins: Margins,
}

impl ChartDimensions {
    /// Creates dimensions with the default margins.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
        }
    }

    /// Sets the margins.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Width of the plotting area.
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    /// Height of the plotting area.
    #[must_use]
    pub fn inner_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Whether the size is finite and leaves room inside the margins.
    #[must_use]
    pub fn has_plot_area(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.inner_width() > 0.0
            && self.inner_height() > 0.0
    }
}

impl Default for ChartDimensions {
    /// 500 x 250 with 20/20/50/50 margins.
    fn default() -> Self {
        Self::new(500.0, 250.0)
    }
}

/// Axis domains and tick positions for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    /// Bottom of the value axis.
    pub y_min: f64,
    /// Top of the value axis.
    pub y_max: f64,
    /// Start of the time axis.
    pub x_min: DateTime<Utc>,
    /// End of the time axis.
    pub x_max: DateTime<Utc>,
    /// Value axis ticks, ascending.
    pub y_ticks: Vec<f64>,
    /// Time axis ticks, ascending.
    pub x_ticks: Vec<DateTime<Utc>>,
}

/// A position in pixel space; Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Outcome of building a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameOutcome {
    /// The series can be drawn.
    Ready(ChartFrame),
    /// Fewer than two observations; show a placeholder instead.
    InsufficientData,
}

impl FrameOutcome {
    /// Returns the frame, if one was built.
    #[must_use]
    pub fn frame(&self) -> Option<&ChartFrame> {
        match self {
            Self::Ready(frame) => Some(frame),
            Self::InsufficientData => None,
        }
    }

    /// Returns true if the series can be drawn.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Builds the chart frame for a set of observations in any order.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shared::chart::{build_frame, Observation};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
/// let t1 = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
/// let outcome = build_frame(&[Observation::new(t1, 20.0), Observation::new(t0, 10.0)]);
///
/// let frame = outcome.frame().unwrap();
/// assert_eq!(frame.x_min, t0);
/// assert_eq!(frame.y_min, 9.0);
/// assert_eq!(frame.y_max, 21.0);
/// ```
#[must_use]
pub fn build_frame(observations: &[Observation]) -> FrameOutcome {
    MetricSeries::new(observations.to_vec()).frame()
}

/// Maps an observation into pixel space.
#[must_use]
pub fn project(frame: &ChartFrame, dims: &ChartDimensions, observation: &Observation) -> PixelPoint {
    PixelPoint {
        x: frame.x_pixel(dims, observation.timestamp),
        y: frame.y_pixel(dims, observation.value),
    }
}

impl ChartFrame {
    /// Computes the frame from observations already sorted by timestamp.
    ///
    /// Returns `None` when there are fewer than [`MIN_OBSERVATIONS`].
    pub(crate) fn from_sorted(sorted: &[Observation]) -> Option<Self> {
        if sorted.len() < MIN_OBSERVATIONS {
            return None;
        }
        let first = sorted.first()?;
        let last = sorted.last()?;

        let (data_y_min, data_y_max) = sorted.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), o| (lo.min(o.value), hi.max(o.value)),
        );
        let range = data_y_max - data_y_min;
        let padding = if range > 0.0 {
            range * RANGE_PADDING
        } else {
            FLAT_PADDING
        };
        let y_min = data_y_min - padding;
        let y_max = data_y_max + padding;

        let x_min = first.timestamp;
        let x_max = last.timestamp;

        Some(Self {
            y_min,
            y_max,
            x_min,
            x_max,
            y_ticks: value_ticks(y_min, y_max),
            x_ticks: time_ticks(x_min, x_max, sorted.len().min(MAX_X_TICKS)),
        })
    }

    /// Horizontal pixel for a timestamp.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn x_pixel(&self, dims: &ChartDimensions, timestamp: DateTime<Utc>) -> f64 {
        let span = (self.x_max - self.x_min).num_milliseconds();
        if span <= 0 {
            return dims.margins.left + dims.inner_width() / 2.0;
        }
        let offset = (timestamp - self.x_min).num_milliseconds() as f64;
        dims.margins.left + offset / span as f64 * dims.inner_width()
    }

    /// Vertical pixel for a value; larger values sit higher.
    #[must_use]
    pub fn y_pixel(&self, dims: &ChartDimensions, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        if span <= 0.0 {
            return dims.margins.top + dims.inner_height() / 2.0;
        }
        dims.margins.top + dims.inner_height() - (value - self.y_min) / span * dims.inner_height()
    }
}

#[allow(clippy::cast_precision_loss)]
fn value_ticks(y_min: f64, y_max: f64) -> Vec<f64> {
    let interval = (y_max - y_min) / (Y_TICK_COUNT - 1) as f64;
    (0..Y_TICK_COUNT)
        .map(|i| {
            if i == Y_TICK_COUNT - 1 {
                y_max
            } else {
                y_min + i as f64 * interval
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn time_ticks(x_min: DateTime<Utc>, x_max: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    if count <= 1 {
        return vec![x_min];
    }
    let interval = (x_max - x_min).num_milliseconds() as f64 / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                x_max
            } else {
                x_min + TimeDelta::milliseconds((i as f64 * interval).round() as i64)
            }
        })
        .collect()
}
