//! Render-ready chart layout.
//!
//! Combines a frame with projected points and labeled tick positions so a
//! rendering layer only has to draw lines, circles and text.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::frame::{project, ChartDimensions, ChartFrame, FrameOutcome, PixelPoint};
use super::series::MetricSeries;

/// An observation together with its pixel position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlottedPoint {
    /// When the sample was taken.
    pub timestamp: DateTime<Utc>,
    /// The sampled value.
    pub value: f64,
    /// Pixel position.
    pub position: PixelPoint,
}

/// A labeled tick along one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    /// Text to draw next to the tick.
    pub label: String,
    /// Pixel coordinate along the axis (Y for value ticks, X for time ticks).
    pub position: f64,
}

/// Everything needed to draw a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    /// The target dimensions.
    pub dimensions: ChartDimensions,
    /// Axis domains and raw ticks.
    pub frame: ChartFrame,
    /// The series in time order, projected.
    pub points: Vec<PlottedPoint>,
    /// Value axis ticks, bottom to top.
    pub y_ticks: Vec<TickMark>,
    /// Time axis ticks, left to right.
    pub x_ticks: Vec<TickMark>,
}

/// Outcome of laying out a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    /// The chart can be drawn.
    Ready(ChartLayout),
    /// Fewer than two observations.
    InsufficientData,
}

impl ChartOutcome {
    /// Returns the layout, if any.
    #[must_use]
    pub fn layout(&self) -> Option<&ChartLayout> {
        match self {
            Self::Ready(layout) => Some(layout),
            Self::InsufficientData => None,
        }
    }
}

impl ChartLayout {
    /// Lays out a series within the given dimensions.
    #[must_use]
    pub fn compose(series: &MetricSeries, dims: &ChartDimensions) -> ChartOutcome {
        let frame = match series.frame() {
            FrameOutcome::Ready(frame) => frame,
            FrameOutcome::InsufficientData => return ChartOutcome::InsufficientData,
        };

        let points = series
            .observations()
            .iter()
            .map(|o| PlottedPoint {
                timestamp: o.timestamp,
                value: o.value,
                position: project(&frame, dims, o),
            })
            .collect();

        let y_ticks = frame
            .y_ticks
            .iter()
            .map(|&v| TickMark {
                label: format!("{v:.1}"),
                position: frame.y_pixel(dims, v),
            })
            .collect();

        let x_ticks = frame
            .x_ticks
            .iter()
            .map(|&t| TickMark {
                label: t.format("%m/%d").to_string(),
                position: frame.x_pixel(dims, t),
            })
            .collect();

        ChartOutcome::Ready(Self {
            dimensions: *dims,
            frame,
            points,
            y_ticks,
            x_ticks,
        })
    }

    /// The data line as an SVG `points` attribute (`x,y x,y ...`).
    #[must_use]
    pub fn polyline(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.position.x, p.position.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
