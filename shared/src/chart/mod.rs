//! Measurement history charts.
//!
//! Turns the collections of one equipment into a time series for a selected
//! metric and computes everything a renderer needs to draw it as a line
//! chart: axis domains, ticks and pixel coordinates. The computation is pure
//! and runs afresh for every render.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use shared::chart::{ChartDimensions, ChartLayout, MetricSeries, Observation};
//!
//! let day = |d| Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap();
//! let series = MetricSeries::new(vec![
//!     Observation::new(day(1), 10.0),
//!     Observation::new(day(2), 20.0),
//!     Observation::new(day(3), 15.0),
//! ]);
//!
//! let outcome = ChartLayout::compose(&series, &ChartDimensions::default());
//! let layout = outcome.layout().expect("three points are enough");
//! assert_eq!(layout.frame.y_ticks, vec![9.0, 12.0, 15.0, 18.0, 21.0]);
//! ```

pub mod frame;
pub mod layout;
pub mod series;

pub use frame::{
    build_frame, project, ChartDimensions, ChartFrame, FrameOutcome, Margins, Observation,
    PixelPoint, MAX_X_TICKS, MIN_OBSERVATIONS, Y_TICK_COUNT,
};
pub use layout::{ChartLayout, ChartOutcome, PlottedPoint, TickMark};
pub use series::MetricSeries;
