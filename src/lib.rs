//! Live line-plot animation of a space/time field matrix.
//!
//! A field is loaded from whitespace-delimited text, cropped to a column
//! range, and swept row by row through a [`display::FrameSink`].

pub mod animation;
pub mod config;
pub mod display;
pub mod live;
pub mod matrix;
pub mod visualisation;

pub use animation::{AnimationError, AnimationSummary, FieldAnimator};
pub use config::Config;
pub use display::{DisplayError, Frame, FrameSink, PlotWindow};
pub use matrix::{FieldError, FieldMatrix, FieldSummary};
pub use visualisation::{AxisLimits, LinePlotter, VisualisationError};
