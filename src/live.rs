use crate::animation::{AnimationSummary, FieldAnimator};
use crate::config::{Config, DisplayConfig};
use crate::display::{DisplayError, FrameSink};
use crate::matrix::FieldMatrix;
use crate::visualisation::AxisLimits;
use anyhow::{Context, Result};
use std::io::Write;

pub const START_MESSAGE: &str = "Generating a live plot for the start ...";
pub const FINISH_MESSAGE: &str = "Live plot successfully finished !!";

/// Load the configured field and crop it to the region of interest.
pub fn load_region(config: &Config) -> Result<FieldMatrix> {
    let field = FieldMatrix::load(&config.input.path)
        .with_context(|| format!("Failed to load field from {:?}", config.input.path))?;
    field
        .crop(config.crop_range())
        .context("Failed to crop to the region of interest")
}

/// Load, crop and animate the field on the sink returned by `open`.
///
/// The start line is written before the sink is opened; the finish line
/// only after every row has been shown.
pub fn run<S, F, W>(config: &Config, open: F, out: &mut W) -> Result<AnimationSummary>
where
    S: FrameSink,
    F: FnOnce(&DisplayConfig, usize) -> Result<S, DisplayError>,
    W: Write,
{
    let field = load_region(config)?;
    let display = &config.display;

    let limits = AxisLimits::new(field.columns(), display.y_min, display.y_max)?;
    let summary = field.summary();
    if limits.clips(summary.min) || limits.clips(summary.max) {
        log::warn!(
            "Field values span [{}, {}]; anything outside [{}, {}] is clipped",
            summary.min,
            summary.max,
            display.y_min,
            display.y_max
        );
    }

    writeln!(out, "{}", START_MESSAGE)?;
    let mut sink = open(display, field.columns())?;
    let animated = FieldAnimator::new(display.frame_delay()).animate(&field, &mut sink)?;
    sink.close();
    writeln!(out, "{}", FINISH_MESSAGE)?;

    Ok(animated)
}
