use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Input file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("Ex.txt")
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

impl InputConfig {
    fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("Input path must not be empty"));
        }
        Ok(())
    }
}

/// Region of interest, as a half-open column range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    #[serde(default = "default_crop_start")]
    pub start: usize,
    #[serde(default = "default_crop_end")]
    pub end: usize,
}

fn default_crop_start() -> usize {
    2000
}

fn default_crop_end() -> usize {
    4000
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            start: default_crop_start(),
            end: default_crop_end(),
        }
    }
}

impl CropConfig {
    fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(anyhow!(
                "Crop start must be below crop end (start={}, end={})",
                self.start,
                self.end
            ));
        }
        Ok(())
    }
}

/// Live plot window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_y_min")]
    pub y_min: f64,
    #[serde(default = "default_y_max")]
    pub y_max: f64,
    /// Pause after each frame, in seconds
    #[serde(default = "default_frame_delay")]
    pub frame_delay: f64,
}

fn default_title() -> String {
    "Ex field".to_string()
}

// 4:1 aspect of the 32x8 in figure
fn default_width() -> usize {
    1600
}

fn default_height() -> usize {
    400
}

fn default_y_min() -> f64 {
    -1.0
}

fn default_y_max() -> f64 {
    1.0
}

fn default_frame_delay() -> f64 {
    0.0001
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            y_min: default_y_min(),
            y_max: default_y_max(),
            frame_delay: default_frame_delay(),
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "Window dimensions must be positive (width={}, height={})",
                self.width,
                self.height
            ));
        }
        if !self.y_min.is_finite() || !self.y_max.is_finite() || self.y_min >= self.y_max {
            return Err(anyhow!(
                "y limits must be finite with y_min < y_max (y_min={}, y_max={})",
                self.y_min,
                self.y_max
            ));
        }
        Duration::try_from_secs_f64(self.frame_delay).map_err(|e| {
            anyhow!(
                "frame_delay must be a non-negative number of seconds, got {} ({})",
                self.frame_delay,
                e
            )
        })?;
        Ok(())
    }

    /// Only meaningful after `validate`; out-of-range delays fall back to zero.
    pub fn frame_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.frame_delay).unwrap_or(Duration::ZERO)
    }
}

/// Complete animator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub crop: CropConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.input.validate()?;
        self.crop.validate()?;
        self.display.validate()?;
        Ok(())
    }

    pub fn crop_range(&self) -> Range<usize> {
        self.crop.start..self.crop.end
    }

    pub fn log_summary(&self) {
        log::info!("Input: {:?}", self.input.path);
        log::info!(
            "Region of interest: columns {}..{} ({} samples)",
            self.crop.start,
            self.crop.end,
            self.crop.end.saturating_sub(self.crop.start)
        );
        log::info!(
            "Display: '{}' {}x{}, y in [{}, {}], {} s per frame",
            self.display.title,
            self.display.width,
            self.display.height,
            self.display.y_min,
            self.display.y_max,
            self.display.frame_delay
        );
    }
}
