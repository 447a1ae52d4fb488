use crate::config::DisplayConfig;
use crate::visualisation::{AxisLimits, LinePlotter, VisualisationError, BYTES_PER_PIXEL};
use minifb::{Key, Window, WindowOptions};
use ndarray::ArrayView1;

/// One rendered row of the field.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
    pub index: usize,
    pub total: usize,
    pub samples: ArrayView1<'a, f64>,
}

#[derive(thiserror::Error, Debug)]
pub enum DisplayError {
    #[error("no interactive display available: {0}")]
    Unavailable(String),

    #[error("plot window was closed")]
    Closed,

    #[error("failed to update plot window: {0}")]
    Update(String),

    #[error(transparent)]
    Visualisation(#[from] VisualisationError),
}

/// Anything that can show frames in sequence.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), DisplayError>;

    /// End the session once every frame has been shown.
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// An open live plot window. Owns the window and both pixel buffers.
pub struct PlotWindow {
    window: Window,
    plotter: LinePlotter,
    rgb: Vec<u8>,
    pixels: Vec<u32>,
}

impl PlotWindow {
    /// Open the window with axis limits fixed for `columns` samples.
    pub fn open(config: &DisplayConfig, columns: usize) -> Result<Self, DisplayError> {
        let limits = AxisLimits::new(columns, config.y_min, config.y_max)?;
        let width = u32::try_from(config.width)
            .map_err(|_| DisplayError::Unavailable(format!("width {} too large", config.width)))?;
        let height = u32::try_from(config.height).map_err(|_| {
            DisplayError::Unavailable(format!("height {} too large", config.height))
        })?;

        let mut window = Window::new(
            &config.title,
            config.width,
            config.height,
            WindowOptions::default(),
        )
        .map_err(|e| DisplayError::Unavailable(e.to_string()))?;
        // Pacing is driven by the animator's frame delay.
        window.set_target_fps(0);

        let plotter = LinePlotter::new(width, height, limits).with_title(&config.title);
        let rgb = vec![0u8; plotter.buffer_len()];
        let pixels = vec![0u32; config.width * config.height];
        log::info!(
            "Opened plot window '{}' ({}x{}) for {} samples",
            config.title,
            config.width,
            config.height,
            columns
        );

        Ok(Self {
            window,
            plotter,
            rgb,
            pixels,
        })
    }

    pub fn limits(&self) -> &AxisLimits {
        self.plotter.limits()
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        rgb_to_0rgb(&self.rgb, &mut self.pixels);
        let (width, height) = self.plotter.dimensions();
        self.window
            .update_with_buffer(&self.pixels, width as usize, height as usize)
            .map_err(|e| DisplayError::Update(e.to_string()))
    }
}

impl FrameSink for PlotWindow {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), DisplayError> {
        if !self.is_open() {
            return Err(DisplayError::Closed);
        }
        self.plotter.render(&mut self.rgb, frame.samples.iter())?;
        self.flush()
    }

    fn close(self) {
        log::info!("Closing plot window");
    }
}

fn rgb_to_0rgb(rgb: &[u8], pixels: &mut [u32]) {
    for (px, chunk) in pixels.iter_mut().zip(rgb.chunks_exact(BYTES_PER_PIXEL)) {
        *px = (u32::from(chunk[0]) << 16) | (u32::from(chunk[1]) << 8) | u32::from(chunk[2]);
    }
}
