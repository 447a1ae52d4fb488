use plotters::prelude::*;
use std::ops::Range;

/// Bytes per pixel in the RGB frame buffer.
pub const BYTES_PER_PIXEL: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum VisualisationError {
    #[error("cannot build axis limits for a field with no columns")]
    NoColumns,

    #[error("invalid y limits [{y_min}, {y_max}]")]
    InvalidYLimits { y_min: f64, y_max: f64 },

    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to draw frame: {0}")]
    Draw(String),
}

fn draw_err<E: std::error::Error>(err: E) -> VisualisationError {
    VisualisationError::Draw(err.to_string())
}

/// Fixed plot extents. x spans the sample indices, y is independent of the data.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLimits {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

impl AxisLimits {
    pub fn new(columns: usize, y_min: f64, y_max: f64) -> Result<Self, VisualisationError> {
        if columns == 0 {
            return Err(VisualisationError::NoColumns);
        }
        if !(y_min.is_finite() && y_max.is_finite() && y_min < y_max) {
            return Err(VisualisationError::InvalidYLimits { y_min, y_max });
        }
        Ok(Self {
            x: 0.0..columns as f64,
            y: y_min..y_max,
        })
    }

    /// True if `value` would be drawn outside the y limits.
    pub fn clips(&self, value: f64) -> bool {
        value < self.y.start || value > self.y.end
    }
}

/// Draws one row of a field as a line chart into an RGB buffer.
pub struct LinePlotter {
    width: u32,
    height: u32,
    limits: AxisLimits,
    colour: RGBColor,
    title: Option<String>,
    labels: bool,
}

impl LinePlotter {
    pub fn new(width: u32, height: u32, limits: AxisLimits) -> Self {
        Self {
            width,
            height,
            limits,
            colour: BLUE,
            title: None,
            labels: true,
        }
    }

    /// Draw `title` as the chart caption.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Skip the caption and tick labels, so no font is needed.
    pub fn without_text(mut self) -> Self {
        self.title = None;
        self.labels = false;
        self
    }

    pub fn limits(&self) -> &AxisLimits {
        &self.limits
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    pub fn render<'a, I>(&self, buffer: &mut [u8], samples: I) -> Result<(), VisualisationError>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let expected = self.buffer_len();
        if buffer.len() != expected {
            return Err(VisualisationError::BufferSize {
                width: self.width,
                height: self.height,
                expected,
                actual: buffer.len(),
            });
        }

        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10).x_label_area_size(30).y_label_area_size(40);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 24));
        }
        let mut chart = builder
            .build_cartesian_2d(self.limits.x.clone(), self.limits.y.clone())
            .map_err(draw_err)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh().disable_y_mesh();
        if !self.labels {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw().map_err(draw_err)?;

        // The plotting area clips anything outside the fixed limits.
        let points = samples
            .into_iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (i as f64, v));
        chart
            .draw_series(LineSeries::new(points, &self.colour))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_ignore_data_range() {
        let limits = AxisLimits::new(2000, -1.0, 1.0).unwrap();
        assert_eq!(limits.x, 0.0..2000.0);
        assert_eq!(limits.y, -1.0..1.0);
        assert!(limits.clips(1.5));
        assert!(limits.clips(-3.0));
        assert!(!limits.clips(0.25));
    }

    #[test]
    fn zero_columns_have_no_limits() {
        assert!(matches!(
            AxisLimits::new(0, -1.0, 1.0),
            Err(VisualisationError::NoColumns)
        ));
        assert!(matches!(
            AxisLimits::new(4, 1.0, 1.0),
            Err(VisualisationError::InvalidYLimits { .. })
        ));
    }

    #[test]
    fn renders_a_line_into_the_buffer() {
        let plotter =
            LinePlotter::new(200, 80, AxisLimits::new(50, -1.0, 1.0).unwrap()).without_text();
        let mut buffer = vec![0u8; plotter.buffer_len()];
        let samples: Vec<f64> = (0..50).map(|i| (i as f64 / 5.0).sin() * 3.0).collect();
        plotter.render(&mut buffer, &samples).unwrap();

        // Background is white, the line is not.
        assert!(buffer.chunks(3).any(|px| px == [255, 255, 255]));
        assert!(buffer.chunks(3).any(|px| px != [255, 255, 255]));
    }

    #[test]
    fn titled_frame_renders_or_reports_a_draw_error() {
        // Font lookup depends on the host; a missing font must surface as an error.
        let plotter = LinePlotter::new(240, 100, AxisLimits::new(20, -1.0, 1.0).unwrap())
            .with_title("Ex field");
        let mut buffer = vec![0u8; plotter.buffer_len()];
        let samples = vec![0.5; 20];
        if let Err(err) = plotter.render(&mut buffer, &samples) {
            assert!(matches!(err, VisualisationError::Draw(_)), "{err:?}");
        }
    }

    #[test]
    fn rejects_wrong_buffer_size() {
        let plotter = LinePlotter::new(10, 10, AxisLimits::new(3, -1.0, 1.0).unwrap());
        let mut buffer = vec![0u8; 10];
        let err = plotter.render(&mut buffer, &[0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, VisualisationError::BufferSize { expected: 300, .. }));
    }
}
