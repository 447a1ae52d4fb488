use crate::display::{DisplayError, Frame, FrameSink};
use crate::matrix::FieldMatrix;
use std::thread;
use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug)]
pub enum AnimationError {
    #[error("field has no rows to animate")]
    EmptyMatrix,

    #[error("field has no columns to plot")]
    NoColumns,

    #[error("display failed after {shown} of {total} frames")]
    Display {
        shown: usize,
        total: usize,
        #[source]
        source: DisplayError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSummary {
    pub frames: usize,
    pub elapsed: Duration,
}

/// Sweeps through the rows of a field, one frame per row.
#[derive(Clone, Debug)]
pub struct FieldAnimator {
    frame_delay: Duration,
}

impl FieldAnimator {
    pub fn new(frame_delay: Duration) -> Self {
        Self { frame_delay }
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Present every row of `field` to `sink` in order, pausing between frames.
    ///
    /// Stops at the first sink error; frames already shown are reported in
    /// the error.
    pub fn animate<S: FrameSink>(
        &self,
        field: &FieldMatrix,
        sink: &mut S,
    ) -> Result<AnimationSummary, AnimationError> {
        if field.rows() == 0 {
            return Err(AnimationError::EmptyMatrix);
        }
        if field.columns() == 0 {
            return Err(AnimationError::NoColumns);
        }

        let total = field.rows();
        let started = Instant::now();
        log::debug!(
            "Animating {} frames of {} samples, {:?} per frame",
            total,
            field.columns(),
            self.frame_delay
        );

        for (index, samples) in field.rows_iter().enumerate() {
            let frame = Frame {
                index,
                total,
                samples,
            };
            sink.present(&frame)
                .map_err(|source| AnimationError::Display {
                    shown: index,
                    total,
                    source,
                })?;
            log::trace!("Frame {}/{}", index + 1, total);

            if !self.frame_delay.is_zero() {
                thread::sleep(self.frame_delay);
            }
        }

        let summary = AnimationSummary {
            frames: total,
            elapsed: started.elapsed(),
        };
        log::info!(
            "Animated {} frames in {:.3} s",
            summary.frames,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }
}
