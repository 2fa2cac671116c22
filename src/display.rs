//! # Display Adapters
//!
//! The dashboard core talks to a panel through [`DisplayAdapter`]: it asks for
//! the resolution, writes individual pixels during the clear cycle, hands over
//! a finished [`Canvas`] and finally asks the panel to refresh.
//!
//! Two adapters ship with the crate:
//! - [`PngDisplay`]: development mode, writes the committed image to a PNG file
//! - [`crate::inky_ac073::InkyAc073`]: the 7-colour 800x480 panel itself

use crate::canvas::{Canvas, InkyColor};
use log::{debug, info};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while committing an image to a display.
#[derive(Error, Debug)]
pub enum DisplayError {
    /// Canvas does not match the panel resolution
    #[error("canvas is {got_width}x{got_height}, display expects {width}x{height}")]
    ResolutionMismatch {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },

    /// SPI or GPIO transport failure
    #[error("display transport: {0}")]
    Transport(String),

    /// Preview image could not be written
    #[error("preview write failed: {0}")]
    Preview(#[from] image::ImageError),
}

/// A panel that can receive a palette image.
pub trait DisplayAdapter {
    /// Panel size in pixels as `(width, height)`.
    fn resolution(&self) -> (u32, u32);

    /// Set one pixel of the adapter's pending frame.
    fn set_pixel(&mut self, x: u32, y: u32, color: InkyColor);

    /// Replace the pending frame with `canvas`.
    fn set_image(&mut self, canvas: &Canvas) -> Result<(), DisplayError>;

    /// Push the pending frame to the panel.
    fn show(&mut self) -> Result<(), DisplayError>;
}

/// Check that `canvas` can be copied into a `(width, height)` frame.
pub(crate) fn check_resolution(
    canvas: &Canvas,
    (width, height): (u32, u32),
) -> Result<(), DisplayError> {
    if canvas.width() != width || canvas.height() != height {
        return Err(DisplayError::ResolutionMismatch {
            width,
            height,
            got_width: canvas.width(),
            got_height: canvas.height(),
        });
    }
    Ok(())
}

/// Log per-colour pixel counts of a frame about to be shown.
pub(crate) fn log_frame_stats(frame: &Canvas) {
    for color in InkyColor::INKS {
        let count = frame.count(color);
        if count > 0 {
            debug!("   📊 {:?}: {} pixels", color, count);
        }
    }
}

/// Development adapter that renders the committed frame to a PNG file.
pub struct PngDisplay {
    frame: Canvas,
    path: PathBuf,
}

impl PngDisplay {
    pub fn new(width: u32, height: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            frame: Canvas::new(width, height, InkyColor::White),
            path: path.into(),
        }
    }

    /// The pending frame.
    pub fn frame(&self) -> &Canvas {
        &self.frame
    }
}

impl DisplayAdapter for PngDisplay {
    fn resolution(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: InkyColor) {
        self.frame.set_pixel(x, y, color);
    }

    fn set_image(&mut self, canvas: &Canvas) -> Result<(), DisplayError> {
        check_resolution(canvas, self.resolution())?;
        self.frame.clone_from(canvas);
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        log_frame_stats(&self.frame);
        self.frame.save_png(&self.path)?;
        info!("🖼️  Preview written to {}", self.path.display());
        Ok(())
    }
}
