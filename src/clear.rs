//! Pre-draw clear cycle.
//!
//! E-paper cells need more than one full swing to shed the previous image, so
//! before anything is drawn every pixel of the pending frame is driven to
//! [`InkyColor::Clean`], twice.

use crate::canvas::InkyColor;
use crate::display::DisplayAdapter;

/// Number of full sweeps performed by [`clear_cycle`].
pub const CLEAN_PASSES: usize = 2;

/// Sweep `[0, height - 1) x [0, width - 1)` to `Clean`, row-major, [`CLEAN_PASSES`] times.
pub fn clear_cycle<D: DisplayAdapter + ?Sized>(display: &mut D) {
    let (width, height) = display.resolution();
    for _ in 0..CLEAN_PASSES {
        for y in 0..height.saturating_sub(1) {
            for x in 0..width.saturating_sub(1) {
                display.set_pixel(x, y, InkyColor::Clean);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::display::{DisplayError, PngDisplay};

    /// Counts pixel writes on top of a preview frame.
    struct CountingDisplay {
        inner: PngDisplay,
        writes: usize,
    }

    impl DisplayAdapter for CountingDisplay {
        fn resolution(&self) -> (u32, u32) {
            self.inner.resolution()
        }
        fn set_pixel(&mut self, x: u32, y: u32, color: InkyColor) {
            self.writes += 1;
            self.inner.set_pixel(x, y, color);
        }
        fn set_image(&mut self, canvas: &Canvas) -> Result<(), DisplayError> {
            self.inner.set_image(canvas)
        }
        fn show(&mut self) -> Result<(), DisplayError> {
            self.inner.show()
        }
    }

    fn assert_swept_clean(frame: &Canvas) {
        for y in 0..frame.height() - 1 {
            for x in 0..frame.width() - 1 {
                assert_eq!(
                    frame.get_pixel(x, y),
                    Some(InkyColor::Clean),
                    "pixel ({}, {}) not clean",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_clear_cycle_sweeps_every_pixel() {
        let mut display = CountingDisplay {
            inner: PngDisplay::new(12, 7, "/unused.png"),
            writes: 0,
        };
        clear_cycle(&mut display);

        assert_swept_clean(display.inner.frame());
        assert_eq!(display.writes, CLEAN_PASSES * 11 * 6);
        // Last row and column lie outside the sweep
        assert_eq!(display.inner.frame().get_pixel(11, 0), Some(InkyColor::White));
        assert_eq!(display.inner.frame().get_pixel(0, 6), Some(InkyColor::White));
    }

    #[test]
    fn test_clear_cycle_is_idempotent() {
        let mut display = PngDisplay::new(9, 5, "/unused.png");
        clear_cycle(&mut display);
        let first = display.frame().clone();
        clear_cycle(&mut display);
        assert_eq!(&first, display.frame());
        assert_swept_clean(display.frame());
    }

    #[test]
    fn test_clear_cycle_on_degenerate_display() {
        let mut display = CountingDisplay {
            inner: PngDisplay::new(1, 1, "/unused.png"),
            writes: 0,
        };
        clear_cycle(&mut display);
        assert_eq!(display.writes, 0);
    }
}
