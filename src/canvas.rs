//! # Palette-Indexed Canvas
//!
//! The 7-colour panel can only show a handful of inks, so every drawing
//! surface in the dashboard stores palette entries rather than RGB values.
//! [`Canvas`] implements the `embedded-graphics` [`DrawTarget`] trait, which
//! lets the composer use the regular text and primitive drawables while the
//! palette invariant holds by construction.

use core::convert::Infallible;
use embedded_graphics::{pixelcolor::PixelColor, prelude::*};
use image::{ImageResult, Rgb, RgbImage};
use std::path::Path;

/// Native colours of the 7-colour panel, numbered as the controller expects them.
///
/// `Clean` is not an ink: it drives every particle to its neutral position and
/// is only used by the pre-draw clear cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InkyColor {
    Black = 0,
    White = 1,
    Green = 2,
    Blue = 3,
    Red = 4,
    Yellow = 5,
    Orange = 6,
    Clean = 7,
}

impl PixelColor for InkyColor {
    type Raw = ();
}

impl InkyColor {
    /// Every palette entry that can be used as an ink.
    pub const INKS: [InkyColor; 7] = [
        InkyColor::Black,
        InkyColor::White,
        InkyColor::Green,
        InkyColor::Blue,
        InkyColor::Red,
        InkyColor::Yellow,
        InkyColor::Orange,
    ];

    /// Controller index of this colour (lower nibble of the frame buffer).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Approximate on-screen RGB value, used for previews and quantization.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            InkyColor::Black => [0, 0, 0],
            InkyColor::White => [255, 255, 255],
            InkyColor::Green => [0, 255, 0],
            InkyColor::Blue => [0, 0, 255],
            InkyColor::Red => [255, 0, 0],
            InkyColor::Yellow => [255, 255, 0],
            InkyColor::Orange => [255, 140, 0],
            InkyColor::Clean => [224, 224, 224],
        }
    }

    /// Closest ink to an arbitrary RGB value (squared euclidean distance).
    pub fn nearest(rgb: [u8; 3]) -> InkyColor {
        let distance = |color: &InkyColor| {
            color
                .rgb()
                .iter()
                .zip(rgb.iter())
                .map(|(&a, &b)| {
                    let d = a as i32 - b as i32;
                    d * d
                })
                .sum::<i32>()
        };
        InkyColor::INKS
            .iter()
            .copied()
            .min_by_key(distance)
            .unwrap_or(InkyColor::Black)
    }
}

/// Fixed-size raster restricted to the panel palette.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<InkyColor>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: InkyColor) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel slice.
    pub fn pixels(&self) -> &[InkyColor] {
        &self.pixels
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<InkyColor> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set a single pixel; coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: InkyColor) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Number of pixels holding `color`.
    pub fn count(&self, color: InkyColor) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Number of pixels holding `color` inside the half-open rectangle.
    pub fn count_in(&self, color: InkyColor, x: (u32, u32), y: (u32, u32)) -> usize {
        (y.0..y.1.min(self.height))
            .flat_map(|py| (x.0..x.1.min(self.width)).map(move |px| (px, py)))
            .filter(|&(px, py)| self.get_pixel(px, py) == Some(color))
            .count()
    }

    /// Render the canvas as an RGB image using the palette's preview colours.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let color = self.get_pixel(x, y).unwrap_or(InkyColor::White);
            Rgb(color.rgb())
        })
    }

    /// Write a PNG preview of the canvas.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_rgb_image().save(path)
    }

    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = InkyColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_new_canvas_is_filled() {
        let canvas = Canvas::new(8, 4, InkyColor::White);
        assert_eq!(canvas.pixels().len(), 32);
        assert_eq!(canvas.count(InkyColor::White), 32);
    }

    #[test]
    fn test_index_past_u32_range() {
        // 70_000 * 70_000 does not fit in a u32
        let mut canvas = Canvas::new(70_000, 0, InkyColor::White);
        assert!(canvas.pixels().is_empty());
        assert_eq!(canvas.get_pixel(69_999, 69_999), None);
        canvas.set_pixel(69_999, 69_999, InkyColor::Black);
        assert_eq!(canvas.count(InkyColor::Black), 0);

        let tall = Canvas::new(1, 70_000, InkyColor::White);
        assert_eq!(tall.get_pixel(0, 69_999), Some(InkyColor::White));
        assert_eq!(tall.pixels().len(), 70_000);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut canvas = Canvas::new(4, 4, InkyColor::White);
        canvas.set_pixel(4, 0, InkyColor::Black);
        canvas.set_pixel(0, 99, InkyColor::Black);
        assert_eq!(canvas.count(InkyColor::Black), 0);
        assert_eq!(canvas.get_pixel(4, 0), None);
    }

    #[test]
    fn test_draw_target_clips_negative_points() {
        let mut canvas = Canvas::new(10, 10, InkyColor::White);
        Rectangle::new(Point::new(-5, -5), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(InkyColor::Red))
            .draw(&mut canvas)
            .unwrap();
        assert_eq!(canvas.count(InkyColor::Red), 25);
        assert_eq!(canvas.get_pixel(4, 4), Some(InkyColor::Red));
        assert_eq!(canvas.get_pixel(5, 5), Some(InkyColor::White));
    }

    #[test]
    fn test_nearest_never_picks_clean() {
        assert_eq!(InkyColor::nearest([250, 10, 5]), InkyColor::Red);
        assert_eq!(InkyColor::nearest([20, 20, 20]), InkyColor::Black);
        assert_eq!(InkyColor::nearest([240, 240, 30]), InkyColor::Yellow);
        assert_eq!(InkyColor::nearest([225, 225, 225]), InkyColor::White);
        for rgb in [[224, 224, 224], [200, 200, 200], [128, 128, 128]] {
            assert_ne!(InkyColor::nearest(rgb), InkyColor::Clean);
        }
    }

    #[test]
    fn test_count_in_region() {
        let mut canvas = Canvas::new(10, 10, InkyColor::White);
        canvas.set_pixel(2, 2, InkyColor::Blue);
        canvas.set_pixel(8, 8, InkyColor::Blue);
        assert_eq!(canvas.count_in(InkyColor::Blue, (0, 5), (0, 5)), 1);
        assert_eq!(canvas.count_in(InkyColor::Blue, (0, 50), (0, 50)), 2);
    }

    #[test]
    fn test_png_preview_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let mut canvas = Canvas::new(6, 3, InkyColor::White);
        canvas.set_pixel(1, 1, InkyColor::Yellow);
        canvas.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (6, 3));
        assert_eq!(loaded.get_pixel(1, 1).0, InkyColor::Yellow.rgb());
        assert_eq!(loaded.get_pixel(0, 0).0, InkyColor::White.rgb());
    }
}
