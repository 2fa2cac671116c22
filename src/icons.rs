//! # Weather Icons
//!
//! The header shows the forecast's condition icon. Icons arrive as PNG bytes
//! from an [`IconProvider`], get decoded and resized once per cycle into an
//! [`IconBitmap`], and are then stamped onto the canvas through their alpha
//! mask by the region composer.

use crate::canvas::InkyColor;
use crate::fetch::FetchError;
use image::imageops::{self, FilterType};
use image::ImageResult;
use log::debug;

/// Alpha values at or above this are treated as opaque.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Source of icon bitmaps, keyed by the weather API's icon identifier.
pub trait IconProvider {
    fn fetch_icon(&self, icon_id: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches OpenWeatherMap icons over HTTP.
///
/// The dashboard pipeline is synchronous, so requests are driven to
/// completion on the runtime behind `runtime`. Must not be called from inside
/// that runtime's async context.
pub struct HttpIconProvider {
    client: reqwest::Client,
    runtime: tokio::runtime::Handle,
    base_url: String,
}

impl HttpIconProvider {
    pub fn new(
        client: reqwest::Client,
        runtime: tokio::runtime::Handle,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            runtime,
            base_url: base_url.into(),
        }
    }

    fn icon_url(&self, icon_id: &str) -> String {
        format!("{}/{}.png", self.base_url.trim_end_matches('/'), icon_id)
    }
}

impl IconProvider for HttpIconProvider {
    fn fetch_icon(&self, icon_id: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.icon_url(icon_id);
        debug!("Fetching icon {}", url);
        self.runtime.block_on(async {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        })
    }
}

/// A decoded icon, resized to a square and reduced to palette inks.
///
/// Transparent pixels (alpha below [`ALPHA_THRESHOLD`]) are `None` and leave
/// the canvas untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct IconBitmap {
    size: u32,
    pixels: Vec<Option<InkyColor>>,
}

impl IconBitmap {
    /// Decode `bytes` (any format the `image` crate was built with) into a
    /// `size` x `size` palette bitmap.
    pub fn decode(bytes: &[u8], size: u32) -> ImageResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let resized = imageops::resize(&rgba, size, size, FilterType::Triangle);
        let pixels = resized
            .pixels()
            .map(|pixel| {
                let [r, g, b, a] = pixel.0;
                (a >= ALPHA_THRESHOLD).then(|| InkyColor::nearest([r, g, b]))
            })
            .collect();
        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Opaque pixels as `(x, y, color)`, relative to the icon's top-left corner.
    pub fn opaque_pixels(&self) -> impl Iterator<Item = (u32, u32, InkyColor)> + '_ {
        self.pixels.iter().enumerate().filter_map(move |(i, pixel)| {
            pixel.map(|color| (i as u32 % self.size, i as u32 / self.size, color))
        })
    }
}
