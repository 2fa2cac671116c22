//! # Configuration Management
//!
//! This module loads the dashboard configuration from `dashboard-config.toml`.
//! Every section has defaults, so a partial file (or none at all) still gives a
//! runnable dashboard; only the weather API key and calendar ID have to be
//! provided for real data.
//!
//! ```toml
//! [weather]
//! api_key = "..."
//! lat = 51.5
//! lon = -0.12
//!
//! [calendar]
//! calendar_id = "primary"
//! token_path = "token.json"
//!
//! [display]
//! snapshot_path = "/tmp/dashboard.png"
//!
//! [layout.fonts]
//! normal = "font9x18_bold"
//! ```

use crate::layout::Layout;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard-config.toml";

/// Application configuration loaded from dashboard-config.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub calendar: CalendarConfig,
    pub quote: QuoteConfig,
    pub icons: IconConfig,
    pub display: DisplayConfig,
    pub layout: Layout,
}

/// OpenWeatherMap One Call settings
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: String,
    pub lat: f64,
    pub lon: f64,
    pub endpoint: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            api_key: String::new(),
            lat: 51.5074,
            lon: -0.1278,
            endpoint: "https://api.openweathermap.org/data/3.0/onecall".to_string(),
        }
    }
}

/// Google Calendar settings
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub calendar_id: String,
    /// Authorized user file holding the OAuth access token
    pub token_path: PathBuf,
    /// Upper bound on events requested (and rendered)
    pub max_events: u32,
    pub endpoint: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            calendar_id: "primary".to_string(),
            token_path: PathBuf::from("token.json"),
            max_events: 6,
            endpoint: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub url: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            url: "https://zenquotes.io?api=random".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct IconConfig {
    pub base_url: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            base_url: "http://openweathermap.org/img/w".to_string(),
        }
    }
}

/// Largest frame accepted from the config file (16 megapixels).
pub const MAX_PIXELS: u64 = 16_000_000;

/// Panel and output configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Write every composed frame to this PNG as well (debugging aid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    /// Where the preview adapter writes when no panel is available
    pub preview_path: PathBuf,
    pub hardware: HardwareConfig,
}

impl DisplayConfig {
    /// Whether the resolution is non-empty and small enough to allocate.
    pub fn resolution_is_sane(&self) -> bool {
        let pixels = u64::from(self.width) * u64::from(self.height);
        pixels > 0 && pixels <= MAX_PIXELS
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 800,  // Inky Impression 7.3"
            height: 480, // Inky Impression 7.3"
            snapshot_path: None,
            preview_path: PathBuf::from("dashboard-preview.png"),
            hardware: HardwareConfig::default(),
        }
    }
}

/// SPI device and GPIO lines of the panel (BCM numbering)
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub spi_device: PathBuf,
    pub gpio_chip: PathBuf,
    pub dc_pin: u32,
    pub reset_pin: u32,
    pub busy_pin: u32,
    pub spi_speed_hz: u32,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        HardwareConfig {
            spi_device: PathBuf::from("/dev/spidev0.0"),
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
            dc_pin: 22,
            reset_pin: 27,
            busy_pin: 17,
            spi_speed_hz: 3_000_000,
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(mut config) => {
                    info!("Loaded configuration from {}", path.display());
                    if !config.display.resolution_is_sane() {
                        let fallback = DisplayConfig::default();
                        warn!(
                            "Display resolution {}x{} out of range, using {}x{}",
                            config.display.width,
                            config.display.height,
                            fallback.width,
                            fallback.height
                        );
                        config.display.width = fallback.width;
                        config.display.height = fallback.height;
                    }
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format in {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file at {}, using default configuration", path.display());
                Self::default()
            }
        }
    }
}
