//! # Inky Dashboard Core Library
//!
//! This library renders a daily dashboard (date, weather, upcoming calendar
//! events and a quote of the day) onto the 7-colour 800x480 e-paper panel. It
//! is built for a Raspberry Pi that wakes up on a timer, draws one frame and
//! exits.
//!
//! ## Design Philosophy
//!
//! ### Fixed Layout
//! - **Three bands**: header/weather, event list, quote footer. Band boundaries
//!   are constants of the [`layout::Layout`], never derived from content
//! - **No measuring**: text that does not fit simply overflows its band. The
//!   only measured text is an event label, so its badge can hug it
//! - **Explicit configuration**: fonts and coordinates are passed into the
//!   drawing components instead of living in globals, so alternative layouts
//!   can be tested side by side
//!
//! ### Palette Discipline
//! - Every surface stores [`canvas::InkyColor`] entries, so an RGB value can never
//!   reach the panel
//! - The weather icon is the only blended element: it is masked by its alpha
//!   channel and quantized to the nearest ink before it touches the canvas
//!
//! ### Refresh Cycle
//! 1. **Gate**: no events, no refresh. The display is not even opened
//! 2. **Clear**: two full sweeps to the neutral `Clean` value against ghosting
//! 3. **Compose**: bars, icon, header, events, quote
//! 4. **Commit**: `set_image` then `show`
//!
//! ## Core Types
//!
//! The content fed into one refresh cycle:
//! - [`CalendarEvent`]: one upcoming event, as returned by the calendar API
//! - [`WeatherSnapshot`]: today's forecast summary
//! - [`DashboardContent`]: everything the pipeline needs for one frame

use serde::{Deserialize, Serialize};

// Module declarations
pub mod calendar;
pub mod canvas;
pub mod clear;
pub mod composer;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod events;
pub mod fetch;
#[cfg(feature = "hardware")]
pub mod gpio_cdev;
#[cfg(feature = "hardware")]
pub mod hw_spi_spidev;
pub mod icons;
pub mod inky_ac073;
pub mod layout;
pub mod quote;
pub mod text;
pub mod weather;

/// Start of a calendar event.
///
/// Mirrors the calendar API's start object: timed events carry `dateTime`,
/// all-day events only carry `date`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    /// ISO-8601 date-time, with or without offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// ISO-8601 calendar date (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventStart {
    pub fn at(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
        }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date_time: None,
            date: Some(date.into()),
        }
    }
}

/// One upcoming calendar event.
///
/// The summary may carry a `label:` prefix, which the event renderer turns
/// into a coloured badge.
///
/// # Example
/// ```
/// use dashboard_lib::{CalendarEvent, EventStart};
///
/// let event = CalendarEvent {
///     start: EventStart::at("2024-03-04T09:00:00"),
///     summary: "Work: standup".to_string(),
///     location: Some("Room 2".to_string()),
/// };
/// assert!(event.start.date.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: EventStart,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Today's weather, already reduced from the forecast API response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Day temperature in °C
    pub temp: f64,
    /// Day "feels like" temperature in °C
    pub feel: f64,
    /// Sea-level pressure in hPa
    pub pressure: i64,
    /// Relative humidity in %
    pub humidity: i64,
    /// Short condition name (e.g. "Clouds")
    pub main: String,
    /// Longer condition description (e.g. "overcast clouds")
    pub desc: String,
    /// Icon identifier understood by the icon provider (e.g. "04d")
    pub icon: String,
}

/// Everything one refresh cycle renders.
///
/// Events arrive already ordered and capped by the calendar client; the
/// quote is raw and gets wrapped by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardContent {
    pub events: Vec<CalendarEvent>,
    pub weather: WeatherSnapshot,
    pub quote: String,
}
