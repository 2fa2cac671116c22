//! # Dashboard Layout
//!
//! All coordinates used by the composer and the event renderer live here, in
//! one immutable value that is passed into the drawing components. The
//! defaults are tuned for the 800x480 7-colour panel:
//!
//! ```text
//!  0 ┌──────────────────────────────────────────────┐
//!    │ date / last updated     metrics      icon    │  header band (BLUE)
//! 100├──────────────────────────────────────────────┤
//!    │ [badge] start summary                        │
//!    │         location                             │  event band (WHITE)
//!    │ ...                                          │
//! 438├──────────────────────────────────────────────┤
//!    │ "quote" - author                             │  quote band (BLUE)
//! 480└──────────────────────────────────────────────┘
//! ```
//!
//! Nothing is derived from content size. Text that does not fit its band
//! simply overflows.

use embedded_graphics::mono_font::{iso_8859_1, MonoFont};
use serde::{Deserialize, Serialize};

/// Fonts that can be selected from the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontChoice {
    Profont24,
    Profont18,
    Profont14,
    Font10x20,
    Font9x18Bold,
    Font9x18,
    Font7x13,
    Font6x13,
}

impl FontChoice {
    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontChoice::Profont24 => &profont::PROFONT_24_POINT,
            FontChoice::Profont18 => &profont::PROFONT_18_POINT,
            FontChoice::Profont14 => &profont::PROFONT_14_POINT,
            FontChoice::Font10x20 => &iso_8859_1::FONT_10X20,
            FontChoice::Font9x18Bold => &iso_8859_1::FONT_9X18_BOLD,
            FontChoice::Font9x18 => &iso_8859_1::FONT_9X18,
            FontChoice::Font7x13 => &iso_8859_1::FONT_7X13,
            FontChoice::Font6x13 => &iso_8859_1::FONT_6X13,
        }
    }
}

/// The three font sizes used on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSet {
    /// Date heading
    pub large: FontChoice,
    /// Event lines and badges
    pub normal: FontChoice,
    /// Weather metrics, locations, last-updated line and the quote
    pub small: FontChoice,
}

impl Default for FontSet {
    fn default() -> Self {
        FontSet {
            large: FontChoice::Profont24,
            normal: FontChoice::Font10x20,
            small: FontChoice::Font7x13,
        }
    }
}

/// Fixed layout constants, loaded from the `[layout]` config section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// First row below the header band
    pub topbar_lower_y: u32,
    /// First row of the quote band
    pub bottombar_upper_y: u32,
    pub margin: u32,
    /// Top of the date heading
    pub date_y: u32,
    /// Top of the "Last updated" line
    pub updated_y: u32,
    pub weather_names_x: u32,
    pub weather_values_x: u32,
    /// Top of the first weather metric row
    pub metric_top: u32,
    pub metric_spacing: u32,
    /// Top of the weather description line under the metric values
    pub description_y: u32,
    pub icon_left: u32,
    /// Icons are resized to `icon_size` x `icon_size`
    pub icon_size: u32,
    /// Vertical distance between consecutive event rows
    pub event_height: u32,
    /// Offset of the location line below its event line
    pub location_offset: u32,
    pub badge_padding: u32,
    pub badge_radius: u32,
    /// Horizontal gap between a badge and the event text
    pub badge_gap: u32,
    pub quote_words_per_line: usize,
    pub fonts: FontSet,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            topbar_lower_y: 100,
            bottombar_upper_y: 438,
            margin: 10,
            date_y: 8,
            updated_y: 68,
            weather_names_x: 450,
            weather_values_x: 560,
            metric_top: 2,
            metric_spacing: 16,
            description_y: 68,
            icon_left: 700,
            icon_size: 100,
            event_height: 50,
            location_offset: 24,
            badge_padding: 6,
            badge_radius: 6,
            badge_gap: 8,
            quote_words_per_line: 20,
            fonts: FontSet::default(),
        }
    }
}

impl Layout {
    /// Top of the `index`-th event row (0-based).
    pub fn event_row_y(&self, index: usize) -> u32 {
        self.topbar_lower_y + index as u32 * self.event_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_do_not_overlap() {
        let layout = Layout::default();
        assert!(layout.topbar_lower_y < layout.bottombar_upper_y);
        assert!(layout.weather_names_x < layout.weather_values_x);
        assert!(layout.weather_values_x < layout.icon_left);
    }

    #[test]
    fn test_event_row_offsets() {
        let layout = Layout::default();
        for i in 0..6 {
            assert_eq!(
                layout.event_row_y(i),
                layout.topbar_lower_y + i as u32 * layout.event_height
            );
        }
        assert_eq!(layout.event_row_y(0), 100);
        assert_eq!(layout.event_row_y(3), 250);
    }

    #[test]
    fn test_partial_layout_section_keeps_defaults() {
        let parsed: Layout = toml::from_str(
            r#"
event_height = 60

[fonts]
normal = "font9x18_bold"
"#,
        )
        .unwrap();
        assert_eq!(parsed.event_height, 60);
        assert_eq!(parsed.fonts.normal, FontChoice::Font9x18Bold);
        assert_eq!(parsed.fonts.large, FontChoice::Profont24);
        assert_eq!(parsed.topbar_lower_y, 100);
    }

    #[test]
    fn test_font_sizes_are_ordered() {
        let fonts = FontSet::default();
        let large = fonts.large.font().character_size.height;
        let normal = fonts.normal.font().character_size.height;
        let small = fonts.small.font().character_size.height;
        assert!(large > normal && normal > small);
    }
}
