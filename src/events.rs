//! # Event Renderer
//!
//! Draws the upcoming events into the middle band, one fixed-height row per
//! event in the order the calendar returned them.
//!
//! ## Row Anatomy
//! ```text
//! y                    ┌──────┐
//!                      │ Work │  Mon 4 Mar 2024, 09:00 standup
//!                      └──────┘
//! y + location_offset            Room 2
//! ```
//! The badge only appears when the summary carries a `label:` prefix. Its
//! width follows the measured label; everything else sits at fixed offsets.

use crate::canvas::InkyColor;
use crate::composer::{draw_text, ACCENT};
use crate::dashboard::DashboardError;
use crate::layout::Layout;
use crate::text::split_label;
use crate::{CalendarEvent, EventStart};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use embedded_graphics::{
    mono_font::MonoTextStyle,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle},
    text::{renderer::TextRenderer, Baseline, Text},
};

/// Display format of an event start, e.g. `Mon 4 Mar 2024, 09:00`.
pub const START_FORMAT: &str = "%a %-d %b %Y, %H:%M";

/// ISO-8601 date-times with an explicit offset, beyond strict RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// ISO-8601 local date-times, `T` or space separated, seconds optional.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    // Offset timestamps keep their own wall-clock time
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
}

fn parse_start(start: &EventStart) -> Option<NaiveDateTime> {
    if let Some(date_time) = &start.date_time {
        return parse_date_time(date_time);
    }
    let date = NaiveDate::parse_from_str(start.date.as_deref()?, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0)
}

/// Format an event start for display. All-day events show midnight.
pub fn format_start(start: &EventStart) -> Result<String, DashboardError> {
    let parsed = parse_start(start).ok_or_else(|| {
        let raw = start
            .date_time
            .as_deref()
            .or(start.date.as_deref())
            .unwrap_or("<missing>");
        DashboardError::InvalidEventStart(raw.to_string())
    })?;
    Ok(parsed.format(START_FORMAT).to_string())
}

pub struct EventRenderer<'a> {
    layout: &'a Layout,
}

impl<'a> EventRenderer<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Render every event at its row anchor.
    pub fn render<D>(&self, target: &mut D, events: &[CalendarEvent]) -> Result<(), DashboardError>
    where
        D: DrawTarget<Color = InkyColor>,
        DashboardError: From<D::Error>,
    {
        for (index, event) in events.iter().enumerate() {
            self.render_event(target, event, self.layout.event_row_y(index))?;
        }
        Ok(())
    }

    /// Render one event with its row starting at `y`.
    pub fn render_event<D>(
        &self,
        target: &mut D,
        event: &CalendarEvent,
        y: u32,
    ) -> Result<(), DashboardError>
    where
        D: DrawTarget<Color = InkyColor>,
        DashboardError: From<D::Error>,
    {
        let layout = self.layout;
        let start = format_start(&event.start)?;
        let (label, remainder) = split_label(&event.summary);

        let text_x = match label {
            Some(label) => {
                let badge_width = self.draw_badge(target, label, y)?;
                layout.margin + badge_width + layout.badge_gap
            }
            None => layout.margin,
        };

        let line = format!("{} {}", start, remainder.trim_start());
        draw_text(target, &line, text_x, y, layout.fonts.normal, InkyColor::Black)?;

        if let Some(location) = &event.location {
            draw_text(
                target,
                location,
                text_x,
                y + layout.location_offset,
                layout.fonts.small,
                InkyColor::Black,
            )?;
        }
        Ok(())
    }

    /// Draw the label badge at `(margin, y)` and return its width.
    fn draw_badge<D>(&self, target: &mut D, label: &str, y: u32) -> Result<u32, D::Error>
    where
        D: DrawTarget<Color = InkyColor>,
    {
        let layout = self.layout;
        let font = layout.fonts.normal.font();
        let style = MonoTextStyle::new(font, InkyColor::White);

        let label_width = style
            .measure_string(label, Point::zero(), Baseline::Top)
            .bounding_box
            .size
            .width;
        let width = label_width + 2 * layout.badge_padding;
        let height = font.character_size.height + 2;

        let origin = Point::new(layout.margin as i32, y as i32);
        RoundedRectangle::with_equal_corners(
            Rectangle::new(origin, Size::new(width, height)),
            Size::new(layout.badge_radius, layout.badge_radius),
        )
        .into_styled(PrimitiveStyle::with_fill(ACCENT))
        .draw(target)?;

        Text::with_baseline(
            label,
            origin + Point::new(layout.badge_padding as i32, 1),
            style,
            Baseline::Top,
        )
        .draw(target)?;

        Ok(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    fn event(summary: &str, location: Option<&str>) -> CalendarEvent {
        CalendarEvent {
            start: EventStart::at("2024-03-04T09:00:00"),
            summary: summary.to_string(),
            location: location.map(str::to_string),
        }
    }

    fn blank() -> Canvas {
        Canvas::new(800, 480, InkyColor::White)
    }

    #[test]
    fn test_format_naive_date_time() {
        let start = EventStart::at("2024-03-04T09:00:00");
        assert_eq!(format_start(&start).unwrap(), "Mon 4 Mar 2024, 09:00");

        let fractional = EventStart::at("2024-03-04T09:05:30.250");
        assert_eq!(format_start(&fractional).unwrap(), "Mon 4 Mar 2024, 09:05");

        for raw in [
            "2024-03-04T09:00",
            "2024-03-04T09:00Z",
            "2024-03-04 09:00:00",
            "2024-03-04 09:00:00.5",
            "2024-03-04 09:00",
        ] {
            assert_eq!(
                format_start(&EventStart::at(raw)).unwrap(),
                "Mon 4 Mar 2024, 09:00",
                "failed to format {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_format_keeps_own_offset() {
        let start = EventStart::at("2024-03-04T09:00:00+01:00");
        assert_eq!(format_start(&start).unwrap(), "Mon 4 Mar 2024, 09:00");

        let utc = EventStart::at("2024-12-25T18:45:00Z");
        assert_eq!(format_start(&utc).unwrap(), "Wed 25 Dec 2024, 18:45");

        for raw in [
            "2024-03-04T09:00+01:00",
            "2024-03-04T09:00-05:00",
            "2024-03-04 09:00:00+01:00",
            "2024-03-04 09:00+01:00",
        ] {
            assert_eq!(
                format_start(&EventStart::at(raw)).unwrap(),
                "Mon 4 Mar 2024, 09:00",
                "failed to format {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_format_all_day_is_midnight() {
        let start = EventStart::all_day("2024-03-05");
        assert_eq!(format_start(&start).unwrap(), "Tue 5 Mar 2024, 00:00");
    }

    #[test]
    fn test_format_prefers_date_time() {
        let start = EventStart {
            date_time: Some("2024-03-04T09:00:00".to_string()),
            date: Some("2024-03-05".to_string()),
        };
        assert_eq!(format_start(&start).unwrap(), "Mon 4 Mar 2024, 09:00");
    }

    #[test]
    fn test_invalid_start_is_error() {
        let err = format_start(&EventStart::at("next tuesday")).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidEventStart(ref s) if s == "next tuesday"));

        let missing = format_start(&EventStart::default()).unwrap_err();
        assert!(matches!(missing, DashboardError::InvalidEventStart(_)));
    }

    #[test]
    fn test_badge_drawn_for_label() {
        let layout = Layout::default();
        let renderer = EventRenderer::new(&layout);
        let mut canvas = blank();
        renderer
            .render_event(&mut canvas, &event("Work: standup", None), 100)
            .unwrap();

        let badge_rows = (100, 100 + 22);
        let blue = canvas.count_in(ACCENT, (0, 100), badge_rows);
        assert!(blue > 0, "badge should be filled with the accent colour");
        // Label text is white on the badge
        assert!(canvas.count_in(InkyColor::White, (16, 60), (101, 121)) > 0);
        // Nothing is drawn above the row
        assert_eq!(canvas.count_in(ACCENT, (0, 800), (0, 100)), 0);
    }

    #[test]
    fn test_text_shifted_past_badge() {
        let layout = Layout::default();
        let renderer = EventRenderer::new(&layout);
        let mut canvas = blank();
        renderer
            .render_event(&mut canvas, &event("Work: standup", None), 100)
            .unwrap();

        // "Work" is 4 glyphs of 10 px, plus padding on both sides
        let badge_width = 40 + 2 * layout.badge_padding;
        let text_x = layout.margin + badge_width + layout.badge_gap;
        assert_eq!(canvas.count_in(InkyColor::Black, (0, text_x), (100, 150)), 0);
        assert!(canvas.count_in(InkyColor::Black, (text_x, 800), (100, 120)) > 0);
        assert_eq!(canvas.count_in(ACCENT, (layout.margin + badge_width, 800), (100, 150)), 0);
    }

    #[test]
    fn test_no_badge_without_label() {
        let layout = Layout::default();
        let renderer = EventRenderer::new(&layout);
        let mut canvas = blank();
        renderer
            .render_event(&mut canvas, &event("Dentist", None), 100)
            .unwrap();

        assert_eq!(canvas.count(ACCENT), 0);
        assert!(canvas.count_in(InkyColor::Black, (layout.margin, layout.margin + 10), (100, 120)) > 0);
        assert_eq!(canvas.count_in(InkyColor::Black, (0, layout.margin), (0, 480)), 0);
    }

    #[test]
    fn test_location_line() {
        let layout = Layout::default();
        let renderer = EventRenderer::new(&layout);
        let mut with = blank();
        let mut without = blank();
        renderer
            .render_event(&mut with, &event("Dentist", Some("Main St 4")), 100)
            .unwrap();
        renderer
            .render_event(&mut without, &event("Dentist", None), 100)
            .unwrap();

        let location_rows = (124, 124 + 13);
        assert!(with.count_in(InkyColor::Black, (0, 800), location_rows) > 0);
        assert_eq!(without.count_in(InkyColor::Black, (0, 800), location_rows), 0);
    }

    #[test]
    fn test_rows_anchored_by_index() {
        let layout = Layout::default();
        let renderer = EventRenderer::new(&layout);
        let mut canvas = blank();
        let events = vec![event("One", None), event("Two", None), event("Three", None)];
        renderer.render(&mut canvas, &events).unwrap();

        for index in 0..3 {
            let y = layout.event_row_y(index);
            assert!(
                canvas.count_in(InkyColor::Black, (0, 800), (y, y + 20)) > 0,
                "row {} missing at y={}",
                index,
                y
            );
        }
        // Gap between the text line and the next row stays empty
        assert_eq!(canvas.count_in(InkyColor::Black, (0, 800), (125, 150)), 0);
        assert_eq!(canvas.count_in(InkyColor::Black, (0, 800), (250, 438)), 0);
    }

    #[test]
    fn test_render_stops_at_invalid_start() {
        let layout = Layout::default();
        let renderer = EventRenderer::new(&layout);
        let mut canvas = blank();
        let mut broken = event("Broken", None);
        broken.start = EventStart::at("soon");
        let events = vec![event("Fine", None), broken, event("Never", None)];

        assert!(renderer.render(&mut canvas, &events).is_err());
        assert!(canvas.count_in(InkyColor::Black, (0, 800), (100, 120)) > 0);
        assert_eq!(canvas.count_in(InkyColor::Black, (0, 800), (150, 438)), 0);
    }
}
