//! # Region Composer
//!
//! Draws the fixed structure of the dashboard: the two blue bars, the weather
//! icon, the header (date, last update, weather metrics) and the quote in the
//! footer. Every position comes from the [`Layout`]; nothing is measured.

use crate::canvas::InkyColor;
use crate::icons::IconBitmap;
use crate::layout::{FontChoice, Layout};
use crate::WeatherSnapshot;
use chrono::NaiveDateTime;
use embedded_graphics::{
    mono_font::MonoTextStyle,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// Panel accent used for the bars and badges.
pub const ACCENT: InkyColor = InkyColor::Blue;
/// Colour of the weather metric values.
pub const HIGHLIGHT: InkyColor = InkyColor::Yellow;

/// Draw `text` with its top-left corner at `(x, y)`. Newlines start new lines.
pub(crate) fn draw_text<D>(
    target: &mut D,
    text: &str,
    x: u32,
    y: u32,
    font: FontChoice,
    color: InkyColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = InkyColor>,
{
    let style = MonoTextStyle::new(font.font(), color);
    Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top).draw(target)?;
    Ok(())
}

pub struct RegionComposer<'a> {
    layout: &'a Layout,
}

impl<'a> RegionComposer<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Fill the header band and the quote band with the accent colour.
    pub fn draw_bars<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = InkyColor>,
    {
        let Size { width, height } = target.bounding_box().size;
        let fill = PrimitiveStyle::with_fill(ACCENT);

        Rectangle::new(Point::zero(), Size::new(width, self.layout.topbar_lower_y))
            .into_styled(fill)
            .draw(target)?;

        let footer_top = self.layout.bottombar_upper_y;
        Rectangle::new(
            Point::new(0, footer_top as i32),
            Size::new(width, height.saturating_sub(footer_top)),
        )
        .into_styled(fill)
        .draw(target)?;
        Ok(())
    }

    /// Stamp the opaque pixels of `icon` at `(icon_left, margin)`.
    pub fn draw_icon<D>(&self, target: &mut D, icon: &IconBitmap) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = InkyColor>,
    {
        let left = self.layout.icon_left as i32;
        let top = self.layout.margin as i32;
        target.draw_iter(
            icon.opaque_pixels()
                .map(|(x, y, color)| Pixel(Point::new(left + x as i32, top + y as i32), color)),
        )
    }

    /// Date heading, last-updated time, condition name and the metric table.
    pub fn draw_header<D>(
        &self,
        target: &mut D,
        weather: &WeatherSnapshot,
        now: NaiveDateTime,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = InkyColor>,
    {
        let layout = self.layout;
        let fonts = &layout.fonts;
        let white = InkyColor::White;

        let date = now.format("%a %d %b").to_string();
        draw_text(target, &date, layout.margin, layout.date_y, fonts.large, white)?;

        let updated = format!("Last updated: {}", now.format("%H:%M"));
        draw_text(target, &updated, layout.margin, layout.updated_y, fonts.small, white)?;

        draw_text(target, &weather.main, layout.icon_left, layout.metric_top, fonts.small, white)?;

        let metrics = [
            ("Temperature", format!("{:.0} °C", weather.temp)),
            ("Feels like", format!("{:.0} °C", weather.feel)),
            ("Pressure", format!("{} hPa", weather.pressure)),
            ("Humidity", format!("{} %", weather.humidity)),
        ];
        for (row, (name, value)) in metrics.iter().enumerate() {
            let y = layout.metric_top + row as u32 * layout.metric_spacing;
            draw_text(target, name, layout.weather_names_x, y, fonts.small, white)?;
            draw_text(target, value, layout.weather_values_x, y, fonts.small, HIGHLIGHT)?;
        }

        draw_text(
            target,
            &weather.desc,
            layout.weather_values_x,
            layout.description_y,
            fonts.small,
            HIGHLIGHT,
        )
    }

    /// Draw the pre-wrapped quote at the top of the footer band.
    pub fn draw_quote<D>(&self, target: &mut D, quote: &str) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = InkyColor>,
    {
        draw_text(
            target,
            quote,
            self.layout.margin,
            self.layout.bottombar_upper_y,
            self.layout.fonts.small,
            InkyColor::White,
        )
    }
}
