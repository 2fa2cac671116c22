//! # Dashboard Pipeline
//!
//! One refresh cycle, start to finish:
//!
//! ```text
//! Idle ──gate──▶ (no events: stop, display never opened)
//!   │
//!   ├─ open display, clear cycle ─────────▶ Cleared
//!   ├─ bars, icon, header, events, quote ─▶ Composed
//!   └─ snapshot, set_image, show ─────────▶ Committed
//! ```
//!
//! There is no retry and no rollback. The display handle and the decoded icon
//! are owned by [`Dashboard::refresh`] and dropped on every exit path.

use crate::canvas::{Canvas, InkyColor};
use crate::clear::clear_cycle;
use crate::composer::RegionComposer;
use crate::display::{DisplayAdapter, DisplayError};
use crate::events::EventRenderer;
use crate::fetch::FetchError;
use crate::icons::{IconBitmap, IconProvider};
use crate::layout::Layout;
use crate::text::wrap_by_word_count;
use crate::DashboardContent;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::convert::Infallible;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a refresh cycle.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("display error: {0}")]
    Display(#[from] DisplayError),

    #[error("icon fetch failed: {0}")]
    IconFetch(#[from] FetchError),

    #[error("icon decode failed: {0}")]
    IconDecode(#[from] image::ImageError),

    /// Event start that is neither a date-time nor a date
    #[error("invalid event start: {0}")]
    InvalidEventStart(String),
}

impl From<Infallible> for DashboardError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Progress of a refresh cycle, logged at each transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Cleared,
    Composed,
    Committed,
}

/// How a refresh cycle ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No events to show, display left untouched
    NoEvents,
    /// Frame handed to the display and shown
    Committed,
}

fn enter(state: CycleState) {
    info!("🔄 Dashboard cycle: {:?}", state);
}

/// Renders [`DashboardContent`] onto a display.
pub struct Dashboard<I> {
    layout: Layout,
    icons: I,
    snapshot_path: Option<PathBuf>,
}

impl<I: IconProvider> Dashboard<I> {
    pub fn new(layout: Layout, icons: I) -> Self {
        Self {
            layout,
            icons,
            snapshot_path: None,
        }
    }

    /// Also save every composed frame as a PNG at `path`.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Run one refresh cycle.
    ///
    /// `open_display` is only called once the cycle is known to draw
    /// something, so an empty event list never wakes the panel.
    pub fn refresh<D, F>(
        &self,
        content: &DashboardContent,
        now: NaiveDateTime,
        open_display: F,
    ) -> Result<CycleOutcome, DashboardError>
    where
        D: DisplayAdapter,
        F: FnOnce() -> Result<D, DisplayError>,
    {
        enter(CycleState::Idle);
        if content.events.is_empty() {
            info!("📭 No upcoming events, leaving the display untouched");
            return Ok(CycleOutcome::NoEvents);
        }

        let mut display = open_display()?;
        clear_cycle(&mut display);
        enter(CycleState::Cleared);

        let (width, height) = display.resolution();
        let mut canvas = Canvas::new(width, height, InkyColor::White);
        self.compose(&mut canvas, content, now)?;
        enter(CycleState::Composed);

        if let Some(path) = &self.snapshot_path {
            match canvas.save_png(path) {
                Ok(()) => debug!("Snapshot written to {}", path.display()),
                Err(e) => warn!("⚠️  Could not write snapshot {}: {}", path.display(), e),
            }
        }

        display.set_image(&canvas)?;
        display.show()?;
        enter(CycleState::Committed);
        Ok(CycleOutcome::Committed)
    }

    fn compose(
        &self,
        canvas: &mut Canvas,
        content: &DashboardContent,
        now: NaiveDateTime,
    ) -> Result<(), DashboardError> {
        let composer = RegionComposer::new(&self.layout);
        composer.draw_bars(canvas)?;

        let bytes = self.icons.fetch_icon(&content.weather.icon)?;
        let icon = IconBitmap::decode(&bytes, self.layout.icon_size)?;
        composer.draw_icon(canvas, &icon)?;
        drop(icon);

        composer.draw_header(canvas, &content.weather, now)?;

        EventRenderer::new(&self.layout).render(canvas, &content.events)?;
        debug!("Rendered {} event(s)", content.events.len());

        let quote = wrap_by_word_count(&content.quote, self.layout.quote_words_per_line);
        composer.draw_quote(canvas, &quote)?;
        Ok(())
    }
}
