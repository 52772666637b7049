pub mod canvas;
pub mod format;
pub mod layout;
pub mod palette;

pub use canvas::{Canvas, Fonts, ImageCanvas, Point, RecordingCanvas};
pub use layout::{draw_events, draw_footer, LayoutConfig, LayoutSummary};
pub use palette::{ColorMap, PanelColor};

use crate::calendar::{group_by_day, PiEvent};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Group the events by day, lay them out from `now`'s date onwards and add
/// the footer. Returns what the layout pass fit.
pub fn render_calendar<C: Canvas, Tz: TimeZone>(
    canvas: &mut C,
    events: Vec<PiEvent>,
    now: &DateTime<Tz>,
    layout: &LayoutConfig,
    colors: &ColorMap,
    address: &str,
) -> LayoutSummary
where
    Tz::Offset: Display,
{
    let buckets = group_by_day(events);
    let summary = draw_events(canvas, &buckets, now.date_naive(), layout, colors);
    tracing::debug!("All events have been drawn: {:?}", summary);

    draw_footer(canvas, layout, now, address);
    summary
}
