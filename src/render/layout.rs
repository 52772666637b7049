use super::canvas::{Canvas, FontFace, FontStyle, Point};
use super::format::{format_time_range, format_weekday, split_summary};
use super::palette::{ColorMap, PanelColor};
use crate::calendar::{DayBuckets, PiEvent};
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use serde::Deserialize;
use std::fmt::Display;
use tracing::{debug, info};

/// Every position and size the layout uses, in pixels.
///
/// Offsets are relative to the cursor of the day or event being drawn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,

    pub origin_x: i32,
    pub origin_y: i32,
    /// Right edge of event boxes and header rules
    pub max_x: i32,
    /// Pagination bound, nothing new starts past it
    pub max_y: i32,

    pub day_header_height: i32,
    pub event_height: i32,
    /// Gap between events, and between a header and its first event
    pub event_spacer: i32,
    /// Characters allowed on the first summary line
    pub event_char_limit: usize,
    pub days_to_render: u64,

    pub day_number_offset_x: i32,
    pub day_number_offset_y: i32,
    pub day_number_font_size: f32,
    pub day_name_offset_x: i32,
    pub day_name_offset_y: i32,
    pub day_name_font_size: f32,
    pub header_rule_offset_y: i32,
    pub header_rule_width: i32,

    pub event_box_offset_y: i32,
    pub event_corner_radius: i32,
    pub event_font_size: f32,
    pub time_offset_x: i32,
    pub time_offset_y: i32,
    pub summary_offset_x: i32,
    pub summary_offset_y: i32,
    pub summary_first_line_offset_y: i32,
    pub summary_second_line_offset_y: i32,
    pub no_events_offset_x: i32,
    pub no_events_offset_y: i32,

    pub footer_offset_y: i32,
    pub footer_address_offset_x: i32,
    pub footer_font_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 480,
            canvas_height: 800,
            origin_x: 20,
            origin_y: 20,
            max_x: 439,
            max_y: 679,
            day_header_height: 45,
            event_height: 45,
            event_spacer: 10,
            event_char_limit: 26,
            days_to_render: 10,
            day_number_offset_x: 0,
            day_number_offset_y: -10,
            day_number_font_size: 40.0,
            day_name_offset_x: 70,
            day_name_offset_y: 2,
            day_name_font_size: 23.0,
            header_rule_offset_y: 35,
            header_rule_width: 2,
            event_box_offset_y: 45,
            event_corner_radius: 8,
            event_font_size: 18.0,
            time_offset_x: 25,
            time_offset_y: 60,
            summary_offset_x: 190,
            summary_offset_y: 60,
            summary_first_line_offset_y: 50,
            summary_second_line_offset_y: 70,
            no_events_offset_x: 30,
            no_events_offset_y: 60,
            footer_offset_y: 5,
            footer_address_offset_x: 250,
            footer_font_size: 16.0,
        }
    }
}

impl LayoutConfig {
    /// Vertical space one event (or the "No events" line) consumes
    pub fn slot_height(&self) -> i32 {
        self.event_height + self.event_spacer
    }

    fn event_font(&self) -> FontStyle {
        FontStyle {
            face: FontFace::Bold,
            size: self.event_font_size,
        }
    }
}

/// What a layout pass managed to fit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    pub days_drawn: usize,
    pub events_drawn: usize,
    pub placeholders_drawn: usize,
    /// Cursor position when the pass ended
    pub cursor_y: i32,
    /// True when the canvas filled up before every day was drawn
    pub truncated: bool,
}

/// Lay out up to `days_to_render` days starting at `today`.
///
/// A day is only started when its header and one event slot fit above
/// `max_y`, and each event needs its own slot to fit. The first time either
/// check fails the pass stops, leaving the rest of the canvas untouched.
pub fn draw_events<C: Canvas>(
    canvas: &mut C,
    buckets: &DayBuckets,
    today: NaiveDate,
    layout: &LayoutConfig,
    colors: &ColorMap,
) -> LayoutSummary {
    let x = layout.origin_x;
    let mut summary = LayoutSummary {
        cursor_y: layout.origin_y,
        ..Default::default()
    };

    for i in 0..layout.days_to_render {
        let y = summary.cursor_y;

        // Room for the header and at least one event
        let proposed_height = y
            + layout.day_header_height
            + layout.event_spacer
            + layout.event_height
            + layout.event_spacer;
        debug!(
            "Day {}: y={}, proposed_height={}, max_y={}",
            i, y, proposed_height, layout.max_y
        );
        if proposed_height > layout.max_y {
            debug!("No more room for header + an event, stopping");
            summary.truncated = true;
            return summary;
        }

        let Some(day) = today.checked_add_days(Days::new(i)) else {
            break;
        };
        let weekday = format_weekday(day, today);

        draw_day_header(canvas, layout, &day.day().to_string(), &weekday, x, y);
        summary.days_drawn += 1;
        info!("{}    {}", day.day(), weekday);

        let events = buckets.events_on(day);
        if events.is_empty() {
            draw_no_events(canvas, layout, x, y);
            info!("No events");
            summary.placeholders_drawn += 1;
            summary.cursor_y += layout.slot_height();
        } else {
            for event in events {
                let y = summary.cursor_y;
                let proposed_height = y + layout.event_spacer + layout.event_height + layout.event_spacer;
                debug!(
                    "Event {}: y={}, proposed_height={}, max_y={}",
                    event.summary, y, proposed_height, layout.max_y
                );
                if proposed_height > layout.max_y {
                    debug!("No more room for any more events, stopping");
                    summary.truncated = true;
                    return summary;
                }

                draw_event(canvas, layout, colors, event, x, y);
                summary.events_drawn += 1;
                summary.cursor_y += layout.slot_height();
            }
        }

        summary.cursor_y += layout.day_header_height + layout.event_spacer;
    }

    summary
}

fn draw_day_header<C: Canvas>(
    canvas: &mut C,
    layout: &LayoutConfig,
    day_number: &str,
    day_name: &str,
    x: i32,
    y: i32,
) {
    canvas.text(
        Point::new(x + layout.day_number_offset_x, y + layout.day_number_offset_y),
        day_number,
        FontStyle {
            face: FontFace::Regular,
            size: layout.day_number_font_size,
        },
        PanelColor::Black,
    );

    canvas.text(
        Point::new(x + layout.day_name_offset_x, y + layout.day_name_offset_y),
        day_name,
        FontStyle {
            face: FontFace::Regular,
            size: layout.day_name_font_size,
        },
        PanelColor::Black,
    );

    let rule_y = y + layout.header_rule_offset_y;
    canvas.line(
        Point::new(x, rule_y),
        Point::new(layout.max_x, rule_y),
        layout.header_rule_width,
        PanelColor::Black,
    );
}

fn draw_no_events<C: Canvas>(canvas: &mut C, layout: &LayoutConfig, x: i32, y: i32) {
    canvas.text(
        Point::new(x + layout.no_events_offset_x, y + layout.no_events_offset_y),
        "No events",
        layout.event_font(),
        PanelColor::Black,
    );
}

fn draw_event<C: Canvas>(
    canvas: &mut C,
    layout: &LayoutConfig,
    colors: &ColorMap,
    event: &PiEvent,
    x: i32,
    y: i32,
) {
    let fill = colors.color_for(&event.calendar_name);
    let text_color = fill.text_color();
    let font = layout.event_font();

    let box_top = y + layout.event_box_offset_y;
    canvas.rounded_rectangle(
        Point::new(x, box_top),
        Point::new(layout.max_x, box_top + layout.event_height),
        layout.event_corner_radius,
        fill,
    );

    let time_label = match (event.all_day_date, &event.start_time) {
        (Some(_), _) => "All day".to_string(),
        (None, Some(start)) => format_time_range(start, event.end_time.as_ref()),
        (None, None) => String::new(),
    };
    canvas.text(
        Point::new(x + layout.time_offset_x, y + layout.time_offset_y),
        &time_label,
        font,
        text_color,
    );

    let summary_x = x + layout.summary_offset_x;
    let (first_line, second_line) = split_summary(&event.summary, layout.event_char_limit);
    if second_line.is_empty() {
        canvas.text(
            Point::new(summary_x, y + layout.summary_offset_y),
            &first_line,
            font,
            text_color,
        );
    } else {
        canvas.text(
            Point::new(summary_x, y + layout.summary_first_line_offset_y),
            &first_line,
            font,
            text_color,
        );
        canvas.text(
            Point::new(summary_x, y + layout.summary_second_line_offset_y),
            &second_line,
            font,
            text_color,
        );
    }

    info!("{} {}, color={:?}", time_label, event.summary, fill);
}

/// "Last updated" stamp and the host address below the paginated area.
/// Drawn regardless of how much room the events took.
pub fn draw_footer<C: Canvas, Tz: TimeZone>(
    canvas: &mut C,
    layout: &LayoutConfig,
    now: &DateTime<Tz>,
    address: &str,
) where
    Tz::Offset: Display,
{
    let font = FontStyle {
        face: FontFace::Footer,
        size: layout.footer_font_size,
    };
    let y = layout.max_y + layout.footer_offset_y;

    canvas.text(
        Point::new(layout.origin_x, y),
        &format!("Last updated: {}", now.format("%m/%d %H:%M")),
        font,
        PanelColor::Black,
    );

    canvas.text(
        Point::new(layout.origin_x + layout.footer_address_offset_x, y),
        address,
        font,
        PanelColor::Green,
    );
}
