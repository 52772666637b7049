use super::models::{ApiEvent, EventTime};
use crate::calendar::PiEvent;
use crate::error::{google_calendar_error, AppResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::OffsetComponents;

/// Whether `now` falls in daylight-saving time in its zone
pub fn is_dst<Tz: TimeZone>(now: &DateTime<Tz>) -> bool
where
    Tz::Offset: OffsetComponents,
{
    now.offset().dst_offset() != Duration::zero()
}

/// Hours to shift timestamps from a calendar whose zone is set to UTC.
///
/// One of the source calendars was created with its zone set to UTC while
/// its events are entered in Pacific wall-clock time.
pub fn utc_calendar_correction(is_dst: bool) -> Duration {
    if is_dst {
        Duration::hours(-7)
    } else {
        Duration::hours(-8)
    }
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| google_calendar_error(&format!("Failed to parse datetime {}: {}", value, e)))
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| google_calendar_error(&format!("Failed to parse date {}: {}", value, e)))
}

fn timestamp(time: &EventTime, which: &str) -> AppResult<DateTime<FixedOffset>> {
    time.date_time
        .as_deref()
        .ok_or_else(|| google_calendar_error(&format!("Event has no {} time", which)))
        .and_then(parse_timestamp)
}

/// Map one API item to an event.
///
/// Items without a start time are all-day. Timed items from a calendar in
/// `UTC` get the Pacific correction applied to both ends.
pub fn to_pi_event(
    calendar_name: &str,
    calendar_time_zone: Option<&str>,
    event: &ApiEvent,
    is_dst: bool,
) -> AppResult<PiEvent> {
    let summary = event.summary.as_deref().unwrap_or_default();

    if event.start.date_time.is_none() {
        let date = event
            .start
            .date
            .as_deref()
            .ok_or_else(|| google_calendar_error("Event has neither a start time nor a date"))?;
        return Ok(PiEvent::all_day(calendar_name, summary, parse_date(date)?));
    }

    let mut start = timestamp(&event.start, "start")?;
    let mut end = timestamp(&event.end, "end")?;

    if calendar_time_zone == Some("UTC") {
        let correction = utc_calendar_correction(is_dst);
        start += correction;
        end += correction;
    }

    Ok(PiEvent::timed(calendar_name, summary, start, end))
}
