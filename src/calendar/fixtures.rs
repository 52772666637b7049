use super::event::PiEvent;
use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone};

/// Wall-clock time `hour:minute` on `date`, in `offset`
fn local_time(date: NaiveDate, hour: i64, minute: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::default()) + Duration::minutes(hour * 60 + minute);
    offset.from_utc_datetime(&(local - offset))
}

/// A fixed set of events over five days, the third day left empty.
/// Lets the layout be checked without talking to Google.
pub fn generate_fixture_events<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<PiEvent> {
    let offset = now.offset().fix();
    let today = now.date_naive();
    let day = |n: u64| today.checked_add_days(Days::new(n)).unwrap_or(today);
    let timed = |calendar: &str, summary: &str, n: u64, start: (i64, i64), end: (i64, i64)| {
        PiEvent::timed(
            calendar,
            summary,
            local_time(day(n), start.0, start.1, offset),
            local_time(day(n), end.0, end.1, offset),
        )
    };

    vec![
        // Today
        PiEvent::all_day("RED-CALENDAR", "Cat's birthday", day(0)),
        timed("GREEN-CALENDAR", "Conference call", 0, (8, 0), (9, 30)),
        timed(
            "BLUE-CALENDAR",
            "Try to remember conference call decision",
            0,
            (9, 30),
            (10, 0),
        ),
        // Tomorrow
        PiEvent::all_day("YELLOW-CALENDAR", "Unspecified school holiday", day(1)),
        timed("BLUE-CALENDAR", "'Design' session at pub", 1, (14, 0), (16, 30)),
        // Day 2 has no events
        timed("ORANGE-CALENDAR", "Lunch with Larry Linder", 3, (11, 30), (12, 30)),
        PiEvent::all_day("YELLOW-CALENDAR", "Holiday", day(4)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_fixture_events_cover_five_days_with_a_gap() {
        let now = FixedOffset::west_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 30, 17, 45, 12)
            .unwrap();
        let events = generate_fixture_events(&now);

        assert_eq!(events.len(), 7);
        let days: Vec<_> = events.iter().filter_map(|e| e.day_key()).collect();
        assert!(days.contains(&"2024-03-30".to_string()));
        assert!(days.contains(&"2024-04-03".to_string()));
        assert!(!days.contains(&"2024-04-01".to_string()));

        let call = &events[1];
        let start = call.start_time.unwrap();
        assert_eq!((start.hour(), start.minute(), start.second()), (8, 0, 0));
        assert_eq!(start.offset(), now.offset());
    }
}
