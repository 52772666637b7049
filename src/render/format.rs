use chrono::{Datelike, Days, NaiveDate, Timelike};

/// 12-hour clock without leading zeros, minutes only when non-zero: `2PM`, `2:05PM`, `12AM`
pub fn format_event_time<T: Timelike>(time: &T) -> String {
    let (is_pm, hour) = time.hour12();
    let am_pm = if is_pm { "PM" } else { "AM" };

    match time.minute() {
        0 => format!("{}{}", hour, am_pm),
        minute => format!("{}:{:02}{}", hour, minute, am_pm),
    }
}

/// `start - end` label for a timed event
pub fn format_time_range<T: Timelike>(start: &T, end: Option<&T>) -> String {
    match end {
        Some(end) => format!("{} - {}", format_event_time(start), format_event_time(end)),
        None => format_event_time(start),
    }
}

/// "Today", "Tomorrow" or the weekday name.
/// Matches on day of month only, which is unambiguous inside the rendered window.
pub fn format_weekday(date: NaiveDate, today: NaiveDate) -> String {
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    if date.day() == today.day() {
        "Today".to_string()
    } else if date.day() == tomorrow.day() {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    }
}

/// Split a summary into at most two lines.
///
/// Whole words go on the first line until the next one would push it past
/// `limit` characters; that word and everything after it goes on the second
/// line, which is not bounded.
pub fn split_summary(summary: &str, limit: usize) -> (String, String) {
    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut used = 0;
    let mut overflow = false;

    for word in summary.split_whitespace() {
        let width = word.chars().count();
        if used + width + 1 > limit {
            overflow = true;
        }

        if overflow {
            second.push(word);
        } else {
            first.push(word);
            used += width + 1;
        }
    }

    (first.join(" "), second.join(" "))
}
