use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// One event to show on the panel
#[derive(Debug, Clone, PartialEq)]
pub struct PiEvent {
    pub calendar_name: String,
    pub summary: String,
    pub all_day_date: Option<NaiveDate>,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
}

/// Ordering key: date first, then all-day before timed before dateless, then time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub date: NaiveDate,
    pub kind_rank: u8,
    pub time: NaiveTime,
}

impl PiEvent {
    pub fn all_day(calendar_name: &str, summary: &str, date: NaiveDate) -> Self {
        Self {
            calendar_name: calendar_name.to_string(),
            summary: summary.to_string(),
            all_day_date: Some(date),
            start_time: None,
            end_time: None,
        }
    }

    pub fn timed(
        calendar_name: &str,
        summary: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            calendar_name: calendar_name.to_string(),
            summary: summary.to_string(),
            all_day_date: None,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.all_day_date.is_some()
    }

    pub fn sort_key(&self) -> SortKey {
        if let Some(date) = self.all_day_date {
            SortKey {
                date,
                kind_rank: 0,
                time: NaiveTime::default(),
            }
        } else if let Some(start) = self.start_time {
            SortKey {
                date: start.date_naive(),
                kind_rank: 1,
                time: start.time(),
            }
        } else {
            SortKey {
                date: NaiveDate::MAX,
                kind_rank: 2,
                time: NaiveTime::default(),
            }
        }
    }

    /// Calendar day the event belongs to, in the event's own offset
    pub fn date(&self) -> Option<NaiveDate> {
        self.all_day_date
            .or_else(|| self.start_time.map(|start| start.date_naive()))
    }

    /// Day bucket key in `YYYY-MM-DD` form
    pub fn day_key(&self) -> Option<String> {
        self.date().map(day_key)
    }
}

/// Format a date as a day bucket key
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
