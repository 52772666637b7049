use super::event::{day_key, PiEvent};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

/// Events bucketed by calendar day, each bucket in display order
#[derive(Debug, Clone, Default)]
pub struct DayBuckets {
    days: BTreeMap<String, Vec<PiEvent>>,
}

impl DayBuckets {
    /// Events on the given day; empty when the day has none
    pub fn events_on(&self, date: NaiveDate) -> &[PiEvent] {
        self.days
            .get(&day_key(date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Stable sort by the event sort key
pub fn sort_events(mut events: Vec<PiEvent>) -> Vec<PiEvent> {
    events.sort_by_key(PiEvent::sort_key);
    events
}

/// Sort all events once, then distribute them into day buckets keeping that order
pub fn group_by_day(events: Vec<PiEvent>) -> DayBuckets {
    let mut days: BTreeMap<String, Vec<PiEvent>> = BTreeMap::new();

    for event in sort_events(events) {
        match event.day_key() {
            Some(key) => days.entry(key).or_default().push(event),
            None => warn!(
                "Skipping event without a date: {} ({})",
                event.summary, event.calendar_name
            ),
        }
    }

    DayBuckets { days }
}
