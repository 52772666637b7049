use serde::{Deserialize, Serialize};

/// Response of `users/me/calendarList`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarList {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    pub time_zone: Option<String>,
}

/// Response of `calendars/{id}/events`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
}

/// Simplified calendar event representation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiEvent {
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
}

/// Either a full timestamp or, for all-day events, just a date
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}
