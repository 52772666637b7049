pub mod google_calendar;

pub use google_calendar::GoogleCalendarSource;

use crate::calendar::{generate_fixture_events, PiEvent};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;

/// Something that produces the events to render.
/// The order of the returned events does not matter.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Events from `now` onwards
    async fn fetch_events(&self, now: DateTime<Tz>) -> AppResult<Vec<PiEvent>>;
}

/// Hand-written events for checking the layout offline
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSource;

#[async_trait]
impl EventSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch_events(&self, now: DateTime<Tz>) -> AppResult<Vec<PiEvent>> {
        Ok(generate_fixture_events(&now))
    }
}
