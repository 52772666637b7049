use super::convert::{is_dst, to_pi_event};
use super::models::{CalendarList, CalendarListEntry, EventList};
use super::token::TokenManager;
use crate::calendar::PiEvent;
use crate::config::{Config, ExcludeList};
use crate::error::{google_calendar_error, AppResult};
use crate::sources::EventSource;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

/// Reads upcoming events from every calendar on the account
pub struct GoogleCalendarSource {
    client: Client,
    token_manager: TokenManager,
    excludes: ExcludeList,
    max_results: u32,
    api_base: Url,
}

impl GoogleCalendarSource {
    pub fn new(config: &Config, excludes: ExcludeList) -> AppResult<Self> {
        let client = Client::new();
        let api_base = Url::parse(API_BASE)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        Ok(Self {
            token_manager: TokenManager::new(config, client.clone())?,
            client,
            excludes,
            max_results: config.max_results,
            api_base,
        })
    }

    /// Calendars visible to the account
    async fn list_calendars(&self, access_token: &str) -> AppResult<Vec<CalendarListEntry>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let list: CalendarList = self.get_json(url, access_token).await?;
        Ok(list.items)
    }

    /// Upcoming single events of one calendar, earliest first
    async fn list_events(
        &self,
        calendar: &CalendarListEntry,
        access_token: &str,
        time_min: &str,
    ) -> AppResult<EventList> {
        let mut url = self.endpoint(&["calendars", &calendar.id, "events"])?;
        url.query_pairs_mut()
            .append_pair("timeMin", time_min)
            .append_pair("maxResults", &self.max_results.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        self.get_json(url, access_token).await
    }

    /// API URL with each segment percent-encoded, calendar ids contain `@` and `#`
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base URL cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, access_token: &str) -> AppResult<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl EventSource for GoogleCalendarSource {
    fn name(&self) -> &'static str {
        "google_calendar"
    }

    async fn fetch_events(&self, now: DateTime<Tz>) -> AppResult<Vec<PiEvent>> {
        let token = self.token_manager.get_token().await?;
        let time_min = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        let dst = is_dst(&now);

        let calendars = self.list_calendars(&token.access_token).await?;
        if calendars.is_empty() {
            info!("No calendars found");
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        for calendar in &calendars {
            if self.excludes.contains(&calendar.summary) {
                debug!("Skipping excluded calendar {}", calendar.summary);
                continue;
            }

            debug!("Calendar id={}, summary={}", calendar.id, calendar.summary);
            let items = self
                .list_events(calendar, &token.access_token, &time_min)
                .await?
                .items;

            if items.is_empty() {
                info!("No upcoming events found in {}", calendar.summary);
                continue;
            }

            for item in &items {
                debug!("event={:?}", item);
                events.push(to_pi_event(
                    &calendar.summary,
                    calendar.time_zone.as_deref(),
                    item,
                    dst,
                )?);
            }
        }

        info!("Fetched {} events from {} calendars", events.len(), calendars.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LayoutConfig;

    fn source() -> GoogleCalendarSource {
        let config = Config {
            resources_dir: std::env::temp_dir(),
            fake_events: false,
            timezone: "America/Los_Angeles".to_string(),
            output_path: std::env::temp_dir().join("frame.png"),
            max_results: 10,
            redirect_port: 8080,
            network_probe: "8.8.8.8:80".to_string(),
            google_client_id: Some("id".to_string()),
            google_client_secret: Some("secret".to_string()),
            layout: LayoutConfig::default(),
        };
        GoogleCalendarSource::new(&config, ExcludeList::default()).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_calendar_ids() {
        let source = source();
        let url = source
            .endpoint(&["calendars", "en.usa#holiday@group.v.calendar.google.com", "events"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/en.usa%23holiday@group.v.calendar.google.com/events"
        );

        let url = source.endpoint(&["users", "me", "calendarList"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/users/me/calendarList"
        );
    }

    #[test]
    fn test_calendar_list_parsing() {
        let list: CalendarList = serde_json::from_str(
            r#"{"kind":"calendar#calendarList","items":[
                {"id":"a@example.com","summary":"Family","timeZone":"America/Los_Angeles"},
                {"id":"b@example.com","summary":"Broken","timeZone":"UTC"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].time_zone.as_deref(), Some("UTC"));

        let empty: EventList = serde_json::from_str(r#"{"kind":"calendar#events"}"#).unwrap();
        assert!(empty.items.is_empty());
    }
}
