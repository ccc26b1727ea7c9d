//! Google Calendar REST API: list and insert events.

use super::{decode, endpoint, execute};
use crate::error::ToolError;
use crate::http::{ApiRequest, Transport};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<Event>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<EventTime>,
}

/// Either a timed (`dateTime`) or all-day (`date`) boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl EventTime {
    pub fn as_str(&self) -> &str {
        self.date_time
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or("")
    }
}

/// Calendar client bound to one calendar and access token.
pub struct Calendar<'a> {
    transport: &'a dyn Transport,
    base: &'a str,
    calendar_id: &'a str,
    access_token: &'a str,
}

impl<'a> Calendar<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        base: &'a str,
        calendar_id: &'a str,
        access_token: &'a str,
    ) -> Self {
        Self {
            transport,
            base,
            calendar_id,
            access_token,
        }
    }

    /// Upcoming events, recurring series expanded, ordered by start time.
    #[instrument(skip(self))]
    pub async fn list_upcoming(
        &self,
        max_results: u32,
        time_min: DateTime<Utc>,
    ) -> Result<EventList, ToolError> {
        let url = endpoint(self.base, &["calendars", self.calendar_id, "events"])?;
        let request = ApiRequest::get(url)
            .bearer(self.access_token)
            .query("maxResults", max_results)
            .query("singleEvents", "true")
            .query("orderBy", "startTime")
            .query("timeMin", time_min.to_rfc3339_opts(SecondsFormat::Secs, true));

        let response = execute(self.transport, request, "Calendar list").await?;
        let events: EventList = decode(&response, "Calendar list")?;
        debug!("Calendar returned {} events", events.items.len());
        Ok(events)
    }

    /// Insert an event resource and return the created event.
    #[instrument(skip(self, event))]
    pub async fn insert(&self, event: serde_json::Value) -> Result<Event, ToolError> {
        let url = endpoint(self.base, &["calendars", self.calendar_id, "events"])?;
        let request = ApiRequest::post(url).bearer(self.access_token).json(event);

        let response = execute(self.transport, request, "Calendar insert").await?;
        decode(&response, "Calendar insert")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_time_prefers_date_time() {
        let timed: EventTime =
            serde_json::from_str(r#"{"dateTime": "2026-10-19T09:00:00-07:00", "timeZone": "America/Los_Angeles"}"#)
                .unwrap();
        assert_eq!(timed.as_str(), "2026-10-19T09:00:00-07:00");

        let all_day: EventTime = serde_json::from_str(r#"{"date": "2026-10-20"}"#).unwrap();
        assert_eq!(all_day.as_str(), "2026-10-20");

        assert_eq!(EventTime::default().as_str(), "");
    }

    #[test]
    fn test_event_list_tolerates_missing_items() {
        let list: EventList = serde_json::from_str(r#"{"kind": "calendar#events"}"#).unwrap();
        assert!(list.items.is_empty());
    }
}
