//! Google Calendar tools: list upcoming events and create an event.

use super::{string_field, Tool};
use crate::config::{GoogleSettings, OAuthCredentials};
use crate::error::ToolError;
use crate::google::{access_token, Calendar};
use crate::http::Transport;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

const MISSING_CREDENTIALS: &str =
    "Missing Google Calendar OAuth credentials in environment variables!";

struct CalendarAccess {
    transport: Arc<dyn Transport>,
    settings: GoogleSettings,
    credentials: Option<OAuthCredentials>,
}

impl CalendarAccess {
    fn credentials(&self) -> Result<&OAuthCredentials, ToolError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ToolError::Configuration(MISSING_CREDENTIALS.to_string()))
    }

    async fn token(&self, credentials: &OAuthCredentials) -> Result<String, ToolError> {
        access_token(self.transport.as_ref(), credentials, &self.settings.token_uri).await
    }
}

/// Lists the next few events on the configured calendar.
pub struct GoogleCalendarListEvents {
    access: CalendarAccess,
}

impl GoogleCalendarListEvents {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: GoogleSettings,
        credentials: Option<OAuthCredentials>,
    ) -> Self {
        Self {
            access: CalendarAccess {
                transport,
                settings,
                credentials,
            },
        }
    }
}

#[async_trait]
impl Tool for GoogleCalendarListEvents {
    fn name(&self) -> &str {
        "GoogleCalendarListEvents"
    }

    fn description(&self) -> &str {
        "Lists upcoming events from Google Calendar."
    }

    fn input_description(&self) -> &str {
        "Ignored; pass an empty string"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        let credentials = self.access.credentials()?;
        let token = self.access.token(credentials).await?;
        let settings = &self.access.settings;
        let calendar = Calendar::new(
            self.access.transport.as_ref(),
            &settings.calendar_api_base,
            &settings.calendar_id,
            &token,
        );

        let events = calendar.list_upcoming(settings.max_results, Utc::now()).await?;
        if events.items.is_empty() {
            return Ok("No upcoming events found.".to_string());
        }

        let lines: Vec<String> = events
            .items
            .iter()
            .map(|event| {
                format!(
                    "{} - {}",
                    event.start.as_ref().map(|s| s.as_str()).unwrap_or(""),
                    event.summary.as_deref().unwrap_or("No Title")
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

/// Creates a calendar event from a JSON description.
pub struct GoogleCalendarCreateEvent {
    access: CalendarAccess,
}

impl GoogleCalendarCreateEvent {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: GoogleSettings,
        credentials: Option<OAuthCredentials>,
    ) -> Self {
        Self {
            access: CalendarAccess {
                transport,
                settings,
                credentials,
            },
        }
    }
}

/// Turn a `start`/`end` value into a Calendar `EventDateTime` object.
///
/// `YYYY-MM-DD` strings become all-day `date` boundaries, other strings are
/// treated as RFC 3339 `dateTime`. Objects pass through untouched.
fn event_time(value: &Value, time_zone: Option<&str>) -> Option<Value> {
    match value {
        Value::Object(_) => Some(value.clone()),
        Value::String(s) if !s.trim().is_empty() => {
            let s = s.trim();
            let mut time = Map::new();
            if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
                time.insert("date".to_string(), json!(s));
            } else {
                time.insert("dateTime".to_string(), json!(s));
                if let Some(tz) = time_zone {
                    time.insert("timeZone".to_string(), json!(tz));
                }
            }
            Some(Value::Object(time))
        }
        _ => None,
    }
}

/// Build the event resource, checking required fields in order.
fn build_event(fields: &Value) -> Result<Value, ToolError> {
    let missing = |name: &str| ToolError::Validation(format!("Missing required field: {}", name));
    let time_zone = string_field(fields, "timeZone");

    let summary = string_field(fields, "summary").ok_or_else(|| missing("summary"))?;
    let start = fields
        .get("start")
        .and_then(|v| event_time(v, time_zone))
        .ok_or_else(|| missing("start"))?;
    let end = fields
        .get("end")
        .and_then(|v| event_time(v, time_zone))
        .ok_or_else(|| missing("end"))?;

    Ok(json!({
        "summary": summary,
        "location": fields.get("location").and_then(Value::as_str).unwrap_or(""),
        "description": fields.get("description").and_then(Value::as_str).unwrap_or(""),
        "start": start,
        "end": end,
        "reminders": { "useDefault": true },
    }))
}

#[async_trait]
impl Tool for GoogleCalendarCreateEvent {
    fn name(&self) -> &str {
        "GoogleCalendarCreateEvent"
    }

    fn description(&self) -> &str {
        "Creates a new event in Google Calendar. Every call creates a new event."
    }

    fn input_description(&self) -> &str {
        "A JSON object with 'summary', 'start' and 'end' (RFC 3339 or YYYY-MM-DD), \
         optional 'location', 'description' and 'timeZone'"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let credentials = self.access.credentials()?;

        let fields: Value = serde_json::from_str(input).map_err(|e| {
            ToolError::Validation(format!("Error: event input is not valid JSON: {}", e))
        })?;
        if !fields.is_object() {
            return Err(ToolError::Validation(
                "Error: event input must be a JSON object".to_string(),
            ));
        }
        let event = build_event(&fields)?;

        let token = self.access.token(credentials).await?;
        let settings = &self.access.settings;
        let calendar = Calendar::new(
            self.access.transport.as_ref(),
            &settings.calendar_api_base,
            &settings.calendar_id,
            &token,
        );
        let created = calendar.insert(event).await?;

        let id = created.id.unwrap_or_default();
        info!("Created calendar event {}", id);
        Ok(format!("Event created successfully! Event ID: {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::RecordingTransport;
    use crate::http::{Body, Method};

    fn credentials() -> Option<OAuthCredentials> {
        Some(OAuthCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            token_uri: None,
        })
    }

    fn create_tool(
        transport: &Arc<RecordingTransport>,
        creds: Option<OAuthCredentials>,
    ) -> GoogleCalendarCreateEvent {
        GoogleCalendarCreateEvent::new(transport.clone(), GoogleSettings::default(), creds)
    }

    fn creating_transport() -> Arc<RecordingTransport> {
        Arc::new(RecordingTransport::new().with_token().route(
            Method::Post,
            "calendars/primary/events",
            200,
            r#"{"id": "evt-1", "htmlLink": "https://calendar.google.com/event?eid=evt-1"}"#,
        ))
    }

    fn inserted_event(transport: &RecordingTransport) -> Value {
        let inserts = transport.matching("calendars/primary/events");
        assert_eq!(inserts.len(), 1);
        match &inserts[0].body {
            Some(Body::Json(value)) => value.clone(),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_creates_event() {
        let transport = creating_transport();
        let result = create_tool(&transport, credentials())
            .invoke(
                r#"{"summary": "Standup", "start": "2026-10-20T09:00:00-07:00",
                    "end": "2026-10-20T09:15:00-07:00", "location": "Room 4",
                    "timeZone": "America/Los_Angeles"}"#,
            )
            .await
            .unwrap();
        assert_eq!(result, "Event created successfully! Event ID: evt-1");

        let event = inserted_event(&transport);
        assert_eq!(event["summary"], "Standup");
        assert_eq!(event["location"], "Room 4");
        assert_eq!(event["description"], "");
        assert_eq!(event["start"]["dateTime"], "2026-10-20T09:00:00-07:00");
        assert_eq!(event["start"]["timeZone"], "America/Los_Angeles");
        assert_eq!(event["end"]["dateTime"], "2026-10-20T09:15:00-07:00");
        assert_eq!(event["reminders"]["useDefault"], true);
    }

    #[tokio::test]
    async fn test_all_day_and_object_times() {
        let transport = creating_transport();
        create_tool(&transport, credentials())
            .invoke(
                r#"{"summary": "Offsite", "start": "2026-11-02",
                    "end": {"date": "2026-11-03"}}"#,
            )
            .await
            .unwrap();

        let event = inserted_event(&transport);
        assert_eq!(event["start"], json!({"date": "2026-11-02"}));
        assert_eq!(event["end"], json!({"date": "2026-11-03"}));
    }

    #[tokio::test]
    async fn test_missing_end_makes_no_calls() {
        let transport = creating_transport();
        let err = create_tool(&transport, credentials())
            .invoke(r#"{"summary": "x", "start": "2026-10-20T09:00:00Z"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: end");
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_required_fields_checked_in_order() {
        let transport = creating_transport();
        let err = create_tool(&transport, credentials())
            .invoke(r#"{"location": "nowhere"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: summary");

        let err = create_tool(&transport, credentials())
            .invoke(r#"{"summary": "x", "end": "2026-10-20"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: start");
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_python_literals_are_rejected() {
        let transport = creating_transport();
        let err = create_tool(&transport, credentials())
            .invoke("{'summary': 'x', 'start': '2026-10-20', 'end': '2026-10-21'}")
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_create_missing_credentials_makes_no_calls() {
        let transport = creating_transport();
        let err = create_tool(&transport, None)
            .invoke(r#"{"summary": "x", "start": "2026-10-20", "end": "2026-10-21"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_CREDENTIALS);
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_lists_events() {
        let transport = Arc::new(RecordingTransport::new().with_token().route(
            Method::Get,
            "calendars/primary/events",
            200,
            r#"{"items": [
                {"id": "1", "summary": "Standup", "start": {"dateTime": "2026-10-19T09:00:00-07:00"}},
                {"id": "2", "start": {"date": "2026-10-20"}}
            ]}"#,
        ));
        let tool =
            GoogleCalendarListEvents::new(transport.clone(), GoogleSettings::default(), credentials());

        let result = tool.invoke("").await.unwrap();
        assert_eq!(
            result,
            "2026-10-19T09:00:00-07:00 - Standup\n2026-10-20 - No Title"
        );

        let list = &transport.matching("calendars/primary/events")[0];
        assert_eq!(list.query_param("maxResults"), Some("5"));
        assert_eq!(list.query_param("singleEvents"), Some("true"));
        assert_eq!(list.query_param("orderBy"), Some("startTime"));
        assert!(list.query_param("timeMin").is_some());
    }

    #[tokio::test]
    async fn test_no_upcoming_events() {
        let transport = Arc::new(RecordingTransport::new().with_token().route(
            Method::Get,
            "calendars/primary/events",
            200,
            r#"{"items": []}"#,
        ));
        let tool =
            GoogleCalendarListEvents::new(transport.clone(), GoogleSettings::default(), credentials());
        assert_eq!(tool.invoke("").await.unwrap(), "No upcoming events found.");
    }

    #[tokio::test]
    async fn test_list_missing_credentials_makes_no_calls() {
        let transport = Arc::new(RecordingTransport::new());
        let tool = GoogleCalendarListEvents::new(transport.clone(), GoogleSettings::default(), None);
        let err = tool.invoke("").await.unwrap_err();
        assert_eq!(err, ToolError::Configuration(MISSING_CREDENTIALS.to_string()));
        assert_eq!(transport.count(), 0);
    }
}
