//! # Google Calendar Events
//!
//! Lists upcoming events of one calendar through the Calendar v3 REST API.
//! The request asks the server to expand recurring events, order by start
//! time and cap the result, so the dashboard renders the list as received.
//!
//! ## Credentials
//! The access token is read from the `token` field of an authorized-user JSON
//! file (the `token.json` written by Google's OAuth installed-app flow).
//! Token refresh is out of scope: an expired token surfaces as an HTTP error.
//!
//! ## Failure Policy
//! Every failure is logged and turned into an empty list. An empty list makes
//! the dashboard skip the refresh, so a calendar outage leaves the previous
//! image on the panel instead of an incomplete one.

use crate::config::CalendarConfig;
use crate::fetch::FetchError;
use crate::CalendarEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{error, info};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Subset of the authorized-user file we need.
#[derive(Debug, Deserialize)]
struct AuthorizedUser {
    token: String,
}

/// Response of `events.list`.
#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// Read the OAuth access token from an authorized-user JSON file.
pub fn read_token(path: &Path) -> Result<String, FetchError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| FetchError::Credentials(format!("{}: {}", path.display(), e)))?;
    let user: AuthorizedUser = serde_json::from_str(&contents)
        .map_err(|e| FetchError::Credentials(format!("{}: {}", path.display(), e)))?;
    Ok(user.token)
}

/// Build the `events.list` URL for the configured calendar.
pub fn events_url(config: &CalendarConfig, now: DateTime<Utc>) -> Result<Url, FetchError> {
    let mut url = Url::parse(&config.endpoint).map_err(|e| FetchError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::Url(config.endpoint.clone()))?
        .pop_if_empty()
        .extend(["calendars", config.calendar_id.as_str(), "events"]);
    url.query_pairs_mut()
        .append_pair("timeMin", &now.to_rfc3339_opts(SecondsFormat::Micros, true))
        .append_pair("maxResults", &config.max_events.to_string())
        .append_pair("singleEvents", "true")
        .append_pair("orderBy", "startTime");
    Ok(url)
}

async fn try_fetch(
    client: &reqwest::Client,
    config: &CalendarConfig,
    now: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>, FetchError> {
    let token = read_token(&config.token_path)?;
    let url = events_url(config, now)?;
    let response: EventsResponse = client
        .get(url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(response.items)
}

/// Upcoming events starting from `now`, or an empty list on any failure.
pub async fn fetch_upcoming(
    client: &reqwest::Client,
    config: &CalendarConfig,
    now: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    match try_fetch(client, config, now).await {
        Ok(events) => {
            info!("📅 Got {} upcoming event(s)", events.len());
            events
        }
        Err(e) => {
            error!("❌ Calendar request failed: {}", e);
            Vec::new()
        }
    }
}
