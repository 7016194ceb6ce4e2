//! Google Calendar integration over plain REST calls.
//!
//! Tokens are stored per user. Access tokens are refreshed shortly before
//! they expire; a failed refresh removes the stored tokens so the user has
//! to connect again.

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    DbConn,
    config::GoogleCalendarConfig,
    error::{Error, Result},
    models::calendar::{
        CalendarEvent, CalendarEventList, CreateEventRequest, GoogleTokenResponse, NewGoogleCalendarToken,
        UpdateEventRequest,
    },
    queries,
    services::jwt,
};

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const EVENTS_ENDPOINT: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Private extended property marking events created by this app.
const TAG_PROPERTY: &str = "appSource";
/// Refresh this long before the recorded expiry.
const EXPIRY_SKEW_SECONDS: i64 = 60;
const DEFAULT_REMINDER_MINUTES: i64 = 30;
const MAX_LISTED_EVENTS: u32 = 20;

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    config: GoogleCalendarConfig,
}

struct Credentials<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
}

impl GoogleCalendarClient {
    pub fn new(config: &GoogleCalendarConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn app_tag(&self) -> &str {
        &self.config.app_tag
    }

    fn credentials(&self) -> Result<Credentials<'_>> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_ref(),
            self.config.redirect_uri.as_deref(),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Ok(Credentials {
                client_id,
                client_secret: client_secret.expose_secret(),
                redirect_uri,
            }),
            _ => Err(Error::ServiceUnavailable(
                "Google Calendar integration is not configured".to_string(),
            )),
        }
    }

    /// Consent URL requesting offline access so Google issues a refresh token.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let credentials = self.credentials()?;
        let url = url::Url::parse_with_params(
            AUTH_ENDPOINT,
            &[
                ("client_id", credentials.client_id),
                ("redirect_uri", credentials.redirect_uri),
                ("response_type", "code"),
                ("scope", CALENDAR_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("state", state),
            ],
        )
        .map_err(|e| Error::Internal(format!("Invalid Google authorization URL: {}", e)))?;
        Ok(url.to_string())
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<GoogleTokenResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ExternalService(format!("Google token endpoint returned {}", status)));
        }
        Ok(response.json::<GoogleTokenResponse>().await?)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse> {
        let credentials = self.credentials()?;
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
            ("redirect_uri", credentials.redirect_uri),
        ])
        .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<GoogleTokenResponse> {
        let credentials = self.credentials()?;
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
        ])
        .await
    }

    async fn send_for_event<T: serde::de::DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound("Calendar event not found".to_string()));
        }
        if !status.is_success() {
            tracing::warn!(status = %status, "Google Calendar request failed");
            return Err(Error::ExternalService(format!("Google Calendar returned {}", status)));
        }
        Ok(response.json::<T>().await?)
    }

    /// Upcoming events carrying the app tag.
    pub async fn list_events(&self, access_token: &str) -> Result<Vec<CalendarEvent>> {
        let tag_filter = format!("{}={}", TAG_PROPERTY, self.app_tag());
        let url = url::Url::parse_with_params(
            EVENTS_ENDPOINT,
            &[
                ("timeMin", Utc::now().to_rfc3339()),
                ("maxResults", MAX_LISTED_EVENTS.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("privateExtendedProperty", tag_filter),
            ],
        )
        .map_err(|e| Error::Internal(format!("Invalid Google Calendar URL: {}", e)))?;

        let list: CalendarEventList = self
            .send_for_event(self.http.get(url).bearer_auth(access_token))
            .await?;
        let tag = self.app_tag();
        Ok(list.items.into_iter().filter(|event| has_tag(tag, event)).collect())
    }

    pub async fn get_event(&self, access_token: &str, event_id: &str) -> Result<CalendarEvent> {
        let url = event_url(event_id)?;
        self.send_for_event(self.http.get(url).bearer_auth(access_token)).await
    }

    pub async fn insert_event(&self, access_token: &str, body: &Value) -> Result<CalendarEvent> {
        self.send_for_event(self.http.post(EVENTS_ENDPOINT).bearer_auth(access_token).json(body))
            .await
    }

    pub async fn patch_event(&self, access_token: &str, event_id: &str, body: &Value) -> Result<CalendarEvent> {
        let url = event_url(event_id)?;
        self.send_for_event(self.http.patch(url).bearer_auth(access_token).json(body))
            .await
    }
}

fn event_url(event_id: &str) -> Result<url::Url> {
    let mut url = url::Url::parse(EVENTS_ENDPOINT)
        .map_err(|e| Error::Internal(format!("Invalid Google Calendar URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::Internal("Google Calendar URL cannot be a base".to_string()))?
        .push(event_id);
    Ok(url)
}

fn tagged_description(tag: &str, description: Option<&str>) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!("{}\n\nEvent managed by {}.", description, tag),
        None => format!("Event managed by {}.", tag),
    }
}

fn reminders(minutes: Option<i64>) -> Value {
    let overrides = match minutes {
        Some(minutes) => json!([
            {"method": "popup", "minutes": minutes},
            {"method": "email", "minutes": minutes}
        ]),
        None => json!([{"method": "popup", "minutes": DEFAULT_REMINDER_MINUTES}]),
    };
    json!({"useDefault": false, "overrides": overrides})
}

fn event_time(time: DateTime<Utc>) -> Value {
    json!({"dateTime": time.to_rfc3339(), "timeZone": "UTC"})
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(Error::validation("endTime", "endTime must be after startTime"));
    }
    Ok(())
}

/// Event resource for a new tagged event.
pub fn event_body(tag: &str, request: &CreateEventRequest) -> Result<Value> {
    if request.summary.trim().is_empty() {
        return Err(Error::validation("summary", "summary is required"));
    }
    validate_window(request.start_time, request.end_time)?;

    Ok(json!({
        "summary": request.summary.trim(),
        "description": tagged_description(tag, request.description.as_deref()),
        "location": request.location.clone().unwrap_or_default(),
        "start": event_time(request.start_time),
        "end": event_time(request.end_time),
        "reminders": reminders(request.notification_minutes),
        "extendedProperties": {"private": {TAG_PROPERTY: tag}},
    }))
}

/// Partial event resource containing only the fields being changed.
pub fn patch_body(tag: &str, existing: &CalendarEvent, request: &UpdateEventRequest) -> Result<Value> {
    if let (Some(start), Some(end)) = (request.start_time, request.end_time) {
        validate_window(start, end)?;
    }

    let mut body = Map::new();
    if let Some(summary) = &request.summary {
        body.insert("summary".to_string(), json!(summary.trim()));
    }
    if request.description.is_some() {
        body.insert(
            "description".to_string(),
            json!(tagged_description(tag, request.description.as_deref())),
        );
    }
    if let Some(location) = &request.location {
        body.insert("location".to_string(), json!(location));
    }
    if let Some(start) = request.start_time {
        body.insert("start".to_string(), event_time(start));
    }
    if let Some(end) = request.end_time {
        body.insert("end".to_string(), event_time(end));
    }
    if let Some(minutes) = request.notification_minutes {
        body.insert("reminders".to_string(), reminders(Some(minutes)));
    }
    if existing.extended_properties.is_none() {
        body.insert(
            "extendedProperties".to_string(),
            json!({"private": {TAG_PROPERTY: tag}}),
        );
    }
    Ok(Value::Object(body))
}

/// True for events this app created.
pub fn has_tag(tag: &str, event: &CalendarEvent) -> bool {
    let tagged_property = event
        .extended_properties
        .as_ref()
        .and_then(|props| props.private.get(TAG_PROPERTY))
        .and_then(Value::as_str)
        == Some(tag);
    tagged_property
        || event.description.as_deref().is_some_and(|d| d.contains(tag))
        || event.summary.as_deref().is_some_and(|s| s.contains(tag))
}

/// Converts a token endpoint response into a storable token.
pub fn token_from_response(response: GoogleTokenResponse, now: DateTime<Utc>) -> NewGoogleCalendarToken {
    NewGoogleCalendarToken {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        expires_at: now + Duration::seconds(response.expires_in),
        scope: response.scope,
    }
}

/// Finishes the consent round trip: checks the signed state, exchanges the
/// code and stores the tokens. Returns the linked user.
pub async fn complete_authorization(
    conn: &mut DbConn,
    client: &GoogleCalendarClient,
    jwt_secret: &str,
    code: &str,
    state: &str,
) -> Result<Uuid> {
    let user_id = jwt::verify_oauth_state(state, jwt_secret)?;
    if queries::users::get_user_by_id(conn, user_id).await?.is_none() {
        return Err(Error::NotFound("User not found".to_string()));
    }

    let response = client.exchange_code(code).await?;
    let token = token_from_response(response, Utc::now());
    queries::calendar::upsert_token(conn, user_id, &token).await?;
    tracing::info!(user_id = %user_id, "Google Calendar connected");
    Ok(user_id)
}

pub async fn is_authorized(conn: &mut DbConn, user_id: Uuid) -> Result<bool> {
    Ok(queries::calendar::get_token(conn, user_id).await?.is_some())
}

/// Returns a usable access token, refreshing it when it is about to expire.
pub async fn access_token(conn: &mut DbConn, client: &GoogleCalendarClient, user_id: Uuid) -> Result<String> {
    let token = queries::calendar::get_token(conn, user_id)
        .await?
        .ok_or_else(|| Error::Forbidden("Google Calendar is not connected".to_string()))?;

    if token.expires_at - Duration::seconds(EXPIRY_SKEW_SECONDS) > Utc::now() {
        return Ok(token.access_token);
    }

    let refreshed = match token.refresh_token.as_deref() {
        Some(refresh_token) => client.refresh(refresh_token).await,
        None => Err(Error::Authentication("No refresh token stored".to_string())),
    };

    match refreshed {
        Ok(response) => {
            let stored = queries::calendar::upsert_token(conn, user_id, &token_from_response(response, Utc::now())).await?;
            tracing::debug!(user_id = %user_id, "Google access token refreshed");
            Ok(stored.access_token)
        }
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Google token refresh failed, disconnecting calendar");
            queries::calendar::delete_token(conn, user_id).await?;
            Err(Error::Authentication(
                "Failed to refresh Google token. Please re-authorize.".to_string(),
            ))
        }
    }
}

pub async fn list_events(conn: &mut DbConn, client: &GoogleCalendarClient, user_id: Uuid) -> Result<Vec<CalendarEvent>> {
    let token = access_token(conn, client, user_id).await?;
    client.list_events(&token).await
}

pub async fn create_event(
    conn: &mut DbConn,
    client: &GoogleCalendarClient,
    user_id: Uuid,
    request: CreateEventRequest,
) -> Result<CalendarEvent> {
    let body = event_body(client.app_tag(), &request)?;
    let token = access_token(conn, client, user_id).await?;
    client.insert_event(&token, &body).await
}

/// Updates an event, refusing events this app did not create.
pub async fn update_event(
    conn: &mut DbConn,
    client: &GoogleCalendarClient,
    user_id: Uuid,
    event_id: &str,
    request: UpdateEventRequest,
) -> Result<CalendarEvent> {
    let token = access_token(conn, client, user_id).await?;
    let existing = client.get_event(&token, event_id).await?;
    if !has_tag(client.app_tag(), &existing) {
        return Err(Error::Forbidden(
            "Event not managed by this application".to_string(),
        ));
    }
    let body = patch_body(client.app_tag(), &existing, &request)?;
    client.patch_event(&token, event_id, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::ExtendedProperties;
    use chrono::TimeZone;

    const TAG: &str = "FitTrackAppEvent";

    fn configured() -> GoogleCalendarClient {
        let config = GoogleCalendarConfig {
            client_id: Some("client-123".to_string()),
            client_secret: Some("shh".to_string().into()),
            redirect_uri: Some("http://localhost:5123/api/google-calendar/oauth2callback".to_string()),
            app_tag: TAG.to_string(),
        };
        GoogleCalendarClient::new(&config, reqwest::Client::new())
    }

    fn create_request() -> CreateEventRequest {
        CreateEventRequest {
            summary: "Leg day".to_string(),
            description: Some("Squats".to_string()),
            start_time: Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap(),
            location: None,
            notification_minutes: Some(15),
        }
    }

    #[test]
    fn test_authorization_url() {
        let url = configured().authorization_url("signed-state").unwrap();
        let parsed = url::Url::parse(&url).unwrap();
        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert!(url.starts_with(AUTH_ENDPOINT));
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["prompt"], "consent");
        assert_eq!(params["scope"], CALENDAR_SCOPE);
        assert_eq!(params["state"], "signed-state");
    }

    #[test]
    fn test_unconfigured_client_is_unavailable() {
        let client = GoogleCalendarClient::new(&GoogleCalendarConfig::default(), reqwest::Client::new());
        assert!(!client.is_configured());
        assert!(matches!(client.authorization_url("s"), Err(Error::ServiceUnavailable(_))));
    }

    #[test]
    fn test_event_body_is_tagged() {
        let body = event_body(TAG, &create_request()).unwrap();
        assert_eq!(body["summary"], "Leg day");
        assert_eq!(body["extendedProperties"]["private"][TAG_PROPERTY], TAG);
        assert!(body["description"].as_str().unwrap().ends_with("Event managed by FitTrackAppEvent."));
        assert_eq!(body["reminders"]["overrides"][0]["minutes"], 15);
        assert_eq!(body["start"]["timeZone"], "UTC");
    }

    #[test]
    fn test_event_body_rejects_inverted_window() {
        let mut request = create_request();
        request.end_time = request.start_time;
        assert!(event_body(TAG, &request).is_err());
    }

    #[test]
    fn test_has_tag() {
        let mut event = CalendarEvent {
            id: "e1".to_string(),
            ..CalendarEvent::default()
        };
        assert!(!has_tag(TAG, &event));

        event.description = Some("Event managed by FitTrackAppEvent.".to_string());
        assert!(has_tag(TAG, &event));

        let mut private = Map::new();
        private.insert(TAG_PROPERTY.to_string(), json!(TAG));
        let tagged = CalendarEvent {
            id: "e2".to_string(),
            extended_properties: Some(ExtendedProperties { private }),
            ..CalendarEvent::default()
        };
        assert!(has_tag(TAG, &tagged));
    }

    #[test]
    fn test_patch_body_only_sends_changes() {
        let existing = CalendarEvent {
            id: "e1".to_string(),
            description: Some("Event managed by FitTrackAppEvent.".to_string()),
            ..CalendarEvent::default()
        };
        let request = UpdateEventRequest {
            summary: Some("Rest day".to_string()),
            ..UpdateEventRequest::default()
        };
        let body = patch_body(TAG, &existing, &request).unwrap();
        assert_eq!(body["summary"], "Rest day");
        assert!(body.get("start").is_none());
        assert!(body.get("description").is_none());
        assert_eq!(body["extendedProperties"]["private"][TAG_PROPERTY], TAG);
    }

    #[test]
    fn test_token_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let token = token_from_response(
            GoogleTokenResponse {
                access_token: "a".to_string(),
                expires_in: 3599,
                refresh_token: None,
                scope: Some(CALENDAR_SCOPE.to_string()),
            },
            now,
        );
        assert_eq!(token.expires_at, now + Duration::seconds(3599));
        assert!(token.refresh_token.is_none());
    }
}
