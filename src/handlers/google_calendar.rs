use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use secrecy::ExposeSecret;

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::calendar::{
        AuthorizationUrlResponse, CalendarEvent, CalendarStatusResponse, CreateEventRequest, OAuthCallbackQuery,
        UpdateEventRequest,
    },
    services::{google_calendar, jwt},
    state::AppState,
};

/// GET /api/google-calendar/authorize
///
/// Returns the Google consent URL. The `state` parameter is a short-lived
/// signed token naming the user, checked again in the callback.
///
/// # HTTP Status Codes
/// - `200 OK`: `{authorizationUrl}`
/// - `503 SERVICE_UNAVAILABLE`: Google credentials not configured
pub async fn authorize(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<AuthorizationUrlResponse>> {
    let oauth_state = jwt::generate_oauth_state(user.id, state.config.jwt.secret.expose_secret())?;
    let authorization_url = state.calendar.authorization_url(&oauth_state)?;
    Ok(Json(AuthorizationUrlResponse { authorization_url }))
}

/// GET /api/google-calendar/oauth2callback?code=&state=
///
/// Public: Google redirects the browser here. Always answers with a redirect
/// to the frontend profile page carrying `google-auth=success|error`.
pub async fn oauth2_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Redirect {
    let frontend = state.config.server.frontend_url.trim_end_matches('/');
    let outcome = match (query.error.as_deref(), query.code.as_deref(), query.state.as_deref()) {
        (None, Some(code), Some(oauth_state)) => complete(&state, code, oauth_state).await,
        (Some(error), _, _) => Err(Error::BadRequest(format!("Google returned error: {}", error))),
        _ => Err(Error::BadRequest("Missing code or state".to_string())),
    };

    match outcome {
        Ok(()) => Redirect::to(&format!("{}/profile?google-auth=success", frontend)),
        Err(e) => {
            tracing::warn!(error = %e, "Google Calendar authorization failed");
            Redirect::to(&format!("{}/profile?google-auth=error", frontend))
        }
    }
}

async fn complete(state: &AppState, code: &str, oauth_state: &str) -> Result<()> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    google_calendar::complete_authorization(
        &mut conn,
        &state.calendar,
        state.config.jwt.secret.expose_secret(),
        code,
        oauth_state,
    )
    .await?;
    Ok(())
}

/// GET /api/google-calendar/status
pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<CalendarStatusResponse>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let is_google_calendar_authorized = google_calendar::is_authorized(&mut conn, user.id).await?;
    Ok(Json(CalendarStatusResponse {
        is_google_calendar_authorized,
    }))
}

/// GET /api/google-calendar/events
///
/// Upcoming events created by this app.
///
/// # HTTP Status Codes
/// - `200 OK`: Event list
/// - `401 UNAUTHORIZED`: Stored tokens could not be refreshed; user must
///   authorize again
/// - `403 FORBIDDEN`: Calendar not connected
pub async fn list_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<CalendarEvent>>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    Ok(Json(google_calendar::list_events(&mut conn, &state.calendar, user.id).await?))
}

/// POST /api/google-calendar/events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CalendarEvent>)> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let event = google_calendar::create_event(&mut conn, &state.calendar, user.id, request).await?;
    tracing::info!(user_id = %user.id, event_id = %event.id, "Calendar event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/google-calendar/events/{event_id}
///
/// Only events carrying the app tag can be changed (403 otherwise).
pub async fn update_event(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<CalendarEvent>> {
    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let event = google_calendar::update_event(&mut conn, &state.calendar, user.id, &event_id, request).await?;
    Ok(Json(event))
}
