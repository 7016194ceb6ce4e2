use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::{
    error::{Error, Result},
    models::users::{LoginResult, LoginUser, RegisterUser, UserProfile},
    services::{
        cookies::{build_auth_cookie, build_clear_cookie, CookieConfig},
        users,
    },
    state::AppState,
};

/// JSON body plus the Set-Cookie header carrying the session token
pub struct SessionResponse {
    status: StatusCode,
    body: serde_json::Value,
    cookie: String,
}

impl IntoResponse for SessionResponse {
    fn into_response(self) -> Response {
        let (mut parts, body) = (self.status, Json(self.body)).into_response().into_parts();
        if let Ok(cookie) = HeaderValue::from_str(&self.cookie) {
            parts.headers.append(SET_COOKIE, cookie);
        }
        Response::from_parts(parts, body)
    }
}

fn cookie_config(state: &AppState) -> CookieConfig {
    CookieConfig::from_settings(&state.config.server, state.config.jwt.expiration_minutes)
}

fn session_response(state: &AppState, status: StatusCode, result: LoginResult) -> SessionResponse {
    let cookie = build_auth_cookie(&result.token, &cookie_config(state));
    let profile = UserProfile::from(&result.user);
    SessionResponse {
        status,
        body: serde_json::json!({
            "id": profile.id,
            "name": profile.name,
            "email": profile.email,
            "isAdmin": profile.is_admin,
            "token": result.token,
        }),
        cookie,
    }
}

/// POST /api/auth/register
///
/// Registers a new user with name, email and password and signs them in.
///
/// # Request Body
/// - `name`: Display name (required)
/// - `email`: Email address (must be unique)
/// - `password`: 8 to 128 characters, no spaces
///
/// # Returns
/// The new profile plus the session token; the token is also set as the
/// `jwt` cookie.
///
/// # HTTP Status Codes
/// - `201 CREATED`: User registered
/// - `400 BAD_REQUEST`: Validation error
/// - `409 CONFLICT`: Email already exists
/// - `500 INTERNAL_SERVER_ERROR`: Database error
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> Result<SessionResponse> {
    // Validate before touching the pool so bad input is rejected even when
    // the database is down
    users::validate_registration(&request)?;

    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let result = users::register_user(&mut conn, &state.config, request).await?;
    Ok(session_response(&state, StatusCode::CREATED, result))
}

/// POST /api/auth/login
///
/// Authenticates a user with email and password.
///
/// # HTTP Status Codes
/// - `200 OK`: Authentication successful, `jwt` cookie set
/// - `401 UNAUTHORIZED`: Invalid email or password
/// - `500 INTERNAL_SERVER_ERROR`: Database error
///
/// # Client Compatibility
/// - **Browser clients**: the cookie is sent automatically afterwards
/// - **API clients**: send the returned `token` as `Authorization: Bearer`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginUser>,
) -> Result<SessionResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(Error::Authentication("Invalid email or password".to_string()));
    }

    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let result = users::login_user(&mut conn, &state.config, request).await?;
    tracing::info!(user_id = %result.user.id, "User logged in");
    Ok(session_response(&state, StatusCode::OK, result))
}

/// POST /api/auth/logout
///
/// Clears the session cookie. Tokens are stateless, so there is nothing to
/// revoke server-side.
pub async fn logout(State(state): State<AppState>) -> SessionResponse {
    SessionResponse {
        status: StatusCode::OK,
        body: serde_json::json!({ "message": "Logged out successfully" }),
        cookie: build_clear_cookie(&cookie_config(&state)),
    }
}
