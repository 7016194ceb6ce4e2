//! JWT authentication middleware
//!
//! Resolves the session token from the `Authorization` header or the `jwt`
//! cookie and loads the user it names.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::users::User,
    queries,
    services::{
        chatbot::ChatIdentity,
        cookies::{extract_jwt_token, AUTH_COOKIE},
        jwt::get_user_id_from_token,
    },
    state::AppState,
};

/// Authenticated user extracted from JWT token
///
/// Added to request extensions by [`jwt_auth_middleware`].
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    /// User's unique identifier
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    /// Whether the user has talked to the assistant before
    pub has_interacted_with_chatbot: bool,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            has_interacted_with_chatbot: user.has_interacted_with_chatbot,
        }
    }
}

impl AuthenticatedUser {
    pub fn chat_identity(&self) -> ChatIdentity {
        ChatIdentity {
            user_id: self.id,
            display_name: self.name.clone(),
        }
    }
}

/// Possibly-anonymous caller, set by [`optional_auth_middleware`].
#[derive(Debug, Clone, Default)]
pub enum Viewer {
    #[default]
    Guest,
    Member(AuthenticatedUser),
    /// A session was presented but the account could not be loaded, e.g.
    /// the database was unreachable.
    Unresolved,
}

impl Viewer {
    fn from_result(result: Result<AuthenticatedUser>) -> Self {
        match result {
            Ok(user) => Viewer::Member(user),
            Err(Error::Authentication(_)) => Viewer::Guest,
            Err(e) => {
                tracing::warn!(error = %e, "Optional authentication could not load the account");
                Viewer::Unresolved
            }
        }
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    let cookie_header = headers.get("cookie").and_then(|h| h.to_str().ok());
    let cookie_token = cookie_header.and_then(|h| extract_cookie_value(h, AUTH_COOKIE));

    let token = extract_jwt_token(auth_header, cookie_token.as_deref())?;
    let user_id = get_user_id_from_token(&token, state.config.jwt.secret.expose_secret())?;

    let mut conn = state.pool.acquire().await.map_err(Error::Sqlx)?;
    let user = queries::users::get_user_by_id(&mut conn, user_id)
        .await?
        .ok_or_else(|| Error::Authentication("Not authorized, user not found".to_string()))?;

    Ok(user.into())
}

/// JWT authentication middleware
///
/// # Token Sources
/// - **Authorization header** (API clients): `Bearer <token>`
/// - **Cookie** (Browser clients): `jwt=<token>`
///
/// # Behavior
/// 1. Extracts the token (header takes priority)
/// 2. Validates signature, expiration and purpose
/// 3. Loads the user from the database
/// 4. Adds `AuthenticatedUser` to request extensions
/// 5. Returns 401 if the token is missing, invalid, expired, or names a
///    deleted user
///
/// # Usage
/// ```ignore
/// Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         jwt_auth_middleware,
///     ))
/// ```
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = authenticate(&state, &headers).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Like [`jwt_auth_middleware`] but lets anonymous requests through.
///
/// A bad or missing token yields [`Viewer::Guest`] rather than 401, so guests
/// can use endpoints such as the chat assistant. Any other failure while
/// loading the account yields [`Viewer::Unresolved`]; it never downgrades a
/// signed-in member to a guest.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = Viewer::from_result(authenticate(&state, &headers).await);
    request.extensions_mut().insert(viewer);
    next.run(request).await
}

/// Extract specific cookie value from Cookie header
///
/// # Arguments
/// * `cookie_str` - Cookie header value
/// * `cookie_name` - Name of the cookie to extract
///
/// # Returns
/// * `Some(token)` - Cookie value if found
/// * `None` - Cookie not found
fn extract_cookie_value(cookie_str: &str, cookie_name: &str) -> Option<String> {
    cookie_str
        .split(';')
        .filter_map(|s| s.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::now_v7(),
            name: "Priya".to_string(),
            email: "priya@example.com".to_string(),
            is_admin: false,
            has_interacted_with_chatbot: true,
        }
    }

    #[test]
    fn test_viewer_from_loaded_user_is_member() {
        let user = user();
        match Viewer::from_result(Ok(user.clone())) {
            Viewer::Member(member) => assert_eq!(member.id, user.id),
            other => panic!("expected member, got {:?}", other),
        }
    }

    #[test]
    fn test_viewer_without_valid_session_is_guest() {
        let viewer = Viewer::from_result(Err(Error::Authentication("Not authorized, no token".to_string())));
        assert!(matches!(viewer, Viewer::Guest));
    }

    #[test]
    fn test_viewer_is_not_downgraded_when_account_cannot_load() {
        let viewer = Viewer::from_result(Err(Error::Sqlx(sqlx::Error::PoolTimedOut)));
        assert!(matches!(viewer, Viewer::Unresolved));
    }

    #[test]
    fn test_extract_cookie_value() {
        let cookie_str = "jwt=abc123; theme=dark";
        assert_eq!(extract_cookie_value(cookie_str, "jwt"), Some("abc123".to_string()));
        assert_eq!(extract_cookie_value(cookie_str, "theme"), Some("dark".to_string()));
        assert_eq!(extract_cookie_value(cookie_str, "nonexistent"), None);
    }

    #[test]
    fn test_extract_cookie_value_does_not_match_prefix() {
        let cookie_str = "jwt_old=stale; jwt=fresh";
        assert_eq!(extract_cookie_value(cookie_str, "jwt"), Some("fresh".to_string()));
    }

    #[test]
    fn test_extract_cookie_value_keeps_padding() {
        // Base64 padding inside a value must survive
        let cookie_str = "other=x; jwt=a.b.c==";
        assert_eq!(extract_cookie_value(cookie_str, "jwt"), Some("a.b.c==".to_string()));
    }

    #[test]
    fn test_extract_cookie_value_empty() {
        let cookie_str = "jwt=; other=value";
        // Empty cookie value returns empty string (not None)
        assert_eq!(extract_cookie_value(cookie_str, "jwt"), Some("".to_string()));
    }
}
