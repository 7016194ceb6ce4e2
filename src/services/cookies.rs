use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Cookie carrying the session JWT.
pub const AUTH_COOKIE: &str = "jwt";

/// Cookie security configuration
///
/// Controls how the session cookie is created and secured for browser clients
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CookieConfig {
    /// Name of the session cookie (default: "jwt")
    pub name: String,
    /// Secure flag ensures HTTPS-only transmission (should be true in production)
    pub secure: bool,
    /// SameSite attribute for CSRF protection
    pub same_site: SameSite,
    /// Path attribute to limit cookie scope
    pub path: String,
    /// Lifetime in seconds, aligned with the JWT expiration
    pub max_age_seconds: i64,
}

/// SameSite cookie attribute for CSRF protection
#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Strict mode - cookie not sent with cross-site requests
    Strict,
    /// Lax mode - cookie sent with top-level navigations
    Lax,
    /// None mode - cookie sent with all requests (requires Secure)
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: AUTH_COOKIE.to_string(),
            secure: false,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            max_age_seconds: 24 * 60 * 60,
        }
    }
}

impl CookieConfig {
    /// Derives the cookie settings from server and JWT configuration.
    pub fn from_settings(server: &ServerConfig, expiration_minutes: i64) -> Self {
        Self {
            secure: server.secure_cookies,
            max_age_seconds: expiration_minutes * 60,
            ..Self::default()
        }
    }
}

/// Extracts JWT from either Authorization header or cookie
///
/// Priority order:
/// 1. Authorization header (for API clients)
/// 2. Cookie (fallback for browser clients)
///
/// # Example
/// ```rust,no_run
/// use fittrack::services::cookies::extract_jwt_token;
///
/// let token = extract_jwt_token(
///     Some("Bearer eyJhbGc..."),
///     Some("cookie_token_value")
/// ).unwrap();
/// ```
pub fn extract_jwt_token(
    auth_header: Option<&str>,
    cookie_value: Option<&str>,
) -> Result<String> {
    if let Some(token) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if let Some(cookie) = cookie_value {
        if !cookie.is_empty() {
            return Ok(cookie.to_string());
        }
    }

    Err(Error::Authentication("Not authorized, no token".to_string()))
}

/// Builds a Set-Cookie header value for the session token
///
/// # Example
/// ```rust,no_run
/// use fittrack::services::cookies::{build_auth_cookie, CookieConfig};
///
/// let cookie = build_auth_cookie("my_token", &CookieConfig::default());
/// // Returns: "jwt=my_token; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400"
/// ```
pub fn build_auth_cookie(token: &str, config: &CookieConfig) -> String {
    format!(
        "{}={}; HttpOnly{}; SameSite={}; Path={}; Max-Age={}",
        config.name,
        token,
        if config.secure { "; Secure" } else { "" },
        config.same_site.as_str(),
        config.path,
        config.max_age_seconds
    )
}

/// Builds a Set-Cookie header value that clears the session cookie
///
/// Used during logout to invalidate the cookie by setting Max-Age=0
pub fn build_clear_cookie(config: &CookieConfig) -> String {
    format!(
        "{}=; HttpOnly{}; SameSite={}; Path={}; Max-Age=0",
        config.name,
        if config.secure { "; Secure" } else { "" },
        config.same_site.as_str(),
        config.path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_jwt_token_from_header() {
        let token = extract_jwt_token(Some("Bearer my-token"), None).unwrap();
        assert_eq!(token, "my-token");
    }

    #[test]
    fn test_extract_jwt_token_from_cookie() {
        let token = extract_jwt_token(None, Some("my-token")).unwrap();
        assert_eq!(token, "my-token");
    }

    #[test]
    fn test_extract_jwt_token_priority_header_over_cookie() {
        let token = extract_jwt_token(Some("Bearer header-token"), Some("cookie-token")).unwrap();
        assert_eq!(token, "header-token");
    }

    #[test]
    fn test_extract_jwt_token_falls_back_to_cookie_on_bad_header() {
        let token = extract_jwt_token(Some("Basic abc"), Some("cookie-token")).unwrap();
        assert_eq!(token, "cookie-token");
    }

    #[test]
    fn test_extract_jwt_token_no_token() {
        assert!(extract_jwt_token(None, None).is_err());
        assert!(extract_jwt_token(Some("Bearer "), Some("")).is_err());
    }

    #[test]
    fn test_build_auth_cookie() {
        let cookie = build_auth_cookie("my-token", &CookieConfig::default());
        assert!(cookie.starts_with("jwt=my-token"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_build_auth_cookie_from_settings() {
        let server = ServerConfig {
            secure_cookies: true,
            ..ServerConfig::default()
        };
        let config = CookieConfig::from_settings(&server, 30);
        let cookie = build_auth_cookie("t", &config);
        assert!(cookie.contains("; Secure"));
        assert!(cookie.contains("Max-Age=1800"));
    }

    #[test]
    fn test_build_clear_cookie() {
        let cookie = build_clear_cookie(&CookieConfig::default());
        assert!(cookie.starts_with("jwt=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
