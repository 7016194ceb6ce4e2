use crate::error::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of the signed `state` parameter of the Google OAuth round trip.
pub const OAUTH_STATE_EXPIRATION_MINUTES: i64 = 10;

/// What a token may be used for. Session tokens and OAuth state tokens share
/// the signing secret, so each verifier checks the purpose explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    OauthState,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user_id as string
    pub sub: String,
    /// Expiration time as Unix timestamp
    pub exp: i64,
    /// Issued at time as Unix timestamp
    pub iat: i64,
    pub purpose: TokenPurpose,
}

fn sign(user_id: Uuid, secret: &str, expiration_minutes: i64, purpose: TokenPurpose) -> Result<String> {
    let now = Utc::now();
    let expiration = now + Duration::minutes(expiration_minutes);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp(),
        iat: now.timestamp(),
        purpose,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| Error::Internal(format!("Failed to generate JWT: {}", e)))
}

/// Generates a session JWT for a user
///
/// # Arguments
/// * `user_id` - The user's UUID
/// * `secret` - The JWT secret key for signing
/// * `expiration_minutes` - Token expiration time in minutes (from config)
///
/// # Returns
/// A JWT token string
///
/// # Example
/// ```rust,no_run
/// use fittrack::services::jwt::generate_jwt;
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let token = generate_jwt(user_id, "my-secret", 15)?;
/// # Ok::<(), fittrack::error::Error>(())
/// ```
pub fn generate_jwt(user_id: Uuid, secret: &str, expiration_minutes: i64) -> Result<String> {
    sign(user_id, secret, expiration_minutes, TokenPurpose::Session)
}

/// Verifies a JWT token and returns the claims if valid
///
/// # Errors
/// Returns an authentication error if the token is invalid, expired, or has a
/// bad signature
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        let error_msg = e.to_string().to_lowercase();
        if error_msg.contains("expired") {
            Error::Authentication("Token has expired".to_string())
        } else if error_msg.contains("signature") {
            Error::Authentication("Invalid token signature".to_string())
        } else {
            Error::Authentication(format!("Invalid token: {}", e))
        }
    })?;

    Ok(token_data.claims)
}

fn user_id_for_purpose(token: &str, secret: &str, purpose: TokenPurpose) -> Result<Uuid> {
    let claims = verify_jwt(token, secret)?;
    if claims.purpose != purpose {
        return Err(Error::Authentication("Token not valid for this use".to_string()));
    }
    Uuid::parse_str(&claims.sub)
        .map_err(|_| Error::Authentication("Invalid user_id in token".to_string()))
}

/// Extracts user_id from a valid session token
///
/// # Example
/// ```rust,no_run
/// use fittrack::services::jwt::{generate_jwt, get_user_id_from_token};
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let token = generate_jwt(user_id, "my-secret", 15)?;
/// let extracted_id = get_user_id_from_token(&token, "my-secret")?;
/// # Ok::<(), fittrack::error::Error>(())
/// ```
pub fn get_user_id_from_token(token: &str, secret: &str) -> Result<Uuid> {
    user_id_for_purpose(token, secret, TokenPurpose::Session)
}

/// Signs the OAuth `state` parameter binding a Google consent round trip to
/// the user who started it.
pub fn generate_oauth_state(user_id: Uuid, secret: &str) -> Result<String> {
    sign(user_id, secret, OAUTH_STATE_EXPIRATION_MINUTES, TokenPurpose::OauthState)
}

/// Returns the user that started the OAuth round trip.
pub fn verify_oauth_state(state: &str, secret: &str) -> Result<Uuid> {
    user_id_for_purpose(state, secret, TokenPurpose::OauthState)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing";

    #[test]
    fn test_generate_jwt() {
        let user_id = Uuid::now_v7();
        let token = generate_jwt(user_id, SECRET, 15).unwrap();
        assert!(!token.is_empty());
        assert!(token.contains('.'));
    }

    #[test]
    fn test_verify_jwt_valid() {
        let user_id = Uuid::now_v7();
        let token = generate_jwt(user_id, SECRET, 15).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.purpose, TokenPurpose::Session);
    }

    #[test]
    fn test_verify_jwt_invalid_signature() {
        let token = generate_jwt(Uuid::now_v7(), SECRET, 15).unwrap();
        assert!(verify_jwt(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_verify_jwt_invalid_format() {
        assert!(verify_jwt("invalid.token.here", SECRET).is_err());
    }

    #[test]
    fn test_verify_jwt_expired() {
        let token = generate_jwt(Uuid::now_v7(), SECRET, -10).unwrap();
        match verify_jwt(&token, SECRET) {
            Err(Error::Authentication(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("expected expiry error, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_get_user_id_from_token() {
        let user_id = Uuid::now_v7();
        let token = generate_jwt(user_id, SECRET, 15).unwrap();
        assert_eq!(get_user_id_from_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_oauth_state_round_trip() {
        let user_id = Uuid::now_v7();
        let state = generate_oauth_state(user_id, SECRET).unwrap();
        assert_eq!(verify_oauth_state(&state, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_purposes_are_not_interchangeable() {
        let user_id = Uuid::now_v7();
        let session = generate_jwt(user_id, SECRET, 15).unwrap();
        let state = generate_oauth_state(user_id, SECRET).unwrap();
        assert!(verify_oauth_state(&session, SECRET).is_err());
        assert!(get_user_id_from_token(&state, SECRET).is_err());
    }
}
