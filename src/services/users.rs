use crate::DbConn;
use crate::{
    config::Config,
    error::{Error, Result},
    models::users::{LoginResult, LoginUser, NewUser, RegisterUser, UpdateProfile, UpdateUser, User},
    queries::users,
    services::jwt,
    validation::{validate_email, validate_name, validate_password},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Emails are stored and compared lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();
    Ok(hash)
}

/// Verifies a password against a password hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!("Password verification failed: {}", e))),
    }
}

/// Validates registration input before any database work.
pub fn validate_registration(register_user: &RegisterUser) -> Result<()> {
    validate_name(&register_user.name)?;
    validate_email(&register_user.email)?;
    validate_password(&register_user.password)?;
    Ok(())
}

fn issue_token(config: &Config, user_id: Uuid) -> Result<String> {
    jwt::generate_jwt(
        user_id,
        config.jwt.secret.expose_secret(),
        config.jwt.expiration_minutes,
    )
}

/// Registers a new user and signs them in.
///
/// Accounts registered with the configured bootstrap email become admins.
pub async fn register_user(conn: &mut DbConn, config: &Config, register_user: RegisterUser) -> Result<LoginResult> {
    validate_registration(&register_user)?;

    let email = normalize_email(&register_user.email);
    let is_admin = config
        .admin
        .bootstrap_email
        .as_deref()
        .is_some_and(|admin| normalize_email(admin) == email);

    let new_user = NewUser {
        name: register_user.name.trim().to_string(),
        email,
        password_hash: hash_password(&register_user.password)?,
        is_admin,
    };

    let user = users::create_user(conn, new_user).await?;
    let token = issue_token(config, user.id)?;
    tracing::info!(user_id = %user.id, is_admin = user.is_admin, "User registered");

    Ok(LoginResult { user, token })
}

/// Checks credentials and issues a session token.
pub async fn login_user(conn: &mut DbConn, config: &Config, login: LoginUser) -> Result<LoginResult> {
    let email = normalize_email(&login.email);
    let user = users::get_user_by_email(conn, &email)
        .await?
        .ok_or_else(|| Error::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&login.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(config, user.id)?;
    Ok(LoginResult { user, token })
}

pub async fn get_user(conn: &mut DbConn, user_id: Uuid) -> Result<User> {
    users::get_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
}

/// Updates name, email and/or password; omitted fields are unchanged.
pub async fn update_profile(conn: &mut DbConn, user_id: Uuid, update: UpdateProfile) -> Result<User> {
    let mut changes = UpdateUser::default();

    if let Some(name) = update.name {
        validate_name(&name)?;
        changes.name = Some(name.trim().to_string());
    }
    if let Some(email) = update.email {
        validate_email(&email)?;
        changes.email = Some(normalize_email(&email));
    }
    if let Some(password) = update.password {
        validate_password(&password)?;
        changes.password_hash = Some(hash_password(&password)?);
    }

    users::update_user(conn, user_id, changes).await
}

/// Sets a new password for a user (admin reset).
pub async fn reset_password(conn: &mut DbConn, user_id: Uuid, new_password: &str) -> Result<User> {
    validate_password(new_password)?;
    let changes = UpdateUser {
        password_hash: Some(hash_password(new_password)?),
        ..UpdateUser::default()
    };
    users::update_user(conn, user_id, changes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_validate_registration() {
        let valid = RegisterUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "analytical-engine".to_string(),
        };
        assert!(validate_registration(&valid).is_ok());

        let bad_email = RegisterUser {
            email: "nope".to_string(),
            ..valid.clone()
        };
        assert!(validate_registration(&bad_email).is_err());

        let short_password = RegisterUser {
            password: "short".to_string(),
            ..valid
        };
        assert!(validate_registration(&short_password).is_err());
    }
}
