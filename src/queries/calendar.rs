use sqlx::Postgres;
use uuid::Uuid;

use crate::{
    error::Result,
    models::calendar::{GoogleCalendarToken, NewGoogleCalendarToken},
    DbConn,
};

const TOKEN_COLUMNS: &str = "user_id, access_token, refresh_token, expires_at, scope, updated_at";

pub async fn get_token(conn: &mut DbConn, user_id: Uuid) -> Result<Option<GoogleCalendarToken>> {
    let sql = format!("SELECT {} FROM google_calendar_tokens WHERE user_id = $1", TOKEN_COLUMNS);
    let token = sqlx::query_as::<Postgres, GoogleCalendarToken>(&sql)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(token)
}

/// Stores fresh tokens. Google omits the refresh token on refresh grants, so
/// an absent one keeps the stored value.
pub async fn upsert_token(
    conn: &mut DbConn,
    user_id: Uuid,
    token: &NewGoogleCalendarToken,
) -> Result<GoogleCalendarToken> {
    let sql = format!(
        r#"
        INSERT INTO google_calendar_tokens (user_id, access_token, refresh_token, expires_at, scope)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET
            access_token = EXCLUDED.access_token,
            refresh_token = COALESCE(EXCLUDED.refresh_token, google_calendar_tokens.refresh_token),
            expires_at = EXCLUDED.expires_at,
            scope = COALESCE(EXCLUDED.scope, google_calendar_tokens.scope),
            updated_at = now()
        RETURNING {}
        "#,
        TOKEN_COLUMNS
    );
    let stored = sqlx::query_as::<Postgres, GoogleCalendarToken>(&sql)
        .bind(user_id)
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(token.expires_at)
        .bind(&token.scope)
        .fetch_one(conn)
        .await?;
    Ok(stored)
}

pub async fn delete_token(conn: &mut DbConn, user_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM google_calendar_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}
