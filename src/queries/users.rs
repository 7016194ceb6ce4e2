use crate::{
    error::{Error, Result},
    models::users::{Analytics, NewUser, UpdateUser, User},
};
use sqlx::Postgres;
use uuid::Uuid;

use crate::DbConn;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, is_admin, has_interacted_with_chatbot, created_at, updated_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    let error_msg = e.to_string().to_lowercase();
    error_msg.contains("unique")
        || error_msg.contains("duplicate key")
        || error_msg.contains("users_email_key")
}

/// Creates a new user in the database.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let sql = format!(
        "INSERT INTO users (name, email, password_hash, is_admin) VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    );
    sqlx::query_as::<Postgres, User>(&sql)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.is_admin)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("User with this email already exists".to_string())
            } else {
                Error::Sqlx(e)
            }
        })
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let user = sqlx::query_as::<Postgres, User>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// Gets a single user by their email address. The user may not exist.
pub async fn get_user_by_email(conn: &mut DbConn, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
    let user = sqlx::query_as::<Postgres, User>(&sql)
        .bind(email)
        .fetch_optional(conn)
        .await?;
    Ok(user)
}

/// Lists all users, newest first.
pub async fn list_users(conn: &mut DbConn) -> Result<Vec<User>> {
    let sql = format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS);
    let users = sqlx::query_as::<Postgres, User>(&sql).fetch_all(conn).await?;
    Ok(users)
}

/// Applies the provided changes; absent fields keep their stored value.
pub async fn update_user(conn: &mut DbConn, id: Uuid, changes: UpdateUser) -> Result<User> {
    let sql = format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    );
    sqlx::query_as::<Postgres, User>(&sql)
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("Email is already in use".to_string())
            } else {
                Error::Sqlx(e)
            }
        })?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
}

/// Records that the user has opened the chatbot. Returns false if it was
/// already marked.
pub async fn mark_chatbot_interaction(conn: &mut DbConn, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE users SET has_interacted_with_chatbot = TRUE, updated_at = now() \
         WHERE id = $1 AND has_interacted_with_chatbot = FALSE",
    )
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Deletes a user; owned records cascade.
pub async fn delete_user(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Usage counts for the admin dashboard.
pub async fn analytics(conn: &mut DbConn) -> Result<Analytics> {
    let (total_users, total_meal_plans_logged, total_workouts_logged): (i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM meal_plans),
                (SELECT COUNT(*) FROM workout_logs)
            "#,
        )
        .fetch_one(conn)
        .await?;

    Ok(Analytics {
        total_users,
        total_meal_plans_logged,
        total_workouts_logged,
    })
}
