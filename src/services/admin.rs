use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    models::users::{Analytics, UserSummary},
    queries::users,
    services::users::reset_password,
};

pub async fn list_users(conn: &mut DbConn) -> Result<Vec<UserSummary>> {
    let users = users::list_users(conn).await?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

/// Deletes a non-admin account together with all of its records.
pub async fn delete_user(conn: &mut DbConn, acting_admin: Uuid, user_id: Uuid) -> Result<()> {
    let user = users::get_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if user.is_admin {
        return Err(Error::BadRequest("Cannot delete an admin user".to_string()));
    }

    users::delete_user(conn, user.id).await?;
    tracing::info!(admin_id = %acting_admin, user_id = %user.id, "User deleted by admin");
    Ok(())
}

pub async fn reset_user_password(conn: &mut DbConn, acting_admin: Uuid, user_id: Uuid, new_password: &str) -> Result<()> {
    if users::get_user_by_id(conn, user_id).await?.is_none() {
        return Err(Error::NotFound("User not found".to_string()));
    }
    reset_password(conn, user_id, new_password).await?;
    tracing::info!(admin_id = %acting_admin, user_id = %user_id, "Password reset by admin");
    Ok(())
}

pub async fn analytics(conn: &mut DbConn) -> Result<Analytics> {
    users::analytics(conn).await
}
