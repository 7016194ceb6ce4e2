use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
};

/// Rejects non-admin users with 403.
///
/// Must run after [`jwt_auth_middleware`](super::auth::jwt_auth_middleware),
/// which puts the user into the request extensions.
pub async fn require_admin(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !user.is_admin {
        tracing::info!(user_id = %user.id, "Admin route rejected for non-admin user");
        return Err(Error::Forbidden("Not authorized as an admin".to_string()));
    }
    Ok(next.run(request).await)
}
