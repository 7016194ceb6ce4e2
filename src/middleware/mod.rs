pub mod admin;
pub mod auth;

pub use admin::require_admin;
pub use auth::{AuthenticatedUser, Viewer, jwt_auth_middleware, optional_auth_middleware};
