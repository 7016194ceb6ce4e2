use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{Error, Result},
    handlers::{
        admin, auth, chat, dashboard, external, google_calendar, health, meal_plans, profile, water_intake,
        workouts,
    },
    middleware::{jwt_auth_middleware, optional_auth_middleware, require_admin},
    state::AppState,
};

/// Builds the full application router mounted under `/api`.
pub fn create_router(state: AppState) -> Result<Router> {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/google-calendar/oauth2callback", get(google_calendar::oauth2_callback));

    let chat_routes = Router::new()
        .route("/chat/message", post(chat::post_message))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth_middleware));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/users/{id}/reset-password", put(admin::reset_password))
        .route("/admin/analytics", get(admin::analytics))
        .route_layer(middleware::from_fn(require_admin));

    let protected_routes = Router::new()
        .route("/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/profile/status", get(profile::get_status).put(profile::update_status))
        .route("/meal-plans/{date}", get(meal_plans::get_meal_plan))
        .route("/meal-plans/{date}/items", post(meal_plans::add_meal_item))
        .route("/meal-plans/{date}/items/{item_id}", delete(meal_plans::delete_meal_item))
        .route(
            "/water-intake/{date}",
            get(water_intake::get_water_intake).put(water_intake::update_water_intake),
        )
        .route("/workouts/{date}", get(workouts::get_workout_log).post(workouts::add_exercise))
        .route(
            "/workouts/{date}/{exercise_id}",
            put(workouts::update_exercise).delete(workouts::delete_exercise),
        )
        .route("/dashboard/today-summary", get(dashboard::today_summary))
        .route("/external/food-nutrition", get(external::food_nutrition))
        .route("/external/calories-burned", get(external::calories_burned))
        .route("/google-calendar/authorize", get(google_calendar::authorize))
        .route("/google-calendar/status", get(google_calendar::status))
        .route(
            "/google-calendar/events",
            get(google_calendar::list_events).post(google_calendar::create_event),
        )
        .route("/google-calendar/events/{event_id}", put(google_calendar::update_event))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(chat_routes)
        .merge(protected_routes);

    let cors = cors_layer(&state.config.server.frontend_url)?;

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// CORS for the browser frontend; credentials are allowed so the session
/// cookie travels with cross-origin requests.
fn cors_layer(frontend_url: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
        .map_err(|e| Error::Internal(format!("Invalid frontend URL for CORS: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, database::connect_lazy};
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    fn router() -> Router {
        let config = Config::default();
        let pool = connect_lazy(&config.database).unwrap();
        create_router(AppState::new(config, pool).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_route_requires_token() {
        let response = router()
            .oneshot(Request::get("/api/admin/analytics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_gate_runs_before_path_parsing() {
        // Without a token the gate answers first
        let response = router()
            .oneshot(Request::get("/api/water-intake/yesterday").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_cors_rejects_unusable_origin() {
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(cors_layer("http://bad\norigin").is_err());
    }
}
