use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::Error,
    middleware::auth::{AuthenticatedUser, Viewer},
    queries,
    services::chatbot::{TransitionRequest, TransitionResponse},
    state::AppState,
};

/// POST /api/chat/message
///
/// Advances the scripted assistant by one turn. Works for guests and
/// signed-in users; the server decides which dialogue applies from the
/// session, never from the request body.
///
/// # Request Body
/// - `currentState`: State name from the previous response, or null to start
/// - `selectedOption`: Text of a tapped option
/// - `userInput`: Free text typed by the user
/// - `context`: Context object from the previous response
///
/// A session whose account cannot be loaded (e.g. database outage) gets the
/// member error state rather than the guest dialogue.
///
/// # HTTP Status Codes
/// - `200 OK`: Every dialogue outcome, including the error state
/// - `400`/`422`: Malformed JSON body
pub async fn post_message(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<TransitionRequest>,
) -> Json<TransitionResponse> {
    let response = match viewer {
        Viewer::Guest => state.dialogue.advance(request, None).await,
        Viewer::Member(user) => {
            if !user.has_interacted_with_chatbot {
                mark_interaction(&state, &user).await;
            }
            let identity = user.chat_identity();
            state.dialogue.advance(request, Some(&identity)).await
        }
        Viewer::Unresolved => state.dialogue.account_unavailable(request),
    };
    Json(response)
}

/// Records the first contact with the assistant. Failures only get logged.
async fn mark_interaction(state: &AppState, user: &AuthenticatedUser) {
    let result = match state.pool.acquire().await {
        Ok(mut conn) => queries::users::mark_chatbot_interaction(&mut conn, user.id).await,
        Err(e) => Err(Error::Sqlx(e)),
    };
    match result {
        Ok(true) => tracing::info!(user_id = %user.id, "[Chatbot] First interaction recorded"),
        Ok(false) => {}
        Err(e) => tracing::warn!(user_id = %user.id, error = %e, "[Chatbot] Failed to record interaction"),
    }
}
