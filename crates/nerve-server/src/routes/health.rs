use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/health: liveness plus which backends are in play. Public.
pub async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    let roast = if app.responder.roast_is_remote() {
        "remote"
    } else {
        "static"
    };
    Json(serde_json::json!({
        "status": "ok",
        "backend": app.responder.backend().as_str(),
        "roast": roast,
    }))
}
