use axum::extract::State;
use axum::Json;
use nerve_core::{Inbound, Outbound};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Longest inbound message accepted from the gateway, in characters.
pub const MAX_INBOUND_CHARS: usize = 4000;

#[derive(Debug, Serialize)]
pub struct RepliesBody {
    pub replies: Vec<Outbound>,
}

/// POST /api/messages: run one chat message through the responder.
///
/// Replies come back in the order they must be posted. A message that is
/// not a command gets an empty list, not an error.
pub async fn post_message(
    State(app): State<AppState>,
    Json(msg): Json<Inbound>,
) -> Result<Json<RepliesBody>, AppError> {
    if msg.channel_id.trim().is_empty() || msg.author_id.trim().is_empty() {
        return Err(AppError::bad_request(
            "channel_id and author_id must not be empty",
        ));
    }
    if msg.content.chars().count() > MAX_INBOUND_CHARS {
        return Err(AppError::bad_request(format!(
            "content exceeds {MAX_INBOUND_CHARS} characters"
        )));
    }

    let replies = app.responder.handle(&msg).await;
    Ok(Json(RepliesBody { replies }))
}
