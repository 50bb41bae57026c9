use std::sync::Arc;

use nerve_core::Responder;

use crate::auth::BridgeAuth;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub responder: Arc<Responder>,
    pub auth: Arc<BridgeAuth>,
}

impl AppState {
    pub fn new(responder: Arc<Responder>, auth: BridgeAuth) -> Self {
        Self {
            responder,
            auth: Arc::new(auth),
        }
    }
}
