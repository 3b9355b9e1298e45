//! Shared application state.

use crate::service::ChatService;
use std::sync::Arc;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChatService>,
}
