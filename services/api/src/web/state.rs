//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use learnwell_core::{ports::ProfileStore, ContentGenerator};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub generator: Arc<ContentGenerator>,
}
