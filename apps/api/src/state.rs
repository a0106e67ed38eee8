use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::matching_client::MatchingClient;
use crate::session::busy::InFlight;
use crate::store::{SessionState, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable key-value backend. Redis when configured, in-memory otherwise.
    pub store: Arc<dyn SessionStore>,
    pub matching: MatchingClient,
    pub config: Config,
    pub in_flight: InFlight,
}

impl AppState {
    /// Typed accessors for one session's persisted values.
    pub fn session(&self, session_id: Uuid) -> SessionState {
        SessionState::new(Arc::clone(&self.store), session_id)
    }
}
