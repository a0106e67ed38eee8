use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::errors::AppError;

/// Sessions with an upload or model run outstanding.
///
/// Stands in for the disabled submit button: a second call for the same
/// session is refused until the first one finishes.
#[derive(Clone, Default)]
pub struct InFlight {
    sessions: Arc<Mutex<HashSet<Uuid>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the session busy until the returned guard is dropped.
    pub fn begin(&self, session_id: Uuid) -> Result<InFlightGuard, AppError> {
        if !lock(&self.sessions).insert(session_id) {
            return Err(AppError::Conflict(
                "A request for this session is already running".to_string(),
            ));
        }

        Ok(InFlightGuard {
            sessions: Arc::clone(&self.sessions),
            session_id,
        })
    }

    #[cfg(test)]
    pub fn is_busy(&self, session_id: Uuid) -> bool {
        lock(&self.sessions).contains(&session_id)
    }
}

pub struct InFlightGuard {
    sessions: Arc<Mutex<HashSet<Uuid>>>,
    session_id: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.sessions).remove(&self.session_id);
    }
}

// The set stays consistent even if a holder panicked, so poisoning is ignored.
fn lock(sessions: &Mutex<HashSet<Uuid>>) -> MutexGuard<'_, HashSet<Uuid>> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
