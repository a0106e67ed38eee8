use std::sync::Arc;

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cv::CvProfile;
use crate::models::filters::FilterState;
use crate::models::job::{validate_jobs, JobRecord};
use crate::store::{keys, SessionStore};

/// Typed view over one session's keys.
///
/// Absent keys read as defaults. A value that no longer parses is logged and
/// also read as its default, so a bad write can never wedge a session.
#[derive(Clone)]
pub struct SessionState {
    store: Arc<dyn SessionStore>,
    session_id: Uuid,
}

impl SessionState {
    pub fn new(store: Arc<dyn SessionStore>, session_id: Uuid) -> Self {
        Self { store, session_id }
    }

    fn key(&self, name: &str) -> String {
        format!("smartmatch:{}:{}", self.session_id, name)
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, AppError> {
        let Some(raw) = self.store.get(&self.key(name)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(
                    "Discarding unreadable '{name}' for session {}: {e}",
                    self.session_id
                );
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to encode '{name}'"))?;
        self.store.set(&self.key(name), &raw).await?;
        debug!("Stored '{name}' for session {}", self.session_id);
        Ok(())
    }

    /// Server-side path of the last uploaded CV. Stored as a plain string.
    pub async fn uploaded_cv_path(&self) -> Result<Option<String>, AppError> {
        Ok(self
            .store
            .get(&self.key(keys::UPLOADED_CV_PATH))
            .await?
            .filter(|p| !p.trim().is_empty()))
    }

    pub async fn set_uploaded_cv_path(&self, path: &str) -> Result<(), AppError> {
        self.store
            .set(&self.key(keys::UPLOADED_CV_PATH), path)
            .await
    }

    /// Last model run's job list. A stored list that fails validation is dropped.
    pub async fn jobs(&self) -> Result<Vec<JobRecord>, AppError> {
        let jobs: Vec<JobRecord> = self.read_json(keys::JOBS).await?.unwrap_or_default();
        if let Err(reason) = validate_jobs(&jobs) {
            warn!(
                "Discarding stored jobs for session {}: {reason}",
                self.session_id
            );
            return Ok(Vec::new());
        }
        Ok(jobs)
    }

    pub async fn set_jobs(&self, jobs: &[JobRecord]) -> Result<(), AppError> {
        self.write_json(keys::JOBS, jobs).await
    }

    pub async fn filter_state(&self) -> Result<FilterState, AppError> {
        Ok(self
            .read_json(keys::FILTER_STATE)
            .await?
            .unwrap_or_default())
    }

    pub async fn set_filter_state(&self, state: &FilterState) -> Result<(), AppError> {
        self.write_json(keys::FILTER_STATE, state).await
    }

    pub async fn cv_profile(&self) -> Result<CvProfile, AppError> {
        Ok(self.read_json(keys::CV_PROFILE).await?.unwrap_or_default())
    }

    pub async fn set_cv_profile(&self, profile: &CvProfile) -> Result<(), AppError> {
        self.write_json(keys::CV_PROFILE, profile).await
    }

    pub async fn saved_jobs(&self) -> Result<Vec<String>, AppError> {
        Ok(self.read_json(keys::SAVED_JOBS).await?.unwrap_or_default())
    }

    /// Adds `job_url` to the saved list, or removes it if already there.
    /// Returns the new list and whether the job is now saved.
    pub async fn toggle_saved_job(&self, job_url: &str) -> Result<(Vec<String>, bool), AppError> {
        let mut saved = self.saved_jobs().await?;
        let now_saved = match saved.iter().position(|url| url == job_url) {
            Some(index) => {
                saved.remove(index);
                false
            }
            None => {
                saved.push(job_url.to_string());
                true
            }
        };
        self.write_json(keys::SAVED_JOBS, &saved).await?;
        Ok((saved, now_saved))
    }

    /// Removes every key of this session.
    pub async fn clear(&self) -> Result<(), AppError> {
        for name in [
            keys::UPLOADED_CV_PATH,
            keys::JOBS,
            keys::FILTER_STATE,
            keys::CV_PROFILE,
            keys::SAVED_JOBS,
        ] {
            self.store.delete(&self.key(name)).await?;
        }
        Ok(())
    }
}
