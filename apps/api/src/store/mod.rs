//! Session persistence: a string key-value store plus typed accessors.
//!
//! Each session stands in for one browser's local storage. Values are JSON
//! strings under fixed key names; there is no schema versioning.

pub mod memory;
pub mod redis_store;
pub mod session;

use async_trait::async_trait;

use crate::errors::AppError;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use session::SessionState;

/// Key names, shared with the web client's local-storage layout.
pub mod keys {
    pub const UPLOADED_CV_PATH: &str = "uploadedCVPath";
    pub const JOBS: &str = "smartmatch_jobs";
    pub const FILTER_STATE: &str = "careerAI_filterState";
    pub const CV_PROFILE: &str = "careerAI_cvData";
    pub const SAVED_JOBS: &str = "smartmatch_savedJobs";
}

/// String-valued key-value backend. Implement this to swap storage without
/// touching handlers; `AppState` carries it as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
