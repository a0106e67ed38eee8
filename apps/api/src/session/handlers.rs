use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cv::CvProfile;
use crate::models::filters::FilterState;
use crate::state::AppState;

const ACCEPTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".doc"];
const UPLOAD_FIELD: &str = "file";

#[derive(Deserialize)]
pub struct SessionQuery {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub pdf_path: String,
}

#[derive(Serialize)]
pub struct CvResponse {
    pub uploaded_cv_path: Option<String>,
    pub profile: CvProfile,
    pub initials: String,
}

#[derive(Serialize)]
pub struct RunResponse {
    pub job_count: usize,
}

#[derive(Deserialize)]
pub struct SavedJobToggle {
    pub job_url: String,
}

#[derive(Serialize)]
pub struct SavedJobsResponse {
    pub saved_jobs: Vec<String>,
    pub saved: bool,
}

/// POST /api/v1/sessions
pub async fn handle_create_session() -> Json<SessionCreated> {
    let session_id = Uuid::new_v4();
    info!("Created session {session_id}");
    Json(SessionCreated { session_id })
}

/// DELETE /api/v1/sessions
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
) -> Result<StatusCode, AppError> {
    state.session(params.session_id).clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cv/upload
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| AppError::Validation("No file part".to_string()))?;
    validate_upload(&file_name, bytes.len(), state.config.max_upload_bytes)?;

    let _busy = state.in_flight.begin(params.session_id)?;
    let uploaded = state.matching.upload_cv(&file_name, bytes).await?;

    state
        .session(params.session_id)
        .set_uploaded_cv_path(&uploaded.pdf_path)
        .await?;
    info!(
        "Session {} uploaded CV stored at {}",
        params.session_id, uploaded.pdf_path
    );

    Ok(Json(UploadResponse {
        pdf_path: uploaded.pdf_path,
    }))
}

/// GET /api/v1/cv
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
) -> Result<Json<CvResponse>, AppError> {
    let session = state.session(params.session_id);
    let profile = session.cv_profile().await?;

    Ok(Json(CvResponse {
        uploaded_cv_path: session.uploaded_cv_path().await?,
        initials: profile.initials(),
        profile,
    }))
}

/// PUT /api/v1/cv/profile
pub async fn handle_put_cv_profile(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
    Json(profile): Json<CvProfile>,
) -> Result<StatusCode, AppError> {
    state
        .session(params.session_id)
        .set_cv_profile(&profile)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/preferences
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
) -> Result<Json<FilterState>, AppError> {
    Ok(Json(state.session(params.session_id).filter_state().await?))
}

/// POST /api/v1/preferences
///
/// Persists the submitted preferences, runs the matching model with them and
/// stores the returned jobs for the results view.
pub async fn handle_submit_preferences(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
    Json(filters): Json<FilterState>,
) -> Result<Json<RunResponse>, AppError> {
    filters.validate_submission()?;

    // A rejected submission must not touch stored state.
    let _busy = state.in_flight.begin(params.session_id)?;

    let session = state.session(params.session_id);
    if session.uploaded_cv_path().await?.is_none() {
        return Err(AppError::Validation(
            "Upload a CV before running the matching model".to_string(),
        ));
    }
    session.set_filter_state(&filters).await?;

    let jobs = state.matching.run_model(&filters).await?;
    session.set_jobs(&jobs).await?;

    info!(
        "Session {} stored {} matched jobs",
        params.session_id,
        jobs.len()
    );
    Ok(Json(RunResponse {
        job_count: jobs.len(),
    }))
}

/// POST /api/v1/saved-jobs/toggle
pub async fn handle_toggle_saved_job(
    State(state): State<AppState>,
    Query(params): Query<SessionQuery>,
    Json(req): Json<SavedJobToggle>,
) -> Result<Json<SavedJobsResponse>, AppError> {
    let job_url = req.job_url.trim();
    if job_url.is_empty() {
        return Err(AppError::Validation("job_url is required".to_string()));
    }

    let (saved_jobs, saved) = state
        .session(params.session_id)
        .toggle_saved_job(job_url)
        .await?;
    Ok(Json(SavedJobsResponse { saved_jobs, saved }))
}

fn validate_upload(file_name: &str, size: usize, max_bytes: usize) -> Result<(), AppError> {
    if file_name.trim().is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let lower = file_name.to_lowercase();
    if !ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(AppError::Validation(format!(
            "Unsupported file format: {file_name}. Upload a PDF or Word document"
        )));
    }
    if size == 0 {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "File is {size} bytes; the limit is {max_bytes} bytes"
        )));
    }
    Ok(())
}
