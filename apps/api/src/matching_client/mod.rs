//! Matching Client: the single point of entry for calls to the external
//! matching service (CV upload and model runs).
//!
//! No other module may call the matching service directly.
//! Calls are never retried. A failed run is reported and the user resubmits.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::filters::FilterState;
use crate::models::job::{validate_jobs, JobRecord, RunModelResponse, UploadedCv};

const UPLOAD_ENDPOINT: &str = "/upload";
const RUN_MODEL_ENDPOINT: &str = "/run-model";
/// Multipart field name the service reads the CV from.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the raw body.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Serialize)]
struct RunModelRequest<'a> {
    filters: &'a FilterState,
}

#[derive(Clone)]
pub struct MatchingClient {
    client: Client,
    base_url: String,
}

impl MatchingClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, MatchingError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends the CV as a single-field multipart form.
    /// Returns the path the service stored it under.
    pub async fn upload_cv(&self, file_name: &str, content: Bytes) -> Result<UploadedCv, MatchingError> {
        let length = content.len() as u64;
        let part = Part::stream_with_length(content, length)
            .file_name(file_name.to_string())
            .mime_str(content_type(file_name))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = self.url(UPLOAD_ENDPOINT);
        info!("Uploading CV '{file_name}' to {url}");

        let response = self.client.post(&url).multipart(form).send().await?;
        let body = success_body(response).await?;
        let uploaded: UploadedCv = serde_json::from_str(&body)?;

        if uploaded.pdf_path.trim().is_empty() {
            return Err(MatchingError::InvalidPayload(
                "upload response has an empty pdf_path".to_string(),
            ));
        }

        debug!("CV stored by matching service at {}", uploaded.pdf_path);
        Ok(uploaded)
    }

    /// Runs the matching model with the given filters and returns the
    /// validated job list, in the service's ranking order.
    pub async fn run_model(&self, filters: &FilterState) -> Result<Vec<JobRecord>, MatchingError> {
        let url = self.url(RUN_MODEL_ENDPOINT);
        info!("Running matching model via {url}");

        let response = self
            .client
            .post(&url)
            .json(&RunModelRequest { filters })
            .send()
            .await?;
        let body = success_body(response).await?;

        let run: RunModelResponse = serde_json::from_str(&body)?;
        validate_jobs(&run.jobs).map_err(MatchingError::InvalidPayload)?;

        info!("Matching model returned {} jobs", run.jobs.len());
        Ok(run.jobs)
    }
}

/// Reads the body of a 2xx response; anything else becomes `Api` with the raw body.
async fn success_body(response: Response) -> Result<String, MatchingError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Matching service returned {status}: {body}");
        return Err(MatchingError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(body)
}

fn content_type(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn job_json(url: &str, score: f64) -> Value {
        json!({
            "title_en": "Engineer",
            "company": "Acme",
            "location": "Remote",
            "is_remote": 1,
            "weighted_score": score,
            "matchedSkills": ["Rust"],
            "missingSkills": null,
            "description_en": "",
            "postedDate": "2 days ago",
            "jobType": "Full-time",
            "jobLevel": "Senior",
            "salarySim": "$120K",
            "semanticFit": "",
            "confidenceLevel": "",
            "job_url": url
        })
    }

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type("cv.PDF"), "application/pdf");
        assert_eq!(content_type("cv.doc"), "application/msword");
        assert!(content_type("cv.docx").contains("wordprocessingml"));
    }

    #[tokio::test]
    async fn test_run_model_sends_filters_and_validates_jobs() {
        let router = Router::new().route(
            "/run-model",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["filters"]["jobType"], "all");
                Json(json!({ "jobs": [job_json("https://a", 0.9), job_json("https://b", 0.7)] }))
            }),
        );
        let client = MatchingClient::new(spawn_service(router).await, None).unwrap();

        let jobs = client.run_model(&FilterState::default()).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_url, "https://a");
        assert!(jobs[0].is_remote);
    }

    #[tokio::test]
    async fn test_run_model_surfaces_error_body_verbatim() {
        let router = Router::new().route(
            "/run-model",
            post(|| async { (StatusCode::BAD_REQUEST, r#"{"error": "No CV uploaded"}"#) }),
        );
        let client = MatchingClient::new(spawn_service(router).await, None).unwrap();

        match client.run_model(&FilterState::default()).await {
            Err(MatchingError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, r#"{"error": "No CV uploaded"}"#);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_model_rejects_invalid_jobs() {
        let router = Router::new().route(
            "/run-model",
            post(|| async { Json(json!({ "jobs": [job_json("https://a", 1.7)] })) }),
        );
        let client = MatchingClient::new(spawn_service(router).await, None).unwrap();

        let err = client.run_model(&FilterState::default()).await.unwrap_err();
        assert!(matches!(err, MatchingError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_upload_cv_returns_stored_path() {
        let router = Router::new().route(
            "/upload",
            post(|| async { Json(json!({ "pdf_path": "uploads/cv.pdf" })) }),
        );
        let client = MatchingClient::new(spawn_service(router).await, None).unwrap();

        let uploaded = client.upload_cv("cv.pdf", Bytes::from_static(b"%PDF-1.4")).await.unwrap();
        assert_eq!(uploaded.pdf_path, "uploads/cv.pdf");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let client = MatchingClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let err = client.run_model(&FilterState::default()).await.unwrap_err();
        assert!(matches!(err, MatchingError::Http(_)));
    }
}
