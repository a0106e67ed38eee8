use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::filters::{FilterState, SortOption};
use crate::pipeline::derive;
use crate::results::views::ResultsResponse;
use crate::state::AppState;

/// Query string of the results view. Anything set here overrides the stored
/// filter state for this request only.
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    pub session_id: Uuid,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl ResultsQuery {
    /// Applies the overrides onto `filters`.
    pub fn apply(&self, mut filters: FilterState) -> Result<FilterState, AppError> {
        if let Some(min) = self.min {
            filters.match_score_filter.min = min;
        }
        if let Some(max) = self.max {
            filters.match_score_filter.max = max;
        }
        if self.min.is_some() || self.max.is_some() {
            filters.match_score_filter.validate()?;
        }
        if let Some(q) = &self.q {
            filters.search_query = q.clone();
        }
        if let Some(sort) = &self.sort {
            filters.sort_option = sort.parse::<SortOption>()?;
        }
        Ok(filters)
    }
}

/// GET /api/v1/results
pub async fn handle_get_results(
    State(state): State<AppState>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let session = state.session(params.session_id);
    let jobs = session.jobs().await?;
    let filters = params.apply(session.filter_state().await?)?;
    let saved_jobs = session.saved_jobs().await?;

    let view = derive(&jobs, &filters, Utc::now());
    debug!(
        "Session {}: {} of {} jobs visible",
        params.session_id,
        view.aggregates.visible_count,
        view.aggregates.total_jobs
    );

    Ok(Json(ResultsResponse::new(filters, view, saved_jobs)))
}
