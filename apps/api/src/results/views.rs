use serde::Serialize;

use crate::models::filters::FilterState;
use crate::models::job::JobRecord;
use crate::parsers::salary::SalaryBucket;
use crate::parsers::semantic_fit::{parse_semantic_fit, FitSection};
use crate::pipeline::{DerivedAggregates, DerivedView, MatchTier};

/// A visible job plus the display fields derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobRecord,
    pub match_percent: u32,
    pub tier: MatchTier,
    pub salary_bucket: SalaryBucket,
    pub semantic_fit_sections: Vec<FitSection>,
    pub saved: bool,
}

impl JobView {
    pub fn new(job: &JobRecord, saved_jobs: &[String]) -> Self {
        Self {
            match_percent: job.match_percent(),
            tier: MatchTier::from_percent(job.score_percent()),
            salary_bucket: SalaryBucket::from_text(&job.salary),
            semantic_fit_sections: job
                .semantic_fit
                .as_deref()
                .map(parse_semantic_fit)
                .unwrap_or_default(),
            saved: saved_jobs.iter().any(|url| url == &job.job_url),
            job: job.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    /// The filter the view was derived with, after request overrides.
    pub filters: FilterState,
    pub jobs: Vec<JobView>,
    pub aggregates: DerivedAggregates,
    pub saved_jobs: Vec<String>,
}

impl ResultsResponse {
    pub fn new(filters: FilterState, view: DerivedView<'_>, saved_jobs: Vec<String>) -> Self {
        let jobs = view
            .visible
            .iter()
            .map(|job| JobView::new(job, &saved_jobs))
            .collect();

        Self {
            filters,
            jobs,
            aggregates: view.aggregates,
            saved_jobs,
        }
    }
}
