//! Result-set derivation: filter -> sort -> aggregate over the stored job list.
//!
//! Everything here is a pure function of the job list, the filter state and
//! the clock passed in. Handlers call `derive` on every results request; no
//! state is cached between calls.

pub mod aggregate;
pub mod filter;
pub mod sort;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::filters::FilterState;
use crate::models::job::JobRecord;

pub use aggregate::{DerivedAggregates, MatchTier};

/// Visible jobs in display order, plus the sidebar aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView<'a> {
    pub visible: Vec<&'a JobRecord>,
    pub aggregates: DerivedAggregates,
}

pub fn derive<'a>(jobs: &'a [JobRecord], filter: &FilterState, now: DateTime<Utc>) -> DerivedView<'a> {
    let mut visible = filter::filter_jobs(jobs, filter);
    sort::sort_jobs(&mut visible, filter.sort_option, now);
    let aggregates = aggregate::aggregate(jobs, &visible);

    DerivedView {
        visible,
        aggregates,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::filters::{ScoreRange, SortOption};

    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    pub(crate) fn make_job(url: &str, score: f64, salary: &str, posted: &str) -> JobRecord {
        JobRecord {
            id: None,
            job_url: url.to_string(),
            title: format!("Job {url}"),
            company: "Company".to_string(),
            location: "Anywhere".to_string(),
            is_remote: false,
            score,
            job_type: "Full-time".to_string(),
            job_level: "Mid".to_string(),
            description: String::new(),
            salary: salary.to_string(),
            posted_date: posted.to_string(),
            matched_skills: vec![],
            missing_skills: vec![],
            semantic_fit: None,
            confidence_level: None,
        }
    }

    fn range(min: f64, max: f64) -> FilterState {
        FilterState {
            match_score_filter: ScoreRange { min, max },
            ..FilterState::default()
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let jobs = vec![
            make_job("first", 0.95, "$150K+", ""),
            make_job("second", 0.60, "$80K", ""),
            make_job("third", 0.80, "$100K", ""),
        ];
        let view = derive(&jobs, &range(70.0, 100.0), now());

        let urls: Vec<&str> = view.visible.iter().map(|j| j.job_url.as_str()).collect();
        assert_eq!(urls, ["first", "third"]);
        assert_eq!(view.aggregates.average_score, 88);
        assert_eq!(view.aggregates.visible_count, 2);
        assert_eq!(view.aggregates.total_jobs, 3);
        assert_eq!(view.aggregates.salary_distribution.over_150k, 1);
        assert_eq!(view.aggregates.salary_distribution.from_90_to_120k, 1);
    }

    #[test]
    fn test_derive_is_idempotent_and_leaves_input_untouched() {
        let mut jobs = vec![
            make_job("a", 0.72, "$95K", "2 days ago"),
            make_job("b", 0.91, "$160K", "Just now"),
            make_job("c", 0.65, "", "not a date"),
        ];
        jobs[0].matched_skills = vec!["Rust".to_string()];
        let before = jobs.clone();

        let mut state = range(0.0, 100.0);
        state.sort_option = SortOption::Recent;
        state.search_query = "job".to_string();

        let first = derive(&jobs, &state, now());
        let second = derive(&jobs, &state, now());
        assert_eq!(first, second);
        assert_eq!(jobs, before);
    }

    #[test]
    fn test_visible_jobs_respect_filter() {
        let jobs: Vec<JobRecord> = (0..=20)
            .map(|i| make_job(&format!("job-{i}"), i as f64 / 20.0, "", ""))
            .collect();
        let state = range(35.0, 80.0);
        let view = derive(&jobs, &state, now());

        for job in &view.visible {
            assert!(state.match_score_filter.contains(job.score_percent()));
        }
        for job in jobs.iter().filter(|j| !view.visible.contains(j)) {
            assert!(!state.match_score_filter.contains(job.score_percent()));
        }
    }

    #[test]
    fn test_hidden_jobs_fail_range_or_query() {
        let mut jobs = vec![
            make_job("a", 0.9, "", ""),
            make_job("b", 0.9, "", ""),
            make_job("c", 0.2, "", ""),
        ];
        jobs[0].company = "Ferrous Systems".to_string();
        jobs[2].company = "Ferrous Systems".to_string();

        let mut state = range(50.0, 100.0);
        state.search_query = "FERROUS".to_string();
        let view = derive(&jobs, &state, now());

        assert_eq!(view.visible.len(), 1);
        for job in jobs.iter().filter(|j| !view.visible.contains(j)) {
            let in_range = state.match_score_filter.contains(job.score_percent());
            let matches = filter::matches_query(job, "ferrous");
            assert!(!in_range || !matches);
        }
    }

    #[test]
    fn test_sort_applies_after_filter() {
        let jobs = vec![
            make_job("cheap", 0.9, "$50K", ""),
            make_job("hidden", 0.1, "$500K", ""),
            make_job("rich", 0.9, "$140K", ""),
        ];
        let mut state = range(50.0, 100.0);
        state.sort_option = SortOption::SalaryHigh;
        let view = derive(&jobs, &state, now());
        let urls: Vec<&str> = view.visible.iter().map(|j| j.job_url.as_str()).collect();
        assert_eq!(urls, ["rich", "cheap"]);
    }
}
