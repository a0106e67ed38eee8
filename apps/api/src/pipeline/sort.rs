use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::models::filters::SortOption;
use crate::models::job::JobRecord;
use crate::parsers::posted_date::posted_timestamp_millis;
use crate::parsers::salary::salary_sort_key;

/// Reorders jobs in place. All orderings are stable, and `Match` keeps the
/// incoming order since the matching service already ranks by score.
pub fn sort_jobs(jobs: &mut [&JobRecord], sort: SortOption, now: DateTime<Utc>) {
    match sort {
        SortOption::Match => {}
        SortOption::SalaryHigh => jobs.sort_by_cached_key(|job| Reverse(salary_sort_key(&job.salary))),
        SortOption::SalaryLow => jobs.sort_by_cached_key(|job| salary_sort_key(&job.salary)),
        SortOption::Recent => {
            jobs.sort_by_cached_key(|job| Reverse(posted_timestamp_millis(&job.posted_date, now)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{make_job, now};

    fn urls(jobs: &[&JobRecord]) -> Vec<String> {
        jobs.iter().map(|j| j.job_url.clone()).collect()
    }

    #[test]
    fn test_match_preserves_input_order() {
        let jobs = vec![make_job("a", 0.5, "$200K", ""), make_job("b", 0.9, "$10K", "")];
        let mut refs: Vec<&JobRecord> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::Match, now());
        assert_eq!(urls(&refs), ["a", "b"]);
    }

    #[test]
    fn test_salary_high_is_reverse_of_salary_low_without_ties() {
        let jobs = vec![
            make_job("mid", 0.8, "$90K - $110K", ""),
            make_job("top", 0.8, "$150K+", ""),
            make_job("low", 0.8, "$45,000", ""),
            make_job("high", 0.8, "$1.2M", ""),
        ];
        let mut high: Vec<&JobRecord> = jobs.iter().collect();
        let mut low: Vec<&JobRecord> = jobs.iter().collect();
        sort_jobs(&mut high, SortOption::SalaryHigh, now());
        sort_jobs(&mut low, SortOption::SalaryLow, now());

        assert_eq!(urls(&high), ["high", "top", "mid", "low"]);
        let mut reversed = urls(&low);
        reversed.reverse();
        assert_eq!(urls(&high), reversed);
    }

    #[test]
    fn test_salary_ties_and_unknowns_keep_input_order() {
        let jobs = vec![
            make_job("x", 0.8, "Competitive", ""),
            make_job("y", 0.8, "$100K", ""),
            make_job("z", 0.8, "", ""),
            make_job("w", 0.8, "$100,000", ""),
        ];
        let mut refs: Vec<&JobRecord> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::SalaryHigh, now());
        assert_eq!(urls(&refs), ["y", "w", "x", "z"]);
    }

    #[test]
    fn test_recent_sorts_newest_first() {
        let jobs = vec![
            make_job("old", 0.8, "", "2 months ago"),
            make_job("unknown", 0.8, "", "sometime"),
            make_job("new", 0.8, "", "Just now"),
            make_job("week", 0.8, "", "1 week ago"),
        ];
        let mut refs: Vec<&JobRecord> = jobs.iter().collect();
        sort_jobs(&mut refs, SortOption::Recent, now());
        assert_eq!(urls(&refs), ["new", "week", "old", "unknown"]);
    }
}
