use crate::models::filters::FilterState;
use crate::models::job::JobRecord;

/// Case-insensitive substring match over the searchable fields.
/// `query_lower` must already be lowercased.
pub fn matches_query(job: &JobRecord, query_lower: &str) -> bool {
    let hit = |field: &str| field.to_lowercase().contains(query_lower);

    hit(&job.title)
        || hit(&job.company)
        || hit(&job.description)
        || hit(&job.location)
        || job.matched_skills.iter().any(|skill| hit(skill))
}

/// Keeps jobs whose percent score lies in the filter's range and that match
/// the search query, if one is set. Input order is preserved.
pub fn filter_jobs<'a>(jobs: &'a [JobRecord], filter: &FilterState) -> Vec<&'a JobRecord> {
    let query = filter.query().map(str::to_lowercase);

    jobs.iter()
        .filter(|job| filter.match_score_filter.contains(job.score_percent()))
        .filter(|job| query.as_deref().map_or(true, |q| matches_query(job, q)))
        .collect()
}
