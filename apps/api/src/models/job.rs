use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// One job listing returned by the matching service.
///
/// Field names follow the service's JSON. The service fills missing cells with
/// `""` and encodes booleans as `0`/`1`, so the optional fields tolerate both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub job_url: String,
    #[serde(rename = "title_en")]
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_remote: bool,
    /// Match score as a fraction in `[0, 1]`.
    #[serde(rename = "weighted_score")]
    pub score: f64,
    #[serde(rename = "jobType", default)]
    pub job_type: String,
    #[serde(rename = "jobLevel", default)]
    pub job_level: String,
    #[serde(rename = "description_en", default)]
    pub description: String,
    #[serde(rename = "salarySim", default)]
    pub salary: String,
    #[serde(rename = "postedDate", default)]
    pub posted_date: String,
    #[serde(rename = "matchedSkills", default, deserialize_with = "flexible_list")]
    pub matched_skills: Vec<String>,
    #[serde(rename = "missingSkills", default, deserialize_with = "flexible_list")]
    pub missing_skills: Vec<String>,
    #[serde(rename = "semanticFit", default, deserialize_with = "non_blank")]
    pub semantic_fit: Option<String>,
    #[serde(rename = "confidenceLevel", default, deserialize_with = "non_blank")]
    pub confidence_level: Option<String>,
}

impl JobRecord {
    /// Score as a percentage, unrounded. Filtering and tiers compare against this.
    pub fn score_percent(&self) -> f64 {
        self.score * 100.0
    }

    /// Score as displayed: `round(score * 100)`.
    pub fn match_percent(&self) -> u32 {
        self.score_percent().round().clamp(0.0, 100.0) as u32
    }
}

/// Body of a successful `/run-model` call.
#[derive(Debug, Clone, Deserialize)]
pub struct RunModelResponse {
    pub jobs: Vec<JobRecord>,
}

/// Body of a successful `/upload` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedCv {
    pub pdf_path: String,
}

/// Checks a freshly deserialized job list before it enters the pipeline.
///
/// Rejects the whole list if any record has an empty or duplicate `job_url`,
/// or a score outside `[0, 1]`.
pub fn validate_jobs(jobs: &[JobRecord]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(jobs.len());

    for (index, job) in jobs.iter().enumerate() {
        let url = job.job_url.trim();
        if url.is_empty() {
            return Err(format!("job {index} has an empty job_url"));
        }
        if !seen.insert(url) {
            return Err(format!("job {index} repeats job_url {url}"));
        }
        if !job.score.is_finite() || !(0.0..=1.0).contains(&job.score) {
            return Err(format!(
                "job {index} ({url}) has weighted_score {} outside [0, 1]",
                job.score
            ));
        }
    }

    Ok(())
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        Some(Flag::Float(n)) => n != 0.0,
        Some(Flag::Text(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        None => false,
    })
}

fn flexible_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Items(Vec<String>),
        Text(String),
    }

    Ok(match Option::<List>::deserialize(deserializer)? {
        Some(List::Items(items)) => items,
        // a blank cell means no skills
        Some(List::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    })
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
