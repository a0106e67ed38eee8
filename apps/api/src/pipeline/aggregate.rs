use std::collections::HashMap;

use serde::Serialize;

use crate::models::job::JobRecord;
use crate::parsers::salary::SalaryBucket;

const TOP_SKILLS: usize = 5;

/// Score band a job falls into, from its unrounded percent score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// 90-100
    Excellent,
    /// 75-90
    Strong,
    /// 60-75
    Fair,
    /// below 60
    Low,
}

impl MatchTier {
    pub const ALL: [MatchTier; 4] = [
        MatchTier::Excellent,
        MatchTier::Strong,
        MatchTier::Fair,
        MatchTier::Low,
    ];

    pub fn from_percent(percent: f64) -> Self {
        if percent >= 90.0 {
            MatchTier::Excellent
        } else if percent >= 75.0 {
            MatchTier::Strong
        } else if percent >= 60.0 {
            MatchTier::Fair
        } else {
            MatchTier::Low
        }
    }

    pub fn range_label(&self) -> &'static str {
        match self {
            MatchTier::Excellent => "90-100",
            MatchTier::Strong => "75-90",
            MatchTier::Fair => "60-75",
            MatchTier::Low => "0-60",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub tier: MatchTier,
    pub range: &'static str,
    pub count: usize,
    /// Share of the visible set, in percent.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTypeCount {
    pub job_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalaryDistribution {
    #[serde(rename = "150k+")]
    pub over_150k: usize,
    #[serde(rename = "120-150k")]
    pub from_120_to_150k: usize,
    #[serde(rename = "90-120k")]
    pub from_90_to_120k: usize,
    #[serde(rename = "below90k")]
    pub below_90k: usize,
    pub unknown: usize,
}

impl SalaryDistribution {
    fn record(&mut self, bucket: SalaryBucket) {
        let slot = match bucket {
            SalaryBucket::Over150k => &mut self.over_150k,
            SalaryBucket::From120To150k => &mut self.from_120_to_150k,
            SalaryBucket::From90To120k => &mut self.from_90_to_120k,
            SalaryBucket::Below90k => &mut self.below_90k,
            SalaryBucket::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }

    #[cfg(test)]
    pub fn get(&self, bucket: SalaryBucket) -> usize {
        match bucket {
            SalaryBucket::Over150k => self.over_150k,
            SalaryBucket::From120To150k => self.from_120_to_150k,
            SalaryBucket::From90To120k => self.from_90_to_120k,
            SalaryBucket::Below90k => self.below_90k,
            SalaryBucket::Unknown => self.unknown,
        }
    }
}

/// Summary figures for the results sidebar. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedAggregates {
    pub total_jobs: usize,
    pub visible_count: usize,
    /// Mean visible score, as a rounded percentage. Zero when nothing is visible.
    pub average_score: u32,
    pub score_distribution: Vec<TierCount>,
    pub job_types: Vec<JobTypeCount>,
    pub remote_count: usize,
    pub salary_distribution: SalaryDistribution,
    /// Most frequent matched skills across all jobs, ignoring the filter.
    pub top_skills: Vec<SkillCount>,
}

/// Builds aggregates over the visible set. Top skills use `all_jobs`.
pub fn aggregate(all_jobs: &[JobRecord], visible: &[&JobRecord]) -> DerivedAggregates {
    let divisor = visible.len().max(1) as f64;

    let score_sum: f64 = visible.iter().map(|job| job.score_percent()).sum();
    let average_score = (score_sum / divisor).round().clamp(0.0, 100.0) as u32;

    let mut salary_distribution = SalaryDistribution::default();
    for job in visible {
        salary_distribution.record(SalaryBucket::from_text(&job.salary));
    }

    DerivedAggregates {
        total_jobs: all_jobs.len(),
        visible_count: visible.len(),
        average_score,
        score_distribution: score_distribution(visible, divisor),
        job_types: count_in_order(visible.iter().map(|job| job.job_type.as_str()))
            .into_iter()
            .map(|(job_type, count)| JobTypeCount { job_type, count })
            .collect(),
        remote_count: visible.iter().filter(|job| job.is_remote).count(),
        salary_distribution,
        top_skills: top_skills(all_jobs, TOP_SKILLS),
    }
}

fn score_distribution(visible: &[&JobRecord], divisor: f64) -> Vec<TierCount> {
    let mut counts: HashMap<MatchTier, usize> = HashMap::new();
    for job in visible {
        *counts.entry(MatchTier::from_percent(job.score_percent())).or_default() += 1;
    }

    MatchTier::ALL
        .iter()
        .map(|&tier| {
            let count = counts.get(&tier).copied().unwrap_or(0);
            TierCount {
                tier,
                range: tier.range_label(),
                count,
                share: count as f64 / divisor * 100.0,
            }
        })
        .collect()
}

/// Matched-skill frequencies, highest first, ties in first-seen order.
pub fn top_skills(jobs: &[JobRecord], limit: usize) -> Vec<SkillCount> {
    let mut counts = count_in_order(
        jobs.iter()
            .flat_map(|job| job.matched_skills.iter().map(String::as_str)),
    );
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);

    counts
        .into_iter()
        .map(|(skill, count)| SkillCount { skill, count })
        .collect()
}

/// Frequency table keyed by first occurrence.
fn count_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item.to_string(), 1));
            }
        }
    }

    counts
}
