use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Result ordering selected in the results view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Keep the matching service's order, which is already by score.
    #[default]
    Match,
    Recent,
    SalaryHigh,
    SalaryLow,
}

impl std::str::FromStr for SortOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "match" => Ok(SortOption::Match),
            "recent" => Ok(SortOption::Recent),
            "salary-high" => Ok(SortOption::SalaryHigh),
            "salary-low" => Ok(SortOption::SalaryLow),
            other => Err(AppError::Validation(format!("Unknown sort option '{other}'"))),
        }
    }
}

/// Inclusive match-score window in percent. Serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl From<[f64; 2]> for ScoreRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<ScoreRange> for [f64; 2] {
    fn from(range: ScoreRange) -> Self {
        [range.min, range.max]
    }
}

impl ScoreRange {
    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.min && percent <= self.max
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(AppError::Validation(
                "Match score range must be numeric".to_string(),
            ));
        }
        if self.min < 0.0 || self.max > 100.0 || self.min > self.max {
            return Err(AppError::Validation(format!(
                "Match score range [{}, {}] must satisfy 0 <= min <= max <= 100",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// The user's filter selection plus the preferences sent to `/run-model`.
///
/// Persisted as one snapshot and forwarded verbatim as `{ "filters": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub match_score_filter: ScoreRange,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub sort_option: SortOption,
    #[serde(default = "all")]
    pub job_type: String,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default = "all")]
    pub experience_level: String,
    #[serde(default = "default_salary")]
    pub salary: [u64; 2],
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default = "all")]
    pub company_size: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            match_score_filter: ScoreRange::default(),
            search_query: String::new(),
            sort_option: SortOption::default(),
            job_type: all(),
            remote_only: false,
            experience_level: all(),
            salary: default_salary(),
            locations: Vec::new(),
            industries: Vec::new(),
            company_size: all(),
        }
    }
}

impl FilterState {
    /// The search query as typed, or `None` when blank.
    pub fn query(&self) -> Option<&str> {
        let q = self.search_query.as_str();
        (!q.trim().is_empty()).then_some(q)
    }

    /// Checks a preferences submission before the model run.
    pub fn validate_submission(&self) -> Result<(), AppError> {
        self.match_score_filter.validate()?;

        if self.locations.iter().all(|l| l.trim().is_empty()) {
            return Err(AppError::Validation(
                "Please select at least one country.".to_string(),
            ));
        }
        if self.industries.iter().all(|i| i.trim().is_empty()) {
            return Err(AppError::Validation(
                "Please select at least one industry.".to_string(),
            ));
        }
        if self.salary[0] > self.salary[1] {
            return Err(AppError::Validation(format!(
                "Salary range [{}, {}] is inverted",
                self.salary[0], self.salary[1]
            )));
        }
        Ok(())
    }
}

fn all() -> String {
    "all".to_string()
}

fn default_salary() -> [u64; 2] {
    [0, 300_000]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> FilterState {
        FilterState {
            locations: vec!["Germany".to_string()],
            industries: vec!["Technology".to_string()],
            ..FilterState::default()
        }
    }

    #[test]
    fn test_defaults_from_empty_object() {
        let state: FilterState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, FilterState::default());
        assert_eq!(state.sort_option, SortOption::Match);
        assert_eq!(state.match_score_filter, ScoreRange::default());
        assert_eq!(state.job_type, "all");
    }

    #[test]
    fn test_serializes_with_form_field_names() {
        let value = serde_json::to_value(submission()).unwrap();
        assert_eq!(value["matchScoreFilter"], serde_json::json!([0.0, 100.0]));
        assert_eq!(value["sortOption"], "match");
        assert_eq!(value["remoteOnly"], false);
        assert_eq!(value["companySize"], "all");
        assert_eq!(value["locations"], serde_json::json!(["Germany"]));
    }

    #[test]
    fn test_sort_option_parses_kebab_case() {
        assert_eq!("salary-high".parse::<SortOption>().unwrap(), SortOption::SalaryHigh);
        assert_eq!("Recent".parse::<SortOption>().unwrap(), SortOption::Recent);
        assert!("newest".parse::<SortOption>().is_err());
        let sort: SortOption = serde_json::from_str(r#""salary-low""#).unwrap();
        assert_eq!(sort, SortOption::SalaryLow);
    }

    #[test]
    fn test_blank_query_is_absent() {
        let mut state = FilterState::default();
        assert_eq!(state.query(), None);
        state.search_query = " \t ".to_string();
        assert_eq!(state.query(), None);
        state.search_query = "rust ".to_string();
        assert_eq!(state.query(), Some("rust "));
    }

    #[test]
    fn test_score_range_is_inclusive() {
        let range = ScoreRange { min: 70.0, max: 90.0 };
        assert!(range.contains(70.0));
        assert!(range.contains(90.0));
        assert!(!range.contains(69.9));
        assert!(!range.contains(90.1));
    }

    #[test]
    fn test_submission_requires_location_and_industry() {
        assert!(submission().validate_submission().is_ok());

        let mut state = submission();
        state.locations.clear();
        assert!(matches!(state.validate_submission(), Err(AppError::Validation(m)) if m.contains("country")));

        let mut state = submission();
        state.industries = vec![" ".to_string()];
        assert!(matches!(state.validate_submission(), Err(AppError::Validation(m)) if m.contains("industry")));
    }

    #[test]
    fn test_submission_rejects_bad_score_range() {
        let mut state = submission();
        state.match_score_filter = ScoreRange { min: 80.0, max: 60.0 };
        assert!(state.validate_submission().is_err());
        state.match_score_filter = ScoreRange { min: 0.0, max: 120.0 };
        assert!(state.validate_submission().is_err());
    }
}
