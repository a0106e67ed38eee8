//! Salary text parsing: turns strings like `"$90K - $120K"` into a
//! representative amount and a histogram bucket.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// A number with optional comma grouping, decimal part and k/m suffix.
    static ref SALARY_TOKEN_RE: Regex =
        Regex::new(r"(\d+(?:,\d+)*(?:\.\d+)?)([kKmM])?").unwrap();
}

/// Every numeric amount mentioned in the text, with suffix multipliers applied.
pub fn salary_amounts(text: &str) -> Vec<u64> {
    SALARY_TOKEN_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let digits = caps.get(1)?.as_str().replace(',', "");
            let value: f64 = digits.parse().ok()?;
            let multiplier = match caps.get(2).map(|m| m.as_str()) {
                Some("k") | Some("K") => 1_000.0,
                Some("m") | Some("M") => 1_000_000.0,
                _ => 1.0,
            };
            Some((value * multiplier).round() as u64)
        })
        .collect()
}

/// The representative salary: the largest amount in the text.
/// `None` when the text contains no number at all.
pub fn parse_salary_max(text: &str) -> Option<u64> {
    salary_amounts(text).into_iter().max()
}

/// Ordering key for salary sorts. Unparseable text sorts as zero.
pub fn salary_sort_key(text: &str) -> u64 {
    parse_salary_max(text).unwrap_or(0)
}

/// Salary histogram bucket, keyed by the representative salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SalaryBucket {
    #[serde(rename = "150k+")]
    Over150k,
    #[serde(rename = "120-150k")]
    From120To150k,
    #[serde(rename = "90-120k")]
    From90To120k,
    #[serde(rename = "below90k")]
    Below90k,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SalaryBucket {
    #[cfg(test)]
    pub const ALL: [SalaryBucket; 5] = [
        SalaryBucket::Over150k,
        SalaryBucket::From120To150k,
        SalaryBucket::From90To120k,
        SalaryBucket::Below90k,
        SalaryBucket::Unknown,
    ];

    /// Only the top bucket is inclusive at its lower edge: 150000 is `150k+`,
    /// but 120000 is `90-120k` and 90000 is `below90k`.
    pub fn from_amount(amount: Option<u64>) -> Self {
        match amount {
            Some(v) if v >= 150_000 => SalaryBucket::Over150k,
            Some(v) if v > 120_000 => SalaryBucket::From120To150k,
            Some(v) if v > 90_000 => SalaryBucket::From90To120k,
            Some(v) if v > 0 => SalaryBucket::Below90k,
            _ => SalaryBucket::Unknown,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_amount(parse_salary_max(text))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryBucket::Over150k => "150k+",
            SalaryBucket::From120To150k => "120-150k",
            SalaryBucket::From90To120k => "90-120k",
            SalaryBucket::Below90k => "below90k",
            SalaryBucket::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_digits_is_unparsed() {
        for text in ["", "Competitive", "DOE", "$K"] {
            assert_eq!(parse_salary_max(text), None, "{text}");
            assert_eq!(salary_sort_key(text), 0);
            assert_eq!(SalaryBucket::from_text(text), SalaryBucket::Unknown);
        }
    }

    #[test]
    fn test_range_takes_upper_bound() {
        assert_eq!(parse_salary_max("$90K - $120K"), Some(120_000));
        assert_eq!(parse_salary_max("$50k-$70k"), Some(70_000));
    }

    #[test]
    fn test_comma_grouping_and_suffixes() {
        assert_eq!(parse_salary_max("$120,000"), Some(120_000));
        assert_eq!(parse_salary_max("$1,250,000 per year"), Some(1_250_000));
        assert_eq!(parse_salary_max("$1M"), Some(1_000_000));
        assert_eq!(parse_salary_max("1.5m"), Some(1_500_000));
        assert_eq!(parse_salary_max("$120.5K"), Some(120_500));
        assert_eq!(salary_amounts("€40k to €55K"), vec![40_000, 55_000]);
    }

    #[test]
    fn test_bucket_thresholds() {
        assert_eq!(SalaryBucket::from_text("$150K+"), SalaryBucket::Over150k);
        assert_eq!(SalaryBucket::from_text("$130K"), SalaryBucket::From120To150k);
        assert_eq!(SalaryBucket::from_text("$100K"), SalaryBucket::From90To120k);
        assert_eq!(SalaryBucket::from_text("$80K"), SalaryBucket::Below90k);
        assert_eq!(SalaryBucket::from_text("$0"), SalaryBucket::Unknown);
    }

    // The lower two edges are exclusive while the top edge is inclusive.
    // This asymmetry is kept as observed behaviour, not corrected.
    #[test]
    fn test_bucket_boundaries_are_asymmetric() {
        assert_eq!(SalaryBucket::from_amount(Some(150_000)), SalaryBucket::Over150k);
        assert_eq!(SalaryBucket::from_amount(Some(149_999)), SalaryBucket::From120To150k);
        assert_eq!(SalaryBucket::from_amount(Some(120_001)), SalaryBucket::From120To150k);
        assert_eq!(SalaryBucket::from_amount(Some(120_000)), SalaryBucket::From90To120k);
        assert_eq!(SalaryBucket::from_amount(Some(90_001)), SalaryBucket::From90To120k);
        assert_eq!(SalaryBucket::from_amount(Some(90_000)), SalaryBucket::Below90k);
        assert_eq!(SalaryBucket::from_amount(Some(1)), SalaryBucket::Below90k);
        assert_eq!(SalaryBucket::from_text("$90K - $120K"), SalaryBucket::From90To120k);
    }

    #[test]
    fn test_bucket_labels() {
        let labels: Vec<&str> = SalaryBucket::ALL.iter().map(|b| b.as_str()).collect();
        assert_eq!(labels, ["150k+", "120-150k", "90-120k", "below90k", "unknown"]);
        assert_eq!(
            serde_json::to_string(&SalaryBucket::Over150k).unwrap(),
            r#""150k+""#
        );
    }
}
