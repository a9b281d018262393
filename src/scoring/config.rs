use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust score configuration.
///
/// Every section is optional; an omitted section falls back to the built-in
/// defaults, so a config file only has to name what it changes.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   verified_points: 15
///   years_in_business:
///     - { range: ">=10", points: 25 }
///     - { range: ">=5", points: 15 }
///   bands:
///     - { min: 85, rating: Excellent }
///     - { min: 65, rating: Good }
///     - { min: 45, rating: Fair }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrustScoreConfig {
    /// BBB letter grade to points. Unknown grades score 0.
    #[serde(default)]
    pub bbb_grades: Option<Vec<GradePoints>>,

    /// Years-in-business tiers, first match wins.
    #[serde(default)]
    pub years_in_business: Option<Vec<TierBucket>>,

    /// Portfolio-size tiers (rentals managed), first match wins.
    #[serde(default)]
    pub rentals_managed: Option<Vec<TierBucket>>,

    /// Points awarded to verified managers.
    #[serde(default)]
    pub verified_points: Option<f64>,

    /// Rating bands, highest minimum first.
    #[serde(default)]
    pub bands: Option<Vec<RatingBand>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradePoints {
    pub grade: String,
    pub points: f64,
}

/// Maps a tier range (e.g. `">=10"`, `"5-9"`) to a sub-score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierBucket {
    pub range: String,
    pub points: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RatingBand {
    pub min: f64,
    pub rating: Rating,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
        };
        f.write_str(s)
    }
}

const DEFAULT_VERIFIED_POINTS: f64 = 10.0;

fn grade(grade: &str, points: f64) -> GradePoints {
    GradePoints {
        grade: grade.to_string(),
        points,
    }
}

fn tier(range: &str, points: f64) -> TierBucket {
    TierBucket {
        range: range.to_string(),
        points,
    }
}

pub fn default_grades() -> Vec<GradePoints> {
    vec![
        grade("A+", 40.0),
        grade("A", 37.0),
        grade("A-", 34.0),
        grade("B+", 30.0),
        grade("B", 26.0),
        grade("B-", 22.0),
        grade("C+", 18.0),
        grade("C", 14.0),
        grade("C-", 10.0),
        grade("D+", 6.0),
        grade("D", 4.0),
        grade("D-", 2.0),
        grade("F", 0.0),
    ]
}

pub fn default_years_tiers() -> Vec<TierBucket> {
    vec![
        tier(">=10", 25.0),
        tier(">=5", 18.0),
        tier(">=3", 12.0),
        tier(">=1", 6.0),
        tier("0", 0.0),
    ]
}

pub fn default_rentals_tiers() -> Vec<TierBucket> {
    vec![
        tier(">=500", 25.0),
        tier(">=200", 20.0),
        tier(">=100", 15.0),
        tier(">=50", 10.0),
        tier(">=11", 5.0),
        tier("<=10", 0.0),
    ]
}

pub fn default_bands() -> Vec<RatingBand> {
    vec![
        RatingBand {
            min: 80.0,
            rating: Rating::Excellent,
        },
        RatingBand {
            min: 60.0,
            rating: Rating::Good,
        },
        RatingBand {
            min: 40.0,
            rating: Rating::Fair,
        },
        RatingBand {
            min: 0.0,
            rating: Rating::Poor,
        },
    ]
}

impl TrustScoreConfig {
    /// Fully populated config with every default spelled out.
    pub fn with_defaults() -> Self {
        Self {
            bbb_grades: Some(default_grades()),
            years_in_business: Some(default_years_tiers()),
            rentals_managed: Some(default_rentals_tiers()),
            verified_points: Some(DEFAULT_VERIFIED_POINTS),
            bands: Some(default_bands()),
        }
    }

    pub fn grades(&self) -> Vec<GradePoints> {
        self.bbb_grades.clone().unwrap_or_else(default_grades)
    }

    pub fn years_tiers(&self) -> Vec<TierBucket> {
        self.years_in_business.clone().unwrap_or_else(default_years_tiers)
    }

    pub fn rentals_tiers(&self) -> Vec<TierBucket> {
        self.rentals_managed.clone().unwrap_or_else(default_rentals_tiers)
    }

    pub fn verified(&self) -> f64 {
        self.verified_points.unwrap_or(DEFAULT_VERIFIED_POINTS)
    }

    pub fn rating_bands(&self) -> Vec<RatingBand> {
        self.bands.clone().unwrap_or_else(default_bands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sections_sum_to_hundred() {
        let config = TrustScoreConfig::default();
        let best_grade = config
            .grades()
            .iter()
            .map(|g| g.points)
            .fold(0.0, f64::max);
        let best_years = config.years_tiers()[0].points;
        let best_rentals = config.rentals_tiers()[0].points;
        assert_eq!(best_grade + best_years + best_rentals + config.verified(), 100.0);
    }

    #[test]
    fn test_with_defaults_matches_accessors() {
        let explicit = TrustScoreConfig::with_defaults();
        let implicit = TrustScoreConfig::default();
        assert_eq!(explicit.grades(), implicit.grades());
        assert_eq!(explicit.rating_bands(), implicit.rating_bands());
        assert_eq!(explicit.verified(), implicit.verified());
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = TrustScoreConfig::with_defaults();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: TrustScoreConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_keeps_other_defaults() {
        let yaml = r#"
verified_points: 15
bands:
  - { min: 90, rating: Excellent }
  - { min: 50, rating: Good }
"#;
        let config: TrustScoreConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.verified(), 15.0);
        assert_eq!(config.rating_bands().len(), 2);
        assert_eq!(config.years_tiers(), default_years_tiers());
        assert_eq!(config.grades(), default_grades());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: TrustScoreConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, TrustScoreConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "base_score: 100\n";
        assert!(serde_saphyr::from_str::<TrustScoreConfig>(yaml).is_err());
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::Excellent.to_string(), "Excellent");
        assert_eq!(Rating::Poor.to_string(), "Poor");
    }
}
