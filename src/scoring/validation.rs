use super::config::{TierBucket, TrustScoreConfig};
use super::factors::RangeOp;

/// Validate trust score configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &TrustScoreConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref grades) = config.bbb_grades {
        for (i, g) in grades.iter().enumerate() {
            if g.grade.trim().is_empty() {
                errors.push(format!("scoring.bbb_grades[{}].grade: must not be empty", i));
            }
            check_points(&mut errors, &format!("scoring.bbb_grades[{}].points", i), g.points);
        }
    }

    if let Some(ref tiers) = config.years_in_business {
        check_tiers(&mut errors, "scoring.years_in_business", tiers);
    }

    if let Some(ref tiers) = config.rentals_managed {
        check_tiers(&mut errors, "scoring.rentals_managed", tiers);
    }

    if let Some(points) = config.verified_points {
        check_points(&mut errors, "scoring.verified_points", points);
    }

    if let Some(ref bands) = config.bands {
        if bands.is_empty() {
            errors.push("scoring.bands: at least one band is required".to_string());
        }
        for (i, band) in bands.iter().enumerate() {
            if !(0.0..=100.0).contains(&band.min) {
                errors.push(format!(
                    "scoring.bands[{}].min: {} is outside 0-100",
                    i, band.min
                ));
            }
            if i > 0 && band.min >= bands[i - 1].min {
                errors.push(format!(
                    "scoring.bands[{}].min: must be lower than the previous band ({})",
                    i,
                    bands[i - 1].min
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_points(errors: &mut Vec<String>, path: &str, points: f64) {
    if !points.is_finite() || points < 0.0 {
        errors.push(format!("{}: must be a non-negative number", path));
    }
}

fn check_tiers(errors: &mut Vec<String>, path: &str, tiers: &[TierBucket]) {
    for (i, bucket) in tiers.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&bucket.range) {
            errors.push(format!(
                "{}[{}].range: invalid '{}' - {}",
                path, i, bucket.range, e
            ));
        }
        check_points(errors, &format!("{}[{}].points", path, i), bucket.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::{GradePoints, Rating, RatingBand};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&TrustScoreConfig::default()).is_ok());
        assert!(validate_scoring(&TrustScoreConfig::with_defaults()).is_ok());
    }

    #[test]
    fn test_invalid_tier_range() {
        let config = TrustScoreConfig {
            rentals_managed: Some(vec![TierBucket {
                range: "plenty".to_string(),
                points: 5.0,
            }]),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.rentals_managed[0].range"));
    }

    #[test]
    fn test_negative_points() {
        let config = TrustScoreConfig {
            verified_points: Some(-1.0),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("verified_points"));
    }

    #[test]
    fn test_empty_grade() {
        let config = TrustScoreConfig {
            bbb_grades: Some(vec![GradePoints {
                grade: "  ".to_string(),
                points: 10.0,
            }]),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("bbb_grades[0].grade"));
    }

    #[test]
    fn test_bands_must_descend() {
        let config = TrustScoreConfig {
            bands: Some(vec![
                RatingBand {
                    min: 40.0,
                    rating: Rating::Fair,
                },
                RatingBand {
                    min: 80.0,
                    rating: Rating::Excellent,
                },
            ]),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.bands[1].min"));
    }

    #[test]
    fn test_band_out_of_range() {
        let config = TrustScoreConfig {
            bands: Some(vec![RatingBand {
                min: 120.0,
                rating: Rating::Excellent,
            }]),
            ..Default::default()
        };
        assert!(validate_scoring(&config).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = TrustScoreConfig {
            verified_points: Some(-1.0),
            years_in_business: Some(vec![TierBucket {
                range: "bad".to_string(),
                points: -2.0,
            }]),
            bands: Some(vec![]),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
