use super::config::{Rating, RatingBand, TierBucket, TrustScoreConfig};
use super::factors::{normalize_grade, parse_tier, RangeOp};

/// The record a trust score is computed from. Built fresh from each API
/// record; the tenure and portfolio fields are the free-text buckets the
/// backend stores (e.g. `"5-10 years"`, `"500+"`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreInput {
    pub bbb_rating: Option<String>,
    pub years_in_business: String,
    pub rentals_managed: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "BBB", "Experience"
    pub description: String, // e.g. "grade 'A+'", "'10+' -> tier 10, matched '>=10'"
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutput {
    /// Always within [0, 100].
    pub score: f64,
    pub rating: Rating,
    pub breakdown: Vec<FactorContribution>,
}

const MAX_SCORE: f64 = 100.0;

pub fn calculate_trust_score(input: &ScoreInput, config: &TrustScoreConfig) -> ScoreOutput {
    let mut breakdown = Vec::with_capacity(4);

    // BBB grade
    let grades = config.grades();
    let grade = input.bbb_rating.as_deref().and_then(normalize_grade);
    let (grade_points, grade_desc) = match grade {
        Some(ref g) => match grades.iter().find(|gp| gp.grade.eq_ignore_ascii_case(g)) {
            Some(gp) => (gp.points, format!("grade '{}'", g)),
            None => (0.0, format!("unrecognized grade '{}'", g)),
        },
        None => (0.0, "no rating".to_string()),
    };
    breakdown.push(FactorContribution {
        label: "BBB".to_string(),
        description: grade_desc,
        points: grade_points,
    });

    breakdown.push(tier_contribution(
        "Experience",
        &input.years_in_business,
        &config.years_tiers(),
    ));
    breakdown.push(tier_contribution(
        "Portfolio",
        &input.rentals_managed,
        &config.rentals_tiers(),
    ));

    let verified_points = if input.is_verified { config.verified() } else { 0.0 };
    breakdown.push(FactorContribution {
        label: "Verified".to_string(),
        description: if input.is_verified {
            "verified profile".to_string()
        } else {
            "not verified".to_string()
        },
        points: verified_points,
    });

    let raw: f64 = breakdown.iter().map(|f| f.points).sum();
    let score = clamp_score(raw);

    ScoreOutput {
        score,
        rating: rate(score, &config.rating_bands()),
        breakdown,
    }
}

/// Clamp a raw sum to [0, 100]; non-finite sums collapse to 0.
fn clamp_score(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

/// Bucket a score into a rating. Bands are checked in order, so the
/// highest minimum must come first; a score below every band is `Poor`.
pub fn rate(score: f64, bands: &[RatingBand]) -> Rating {
    bands
        .iter()
        .find(|band| score >= band.min)
        .map(|band| band.rating)
        .unwrap_or(Rating::Poor)
}

fn tier_contribution(label: &str, text: &str, buckets: &[TierBucket]) -> FactorContribution {
    let Some(tier) = parse_tier(text) else {
        return FactorContribution {
            label: label.to_string(),
            description: format!("unparseable '{}'", text),
            points: 0.0,
        };
    };

    for bucket in buckets {
        // Invalid ranges are reported by validate_scoring; skip them here
        let Ok(range) = RangeOp::parse(&bucket.range) else {
            continue;
        };
        if range.matches(tier) {
            return FactorContribution {
                label: label.to_string(),
                description: format!("'{}' -> tier {}, matched '{}'", text, tier, bucket.range),
                points: bucket.points,
            };
        }
    }

    FactorContribution {
        label: label.to_string(),
        description: format!("'{}' -> tier {}, no bucket matched", text, tier),
        points: 0.0,
    }
}
