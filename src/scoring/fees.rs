//! Property-management fee estimates.
//!
//! Produces the common fee structures an owner will be quoted (percentage of
//! rent, flat per-unit, hybrid) for a given rent roll, sorted cheapest first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    SingleFamily,
    MultiFamily,
    Condo,
    Townhouse,
    Commercial,
    HoaCoa,
    Other,
}

impl PropertyType {
    /// Market-average management fee as a percentage of collected rent.
    pub fn market_average(self) -> f64 {
        match self {
            PropertyType::SingleFamily => 10.0,
            PropertyType::MultiFamily => 8.0,
            PropertyType::Condo => 9.0,
            PropertyType::Townhouse => 9.0,
            PropertyType::Commercial => 6.0,
            PropertyType::HoaCoa => 7.0,
            PropertyType::Other => 9.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "single-family" => Some(PropertyType::SingleFamily),
            "multi-family" => Some(PropertyType::MultiFamily),
            "condo" => Some(PropertyType::Condo),
            "townhouse" => Some(PropertyType::Townhouse),
            "commercial" => Some(PropertyType::Commercial),
            "hoa-coa" | "hoa" => Some(PropertyType::HoaCoa),
            "other" => Some(PropertyType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeInput {
    pub property_type: PropertyType,
    pub monthly_rent: f64,
    pub number_of_units: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeStructure {
    Percentage,
    Flat,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeEstimate {
    pub structure: FeeStructure,
    pub percentage_fee: Option<f64>,
    pub flat_fee: Option<f64>,
    pub monthly_fee: f64,
    pub annual_fee: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeReport {
    /// Cheapest monthly fee first.
    pub estimates: Vec<FeeEstimate>,
    pub market_average_percentage: f64,
    pub market_average_monthly: f64,
    pub total_monthly_income: f64,
    pub total_annual_income: f64,
    pub recommendations: Vec<String>,
}

const MIN_PERCENTAGE: f64 = 6.0;
const MAX_PERCENTAGE: f64 = 12.0;
const SMALL_PORTFOLIO_FLAT_FEE: f64 = 100.0;
const LARGE_PORTFOLIO_FLAT_FEE: f64 = 75.0;
const HYBRID_PERCENTAGE: f64 = 5.0;
const HYBRID_FLAT_FEE: f64 = 50.0;

fn percentage_estimate(income: f64, percentage: f64, label: &str) -> FeeEstimate {
    let monthly = income * percentage / 100.0;
    FeeEstimate {
        structure: FeeStructure::Percentage,
        percentage_fee: Some(percentage),
        flat_fee: None,
        monthly_fee: monthly,
        annual_fee: monthly * 12.0,
        description: format!("{}% of monthly rent - {}", percentage, label),
    }
}

pub fn estimate_fees(input: &FeeInput) -> FeeReport {
    let rent = if input.monthly_rent.is_finite() {
        input.monthly_rent.max(0.0)
    } else {
        0.0
    };
    let units = input.number_of_units.max(1);
    let total_monthly_income = rent * units as f64;
    let average = input.property_type.market_average();

    let mut estimates = vec![
        percentage_estimate(total_monthly_income, average, "most common structure"),
        percentage_estimate(
            total_monthly_income,
            (average - 2.0).max(MIN_PERCENTAGE),
            "competitive rate",
        ),
        percentage_estimate(
            total_monthly_income,
            (average + 2.0).min(MAX_PERCENTAGE),
            "premium service",
        ),
    ];

    if units > 1 {
        let per_unit = if units <= 4 {
            SMALL_PORTFOLIO_FLAT_FEE
        } else {
            LARGE_PORTFOLIO_FLAT_FEE
        };
        let total = per_unit * units as f64;
        estimates.push(FeeEstimate {
            structure: FeeStructure::Flat,
            percentage_fee: None,
            flat_fee: Some(total),
            monthly_fee: total,
            annual_fee: total * 12.0,
            description: format!("${}/unit fixed monthly fee", per_unit),
        });
    }

    let hybrid = total_monthly_income * HYBRID_PERCENTAGE / 100.0 + HYBRID_FLAT_FEE;
    estimates.push(FeeEstimate {
        structure: FeeStructure::Hybrid,
        percentage_fee: Some(HYBRID_PERCENTAGE),
        flat_fee: Some(HYBRID_FLAT_FEE),
        monthly_fee: hybrid,
        annual_fee: hybrid * 12.0,
        description: format!("{}% + ${} flat fee", HYBRID_PERCENTAGE, HYBRID_FLAT_FEE),
    });

    estimates.sort_by(|a, b| a.monthly_fee.total_cmp(&b.monthly_fee));

    let market_average_monthly = total_monthly_income * average / 100.0;

    FeeReport {
        recommendations: recommendations(input.property_type, units, average),
        estimates,
        market_average_percentage: average,
        market_average_monthly,
        total_monthly_income,
        total_annual_income: total_monthly_income * 12.0,
    }
}

fn recommendations(property_type: PropertyType, units: u32, average: f64) -> Vec<String> {
    let mut out = Vec::new();

    out.push(match units {
        1 => "For single-unit properties, percentage-based fees are most common and tie the manager's pay to your rent.",
        2..=4 => "For small multi-family properties, ask about a flat per-unit fee; it can undercut percentage pricing.",
        _ => "For larger portfolios you have negotiating power: request volume discounts and compare flat-fee quotes.",
    }
    .to_string());

    if average > MAX_PERCENTAGE {
        out.push("Fees above 12% are on the high end. Make sure the included services justify the cost.".to_string());
    } else if average < 8.0 {
        out.push("These fees are competitive. Check the manager's reviews and track record.".to_string());
    }

    out.push("Ask which services are included and which cost extra (tenant placement, maintenance markups).".to_string());
    out.push("Read the management contract closely, especially contract length and cancellation terms.".to_string());

    if matches!(property_type, PropertyType::Condo | PropertyType::Townhouse) {
        out.push("For condos and townhouses, confirm the manager has HOA coordination experience.".to_string());
    }

    out
}
