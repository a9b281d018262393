pub mod config;
pub mod factors;
pub mod engine;
pub mod fees;
pub mod validation;

pub use config::*;
pub use factors::{parse_tier, RangeOp};
pub use engine::{calculate_trust_score, rate, FactorContribution, ScoreInput, ScoreOutput};
pub use fees::{estimate_fees, FeeEstimate, FeeInput, FeeReport, FeeStructure, PropertyType};
pub use validation::validate_scoring;
