use anyhow::{bail, Result};

/// A numeric range expression used by tier buckets.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() != 2 {
                bail!("Invalid range format: {}", s)
            }
            let low: u64 = parts[0].trim().parse()?;
            let high: u64 = parts[1].trim().parse()?;
            if low > high {
                bail!("Range lower bound exceeds upper bound: {}", s)
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// Extract the ordinal tier from a free-text bucket such as `"5-10 years"`,
/// `"500+"` or `"1,000+"`.
///
/// The first run of digits wins; commas sandwiched between digits are
/// treated as thousands separators. Returns `None` when the text holds no
/// digits at all.
pub fn parse_tier(text: &str) -> Option<u64> {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut digits = String::new();
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c == ','
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
            && !digits.is_empty()
        {
            // thousands separator
        } else {
            break;
        }
        i += 1;
    }

    // Saturate absurdly long numbers instead of failing
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Normalize a BBB letter grade for lookup: trimmed, upper-cased, with
/// placeholder values collapsed to `None`.
pub fn normalize_grade(grade: &str) -> Option<String> {
    let grade = grade.trim().to_ascii_uppercase();
    match grade.as_str() {
        "" | "N/A" | "NA" | "NR" | "NONE" | "NULL" => None,
        _ => Some(grade),
    }
}
