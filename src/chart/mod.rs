//! Chart geometry for the analytics dashboards.
//!
//! Every function here is pure: data in, coordinates and SVG path strings
//! out. Empty input yields [`Chart::NoData`], which callers render as an
//! empty state instead of an error.

pub mod bar;
pub mod donut;
pub mod line;
pub mod svg;

use serde::{Deserialize, Serialize};

pub use bar::{bar_chart, Bar, BarGeometry};
pub use donut::{donut_chart, DonutGeometry, Segment};
pub use line::{line_chart, LineGeometry, LinePoint};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub color: Option<String>,
}

impl ChartDatum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart<T> {
    NoData,
    Ready(T),
}

impl<T> Chart<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Chart::NoData)
    }

    pub fn geometry(&self) -> Option<&T> {
        match self {
            Chart::NoData => None,
            Chart::Ready(g) => Some(g),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// A horizontal grid line with its axis label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub y: f64,
    pub label: f64,
}

/// Grid lines are drawn at these fractions of the value range.
pub const TICK_RATIOS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

const DEFAULT_PALETTE: [&str; 8] = [
    "#4F46E5", // indigo
    "#10B981", // green
    "#F59E0B", // amber
    "#8B5CF6", // purple
    "#EF4444", // red
    "#6B7280", // gray
    "#06B6D4", // cyan
    "#EC4899", // pink
];

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_BAR_WIDTH_RATIO: f64 = 0.7;
const DEFAULT_DONUT_MARGIN: f64 = 20.0;
const DEFAULT_DONUT_INNER_RATIO: f64 = 0.6;

const DEFAULT_BAR_PADDING: Padding = Padding {
    top: 20.0,
    right: 20.0,
    bottom: 60.0,
    left: 50.0,
};

const DEFAULT_LINE_PADDING: Padding = Padding {
    top: 20.0,
    right: 20.0,
    bottom: 40.0,
    left: 50.0,
};

/// Chart layout constants. Omitted fields use the dashboard defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    #[serde(default)]
    pub palette: Option<Vec<String>>,
    /// viewBox width of bar and line charts
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub bar_padding: Option<Padding>,
    #[serde(default)]
    pub line_padding: Option<Padding>,
    /// Fraction of each bar slot covered by the bar
    #[serde(default)]
    pub bar_width_ratio: Option<f64>,
    /// Gap between the donut's outer edge and the viewBox edge
    #[serde(default)]
    pub donut_margin: Option<f64>,
    /// Inner radius as a fraction of the outer radius
    #[serde(default)]
    pub donut_inner_ratio: Option<f64>,
}

impl ChartConfig {
    pub fn color_for(&self, index: usize, datum: &ChartDatum) -> String {
        if let Some(ref c) = datum.color {
            return c.clone();
        }
        match self.palette {
            Some(ref p) if !p.is_empty() => p[index % p.len()].clone(),
            _ => DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn bar_padding(&self) -> Padding {
        self.bar_padding.unwrap_or(DEFAULT_BAR_PADDING)
    }

    pub fn line_padding(&self) -> Padding {
        self.line_padding.unwrap_or(DEFAULT_LINE_PADDING)
    }

    pub fn bar_width_ratio(&self) -> f64 {
        self.bar_width_ratio.unwrap_or(DEFAULT_BAR_WIDTH_RATIO)
    }

    pub fn donut_margin(&self) -> f64 {
        self.donut_margin.unwrap_or(DEFAULT_DONUT_MARGIN)
    }

    pub fn donut_inner_ratio(&self) -> f64 {
        self.donut_inner_ratio.unwrap_or(DEFAULT_DONUT_INNER_RATIO)
    }
}

/// Validate chart configuration, collecting every problem.
pub fn validate_charts(config: &ChartConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref palette) = config.palette {
        if palette.is_empty() {
            errors.push("charts.palette: must contain at least one color".to_string());
        }
    }
    if let Some(width) = config.width {
        if !(width.is_finite() && width > 0.0) {
            errors.push("charts.width: must be a positive number".to_string());
        }
    }
    for (name, padding) in [
        ("charts.bar_padding", config.bar_padding),
        ("charts.line_padding", config.line_padding),
    ] {
        if let Some(p) = padding {
            if [p.top, p.right, p.bottom, p.left]
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0)
            {
                errors.push(format!("{}: values must be non-negative", name));
            }
            if p.left + p.right >= config.width() {
                errors.push(format!("{}: horizontal padding exceeds chart width", name));
            }
        }
    }
    if let Some(ratio) = config.bar_width_ratio {
        if !(ratio > 0.0 && ratio <= 1.0) {
            errors.push("charts.bar_width_ratio: must be in (0, 1]".to_string());
        }
    }
    if let Some(ratio) = config.donut_inner_ratio {
        if !(0.0..1.0).contains(&ratio) {
            errors.push("charts.donut_inner_ratio: must be in [0, 1)".to_string());
        }
    }
    if let Some(margin) = config.donut_margin {
        if !(margin.is_finite() && margin >= 0.0) {
            errors.push("charts.donut_margin: must be non-negative".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Negative and non-finite values are drawn as zero.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_color_wins() {
        let config = ChartConfig::default();
        let mut datum = ChartDatum::new("A", 1.0);
        datum.color = Some("#000000".to_string());
        assert_eq!(config.color_for(3, &datum), "#000000");
    }

    #[test]
    fn test_palette_wraps() {
        let config = ChartConfig {
            palette: Some(vec!["red".to_string(), "blue".to_string()]),
            ..Default::default()
        };
        let datum = ChartDatum::new("A", 1.0);
        assert_eq!(config.color_for(0, &datum), "red");
        assert_eq!(config.color_for(3, &datum), "blue");
    }

    #[test]
    fn test_default_palette() {
        let config = ChartConfig::default();
        assert_eq!(config.color_for(8, &ChartDatum::new("A", 1.0)), "#4F46E5");
    }

    #[test]
    fn test_validate_defaults() {
        assert!(validate_charts(&ChartConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = ChartConfig {
            palette: Some(vec![]),
            bar_width_ratio: Some(1.5),
            donut_inner_ratio: Some(1.0),
            ..Default::default()
        };
        assert_eq!(validate_charts(&config).unwrap_err().len(), 3);
    }

    #[test]
    fn test_parse_chart_config_yaml() {
        let yaml = r##"
palette: ["#111111", "#222222"]
donut_inner_ratio: 0.5
bar_padding: { top: 10, right: 10, bottom: 30, left: 40 }
"##;
        let config: ChartConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.donut_inner_ratio(), 0.5);
        assert_eq!(config.bar_padding().left, 40.0);
        assert_eq!(config.line_padding(), DEFAULT_LINE_PADDING);
        assert_eq!(config.color_for(1, &ChartDatum::new("B", 1.0)), "#222222");
    }
}
