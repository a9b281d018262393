use super::{Chart, ChartConfig, ChartDatum, Padding, Tick, TICK_RATIOS};

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    pub points: Vec<LinePoint>,
    /// `M x y L x y ...` through every point
    pub path: String,
    /// The line path closed down to the baseline, for the area fill
    pub area_path: String,
    pub min_value: f64,
    pub max_value: f64,
    pub padding: Padding,
    pub width: f64,
    pub height: f64,
    pub chart_height: f64,
    pub ticks: Vec<Tick>,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Lay out a line chart. Points are evenly spaced across the inner width
/// and scaled between the smallest and largest value.
pub fn line_chart(data: &[ChartDatum], height: f64, config: &ChartConfig) -> Chart<LineGeometry> {
    if data.is_empty() {
        return Chart::NoData;
    }

    let padding = config.line_padding();
    let width = config.width();
    let chart_height = (height - padding.top - padding.bottom).max(0.0);
    let inner_width = (width - padding.left - padding.right).max(0.0);

    let values: Vec<f64> = data.iter().map(|d| finite_or_zero(d.value)).collect();
    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);

    let range = match max_value - min_value {
        r if r > 0.0 => r,
        _ => 1.0,
    };
    let steps = match data.len() - 1 {
        0 => 1.0,
        n => n as f64,
    };

    let points: Vec<LinePoint> = data
        .iter()
        .zip(&values)
        .enumerate()
        .map(|(i, (d, &v))| LinePoint {
            label: d.label.clone(),
            value: v,
            x: padding.left + (i as f64 / steps) * inner_width,
            y: padding.top + chart_height - ((v - min_value) / range) * chart_height,
        })
        .collect();

    let path = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {} {}", if i == 0 { "M" } else { "L" }, p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");

    let baseline = padding.top + chart_height;
    // points is non-empty here
    let last_x = points[points.len() - 1].x;
    let area_path = format!(
        "{} L {} {} L {} {} Z",
        path, last_x, baseline, padding.left, baseline
    );

    let ticks = TICK_RATIOS
        .iter()
        .map(|ratio| Tick {
            y: padding.top + chart_height * (1.0 - ratio),
            label: (min_value + (max_value - min_value) * ratio).round(),
        })
        .collect();

    Chart::Ready(LineGeometry {
        points,
        path,
        area_path,
        min_value,
        max_value,
        padding,
        width,
        height,
        chart_height,
        ticks,
    })
}
