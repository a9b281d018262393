use super::{sanitize, Chart, ChartConfig, ChartDatum, Padding, Tick, TICK_RATIOS};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub bars: Vec<Bar>,
    pub max_value: f64,
    pub padding: Padding,
    /// viewBox width
    pub width: f64,
    /// viewBox height
    pub height: f64,
    /// Plot area height (height minus vertical padding)
    pub chart_height: f64,
    pub ticks: Vec<Tick>,
}

impl BarGeometry {
    /// y-coordinate of the x-axis baseline.
    pub fn baseline(&self) -> f64 {
        self.padding.top + self.chart_height
    }
}

/// Lay out a bar chart: bars share the inner width in equal slots and their
/// heights scale linearly from 0 to the largest value.
pub fn bar_chart(data: &[ChartDatum], height: f64, config: &ChartConfig) -> Chart<BarGeometry> {
    if data.is_empty() {
        return Chart::NoData;
    }

    let padding = config.bar_padding();
    let width = config.width();
    let chart_height = (height - padding.top - padding.bottom).max(0.0);
    let inner_width = (width - padding.left - padding.right).max(0.0);

    let max_value = data.iter().map(|d| sanitize(d.value)).fold(0.0, f64::max);
    let denominator = if max_value > 0.0 { max_value } else { 1.0 };

    let slot = inner_width / data.len() as f64;
    let bar_width = slot * config.bar_width_ratio();

    let bars = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let bar_height = sanitize(d.value) / denominator * chart_height;
            Bar {
                label: d.label.clone(),
                value: d.value,
                x: padding.left + i as f64 * slot + (slot - bar_width) / 2.0,
                y: padding.top + chart_height - bar_height,
                width: bar_width,
                height: bar_height,
                color: config.color_for(i, d),
            }
        })
        .collect();

    let ticks = TICK_RATIOS
        .iter()
        .map(|ratio| Tick {
            y: padding.top + chart_height * (1.0 - ratio),
            label: (max_value * ratio).round(),
        })
        .collect();

    Chart::Ready(BarGeometry {
        bars,
        max_value,
        padding,
        width,
        height,
        chart_height,
        ticks,
    })
}
