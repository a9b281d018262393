//! SVG rendering of chart geometry.

use std::fmt::Write;

use super::{BarGeometry, Chart, DonutGeometry, LineGeometry, Tick};

const NO_DATA: &str = "No data available";
const MAX_LABEL_CHARS: usize = 12;
const GRID_COLOR: &str = "#E5E7EB";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shorten axis labels to 12 characters plus an ellipsis.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        format!("{}...", label.chars().take(MAX_LABEL_CHARS).collect::<String>())
    } else {
        label.to_string()
    }
}

fn empty_state(title: &str, width: f64, height: f64) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}"><title>{t}</title><text x="{cx}" y="{cy}" text-anchor="middle" fill="#6B7280">{msg}</text></svg>"##,
        w = width,
        h = height,
        t = escape(title),
        cx = width / 2.0,
        cy = height / 2.0,
        msg = NO_DATA
    )
}

fn grid(out: &mut String, ticks: &[Tick], left: f64, right: f64) {
    for tick in ticks {
        let _ = write!(
            out,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{}" stroke-width="1"/><text x="{}" y="{y}" text-anchor="end" dominant-baseline="middle" font-size="12">{}</text>"#,
            left,
            right,
            GRID_COLOR,
            left - 10.0,
            tick.label,
            y = tick.y
        );
    }
}

pub fn render_bar(chart: &Chart<BarGeometry>, title: &str, show_values: bool) -> String {
    let g = match chart {
        Chart::Ready(g) => g,
        Chart::NoData => return empty_state(title, 800.0, 300.0),
    };

    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}"><title>{}</title>"#,
        g.width,
        g.height,
        escape(title)
    );
    grid(&mut out, &g.ticks, g.padding.left, g.width - g.padding.right);

    for bar in &g.bars {
        let center = bar.x + bar.width / 2.0;
        let _ = write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" rx="4"><title>{}: {}</title></rect>"#,
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            escape(&bar.color),
            escape(&bar.label),
            bar.value
        );
        if show_values && bar.height > 20.0 {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">{}</text>"#,
                center,
                bar.y - 8.0,
                bar.value
            );
        }
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
            center,
            g.baseline() + 20.0,
            escape(&truncate_label(&bar.label))
        );
    }

    out.push_str("</svg>");
    out
}

pub fn render_line(chart: &Chart<LineGeometry>, title: &str, color: &str) -> String {
    let g = match chart {
        Chart::Ready(g) => g,
        Chart::NoData => return empty_state(title, 800.0, 300.0),
    };
    let color = escape(color);

    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}"><title>{}</title>"#,
        g.width,
        g.height,
        escape(title)
    );
    grid(&mut out, &g.ticks, g.padding.left, g.width - g.padding.right);

    let _ = write!(
        out,
        r#"<path d="{}" fill="{c}" fill-opacity="0.1"/><path d="{}" fill="none" stroke="{c}" stroke-width="3" stroke-linecap="round" stroke-linejoin="round"/>"#,
        g.area_path,
        g.path,
        c = color
    );

    // Thin out x labels on long series
    let every = g.points.len().div_ceil(7).max(1);
    let baseline = g.padding.top + g.chart_height;
    for (i, p) in g.points.iter().enumerate() {
        let _ = write!(
            out,
            r#"<circle cx="{}" cy="{}" r="4" fill="white" stroke="{}" stroke-width="2"><title>{}: {}</title></circle>"#,
            p.x,
            p.y,
            color,
            escape(&p.label),
            p.value
        );
        if g.points.len() <= 7 || i % every == 0 {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
                p.x,
                baseline + 20.0,
                escape(&truncate_label(&p.label))
            );
        }
    }

    out.push_str("</svg>");
    out
}

pub fn render_donut(chart: &Chart<DonutGeometry>, title: &str) -> String {
    let g = match chart {
        Chart::Ready(g) => g,
        Chart::NoData => return empty_state(title, 300.0, 300.0),
    };

    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {s} {s}"><title>{}</title>"#,
        escape(title),
        s = g.size
    );

    for segment in &g.segments {
        let _ = write!(
            out,
            r#"<path d="{}" fill="{}" fill-rule="evenodd"><title>{}: {} ({:.1}%)</title></path>"#,
            segment.path,
            escape(&segment.color),
            escape(&segment.label),
            segment.value,
            segment.percentage
        );
    }

    let _ = write!(
        out,
        r#"<text x="{cx}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="30" font-weight="bold">{}</text><text x="{cx}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="14">Total</text>"#,
        g.center_y - 10.0,
        g.total,
        g.center_y + 15.0,
        cx = g.center_x
    );

    out.push_str("</svg>");
    out
}
