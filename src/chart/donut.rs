use super::{sanitize, Chart, ChartConfig, ChartDatum};

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    pub value: f64,
    /// Share of the total, 0-100
    pub percentage: f64,
    /// Degrees, starting at -90 (12 o'clock) and running clockwise
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
    /// Annular-sector path
    pub path: String,
    pub color: String,
}

impl Segment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutGeometry {
    pub segments: Vec<Segment>,
    pub total: f64,
    pub size: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub inner_radius: f64,
}

const START_ANGLE: f64 = -90.0;
const FULL_CIRCLE_EPSILON: f64 = 1e-9;

struct Ring {
    cx: f64,
    cy: f64,
    outer: f64,
    inner: f64,
}

impl Ring {
    fn point(&self, radius: f64, degrees: f64) -> (f64, f64) {
        let rad = degrees.to_radians();
        (self.cx + radius * rad.cos(), self.cy + radius * rad.sin())
    }

    fn sector(&self, start: f64, end: f64) -> String {
        let (x1, y1) = self.point(self.outer, start);
        let (x2, y2) = self.point(self.outer, end);
        let (x3, y3) = self.point(self.inner, end);
        let (x4, y4) = self.point(self.inner, start);
        let large_arc = if end - start > 180.0 { 1 } else { 0 };
        let (r, ir) = (self.outer, self.inner);

        [
            format!("M {} {}", x1, y1),
            format!("A {} {} 0 {} 1 {} {}", r, r, large_arc, x2, y2),
            format!("L {} {}", x3, y3),
            format!("A {} {} 0 {} 0 {} {}", ir, ir, large_arc, x4, y4),
            "Z".to_string(),
        ]
        .join(" ")
    }

    /// A lone segment covering the whole circle. An arc whose start and end
    /// coincide draws nothing, so each ring is split into two half arcs.
    fn full(&self, start: f64) -> String {
        let (ox1, oy1) = self.point(self.outer, start);
        let (ox2, oy2) = self.point(self.outer, start + 180.0);
        let (ix1, iy1) = self.point(self.inner, start);
        let (ix2, iy2) = self.point(self.inner, start + 180.0);
        let (r, ir) = (self.outer, self.inner);

        [
            format!("M {} {}", ox1, oy1),
            format!("A {} {} 0 1 1 {} {}", r, r, ox2, oy2),
            format!("A {} {} 0 1 1 {} {}", r, r, ox1, oy1),
            "Z".to_string(),
            format!("M {} {}", ix1, iy1),
            format!("A {} {} 0 1 0 {} {}", ir, ir, ix2, iy2),
            format!("A {} {} 0 1 0 {} {}", ir, ir, ix1, iy1),
            "Z".to_string(),
        ]
        .join(" ")
    }
}

/// Partition a circle into arcs proportional to each value, walking
/// clockwise from 12 o'clock. Zero-sum input has nothing to partition and
/// returns [`Chart::NoData`].
pub fn donut_chart(data: &[ChartDatum], size: f64, config: &ChartConfig) -> Chart<DonutGeometry> {
    let total: f64 = data.iter().map(|d| sanitize(d.value)).sum();
    if data.is_empty() || total <= 0.0 || !total.is_finite() {
        return Chart::NoData;
    }

    let radius = (size / 2.0 - config.donut_margin()).max(0.0);
    let ring = Ring {
        cx: size / 2.0,
        cy: size / 2.0,
        outer: radius,
        inner: radius * config.donut_inner_ratio(),
    };

    let mut current = START_ANGLE;
    let segments = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let value = sanitize(d.value);
            let sweep = value / total * 360.0;
            let start = current;
            let end = current + sweep;
            current = end;

            let path = if sweep >= 360.0 - FULL_CIRCLE_EPSILON {
                ring.full(start)
            } else {
                ring.sector(start, end)
            };

            Segment {
                label: d.label.clone(),
                value: d.value,
                percentage: value / total * 100.0,
                start_angle: start,
                end_angle: end,
                mid_angle: (start + end) / 2.0,
                path,
                color: config.color_for(i, d),
            }
        })
        .collect();

    Chart::Ready(DonutGeometry {
        segments,
        total,
        size,
        center_x: ring.cx,
        center_y: ring.cy,
        radius: ring.outer,
        inner_radius: ring.inner,
    })
}
