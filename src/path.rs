/// Edges shorter than this are always drawn as a straight segment to avoid zig-zags.
const STRAIGHT_THRESHOLD: f32 = 10.0;

/// Generate SVG path commands for an edge between two anchors.
///
/// Curved edges are cubic beziers whose control points extend from each end
/// along the flow axis (`forward` points from output towards input). Straight
/// edges, and curved ones shorter than a few pixels, are a single line.
///
/// # Arguments
/// * `start` - Output anchor
/// * `end` - Input anchor
/// * `forward` - Unit vector of the flow direction
/// * `curved` - Curve or straight segment
/// * `min_offset` - Minimum control point offset (default: 50.0)
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 C 60 20 90 80 140 80")
pub fn generate_flow_path(
    start: (f32, f32),
    end: (f32, f32),
    forward: (f32, f32),
    curved: bool,
    min_offset: f32,
) -> String {
    let bezier = CubicBezier::from_endpoints(start, end, forward, min_offset);
    if !curved || bezier.is_straight() {
        return format!("M {} {} L {} {}", start.0, start.1, end.0, end.1);
    }

    format!(
        "M {} {} C {} {} {} {} {} {}",
        bezier.p0.0, bezier.p0.1, bezier.p1.0, bezier.p1.1, bezier.p2.0, bezier.p2.1, bezier.p3.0, bezier.p3.1
    )
}

/// Cubic bezier curve for distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: (f32, f32), // Start point
    pub p1: (f32, f32), // Control point 1
    pub p2: (f32, f32), // Control point 2
    pub p3: (f32, f32), // End point
}

impl CubicBezier {
    /// Create a bezier from endpoints using the same logic as [`generate_flow_path`].
    ///
    /// The control offset is half the distance along the flow axis, but never
    /// less than `min_offset`. Very short edges collapse to a straight bezier.
    pub fn from_endpoints(
        start: (f32, f32),
        end: (f32, f32),
        forward: (f32, f32),
        min_offset: f32,
    ) -> Self {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;

        if dx * dx + dy * dy < STRAIGHT_THRESHOLD * STRAIGHT_THRESHOLD {
            return CubicBezier {
                p0: start,
                p1: start,
                p2: end,
                p3: end,
            };
        }

        let along_flow = (dx * forward.0 + dy * forward.1).abs();
        let offset = (along_flow * 0.5).max(min_offset);

        CubicBezier {
            p0: start,
            p1: (start.0 + forward.0 * offset, start.1 + forward.1 * offset),
            p2: (end.0 - forward.0 * offset, end.1 - forward.1 * offset),
            p3: end,
        }
    }

    /// Straight segment between start and end: control points sit on the endpoints.
    pub fn line(start: (f32, f32), end: (f32, f32)) -> Self {
        CubicBezier {
            p0: start,
            p1: start,
            p2: end,
            p3: end,
        }
    }

    pub fn is_straight(&self) -> bool {
        self.p1 == self.p0 && self.p2 == self.p3
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> (f32, f32) {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.0
            + 3.0 * mt2 * t * self.p1.0
            + 3.0 * mt * t2 * self.p2.0
            + t3 * self.p3.0;
        let y = mt3 * self.p0.1
            + 3.0 * mt2 * t * self.p1.1
            + 3.0 * mt * t2 * self.p2.1
            + t3 * self.p3.1;

        (x, y)
    }
}

/// Squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = (a.0 + t * ab.0, a.1 + t * ab.1);

    let dx = point.0 - closest.0;
    let dy = point.1 - closest.1;
    dx * dx + dy * dy
}

/// Minimum distance from a point to a cubic bezier curve, sampled as a polyline.
///
/// `num_samples` of 0 falls back to 20.
pub fn distance_to_bezier(point: (f32, f32), bezier: &CubicBezier, num_samples: usize) -> f32 {
    if bezier.is_straight() {
        return distance_to_line_segment_sq(point, bezier.p0, bezier.p3).sqrt();
    }

    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
