use sc_core::{Error, Point2f, Result};

use crate::ConvexPolygon;

const EPSILON_START: f32 = 1.0;
const EPSILON_STEP: f32 = 0.5;
const EPSILON_MAX: f32 = 100.0;

/// Distance from `p` to the closed segment `a..b`.
pub fn segment_distance(p: Point2f, a: Point2f, b: Point2f) -> f32 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return (p - a).norm();
    }

    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Ramer-Douglas-Peucker over an open polyline. Endpoints are always kept;
/// an interior point survives when it is the farthest point of its span and
/// lies more than `epsilon` from the span's chord.
pub fn rdp(points: &[Point2f], epsilon: f32) -> Vec<Point2f> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut spans = vec![(0, n - 1)];
    while let Some((first, last)) = spans.pop() {
        let mut max_dist = 0.0_f32;
        let mut split = first;
        for (i, &p) in points.iter().enumerate().take(last).skip(first + 1) {
            let d = segment_distance(p, points[first], points[last]);
            if d > max_dist {
                max_dist = d;
                split = i;
            }
        }

        if max_dist > epsilon {
            keep[split] = true;
            spans.push((split, last));
            spans.push((first, split));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Reduces `points` to at most `target` vertices where possible.
///
/// The tolerance grows from 1.0 in steps of 0.5 (up to 100) and every pass
/// simplifies the original input. A result with fewer than three points is
/// replaced by the first, middle and last input points. Re-applying with the
/// same target returns the same sequence.
pub fn simplify_to_count(points: &[Point2f], target: usize) -> Result<Vec<Point2f>> {
    if points.len() < 3 {
        return Err(Error::insufficient(format!(
            "simplification needs 3 points, got {}",
            points.len()
        )));
    }
    Ok(simplify_ring(points, target))
}

fn simplify_ring(points: &[Point2f], target: usize) -> Vec<Point2f> {
    let mut epsilon = EPSILON_START;
    let mut simplified = points.to_vec();
    while simplified.len() > target && epsilon < EPSILON_MAX {
        epsilon += EPSILON_STEP;
        simplified = rdp(points, epsilon);
    }

    if simplified.len() < 3 {
        let n = points.len();
        return vec![points[0], points[n / 2], points[n - 1]];
    }
    simplified
}

impl ConvexPolygon {
    /// Vertex-count reduction that keeps the polygon convex: the result is
    /// always a subsequence of the current vertices.
    pub fn simplified(&self, target: usize) -> ConvexPolygon {
        ConvexPolygon::from_convex_subset(simplify_ring(self.vertices(), target))
    }
}
