use sc_core::Point2f;

/// Sorts points by ascending angle around their mean. With Y pointing down
/// this is clockwise on screen, the order Matter.js expects for outlines.
pub fn clockwise_sort(points: &mut [Point2f]) {
    if points.is_empty() {
        return;
    }

    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    let centre = Point2f::new(sx / n, sy / n);

    points.sort_by(|a, b| {
        let ta = (a.y - centre.y).atan2(a.x - centre.x);
        let tb = (b.y - centre.y).atan2(b.x - centre.x);
        ta.total_cmp(&tb)
    });
}
