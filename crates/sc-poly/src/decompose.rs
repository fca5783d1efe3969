use sc_core::{Error, PixelBox, Point2f, Result};
use serde::{Deserialize, Serialize};

use crate::ConvexPolygon;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposeConfig {
    /// Bucket edge length in pixels.
    pub cell_size: usize,
    /// Hulls with at most this many vertices are returned whole.
    pub max_hull_vertices: usize,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            cell_size: 32,
            max_hull_vertices: 8,
        }
    }
}

/// Approximate convex cover of a contour.
///
/// When the hull is already small it is the only part. Otherwise contour
/// points are bucketed into `cell_size` squares laid over `bounds` and each
/// bucket with at least three points contributes its own hull. Buckets are
/// visited row-major. If no bucket yields a polygon the hull is returned.
pub fn decompose(
    points: &[Point2f],
    bounds: &PixelBox,
    cfg: &DecomposeConfig,
) -> Result<Vec<ConvexPolygon>> {
    if points.len() < 3 {
        return Err(Error::insufficient(format!(
            "decomposition needs 3 points, got {}",
            points.len()
        )));
    }
    if cfg.cell_size == 0 {
        return Err(Error::invalid("cell_size must be positive"));
    }

    let hull = ConvexPolygon::from_points(points)?;
    if hull.len() <= cfg.max_hull_vertices {
        return Ok(vec![hull]);
    }

    let cell = cfg.cell_size as f32;
    let cols = ((bounds.width / cell).ceil() as usize).max(1);
    let rows = ((bounds.height / cell).ceil() as usize).max(1);

    let mut buckets: Vec<Vec<Point2f>> = vec![Vec::new(); cols * rows];
    for &p in points {
        let col = cell_index(p.x - bounds.left, cell, cols);
        let row = cell_index(p.y - bounds.top, cell, rows);
        if let (Some(c), Some(r)) = (col, row) {
            buckets[r * cols + c].push(p);
        }
    }

    let parts: Vec<ConvexPolygon> = buckets
        .iter()
        .filter(|b| b.len() >= 3)
        .filter_map(|b| ConvexPolygon::from_points(b).ok())
        .collect();

    if parts.is_empty() {
        tracing::debug!(cols, rows, "no usable cells, falling back to hull");
        return Ok(vec![hull]);
    }

    tracing::debug!(parts = parts.len(), cols, rows, "bucket decomposition");
    Ok(parts)
}

/// Points on the far edge of the bounds belong to the last cell.
fn cell_index(offset: f32, cell: f32, count: usize) -> Option<usize> {
    if offset.is_nan() || offset < 0.0 {
        return None;
    }
    Some(((offset / cell).floor() as usize).min(count - 1))
}

#[cfg(test)]
mod tests {
    use sc_core::{Error, PixelBox, Point2f};

    use super::{DecomposeConfig, decompose};
    use crate::{convex_hull, is_convex};

    fn ellipse(rx: f32, ry: f32, n: usize) -> Vec<Point2f> {
        (0..n)
            .map(|i| {
                let t = i as f32 * core::f32::consts::TAU / n as f32;
                Point2f::new((100.0 + rx * t.cos()).round(), (80.0 + ry * t.sin()).round())
            })
            .collect()
    }

    #[test]
    fn small_hull_is_returned_whole() {
        let square: Vec<Point2f> = [(0.0, 0.0), (9.0, 0.0), (9.0, 9.0), (0.0, 9.0), (4.0, 0.0)]
            .into_iter()
            .map(|(x, y)| Point2f::new(x, y))
            .collect();
        let bounds = PixelBox::from_points(&square).expect("non-empty");
        let parts = decompose(&square, &bounds, &DecomposeConfig::default()).expect("decomposes");

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].vertices(), convex_hull(&square).as_slice());
    }

    #[test]
    fn large_outline_splits_into_convex_cells() {
        let outline = ellipse(70.0, 50.0, 400);
        let bounds = PixelBox::from_points(&outline).expect("non-empty");
        let parts = decompose(&outline, &bounds, &DecomposeConfig::default()).expect("decomposes");

        assert!(parts.len() > 1);
        for part in &parts {
            assert!(part.len() >= 3);
            assert!(is_convex(part.vertices()));
        }
    }

    #[test]
    fn far_edge_points_are_kept() {
        // 64 px wide: x = 64 would be column 2 without clamping.
        let mut outline = ellipse(32.0, 32.0, 200);
        outline.push(Point2f::new(132.0, 80.0));
        let bounds = PixelBox::from_points(&outline).expect("non-empty");
        let parts = decompose(&outline, &bounds, &DecomposeConfig::default()).expect("decomposes");

        assert!(
            parts
                .iter()
                .any(|p| p.vertices().contains(&Point2f::new(132.0, 80.0)))
        );
    }

    #[test]
    fn huge_cells_fall_back_to_a_single_part() {
        let outline = ellipse(70.0, 50.0, 400);
        let bounds = PixelBox::from_points(&outline).expect("non-empty");
        let cfg = DecomposeConfig {
            cell_size: 1000,
            ..DecomposeConfig::default()
        };
        let parts = decompose(&outline, &bounds, &cfg).expect("decomposes");

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].vertices(), convex_hull(&outline).as_slice());
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let two = [Point2f::new(0.0, 0.0), Point2f::new(1.0, 0.0)];
        let line: Vec<Point2f> = (0..10).map(|i| Point2f::from_idx(i, 3)).collect();
        let cfg = DecomposeConfig::default();

        let bounds = PixelBox::from_points(&two).expect("non-empty");
        assert!(matches!(
            decompose(&two, &bounds, &cfg),
            Err(Error::InsufficientData(_))
        ));

        let bounds = PixelBox::from_points(&line).expect("non-empty");
        assert!(matches!(
            decompose(&line, &bounds, &cfg),
            Err(Error::InsufficientData(_))
        ));
    }
}
