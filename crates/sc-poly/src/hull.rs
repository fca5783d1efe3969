use sc_core::{Error, Point2f, Result, cross};

/// Andrew's monotone chain over the unique input points.
///
/// Collinear points are dropped (`cross >= 0` pops), so consecutive vertices
/// always make a strict turn. In Y-down pixel coordinates every consecutive
/// `cross` is negative: the ring runs counter-clockwise on screen, starting
/// at the smallest `(x, y)`. Two or fewer unique points come back as-is.
pub fn convex_hull(points: &[Point2f]) -> Vec<Point2f> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() <= 2 {
        return sorted;
    }

    let first = half_hull(sorted.iter().copied());
    let second = half_hull(sorted.iter().rev().copied());

    let mut hull = Vec::with_capacity(first.len() + second.len() - 2);
    hull.extend_from_slice(&first[..first.len() - 1]);
    hull.extend_from_slice(&second[..second.len() - 1]);
    hull
}

fn half_hull(points: impl Iterator<Item = Point2f>) -> Vec<Point2f> {
    let mut chain: Vec<Point2f> = Vec::new();
    for p in points {
        while let &[.., o, a] = chain.as_slice() {
            if cross(o, a, p) < 0.0 {
                break;
            }
            chain.pop();
        }
        chain.push(p);
    }
    chain
}

/// Shoelace area. Negative for [`convex_hull`] output in Y-down pixels.
pub fn signed_area(points: &[Point2f]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// True when the closed ring turns the same way, strictly, at every vertex.
pub fn is_convex(points: &[Point2f]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0_f32;
    for i in 0..n {
        let c = cross(points[i], points[(i + 1) % n], points[(i + 2) % n]);
        if c == 0.0 || c.signum() * sign < 0.0 {
            return false;
        }
        sign = c.signum();
    }
    true
}

/// Strictly convex vertex ring in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Point2f>,
}

impl ConvexPolygon {
    /// Hull of `points`; fails when fewer than three hull vertices remain.
    pub fn from_points(points: &[Point2f]) -> Result<Self> {
        let vertices = convex_hull(points);
        if vertices.len() < 3 {
            return Err(Error::insufficient(format!(
                "degenerate hull: {} vertices from {} points",
                vertices.len(),
                points.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Caller guarantees `vertices` is a subsequence of a convex ring.
    pub(crate) fn from_convex_subset(vertices: Vec<Point2f>) -> Self {
        debug_assert!(vertices.len() >= 3);
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2f] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
