use sc_core::{Error, PixelBox, Point2f, Result};
use sc_poly::ConvexPolygon;
use serde::{Deserialize, Serialize};

/// Physics-space vertex: meters, Y-up, origin at the body center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsVertex {
    pub x: f32,
    pub y: f32,
}

/// Body origin in normalized `[0, 1]` image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsPolygon {
    pub vertices: Vec<PhysicsVertex>,
}

/// Extent of the body in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyBounds {
    pub width: f32,
    pub height: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl BodyBounds {
    /// Extent of all polygon vertices.
    pub fn from_polygons(polygons: &[PhysicsPolygon]) -> Self {
        let mut iter = polygons.iter().flat_map(|p| &p.vertices);
        let Some(first) = iter.next() else {
            return Self::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for v in iter {
            min_x = min_x.min(v.x);
            min_y = min_y.min(v.y);
            max_x = max_x.max(v.x);
            max_y = max_y.max(v.y);
        }

        Self {
            width: max_x - min_x,
            height: max_y - min_y,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsBody {
    pub name: String,
    pub anchor_point: AnchorPoint,
    pub polygons: Vec<PhysicsPolygon>,
    pub bounding_box: BodyBounds,
}

fn check_ppm(ppm: f32) -> Result<()> {
    if !ppm.is_finite() || ppm <= 0.0 {
        return Err(Error::invalid(format!(
            "pixels_per_meter must be positive and finite, got {ppm}"
        )));
    }
    Ok(())
}

#[inline]
fn project(p: Point2f, center: Point2f, ppm: f32) -> PhysicsVertex {
    PhysicsVertex {
        x: (p.x - center.x) / ppm,
        y: -(p.y - center.y) / ppm,
    }
}

/// Maps pixel points into the physics frame of `bounds`.
pub fn to_physics_space(
    points: &[Point2f],
    bounds: &PixelBox,
    ppm: f32,
) -> Result<Vec<PhysicsVertex>> {
    check_ppm(ppm)?;
    let center = bounds.center();
    Ok(points.iter().map(|&p| project(p, center, ppm)).collect())
}

/// Builds a [`PhysicsBody`] from pixel-space polygons.
///
/// The body origin is the center of `bounds`. The anchor places that origin
/// in the analyzed image, measuring pixel centers, so a silhouette that
/// fills the image anchors at `(0.5, 0.5)`.
pub fn normalize(
    polygons: &[ConvexPolygon],
    bounds: &PixelBox,
    image_size: (usize, usize),
    ppm: f32,
    name: &str,
) -> Result<PhysicsBody> {
    check_ppm(ppm)?;
    if polygons.is_empty() {
        return Err(Error::insufficient("no polygons to normalize"));
    }
    let (w, h) = image_size;
    if w == 0 || h == 0 {
        return Err(Error::invalid(format!("image size {w}x{h}")));
    }

    let center = bounds.center();
    let polygons = polygons
        .iter()
        .map(|poly| PhysicsPolygon {
            vertices: poly
                .vertices()
                .iter()
                .map(|&p| project(p, center, ppm))
                .collect(),
        })
        .collect();

    Ok(PhysicsBody {
        name: name.to_owned(),
        anchor_point: AnchorPoint {
            x: (center.x + 0.5) / w as f32,
            y: (center.y + 0.5) / h as f32,
        },
        polygons,
        bounding_box: BodyBounds {
            width: bounds.width / ppm,
            height: bounds.height / ppm,
            center_x: 0.0,
            center_y: 0.0,
        },
    })
}
