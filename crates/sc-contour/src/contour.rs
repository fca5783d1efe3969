use sc_core::{PixelBox, Point2f};

/// Ordered boundary of one island, pixel space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point2f>,
    /// Pixel the walk started from.
    pub start: (usize, usize),
    /// The walk returned to `start` before hitting the step bound.
    pub closed: bool,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Option<PixelBox> {
        PixelBox::from_points(&self.points)
    }
}
