//! Polygon stages between a traced contour and physics export.
//!
//! All inputs and outputs are pixel-space [`Point2f`](sc_core::Point2f)
//! sequences. [`ConvexPolygon`] can only be obtained from the hull builder or
//! by simplifying an existing convex polygon, so its vertices are always in
//! strictly convex position.

mod decompose;
mod hull;
mod order;
mod simplify;

pub use decompose::{DecomposeConfig, decompose};
pub use hull::{ConvexPolygon, convex_hull, is_convex, signed_area};
pub use order::clockwise_sort;
pub use simplify::{rdp, segment_distance, simplify_to_count};
