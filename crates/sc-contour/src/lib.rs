//! Boundary tracing over single-frame edge masks.
//!
//! [`trace_moore`] walks one 8-connected island of set pixels starting from a
//! given pixel. [`trace_islands`] raster-scans a mask and traces every island
//! exactly once; [`select_contour`] then applies an explicit
//! [`IslandPolicy`] to pick the contour used for a single body.
//!
//! Directions are Y-down, indexed clockwise on screen starting at "right":
//! `0=E, 1=SE, 2=S, 3=SW, 4=W, 5=NW, 6=N, 7=NE`.

mod contour;
mod islands;
mod trace;

pub use contour::Contour;
pub use islands::{IslandPolicy, select_contour, trace_islands};
pub use trace::trace_moore;
