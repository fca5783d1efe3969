//! Sprite-sheet frame grid detection.
//!
//! Detection runs an ordered list of [`GridStrategy`] values and stops at the
//! first one that yields a grid:
//! - [`GridStrategy::Dividers`]: transparent bands in the per-row/per-column
//!   alpha projection mark frame boundaries.
//! - [`GridStrategy::EstimateFit`]: exact column/row counts whose frame size
//!   is within 20% of a caller estimate.
//! - [`GridStrategy::Divisors`]: square tiles whose edge divides
//!   `gcd(width, height)`, capped by `max_frames`.
//!
//! When every strategy fails the whole image is a single frame. That is not
//! an error.

mod detect;
pub mod divisor;
mod estimate;
mod profile;

pub use detect::{
    GridDetectConfig, GridSource, GridStrategy, SpriteGridInfo, crop_frame, detect_grid,
    divider_grid, divisor_grid,
};
pub use divisor::{divisors, gcd};
pub use estimate::fit_grid_to_estimate;
pub use profile::{AxisProfile, find_dividers};
