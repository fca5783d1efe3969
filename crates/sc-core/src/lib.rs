//! Foundational primitives for the sprite-collider pipeline.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! A sprite-sheet frame is therefore a zero-copy subview of the sheet.
//!
//! ## Pixel Buffers
//! RGBA input is viewed as `ImageView<'_, [u8; 4]>` (see [`PixelBuffer`]).
//! Only the alpha channel matters to the geometry stages.
//!
//! ## Coordinates
//! Pixel-space points are Y-down and integer coordinates refer to pixel
//! centers, so an image of width `w` spans `[-0.5, w - 0.5]` horizontally.

mod border;
mod error;
mod geom;
mod image;
mod pixel;

pub use border::{BorderMode, map_index, sample_or_border};
pub use error::{Error, Result};
pub use geom::{PixelBox, Point2f, Rect, Vec2f, cross};
pub use image::{Image, ImageView, ImageViewMut};
pub use pixel::{PixelBuffer, Rgba, rgba_view};
