//! Opacity masks and bounded binary morphology.
//!
//! Masks are `u8` images holding `0` or `255`; any non-zero value counts as
//! set. Erosion and dilation only evaluate pixels inside a caller-supplied
//! region of interest and leave everything else at `0`, so work scales with
//! the opaque area rather than the frame.

use sc_core::{BorderMode, Image, ImageView, PixelBuffer, Rect, sample_or_border};

/// Margin added around the opaque bounds before morphology.
pub const ROI_MARGIN: usize = 2;

/// Set iff `alpha >= threshold`.
pub fn opacity_mask(pixels: &PixelBuffer<'_>, threshold: u8) -> Image<u8> {
    let mut out = Image::filled(pixels.width(), pixels.height(), 0u8);
    let mut view = out.as_view_mut();
    for (y, src) in pixels.rows().enumerate() {
        for (d, px) in view.row_mut(y).iter_mut().zip(src) {
            *d = if px[3] >= threshold { 255 } else { 0 };
        }
    }

    out
}

/// Tight bounding rectangle of the set pixels.
pub fn opaque_bounds(mask: &ImageView<'_, u8>) -> Option<Rect> {
    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0;
    let mut max_y = 0;

    for (y, row) in mask.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v != 0 {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    (min_x != usize::MAX).then(|| Rect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

pub fn erode3x3_binary_u8(
    src: &ImageView<'_, u8>,
    roi: Rect,
    border: &BorderMode<u8>,
) -> Image<u8> {
    let mut out = Image::filled(src.width(), src.height(), 0u8);
    let mut dst = out.as_view_mut();

    for y in roi.y..roi.bottom().min(src.height()) {
        for x in roi.x..roi.right().min(src.width()) {
            let all_set = neighborhood(x, y).all(|(nx, ny)| {
                sample_or_border(src, nx, ny, border).is_some_and(|v| v != 0)
            });
            if let Some(d) = dst.get_mut(x, y) {
                *d = if all_set { 255 } else { 0 };
            }
        }
    }

    out
}

pub fn dilate3x3_binary_u8(
    src: &ImageView<'_, u8>,
    roi: Rect,
    border: &BorderMode<u8>,
) -> Image<u8> {
    let mut out = Image::filled(src.width(), src.height(), 0u8);
    let mut dst = out.as_view_mut();

    for y in roi.y..roi.bottom().min(src.height()) {
        for x in roi.x..roi.right().min(src.width()) {
            let any_set = neighborhood(x, y).any(|(nx, ny)| {
                sample_or_border(src, nx, ny, border).is_some_and(|v| v != 0)
            });
            if let Some(d) = dst.get_mut(x, y) {
                *d = if any_set { 255 } else { 0 };
            }
        }
    }

    out
}

/// Morphological gradient of an opacity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMask {
    /// Set where the dilated mask is set and the eroded mask is not.
    pub edges: Image<u8>,
    /// Tight bounds of the opaque pixels.
    pub opaque: Rect,
    /// Region the morphology was evaluated in.
    pub roi: Rect,
}

impl EdgeMask {
    pub fn count(&self) -> usize {
        self.edges.data().iter().filter(|&&v| v != 0).count()
    }
}

/// `dilate(mask) AND NOT erode(mask)` inside the opaque bounds grown by
/// [`ROI_MARGIN`]. Pixels outside the image count as unset. `None` when the
/// mask has no set pixel.
pub fn edge_mask(mask: &ImageView<'_, u8>) -> Option<EdgeMask> {
    let opaque = opaque_bounds(mask)?;
    let roi = opaque.expand_clamped(ROI_MARGIN, mask.width(), mask.height());

    let border = BorderMode::Constant(0u8);
    let eroded = erode3x3_binary_u8(mask, roi, &border);
    let mut edges = dilate3x3_binary_u8(mask, roi, &border);

    let mut dst = edges.as_view_mut();
    for y in roi.y..roi.bottom() {
        let eroded_row = eroded.as_view().row(y);
        for (d, &e) in dst.row_mut(y).iter_mut().zip(eroded_row) {
            if e != 0 {
                *d = 0;
            }
        }
    }

    Some(EdgeMask { edges, opaque, roi })
}

#[inline]
fn neighborhood(x: usize, y: usize) -> impl Iterator<Item = (isize, isize)> {
    let (x, y) = (x as isize, y as isize);
    (-1isize..=1).flat_map(move |dy| (-1isize..=1).map(move |dx| (x + dx, y + dy)))
}

#[cfg(test)]
mod tests {
    use sc_core::{BorderMode, Image, Rect, rgba_view};

    use crate::{
        dilate3x3_binary_u8, edge_mask, erode3x3_binary_u8, opacity_mask, opaque_bounds,
    };

    fn full(img: &Image<u8>) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: img.width(),
            height: img.height(),
        }
    }

    fn square_mask(size: usize, lo: usize, hi: usize) -> Image<u8> {
        let mut data = vec![0u8; size * size];
        for y in lo..=hi {
            for x in lo..=hi {
                data[y * size + x] = 255;
            }
        }
        Image::from_vec(size, size, data).expect("valid image")
    }

    #[test]
    fn mask_uses_inclusive_alpha_threshold() {
        let mut bytes = vec![0u8; 4 * 4];
        bytes[3] = 127;
        bytes[7] = 128;
        bytes[11] = 255;
        let view = rgba_view(4, 1, &bytes).expect("valid buffer");

        let mask = opacity_mask(&view, 128);
        assert_eq!(mask.data(), &[0, 255, 255, 0]);
    }

    #[test]
    fn bounds_of_set_pixels() {
        let mask = square_mask(9, 2, 5);
        assert_eq!(
            opaque_bounds(&mask.as_view()),
            Some(Rect {
                x: 2,
                y: 2,
                width: 4,
                height: 4
            })
        );
        assert!(opaque_bounds(&Image::filled(3, 3, 0u8).as_view()).is_none());
    }

    #[test]
    fn erode_removes_single_pixel_speck() {
        let mut data = vec![0u8; 25];
        data[12] = 255;
        let img = Image::from_vec(5, 5, data).expect("valid image");

        let out = erode3x3_binary_u8(&img.as_view(), full(&img), &BorderMode::Constant(0));
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn dilate_fills_single_pixel_hole() {
        let mut data = vec![255u8; 25];
        data[12] = 0;
        let img = Image::from_vec(5, 5, data).expect("valid image");

        let out = dilate3x3_binary_u8(&img.as_view(), full(&img), &BorderMode::Constant(0));
        assert_eq!(out.data()[12], 255);
    }

    #[test]
    fn image_border_counts_as_unset_for_erosion() {
        let img = Image::filled(4, 4, 255u8);

        let off = erode3x3_binary_u8(&img.as_view(), full(&img), &BorderMode::Constant(0));
        assert_eq!(off.data()[0], 0);
        assert_eq!(off.data()[5], 255);

        let clamped = erode3x3_binary_u8(&img.as_view(), full(&img), &BorderMode::Clamp);
        assert!(clamped.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn morphology_stays_inside_roi() {
        let img = Image::filled(6, 6, 255u8);
        let roi = Rect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };

        let out = dilate3x3_binary_u8(&img.as_view(), roi, &BorderMode::Constant(0));
        let set: usize = out.data().iter().filter(|&&v| v != 0).count();
        assert_eq!(set, 4);
        assert_eq!(out.data()[6 + 1], 255);
        assert_eq!(out.data()[3 * 6 + 3], 0);
    }

    #[test]
    fn edge_mask_is_two_pixel_ring() {
        // Opaque 4x4 block at (3..=6, 3..=6) in a 10x10 frame.
        let mask = square_mask(10, 3, 6);
        let edge = edge_mask(&mask.as_view()).expect("opaque pixels");

        // Outer ring 6x6 minus inner 2x2 core.
        assert_eq!(edge.count(), 36 - 4);
        let e = edge.edges.as_view();
        assert_eq!(e.get(2, 2), Some(&255));
        assert_eq!(e.get(3, 3), Some(&255));
        assert_eq!(e.get(4, 4), Some(&0));
        assert_eq!(e.get(1, 1), Some(&0));
        assert_eq!(
            edge.roi,
            Rect {
                x: 1,
                y: 1,
                width: 8,
                height: 8
            }
        );
    }

    #[test]
    fn edge_mask_of_full_frame_is_border_ring() {
        let mask = Image::filled(5, 4, 255u8);
        let edge = edge_mask(&mask.as_view()).expect("opaque pixels");

        assert_eq!(edge.count(), 5 * 4 - 3 * 2);
        assert!(edge_mask(&Image::filled(5, 4, 0u8).as_view()).is_none());
    }
}
