use crate::{Error, ImageView};

pub type Rgba = [u8; 4];

/// Borrowed RGBA pixels, one `[r, g, b, a]` element per pixel.
pub type PixelBuffer<'a> = ImageView<'a, Rgba>;

/// Views tightly packed RGBA bytes (`width * height * 4`) as a [`PixelBuffer`].
pub fn rgba_view(width: usize, height: usize, bytes: &[u8]) -> Result<PixelBuffer<'_>, Error> {
    if width == 0 || height == 0 || bytes.is_empty() {
        return Err(Error::insufficient(format!(
            "empty pixel buffer ({width}x{height}, {} bytes)",
            bytes.len()
        )));
    }

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: bytes.len(),
        })?;
    if bytes.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let (pixels, _) = bytes.as_chunks::<4>();
    ImageView::from_slice(width, height, width, pixels)
}

impl<'a> ImageView<'a, Rgba> {
    /// Same as [`rgba_view`].
    pub fn from_rgba(width: usize, height: usize, bytes: &'a [u8]) -> Result<Self, Error> {
        rgba_view(width, height, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::{PixelBuffer, rgba_view};
    use crate::Error;

    #[test]
    fn packs_bytes_into_pixels() {
        let bytes = [
            1u8, 2, 3, 4, 5, 6, 7, 8, // row 0
            9, 10, 11, 12, 13, 14, 15, 16, // row 1
        ];
        let view = rgba_view(2, 2, &bytes).expect("valid buffer");

        assert_eq!(view.get(1, 0), Some(&[5, 6, 7, 8]));
        assert_eq!(view.get(0, 1).map(|px| px[3]), Some(12));
        assert_eq!(view.get(5, 5), None);

        let same = PixelBuffer::from_rgba(2, 2, &bytes).expect("valid buffer");
        assert_eq!(same.row(1), view.row(1));
    }

    #[test]
    fn rejects_empty_and_short_buffers() {
        assert!(matches!(
            rgba_view(0, 4, &[]),
            Err(Error::InsufficientData(_))
        ));
        assert_eq!(
            rgba_view(2, 2, &[0u8; 12]).unwrap_err(),
            Error::SizeMismatch {
                expected: 16,
                actual: 12
            }
        );
    }
}
