use crate::{Error, Rect};

/// Shape of a raster inside its backing slice. `stride >= width` and every
/// row starts `stride` elements after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    width: usize,
    height: usize,
    stride: usize,
}

impl Layout {
    fn packed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            stride: width,
        }
    }

    /// Elements a slice must hold for this layout; the last row may stop at
    /// `width` instead of `stride`.
    fn span(&self) -> Option<usize> {
        match self.height {
            0 => Some(0),
            _ if self.width == 0 => Some(0),
            h => (h - 1).checked_mul(self.stride)?.checked_add(self.width),
        }
    }

    fn check(&self, available: usize) -> Result<(), Error> {
        if self.stride < self.width {
            return Err(Error::InvalidStride);
        }
        let needed = self.span().ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: available,
        })?;
        if available < needed {
            return Err(Error::SizeMismatch {
                expected: needed,
                actual: available,
            });
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.stride + x)
    }

    #[inline]
    fn row_range(&self, y: usize) -> core::ops::Range<usize> {
        assert!(y < self.height, "row {y} outside image of height {}", self.height);
        let start = y * self.stride;
        start..start + self.width
    }
}

/// Owned, tightly packed raster (masks, cropped frames).
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    layout: Layout,
    data: Vec<T>,
}

impl<T> Image<T> {
    /// Wraps `data` as a `width x height` image; the length must match exactly.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let layout = Layout::packed(width, height);
        let expected = width.checked_mul(height);
        if expected != Some(data.len()) {
            return Err(Error::SizeMismatch {
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self { layout, data })
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            layout: self.layout,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            layout: self.layout,
            data: &mut self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    /// A `width x height` image with every element set to `value`.
    ///
    /// Panics if the element count overflows `usize`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("{width}x{height} image does not fit in memory"));
        Self {
            layout: Layout::packed(width, height),
            data: vec![value; len],
        }
    }

    /// Packs a strided view (e.g. one frame of a sheet) into its own buffer.
    pub fn from_view(view: &ImageView<'_, T>) -> Self {
        let data: Vec<T> = view.rows().flat_map(|row| row.iter().cloned()).collect();
        Self {
            layout: Layout::packed(view.width(), view.height()),
            data,
        }
    }
}

/// Borrowed, possibly strided raster.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    layout: Layout,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        let layout = Layout {
            width,
            height,
            stride,
        };
        layout.check(data.len())?;
        Ok(Self { layout, data })
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    /// Elements between the starts of adjacent rows.
    pub fn stride(&self) -> usize {
        self.layout.stride
    }

    /// Row `y`, `width` elements long. Panics when `y >= height`.
    pub fn row(&self, y: usize) -> &'a [T] {
        &self.data[self.layout.row_range(y)]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.layout.height).map(move |y| self.row(y))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        self.layout.index(x, y).and_then(|i| self.data.get(i))
    }

    /// Zero-copy view of `rect`, which must lie inside this view.
    pub fn subview(&self, rect: Rect) -> Result<ImageView<'a, T>, Error> {
        let fits_x = rect.x.checked_add(rect.width).is_some_and(|r| r <= self.width());
        let fits_y = rect.y.checked_add(rect.height).is_some_and(|b| b <= self.height());
        if !(fits_x && fits_y) {
            return Err(Error::OutOfBounds);
        }

        let layout = Layout {
            width: rect.width,
            height: rect.height,
            stride: self.layout.stride,
        };
        let offset = rect.y * self.layout.stride + rect.x;
        let data = self.data.get(offset..).ok_or(Error::OutOfBounds)?;
        layout.check(data.len()).map_err(|_| Error::OutOfBounds)?;

        Ok(ImageView { layout, data })
    }
}

/// Mutable counterpart of [`ImageView`], used by the mask builders.
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    layout: Layout,
    data: &'a mut [T],
}

impl<T> ImageViewMut<'_, T> {
    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let range = self.layout.row_range(y);
        &mut self.data[range]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        let i = self.layout.index(x, y)?;
        self.data.get_mut(i)
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            layout: self.layout,
            data: self.data,
        }
    }
}
