use crate::ImageView;

/// Policy for neighborhood reads that fall outside the image.
///
/// Morphology over a sprite treats everything past the frame edge as
/// transparent (`Constant(0)`); `Clamp` repeats the nearest edge pixel.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderMode<T> {
    Clamp,
    Constant(T),
}

/// Resolves a signed coordinate on an axis of length `len`.
///
/// `None` means the read falls outside and the caller should use the border
/// value (for `Constant`) or has nothing to read (empty axis).
pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let inside = usize::try_from(i).ok().filter(|&u| u <= last);
    match mode {
        BorderMode::Constant(_) => inside,
        BorderMode::Clamp => Some(inside.unwrap_or(if i < 0 { 0 } else { last })),
    }
}

/// Reads `(x, y)` from `view`, resolving out-of-image coordinates with `mode`.
pub fn sample_or_border<T: Copy>(
    view: &ImageView<'_, T>,
    x: isize,
    y: isize,
    mode: &BorderMode<T>,
) -> Option<T> {
    let at = map_index(x, view.width(), mode).zip(map_index(y, view.height(), mode));
    match (at, mode) {
        (Some((xi, yi)), _) => view.get(xi, yi).copied(),
        (None, BorderMode::Constant(v)) => Some(*v),
        (None, BorderMode::Clamp) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, map_index, sample_or_border};
    use crate::Image;

    #[test]
    fn clamp_pins_to_edges() {
        let clamp = BorderMode::<u8>::Clamp;
        let mapped: Vec<_> = [-3, -1, 0, 4, 5, 99]
            .into_iter()
            .map(|i| map_index(i, 5, &clamp))
            .collect();

        assert_eq!(mapped, [Some(0), Some(0), Some(0), Some(4), Some(4), Some(4)]);
        assert_eq!(map_index(0, 0, &clamp), None);
    }

    #[test]
    fn constant_rejects_outside() {
        let transparent = BorderMode::Constant(0u8);

        assert_eq!(map_index(-1, 5, &transparent), None);
        assert_eq!(map_index(2, 5, &transparent), Some(2));
        assert_eq!(map_index(5, 5, &transparent), None);
    }

    #[test]
    fn reads_past_the_frame() {
        let mask = Image::from_vec(2, 2, vec![255u8, 0, 0, 255]).expect("valid mask");
        let view = mask.as_view();

        assert_eq!(sample_or_border(&view, 1, 1, &BorderMode::Constant(0)), Some(255));
        assert_eq!(sample_or_border(&view, 2, 0, &BorderMode::Constant(0)), Some(0));
        assert_eq!(sample_or_border(&view, -4, 9, &BorderMode::Clamp), Some(0));
        assert_eq!(sample_or_border(&view, 7, 7, &BorderMode::Clamp), Some(255));
    }
}
