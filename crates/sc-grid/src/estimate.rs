use sc_core::{Error, Result};

use crate::detect::{GridSource, SpriteGridInfo};

const TOLERANCE: f64 = 0.2;

/// Exact grid whose frame size is within 20% of `(estimate_width,
/// estimate_height)` on both axes, minimizing the summed squared relative
/// error. Both image dimensions must divide evenly by the chosen counts.
pub fn fit_grid_to_estimate(
    width: usize,
    height: usize,
    estimate_width: usize,
    estimate_height: usize,
) -> Result<SpriteGridInfo> {
    if width == 0 || height == 0 || estimate_width == 0 || estimate_height == 0 {
        return Err(Error::invalid(format!(
            "image {width}x{height} and estimate {estimate_width}x{estimate_height} must be positive"
        )));
    }

    let (w, h) = (width as f64, height as f64);
    let (ew, eh) = (estimate_width as f64, estimate_height as f64);

    let min_cols = (w / (ew * (1.0 + TOLERANCE))).floor() as usize;
    let max_cols = (w / (ew * (1.0 - TOLERANCE))).ceil() as usize;
    let min_rows = (h / (eh * (1.0 + TOLERANCE))).floor() as usize;
    let max_rows = (h / (eh * (1.0 - TOLERANCE))).ceil() as usize;

    let in_range = |frame: f64, est: f64| {
        frame >= est * (1.0 - TOLERANCE) && frame <= est * (1.0 + TOLERANCE)
    };

    let mut best: Option<(usize, usize, f64)> = None;
    for cols in min_cols.max(1)..=max_cols {
        if width % cols != 0 || !in_range(w / cols as f64, ew) {
            continue;
        }

        for rows in min_rows.max(1)..=max_rows {
            if height % rows != 0 || !in_range(h / rows as f64, eh) {
                continue;
            }

            let err =
                ((w / cols as f64 - ew) / ew).powi(2) + ((h / rows as f64 - eh) / eh).powi(2);
            if best.is_none_or(|(_, _, e)| err < e) {
                best = Some((cols, rows, err));
            }
        }
    }

    let (cols, rows, _) = best.ok_or(Error::NoGridFit)?;
    Ok(SpriteGridInfo {
        frame_width: width / cols,
        frame_height: height / rows,
        cols,
        rows,
        total_frames: cols * rows,
        source: GridSource::EstimateFit,
    })
}

#[cfg(test)]
mod tests {
    use sc_core::Error;

    use super::fit_grid_to_estimate;

    #[test]
    fn picks_closest_exact_grid() {
        let grid = fit_grid_to_estimate(512, 256, 60, 130).expect("fit");
        assert_eq!((grid.cols, grid.rows), (8, 2));
        assert_eq!((grid.frame_width, grid.frame_height), (64, 128));
        assert_eq!(grid.total_frames, 16);
    }

    #[test]
    fn uneven_sizes_have_no_fit() {
        assert_eq!(
            fit_grid_to_estimate(101, 101, 50, 50).unwrap_err(),
            Error::NoGridFit
        );
    }

    #[test]
    fn zero_inputs_are_invalid() {
        assert!(matches!(
            fit_grid_to_estimate(100, 0, 10, 10),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            fit_grid_to_estimate(100, 100, 0, 10),
            Err(Error::InvalidParameter(_))
        ));
    }
}
