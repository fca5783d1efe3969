use sc_core::{Error, PixelBuffer, Rect, Result};
use serde::{Deserialize, Serialize};

use crate::divisor::{divisors, gcd};
use crate::estimate::fit_grid_to_estimate;
use crate::profile::{AxisProfile, find_dividers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStrategy {
    Dividers,
    EstimateFit,
    Divisors,
}

/// Which step produced a [`SpriteGridInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSource {
    Explicit,
    Dividers,
    EstimateFit,
    Divisors,
    SingleFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteGridInfo {
    pub frame_width: usize,
    pub frame_height: usize,
    pub cols: usize,
    pub rows: usize,
    pub total_frames: usize,
    pub source: GridSource,
}

impl SpriteGridInfo {
    pub fn single_frame(width: usize, height: usize) -> Self {
        Self {
            frame_width: width,
            frame_height: height,
            cols: 1,
            rows: 1,
            total_frames: 1,
            source: GridSource::SingleFrame,
        }
    }

    /// Grid of `frame_width x frame_height` frames tiling `width x height`
    /// from the top-left corner. Partial trailing frames are not counted.
    pub fn from_frame_size(
        width: usize,
        height: usize,
        frame_width: usize,
        frame_height: usize,
        source: GridSource,
    ) -> Self {
        let frame_width = frame_width.clamp(1, width.max(1));
        let frame_height = frame_height.clamp(1, height.max(1));
        let cols = (width / frame_width).max(1);
        let rows = (height / frame_height).max(1);
        Self {
            frame_width,
            frame_height,
            cols,
            rows,
            total_frames: cols * rows,
            source,
        }
    }

    pub fn is_single_frame(&self) -> bool {
        self.total_frames <= 1
    }

    /// Pixel rectangle of frame `index` (row-major), clipped to the image.
    pub fn frame_rect(&self, index: usize, width: usize, height: usize) -> Option<Rect> {
        if index >= self.total_frames {
            return None;
        }

        let x = (index % self.cols) * self.frame_width;
        let y = (index / self.cols) * self.frame_height;
        if x >= width || y >= height {
            return None;
        }

        Some(Rect {
            x,
            y,
            width: self.frame_width.min(width - x),
            height: self.frame_height.min(height - y),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridDetectConfig {
    /// Pixels with alpha strictly above this count toward the projections.
    pub alpha_threshold: u8,
    /// Fraction of the axis mean below which a row/column is a divider.
    pub divider_ratio: f32,
    pub max_frames: usize,
    pub min_frame_size: usize,
    /// Caller's guess of the frame size, `(width, height)`.
    pub estimate: Option<(usize, usize)>,
    pub strategies: Vec<GridStrategy>,
}

impl Default for GridDetectConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 128,
            divider_ratio: 0.2,
            max_frames: 30,
            min_frame_size: 10,
            estimate: None,
            strategies: vec![GridStrategy::Dividers, GridStrategy::Divisors],
        }
    }
}

pub fn detect_grid(pixels: &PixelBuffer<'_>, cfg: &GridDetectConfig) -> Result<SpriteGridInfo> {
    let (width, height) = (pixels.width(), pixels.height());
    if width == 0 || height == 0 {
        return Err(Error::insufficient(format!(
            "cannot detect a grid on a {width}x{height} image"
        )));
    }

    let mut profile = None;
    for &strategy in &cfg.strategies {
        let found = match strategy {
            GridStrategy::Dividers => {
                let profile = profile
                    .get_or_insert_with(|| AxisProfile::from_pixels(pixels, cfg.alpha_threshold));
                divider_grid(profile, cfg)
            }
            GridStrategy::EstimateFit => cfg
                .estimate
                .and_then(|(ew, eh)| fit_grid_to_estimate(width, height, ew, eh).ok()),
            GridStrategy::Divisors => divisor_grid(
                width,
                height,
                cfg.estimate,
                cfg.max_frames,
                cfg.min_frame_size,
            ),
        };

        if let Some(grid) = found {
            tracing::debug!(
                ?strategy,
                frame_width = grid.frame_width,
                frame_height = grid.frame_height,
                total_frames = grid.total_frames,
                "sprite grid detected"
            );
            return Ok(grid);
        }
        tracing::debug!(?strategy, "grid strategy produced no candidate");
    }

    Ok(SpriteGridInfo::single_frame(width, height))
}

/// Frame size from transparent divider bands. Succeeds when at least one
/// axis has two or more dividers; an axis without them is a single frame.
/// When the bands fit only one frame, that frame is the whole image.
pub fn divider_grid(profile: &AxisProfile, cfg: &GridDetectConfig) -> Option<SpriteGridInfo> {
    let (width, height) = (profile.cols.len(), profile.rows.len());
    let col_dividers = find_dividers(&profile.cols, cfg.divider_ratio);
    let row_dividers = find_dividers(&profile.rows, cfg.divider_ratio);
    if col_dividers.len() < 2 && row_dividers.len() < 2 {
        return None;
    }

    let frame_width = mean_gap(&col_dividers, width, cfg.min_frame_size);
    let frame_height = mean_gap(&row_dividers, height, cfg.min_frame_size);
    let grid = SpriteGridInfo::from_frame_size(
        width,
        height,
        frame_width,
        frame_height,
        GridSource::Dividers,
    );

    // Margins around a lone sprite: keep the whole image as its frame.
    if grid.is_single_frame() {
        return Some(SpriteGridInfo::from_frame_size(
            width,
            height,
            width,
            height,
            GridSource::Dividers,
        ));
    }
    Some(grid)
}

fn mean_gap(dividers: &[usize], axis_len: usize, min_frame_size: usize) -> usize {
    let [first, .., last] = dividers else {
        return axis_len;
    };

    // Consecutive gaps telescope to `last - first`.
    let gap = ((last - first) as f64 / (dividers.len() - 1) as f64).round() as usize;
    gap.max(min_frame_size).min(axis_len)
}

/// Square tiles whose edge divides `gcd(width, height)`.
///
/// With an estimate, the edge closest to the mean of the estimate wins;
/// without one, the edge giving the most frames wins. Either way the frame
/// count must stay within `max_frames`, and ties keep the smaller edge.
pub fn divisor_grid(
    width: usize,
    height: usize,
    estimate: Option<(usize, usize)>,
    max_frames: usize,
    min_frame_size: usize,
) -> Option<SpriteGridInfo> {
    let target = estimate.map(|(ew, eh)| (ew + eh) as f64 / 2.0);

    let mut best: Option<(usize, f64)> = None;
    for size in divisors(gcd(width, height)) {
        if size < min_frame_size {
            continue;
        }

        let frames = (width / size) * (height / size);
        if frames > max_frames {
            continue;
        }

        // Lower score is better.
        let score = match target {
            Some(t) => (size as f64 - t).powi(2),
            None => -(frames as f64),
        };
        if best.is_none_or(|(_, s)| score < s) {
            best = Some((size, score));
        }
    }

    best.map(|(size, _)| {
        SpriteGridInfo::from_frame_size(width, height, size, size, GridSource::Divisors)
    })
}

/// Zero-copy view of frame `index` of `grid`.
pub fn crop_frame<'a>(
    pixels: &PixelBuffer<'a>,
    grid: &SpriteGridInfo,
    index: usize,
) -> Result<PixelBuffer<'a>> {
    let rect = grid
        .frame_rect(index, pixels.width(), pixels.height())
        .ok_or(Error::OutOfBounds)?;
    pixels.subview(rect)
}

#[cfg(test)]
mod tests {
    use sc_core::{Error, Rect, rgba_view};

    use super::{
        GridDetectConfig, GridSource, GridStrategy, SpriteGridInfo, crop_frame, detect_grid,
        divisor_grid,
    };

    fn rgba(width: usize, height: usize, opaque: impl Fn(usize, usize) -> bool) -> Vec<u8> {
        let mut bytes = vec![0u8; width * height * 4];
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    bytes[(y * width + x) * 4..][..4].copy_from_slice(&[200, 80, 40, 255]);
                }
            }
        }
        bytes
    }

    #[test]
    fn gutters_give_four_frames_in_one_row() {
        let bytes = rgba(320, 128, |x, _| x % 80 < 78);
        let view = rgba_view(320, 128, &bytes).expect("valid buffer");

        let grid = detect_grid(&view, &GridDetectConfig::default()).expect("grid");
        assert_eq!(grid.frame_width, 80);
        assert_eq!(grid.frame_height, 128);
        assert_eq!(grid.cols, 4);
        assert_eq!(grid.rows, 1);
        assert_eq!(grid.total_frames, 4);
        assert_eq!(grid.source, GridSource::Dividers);
    }

    #[test]
    fn lone_sprite_margins_keep_full_frame() {
        let disk = |x: usize, y: usize| {
            let (dx, dy) = (x as i64 - 50, y as i64 - 50);
            dx * dx + dy * dy <= 900
        };
        let bytes = rgba(100, 100, disk);
        let view = rgba_view(100, 100, &bytes).expect("valid buffer");

        let grid = detect_grid(&view, &GridDetectConfig::default()).expect("grid");
        assert_eq!((grid.frame_width, grid.frame_height), (100, 100));
        assert_eq!(grid.total_frames, 1);
        assert_eq!(grid.source, GridSource::Dividers);
    }

    #[test]
    fn solid_image_falls_back_to_divisors() {
        let bytes = rgba(90, 60, |_, _| true);
        let view = rgba_view(90, 60, &bytes).expect("valid buffer");

        let grid = detect_grid(&view, &GridDetectConfig::default()).expect("grid");
        assert_eq!(grid.frame_width, 15);
        assert_eq!(grid.frame_height, 15);
        assert_eq!(grid.cols, 6);
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.total_frames, 24);
        assert_eq!(grid.source, GridSource::Divisors);
    }

    #[test]
    fn divisor_search_prefers_estimate() {
        // Divisors of 30 usable here: 10, 15, 30.
        let grid = divisor_grid(90, 60, Some((32, 28)), 30, 10).expect("candidate");
        assert_eq!(grid.frame_width, 30);
        assert_eq!(grid.total_frames, 6);

        let grid = divisor_grid(90, 60, Some((12, 12)), 60, 10).expect("candidate");
        assert_eq!(grid.frame_width, 10);
        assert_eq!(grid.total_frames, 54);
    }

    #[test]
    fn divisor_search_fails_when_cap_unreachable() {
        assert!(divisor_grid(90, 60, None, 5, 10).is_none());
        // gcd 1: only a 1px tile, below the minimum frame size.
        assert!(divisor_grid(97, 61, None, 30, 10).is_none());
    }

    #[test]
    fn no_strategy_means_single_frame() {
        let bytes = rgba(97, 61, |_, _| true);
        let view = rgba_view(97, 61, &bytes).expect("valid buffer");

        let grid = detect_grid(&view, &GridDetectConfig::default()).expect("grid");
        assert_eq!(grid, SpriteGridInfo::single_frame(97, 61));
        assert!(grid.is_single_frame());

        let cfg = GridDetectConfig {
            strategies: Vec::new(),
            ..GridDetectConfig::default()
        };
        let bytes = rgba(90, 60, |_, _| true);
        let view = rgba_view(90, 60, &bytes).expect("valid buffer");
        assert_eq!(
            detect_grid(&view, &cfg).expect("grid").source,
            GridSource::SingleFrame
        );
    }

    #[test]
    fn estimate_fit_runs_when_listed() {
        let bytes = rgba(96, 40, |_, _| true);
        let view = rgba_view(96, 40, &bytes).expect("valid buffer");
        let cfg = GridDetectConfig {
            estimate: Some((25, 38)),
            strategies: vec![GridStrategy::EstimateFit, GridStrategy::Divisors],
            ..GridDetectConfig::default()
        };

        let grid = detect_grid(&view, &cfg).expect("grid");
        assert_eq!(grid.source, GridSource::EstimateFit);
        assert_eq!((grid.frame_width, grid.frame_height), (24, 40));
        assert_eq!((grid.cols, grid.rows), (4, 1));
    }

    #[test]
    fn frame_crop_is_clipped_view() {
        let bytes = rgba(50, 20, |x, _| x >= 20);
        let view = rgba_view(50, 20, &bytes).expect("valid buffer");
        let grid = SpriteGridInfo::from_frame_size(50, 20, 20, 20, GridSource::Explicit);
        assert_eq!(grid.total_frames, 2);

        let second = crop_frame(&view, &grid, 1).expect("frame 1");
        assert_eq!((second.width(), second.height()), (20, 20));
        assert_eq!(second.get(0, 0).map(|p| p[3]), Some(255));
        assert_eq!(
            grid.frame_rect(1, 50, 20),
            Some(Rect {
                x: 20,
                y: 0,
                width: 20,
                height: 20
            })
        );
        assert_eq!(crop_frame(&view, &grid, 2).unwrap_err(), Error::OutOfBounds);
    }

    #[test]
    fn zero_sized_input_is_rejected() {
        let empty: [[u8; 4]; 0] = [];
        let view = sc_core::ImageView::from_slice(0, 0, 0, &empty).expect("empty view");
        assert!(matches!(
            detect_grid(&view, &GridDetectConfig::default()),
            Err(Error::InsufficientData(_))
        ));
    }
}
