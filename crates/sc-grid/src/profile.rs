use sc_core::PixelBuffer;

/// Per-column and per-row counts of pixels whose alpha exceeds a threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisProfile {
    pub cols: Vec<usize>,
    pub rows: Vec<usize>,
}

impl AxisProfile {
    pub fn from_pixels(pixels: &PixelBuffer<'_>, alpha_threshold: u8) -> Self {
        let mut cols = vec![0usize; pixels.width()];
        let mut rows = vec![0usize; pixels.height()];

        for (row_count, row) in rows.iter_mut().zip(pixels.rows()) {
            for (x, px) in row.iter().enumerate() {
                if px[3] > alpha_threshold {
                    cols[x] += 1;
                    *row_count += 1;
                }
            }
        }

        Self { cols, rows }
    }
}

/// Finds low-mass positions along one axis.
///
/// A position is a divider candidate when its count is below
/// `ratio * mean`. Candidates closer than `max(5, len * 0.05)` to the previous
/// member of their run collapse to the run's rounded centroid.
pub fn find_dividers(counts: &[usize], ratio: f32) -> Vec<usize> {
    if counts.is_empty() {
        return Vec::new();
    }

    let mean = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
    let threshold = mean * ratio;
    let merge_gap = (counts.len() as f32 * 0.05).max(5.0);

    let mut merged = Vec::new();
    let mut group: Vec<usize> = Vec::new();
    for (pos, _) in counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| (c as f32) < threshold)
    {
        match group.last() {
            Some(&last) if (pos - last) as f32 >= merge_gap => {
                merged.push(centroid(&group));
                group.clear();
                group.push(pos);
            }
            _ => group.push(pos),
        }
    }
    if !group.is_empty() {
        merged.push(centroid(&group));
    }

    merged
}

fn centroid(group: &[usize]) -> usize {
    let sum: usize = group.iter().sum();
    (sum as f64 / group.len() as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use sc_core::rgba_view;

    use super::{AxisProfile, find_dividers};

    #[test]
    fn profile_counts_strictly_above_threshold() {
        // 3x2, alpha values: [0, 128, 129] / [255, 0, 200]
        let mut bytes = vec![0u8; 3 * 2 * 4];
        for (i, a) in [0u8, 128, 129, 255, 0, 200].into_iter().enumerate() {
            bytes[i * 4 + 3] = a;
        }
        let view = rgba_view(3, 2, &bytes).expect("valid buffer");
        let p = AxisProfile::from_pixels(&view, 128);

        assert_eq!(p.cols, vec![1, 0, 2]);
        assert_eq!(p.rows, vec![1, 2]);
    }

    #[test]
    fn gutter_runs_merge_to_centroids() {
        let counts: Vec<usize> = (0..320)
            .map(|x| if x % 80 >= 78 { 0 } else { 100 })
            .collect();

        assert_eq!(find_dividers(&counts, 0.2), vec![79, 159, 239, 319]);
    }

    #[test]
    fn uniform_axis_has_no_dividers() {
        assert!(find_dividers(&[60; 90], 0.2).is_empty());
        assert!(find_dividers(&[0; 16], 0.2).is_empty());
        assert!(find_dividers(&[], 0.2).is_empty());
    }

    #[test]
    fn distant_candidates_stay_separate() {
        let mut counts = vec![50usize; 100];
        counts[10] = 0;
        counts[12] = 0;
        counts[40] = 0;

        assert_eq!(find_dividers(&counts, 0.2), vec![11, 40]);
    }
}
