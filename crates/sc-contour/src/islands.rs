use sc_core::ImageView;
use serde::{Deserialize, Serialize};

use crate::{Contour, trace_moore};

const NEIGHBORS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Which island feeds a single body when an edge mask has several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IslandPolicy {
    /// The island with the most boundary points.
    #[default]
    Largest,
    /// The first island in raster order.
    First,
    /// All islands concatenated in discovery order.
    Merge,
}

/// Traces every 8-connected island of set pixels once, in raster order of
/// each island's top-left-most pixel.
pub fn trace_islands(edge: &ImageView<'_, u8>) -> Vec<Contour> {
    let (w, h) = (edge.width(), edge.height());
    let mut claimed = vec![false; w * h];
    let mut stack = Vec::new();
    let mut out = Vec::new();

    for y in 0..h {
        for (x, &v) in edge.row(y).iter().enumerate() {
            if v == 0 || claimed[y * w + x] {
                continue;
            }
            out.push(trace_moore(edge, (x, y)));
            claim_island(edge, (x, y), &mut claimed, &mut stack);
        }
    }

    tracing::debug!(islands = out.len(), "traced edge islands");
    out
}

/// Marks the whole 8-connected island containing `seed`.
fn claim_island(
    edge: &ImageView<'_, u8>,
    seed: (usize, usize),
    claimed: &mut [bool],
    stack: &mut Vec<(usize, usize)>,
) {
    let w = edge.width();
    claimed[seed.1 * w + seed.0] = true;
    stack.clear();
    stack.push(seed);

    while let Some((x, y)) = stack.pop() {
        for (dx, dy) in NEIGHBORS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
            else {
                continue;
            };
            if edge.get(nx, ny).is_some_and(|&v| v != 0) && !claimed[ny * w + nx] {
                claimed[ny * w + nx] = true;
                stack.push((nx, ny));
            }
        }
    }
}

/// Reduces traced islands to one contour. `None` when there are no islands.
pub fn select_contour(contours: Vec<Contour>, policy: IslandPolicy) -> Option<Contour> {
    match policy {
        IslandPolicy::First => contours.into_iter().next(),
        IslandPolicy::Largest => contours.into_iter().rev().max_by_key(|c| c.len()),
        IslandPolicy::Merge => {
            let mut iter = contours.into_iter();
            let mut merged = iter.next()?;
            for c in iter {
                merged.closed &= c.closed;
                merged.points.extend(c.points);
            }
            Some(merged)
        }
    }
}
