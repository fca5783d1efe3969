use sc_core::{ImageView, Point2f};

use crate::Contour;

const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

/// Moore-neighbor walk from `start` over the set pixels of `edge`.
///
/// The heading starts at east. Each step scans the eight neighbors in
/// direction order beginning at the current heading and moves to the first
/// set one; the heading then becomes `(found + 5) mod 8`, which turns the
/// next scan back toward the side the walk came from. The walk ends on
/// return to `start`, at an isolated pixel, or after `width * height` steps.
pub fn trace_moore(edge: &ImageView<'_, u8>, start: (usize, usize)) -> Contour {
    let max_steps = (edge.width() * edge.height()).max(1);

    let mut points = Vec::new();
    let (mut x, mut y) = start;
    let mut dir = 0_u8;
    let mut closed = false;

    for _ in 0..max_steps {
        points.push(Point2f::from_idx(x, y));

        let Some((found, nx, ny)) = (0..8_u8)
            .map(|i| (dir + i) & 7)
            .find_map(|d| set_neighbor(edge, x, y, d).map(|(nx, ny)| (d, nx, ny)))
        else {
            break;
        };

        x = nx;
        y = ny;
        dir = (found + 5) & 7;

        if (x, y) == start {
            closed = true;
            break;
        }
    }

    Contour {
        points,
        start,
        closed,
    }
}

#[inline]
fn set_neighbor(edge: &ImageView<'_, u8>, x: usize, y: usize, dir: u8) -> Option<(usize, usize)> {
    let nx = x.checked_add_signed(DX[dir as usize])?;
    let ny = y.checked_add_signed(DY[dir as usize])?;
    match edge.get(nx, ny) {
        Some(&v) if v != 0 => Some((nx, ny)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use sc_core::{Image, Point2f};

    use crate::trace_moore;

    fn mask(width: usize, height: usize, set: &[(usize, usize)]) -> Image<u8> {
        let mut data = vec![0u8; width * height];
        for &(x, y) in set {
            data[y * width + x] = 255;
        }
        Image::from_vec(width, height, data).expect("valid image")
    }

    fn ring(lo: usize, hi: usize) -> Vec<(usize, usize)> {
        let mut set = Vec::new();
        for x in lo..=hi {
            set.push((x, lo));
            set.push((x, hi));
        }
        for y in lo + 1..hi {
            set.push((lo, y));
            set.push((hi, y));
        }
        set
    }

    #[test]
    fn walks_square_ring_clockwise_on_screen() {
        let img = mask(8, 8, &ring(1, 4));
        let c = trace_moore(&img.as_view(), (1, 1));

        assert!(c.closed);
        assert_eq!(c.len(), 12);
        assert_eq!(c.points[0], Point2f::new(1.0, 1.0));
        assert_eq!(c.points[1], Point2f::new(2.0, 1.0));
        assert_eq!(c.points[3], Point2f::new(4.0, 1.0));
        assert_eq!(c.points[4], Point2f::new(4.0, 2.0));
        assert_eq!(c.points[11], Point2f::new(1.0, 2.0));
    }

    #[test]
    fn isolated_pixel_is_single_point() {
        let img = mask(5, 5, &[(2, 2)]);
        let c = trace_moore(&img.as_view(), (2, 2));

        assert_eq!(c.points, vec![Point2f::new(2.0, 2.0)]);
        assert!(!c.closed);
    }

    #[test]
    fn open_chain_is_bounded_by_step_limit() {
        // A horizontal segment: the walk bounces between its ends.
        let img = mask(4, 3, &[(0, 1), (1, 1), (2, 1)]);
        let c = trace_moore(&img.as_view(), (0, 1));

        assert!(c.len() <= 4 * 3);
        assert!(c.points.iter().all(|p| p.y == 1.0));
    }
}
