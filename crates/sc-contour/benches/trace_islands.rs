use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sc_contour::{IslandPolicy, select_contour, trace_islands};
use sc_core::Image;
use sc_morph::edge_mask;

fn blob_mask(width: usize, height: usize) -> Image<u8> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let r = width.min(height) as f32 * 0.4;

    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let rim = r * (1.0 + 0.15 * (dy.atan2(dx) * 5.0).sin());
            if dx * dx + dy * dy <= rim * rim {
                data[y * width + x] = 255;
            }
        }
    }

    Image::from_vec(width, height, data).expect("valid image")
}

fn bench_trace(c: &mut Criterion) {
    let mask = blob_mask(256, 256);
    let edge = edge_mask(&mask.as_view()).expect("blob has opaque pixels");

    c.bench_function("sc_contour_trace_islands_256", |b| {
        b.iter(|| {
            let islands = trace_islands(black_box(&edge.edges.as_view()));
            black_box(select_contour(islands, IslandPolicy::Largest));
        });
    });
}

criterion_group!(benches, bench_trace);
criterion_main!(benches);
