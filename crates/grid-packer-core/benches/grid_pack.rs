use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use grid_packer_core::prelude::*;
use image::{Rgba, RgbaImage};

fn generate_tiles(count: usize, size: u32) -> Vec<SourceImage> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let px = Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255]);
            SourceImage::new(format!("tile_{}", i), RgbaImage::from_pixel(size, size, px))
        })
        .collect()
}

fn bench_grid_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_pack");

    for (element, atlas) in [(64u32, 512u32), (128, 1024), (256, 2048)] {
        let spec = AtlasSpec::new(element, atlas, "bench.png");
        let tiles = generate_tiles(spec.capacity(), element);
        group.throughput(Throughput::Elements(tiles.len() as u64));

        // quarter-turn per tile
        group.bench_with_input(BenchmarkId::new("atlas", atlas), &tiles, |b, tiles| {
            b.iter(|| black_box(pack_grid(tiles, &spec)))
        });

        // same cells without rotation
        let frames = generate_tiles(16, atlas / 4);
        let anim = AnimSpec::new(16, "frames", "sheet.png");
        group.bench_with_input(BenchmarkId::new("sheet", atlas), &frames, |b, frames| {
            b.iter(|| black_box(assemble_frames(frames, &anim)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_pack);
criterion_main!(benches);
