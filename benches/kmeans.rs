use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kquant::{
    kmeans::ClusterEngine,
    ColorSlice, PaletteSize,
};
use palette::Srgb;
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;

const ITERATIONS: u32 = 10;

fn synthetic_image(width: u32, height: u32) -> Vec<Srgb<u8>> {
    (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Srgb::new((x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8)
            })
        })
        .collect()
}

fn kmeans_train(c: &mut Criterion) {
    let pixels = synthetic_image(512, 512);
    let colors = ColorSlice::try_from(pixels.as_slice()).unwrap();

    let mut group = c.benchmark_group("kmeans_train");
    for k in [PaletteSize::MAX, 128.into(), 64.into(), 32.into(), 16.into()] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| {
                let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
                let mut engine = ClusterEngine::with_random_centroids(colors, k, rng).unwrap();
                engine.train(ITERATIONS);
                engine.render()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, kmeans_train);
criterion_main!(benches);
