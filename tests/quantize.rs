//! End-to-end quantization scenarios for the clustering engine and the
//! high-level pipeline.

use kquant::{
    kmeans::{Centroids, ClusterEngine},
    ClusterError, ColorSlice, ImagePipeline,
};
use palette::Srgb;

fn slice(colors: &[Srgb<u8>]) -> ColorSlice<'_, Srgb<u8>> {
    ColorSlice::try_from(colors).unwrap()
}

#[test]
fn two_colors_partition_exactly() {
    // A 2x2 image of two black and two white pixels, seeded exactly on the
    // two distinct colors. One training step must recover the two groups.
    let black = Srgb::new(0, 0, 0);
    let white = Srgb::new(255, 255, 255);
    let pixels = vec![black, black, white, white];

    let centroids = Centroids::try_from(vec![black, white]).unwrap();
    let mut engine = ClusterEngine::new(slice(&pixels), centroids).unwrap();
    engine.train_step();

    assert_eq!(engine.labels(), &[0, 0, 1, 1]);
    assert_eq!(engine.palette(), vec![black, white]);
    assert_eq!(engine.render(), pixels);
}

#[test]
fn one_cluster_per_pixel_reproduces_the_image() {
    // With K equal to the pixel count and one centroid seeded on each pixel,
    // every centroid mean collapses to a single sample and rendering must
    // reproduce the input exactly, no matter how long training runs.
    let pixels = vec![
        Srgb::new(0, 0, 0),
        Srgb::new(10, 200, 30),
        Srgb::new(128, 128, 128),
        Srgb::new(255, 0, 255),
    ];

    let centroids = Centroids::try_from(pixels.clone()).unwrap();
    let mut engine = ClusterEngine::new(slice(&pixels), centroids).unwrap();
    engine.train(25);

    assert_eq!(engine.render(), pixels);
}

#[test]
fn single_cluster_yields_the_mean_color() {
    // K = 1: all pixels collapse to the per-channel mean, rounded to u8.
    // Channel means here are (60 + 180) / 2 = 120, (0 + 255) / 2 = 127.5
    // (rounding to 128), and (30 + 40) / 2 = 35.
    let pixels = vec![Srgb::new(60, 0, 30), Srgb::new(180, 255, 40)];

    let centroids = Centroids::try_from(vec![Srgb::new(0, 0, 0)]).unwrap();
    let mut engine = ClusterEngine::new(slice(&pixels), centroids).unwrap();
    engine.train(5);

    let mean = Srgb::new(120, 128, 35);
    assert_eq!(engine.render(), vec![mean, mean]);
}

#[test]
fn identical_pixels_with_two_clusters_stay_finite() {
    // Both pixels are the same color, so one of the two clusters is starved
    // of pixels during training. The starved cluster keeps its centroid and
    // the output must still be the original color.
    let gray = Srgb::new(77, 77, 77);
    let pixels = vec![gray, gray];

    let centroids = Centroids::try_from(vec![gray, gray]).unwrap();
    let mut engine = ClusterEngine::new(slice(&pixels), centroids).unwrap();
    engine.train_step();

    assert_eq!(engine.palette(), vec![gray, gray]);
    assert_eq!(engine.render(), pixels);
}

#[test]
fn pipeline_bounds_the_output_colors() {
    let pixels: Vec<Srgb<u8>> = (0u8..=255)
        .map(|i| Srgb::new(i, i.wrapping_mul(3), i.wrapping_mul(31)))
        .collect();

    let mut pipeline = ImagePipeline::new(slice(&pixels), 16, 16).unwrap();
    pipeline.palette_size(8u8).iterations(10).seed(123);

    let (palette, indices) = pipeline.indexed_palette().unwrap();
    assert_eq!(palette.len(), 8);
    assert_eq!(indices.len(), pixels.len());
    assert!(indices.iter().all(|&i| usize::from(i) < palette.len()));

    // The rendered pixels are exactly the palette entries picked by the labels.
    let quantized = pipeline.quantized_pixels().unwrap();
    let remapped: Vec<Srgb<u8>> = indices
        .iter()
        .map(|&i| palette[usize::from(i)])
        .collect();
    assert_eq!(quantized, remapped);
}

#[test]
fn pipeline_is_reproducible_for_a_fixed_seed() {
    let pixels: Vec<Srgb<u8>> = (0u8..100)
        .map(|i| Srgb::new(i, 200u8.wrapping_sub(i), i.wrapping_mul(7)))
        .collect();

    let mut pipeline = ImagePipeline::new(slice(&pixels), 100, 1).unwrap();
    pipeline.palette_size(4u8).seed(7);

    assert_eq!(
        pipeline.quantized_pixels().unwrap(),
        pipeline.quantized_pixels().unwrap()
    );
}

#[test]
fn pipeline_rejects_more_colors_than_pixels() {
    let pixels = vec![Srgb::new(1, 2, 3), Srgb::new(4, 5, 6)];

    let mut pipeline = ImagePipeline::new(slice(&pixels), 2, 1).unwrap();
    pipeline.palette_size(16u8);

    assert_eq!(
        pipeline.palette().unwrap_err(),
        ClusterError::TooManyClusters { k: 16, pixels: 2 }
    );
}

#[test]
fn pipeline_rejects_an_empty_image() {
    let pixels: Vec<Srgb<u8>> = Vec::new();
    let pipeline = ImagePipeline::new(slice(&pixels), 0, 0).unwrap();

    assert_eq!(pipeline.palette().unwrap_err(), ClusterError::EmptyImage);
}

#[test]
fn pipeline_rejects_mismatched_dimensions() {
    let pixels = vec![Srgb::new(0, 0, 0); 3];
    assert!(ImagePipeline::new(slice(&pixels), 2, 2).is_none());
}

#[cfg(feature = "image")]
mod rgbimage {
    use super::*;
    use image::RgbImage;

    #[test]
    fn quantized_rgbimage_keeps_dimensions() {
        let image = RgbImage::from_fn(12, 8, |x, y| {
            image::Rgb([(x * 20) as u8, (y * 30) as u8, ((x + y) * 10) as u8])
        });

        let mut pipeline = ImagePipeline::try_from(&image).unwrap();
        pipeline.palette_size(4u8).seed(99);

        let quantized = pipeline.quantized_rgbimage().unwrap();
        assert_eq!(quantized.dimensions(), image.dimensions());
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let color = image::Rgb([12u8, 34, 56]);
        let image = RgbImage::from_pixel(6, 6, color);

        let mut pipeline = ImagePipeline::try_from(&image).unwrap();
        pipeline.palette_size(2u8);

        let quantized = pipeline.quantized_rgbimage().unwrap();
        assert!(quantized.pixels().all(|&p| p == color));
    }
}
