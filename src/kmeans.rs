//! Color quantization using k-means clustering.
//!
//! [`ClusterEngine`] runs the classic fixed-iteration k-means loop over the
//! colors of an image: each training step recomputes every cluster's centroid
//! as the mean color of its assigned pixels and then reassigns every pixel to
//! its nearest centroid. [`ClusterEngine::render`] replaces each pixel with
//! its centroid's color, producing an image with at most `K` distinct colors.
//!
//! The engine borrows the pixels read-only for its whole lifetime and owns the
//! mutable clustering state (centroids and per-pixel labels) exclusively.
//! All operations are single-threaded and run to completion.
//!
//! ```
//! # use kquant::{kmeans::{Centroids, ClusterEngine}, ColorSlice};
//! # use palette::Srgb;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pixels = vec![Srgb::new(0u8, 0, 0), Srgb::new(255, 255, 255)];
//! let colors = ColorSlice::try_from(pixels.as_slice())?;
//!
//! let centroids = Centroids::try_from(pixels.clone())?;
//! let mut engine = ClusterEngine::new(colors, centroids)?;
//! engine.train(10);
//! let quantized = engine.render();
//! # Ok(())
//! # }
//! ```

use crate::{AboveMaxLen, ClusterError, ColorSlice, PaletteSize, MAX_COLORS, MAX_K};

use palette::Srgb;
use rand::{prelude::Distribution, Rng};
use rand_distr::Uniform;

/// A centroid's color with floating point precision per channel,
/// in the same channel order as the source pixels.
type Centroid = [f64; 3];

/// The initial cluster centers for the k-means algorithm.
///
/// This is a new type wrapper around `Vec<Srgb<u8>>` with the invariant that
/// the length must not be greater than [`MAX_COLORS`].
/// The colors are not required to be unique;
/// duplicate centroids are permitted and are kept as-is.
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Centroids(Vec<Srgb<u8>>);

impl Centroids {
    /// Returns the inner `Vec` of colors.
    #[must_use]
    pub fn into_inner(self) -> Vec<Srgb<u8>> {
        self.0
    }

    /// Creates a [`Centroids`] by truncating the input to a max length of [`MAX_COLORS`].
    #[must_use]
    pub fn from_truncated(mut centroids: Vec<Srgb<u8>>) -> Self {
        centroids.truncate(MAX_K);
        Self(centroids)
    }

    /// Returns the number of centroids.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn num_colors(&self) -> u16 {
        self.0.len() as u16
    }

    /// Draws `k` centroids from the pixels of an image,
    /// sampling uniformly at random with replacement.
    ///
    /// Since sampling is done with replacement, the same pixel may be chosen
    /// more than once, giving duplicate centroids. The `rng` should be created
    /// once and reused across draws; a fixed seed gives reproducible results.
    ///
    /// # Errors
    /// Returns an error if the image is empty or if `k` is zero or greater
    /// than the number of pixels.
    pub fn from_random_pixels(
        colors: ColorSlice<'_, Srgb<u8>>,
        k: PaletteSize,
        rng: &mut impl Rng,
    ) -> Result<Self, ClusterError> {
        validate(colors, u16::from(k))?;
        let distribution = Uniform::new(0, colors.len());
        let centroids = (0..k.into_inner())
            .map(|_| colors[distribution.sample(rng)])
            .collect();
        Ok(Self(centroids))
    }
}

impl From<Centroids> for Vec<Srgb<u8>> {
    fn from(value: Centroids) -> Self {
        value.into_inner()
    }
}

impl TryFrom<Vec<Srgb<u8>>> for Centroids {
    type Error = AboveMaxLen<u16>;

    fn try_from(colors: Vec<Srgb<u8>>) -> Result<Self, Self::Error> {
        if colors.len() <= MAX_K {
            Ok(Self(colors))
        } else {
            Err(AboveMaxLen(MAX_COLORS))
        }
    }
}

/// Checks the engine preconditions relating the pixel count and cluster count.
fn validate(colors: ColorSlice<'_, Srgb<u8>>, k: u16) -> Result<(), ClusterError> {
    if colors.is_empty() {
        Err(ClusterError::EmptyImage)
    } else if k == 0 {
        Err(ClusterError::ZeroClusters)
    } else if u32::from(k) > colors.num_colors() {
        Err(ClusterError::TooManyClusters { k, pixels: colors.num_colors() })
    } else {
        Ok(())
    }
}

/// The k-means clustering state for the colors of one image.
///
/// Construct an engine with [`ClusterEngine::new`] (explicit initial
/// centroids) or [`ClusterEngine::with_random_centroids`]. Then call
/// [`train`](ClusterEngine::train) or step the loop manually with
/// [`train_step`](ClusterEngine::train_step), and finally produce the
/// quantized pixels with [`render`](ClusterEngine::render).
///
/// The number of centroids is fixed at construction and never changes;
/// every pixel's label is always a valid index into the centroid list.
#[derive(Debug, Clone)]
pub struct ClusterEngine<'a> {
    /// The image pixels, borrowed read-only.
    colors: ColorSlice<'a, Srgb<u8>>,
    /// One centroid per cluster; the index is the cluster label.
    centroids: Vec<Centroid>,
    /// The assigned cluster label for each pixel, in pixel order.
    labels: Vec<u8>,
}

impl<'a> ClusterEngine<'a> {
    /// Creates an engine from an image and its initial centroids,
    /// then runs one assignment pass so that the labels are consistent
    /// with the initial centroids.
    ///
    /// # Errors
    /// Returns an error if the image is empty or if the number of centroids
    /// is zero or greater than the number of pixels.
    pub fn new(
        colors: ColorSlice<'a, Srgb<u8>>,
        initial_centroids: Centroids,
    ) -> Result<Self, ClusterError> {
        validate(colors, initial_centroids.num_colors())?;

        let centroids = initial_centroids
            .into_inner()
            .into_iter()
            .map(as_centroid)
            .collect();

        let mut engine = Self {
            colors,
            centroids,
            labels: vec![0; colors.len()],
        };
        engine.assign_labels();
        Ok(engine)
    }

    /// Creates an engine with `k` initial centroids drawn uniformly at random
    /// (with replacement) from the pixels of the image.
    ///
    /// # Errors
    /// Returns an error if the image is empty or if `k` is zero or greater
    /// than the number of pixels.
    pub fn with_random_centroids(
        colors: ColorSlice<'a, Srgb<u8>>,
        k: PaletteSize,
        rng: &mut impl Rng,
    ) -> Result<Self, ClusterError> {
        let centroids = Centroids::from_random_pixels(colors, k, rng)?;
        Self::new(colors, centroids)
    }

    /// Returns the number of clusters.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn k(&self) -> u16 {
        self.centroids.len() as u16
    }

    /// Returns the assigned cluster label for each pixel, in pixel order.
    ///
    /// Every label is less than [`k`](ClusterEngine::k).
    #[must_use]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Runs `iterations` training steps.
    ///
    /// There is no convergence check; the caller decides when to stop by
    /// choosing the iteration count.
    pub fn train(&mut self, iterations: u32) {
        for _ in 0..iterations {
            self.train_step();
        }
    }

    /// Runs one training iteration: recomputes each centroid as the mean
    /// color of its currently assigned pixels, then reassigns every pixel
    /// to its nearest centroid.
    ///
    /// The order is significant: centroids are recomputed from the previous
    /// assignment before any pixel is reassigned against the new centroids.
    pub fn train_step(&mut self) {
        self.recompute_centroids();
        self.assign_labels();
    }

    /// Replaces each centroid with the per-channel mean of its assigned pixels.
    fn recompute_centroids(&mut self) {
        let k = self.centroids.len();
        let mut sums = vec![[0.0; 3]; k];
        let mut counts = vec![0u32; k];

        for (&label, &color) in self.labels.iter().zip(self.colors.as_ref()) {
            let sum = &mut sums[usize::from(label)];
            sum[0] += f64::from(color.red);
            sum[1] += f64::from(color.green);
            sum[2] += f64::from(color.blue);
            counts[usize::from(label)] += 1;
        }

        for ((centroid, sum), &count) in self.centroids.iter_mut().zip(&sums).zip(&counts) {
            // A cluster with no assigned pixels keeps its previous centroid
            // rather than dividing by zero.
            if count > 0 {
                let n = f64::from(count);
                *centroid = sum.map(|channel| channel / n);
            }
        }
    }

    /// Assigns every pixel the label of its nearest centroid.
    fn assign_labels(&mut self) {
        let Self { colors, centroids, labels } = self;
        for (label, &color) in labels.iter_mut().zip(colors.as_ref()) {
            *label = nearest_centroid(centroids, color);
        }
    }

    /// Returns the current centroid colors, rounded to the nearest `u8` per channel.
    ///
    /// The palette has exactly [`k`](ClusterEngine::k) entries and the pixel
    /// labels index into it. The colors are not guaranteed to be unique.
    #[must_use]
    pub fn palette(&self) -> Vec<Srgb<u8>> {
        self.centroids.iter().copied().map(round_srgb).collect()
    }

    /// Returns a new pixel buffer with every pixel replaced by the color of
    /// its assigned centroid.
    ///
    /// The buffer has the same length and pixel order as the input image.
    /// The input pixels are left untouched, so the caller can still compare
    /// against the original. Calling `render` twice without an intervening
    /// training step yields identical output.
    #[must_use]
    pub fn render(&self) -> Vec<Srgb<u8>> {
        let palette = self.palette();
        self.labels
            .iter()
            .map(|&label| palette[usize::from(label)])
            .collect()
    }
}

/// Converts a pixel color to a floating point centroid.
fn as_centroid(color: Srgb<u8>) -> Centroid {
    [
        f64::from(color.red),
        f64::from(color.green),
        f64::from(color.blue),
    ]
}

/// Rounds a centroid to the nearest 8-bit color, clamping each channel to `0..=255`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_srgb(centroid: Centroid) -> Srgb<u8> {
    let [r, g, b] = centroid.map(|channel| channel.round().clamp(0.0, 255.0) as u8);
    Srgb::new(r, g, b)
}

/// Returns the index of the centroid nearest to `color`.
///
/// Distances are compared squared, which preserves the Euclidean ordering.
/// Exact ties go to the lowest centroid index.
#[allow(clippy::cast_possible_truncation)]
fn nearest_centroid(centroids: &[Centroid], color: Srgb<u8>) -> u8 {
    let point = as_centroid(color);

    let mut min_index = 0;
    let mut min_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(*centroid, point);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }

    // centroids.len() <= MAX_COLORS, so the index always fits in a u8
    min_index as u8
}

/// The squared Euclidean distance between two colors in channel space.
fn squared_distance(a: Centroid, b: Centroid) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr.mul_add(dr, dg.mul_add(dg, db * db))
}
