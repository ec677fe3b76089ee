//! Contains the [`ImagePipeline`] builder struct for the high level API.

use crate::{kmeans::ClusterEngine, ClusterError, ColorSlice, PaletteSize};

use palette::Srgb;
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;

#[cfg(feature = "image")]
use {crate::AboveMaxLen, image::RgbImage, palette::cast::IntoComponents};

/// A builder struct to specify options for quantizing an image with k-means.
///
/// # Examples
/// To start, create an [`ImagePipeline`] from an [`RgbImage`]
/// (note that the `image` feature is needed):
/// ```no_run
/// # use kquant::ImagePipeline;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let mut pipeline = ImagePipeline::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change different options like the number of output colors:
/// ```
/// # use kquant::{ImagePipeline, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// # let srgb = vec![Srgb::new(0, 0, 0)];
/// # let mut pipeline = ImagePipeline::new(srgb.as_slice().try_into()?, 1, 1).unwrap();
/// let pipeline = pipeline
///     .palette_size(32u8)
///     .iterations(20)
///     .seed(42);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```no_run
/// # use kquant::{ImagePipeline, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let srgb = vec![Srgb::new(0, 0, 0)];
/// # let pipeline = ImagePipeline::new(srgb.as_slice().try_into()?, 1, 1).unwrap();
/// let image = pipeline.quantized_rgbimage()?;
/// # Ok(())
/// # }
/// ```
///
/// Instead of an [`RgbImage`] you can also get an indexed image
/// (a palette and a list of indices into the palette):
/// ```no_run
/// # use kquant::{ImagePipeline, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let srgb = vec![Srgb::new(0, 0, 0)];
/// # let pipeline = ImagePipeline::new(srgb.as_slice().try_into()?, 1, 1).unwrap();
/// let (palette, indices) = pipeline.indexed_palette()?;
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct ImagePipeline<'a> {
    /// The input image as a flat slice of pixels.
    colors: ColorSlice<'a, Srgb<u8>>,
    /// The dimensions of the image.
    dimensions: (u32, u32),
    /// The number of colors in the quantized output.
    k: PaletteSize,
    /// The number of k-means training iterations to run.
    iterations: u32,
    /// The seed value for the random number generator.
    seed: u64,
}

impl<'a> ImagePipeline<'a> {
    /// The default number of training iterations.
    pub const DEFAULT_ITERATIONS: u32 = 10;

    /// Creates a new [`ImagePipeline`] with default options.
    /// Returns `None` if the length of `colors` is not equal to `width * height`.
    #[must_use]
    pub fn new(colors: ColorSlice<'a, Srgb<u8>>, width: u32, height: u32) -> Option<Self> {
        if colors.len() == width as usize * height as usize {
            Some(Self {
                colors,
                dimensions: (width, height),
                k: PaletteSize::default(),
                iterations: Self::DEFAULT_ITERATIONS,
                seed: 0,
            })
        } else {
            None
        }
    }

    /// Sets the palette size which determines the number of colors to have in the output.
    ///
    /// The default palette size is [`PaletteSize::DEFAULT`].
    pub fn palette_size(&mut self, size: impl Into<PaletteSize>) -> &mut Self {
        self.k = size.into();
        self
    }

    /// Sets the number of training iterations to run.
    ///
    /// More iterations give more accurate clusters with diminishing returns.
    /// There is no convergence check; exactly this many rounds are run.
    ///
    /// The default value is [`ImagePipeline::DEFAULT_ITERATIONS`].
    pub fn iterations(&mut self, iterations: u32) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Sets the seed value for the random number generator used to pick
    /// the initial centroids.
    ///
    /// The same seed over the same image gives reproducible output.
    ///
    /// The default seed is `0`.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Constructs and trains the clustering engine specified by the current options.
    fn trained_engine(&self) -> Result<ClusterEngine<'a>, ClusterError> {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(self.seed);
        let mut engine = ClusterEngine::with_random_centroids(self.colors, self.k, rng)?;
        engine.train(self.iterations);
        Ok(engine)
    }

    /// Runs the pipeline and returns the computed color palette.
    ///
    /// # Errors
    /// Returns an error if the image is empty or the palette size is zero or
    /// greater than the number of pixels.
    pub fn palette(&self) -> Result<Vec<Srgb<u8>>, ClusterError> {
        Ok(self.trained_engine()?.palette())
    }

    /// Runs the pipeline and returns the quantized image as a palette and a
    /// list of indices into it, one per pixel.
    ///
    /// # Errors
    /// Returns an error if the image is empty or the palette size is zero or
    /// greater than the number of pixels.
    pub fn indexed_palette(&self) -> Result<(Vec<Srgb<u8>>, Vec<u8>), ClusterError> {
        let engine = self.trained_engine()?;
        let palette = engine.palette();
        let indices = engine.labels().to_vec();
        Ok((palette, indices))
    }

    /// Runs the pipeline and returns the quantized pixels in a new buffer,
    /// in the same order as the input.
    ///
    /// # Errors
    /// Returns an error if the image is empty or the palette size is zero or
    /// greater than the number of pixels.
    pub fn quantized_pixels(&self) -> Result<Vec<Srgb<u8>>, ClusterError> {
        Ok(self.trained_engine()?.render())
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for ImagePipeline<'a> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        let colors = image.try_into()?;

        #[allow(clippy::expect_used)]
        {
            // an RgbImage's buffer length always matches its dimensions
            Ok(Self::new(colors, image.width(), image.height()).expect("matching dimensions"))
        }
    }
}

#[cfg(feature = "image")]
impl<'a> ImagePipeline<'a> {
    /// Runs the pipeline and returns the quantized image.
    ///
    /// # Errors
    /// Returns an error if the image is empty or the palette size is zero or
    /// greater than the number of pixels.
    pub fn quantized_rgbimage(&self) -> Result<RgbImage, ClusterError> {
        let (width, height) = self.dimensions;
        let buf = self.quantized_pixels()?.into_components();

        #[allow(clippy::expect_used)]
        {
            // the rendered buffer has one pixel per input pixel,
            // so it is large enough by nature of its construction
            Ok(RgbImage::from_vec(width, height, buf).expect("large enough buffer"))
        }
    }
}
