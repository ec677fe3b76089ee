//! A library for lossy image color quantization using k-means clustering.
//!
//! `kquant` reduces the number of distinct colors in an image to at most `K`
//! by clustering its pixel colors and replacing every pixel with the mean
//! color of its cluster.
//!
//! # Features
//! To reduce dependencies and compile times, `kquant` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes the [`ImagePipeline`] builder struct that serves as the high-level API.
//! - `image`: enables integration with the [`image`] crate.
//! - `cli`: builds the `kquant` command line binary.
//!
//! # High-Level API
//! To get started with the high-level API, see [`ImagePipeline`].
//! It has examples in its documentation, but here is an additional one:
//! ```no_run
//! # use kquant::ImagePipeline;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgb8();
//!
//! let mut pipeline = ImagePipeline::try_from(&img)?;
//! let pipeline = pipeline
//!     .palette_size(128u8) // set the number of colors in the output
//!     .iterations(10) // run ten rounds of k-means
//!     .seed(42); // seed for the initial centroid selection
//!
//! // Run the pipeline to get an RgbImage
//! let quantized = pipeline.quantized_rgbimage()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Low-Level API
//! The [`kmeans`] module exposes the clustering engine directly for callers
//! that want to control the initial centroids or step the training loop
//! themselves.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod types;

#[cfg(feature = "pipelines")]
mod api;

pub mod kmeans;

pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of palette colors is `256`.
pub const MAX_COLORS: u16 = u8::MAX as u16 + 1;

/// `MAX_COLORS` as a `usize` for array and `Vec` lengths.
pub(crate) const MAX_K: usize = MAX_COLORS as usize;
