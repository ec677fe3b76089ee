#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::Parser;
use kquant::{ImagePipeline, PaletteSize};

#[derive(Parser)]
#[command(version, about = "Reduce an image to K colors using k-means clustering.")]
struct Options {
    /// Path of the image to quantize.
    input: PathBuf,

    /// Path to write the quantized image to.
    output: PathBuf,

    /// Number of colors in the output image (1-256).
    #[arg(default_value_t = PaletteSize::default(), value_parser = parse_palette_size)]
    colors: PaletteSize,

    /// Number of k-means training iterations to run.
    #[arg(long, default_value_t = ImagePipeline::DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Seed for the random selection of the initial cluster colors.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print timing information.
    #[arg(long)]
    verbose: bool,
}

fn parse_palette_size(s: &str) -> Result<PaletteSize, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn main() -> ExitCode {
    match run(Options::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options) -> Result<(), Box<dyn Error>> {
    let Options { input, output, colors, iterations, seed, verbose } = options;

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                println!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    let image = log!("read image", image::open(input)?).into_rgb8();

    let mut pipeline = ImagePipeline::try_from(&image)?;
    pipeline.palette_size(colors).iterations(iterations).seed(seed);

    let quantized = log!("quantization", pipeline.quantized_rgbimage()?);

    log!("write image", quantized.save(output)?);

    Ok(())
}
