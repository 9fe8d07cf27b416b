// THEORY:
// Positional argument parsing for the bench: an input path, then an optional
// output path and an optional concurrency limit. Anything else prints the usage.

use std::path::PathBuf;

use anyhow::{Context, bail};

pub const USAGE: &str = "Usage: blur_bench <input_image_path> [output_image_path] [max_concurrency]";
pub const DEFAULT_OUTPUT: &str = "blurred_output.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub max_concurrency: usize,
}

/// Parses the arguments after the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<BenchArgs> {
    let args: Vec<String> = args.into_iter().collect();
    if args.is_empty() || args.len() > 3 {
        bail!("{USAGE}");
    }

    let max_concurrency = match args.get(2) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("max_concurrency must be a positive integer, got {raw:?}"))?,
        None => num_cpus::get(),
    };
    if max_concurrency == 0 {
        bail!("max_concurrency must be at least 1");
    }

    Ok(BenchArgs {
        input: PathBuf::from(&args[0]),
        output: PathBuf::from(args.get(1).map_or(DEFAULT_OUTPUT, String::as_str)),
        max_concurrency,
    })
}
