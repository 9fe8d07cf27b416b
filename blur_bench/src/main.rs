// THEORY:
// `blur_bench` times the blur engine across grid granularities. It decodes one
// image, blurs a fresh copy of it once per experiment, prints the wall-clock
// time of each run and saves the last blurred result.

mod cli;
mod experiments;

use std::env;

use anyhow::{Context, bail};
use flexi_logger::Logger;
use log::{info, warn};
use section_blur::{AsyncBlurEngine, BlurConfig, load_image, save_image};

use crate::cli::parse_args;
use crate::experiments::{report_line, standard_experiments};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Logging & Argument Parsing ---
    let _logger = Logger::try_with_env_or_str("info")?
        .log_to_stderr()
        .start()?;
    let args = parse_args(env::args().skip(1))?;

    // --- 2. Decode Input ---
    let source = load_image(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let (interior_width, interior_height) = source.interior_dims();
    info!(
        "loaded {}x{} image, interior {interior_width}x{interior_height}, max concurrency {}",
        source.width(),
        source.height(),
        args.max_concurrency
    );
    if interior_width == 0 || interior_height == 0 {
        bail!("{} is too small to blur", args.input.display());
    }

    // --- 3. Run Experiments ---
    // Each experiment blurs its own copy of the source.
    let mut last_result = None;
    for experiment in standard_experiments(interior_width, interior_height) {
        if !experiment.fits(interior_width, interior_height) {
            warn!(
                "skipping {}: a {}x{} grid does not fit the interior",
                experiment.name, experiment.columns, experiment.rows
            );
            continue;
        }

        let engine = AsyncBlurEngine::new(BlurConfig {
            columns: experiment.columns,
            rows: experiment.rows,
            max_concurrency: args.max_concurrency,
        })?;
        let outcome = engine
            .blur(source.duplicate()?)
            .await
            .with_context(|| format!("experiment {} failed", experiment.name))?;
        println!("{}", report_line(&experiment.name, outcome.elapsed));
        last_result = Some(outcome.image);
    }

    // --- 4. Save One Result ---
    if let Some(image) = last_result {
        save_image(&image, &args.output)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!("blurred output saved to {}", args.output.display());
    }
    Ok(())
}
