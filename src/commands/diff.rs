use std::path::PathBuf;
use std::process::ExitCode;

use blindcmp_lib::raster::{decode, encode_png, read_image_bytes};
use blindcmp_lib::{
    xor_image, BlindcmpOutput, CompareError, DiffEngine, DiffReport, BLINDCMP_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{format_effective_config, load_config, load_regions};

/// Run the diff command.
#[allow(clippy::too_many_arguments)]
pub fn run_diff(
    config_path: Option<PathBuf>,
    verbose: bool,
    baseline: PathBuf,
    candidate: PathBuf,
    regions: Option<PathBuf>,
    diff_out: Option<PathBuf>,
    xor: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if verbose {
        eprintln!("{}", format_effective_config(&config, config_path.as_deref()));
    }
    let layers = match load_regions(regions.as_deref()) {
        Ok(layers) => layers,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let load = |path: &PathBuf| read_image_bytes(path).and_then(|bytes| decode(&bytes));
    let (a, b) = match load(&baseline).and_then(|a| load(&candidate).map(|b| (a, b))) {
        Ok(images) => images,
        Err(err) => return render_error(err, format, output.clone()),
    };

    // Only global regions are cleared from the change map.
    let engine = DiffEngine::new(config.overlay);
    let diff = engine.diff(&a, &b, &layers.global);

    if let Some(path) = &diff_out {
        let image = if xor {
            xor_image(&a, &b, &layers.global)
        } else {
            diff.image
        };
        let written = encode_png(&image)
            .and_then(|png| std::fs::write(path, png).map_err(CompareError::Io));
        if let Err(err) = written {
            return render_error(err, format, output.clone());
        }
    }

    let body = BlindcmpOutput::Diff(DiffReport {
        version: BLINDCMP_OUTPUT_VERSION.to_string(),
        baseline,
        candidate,
        bounding_rectangles: diff.rectangles,
        diff_image: diff_out,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(CompareError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
