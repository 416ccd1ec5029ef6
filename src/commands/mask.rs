use std::path::PathBuf;
use std::process::ExitCode;

use blindcmp_lib::raster::{encode_png, read_image_bytes};
use blindcmp_lib::{mask_bytes, BlindcmpOutput, CompareError, MaskOutput, BLINDCMP_OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_regions;

/// Run the mask command.
pub fn run_mask(
    image: PathBuf,
    regions: Option<PathBuf>,
    out: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let layers = match load_regions(regions.as_deref()) {
        Ok(layers) => layers,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let regions = layers.to_region_set().to_vec();

    let masked = read_image_bytes(&image)
        .and_then(|bytes| mask_bytes(&bytes, &regions))
        .and_then(|img| encode_png(&img));
    let png = match masked {
        Ok(png) => png,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if let Err(err) = std::fs::write(&out, png) {
        return render_error(CompareError::Io(err), format, output.clone());
    }
    tracing::debug!(path = %out.display(), "wrote masked screenshot");

    let body = BlindcmpOutput::Mask(MaskOutput {
        version: BLINDCMP_OUTPUT_VERSION.to_string(),
        image,
        output_path: out,
        blind_regions: regions.len(),
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(CompareError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
