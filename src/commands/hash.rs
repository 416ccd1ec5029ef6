use std::path::PathBuf;
use std::process::ExitCode;

use blindcmp_lib::raster::read_image_bytes;
use blindcmp_lib::{masked_hash, BlindcmpOutput, CompareError, HashOutput, BLINDCMP_OUTPUT_VERSION};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_regions;

/// Run the hash command.
pub fn run_hash(
    image: PathBuf,
    regions: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let layers = match load_regions(regions.as_deref()) {
        Ok(layers) => layers,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let bytes = match read_image_bytes(&image) {
        Ok(bytes) => bytes,
        Err(err) => return render_error(err, format, output.clone()),
    };

    // Every level masks the hash, in resolution order.
    let regions = layers.to_region_set().to_vec();
    let hash = match masked_hash(&bytes, &regions) {
        Ok(hash) => hash,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let body = BlindcmpOutput::Hash(HashOutput {
        version: BLINDCMP_OUTPUT_VERSION.to_string(),
        image,
        hash,
        blind_regions: regions.len(),
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(CompareError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
