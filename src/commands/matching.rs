use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use blindcmp_lib::raster::read_image_bytes;
use blindcmp_lib::{
    BaselineRecord, BlindRegionHierarchy, BlindcmpOutput, CompareError, ComparisonResult,
    ContentHash, DiffEngine, MatchOutput, Matcher, NewPattern, RegionLayers, Result,
    BLINDCMP_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_match, render_error, write_output};
use crate::settings::{format_effective_config, load_config, load_regions, resolve_browser};

/// Options of the match command besides the global flags.
pub struct MatchArgs {
    pub baseline: PathBuf,
    pub candidate: PathBuf,
    pub regions: Option<PathBuf>,
    pub hash: Option<String>,
    pub browser: Option<String>,
    pub diff_out: Option<PathBuf>,
    pub always_diff: bool,
}

/// Run the match command.
pub fn run_match(
    config_path: Option<PathBuf>,
    verbose: bool,
    args: MatchArgs,
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
    let browser = resolve_browser(args.browser.clone(), &config);
    let layers = match load_regions(args.regions.as_deref()) {
        Ok(layers) => layers,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let matcher = Matcher::new(DiffEngine::new(config.overlay));
    let (expected_hash, result) = match compare(&matcher, &args, &browser, layers) {
        Ok(outcome) => outcome,
        Err(err) => return render_error(err, format, output.clone()),
    };
    tracing::debug!(
        is_match = result.is_match,
        rectangles = result.bounding_rectangles.len(),
        "match finished"
    );

    let mut diff_image = None;
    if let (Some(path), Some(png)) = (&args.diff_out, &result.diff_image) {
        if let Err(err) = std::fs::write(path, png) {
            return render_error(CompareError::Io(err), format, output.clone());
        }
        diff_image = Some(path.clone());
    }

    let is_match = result.is_match;
    let body = BlindcmpOutput::Match(MatchOutput {
        version: BLINDCMP_OUTPUT_VERSION.to_string(),
        browser,
        baseline: args.baseline,
        candidate: args.candidate,
        is_match,
        expected_hash,
        bounding_rectangles: result.bounding_rectangles,
        diff_image,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(CompareError::Config(err.to_string()), format, output);
    }
    exit_code_for_match(is_match)
}

fn compare(
    matcher: &Matcher,
    args: &MatchArgs,
    browser: &str,
    layers: RegionLayers,
) -> Result<(ContentHash, ComparisonResult)> {
    let baseline_bytes = read_image_bytes(&args.baseline)?;
    let candidate = read_image_bytes(&args.candidate)?;

    // A stored hash is trusted as computed with the given regions.
    if let Some(hash) = &args.hash {
        let regions = layers.to_region_set();
        let baseline =
            BaselineRecord::from_parts(baseline_bytes, ContentHash::from_hex(hash), regions.to_vec());
        let result = if args.always_diff {
            matcher.diff_against(&candidate, &baseline, &regions)?
        } else {
            matcher.matches(&candidate, &baseline, &regions)?
        };
        return Ok((baseline.content_hash().clone(), result));
    }

    let mut hierarchy = BlindRegionHierarchy::new();
    hierarchy.register_browser(browser);
    hierarchy.replace_global_regions(browser, layers.global)?;
    let category = hierarchy.add_category("cli");
    hierarchy.replace_category_regions(category, browser, layers.category)?;
    let pattern = hierarchy.add_pattern(NewPattern {
        category,
        screenshot_name: screenshot_name(&args.baseline),
        browser: browser.to_string(),
        image_bytes: baseline_bytes,
        local_regions: layers.local,
        created_on: unix_now(),
    })?;

    let result = if args.always_diff {
        let regions = hierarchy.resolve(&hierarchy.context_for(pattern)?)?;
        let baseline = hierarchy
            .pattern(pattern)
            .ok_or_else(|| CompareError::unresolved(format!("{pattern} not found")))?
            .baseline();
        matcher.diff_against(&candidate, baseline, &regions)?
    } else {
        matcher.compare_pattern(&hierarchy, pattern, &candidate)?
    };
    let expected = hierarchy
        .pattern(pattern)
        .map(|p| p.baseline().content_hash().clone())
        .ok_or_else(|| CompareError::unresolved(format!("{pattern} not found")))?;
    Ok((expected, result))
}

fn screenshot_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
