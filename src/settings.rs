use std::path::Path;

use blindcmp_lib::{CompareError, Config, RegionLayers};
use serde_json::error::Category;

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/blindcmp/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, CompareError> {
    let cfg = Config::load(path)?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        CompareError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Browser name from the flag, falling back to config.
pub fn resolve_browser(cli_browser: Option<String>, config: &Config) -> String {
    cli_browser
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| config.browser.clone())
}

/// Read a regions file; no path means no blind regions.
pub fn load_regions(path: Option<&Path>) -> Result<RegionLayers, CompareError> {
    let Some(path) = path else {
        return Ok(RegionLayers::default());
    };
    if !path.exists() {
        return Err(CompareError::Config(format!(
            "Regions file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| match e.classify() {
        Category::Data => CompareError::invalid_region(format!("{}: {}", path.display(), e)),
        _ => CompareError::Serialization(e),
    })
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let [r, g, b] = config.overlay.color;
    format!(
        "Effective config [{source}]: overlay=#{r:02x}{g:02x}{b:02x} alpha={} stroke={}, browser={}",
        config.overlay.alpha, config.overlay.stroke, config.browser
    )
}
