use std::path::{Path, PathBuf};
use std::str::FromStr;

use palette::Srgb;
use serde::Deserialize;

use crate::diff::OverlayStyle;
use crate::error::{CompareError, Result};

pub const DEFAULT_BROWSER: &str = "default";
pub const MAX_OVERLAY_STROKE: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub overlay: OverlayStyle,
    /// Browser the CLI registers region files under
    pub browser: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay: OverlayStyle::default(),
            browser: DEFAULT_BROWSER.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    overlay: FileOverlay,
    browser: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileOverlay {
    color: Option<String>,
    alpha: Option<u8>,
    stroke: Option<u32>,
}

impl Config {
    /// Load from a TOML file, the central config, or defaults.
    /// Priority: explicit path > $XDG_CONFIG_HOME/blindcmp/config.toml > defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CompareError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::central_config_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_toml_str(&content)
            .map_err(|e| CompareError::Config(format!("{} ({})", e, path.display())))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)
            .map_err(|e| CompareError::Config(format!("Failed to parse config: {e}")))?;

        let defaults = Self::default();
        let color = match file.overlay.color {
            Some(hex) => parse_hex_color(&hex)?,
            None => defaults.overlay.color,
        };
        Ok(Self {
            overlay: OverlayStyle {
                color,
                alpha: file.overlay.alpha.unwrap_or(defaults.overlay.alpha),
                stroke: file.overlay.stroke.unwrap_or(defaults.overlay.stroke),
            },
            browser: file.browser.unwrap_or(defaults.browser),
        })
    }

    pub fn central_config_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("blindcmp").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.overlay.stroke == 0 || self.overlay.stroke > MAX_OVERLAY_STROKE {
            return Err(CompareError::Config(format!(
                "overlay stroke must be between 1 and {MAX_OVERLAY_STROKE}, got {}",
                self.overlay.stroke
            )));
        }
        if self.browser.trim().is_empty() {
            return Err(CompareError::Config("browser name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Parse `#rrggbb`, `rrggbb` or `#rgb`.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3]> {
    let rgb = Srgb::<u8>::from_str(hex.trim())
        .map_err(|e| CompareError::Config(format!("Invalid overlay color '{hex}': {e}")))?;
    Ok([rgb.red, rgb.green, rgb.blue])
}
