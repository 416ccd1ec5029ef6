use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Invalid image data: {0}")]
    InvalidImageData(#[source] image::ImageError),

    #[error("Invalid blind region: {0}")]
    InvalidRegion(String),

    #[error("Unresolved hierarchy: {0}")]
    UnresolvedHierarchy(String),

    #[error("Stale baseline hash: {0}")]
    StaleBaseline(String),

    #[error("Cannot take the same screenshot twice in a session. Duplicated screenshot: {0}")]
    DuplicateScreenshot(String),

    #[error("Image encoding error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompareError {
    pub fn invalid_region(message: impl Into<String>) -> Self {
        CompareError::InvalidRegion(message.into())
    }

    pub fn unresolved(message: impl Into<String>) -> Self {
        CompareError::UnresolvedHierarchy(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            CompareError::InvalidImageData(e) => ErrorPayload::new(
                ErrorCategory::Image,
                format!("Invalid image data: {e}"),
                "Verify the screenshot bytes are a complete PNG/JPEG/GIF/WebP/BMP/TIFF image.",
            ),
            CompareError::InvalidRegion(msg) => ErrorPayload::new(
                ErrorCategory::Region,
                msg.to_string(),
                "Blind regions need non-negative left/top/width/height in pixels.",
            ),
            CompareError::UnresolvedHierarchy(msg) => ErrorPayload::new(
                ErrorCategory::Hierarchy,
                msg.to_string(),
                "Register the pattern, its category and the global scope for this browser before comparing.",
            ),
            CompareError::StaleBaseline(msg) => ErrorPayload::new(
                ErrorCategory::Hierarchy,
                msg.to_string(),
                "Recompute the baseline hash after changing blind regions, then compare again.",
            ),
            CompareError::DuplicateScreenshot(name) => ErrorPayload::new(
                ErrorCategory::Session,
                format!("Duplicated screenshot: {name}"),
                "Give every screenshot in a session a unique name per browser.",
            ),
            CompareError::Encode(msg) => ErrorPayload::new(
                ErrorCategory::Image,
                msg.to_string(),
                "Re-run with --verbose; the diff image could not be encoded.",
            ),
            CompareError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            CompareError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check the regions JSON: {\"local\":[...],\"category\":[...],\"global\":[...]} of {left,top,width,height}.",
            ),
            CompareError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory.",
                    )
                } else if lower.contains("overlay") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a hex overlay color such as \"#ff0000\" and a stroke between 1 and 16.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file (blindcmp config.toml).",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Image,
    Region,
    Hierarchy,
    Session,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_payload_mentions_non_negative() {
        let err = CompareError::invalid_region("width -3 is negative");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Region);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("non-negative"),
            "expected non-negative hint, got: {remediation}"
        );
    }

    #[test]
    fn hierarchy_payload_uses_hierarchy_category() {
        let err = CompareError::unresolved("category 7 not found");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Hierarchy);
        assert_eq!(payload.message, "category 7 not found");
    }

    #[test]
    fn config_payload_includes_file_hint() {
        let err = CompareError::Config("File not found: base.png".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("absolute path"),
            "expected file path remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_overlay_hint() {
        let err = CompareError::Config("Invalid overlay color 'red'".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("#ff0000"),
            "expected overlay remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = CompareError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("Check flags/paths"));
    }

    #[test]
    fn invalid_image_payload_uses_image_category() {
        let err = image::load_from_memory(&[])
            .map(|_| ())
            .map_err(CompareError::InvalidImageData)
            .unwrap_err();
        assert_eq!(err.to_payload().category, ErrorCategory::Image);
        assert!(err.to_string().starts_with("Invalid image data: "));
    }
}
