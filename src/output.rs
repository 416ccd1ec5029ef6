use crate::error::ErrorPayload;
use crate::hash::ContentHash;
use crate::types::Rect;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const BLINDCMP_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BlindcmpOutput {
    Hash(HashOutput),
    Mask(MaskOutput),
    Diff(DiffReport),
    Match(MatchOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashOutput {
    pub version: String,
    pub image: PathBuf,
    pub hash: ContentHash,
    pub blind_regions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskOutput {
    pub version: String,
    pub image: PathBuf,
    pub output_path: PathBuf,
    pub blind_regions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub version: String,
    pub baseline: PathBuf,
    pub candidate: PathBuf,
    pub bounding_rectangles: Vec<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_image: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutput {
    pub version: String,
    pub browser: String,
    pub baseline: PathBuf,
    pub candidate: PathBuf,
    pub is_match: bool,
    pub expected_hash: ContentHash,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounding_rectangles: Vec<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_image: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
