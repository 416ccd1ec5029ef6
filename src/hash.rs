//! Canonical content hashing of (masked) screenshots.
//!
//! Images are reduced to a canonical byte form before digesting: width and
//! height as little-endian `u32`, followed by tightly packed RGBA8 rows. Two
//! files with identical pixels therefore hash identically whatever container
//! or compression produced them.

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::mask::mask_bytes;
use crate::raster::decode;
use crate::types::BlindRegion;

/// Hex-encoded SHA-256 digest of a canonical pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap a digest string produced earlier (e.g. loaded from storage).
    /// Comparison is case-insensitive, so the value is normalized to lowercase.
    pub fn from_hex(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ContentHash {
    fn from(value: String) -> Self {
        Self::from_hex(value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical byte form of an already decoded image.
pub fn canonical_bytes(image: &RgbaImage) -> Vec<u8> {
    let raw = image.as_raw();
    let mut buf = Vec::with_capacity(8 + raw.len());
    buf.extend_from_slice(&image.width().to_le_bytes());
    buf.extend_from_slice(&image.height().to_le_bytes());
    buf.extend_from_slice(raw);
    buf
}

/// Digest of an already decoded image.
pub fn hash_image(image: &RgbaImage) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(canonical_bytes(image));
    ContentHash(hex::encode(hasher.finalize()))
}

/// Decode `bytes` into the canonical format and digest it.
pub fn hash(bytes: &[u8]) -> Result<ContentHash> {
    Ok(hash_image(&decode(bytes)?))
}

/// `hash(mask(bytes, regions))`: the digest stored with baselines.
pub fn masked_hash<'a>(
    bytes: &[u8],
    regions: impl IntoIterator<Item = &'a BlindRegion>,
) -> Result<ContentHash> {
    let masked = mask_bytes(bytes, regions)?;
    Ok(hash_image(&masked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use crate::raster::encode_png;
    use image::codecs::bmp::BmpEncoder;
    use image::{ColorType, DynamicImage, ImageEncoder, Rgba};

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(16, 12, Rgba([255, 255, 255, 255]));
        for x in 3..9 {
            img.put_pixel(x, 4, Rgba([200, 10, 10, 255]));
        }
        img
    }

    #[test]
    fn hash_is_deterministic() {
        let bytes = encode_png(&sample()).unwrap();
        let regions = [BlindRegion::new(0, 0, 4, 4).unwrap()];
        let first = masked_hash(&bytes, &regions).unwrap();
        let second = masked_hash(&bytes, &regions).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
    }

    #[test]
    fn hash_ignores_container_format() {
        let img = sample();
        let png = encode_png(&img).unwrap();
        let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
        let mut bmp = Vec::new();
        BmpEncoder::new(&mut bmp)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .expect("encode bmp");

        assert_ne!(png, bmp);
        assert_eq!(hash(&png).unwrap(), hash(&bmp).unwrap());
    }

    #[test]
    fn differences_inside_blind_region_do_not_change_hash() {
        let a = sample();
        let mut b = sample();
        b.put_pixel(11, 9, Rgba([0, 255, 0, 255]));
        let regions = [BlindRegion::new(10, 8, 3, 3).unwrap()];

        let ha = masked_hash(&encode_png(&a).unwrap(), &regions).unwrap();
        let hb = masked_hash(&encode_png(&b).unwrap(), &regions).unwrap();
        assert_eq!(ha, hb);

        let unmasked_a = hash(&encode_png(&a).unwrap()).unwrap();
        let unmasked_b = hash(&encode_png(&b).unwrap()).unwrap();
        assert_ne!(unmasked_a, unmasked_b);
    }

    #[test]
    fn dimensions_are_part_of_the_digest() {
        let wide = RgbaImage::from_pixel(4, 1, Rgba([0, 0, 0, 255]));
        let tall = RgbaImage::from_pixel(1, 4, Rgba([0, 0, 0, 255]));
        assert_ne!(hash_image(&wide), hash_image(&tall));
    }

    #[test]
    fn empty_buffer_is_invalid_image_data() {
        assert!(matches!(hash(&[]), Err(CompareError::InvalidImageData(_))));
    }

    #[test]
    fn stored_digest_comparison_is_case_insensitive() {
        let digest = hash_image(&sample());
        let upper = ContentHash::from_hex(digest.as_str().to_ascii_uppercase());
        assert_eq!(upper, digest);
    }
}
