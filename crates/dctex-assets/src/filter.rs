//! Mipmap Filters
//!
//! Produces one mipmap level from the next larger one.

use std::convert::Infallible;
use std::str::FromStr;

use dctex_core::TextureType;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::kaiser;

/// Downscale filter used to generate missing mipmap levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MipmapFilter {
    /// Nearest-neighbor, never introduces new colors
    Nearest,
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Point sampling weighted by a Kaiser-Bessel window
    Kaiser,
}

impl MipmapFilter {
    /// Numeric filter id as stored in texture tool settings
    pub fn id(&self) -> u32 {
        match self {
            Self::Nearest => 0,
            Self::Bilinear => 1,
            Self::Kaiser => 2,
        }
    }

    /// Look up a filter by id. Unknown ids fall back to bilinear.
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => Self::Nearest,
            1 => Self::Bilinear,
            2 => Self::Kaiser,
            other => {
                log::warn!("Unknown mipmap filter id {}, using bilinear", other);
                Self::Bilinear
            }
        }
    }

    /// Look up a filter by name. Unknown names fall back to bilinear.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "nearest" => Self::Nearest,
            "bilinear" => Self::Bilinear,
            "kaiser" => Self::Kaiser,
            other => {
                log::warn!("Unknown mipmap filter '{}', using bilinear", other);
                Self::Bilinear
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Kaiser => "kaiser",
        }
    }

    /// Filter used when none is requested. Paletted textures get nearest
    /// filtering so the mipmaps don't add colors to the palette.
    pub fn default_for(texture_type: &TextureType) -> Self {
        if texture_type.format.is_paletted() {
            Self::Nearest
        } else {
            Self::Bilinear
        }
    }
}

impl std::fmt::Display for MipmapFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MipmapFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for MipmapFilter {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Generate a `target_size` x `target_size` level from `source`.
///
/// `source` must not be empty. For the Kaiser filter `target_size` should be
/// half the source width.
pub fn generate_level(source: &RgbaImage, target_size: u32, filter: MipmapFilter) -> RgbaImage {
    match filter {
        MipmapFilter::Nearest => {
            imageops::resize(source, target_size, target_size, FilterType::Nearest)
        }
        MipmapFilter::Bilinear => {
            imageops::resize(source, target_size, target_size, FilterType::Triangle)
        }
        MipmapFilter::Kaiser => kaiser::resample(source, target_size),
    }
}
