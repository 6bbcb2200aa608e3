//! Texture Size Rules
//!
//! Dimension limits of the PVR2DC and the checks built on them.

use serde::{Deserialize, Serialize};

use crate::texture_type::TextureFlags;

/// Smallest texture edge the hardware samples from
pub const TEXTURE_SIZE_MIN: u32 = 8;
/// Largest texture edge
pub const TEXTURE_SIZE_MAX: u32 = 1024;
/// Smallest stride texture width
pub const TEXTURE_STRIDE_MIN: u32 = 32;
/// Largest stride texture width
pub const TEXTURE_STRIDE_MAX: u32 = 992;

/// Returns true if `x` is a non-zero power of two
#[inline]
pub fn is_power_of_two(x: u32) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

/// Returns the nearest power of two that is greater than or equal to `x`.
///
/// Zero maps to 1.
pub fn next_power_of_two(x: u32) -> u32 {
    x.max(1).next_power_of_two()
}

/// Check whether `width` x `height` is a texture size the hardware accepts
/// for a texture with the given flags.
///
/// Stride textures may have any width that is a multiple of 32 within the
/// stride range. Everything else must be a power of two on both axes.
/// Mipmapped textures accept levels down to 1x1 so that small levels can be
/// supplied by hand.
pub fn is_valid_texture_size(width: u32, height: u32, flags: TextureFlags) -> bool {
    let pow2_in = |v: u32, min: u32| v >= min && v <= TEXTURE_SIZE_MAX && is_power_of_two(v);

    if flags.contains(TextureFlags::STRIDED) {
        (TEXTURE_STRIDE_MIN..=TEXTURE_STRIDE_MAX).contains(&width)
            && width % 32 == 0
            && pow2_in(height, TEXTURE_SIZE_MIN)
    } else {
        let min = if flags.contains(TextureFlags::MIPMAPPED) {
            1
        } else {
            TEXTURE_SIZE_MIN
        };
        pow2_in(width, min) && pow2_in(height, min)
    }
}

/// Width and height of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum of two sizes
    pub fn expanded_to(self, other: TextureSize) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for TextureSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
