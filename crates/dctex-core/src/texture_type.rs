//! Texture Type
//!
//! Pixel formats and the flag word stored in a PVR2DC texture header.
//! Layout of the packed type word:
//! - bits 0..=4: stride setting (width / 32) for stride textures
//! - bit 25: strided, bit 26: non-twiddled
//! - bits 27..=29: pixel format
//! - bit 30: VQ compressed, bit 31: mipmapped

use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Texture type errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureTypeError {
    #[error("Unsupported format: {0}")]
    UnknownFormat(String),

    #[error("Stride textures can't be compressed")]
    StridedCompressed,

    #[error("Stride textures can't be twiddled")]
    StridedTwiddled,

    #[error("Stride textures can't have mipmaps")]
    StridedMipmapped,

    #[error("Only RGB565, ARGB1555, ARGB4444 and YUV422 can be strided, got {0}")]
    StrideFormat(PixelFormat),
}

bitflags! {
    /// Flags describing how a texture is laid out
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TextureFlags: u32 {
        const STRIDED = 1 << 25;
        const NONTWIDDLED = 1 << 26;
        const COMPRESSED = 1 << 30;
        const MIPMAPPED = 1 << 31;
    }
}

impl Default for TextureFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pixel formats supported by the PVR2DC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PixelFormat {
    #[default]
    Argb1555 = 0,
    Rgb565 = 1,
    Argb4444 = 2,
    Yuv422 = 3,
    Bumpmap = 4,
    Pal4Bpp = 5,
    Pal8Bpp = 6,
}

impl PixelFormat {
    const SHIFT: u32 = 27;
    const MASK: u32 = 7;

    /// All formats in id order
    pub const ALL: [PixelFormat; 7] = [
        Self::Argb1555,
        Self::Rgb565,
        Self::Argb4444,
        Self::Yuv422,
        Self::Bumpmap,
        Self::Pal4Bpp,
        Self::Pal8Bpp,
    ];

    /// Name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Argb1555 => "ARGB1555",
            Self::Rgb565 => "RGB565",
            Self::Argb4444 => "ARGB4444",
            Self::Yuv422 => "YUV422",
            Self::Bumpmap => "BUMPMAP",
            Self::Pal4Bpp => "PAL4BPP",
            Self::Pal8Bpp => "PAL8BPP",
        }
    }

    /// Format id as stored in the type word
    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// Look up a format by id
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Paletted formats index into a color table
    pub fn is_paletted(&self) -> bool {
        matches!(self, Self::Pal4Bpp | Self::Pal8Bpp)
    }

    /// 16 bits per pixel formats
    pub fn is_16bpp(&self) -> bool {
        !self.is_paletted()
    }

    /// Formats that may be used for stride textures
    pub fn is_strideable(&self) -> bool {
        matches!(
            self,
            Self::Rgb565 | Self::Argb1555 | Self::Argb4444 | Self::Yuv422
        )
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = TextureTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TextureTypeError::UnknownFormat(s.to_string()))
    }
}

/// Pixel format plus layout flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureType {
    /// Pixel format
    pub format: PixelFormat,
    /// Layout flags
    #[serde(default)]
    pub flags: TextureFlags,
}

impl TextureType {
    /// Create a texture type without any flags
    pub fn new(format: PixelFormat) -> Self {
        Self {
            format,
            flags: TextureFlags::empty(),
        }
    }

    /// Enable mipmaps
    pub fn mipmapped(mut self) -> Self {
        self.flags |= TextureFlags::MIPMAPPED;
        self
    }

    /// Enable VQ compression
    pub fn compressed(mut self) -> Self {
        self.flags |= TextureFlags::COMPRESSED;
        self
    }

    /// Make this a stride texture. Stride textures are always non-twiddled.
    pub fn strided(mut self) -> Self {
        self.flags |= TextureFlags::STRIDED | TextureFlags::NONTWIDDLED;
        self
    }

    pub fn is_mipmapped(&self) -> bool {
        self.flags.contains(TextureFlags::MIPMAPPED)
    }

    pub fn is_strided(&self) -> bool {
        self.flags.contains(TextureFlags::STRIDED)
    }

    pub fn is_compressed(&self) -> bool {
        self.flags.contains(TextureFlags::COMPRESSED)
    }

    /// Check the flag combination against what the hardware supports
    pub fn validate(&self) -> Result<(), TextureTypeError> {
        if !self.is_strided() {
            return Ok(());
        }
        if self.is_compressed() {
            return Err(TextureTypeError::StridedCompressed);
        }
        if !self.flags.contains(TextureFlags::NONTWIDDLED) {
            return Err(TextureTypeError::StridedTwiddled);
        }
        if self.is_mipmapped() {
            return Err(TextureTypeError::StridedMipmapped);
        }
        if !self.format.is_strideable() {
            return Err(TextureTypeError::StrideFormat(self.format));
        }
        Ok(())
    }

    /// Pack into the header type word. `stride_setting` only lands in the
    /// word for stride textures.
    pub fn type_word(&self, stride_setting: u32) -> u32 {
        let mut word = (self.format.id() & PixelFormat::MASK) << PixelFormat::SHIFT;
        word |= self.flags.bits();
        if self.is_strided() {
            word |= stride_setting & 0x1f;
        }
        word
    }

    /// Unpack a header type word. Unknown format ids are rejected.
    pub fn from_type_word(word: u32) -> Result<Self, TextureTypeError> {
        let id = (word >> PixelFormat::SHIFT) & PixelFormat::MASK;
        let format =
            PixelFormat::from_id(id).ok_or_else(|| TextureTypeError::UnknownFormat(id.to_string()))?;
        Ok(Self {
            format,
            flags: TextureFlags::from_bits_truncate(word),
        })
    }
}
