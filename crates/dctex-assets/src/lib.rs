//! # dctex Assets
//!
//! Turns a set of source images into the mipmap chain of a PVR2DC texture.
//!
//! ## Features
//! - Size and aspect validation of every source image
//! - Gap filling of missing mipmap levels from the next larger level
//! - Nearest, bilinear and Kaiser-window downscale filters
//! - Ascending and descending positional access to the finished chain

pub mod container;
pub mod filter;
pub mod kaiser;
pub mod levels;
pub mod source;

pub use container::{BuildOptions, ChainSummary, ImageContainer, mirror};
pub use filter::{MipmapFilter, generate_level};
pub use levels::LevelIndex;
pub use source::SourceImage;

use thiserror::Error;

/// Mipmap chain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Only one input file may be specified if no mipmap flag has been given")]
    MultipleImagesWithoutMipmap,

    #[error("Failed to load image {0}")]
    DecodeFailed(String),

    #[error("Image {name} has an invalid texture size {width}x{height}")]
    InvalidSize {
        name: String,
        width: u32,
        height: u32,
    },

    #[error("Image {0} is not square. Input images for mipmapped textures must be square")]
    NotSquare(String),

    #[error("At least one input image must be {min}x{min} or larger", min = dctex_core::TEXTURE_SIZE_MIN)]
    ChainTooSmall,
}

/// Result type for asset operations
pub type AssetResult<T> = Result<T, AssetError>;
