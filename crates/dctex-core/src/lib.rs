//! # dctex Core
//!
//! Shared definitions for building PVR2DC textures:
//! - **Texture type**: pixel formats and the flag word that describes a texture
//! - **Size rules**: which dimensions the hardware accepts
//! - **Window**: the Kaiser-Bessel window used when downscaling mipmaps

pub mod size;
pub mod texture_type;
pub mod window;

pub use size::{
    TextureSize, is_power_of_two, is_valid_texture_size, next_power_of_two, TEXTURE_SIZE_MAX,
    TEXTURE_SIZE_MIN, TEXTURE_STRIDE_MAX, TEXTURE_STRIDE_MIN,
};
pub use texture_type::{PixelFormat, TextureFlags, TextureType, TextureTypeError};
pub use window::{bessel_i0, kaiser_bessel_window};
