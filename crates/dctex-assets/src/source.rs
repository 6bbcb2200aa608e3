//! Source Images
//!
//! Decoded input images handed to the chain builder. Decoding is done by the
//! `image` crate; a source whose decode failed carries no pixels and is
//! rejected when the chain is built.

use std::path::Path;

use image::RgbaImage;

/// A named, decoded input image
#[derive(Debug, Clone)]
pub struct SourceImage {
    name: String,
    image: Option<RgbaImage>,
}

impl SourceImage {
    /// Wrap an already decoded image
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image: Some(image),
        }
    }

    /// A source whose decode failed
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    /// Open and decode an image file
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path.display().to_string();

        match image::open(path) {
            Ok(decoded) => Self::new(name, decoded.to_rgba8()),
            Err(err) => {
                log::warn!("Could not decode {}: {}", name, err);
                Self::failed(name)
            }
        }
    }

    /// Decode an image from an in-memory encoded buffer
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        let name = name.into();

        match image::load_from_memory(bytes) {
            Ok(decoded) => Self::new(name, decoded.to_rgba8()),
            Err(err) => {
                log::warn!("Could not decode {}: {}", name, err);
                Self::failed(name)
            }
        }
    }

    /// Name used in messages, usually the file path
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The decoded pixels. Empty images count as failed decodes.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref().filter(|img| img.width() > 0 && img.height() > 0)
    }

    /// True if the source holds usable pixels
    pub fn is_decoded(&self) -> bool {
        self.image().is_some()
    }

    pub(crate) fn into_parts(self) -> (String, Option<RgbaImage>) {
        let image = self.image.filter(|img| img.width() > 0 && img.height() > 0);
        (self.name, image)
    }
}
