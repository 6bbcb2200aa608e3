//! Image Container
//!
//! Collection of texture levels keyed by size, with ordered access from the
//! smallest to the largest level or the other way around.
//!
//! A container is in one of two shapes after loading:
//! - not mipmapped: a single image, which may be rectangular
//! - mipmapped: square levels from the largest loaded image down to 1x1

use std::collections::BTreeMap;
use std::path::Path;

use dctex_core::{
    TEXTURE_SIZE_MAX, TEXTURE_SIZE_MIN, TextureSize, TextureType, is_valid_texture_size,
};
use image::RgbaImage;
use image::imageops;
use serde::{Deserialize, Serialize};

use crate::filter::{MipmapFilter, generate_level};
use crate::levels::LevelIndex;
use crate::source::SourceImage;
use crate::{AssetError, AssetResult};

/// Settings for building a texture's level chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Pixel format and layout flags of the target texture
    pub texture_type: TextureType,
    /// Filter for generated mipmaps. Chosen from the pixel format when unset.
    pub mipmap_filter: Option<MipmapFilter>,
    /// Flip every source image top to bottom
    pub mirror_vertically: bool,
    /// Flip every source image left to right
    pub mirror_horizontally: bool,
}

impl BuildOptions {
    /// Options for a texture type with everything else at defaults
    pub fn new(texture_type: TextureType) -> Self {
        Self {
            texture_type,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: MipmapFilter) -> Self {
        self.mipmap_filter = Some(filter);
        self
    }

    pub fn with_mirroring(mut self, vertically: bool, horizontally: bool) -> Self {
        self.mirror_vertically = vertically;
        self.mirror_horizontally = horizontally;
        self
    }

    /// Filter that will actually be used for generated levels
    pub fn effective_filter(&self) -> MipmapFilter {
        self.mipmap_filter
            .unwrap_or_else(|| MipmapFilter::default_for(&self.texture_type))
    }
}

/// Description of a loaded chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub width: u32,
    pub height: u32,
    pub mipmapped: bool,
    pub levels: Vec<u32>,
}

/// Flip a copy of `image` horizontally and/or vertically
pub fn mirror(mut image: RgbaImage, horizontally: bool, vertically: bool) -> RgbaImage {
    if horizontally {
        imageops::flip_horizontal_in_place(&mut image);
    }
    if vertically {
        imageops::flip_vertical_in_place(&mut image);
    }
    image
}

/// Levels of one texture
#[derive(Debug, Clone, Default)]
pub struct ImageContainer {
    texture_size: TextureSize,
    images: BTreeMap<u32, RgbaImage>,
    index: LevelIndex,
}

impl ImageContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Load source images and build the level chain.
    ///
    /// Loading an image whose size is already present replaces the earlier
    /// one. Without the mipmap flag exactly one image may be given and it may
    /// be rectangular. With the mipmap flag all images must be square and
    /// every level below the largest image is generated from the level
    /// directly above it unless it was supplied.
    ///
    /// The container is only modified if the whole load succeeds.
    pub fn load<I>(&mut self, sources: I, options: &BuildOptions) -> AssetResult<()>
    where
        I: IntoIterator<Item = SourceImage>,
    {
        let sources: Vec<SourceImage> = sources.into_iter().collect();
        let flags = options.texture_type.flags;
        let mipmapped = options.texture_type.is_mipmapped();

        if sources.len() > 1 && !mipmapped {
            return Err(AssetError::MultipleImagesWithoutMipmap);
        }

        let mut texture_size = self.texture_size;
        let mut images = self.images.clone();

        for source in sources {
            let (name, image) = source.into_parts();
            let image = image.ok_or_else(|| AssetError::DecodeFailed(name.clone()))?;
            let (width, height) = image.dimensions();

            if !is_valid_texture_size(width, height, flags) {
                return Err(AssetError::InvalidSize {
                    name,
                    width,
                    height,
                });
            }

            if mipmapped && width != height {
                return Err(AssetError::NotSquare(name));
            }

            texture_size = texture_size.expanded_to(TextureSize::new(width, height));
            images.insert(
                width,
                mirror(image, options.mirror_horizontally, options.mirror_vertically),
            );

            log::debug!("Loaded image {}", name);
        }

        if mipmapped {
            let filter = options.effective_filter();
            log::debug!("Using {} filtering for mipmaps", filter);
            fill_missing_levels(&mut images, filter);
        }

        if texture_size.width < TEXTURE_SIZE_MIN || texture_size.height < TEXTURE_SIZE_MIN {
            return Err(AssetError::ChainTooSmall);
        }

        self.index = LevelIndex::from_sizes(images.keys().copied());
        self.images = images;
        self.texture_size = texture_size;

        Ok(())
    }

    /// Decode image files and load them
    pub fn load_files<P>(&mut self, paths: &[P], options: &BuildOptions) -> AssetResult<()>
    where
        P: AsRef<Path>,
    {
        self.load(paths.iter().map(|path| SourceImage::from_path(path)), options)
    }

    /// Drop every level and reset the texture size
    pub fn unload_all(&mut self) {
        self.texture_size = TextureSize::default();
        self.images.clear();
        self.index.clear();
    }

    /// True if the container holds more than one level
    pub fn has_mipmaps(&self) -> bool {
        self.images.len() > 1
    }

    pub fn has_size(&self, size: u32) -> bool {
        self.images.contains_key(&size)
    }

    /// Level at `index`, counted from the smallest level when `ascending`
    /// is set and from the largest otherwise. `None` past the last level.
    pub fn get_by_index(&self, index: usize, ascending: bool) -> Option<&RgbaImage> {
        self.index
            .size_at(index, ascending)
            .and_then(|size| self.images.get(&size))
    }

    pub fn get_by_size(&self, size: u32) -> Option<&RgbaImage> {
        self.images.get(&size)
    }

    /// Levels with their sizes in the requested order
    pub fn iter(&self, ascending: bool) -> impl Iterator<Item = (u32, &RgbaImage)> + '_ {
        self.index
            .iter(ascending)
            .filter_map(move |size| self.images.get(&size).map(|img| (size, img)))
    }

    pub fn level_index(&self) -> &LevelIndex {
        &self.index
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn width(&self) -> u32 {
        self.texture_size.width
    }

    pub fn height(&self) -> u32 {
        self.texture_size.height
    }

    pub fn size(&self) -> TextureSize {
        self.texture_size
    }

    /// Stride setting stored in the type word of stride textures
    pub fn stride_setting(&self) -> u32 {
        self.texture_size.width / 32
    }

    pub fn summary(&self) -> ChainSummary {
        ChainSummary {
            width: self.width(),
            height: self.height(),
            mipmapped: self.has_mipmaps(),
            levels: self.index.iter(false).collect(),
        }
    }
}

/// Generate every missing level whose next larger level is present,
/// walking from the largest size down so new levels feed the ones below.
fn fill_missing_levels(images: &mut BTreeMap<u32, RgbaImage>, filter: MipmapFilter) {
    let mut size = TEXTURE_SIZE_MAX / 2;
    while size >= 1 {
        if !images.contains_key(&size) {
            let level = images
                .get(&(size * 2))
                .map(|parent| generate_level(parent, size, filter));
            if let Some(level) = level {
                images.insert(size, level);
                log::debug!("Generated {}x{} mipmap", size, size);
            }
        }
        size /= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dctex_core::PixelFormat;
    use image::Rgba;

    use crate::kaiser;

    fn mipmapped() -> BuildOptions {
        BuildOptions::new(TextureType::new(PixelFormat::Argb4444).mipmapped())
    }

    fn flat(name: &str, width: u32, height: u32, color: [u8; 4]) -> SourceImage {
        SourceImage::new(name, RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// Image with a distinct color per pixel so every level is traceable
    fn gradient(name: &str, size: u32) -> SourceImage {
        let img = RgbaImage::from_fn(size, size, |x, y| {
            Rgba([(x * 255 / size) as u8, (y * 255 / size) as u8, 128, 255])
        });
        SourceImage::new(name, img)
    }

    fn sizes(container: &ImageContainer) -> Vec<u32> {
        container.level_index().sizes_ascending().to_vec()
    }

    #[test]
    fn test_single_image_full_chain() {
        for n in [8, 64, 1024] {
            let mut container = ImageContainer::new();
            container
                .load([flat("base.png", n, n, [1, 2, 3, 255])], &mipmapped())
                .unwrap();

            let expected: Vec<u32> = (0..=n.trailing_zeros()).map(|s| 1 << s).collect();
            assert_eq!(sizes(&container), expected);
            assert_eq!(container.size(), TextureSize::new(n, n));
            assert!(container.has_mipmaps());

            for (size, img) in container.iter(true) {
                assert_eq!(img.dimensions(), (size, size));
            }
        }
    }

    #[test]
    fn test_single_rectangular_image_without_mipmaps() {
        let options = BuildOptions::new(TextureType::new(PixelFormat::Rgb565));
        let mut container = ImageContainer::new();
        container
            .load([flat("wide.png", 64, 16, [0, 0, 0, 255])], &options)
            .unwrap();

        assert_eq!(container.image_count(), 1);
        assert!(!container.has_mipmaps());
        assert_eq!(container.width(), 64);
        assert_eq!(container.height(), 16);
        assert!(container.has_size(64));
    }

    #[test]
    fn test_multiple_images_need_mipmap_flag() {
        let options = BuildOptions::new(TextureType::new(PixelFormat::Rgb565));
        let mut container = ImageContainer::new();
        let result = container.load(
            [
                flat("a.png", 16, 16, [0; 4]),
                flat("b.png", 8, 8, [0; 4]),
            ],
            &options,
        );
        assert_eq!(result, Err(AssetError::MultipleImagesWithoutMipmap));
    }

    #[test]
    fn test_decode_failure() {
        let mut container = ImageContainer::new();
        let result = container.load(
            [gradient("ok.png", 16), SourceImage::failed("broken.png")],
            &mipmapped(),
        );
        assert_eq!(result, Err(AssetError::DecodeFailed("broken.png".to_string())));
    }

    #[test]
    fn test_invalid_size() {
        let mut container = ImageContainer::new();
        let result = container.load([flat("odd.png", 24, 24, [0; 4])], &mipmapped());
        assert_eq!(
            result,
            Err(AssetError::InvalidSize {
                name: "odd.png".to_string(),
                width: 24,
                height: 24,
            })
        );
    }

    #[test]
    fn test_mipmapped_inputs_must_be_square() {
        let mut container = ImageContainer::new();
        let result = container.load(
            [gradient("square.png", 32), flat("wide.png", 32, 16, [0; 4])],
            &mipmapped(),
        );
        assert_eq!(result, Err(AssetError::NotSquare("wide.png".to_string())));
    }

    #[test]
    fn test_checks_run_in_input_order() {
        let mut container = ImageContainer::new();
        let result = container.load(
            [flat("wide.png", 32, 16, [0; 4]), SourceImage::failed("broken.png")],
            &mipmapped(),
        );
        assert_eq!(result, Err(AssetError::NotSquare("wide.png".to_string())));
    }

    #[test]
    fn test_chain_too_small() {
        let mut container = ImageContainer::new();
        let result = container.load([flat("tiny.png", 4, 4, [0; 4])], &mipmapped());
        assert_eq!(result, Err(AssetError::ChainTooSmall));
        assert_eq!(
            AssetError::ChainTooSmall.to_string(),
            "At least one input image must be 8x8 or larger"
        );
    }

    #[test]
    fn test_empty_input_is_too_small() {
        let mut container = ImageContainer::new();
        let result = container.load(Vec::<SourceImage>::new(), &mipmapped());
        assert_eq!(result, Err(AssetError::ChainTooSmall));
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut container = ImageContainer::new();
        container.load([gradient("base.png", 16)], &mipmapped()).unwrap();
        let before = sizes(&container);

        let result = container.load(
            [gradient("big.png", 64), flat("wide.png", 32, 16, [0; 4])],
            &mipmapped(),
        );
        assert!(result.is_err());
        assert_eq!(sizes(&container), before);
        assert_eq!(container.size(), TextureSize::new(16, 16));
        assert!(!container.has_size(64));
    }

    #[test]
    fn test_unload_then_reload_is_idempotent() {
        let options = mipmapped().with_filter(MipmapFilter::Kaiser);
        let mut container = ImageContainer::new();
        container.load([gradient("base.png", 32)], &options).unwrap();
        let first = sizes(&container);
        let first_level = container.get_by_size(4).cloned();

        container.unload_all();
        assert_eq!(container.image_count(), 0);
        assert_eq!(container.size(), TextureSize::default());
        assert!(container.get_by_index(0, true).is_none());

        container.load([gradient("base.png", 32)], &options).unwrap();
        assert_eq!(sizes(&container), first);
        assert_eq!(container.get_by_size(4).cloned(), first_level);
    }

    #[test]
    fn test_gaps_filled_from_immediate_parent() {
        let options = mipmapped().with_filter(MipmapFilter::Kaiser);
        let big = gradient("64.png", 64);
        let small = flat("16.png", 16, 16, [10, 200, 30, 255]);
        let small_image = small.image().cloned().unwrap();
        let big_image = big.image().cloned().unwrap();

        let mut container = ImageContainer::new();
        container.load([big, small], &options).unwrap();

        assert_eq!(sizes(&container), vec![1, 2, 4, 8, 16, 32, 64]);

        // 32 comes from 64, the supplied 16 is kept as-is
        let expected_32 = kaiser::resample(&big_image, 32);
        assert_eq!(container.get_by_size(32), Some(&expected_32));
        assert_eq!(container.get_by_size(16), Some(&small_image));

        // Every level below 16 comes from the level directly above it
        for size in [8, 4, 2, 1] {
            let parent = container.get_by_size(size * 2).unwrap();
            let expected = kaiser::resample(parent, size);
            assert_eq!(container.get_by_size(size), Some(&expected), "level {size}");
        }
    }

    #[test]
    fn test_no_levels_generated_above_largest_image() {
        let mut container = ImageContainer::new();
        container.load([gradient("base.png", 16)], &mipmapped()).unwrap();
        assert!(!container.has_size(32));
        assert_eq!(container.get_by_index(0, false).map(|i| i.width()), Some(16));
    }

    #[test]
    fn test_get_by_index() {
        let mut container = ImageContainer::new();
        container.load([gradient("base.png", 8)], &mipmapped()).unwrap();
        assert_eq!(sizes(&container), vec![1, 2, 4, 8]);

        assert_eq!(container.get_by_index(0, true).map(|i| i.width()), Some(1));
        assert_eq!(container.get_by_index(0, false).map(|i| i.width()), Some(8));
        assert_eq!(container.get_by_index(1, false).map(|i| i.width()), Some(4));
        assert!(container.get_by_index(4, true).is_none());
    }

    #[test]
    fn test_same_size_overwrites() {
        let mut container = ImageContainer::new();
        container
            .load(
                [
                    flat("first.png", 16, 16, [255, 0, 0, 255]),
                    flat("second.png", 16, 16, [0, 255, 0, 255]),
                ],
                &mipmapped(),
            )
            .unwrap();
        assert_eq!(
            container.get_by_size(16).unwrap().get_pixel(0, 0),
            &Rgba([0, 255, 0, 255])
        );
        assert_eq!(container.image_count(), 5);
    }

    #[test]
    fn test_mirroring() {
        let mut img = RgbaImage::new(8, 8);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));

        let vertical = mirror(img.clone(), false, true);
        assert_eq!(vertical.get_pixel(0, 7)[0], 255);

        let horizontal = mirror(img.clone(), true, false);
        assert_eq!(horizontal.get_pixel(7, 0)[0], 255);

        let both = mirror(img.clone(), true, true);
        assert_eq!(both.get_pixel(7, 7)[0], 255);

        let options =
            BuildOptions::new(TextureType::new(PixelFormat::Rgb565)).with_mirroring(true, false);
        let mut container = ImageContainer::new();
        container.load([SourceImage::new("corner.png", img)], &options).unwrap();
        assert_eq!(container.get_by_size(8).unwrap().get_pixel(0, 7)[0], 255);
    }

    #[test]
    fn test_stride_texture() {
        let options = BuildOptions::new(TextureType::new(PixelFormat::Rgb565).strided());
        let mut container = ImageContainer::new();
        container
            .load([flat("screen.png", 640, 256, [0, 0, 0, 255])], &options)
            .unwrap();
        assert_eq!(container.stride_setting(), 20);
    }

    #[test]
    fn test_summary() {
        let mut container = ImageContainer::new();
        container.load([gradient("base.png", 16)], &mipmapped()).unwrap();
        let summary = container.summary();
        assert_eq!(summary.levels, vec![16, 8, 4, 2, 1]);
        assert!(summary.mipmapped);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["width"], 16);
    }

    #[test]
    fn test_options_from_json() {
        let options: BuildOptions = serde_json::from_str(
            r#"{
                "texture_type": { "format": "PAL8BPP", "flags": "MIPMAPPED" },
                "mirror_vertically": true
            }"#,
        )
        .unwrap();
        assert!(options.texture_type.is_mipmapped());
        assert!(options.mirror_vertically);
        assert_eq!(options.effective_filter(), MipmapFilter::Nearest);

        let options = options.with_filter(MipmapFilter::Kaiser);
        assert_eq!(options.effective_filter(), MipmapFilter::Kaiser);
    }
}
