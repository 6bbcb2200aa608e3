//! # dctex CLI
//!
//! Command-line interface for building PVR2DC texture mipmap chains.
//!
//! ## Commands
//! - `mipmaps` - Load source images and build the level chain
//! - `check` - Check whether a size is a valid texture size

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dctex_assets::{BuildOptions, ImageContainer, MipmapFilter};
use dctex_core::{PixelFormat, TextureFlags, is_valid_texture_size};

/// PVR2DC texture tool
#[derive(Parser)]
#[command(name = "dctex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load source images and build the mipmap chain
    Mipmaps(MipmapArgs),

    /// Check whether a size is a valid texture size
    Check {
        width: u32,
        height: u32,

        /// Size is for a mipmapped texture
        #[arg(short, long)]
        mipmap: bool,

        /// Size is for a stride texture
        #[arg(short, long)]
        stride: bool,
    },
}

/// Arguments of the `mipmaps` command
#[derive(Args, Debug, Default)]
pub struct MipmapArgs {
    /// Input file(s)
    #[arg(short = 'i', long = "in", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Texture format (ARGB1555, RGB565, ARGB4444, YUV422, BUMPMAP, PAL4BPP, PAL8BPP)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Generate/allow mipmaps
    #[arg(short, long)]
    pub mipmap: bool,

    /// Build for a compressed texture
    #[arg(short, long)]
    pub compress: bool,

    /// Build for a stride texture
    #[arg(short, long)]
    pub stride: bool,

    /// Use nearest-neighbor filtering for scaling mipmaps
    #[arg(short, long, conflicts_with_all = ["bilinear", "kaiser"])]
    pub nearest: bool,

    /// Use bilinear filtering for scaling mipmaps
    #[arg(short, long, conflicts_with = "kaiser")]
    pub bilinear: bool,

    /// Use kaiser filtering for scaling mipmaps
    #[arg(short, long)]
    pub kaiser: bool,

    /// Mirror the texture vertically
    #[arg(long)]
    pub mirrorv: bool,

    /// Mirror the texture horizontally
    #[arg(long)]
    pub mirrorh: bool,

    /// JSON file with build options; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the chain summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Write every level as a PNG into this directory
    #[arg(short, long)]
    pub dump_dir: Option<PathBuf>,
}

impl MipmapArgs {
    /// Merge the config file, if any, with the command-line flags
    pub fn build_options(&self) -> Result<BuildOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => BuildOptions::default(),
        };

        if let Some(format) = &self.format {
            options.texture_type.format = format.parse::<PixelFormat>()?;
        }
        if self.mipmap {
            options.texture_type = options.texture_type.mipmapped();
        }
        if self.compress {
            options.texture_type = options.texture_type.compressed();
        }
        if self.stride {
            options.texture_type = options.texture_type.strided();
        }

        if self.nearest {
            options.mipmap_filter = Some(MipmapFilter::Nearest);
        } else if self.bilinear {
            options.mipmap_filter = Some(MipmapFilter::Bilinear);
        } else if self.kaiser {
            options.mipmap_filter = Some(MipmapFilter::Kaiser);
        }

        options.mirror_vertically |= self.mirrorv;
        options.mirror_horizontally |= self.mirrorh;

        options.texture_type.validate()?;
        Ok(options)
    }
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    run(cli.command)
}

/// Run a command without touching the global logger
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Mipmaps(args) => {
            build_mipmaps(&args)?;
        }

        Commands::Check {
            width,
            height,
            mipmap,
            stride,
        } => {
            let mut flags = TextureFlags::empty();
            if mipmap {
                flags |= TextureFlags::MIPMAPPED;
            }
            if stride {
                flags |= TextureFlags::STRIDED | TextureFlags::NONTWIDDLED;
            }

            if !is_valid_texture_size(width, height, flags) {
                anyhow::bail!("{}x{} is not a valid texture size", width, height);
            }
            log::info!("{}x{} is a valid texture size", width, height);
        }
    }

    Ok(())
}

/// Build the chain described by `args` and report it
pub fn build_mipmaps(args: &MipmapArgs) -> Result<ImageContainer> {
    let options = args.build_options()?;

    let mut images = ImageContainer::new();
    images
        .load_files(&args.inputs, &options)
        .context("Failed to build mipmap chain")?;

    if options.texture_type.is_strided() {
        log::info!("Stride setting: {}", images.stride_setting());
    }
    log::debug!(
        "Texture type word: {:#010x}",
        options.texture_type.type_word(images.stride_setting())
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&images.summary())?);
    } else {
        log::info!("Texture size: {}", images.size());
        for (size, img) in images.iter(false) {
            log::info!("  Level {}: {}x{}", size, img.width(), img.height());
        }
    }

    if let Some(dir) = &args.dump_dir {
        dump_levels(&images, dir)?;
    }

    Ok(images)
}

/// Write every level to `dir` as `level_<size>.png`
pub fn dump_levels(images: &ImageContainer, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(images.image_count());
    for (size, img) in images.iter(false) {
        let path = dir.join(format!("level_{}.png", size));
        img.save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        log::debug!("Saved level {}", path.display());
        written.push(path);
    }

    Ok(written)
}
