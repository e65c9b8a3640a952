//! An owned texture container with format conversion, resizing, mipmap generation,
//! and loading and saving for DDS, PNG, BMP, JPEG, TIFF and TGA files.
//!
//! A [ScratchTexture] owns a single pixel buffer described by a [Metadata].
//! Every surface of the texture, one for each (mip, item, slice) triple, is a
//! view into that buffer. Operations that change the layout like [ScratchTexture::convert],
//! [ScratchTexture::resize] and [ScratchTexture::generate_mipmaps] build a complete
//! replacement before swapping it in, so a failed operation leaves the texture unchanged.
//!
//! # Examples
//! Textures can be created from metadata and raw pixel data.
//! ```rust no_run
//! use scratch_texture::{Metadata, PixelFormat, ScratchTexture};
//!
//! let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 4, 4, 1, 1);
//! let mut texture = ScratchTexture::from_metadata_with_pixels(metadata, &[255u8; 64]).unwrap();
//!
//! texture.convert(PixelFormat::BC7Unorm).unwrap();
//! texture.generate_mipmaps(0).unwrap();
//! let dds = texture.save_to_bytes(scratch_texture::ImageFileFormat::Dds).unwrap();
//! ```
//!
//! Files are loaded based on their extension.
//! ```rust no_run
//! use scratch_texture::ScratchTexture;
//!
//! let texture = ScratchTexture::from_file("texture.dds").unwrap();
//! let png = texture.to_portable_image(0, 0, 0).unwrap();
//! ```
//!
//! # Logging
//! Operations emit [tracing] events but never install a subscriber.
//! Applications can enable output with a subscriber like `tracing-subscriber`.
mod bcn;
pub mod codec;
mod convert;
mod error;
mod format;
mod metadata;
mod resize;
mod rgba;
mod surface;
mod texture;

pub use codec::ImageFileFormat;
pub use convert::ConversionKind;
pub use error::*;
pub use format::{PixelFormat, UnknownFormatValue};
pub use metadata::{
    compute_pitch, AlphaMode, Layout, Metadata, SurfaceLayout, TexDimension, TexMiscFlags,
    TexMiscFlags2,
};
pub use surface::Surface;
pub use texture::{ScratchTexture, TextureStorage};

pub use ddsfile;
pub use image;

/// The conversion quality when converting to compressed formats.
///
/// Higher quality settings run significantly slower.
/// Block compressed formats like BC7 use a fixed compression ratio,
/// so lower quality settings do not use less space than slower ones.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Quality {
    /// Faster exports with slightly lower quality.
    Fast,
    /// Normal export speed and quality.
    #[default]
    Normal,
    /// Slower exports for slightly higher quality.
    Slow,
}

/// Settings for encoding container files.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct EncodeOptions {
    /// The block compression quality when an operation needs to compress.
    pub quality: Quality,
    /// JPEG quality from 1 to 100.
    pub jpeg_quality: u8,
    /// Run length encode TGA files instead of writing them uncompressed.
    pub tga_rle: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: Quality::Normal,
            jpeg_quality: 100,
            tga_rle: false,
        }
    }
}

/// The number of mipmaps in a full chain for a texture with the largest dimension `max_dimension`.
pub fn max_mipmap_count(max_dimension: u32) -> u32 {
    // log2(x) + 1
    u32::BITS - max_dimension.leading_zeros()
}

/// The dimension of mip level `mipmap` for a base dimension of `base_dimension`.
pub fn mip_dimension(base_dimension: u32, mipmap: u32) -> u32 {
    base_dimension.checked_shr(mipmap).unwrap_or(0).max(1)
}
