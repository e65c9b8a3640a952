//! Loading and saving textures in container file formats.
//!
//! DDS is the only container that stores every surface and the full [Metadata](crate::Metadata).
//! The raster formats supported by the [image] crate store a single surface.
use std::path::Path;

use tracing::{debug, warn};

use crate::{
    CodecError, EncodeOptions, Metadata, Operation, Surface, TextureError, TextureStorage,
};

mod dds;
mod raster;

pub use dds::DdsCodec;
pub use raster::RasterCodec;

/// A container file format for loading and saving textures.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, strum::Display, strum::EnumIter)]
pub enum ImageFileFormat {
    Dds,
    Png,
    Bmp,
    Jpg,
    Tif,
    Tga,
}

impl ImageFileFormat {
    /// The format for a file extension like `"png"` or `"DDS"` without the leading `.`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "dds" => Some(Self::Dds),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "tif" | "tiff" => Some(Self::Tif),
            "tga" => Some(Self::Tga),
            _ => None,
        }
    }

    /// The format for the extension of `path`.
    ///
    /// Unrecognized or missing extensions use [ImageFileFormat::Dds].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_else(|| {
                warn!(?path, "unrecognized file extension, assuming DDS");
                Self::Dds
            })
    }

    /// The preferred file extension without the leading `.`.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFileFormat::Dds => "dds",
            ImageFileFormat::Png => "png",
            ImageFileFormat::Bmp => "bmp",
            ImageFileFormat::Jpg => "jpg",
            ImageFileFormat::Tif => "tif",
            ImageFileFormat::Tga => "tga",
        }
    }

    /// `true` if the format can store more than one surface.
    pub fn is_multi_surface(&self) -> bool {
        *self == ImageFileFormat::Dds
    }
}

/// A decoder and encoder for a single container format.
///
/// Decoding produces the metadata and the pixel data of every surface in storage order.
pub trait ContainerCodec {
    fn decode(&self, bytes: &[u8]) -> Result<(Metadata, Vec<u8>), CodecError>;

    fn encode(
        &self,
        storage: &TextureStorage,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, CodecError>;
}

fn container_codec(format: ImageFileFormat) -> Result<Box<dyn ContainerCodec>, CodecError> {
    match format {
        ImageFileFormat::Dds => Ok(Box::new(DdsCodec)),
        raster => Ok(Box::new(RasterCodec::new(raster)?)),
    }
}

/// Decode `bytes` in the given container `format`.
pub(crate) fn decode(format: ImageFileFormat, bytes: &[u8]) -> Result<TextureStorage, TextureError> {
    debug!(%format, size = bytes.len(), "decoding texture");

    let (metadata, pixels) = container_codec(format)
        .and_then(|codec| codec.decode(bytes))
        .map_err(|e| TextureError::codec(Operation::Load, e))?;
    TextureStorage::from_vec(metadata, pixels)
}

/// Encode `storage` to the given container `format`.
pub(crate) fn encode(
    format: ImageFileFormat,
    storage: &TextureStorage,
    options: &EncodeOptions,
) -> Result<Vec<u8>, TextureError> {
    let metadata = storage.metadata();
    debug!(
        %format,
        pixel_format = ?metadata.format,
        width = metadata.width,
        height = metadata.height,
        "encoding texture"
    );
    if !format.is_multi_surface() && storage.image_count() > 1 {
        warn!(
            %format,
            surfaces = storage.image_count(),
            "saving only the first surface"
        );
    }

    container_codec(format)
        .and_then(|codec| codec.encode(storage, options))
        .map_err(|e| TextureError::codec(Operation::Save, e))
}

/// Encode a single surface to PNG.
///
/// Formats with more than 8 bits per channel use 16 bits per channel.
pub(crate) fn portable_image(surface: &Surface<&[u8]>) -> Result<Vec<u8>, CodecError> {
    if surface.format.is_high_precision() {
        let rgba16 = surface.decode_rgba16()?;
        return raster::encode_png_rgba16(surface.width, surface.height, &rgba16);
    }

    let rgba8 = surface.decode_rgba8()?;
    raster::encode_rgba8(
        image::ImageFormat::Png,
        surface.width,
        surface.height,
        &rgba8,
        &EncodeOptions::default(),
    )
}
