use std::io::Cursor;

use image::{
    codecs::{
        bmp::BmpEncoder, jpeg::JpegEncoder, png::PngEncoder, tga::TgaEncoder, tiff::TiffEncoder,
    },
    ColorType, DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat,
};
use tracing::trace;

use crate::{CodecError, EncodeOptions, Metadata, PixelFormat, SurfaceError, TextureStorage};

use super::{ContainerCodec, ImageFileFormat};

/// Single surface raster files like PNG, BMP, JPEG, TIFF and TGA.
///
/// Images decode to a 2D texture with one surface.
/// Encoding writes only the first surface.
#[derive(Debug, Clone, Copy)]
pub struct RasterCodec {
    format: ImageFormat,
}

impl RasterCodec {
    /// The codec for a raster `format`.
    ///
    /// [ImageFileFormat::Dds] is not a raster format and returns an error.
    pub fn new(format: ImageFileFormat) -> Result<Self, CodecError> {
        let format = match format {
            ImageFileFormat::Png => ImageFormat::Png,
            ImageFileFormat::Bmp => ImageFormat::Bmp,
            ImageFileFormat::Jpg => ImageFormat::Jpeg,
            ImageFileFormat::Tif => ImageFormat::Tiff,
            ImageFileFormat::Tga => ImageFormat::Tga,
            ImageFileFormat::Dds => return Err(CodecError::UnsupportedFormat { format }),
        };
        Ok(Self { format })
    }
}

impl ContainerCodec for RasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<(Metadata, Vec<u8>), CodecError> {
        let image = image::load_from_memory_with_format(bytes, self.format)?;
        trace!(
            color = ?image.color(),
            width = image.width(),
            height = image.height(),
            "read image"
        );

        let (format, data) = image_pixels(&image);
        let metadata =
            Metadata::new_2d(format, image.width() as u64, image.height() as u64, 1, 1);
        Ok((metadata, data))
    }

    fn encode(
        &self,
        storage: &TextureStorage,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let surface = storage.surface(0, 0, 0).ok_or(SurfaceError::ZeroSizedSurface {
            width: 0,
            height: 0,
            depth: 0,
        })?;
        let rgba8 = surface.decode_rgba8()?;
        encode_rgba8(self.format, surface.width, surface.height, &rgba8, options)
    }
}

// Keep as much precision as the image stores.
fn image_pixels(image: &DynamicImage) -> (PixelFormat, Vec<u8>) {
    let color = image.color();
    match bytes_per_channel(color) {
        4 => (
            PixelFormat::R32G32B32A32Float,
            image
                .to_rgba32f()
                .into_raw()
                .into_iter()
                .flat_map(f32::to_le_bytes)
                .collect(),
        ),
        2 => (
            PixelFormat::R16G16B16A16Unorm,
            image
                .to_rgba16()
                .into_raw()
                .into_iter()
                .flat_map(u16::to_le_bytes)
                .collect(),
        ),
        _ => (PixelFormat::R8G8B8A8Unorm, image.to_rgba8().into_raw()),
    }
}

fn bytes_per_channel(color: ColorType) -> u8 {
    color.bytes_per_pixel() / color.channel_count()
}

/// Encode tightly packed RGBA8 pixels to a raster `format`.
pub(super) fn encode_rgba8(
    format: ImageFormat,
    width: u32,
    height: u32,
    rgba8: &[u8],
    options: &EncodeOptions,
) -> Result<Vec<u8>, CodecError> {
    let mut writer = Vec::new();
    match format {
        ImageFormat::Bmp => BmpEncoder::new(&mut writer).write_image(
            rgba8,
            width,
            height,
            ExtendedColorType::Rgba8,
        )?,
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb8: Vec<u8> = rgba8
                .chunks_exact(4)
                .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                .collect();
            JpegEncoder::new_with_quality(&mut writer, options.jpeg_quality.clamp(1, 100))
                .write_image(&rgb8, width, height, ExtendedColorType::Rgb8)?
        }
        ImageFormat::Tiff => TiffEncoder::new(Cursor::new(&mut writer)).write_image(
            rgba8,
            width,
            height,
            ExtendedColorType::Rgba8,
        )?,
        ImageFormat::Tga => {
            let encoder = TgaEncoder::new(&mut writer);
            let encoder = if options.tga_rle {
                encoder
            } else {
                encoder.disable_rle()
            };
            encoder.write_image(rgba8, width, height, ExtendedColorType::Rgba8)?
        }
        _ => PngEncoder::new(&mut writer).write_image(
            rgba8,
            width,
            height,
            ExtendedColorType::Rgba8,
        )?,
    }
    Ok(writer)
}

/// Encode tightly packed RGBA16 values to PNG.
pub(super) fn encode_png_rgba16(
    width: u32,
    height: u32,
    rgba16: &[u16],
) -> Result<Vec<u8>, CodecError> {
    let mut writer = Vec::new();
    // The encoder expects native endian bytes.
    PngEncoder::new(&mut writer).write_image(
        bytemuck::cast_slice(rgba16),
        width,
        height,
        ExtendedColorType::Rgba16,
    )?;
    Ok(writer)
}
