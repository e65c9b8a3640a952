use tracing::{debug, trace};

use crate::{
    bcn::{bcn_from_rgba, rgba_from_bcn},
    rgba::*,
    Operation, PixelFormat, Quality, SurfaceError, TextureError, TextureStorage,
};

/// The kind of transition between two pixel formats.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConversionKind {
    /// Block compressed to uncompressed.
    Decompress,
    /// Uncompressed to block compressed.
    Compress,
    /// Between two different uncompressed or two different compressed formats.
    Convert,
    /// The formats are the same.
    NoOp,
}

impl ConversionKind {
    pub fn new(source: PixelFormat, target: PixelFormat) -> Self {
        match (source.is_compressed(), target.is_compressed()) {
            _ if source == target => Self::NoOp,
            (true, false) => Self::Decompress,
            (false, true) => Self::Compress,
            _ => Self::Convert,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ConversionKind::Decompress => Operation::Decompress,
            ConversionKind::Compress => Operation::Compress,
            ConversionKind::Convert | ConversionKind::NoOp => Operation::Convert,
        }
    }
}

/// Build a copy of `storage` with every surface converted to `target`.
pub(crate) fn convert_storage(
    storage: &TextureStorage,
    target: PixelFormat,
    quality: Quality,
) -> Result<TextureStorage, TextureError> {
    let metadata = storage.metadata();
    let kind = ConversionKind::new(metadata.format, target);
    debug!(
        ?kind,
        source = ?metadata.format,
        ?target,
        width = metadata.width,
        height = metadata.height,
        depth = metadata.depth,
        "converting texture"
    );

    if kind == ConversionKind::NoOp {
        return Ok(storage.clone());
    }

    let mut converted = TextureStorage::new(metadata.with_format(target))?;
    for surface in storage.surfaces() {
        trace!(surface.mip, surface.item, surface.slice, "converting surface");

        let rgba = surface
            .decode_rgbaf32()
            .map_err(|e| TextureError::codec(kind.operation(), e))?;
        let data = encode_surface(target, surface.width, surface.height, &rgba, quality)
            .map_err(|e| TextureError::codec(kind.operation(), e))?;
        converted.write_surface(surface.mip, surface.item, surface.slice, &data)?;
    }

    Ok(converted)
}

/// Decode a single surface in any supported `format` to RGBA floats.
pub(crate) fn decode_surface(
    format: PixelFormat,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<Vec<[f32; 4]>, SurfaceError> {
    use PixelFormat as F;

    if format.is_compressed() {
        return rgba_from_bcn(format, width, height, data);
    }

    // sRGB formats are read as stored without a gamma conversion.
    match format {
        F::R32G32B32A32Float => decode_rgba::<Rgbaf32>(width, height, data),
        F::R32G32B32Float => decode_rgba::<Rgbf32>(width, height, data),
        F::R32G32Float => decode_rgba::<Rgf32>(width, height, data),
        F::R32Float => decode_rgba::<Rf32>(width, height, data),
        F::R16G16B16A16Float => decode_rgba::<Rgbaf16>(width, height, data),
        F::R16G16B16A16Unorm => decode_rgba::<Rgba16>(width, height, data),
        F::R16G16B16A16Snorm => decode_rgba::<Rgba16Snorm>(width, height, data),
        F::R16G16Float => decode_rgba::<Rgf16>(width, height, data),
        F::R16G16Unorm => decode_rgba::<Rg16>(width, height, data),
        F::R16G16Snorm => decode_rgba::<Rg16Snorm>(width, height, data),
        F::R16Float => decode_rgba::<Rf16>(width, height, data),
        F::R16Unorm => decode_rgba::<R16>(width, height, data),
        F::R16Snorm => decode_rgba::<R16Snorm>(width, height, data),
        F::R10G10B10A2Unorm => decode_rgba::<Rgb10a2>(width, height, data),
        F::R8G8B8A8Unorm | F::R8G8B8A8UnormSrgb => decode_rgba::<Rgba8>(width, height, data),
        F::R8G8B8A8Snorm => decode_rgba::<Rgba8Snorm>(width, height, data),
        F::R8G8Unorm => decode_rgba::<Rg8>(width, height, data),
        F::R8G8Snorm => decode_rgba::<Rg8Snorm>(width, height, data),
        F::R8Unorm => decode_rgba::<R8>(width, height, data),
        F::R8Snorm => decode_rgba::<R8Snorm>(width, height, data),
        F::A8Unorm => decode_rgba::<A8>(width, height, data),
        F::B8G8R8A8Unorm | F::B8G8R8A8UnormSrgb => decode_rgba::<Bgra8>(width, height, data),
        F::B8G8R8X8Unorm | F::B8G8R8X8UnormSrgb => decode_rgba::<Bgrx8>(width, height, data),
        F::B5G6R5Unorm => decode_rgba::<B5G6R5>(width, height, data),
        F::B5G5R5A1Unorm => decode_rgba::<Bgr5a1>(width, height, data),
        F::B4G4R4A4Unorm => decode_rgba::<Bgra4>(width, height, data),
        _ => Err(SurfaceError::UnsupportedDecodeFormat { format }),
    }
}

/// Encode a single surface of RGBA floats to any supported `format`.
pub(crate) fn encode_surface(
    format: PixelFormat,
    width: u32,
    height: u32,
    rgba: &[[f32; 4]],
    quality: Quality,
) -> Result<Vec<u8>, SurfaceError> {
    use PixelFormat as F;

    if format.is_compressed() {
        return bcn_from_rgba(format, width, height, rgba, quality);
    }

    match format {
        F::R32G32B32A32Float => encode_rgba::<Rgbaf32>(width, height, rgba),
        F::R32G32B32Float => encode_rgba::<Rgbf32>(width, height, rgba),
        F::R32G32Float => encode_rgba::<Rgf32>(width, height, rgba),
        F::R32Float => encode_rgba::<Rf32>(width, height, rgba),
        F::R16G16B16A16Float => encode_rgba::<Rgbaf16>(width, height, rgba),
        F::R16G16B16A16Unorm => encode_rgba::<Rgba16>(width, height, rgba),
        F::R16G16B16A16Snorm => encode_rgba::<Rgba16Snorm>(width, height, rgba),
        F::R16G16Float => encode_rgba::<Rgf16>(width, height, rgba),
        F::R16G16Unorm => encode_rgba::<Rg16>(width, height, rgba),
        F::R16G16Snorm => encode_rgba::<Rg16Snorm>(width, height, rgba),
        F::R16Float => encode_rgba::<Rf16>(width, height, rgba),
        F::R16Unorm => encode_rgba::<R16>(width, height, rgba),
        F::R16Snorm => encode_rgba::<R16Snorm>(width, height, rgba),
        F::R10G10B10A2Unorm => encode_rgba::<Rgb10a2>(width, height, rgba),
        F::R8G8B8A8Unorm | F::R8G8B8A8UnormSrgb => encode_rgba::<Rgba8>(width, height, rgba),
        F::R8G8B8A8Snorm => encode_rgba::<Rgba8Snorm>(width, height, rgba),
        F::R8G8Unorm => encode_rgba::<Rg8>(width, height, rgba),
        F::R8G8Snorm => encode_rgba::<Rg8Snorm>(width, height, rgba),
        F::R8Unorm => encode_rgba::<R8>(width, height, rgba),
        F::R8Snorm => encode_rgba::<R8Snorm>(width, height, rgba),
        F::A8Unorm => encode_rgba::<A8>(width, height, rgba),
        F::B8G8R8A8Unorm | F::B8G8R8A8UnormSrgb => encode_rgba::<Bgra8>(width, height, rgba),
        F::B8G8R8X8Unorm | F::B8G8R8X8UnormSrgb => encode_rgba::<Bgrx8>(width, height, rgba),
        F::B5G6R5Unorm => encode_rgba::<B5G6R5>(width, height, rgba),
        F::B5G5R5A1Unorm => encode_rgba::<Bgr5a1>(width, height, rgba),
        F::B4G4R4A4Unorm => encode_rgba::<Bgra4>(width, height, rgba),
        _ => Err(SurfaceError::UnsupportedEncodeFormat { format }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Metadata;
    use strum::IntoEnumIterator;

    #[test]
    fn conversion_kind_branches() {
        use PixelFormat as F;
        assert_eq!(
            ConversionKind::Decompress,
            ConversionKind::new(F::BC7Unorm, F::R8G8B8A8Unorm)
        );
        assert_eq!(
            ConversionKind::Compress,
            ConversionKind::new(F::R8G8B8A8Unorm, F::BC1Unorm)
        );
        assert_eq!(
            ConversionKind::Convert,
            ConversionKind::new(F::R8G8B8A8Unorm, F::B8G8R8A8Unorm)
        );
        assert_eq!(
            ConversionKind::Convert,
            ConversionKind::new(F::BC1Unorm, F::BC7Unorm)
        );
        for format in PixelFormat::iter() {
            assert_eq!(ConversionKind::NoOp, ConversionKind::new(format, format));
        }
    }

    #[test]
    fn decode_encode_every_linear_format() {
        // Every linear format with a decoder also has an encoder.
        let rgba = vec![[0.0, 0.5, 1.0, 1.0]; 4];
        for format in PixelFormat::iter().filter(|f| !f.is_compressed()) {
            let encoded = encode_surface(format, 2, 2, &rgba, Quality::Fast);
            let size = format.bits_per_pixel() as usize * 4 / 8;
            match encoded {
                Ok(data) => {
                    assert_eq!(size, data.len(), "{format:?}");
                    assert!(decode_surface(format, 2, 2, &data).is_ok(), "{format:?}");
                }
                Err(e) => {
                    assert_eq!(SurfaceError::UnsupportedEncodeFormat { format }, e);
                    assert!(decode_surface(format, 2, 2, &vec![0u8; 256]).is_err());
                }
            }
        }
    }

    #[test]
    fn convert_rgba8_to_bgra8() {
        let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 1, 1, 1, 1);
        let storage = TextureStorage::with_pixels(metadata, &[1, 2, 3, 4]).unwrap();
        let converted =
            convert_storage(&storage, PixelFormat::B8G8R8A8Unorm, Quality::Fast).unwrap();
        assert_eq!(PixelFormat::B8G8R8A8Unorm, converted.metadata().format);
        assert_eq!(&[3, 2, 1, 4], converted.pixels());
    }

    #[test]
    fn convert_same_format_is_identical() {
        let metadata = Metadata::new_2d(PixelFormat::R16Unorm, 3, 3, 1, 2);
        let pixels: Vec<u8> = (0..20).collect();
        let storage = TextureStorage::with_pixels(metadata, &pixels).unwrap();
        let converted = convert_storage(&storage, PixelFormat::R16Unorm, Quality::Fast).unwrap();
        assert_eq!(storage, converted);
    }

    #[test]
    fn convert_keeps_every_surface() {
        let metadata = Metadata::new_cube(PixelFormat::R8G8B8A8Unorm, 8, 8, 1, 4);
        let size = metadata.required_size().unwrap();
        let storage = TextureStorage::with_pixels(metadata, &vec![200u8; size]).unwrap();

        let compressed = convert_storage(&storage, PixelFormat::BC3Unorm, Quality::Fast).unwrap();
        assert_eq!(
            metadata.with_format(PixelFormat::BC3Unorm),
            *compressed.metadata()
        );
        // 6 faces with 2x2, 1x1, 1x1, 1x1 blocks
        assert_eq!(6 * 7 * 16, compressed.pixels().len());

        let decompressed =
            convert_storage(&compressed, PixelFormat::R8G8B8A8Unorm, Quality::Fast).unwrap();
        assert_eq!(size, decompressed.pixels().len());
        assert!(decompressed.pixels().iter().all(|v| v.abs_diff(200) <= 4));
    }

    #[test]
    fn convert_unsupported_target_reports_operation() {
        let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 4, 4, 1, 1);
        let storage = TextureStorage::new(metadata).unwrap();
        let result = convert_storage(&storage, PixelFormat::Yuy2, Quality::Fast);
        assert!(matches!(
            result,
            Err(TextureError::Codec {
                operation: Operation::Convert,
                source: crate::CodecError::Surface(SurfaceError::UnsupportedEncodeFormat {
                    format: PixelFormat::Yuy2
                })
            })
        ));
    }

    #[test]
    fn convert_bc6h_signed_target_fails() {
        let metadata = Metadata::new_2d(PixelFormat::R32G32B32A32Float, 4, 4, 1, 1);
        let storage = TextureStorage::new(metadata).unwrap();
        let result = convert_storage(&storage, PixelFormat::BC6HSf16, Quality::Fast);
        assert!(matches!(
            result,
            Err(TextureError::Codec {
                operation: Operation::Compress,
                ..
            })
        ));
    }

    #[test]
    fn convert_to_unknown_fails_initialization() {
        let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 4, 4, 1, 1);
        let storage = TextureStorage::new(metadata).unwrap();
        let result = convert_storage(&storage, PixelFormat::Unknown, Quality::Fast);
        assert!(matches!(result, Err(TextureError::InitializationFailure(_))));
    }
}
