use crate::{PixelFormat, Quality, SurfaceError};

mod decode;
mod encode;

use decode::decode_bcn;
use encode::encode_bcn;

// All supported compressed formats use 4x4 blocks.
const BLOCK_WIDTH: usize = 4;
const BLOCK_HEIGHT: usize = 4;
const CHANNELS: usize = 4;

struct Bc1;
struct Bc2;
struct Bc3;
struct Bc4;
struct Bc4S;
struct Bc5;
struct Bc5S;
struct Bc6;
struct Bc6S;
struct Bc7;

/// Decompress a single `width` x `height` surface in a BCn `format` to RGBA floats.
///
/// Typeless formats decode as their unsigned normalized variant.
/// sRGB formats return the stored values without a gamma conversion.
pub fn rgba_from_bcn(
    format: PixelFormat,
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<Vec<[f32; 4]>, SurfaceError> {
    use PixelFormat as F;
    match format {
        F::BC1Typeless | F::BC1Unorm | F::BC1UnormSrgb => decode_bcn::<Bc1>(width, height, data),
        F::BC2Typeless | F::BC2Unorm | F::BC2UnormSrgb => decode_bcn::<Bc2>(width, height, data),
        F::BC3Typeless | F::BC3Unorm | F::BC3UnormSrgb => decode_bcn::<Bc3>(width, height, data),
        F::BC4Typeless | F::BC4Unorm => decode_bcn::<Bc4>(width, height, data),
        F::BC4Snorm => decode_bcn::<Bc4S>(width, height, data),
        F::BC5Typeless | F::BC5Unorm => decode_bcn::<Bc5>(width, height, data),
        F::BC5Snorm => decode_bcn::<Bc5S>(width, height, data),
        F::BC6HTypeless | F::BC6HUf16 => decode_bcn::<Bc6>(width, height, data),
        F::BC6HSf16 => decode_bcn::<Bc6S>(width, height, data),
        F::BC7Typeless | F::BC7Unorm | F::BC7UnormSrgb => decode_bcn::<Bc7>(width, height, data),
        _ => Err(SurfaceError::UnsupportedDecodeFormat { format }),
    }
}

/// Compress a single `width` x `height` surface of RGBA floats to a BCn `format`.
pub fn bcn_from_rgba(
    format: PixelFormat,
    width: u32,
    height: u32,
    rgba: &[[f32; 4]],
    quality: Quality,
) -> Result<Vec<u8>, SurfaceError> {
    use PixelFormat as F;
    match format {
        F::BC1Typeless | F::BC1Unorm | F::BC1UnormSrgb => {
            encode_bcn::<Bc1>(width, height, rgba, quality)
        }
        F::BC2Typeless | F::BC2Unorm | F::BC2UnormSrgb => {
            encode_bcn::<Bc2>(width, height, rgba, quality)
        }
        F::BC3Typeless | F::BC3Unorm | F::BC3UnormSrgb => {
            encode_bcn::<Bc3>(width, height, rgba, quality)
        }
        F::BC4Typeless | F::BC4Unorm => encode_bcn::<Bc4>(width, height, rgba, quality),
        F::BC4Snorm => encode_bcn::<Bc4S>(width, height, rgba, quality),
        F::BC5Typeless | F::BC5Unorm => encode_bcn::<Bc5>(width, height, rgba, quality),
        F::BC5Snorm => encode_bcn::<Bc5S>(width, height, rgba, quality),
        F::BC6HTypeless | F::BC6HUf16 => encode_bcn::<Bc6>(width, height, rgba, quality),
        F::BC7Typeless | F::BC7Unorm | F::BC7UnormSrgb => {
            encode_bcn::<Bc7>(width, height, rgba, quality)
        }
        _ => Err(SurfaceError::UnsupportedEncodeFormat { format }),
    }
}

/// The size in bytes of a `width` x `height` surface with `block_size` bytes per 4x4 block.
fn bcn_size(width: u32, height: u32, block_size: usize) -> Result<usize, SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::ZeroSizedSurface {
            width,
            height,
            depth: 1,
        });
    }

    (width as usize)
        .div_ceil(BLOCK_WIDTH)
        .checked_mul((height as usize).div_ceil(BLOCK_HEIGHT))
        .and_then(|v| v.checked_mul(block_size))
        .ok_or(SurfaceError::PixelCountWouldOverflow {
            width,
            height,
            depth: 1,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn check_bcn_round_trip(format: PixelFormat, quality: Quality) {
        // Compress once to introduce the expected errors.
        let rgba = vec![[0.25, 0.5, 0.75, 1.0]; 4 * 4];
        let compressed = bcn_from_rgba(format, 4, 4, &rgba, quality).unwrap();
        assert_eq!(format.block_size_in_bytes(), compressed.len());

        let decompressed = rgba_from_bcn(format, 4, 4, &compressed).unwrap();
        assert_eq!(16, decompressed.len());

        // Compressing already compressed data should be stable.
        let compressed2 = bcn_from_rgba(format, 4, 4, &decompressed, quality).unwrap();
        let decompressed2 = rgba_from_bcn(format, 4, 4, &compressed2).unwrap();
        for (a, b) in decompressed.iter().zip(&decompressed2) {
            for c in 0..4 {
                assert!((a[c] - b[c]).abs() < 0.05, "{format:?} {a:?} {b:?}");
            }
        }
    }

    #[test]
    fn round_trip_every_encodable_format() {
        for format in PixelFormat::iter()
            .filter(|f| f.is_compressed() && *f != PixelFormat::BC6HSf16)
        {
            for quality in [Quality::Fast, Quality::Normal, Quality::Slow] {
                check_bcn_round_trip(format, quality);
            }
        }
    }

    #[test]
    fn bc6h_signed_encode_is_unsupported() {
        let rgba = vec![[0.0; 4]; 16];
        assert_eq!(
            Err(SurfaceError::UnsupportedEncodeFormat {
                format: PixelFormat::BC6HSf16
            }),
            bcn_from_rgba(PixelFormat::BC6HSf16, 4, 4, &rgba, Quality::Fast)
        );
    }

    #[test]
    fn bc6h_signed_decodes() {
        let rgba = rgba_from_bcn(PixelFormat::BC6HSf16, 4, 4, &[0u8; 16]).unwrap();
        assert_eq!(16, rgba.len());
    }

    #[test]
    fn linear_formats_are_rejected() {
        assert_eq!(
            Err(SurfaceError::UnsupportedDecodeFormat {
                format: PixelFormat::R8G8B8A8Unorm
            }),
            rgba_from_bcn(PixelFormat::R8G8B8A8Unorm, 4, 4, &[0u8; 64])
        );
    }

    #[test]
    fn bcn_size_partial_blocks() {
        assert_eq!(Ok(8), bcn_size(1, 1, 8));
        assert_eq!(Ok(16 * 6), bcn_size(9, 5, 16));
        assert!(bcn_size(0, 4, 16).is_err());
    }
}
