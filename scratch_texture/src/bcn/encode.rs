use half::f16;

use crate::{
    rgba::convert::{float_to_snorm8, float_to_unorm8},
    Quality, SurfaceError,
};

use super::{
    bcn_size, Bc1, Bc2, Bc3, Bc4, Bc4S, Bc5, Bc5S, Bc6, Bc7, BLOCK_HEIGHT, BLOCK_WIDTH, CHANNELS,
};

// Quality modes are optimized for a balance of speed and quality.
impl From<Quality> for intel_tex_2::bc6h::EncodeSettings {
    fn from(value: Quality) -> Self {
        match value {
            Quality::Fast => intel_tex_2::bc6h::very_fast_settings(),
            Quality::Normal => intel_tex_2::bc6h::basic_settings(),
            Quality::Slow => intel_tex_2::bc6h::slow_settings(),
        }
    }
}

impl From<Quality> for intel_tex_2::bc7::EncodeSettings {
    fn from(value: Quality) -> Self {
        // bc7 has almost imperceptible errors even at ultra_fast
        match value {
            Quality::Fast => intel_tex_2::bc7::alpha_ultra_fast_settings(),
            Quality::Normal => intel_tex_2::bc7::alpha_very_fast_settings(),
            Quality::Slow => intel_tex_2::bc7::alpha_fast_settings(),
        }
    }
}

pub(super) trait BcnEncode {
    const BYTES_PER_BLOCK: usize;

    /// Compress a surface with dimensions that are multiples of the block dimensions.
    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        quality: Quality,
    ) -> Result<Vec<u8>, SurfaceError>;
}

fn rgba8_data(rgba: &[[f32; 4]]) -> Vec<u8> {
    rgba.iter()
        .flat_map(|pixel| pixel.map(float_to_unorm8))
        .collect()
}

fn compress_rgba8(
    width: u32,
    height: u32,
    rgba8_data: &[u8],
    compress: impl Fn(&intel_tex_2::RgbaSurface) -> Vec<u8>,
) -> Vec<u8> {
    // RGBA with 4 bytes per pixel.
    let surface = intel_tex_2::RgbaSurface {
        width,
        height,
        stride: width * CHANNELS as u32,
        data: rgba8_data,
    };
    compress(&surface)
}

impl BcnEncode for Bc1 {
    const BYTES_PER_BLOCK: usize = 8;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        Ok(compress_rgba8(
            width,
            height,
            &rgba8_data(rgba),
            intel_tex_2::bc1::compress_blocks,
        ))
    }
}

impl BcnEncode for Bc2 {
    const BYTES_PER_BLOCK: usize = 16;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        // BC2 shares the 4 color block with BC3 but stores explicit 4-bit alpha.
        let bc3 = compress_rgba8(
            width,
            height,
            &rgba8_data(rgba),
            intel_tex_2::bc3::compress_blocks,
        );

        let blocks_wide = width as usize / BLOCK_WIDTH;
        let mut bc2 = Vec::with_capacity(bc3.len());
        for (i, color) in bc3.chunks_exact(16).enumerate() {
            let x = (i % blocks_wide) * BLOCK_WIDTH;
            let y = (i / blocks_wide) * BLOCK_HEIGHT;
            bc2.extend_from_slice(&explicit_alpha_block(rgba, width as usize, x, y));
            bc2.extend_from_slice(&color[8..16]);
        }
        Ok(bc2)
    }
}

// Two 4-bit alpha values per byte in row-major order with the first pixel in the low bits.
fn explicit_alpha_block(rgba: &[[f32; 4]], width: usize, x: usize, y: usize) -> [u8; 8] {
    let mut block = [0u8; 8];
    for row in 0..BLOCK_HEIGHT {
        for column in 0..BLOCK_WIDTH {
            let alpha = rgba[(y + row) * width + x + column][3];
            let alpha4 = (alpha.clamp(0.0, 1.0) * 15.0).round() as u8;
            let i = row * BLOCK_WIDTH + column;
            block[i / 2] |= alpha4 << ((i % 2) * 4);
        }
    }
    block
}

impl BcnEncode for Bc3 {
    const BYTES_PER_BLOCK: usize = 16;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        Ok(compress_rgba8(
            width,
            height,
            &rgba8_data(rgba),
            intel_tex_2::bc3::compress_blocks,
        ))
    }
}

fn compress_bc4(width: u32, height: u32, r8_data: &[u8]) -> Vec<u8> {
    let surface = intel_tex_2::RSurface {
        width,
        height,
        stride: width,
        data: r8_data,
    };
    intel_tex_2::bc4::compress_blocks(&surface)
}

fn compress_bc5(width: u32, height: u32, rg8_data: &[u8]) -> Vec<u8> {
    let surface = intel_tex_2::RgSurface {
        width,
        height,
        stride: width * 2,
        data: rg8_data,
    };
    intel_tex_2::bc5::compress_blocks(&surface)
}

// Signed values are biased to unsigned bytes before compression.
// Flipping the sign bit of each endpoint then gives the signed block
// since interpolation and endpoint ordering are preserved.
fn biased_snorm8(value: f32) -> u8 {
    (float_to_snorm8(value) as u8) ^ 0x80
}

fn unbias_endpoints(blocks: &mut [u8]) {
    for block in blocks.chunks_exact_mut(8) {
        block[0] ^= 0x80;
        block[1] ^= 0x80;
    }
}

impl BcnEncode for Bc4 {
    const BYTES_PER_BLOCK: usize = 8;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        let r8_data: Vec<_> = rgba.iter().map(|p| float_to_unorm8(p[0])).collect();
        Ok(compress_bc4(width, height, &r8_data))
    }
}

impl BcnEncode for Bc4S {
    const BYTES_PER_BLOCK: usize = 8;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        let r8_data: Vec<_> = rgba.iter().map(|p| biased_snorm8(p[0])).collect();
        let mut blocks = compress_bc4(width, height, &r8_data);
        unbias_endpoints(&mut blocks);
        Ok(blocks)
    }
}

impl BcnEncode for Bc5 {
    const BYTES_PER_BLOCK: usize = 16;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        let rg8_data: Vec<_> = rgba
            .iter()
            .flat_map(|p| [float_to_unorm8(p[0]), float_to_unorm8(p[1])])
            .collect();
        Ok(compress_bc5(width, height, &rg8_data))
    }
}

impl BcnEncode for Bc5S {
    const BYTES_PER_BLOCK: usize = 16;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        _: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        let rg8_data: Vec<_> = rgba
            .iter()
            .flat_map(|p| [biased_snorm8(p[0]), biased_snorm8(p[1])])
            .collect();
        // Each 16 byte block is a red and a green BC4 block.
        let mut blocks = compress_bc5(width, height, &rg8_data);
        unbias_endpoints(&mut blocks);
        Ok(blocks)
    }
}

impl BcnEncode for Bc6 {
    const BYTES_PER_BLOCK: usize = 16;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        quality: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        // The BC6H encoder expects the data to be in half precision floating point.
        // The unsigned variant can't store negative values.
        let f16_data: Vec<f16> = rgba
            .iter()
            .flat_map(|pixel| pixel.map(|v| f16::from_f32(v.max(0.0))))
            .collect();

        let surface = intel_tex_2::RgbaSurface {
            width,
            height,
            stride: width * 4 * std::mem::size_of::<f16>() as u32,
            data: bytemuck::cast_slice(&f16_data),
        };

        Ok(intel_tex_2::bc6h::compress_blocks(
            &quality.into(),
            &surface,
        ))
    }
}

impl BcnEncode for Bc7 {
    const BYTES_PER_BLOCK: usize = 16;

    fn compress_surface(
        width: u32,
        height: u32,
        rgba: &[[f32; 4]],
        quality: Quality,
    ) -> Result<Vec<u8>, SurfaceError> {
        let settings: intel_tex_2::bc7::EncodeSettings = quality.into();
        Ok(compress_rgba8(
            width,
            height,
            &rgba8_data(rgba),
            |surface| intel_tex_2::bc7::compress_blocks(&settings, surface),
        ))
    }
}

/// Compress `width` x `height` RGBA floats to blocks of format `F`.
///
/// Surfaces that are not a multiple of the block dimensions are padded
/// by repeating the last row and column.
pub(super) fn encode_bcn<F: BcnEncode>(
    width: u32,
    height: u32,
    rgba: &[[f32; 4]],
    quality: Quality,
) -> Result<Vec<u8>, SurfaceError> {
    let expected_size = bcn_size(width, height, F::BYTES_PER_BLOCK)?;

    let pixel_count = width as usize * height as usize;
    if rgba.len() < pixel_count {
        return Err(SurfaceError::NotEnoughData {
            expected: pixel_count,
            actual: rgba.len(),
        });
    }

    let padded_width = (width as usize).next_multiple_of(BLOCK_WIDTH);
    let padded_height = (height as usize).next_multiple_of(BLOCK_HEIGHT);

    let blocks = if padded_width == width as usize && padded_height == height as usize {
        F::compress_surface(width, height, &rgba[..pixel_count], quality)?
    } else {
        let padded = pad_surface(rgba, width as usize, height as usize, padded_width, padded_height);
        F::compress_surface(padded_width as u32, padded_height as u32, &padded, quality)?
    };

    debug_assert_eq!(expected_size, blocks.len());
    Ok(blocks)
}

fn pad_surface(
    rgba: &[[f32; 4]],
    width: usize,
    height: usize,
    padded_width: usize,
    padded_height: usize,
) -> Vec<[f32; 4]> {
    let mut padded = Vec::with_capacity(padded_width * padded_height);
    for y in 0..padded_height {
        let row = &rgba[y.min(height - 1) * width..][..width];
        padded.extend((0..padded_width).map(|x| row[x.min(width - 1)]));
    }
    padded
}
