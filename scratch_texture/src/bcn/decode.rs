use crate::{
    rgba::convert::{snorm8_to_float, unorm8_to_float},
    SurfaceError,
};

use super::{
    bcn_size, Bc1, Bc2, Bc3, Bc4, Bc4S, Bc5, Bc5S, Bc6, Bc6S, Bc7, BLOCK_HEIGHT, BLOCK_WIDTH,
    CHANNELS,
};

type Block<T> = [[T; BLOCK_WIDTH]; BLOCK_HEIGHT];

pub(super) trait BcnDecode {
    type CompressedBlock: ReadBlock;

    // The decoded 4x4 pixel blocks are in row-major ordering.
    fn decompress_block(block: &Self::CompressedBlock) -> Block<[f32; 4]>;
}

// Allows block types to read and copy buffer data to enforce alignment.
pub(super) trait ReadBlock: Sized {
    const SIZE_IN_BYTES: usize;

    fn read_block(data: &[u8], offset: usize) -> Option<Self>;
}

impl ReadBlock for [u8; 8] {
    const SIZE_IN_BYTES: usize = 8;

    fn read_block(data: &[u8], offset: usize) -> Option<Self> {
        data.get(offset..offset + 8)?.try_into().ok()
    }
}

impl ReadBlock for [u8; 16] {
    const SIZE_IN_BYTES: usize = 16;

    fn read_block(data: &[u8], offset: usize) -> Option<Self> {
        data.get(offset..offset + 16)?.try_into().ok()
    }
}

fn unorm8_block(decompressed: Block<[u8; 4]>) -> Block<[f32; 4]> {
    decompressed.map(|row| row.map(|pixel| pixel.map(unorm8_to_float)))
}

impl BcnDecode for Bc1 {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block<[f32; 4]> {
        let mut decompressed = [[[0u8; 4]; BLOCK_WIDTH]; BLOCK_HEIGHT];

        bcdec_rs::bc1(
            block,
            bytemuck::cast_slice_mut(&mut decompressed),
            BLOCK_WIDTH * CHANNELS,
        );

        unorm8_block(decompressed)
    }
}

impl BcnDecode for Bc2 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        let mut decompressed = [[[0u8; 4]; BLOCK_WIDTH]; BLOCK_HEIGHT];

        bcdec_rs::bc2(
            block,
            bytemuck::cast_slice_mut(&mut decompressed),
            BLOCK_WIDTH * CHANNELS,
        );

        unorm8_block(decompressed)
    }
}

impl BcnDecode for Bc3 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        let mut decompressed = [[[0u8; 4]; BLOCK_WIDTH]; BLOCK_HEIGHT];

        bcdec_rs::bc3(
            block,
            bytemuck::cast_slice_mut(&mut decompressed),
            BLOCK_WIDTH * CHANNELS,
        );

        unorm8_block(decompressed)
    }
}

// BC4 stores a single channel, so each decompressed pixel is 1 byte.
// It's a convention in some programs to display BC4 in the red channel.
// Use grayscale instead to match other single channel formats.
fn bc4_block(block: &[u8; 8], is_signed: bool) -> Block<[f32; 4]> {
    let mut decompressed_r = [[0u8; BLOCK_WIDTH]; BLOCK_HEIGHT];

    bcdec_rs::bc4(
        block,
        bytemuck::cast_slice_mut(&mut decompressed_r),
        BLOCK_WIDTH,
        is_signed,
    );

    decompressed_r.map(|row| {
        row.map(|r| {
            let r = channel_to_float(r, is_signed);
            [r, r, r, 1.0]
        })
    })
}

// BC5 stores RG data, so each decompressed pixel is 2 bytes.
fn bc5_block(block: &[u8; 16], is_signed: bool) -> Block<[f32; 4]> {
    let mut decompressed_rg = [[[0u8; 2]; BLOCK_WIDTH]; BLOCK_HEIGHT];

    bcdec_rs::bc5(
        block,
        bytemuck::cast_slice_mut(&mut decompressed_rg),
        BLOCK_WIDTH * 2,
        is_signed,
    );

    // It's convention to zero the blue channel when decompressing BC5.
    decompressed_rg.map(|row| {
        row.map(|[r, g]| {
            [
                channel_to_float(r, is_signed),
                channel_to_float(g, is_signed),
                0.0,
                1.0,
            ]
        })
    })
}

fn channel_to_float(value: u8, is_signed: bool) -> f32 {
    if is_signed {
        snorm8_to_float(value as i8)
    } else {
        unorm8_to_float(value)
    }
}

impl BcnDecode for Bc4 {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block<[f32; 4]> {
        bc4_block(block, false)
    }
}

impl BcnDecode for Bc4S {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block<[f32; 4]> {
        bc4_block(block, true)
    }
}

impl BcnDecode for Bc5 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        bc5_block(block, false)
    }
}

impl BcnDecode for Bc5S {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        bc5_block(block, true)
    }
}

// BC6H uses half precision floating point data.
// The pitch is in terms of floats rather than bytes.
fn bc6h_block(block: &[u8; 16], is_signed: bool) -> Block<[f32; 4]> {
    let mut decompressed_rgb = [[[0.0f32; 3]; BLOCK_WIDTH]; BLOCK_HEIGHT];

    bcdec_rs::bc6h_float(
        block,
        bytemuck::cast_slice_mut(&mut decompressed_rgb),
        BLOCK_WIDTH * 3,
        is_signed,
    );

    decompressed_rgb.map(|row| row.map(|[r, g, b]| [r, g, b, 1.0]))
}

impl BcnDecode for Bc6 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        bc6h_block(block, false)
    }
}

impl BcnDecode for Bc6S {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        bc6h_block(block, true)
    }
}

impl BcnDecode for Bc7 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block<[f32; 4]> {
        let mut decompressed = [[[0u8; 4]; BLOCK_WIDTH]; BLOCK_HEIGHT];

        bcdec_rs::bc7(
            block,
            bytemuck::cast_slice_mut(&mut decompressed),
            BLOCK_WIDTH * CHANNELS,
        );

        unorm8_block(decompressed)
    }
}

/// Decompress the bytes in `data` to RGBA floats.
pub(super) fn decode_bcn<F: BcnDecode>(
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<Vec<[f32; 4]>, SurfaceError> {
    // Mipmap dimensions do not need to be multiples of the block dimensions.
    // A mipmap of size 1x1 pixels still uses a full block.
    let expected = bcn_size(width, height, F::CompressedBlock::SIZE_IN_BYTES)?;
    if data.len() < expected {
        return Err(SurfaceError::NotEnoughData {
            expected,
            actual: data.len(),
        });
    }

    let width = width as usize;
    let height = height as usize;
    let mut rgba = vec![[0.0f32; 4]; width * height];

    // BCN formats lay out blocks in row-major order.
    let mut block_start = 0;
    for y in (0..height).step_by(BLOCK_HEIGHT) {
        for x in (0..width).step_by(BLOCK_WIDTH) {
            let block = F::CompressedBlock::read_block(data, block_start).ok_or(
                SurfaceError::NotEnoughData {
                    expected,
                    actual: data.len(),
                },
            )?;
            let decompressed_block = F::decompress_block(&block);

            put_rgba_block(&mut rgba, decompressed_block, x, y, width, height);

            block_start += F::CompressedBlock::SIZE_IN_BYTES;
        }
    }

    Ok(rgba)
}

fn put_rgba_block<T: Copy>(
    surface: &mut [T],
    pixels: Block<T>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) {
    // The data from each block will update up to 4 rows of the surface.
    // The edges won't always have full blocks.
    let columns = BLOCK_WIDTH.min(width - x);

    for (row, row_pixels) in pixels.iter().enumerate().take(BLOCK_HEIGHT.min(height - y)) {
        let surface_index = (y + row) * width + x;
        surface[surface_index..surface_index + columns].copy_from_slice(&row_pixels[..columns]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_rgba_block_4x4() {
        // Write an entire block.
        let mut surface = vec![0u8; 4 * 4];
        put_rgba_block(&mut surface, [[1u8; BLOCK_WIDTH]; BLOCK_HEIGHT], 0, 0, 4, 4);
        assert_eq!(vec![1u8; 4 * 4], surface);
    }

    #[test]
    fn put_rgba_block_5x5() {
        // Test that block xy offsets work properly.
        let mut surface = vec![0u8; 5 * 5];

        put_rgba_block(&mut surface, [[1u8; BLOCK_WIDTH]; BLOCK_HEIGHT], 0, 0, 5, 5);
        put_rgba_block(&mut surface, [[2u8; BLOCK_WIDTH]; BLOCK_HEIGHT], 1, 1, 5, 5);

        assert_eq!(
            vec![
                1, 1, 1, 1, 0, //
                1, 2, 2, 2, 2, //
                1, 2, 2, 2, 2, //
                1, 2, 2, 2, 2, //
                0, 2, 2, 2, 2, //
            ],
            surface
        );
    }

    #[test]
    fn put_rgba_block_clips_edges() {
        let mut surface = vec![0u8; 2 * 3];
        put_rgba_block(&mut surface, [[7u8; BLOCK_WIDTH]; BLOCK_HEIGHT], 0, 0, 2, 3);
        assert_eq!(vec![7u8; 6], surface);
    }

    #[test]
    fn decode_bc1_solid_white() {
        // Both endpoints white with all indices 0.
        let block = [0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0];
        let rgba = decode_bcn::<Bc1>(4, 4, &block).unwrap();
        assert_eq!(vec![[1.0; 4]; 16], rgba);
    }

    #[test]
    fn decode_bc4_grayscale() {
        // Endpoint 0 with all indices 0.
        let block = [128, 0, 0, 0, 0, 0, 0, 0];
        let rgba = decode_bcn::<Bc4>(1, 1, &block).unwrap();
        let r = 128.0 / 255.0;
        assert_eq!(vec![[r, r, r, 1.0]], rgba);
    }

    #[test]
    fn decode_bc5_zeroes_blue() {
        let mut block = [0u8; 16];
        block[0] = 255;
        block[8] = 0;
        let rgba = decode_bcn::<Bc5>(1, 1, &block).unwrap();
        assert_eq!(vec![[1.0, 0.0, 0.0, 1.0]], rgba);
    }

    #[test]
    fn decode_partial_blocks() {
        // 5x5 needs 2x2 blocks.
        let data = [0u8; 4 * 16];
        assert_eq!(25, decode_bcn::<Bc7>(5, 5, &data).unwrap().len());
    }

    #[test]
    fn decode_not_enough_data() {
        assert_eq!(
            Err(SurfaceError::NotEnoughData {
                expected: 32,
                actual: 31
            }),
            decode_bcn::<Bc1>(8, 8, &[0u8; 31])
        );
    }
}
