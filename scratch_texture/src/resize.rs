use image::{imageops::FilterType, Rgba32FImage};
use tracing::{debug, trace};

use crate::{
    convert::encode_surface, Metadata, Operation, Quality, SurfaceError, TexDimension,
    TextureError, TextureStorage,
};

/// Build a copy of `storage` with `count` mipmaps generated from the base level.
///
/// A `count` of `0` generates the full chain down to 1x1.
pub(crate) fn generate_mipmaps(
    storage: &TextureStorage,
    count: u64,
    quality: Quality,
) -> Result<TextureStorage, TextureError> {
    let metadata = storage.metadata();
    let max_mip_levels = metadata.max_mip_levels();
    debug!(
        count,
        max_mip_levels,
        format = ?metadata.format,
        width = metadata.width,
        height = metadata.height,
        depth = metadata.depth,
        "generating mipmaps"
    );

    let mip_levels = match count {
        0 => max_mip_levels,
        n if n > max_mip_levels => {
            return Err(TextureError::codec(
                Operation::GenerateMipMaps,
                SurfaceError::InvalidMipmapCount {
                    mipmaps: n.min(u32::MAX as u64) as u32,
                    max_total_mipmaps: max_mip_levels as u32,
                },
            ))
        }
        n => n,
    };

    let mut target = TextureStorage::new(Metadata {
        mip_levels,
        ..*metadata
    })?;

    for item in 0..metadata.array_size as usize {
        // The base level is never filtered or requantized.
        for slice in 0..metadata.depth as u32 {
            if let Some(surface) = storage.surface(0, item, slice) {
                target.write_surface(0, item, slice, surface.data)?;
            }
        }

        if mip_levels > 1 {
            let base = decode_base_level(storage, item, Operation::GenerateMipMaps)?;
            write_mip_chain(&mut target, item, base, Operation::GenerateMipMaps, quality)?;
        }
    }

    Ok(target)
}

/// Build a copy of `storage` resampled to `width` x `height`.
pub(crate) fn resize(
    storage: &TextureStorage,
    width: u32,
    height: u32,
    quality: Quality,
) -> Result<TextureStorage, TextureError> {
    let metadata = storage.metadata();
    debug!(
        from_width = metadata.width,
        from_height = metadata.height,
        width,
        height,
        format = ?metadata.format,
        "resizing texture"
    );

    if width == 0 || height == 0 {
        return Err(TextureError::codec(
            Operation::Resize,
            SurfaceError::ZeroSizedSurface {
                width,
                height,
                depth: metadata.depth as u32,
            },
        ));
    }

    if metadata.dimension == TexDimension::Texture1D && height != 1 {
        return Err(TextureError::UnsupportedOperation {
            operation: Operation::Resize,
            reason: format!("1D textures must have a height of 1 but found {height}"),
        });
    }

    if metadata.width == width as u64 && metadata.height == height as u64 {
        return Ok(storage.clone());
    }

    let mut resized = Metadata {
        width: width as u64,
        height: height as u64,
        mip_levels: 1,
        ..*metadata
    };
    if metadata.mip_levels > 1 {
        resized.mip_levels = metadata.mip_levels.min(resized.max_mip_levels());
    }
    let mut target = TextureStorage::new(resized)?;

    let (source_width, source_height, _) = metadata.mip_dimensions(0);
    for item in 0..metadata.array_size as usize {
        let base = decode_base_level(storage, item, Operation::Resize)?;

        // Volumes keep their depth and resample each slice.
        let pixels_per_slice = source_width as usize * source_height as usize;
        let mut resampled = Vec::new();
        for slice in base.chunks_exact(pixels_per_slice) {
            resampled.extend(
                resize_triangle(source_width, source_height, slice, width, height)
                    .map_err(|e| TextureError::codec(Operation::Resize, e))?,
            );
        }

        let slice_size = width as usize * height as usize;
        for (slice, rgba) in resampled.chunks_exact(slice_size).enumerate() {
            let data = encode_surface(resized.format, width, height, rgba, quality)
                .map_err(|e| TextureError::codec(Operation::Resize, e))?;
            target.write_surface(0, item, slice as u32, &data)?;
        }

        if resized.mip_levels > 1 {
            write_mip_chain(&mut target, item, resampled, Operation::Resize, quality)?;
        }
    }

    Ok(target)
}

// Every depth slice of the base level in slice order.
fn decode_base_level(
    storage: &TextureStorage,
    item: usize,
    operation: Operation,
) -> Result<Vec<[f32; 4]>, TextureError> {
    let mut rgba = Vec::new();
    for slice in 0..storage.metadata().depth as u32 {
        let surface = storage
            .surface(0, item, slice)
            .ok_or(TextureError::NotFound {
                mip: 0,
                item,
                slice: slice as usize,
            })?;
        rgba.extend(
            surface
                .decode_rgbaf32()
                .map_err(|e| TextureError::codec(operation, e))?,
        );
    }
    Ok(rgba)
}

// Fill mips 1.. of `item` by repeatedly filtering the unquantized previous level.
fn write_mip_chain(
    target: &mut TextureStorage,
    item: usize,
    base: Vec<[f32; 4]>,
    operation: Operation,
    quality: Quality,
) -> Result<(), TextureError> {
    let metadata = *target.metadata();
    let mut previous = base;
    let mut previous_dimensions = metadata.mip_dimensions(0);

    for mip in 1..metadata.mip_levels as u32 {
        let (width, height, depth) = metadata.mip_dimensions(mip);
        trace!(mip, item, width, height, depth, "filtering mipmap");

        let (previous_width, previous_height, previous_depth) = previous_dimensions;
        let rgba = downsample_box(previous_width, previous_height, previous_depth, &previous);

        let slice_size = width as usize * height as usize;
        for (slice, slice_rgba) in rgba.chunks_exact(slice_size).enumerate() {
            let data = encode_surface(metadata.format, width, height, slice_rgba, quality)
                .map_err(|e| TextureError::codec(operation, e))?;
            target.write_surface(mip, item, slice as u32, &data)?;
        }

        previous = rgba;
        previous_dimensions = (width, height, depth);
    }

    Ok(())
}

/// Halve each dimension by averaging 2x2x2 regions of `rgba`.
///
/// Dimensions of 1 stay at 1. Odd dimensions drop the last row, column or slice.
/// Channels are filtered independently.
pub(crate) fn downsample_box(
    width: u32,
    height: u32,
    depth: u32,
    rgba: &[[f32; 4]],
) -> Vec<[f32; 4]> {
    let width = width as usize;
    let height = height as usize;
    let depth = depth as usize;

    let new_width = (width / 2).max(1);
    let new_height = (height / 2).max(1);
    let new_depth = (depth / 2).max(1);

    // Clamp so a dimension of 1 samples the same texel twice.
    let pair = |i: usize, size: usize| [(i * 2).min(size - 1), (i * 2 + 1).min(size - 1)];

    let mut new_data = vec![[0.0f32; 4]; new_width * new_height * new_depth];
    for z in 0..new_depth {
        for y in 0..new_height {
            for x in 0..new_width {
                let mut sum = [0.0f32; 4];
                for sz in pair(z, depth) {
                    for sy in pair(y, height) {
                        for sx in pair(x, width) {
                            let pixel = rgba[(sz * height + sy) * width + sx];
                            for c in 0..4 {
                                sum[c] += pixel[c];
                            }
                        }
                    }
                }

                let new_index = (z * new_height + y) * new_width + x;
                new_data[new_index] = sum.map(|s| s / 8.0);
            }
        }
    }
    new_data
}

/// Resample a single `width` x `height` surface with a triangle filter.
///
/// Channels are filtered independently.
pub(crate) fn resize_triangle(
    width: u32,
    height: u32,
    rgba: &[[f32; 4]],
    new_width: u32,
    new_height: u32,
) -> Result<Vec<[f32; 4]>, SurfaceError> {
    // The image crate clamps float samples to 0.0 to 1.0,
    // so remap each channel's range before filtering.
    let (offset, scale) = channel_range(rgba);
    let normalized: Vec<f32> = rgba
        .iter()
        .flat_map(|pixel| std::array::from_fn::<f32, 4, _>(|c| (pixel[c] - offset[c]) / scale[c]))
        .collect();

    let expected = width as usize * height as usize;
    let image = Rgba32FImage::from_raw(width, height, normalized).ok_or(
        SurfaceError::NotEnoughData {
            expected,
            actual: rgba.len(),
        },
    )?;
    let resized = image::imageops::resize(&image, new_width, new_height, FilterType::Triangle);

    Ok(bytemuck::cast_slice::<f32, [f32; 4]>(resized.as_raw())
        .iter()
        .map(|pixel| std::array::from_fn(|c| pixel[c] * scale[c] + offset[c]))
        .collect())
}

// Per channel offset and scale mapping the values onto 0.0 to 1.0.
// Channels already in range are left unchanged.
fn channel_range(rgba: &[[f32; 4]]) -> ([f32; 4], [f32; 4]) {
    let mut min = [f32::INFINITY; 4];
    let mut max = [f32::NEG_INFINITY; 4];
    for pixel in rgba {
        for c in 0..4 {
            min[c] = min[c].min(pixel[c]);
            max[c] = max[c].max(pixel[c]);
        }
    }

    let mut offset = [0.0; 4];
    let mut scale = [1.0; 4];
    for c in 0..4 {
        if min[c] < 0.0 || max[c] > 1.0 {
            offset[c] = min[c];
            if max[c] > min[c] {
                scale[c] = max[c] - min[c];
            }
        }
    }
    (offset, scale)
}
