use crate::{mip_dimension, LayoutError, PixelFormat};

/// The resource dimension of a texture.
///
/// The discriminants match `TEX_DIMENSION` and the DDS `D3D10_RESOURCE_DIMENSION` values.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[repr(u32)]
pub enum TexDimension {
    Texture1D = 2,
    #[default]
    Texture2D = 3,
    Texture3D = 4,
}

impl TryFrom<u32> for TexDimension {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Texture1D),
            3 => Ok(Self::Texture2D),
            4 => Ok(Self::Texture3D),
            v => Err(v),
        }
    }
}

/// Resource flags stored alongside the texture dimensions.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct TexMiscFlags(pub u32);

impl TexMiscFlags {
    pub const NONE: Self = Self(0);
    /// The array items are groups of 6 cube faces.
    pub const TEXTURE_CUBE: Self = Self(0x4);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Extended flags. Only the alpha mode bits are currently defined.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct TexMiscFlags2(pub u32);

impl TexMiscFlags2 {
    pub const ALPHA_MODE_MASK: u32 = 0x7;

    pub fn alpha_mode(&self) -> AlphaMode {
        match self.0 & Self::ALPHA_MODE_MASK {
            1 => AlphaMode::Straight,
            2 => AlphaMode::Premultiplied,
            3 => AlphaMode::Opaque,
            4 => AlphaMode::Custom,
            _ => AlphaMode::Unknown,
        }
    }

    pub fn with_alpha_mode(self, mode: AlphaMode) -> Self {
        Self((self.0 & !Self::ALPHA_MODE_MASK) | mode as u32)
    }
}

/// How the alpha channel should be interpreted.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[repr(u32)]
pub enum AlphaMode {
    #[default]
    Unknown = 0,
    Straight = 1,
    Premultiplied = 2,
    Opaque = 3,
    Custom = 4,
}

/// Describes the dimensions, format and surface count of a texture.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Metadata {
    /// The width of the base mip level in pixels.
    pub width: u64,
    /// The height of the base mip level in pixels.
    /// This should be `1` for 1D textures.
    pub height: u64,
    /// The depth of the base mip level in pixels.
    /// This should be `1` for 1D and 2D textures.
    pub depth: u64,
    /// The number of array items.
    /// Cube maps store 6 items for each cube.
    pub array_size: u64,
    /// The number of mip levels including the base level.
    pub mip_levels: u64,
    pub misc_flags: TexMiscFlags,
    pub misc_flags2: TexMiscFlags2,
    pub format: PixelFormat,
    pub dimension: TexDimension,
}

impl Metadata {
    pub fn new_1d(format: PixelFormat, width: u64, array_size: u64, mip_levels: u64) -> Self {
        Self {
            width,
            height: 1,
            depth: 1,
            array_size,
            mip_levels,
            misc_flags: TexMiscFlags::NONE,
            misc_flags2: TexMiscFlags2::default(),
            format,
            dimension: TexDimension::Texture1D,
        }
    }

    pub fn new_2d(
        format: PixelFormat,
        width: u64,
        height: u64,
        array_size: u64,
        mip_levels: u64,
    ) -> Self {
        Self {
            height,
            dimension: TexDimension::Texture2D,
            ..Self::new_1d(format, width, array_size, mip_levels)
        }
    }

    /// A 2D cube map texture with `cube_count` groups of 6 faces.
    pub fn new_cube(
        format: PixelFormat,
        width: u64,
        height: u64,
        cube_count: u64,
        mip_levels: u64,
    ) -> Self {
        Self {
            misc_flags: TexMiscFlags::TEXTURE_CUBE,
            ..Self::new_2d(format, width, height, cube_count.saturating_mul(6), mip_levels)
        }
    }

    pub fn new_3d(
        format: PixelFormat,
        width: u64,
        height: u64,
        depth: u64,
        mip_levels: u64,
    ) -> Self {
        Self {
            height,
            depth,
            dimension: TexDimension::Texture3D,
            ..Self::new_1d(format, width, 1, mip_levels)
        }
    }

    pub fn is_cubemap(&self) -> bool {
        self.misc_flags.contains(TexMiscFlags::TEXTURE_CUBE)
    }

    pub fn is_volume(&self) -> bool {
        self.dimension == TexDimension::Texture3D
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.misc_flags2.alpha_mode()
    }

    /// The length of the full mip chain for the base dimensions.
    pub fn max_mip_levels(&self) -> u64 {
        let max_dimension = match self.dimension {
            TexDimension::Texture1D => self.width,
            TexDimension::Texture2D => self.width.max(self.height),
            TexDimension::Texture3D => self.width.max(self.height).max(self.depth),
        };
        u64::BITS as u64 - max_dimension.leading_zeros() as u64
    }

    /// Checks that the metadata describes a texture that can be laid out in memory.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width == 0
            || self.height == 0
            || self.depth == 0
            || self.array_size == 0
            || self.mip_levels == 0
        {
            return Err(LayoutError::ZeroSized {
                width: self.width,
                height: self.height,
                depth: self.depth,
                array_size: self.array_size,
                mip_levels: self.mip_levels,
            });
        }

        if self.format.bits_per_pixel() == 0 {
            return Err(LayoutError::UnknownFormat {
                format: self.format,
            });
        }

        let dimension_mismatch = || LayoutError::DimensionMismatch {
            dimension: self.dimension,
            width: self.width,
            height: self.height,
            depth: self.depth,
        };
        match self.dimension {
            TexDimension::Texture1D => {
                if self.height != 1 || self.depth != 1 {
                    return Err(dimension_mismatch());
                }
            }
            TexDimension::Texture2D => {
                if self.depth != 1 {
                    return Err(dimension_mismatch());
                }
            }
            TexDimension::Texture3D => {
                if self.array_size != 1 {
                    return Err(LayoutError::InvalidArraySize {
                        dimension: self.dimension,
                        array_size: self.array_size,
                    });
                }
            }
        }

        if self.is_cubemap()
            && (self.dimension != TexDimension::Texture2D || self.array_size % 6 != 0)
        {
            return Err(LayoutError::InvalidCubeMap {
                dimension: self.dimension,
                array_size: self.array_size,
            });
        }

        let max_mip_levels = self.max_mip_levels();
        if self.mip_levels > max_mip_levels {
            return Err(LayoutError::TooManyMipmaps {
                mip_levels: self.mip_levels,
                max_mip_levels,
            });
        }

        // Pixel codecs address surfaces with 32-bit dimensions.
        if [self.width, self.height, self.depth]
            .iter()
            .any(|d| *d > u32::MAX as u64)
        {
            return Err(LayoutError::SizeOverflow);
        }

        Ok(())
    }

    /// Validates the metadata and computes the location of every surface.
    ///
    /// The total size is checked before the surface table is allocated.
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        let total_size = self.required_size()?;

        let surface_count = self.surface_count()?;
        let mut surfaces = Vec::new();
        surfaces
            .try_reserve_exact(surface_count)
            .map_err(|_| LayoutError::AllocationFailure {
                size: surface_count.saturating_mul(std::mem::size_of::<SurfaceLayout>()),
            })?;

        let pitches = self.mip_pitches()?;
        let mut offset = 0usize;
        let mut push = |mip: usize, item: usize, slice: u32| {
            let (row_pitch, slice_pitch) = pitches[mip];
            let (width, height, _) = self.mip_dimensions(mip as u32);
            surfaces.push(SurfaceLayout {
                mip: mip as u32,
                item,
                slice,
                width,
                height,
                row_pitch,
                slice_pitch,
                offset,
            });
            offset += slice_pitch;
        };

        // Offsets can not overflow since the total size was already checked.
        match self.dimension {
            TexDimension::Texture1D | TexDimension::Texture2D => {
                for item in 0..self.array_size as usize {
                    for mip in 0..pitches.len() {
                        push(mip, item, 0);
                    }
                }
            }
            TexDimension::Texture3D => {
                for mip in 0..pitches.len() {
                    for slice in 0..self.mip_dimensions(mip as u32).2 {
                        push(mip, 0, slice);
                    }
                }
            }
        }

        Ok(Layout {
            surfaces,
            total_size,
        })
    }

    /// The number of bytes needed to store every surface.
    ///
    /// This does not allocate, so it is safe to call for arbitrarily large metadata.
    pub fn required_size(&self) -> Result<usize, LayoutError> {
        self.validate()?;

        let array_size = usize::try_from(self.array_size).map_err(|_| LayoutError::SizeOverflow)?;
        let mut total = 0usize;
        for mip in 0..self.mip_levels as u32 {
            let (width, height, depth) = self.mip_dimensions(mip);
            let (_, slice_pitch) =
                compute_pitch(self.format, width, height).ok_or(LayoutError::SizeOverflow)?;
            let count = match self.dimension {
                TexDimension::Texture3D => depth as usize,
                _ => array_size,
            };
            total = slice_pitch
                .checked_mul(count)
                .and_then(|size| total.checked_add(size))
                .ok_or(LayoutError::SizeOverflow)?;
        }
        Ok(total)
    }

    fn surface_count(&self) -> Result<usize, LayoutError> {
        match self.dimension {
            TexDimension::Texture3D => {
                let slices: u64 = (0..self.mip_levels as u32)
                    .map(|mip| self.mip_dimensions(mip).2 as u64)
                    .sum();
                usize::try_from(slices).map_err(|_| LayoutError::SizeOverflow)
            }
            _ => usize::try_from(self.array_size)
                .ok()
                .and_then(|items| items.checked_mul(self.mip_levels as usize))
                .ok_or(LayoutError::SizeOverflow),
        }
    }

    fn mip_pitches(&self) -> Result<Vec<(usize, usize)>, LayoutError> {
        (0..self.mip_levels as u32)
            .map(|mip| {
                let (width, height, _) = self.mip_dimensions(mip);
                compute_pitch(self.format, width, height).ok_or(LayoutError::SizeOverflow)
            })
            .collect()
    }

    /// The dimensions of mip level `mip`.
    pub fn mip_dimensions(&self, mip: u32) -> (u32, u32, u32) {
        (
            mip_dimension(self.width.min(u32::MAX as u64) as u32, mip),
            mip_dimension(self.height.min(u32::MAX as u64) as u32, mip),
            mip_dimension(self.depth.min(u32::MAX as u64) as u32, mip),
        )
    }

    /// The position in surface order of (`mip`, `item`, `slice`) or `None` if out of range.
    pub fn surface_index(&self, mip: usize, item: usize, slice: usize) -> Option<usize> {
        let mip_levels = self.mip_levels as usize;
        if mip >= mip_levels {
            return None;
        }

        match self.dimension {
            TexDimension::Texture1D | TexDimension::Texture2D => {
                if item >= self.array_size as usize || slice != 0 {
                    return None;
                }
                Some(item * mip_levels + mip)
            }
            TexDimension::Texture3D => {
                let (_, _, mip_depth) = self.mip_dimensions(mip as u32);
                if item != 0 || slice >= mip_depth as usize {
                    return None;
                }
                let preceding: usize = (0..mip as u32)
                    .map(|m| self.mip_dimensions(m).2 as usize)
                    .sum();
                Some(preceding + slice)
            }
        }
    }

    /// Metadata with the same dimensions and flags but a different `format`.
    pub fn with_format(&self, format: PixelFormat) -> Self {
        Self { format, ..*self }
    }
}

/// The memory layout of every surface for a [Metadata].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Layout {
    /// Surfaces in storage order.
    pub surfaces: Vec<SurfaceLayout>,
    pub total_size: usize,
}

/// The geometry and byte range of one (mip, item, slice) surface.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SurfaceLayout {
    pub mip: u32,
    pub item: usize,
    pub slice: u32,
    pub width: u32,
    pub height: u32,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    /// The offset in bytes from the start of the texture's pixel buffer.
    pub offset: usize,
}

impl SurfaceLayout {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.slice_pitch
    }
}

/// Calculates the row and slice pitch in bytes for a single `width` x `height` surface.
///
/// Returns `None` on overflow or for formats without a known size.
pub fn compute_pitch(format: PixelFormat, width: u32, height: u32) -> Option<(usize, usize)> {
    use PixelFormat as F;

    let width = width as usize;
    let height = height as usize;

    if format.is_compressed() {
        let blocks_wide = width.div_ceil(4).max(1);
        let blocks_high = height.div_ceil(4).max(1);
        let row = blocks_wide.checked_mul(format.block_size_in_bytes())?;
        return Some((row, row.checked_mul(blocks_high)?));
    }

    if format.is_packed() {
        let row = ((width.checked_add(1)?) >> 1).checked_mul(format.block_size_in_bytes())?;
        return Some((row, row.checked_mul(height)?));
    }

    // Planar formats store a half height chroma plane after the luma rows.
    let planar_rows = || height.checked_add((height.checked_add(1)?) >> 1);
    match format {
        F::Nv11 => {
            let row = ((width.checked_add(3)?) >> 2).checked_mul(4)?;
            Some((row, row.checked_mul(height)?.checked_mul(2)?))
        }
        F::Nv12 | F::Opaque420 => {
            let row = ((width.checked_add(1)?) >> 1).checked_mul(2)?;
            Some((row, row.checked_mul(planar_rows()?)?))
        }
        F::P010 | F::P016 => {
            let row = ((width.checked_add(1)?) >> 1).checked_mul(4)?;
            Some((row, row.checked_mul(planar_rows()?)?))
        }
        _ => {
            let bits_per_pixel = format.bits_per_pixel() as usize;
            if bits_per_pixel == 0 {
                return None;
            }
            let row = width.checked_mul(bits_per_pixel)?.checked_add(7)? / 8;
            Some((row, row.checked_mul(height)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_size_rgba8_single_mip() {
        let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 4, 4, 1, 1);
        assert_eq!(Ok(64), metadata.required_size());
    }

    #[test]
    fn required_size_rgba8_full_mip_chain() {
        // 64 + 16 + 4
        let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 4, 4, 1, 3);
        assert_eq!(Ok(84), metadata.required_size());
    }

    #[test]
    fn required_size_bc1_rounds_up_to_blocks() {
        // 2x2 blocks, 1x1 block, 1x1 block
        let metadata = Metadata::new_2d(PixelFormat::BC1Unorm, 5, 5, 1, 3);
        assert_eq!(Ok(8 * 4 + 8 + 8), metadata.required_size());
    }

    #[test]
    fn required_size_bc7_small_mips_use_whole_blocks() {
        let metadata = Metadata::new_2d(PixelFormat::BC7Unorm, 4, 4, 1, 3);
        assert_eq!(Ok(16 * 3), metadata.required_size());
    }

    #[test]
    fn required_size_cube_map() {
        let metadata = Metadata::new_cube(PixelFormat::R8G8B8A8Unorm, 2, 2, 1, 2);
        assert_eq!(Ok(6 * (16 + 4)), metadata.required_size());
    }

    #[test]
    fn required_size_3d_halves_depth() {
        // 4x4x4 + 2x2x2 + 1x1x1 texels
        let metadata = Metadata::new_3d(PixelFormat::R8Unorm, 4, 4, 4, 3);
        assert_eq!(Ok(64 + 8 + 1), metadata.required_size());
    }

    #[test]
    fn required_size_equals_sum_of_surfaces() {
        let metadata = Metadata::new_2d(PixelFormat::B5G6R5Unorm, 7, 3, 3, 3);
        let layout = metadata.layout().unwrap();
        assert_eq!(
            layout.total_size,
            layout.surfaces.iter().map(|s| s.slice_pitch).sum::<usize>()
        );
        assert_eq!(9, layout.surfaces.len());
    }

    #[test]
    fn layout_2d_is_item_major() {
        let metadata = Metadata::new_2d(PixelFormat::R8Unorm, 2, 2, 2, 2);
        let layout = metadata.layout().unwrap();
        let order: Vec<_> = layout.surfaces.iter().map(|s| (s.item, s.mip)).collect();
        assert_eq!(vec![(0, 0), (0, 1), (1, 0), (1, 1)], order);
        assert_eq!(vec![0, 4, 5, 9], layout.surfaces.iter().map(|s| s.offset).collect::<Vec<_>>());
    }

    #[test]
    fn layout_3d_is_mip_major() {
        let metadata = Metadata::new_3d(PixelFormat::R8Unorm, 2, 2, 2, 2);
        let layout = metadata.layout().unwrap();
        let order: Vec<_> = layout.surfaces.iter().map(|s| (s.mip, s.slice)).collect();
        assert_eq!(vec![(0, 0), (0, 1), (1, 0)], order);
    }

    #[test]
    fn surface_index_matches_layout() {
        for metadata in [
            Metadata::new_2d(PixelFormat::R8Unorm, 8, 4, 3, 3),
            Metadata::new_3d(PixelFormat::R8Unorm, 8, 4, 4, 3),
            Metadata::new_cube(PixelFormat::BC1Unorm, 8, 8, 2, 4),
        ] {
            let layout = metadata.layout().unwrap();
            for (i, s) in layout.surfaces.iter().enumerate() {
                assert_eq!(
                    Some(i),
                    metadata.surface_index(s.mip as usize, s.item, s.slice as usize)
                );
            }
        }
    }

    #[test]
    fn surface_index_out_of_range() {
        let metadata = Metadata::new_2d(PixelFormat::R8Unorm, 4, 4, 2, 2);
        assert_eq!(None, metadata.surface_index(2, 0, 0));
        assert_eq!(None, metadata.surface_index(0, 2, 0));
        assert_eq!(None, metadata.surface_index(0, 0, 1));

        let metadata = Metadata::new_3d(PixelFormat::R8Unorm, 4, 4, 4, 2);
        assert_eq!(Some(3), metadata.surface_index(0, 0, 3));
        assert_eq!(None, metadata.surface_index(1, 0, 2));
        assert_eq!(None, metadata.surface_index(0, 1, 0));
    }

    #[test]
    fn pitch_packed_and_planar() {
        assert_eq!(Some((12, 36)), compute_pitch(PixelFormat::Yuy2, 5, 3));
        assert_eq!(Some((24, 72)), compute_pitch(PixelFormat::Y210, 5, 3));
        // 4 luma rows and 2 chroma rows
        assert_eq!(Some((4, 24)), compute_pitch(PixelFormat::Nv12, 4, 4));
        assert_eq!(Some((8, 48)), compute_pitch(PixelFormat::P010, 4, 4));
        assert_eq!(Some((4, 32)), compute_pitch(PixelFormat::Nv11, 4, 4));
    }

    #[test]
    fn pitch_linear() {
        assert_eq!(Some((12, 36)), compute_pitch(PixelFormat::R8G8B8A8Unorm, 3, 3));
        assert_eq!(Some((1, 8)), compute_pitch(PixelFormat::R1Unorm, 8, 8));
        assert_eq!(Some((36, 36)), compute_pitch(PixelFormat::R32G32B32Float, 3, 1));
        assert_eq!(None, compute_pitch(PixelFormat::Unknown, 3, 1));
    }

    #[test]
    fn pitch_bc_minimum_one_block() {
        assert_eq!(Some((8, 8)), compute_pitch(PixelFormat::BC4Unorm, 1, 1));
        assert_eq!(Some((32, 64)), compute_pitch(PixelFormat::BC5Unorm, 8, 5));
    }

    #[test]
    fn validate_zero_sizes() {
        let metadata = Metadata::new_2d(PixelFormat::R8Unorm, 0, 4, 1, 1);
        assert!(matches!(metadata.validate(), Err(LayoutError::ZeroSized { .. })));

        let metadata = Metadata::new_2d(PixelFormat::R8Unorm, 4, 4, 1, 0);
        assert!(matches!(metadata.validate(), Err(LayoutError::ZeroSized { .. })));
    }

    #[test]
    fn validate_unknown_format() {
        for format in [PixelFormat::Unknown, PixelFormat::ForceUInt] {
            let metadata = Metadata::new_2d(format, 4, 4, 1, 1);
            assert_eq!(
                Err(LayoutError::UnknownFormat { format }),
                metadata.validate()
            );
        }
    }

    #[test]
    fn validate_dimension_mismatch() {
        let metadata = Metadata {
            height: 2,
            ..Metadata::new_1d(PixelFormat::R8Unorm, 4, 1, 1)
        };
        assert!(matches!(
            metadata.validate(),
            Err(LayoutError::DimensionMismatch { .. })
        ));

        let metadata = Metadata {
            depth: 2,
            ..Metadata::new_2d(PixelFormat::R8Unorm, 4, 4, 1, 1)
        };
        assert!(matches!(
            metadata.validate(),
            Err(LayoutError::DimensionMismatch { .. })
        ));

        let metadata = Metadata {
            array_size: 2,
            ..Metadata::new_3d(PixelFormat::R8Unorm, 4, 4, 4, 1)
        };
        assert!(matches!(
            metadata.validate(),
            Err(LayoutError::InvalidArraySize { .. })
        ));
    }

    #[test]
    fn validate_cube_map_array_size() {
        let metadata = Metadata {
            array_size: 5,
            ..Metadata::new_cube(PixelFormat::R8Unorm, 4, 4, 1, 1)
        };
        assert!(matches!(
            metadata.validate(),
            Err(LayoutError::InvalidCubeMap { .. })
        ));
        assert_eq!(
            Ok(()),
            Metadata::new_cube(PixelFormat::R8Unorm, 4, 4, 2, 1).validate()
        );
    }

    #[test]
    fn validate_too_many_mipmaps() {
        let metadata = Metadata::new_2d(PixelFormat::R8Unorm, 4, 4, 1, 4);
        assert_eq!(
            Err(LayoutError::TooManyMipmaps {
                mip_levels: 4,
                max_mip_levels: 3
            }),
            metadata.validate()
        );
    }

    #[test]
    fn required_size_huge_array_does_not_allocate() {
        let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 1, 1, 1 << 40, 1);
        assert_eq!(Ok(4 << 40), metadata.required_size());
    }

    #[test]
    fn required_size_overflow() {
        let metadata = Metadata::new_2d(PixelFormat::R32G32B32A32Float, 1, 1, u64::MAX, 1);
        assert_eq!(Err(LayoutError::SizeOverflow), metadata.required_size());
    }

    #[test]
    fn layout_huge_surface_table_fails_allocation() {
        let metadata = Metadata::new_2d(PixelFormat::R8Unorm, 1, 1, 1 << 60, 1);
        assert!(matches!(
            metadata.layout(),
            Err(LayoutError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn max_mip_levels_uses_largest_dimension() {
        assert_eq!(4, Metadata::new_2d(PixelFormat::R8Unorm, 8, 1, 1, 1).max_mip_levels());
        assert_eq!(1, Metadata::new_1d(PixelFormat::R8Unorm, 1, 1, 1).max_mip_levels());
        assert_eq!(5, Metadata::new_3d(PixelFormat::R8Unorm, 1, 2, 16, 1).max_mip_levels());
    }

    #[test]
    fn alpha_mode_bits() {
        let flags = TexMiscFlags2(0x10).with_alpha_mode(AlphaMode::Premultiplied);
        assert_eq!(TexMiscFlags2(0x12), flags);
        assert_eq!(AlphaMode::Premultiplied, flags.alpha_mode());
        assert_eq!(AlphaMode::Unknown, TexMiscFlags2(0x7).alpha_mode());
    }

    #[test]
    fn dimension_values() {
        assert_eq!(Ok(TexDimension::Texture3D), TexDimension::try_from(4));
        assert_eq!(Err(1), TexDimension::try_from(1));
        assert_eq!(3, TexDimension::Texture2D as u32);
    }
}
