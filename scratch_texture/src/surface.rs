use crate::{
    convert::decode_surface,
    rgba::convert::{float_to_unorm16, float_to_unorm8},
    PixelFormat, SurfaceError,
};

/// A single (mip, item, slice) plane of a texture.
///
/// Surfaces returned by [TextureStorage](crate::TextureStorage) borrow their data
/// from the texture's pixel buffer and never own memory themselves.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Surface<T> {
    /// The mip level starting from `0` for the base level.
    pub mip: u32,
    /// The array item. This is the cube face index for cube maps.
    pub item: usize,
    /// The depth slice for 3D textures and `0` otherwise.
    pub slice: u32,
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The size in bytes of a row of pixels or a row of 4x4 blocks.
    pub row_pitch: usize,
    /// The size in bytes of the entire surface.
    pub slice_pitch: usize,
    /// The format of the bytes in [data](#structfield.data).
    pub format: PixelFormat,
    pub data: T,
}

impl<T: AsRef<[u8]>> Surface<T> {
    /// Decode the surface to RGBA floats in row-major order.
    pub fn decode_rgbaf32(&self) -> Result<Vec<[f32; 4]>, SurfaceError> {
        decode_surface(self.format, self.width, self.height, self.data.as_ref())
    }

    /// Decode the surface to tightly packed RGBA8 bytes.
    ///
    /// Values outside the unsigned normalized range are clamped.
    pub fn decode_rgba8(&self) -> Result<Vec<u8>, SurfaceError> {
        Ok(self
            .decode_rgbaf32()?
            .into_iter()
            .flat_map(|pixel| pixel.map(float_to_unorm8))
            .collect())
    }

    /// Decode the surface to tightly packed RGBA16 values.
    ///
    /// Values outside the unsigned normalized range are clamped.
    pub fn decode_rgba16(&self) -> Result<Vec<u16>, SurfaceError> {
        Ok(self
            .decode_rgbaf32()?
            .into_iter()
            .flat_map(|pixel| pixel.map(float_to_unorm16))
            .collect())
    }

    /// Decode the surface to an [image::RgbaImage].
    pub fn to_image(&self) -> Result<image::RgbaImage, SurfaceError> {
        let data = self.decode_rgba8()?;
        let actual = data.len();
        image::RgbaImage::from_raw(self.width, self.height, data).ok_or(
            SurfaceError::NotEnoughData {
                expected: self.width as usize * self.height as usize * 4,
                actual,
            },
        )
    }
}
