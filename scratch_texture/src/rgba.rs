use bytemuck::{Pod, Zeroable};
use half::f16;

use crate::SurfaceError;

pub(crate) mod convert;
use convert::*;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgbaf32([f32; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgbf32([f32; 3]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgf32([f32; 2]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rf32(f32);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgbaf16([f16; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgf16([f16; 2]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rf16(f16);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgba16([u16; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgba16Snorm([i16; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rg16([u16; 2]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rg16Snorm([i16; 2]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct R16(u16);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct R16Snorm(i16);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgb10a2(u32);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgba8([u8; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rgba8Snorm([i8; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rg8([u8; 2]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Rg8Snorm([i8; 2]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct R8(u8);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct R8Snorm(i8);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct A8(u8);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Bgra8([u8; 4]);

/// BGRA8 with the alpha byte ignored on read and written as 255.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Bgrx8([u8; 4]);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct B5G6R5(u16);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Bgr5a1(u16);

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Bgra4(u16);

// TODO: Don't assume system endianness?
/// A pixel layout that converts to and from straight RGBA floats.
///
/// Channels missing from the layout read as 0.0 except alpha which reads as 1.0.
pub trait Pixel: Pod {
    fn to_rgba(self) -> [f32; 4];
    fn from_rgba(rgba: [f32; 4]) -> Self;
}

impl Pixel for Rgbaf32 {
    fn to_rgba(self) -> [f32; 4] {
        self.0
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        Self(rgba)
    }
}

impl Pixel for Rgbf32 {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g, b] = self.0;
        [r, g, b, 1.0]
    }

    fn from_rgba([r, g, b, _]: [f32; 4]) -> Self {
        Self([r, g, b])
    }
}

impl Pixel for Rgf32 {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g] = self.0;
        [r, g, 0.0, 1.0]
    }

    fn from_rgba([r, g, _, _]: [f32; 4]) -> Self {
        Self([r, g])
    }
}

impl Pixel for Rf32 {
    fn to_rgba(self) -> [f32; 4] {
        // Single channel formats display as grayscale.
        let r = self.0;
        [r, r, r, 1.0]
    }

    fn from_rgba([r, _, _, _]: [f32; 4]) -> Self {
        Self(r)
    }
}

impl Pixel for Rgbaf16 {
    fn to_rgba(self) -> [f32; 4] {
        self.0.map(f16::to_f32)
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        Self(rgba.map(f16::from_f32))
    }
}

impl Pixel for Rgf16 {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g] = self.0.map(f16::to_f32);
        [r, g, 0.0, 1.0]
    }

    fn from_rgba([r, g, _, _]: [f32; 4]) -> Self {
        Self([f16::from_f32(r), f16::from_f32(g)])
    }
}

impl Pixel for Rf16 {
    fn to_rgba(self) -> [f32; 4] {
        let r = self.0.to_f32();
        [r, r, r, 1.0]
    }

    fn from_rgba([r, _, _, _]: [f32; 4]) -> Self {
        Self(f16::from_f32(r))
    }
}

impl Pixel for Rgba16 {
    fn to_rgba(self) -> [f32; 4] {
        self.0.map(unorm16_to_float)
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        Self(rgba.map(float_to_unorm16))
    }
}

impl Pixel for Rgba16Snorm {
    fn to_rgba(self) -> [f32; 4] {
        self.0.map(snorm16_to_float)
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        Self(rgba.map(float_to_snorm16))
    }
}

impl Pixel for Rg16 {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g] = self.0.map(unorm16_to_float);
        [r, g, 0.0, 1.0]
    }

    fn from_rgba([r, g, _, _]: [f32; 4]) -> Self {
        Self([float_to_unorm16(r), float_to_unorm16(g)])
    }
}

impl Pixel for Rg16Snorm {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g] = self.0.map(snorm16_to_float);
        [r, g, 0.0, 1.0]
    }

    fn from_rgba([r, g, _, _]: [f32; 4]) -> Self {
        Self([float_to_snorm16(r), float_to_snorm16(g)])
    }
}

impl Pixel for R16 {
    fn to_rgba(self) -> [f32; 4] {
        let r = unorm16_to_float(self.0);
        [r, r, r, 1.0]
    }

    fn from_rgba([r, _, _, _]: [f32; 4]) -> Self {
        Self(float_to_unorm16(r))
    }
}

impl Pixel for R16Snorm {
    fn to_rgba(self) -> [f32; 4] {
        let r = snorm16_to_float(self.0);
        [r, r, r, 1.0]
    }

    fn from_rgba([r, _, _, _]: [f32; 4]) -> Self {
        Self(float_to_snorm16(r))
    }
}

impl Pixel for Rgb10a2 {
    fn to_rgba(self) -> [f32; 4] {
        let v = self.0;
        [
            unorm_to_float(v & 0x3ff, 10),
            unorm_to_float((v >> 10) & 0x3ff, 10),
            unorm_to_float((v >> 20) & 0x3ff, 10),
            unorm_to_float(v >> 30, 2),
        ]
    }

    fn from_rgba([r, g, b, a]: [f32; 4]) -> Self {
        Self(
            float_to_unorm(r, 10)
                | float_to_unorm(g, 10) << 10
                | float_to_unorm(b, 10) << 20
                | float_to_unorm(a, 2) << 30,
        )
    }
}

impl Pixel for Rgba8 {
    fn to_rgba(self) -> [f32; 4] {
        self.0.map(unorm8_to_float)
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        Self(rgba.map(float_to_unorm8))
    }
}

impl Pixel for Rgba8Snorm {
    fn to_rgba(self) -> [f32; 4] {
        self.0.map(snorm8_to_float)
    }

    fn from_rgba(rgba: [f32; 4]) -> Self {
        Self(rgba.map(float_to_snorm8))
    }
}

impl Pixel for Rg8 {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g] = self.0.map(unorm8_to_float);
        [r, g, 0.0, 1.0]
    }

    fn from_rgba([r, g, _, _]: [f32; 4]) -> Self {
        Self([float_to_unorm8(r), float_to_unorm8(g)])
    }
}

impl Pixel for Rg8Snorm {
    fn to_rgba(self) -> [f32; 4] {
        let [r, g] = self.0.map(snorm8_to_float);
        [r, g, 0.0, 1.0]
    }

    fn from_rgba([r, g, _, _]: [f32; 4]) -> Self {
        Self([float_to_snorm8(r), float_to_snorm8(g)])
    }
}

impl Pixel for R8 {
    fn to_rgba(self) -> [f32; 4] {
        let r = unorm8_to_float(self.0);
        [r, r, r, 1.0]
    }

    fn from_rgba([r, _, _, _]: [f32; 4]) -> Self {
        Self(float_to_unorm8(r))
    }
}

impl Pixel for R8Snorm {
    fn to_rgba(self) -> [f32; 4] {
        let r = snorm8_to_float(self.0);
        [r, r, r, 1.0]
    }

    fn from_rgba([r, _, _, _]: [f32; 4]) -> Self {
        Self(float_to_snorm8(r))
    }
}

impl Pixel for A8 {
    fn to_rgba(self) -> [f32; 4] {
        [0.0, 0.0, 0.0, unorm8_to_float(self.0)]
    }

    fn from_rgba([_, _, _, a]: [f32; 4]) -> Self {
        Self(float_to_unorm8(a))
    }
}

impl Pixel for Bgra8 {
    fn to_rgba(self) -> [f32; 4] {
        let [b, g, r, a] = self.0.map(unorm8_to_float);
        [r, g, b, a]
    }

    fn from_rgba([r, g, b, a]: [f32; 4]) -> Self {
        Self([b, g, r, a].map(float_to_unorm8))
    }
}

impl Pixel for Bgrx8 {
    fn to_rgba(self) -> [f32; 4] {
        let [b, g, r, _] = self.0.map(unorm8_to_float);
        [r, g, b, 1.0]
    }

    fn from_rgba([r, g, b, _]: [f32; 4]) -> Self {
        Self([float_to_unorm8(b), float_to_unorm8(g), float_to_unorm8(r), 255])
    }
}

impl Pixel for B5G6R5 {
    fn to_rgba(self) -> [f32; 4] {
        let v = self.0 as u32;
        [
            unorm_to_float((v >> 11) & 0x1f, 5),
            unorm_to_float((v >> 5) & 0x3f, 6),
            unorm_to_float(v & 0x1f, 5),
            1.0,
        ]
    }

    fn from_rgba([r, g, b, _]: [f32; 4]) -> Self {
        let v = float_to_unorm(r, 5) << 11 | float_to_unorm(g, 6) << 5 | float_to_unorm(b, 5);
        Self(v as u16)
    }
}

impl Pixel for Bgr5a1 {
    fn to_rgba(self) -> [f32; 4] {
        let v = self.0 as u32;
        [
            unorm_to_float((v >> 10) & 0x1f, 5),
            unorm_to_float((v >> 5) & 0x1f, 5),
            unorm_to_float(v & 0x1f, 5),
            unorm_to_float(v >> 15, 1),
        ]
    }

    fn from_rgba([r, g, b, a]: [f32; 4]) -> Self {
        let v = float_to_unorm(a, 1) << 15
            | float_to_unorm(r, 5) << 10
            | float_to_unorm(g, 5) << 5
            | float_to_unorm(b, 5);
        Self(v as u16)
    }
}

impl Pixel for Bgra4 {
    fn to_rgba(self) -> [f32; 4] {
        let v = self.0 as u32;
        [
            unorm_to_float((v >> 8) & 0xf, 4),
            unorm_to_float((v >> 4) & 0xf, 4),
            unorm_to_float(v & 0xf, 4),
            unorm_to_float(v >> 12, 4),
        ]
    }

    fn from_rgba([r, g, b, a]: [f32; 4]) -> Self {
        let v = float_to_unorm(a, 4) << 12
            | float_to_unorm(r, 4) << 8
            | float_to_unorm(g, 4) << 4
            | float_to_unorm(b, 4);
        Self(v as u16)
    }
}

/// Decode `width` x `height` pixels of type `P` to RGBA floats.
pub fn decode_rgba<P: Pixel>(
    width: u32,
    height: u32,
    data: &[u8],
) -> Result<Vec<[f32; 4]>, SurfaceError> {
    let expected = validate_length(width, height, std::mem::size_of::<P>(), data.len())?;

    // The data is not guaranteed to be aligned for P.
    Ok(data[..expected]
        .chunks_exact(std::mem::size_of::<P>())
        .map(|bytes| bytemuck::pod_read_unaligned::<P>(bytes).to_rgba())
        .collect())
}

/// Encode `width` x `height` RGBA floats to pixels of type `P`.
pub fn encode_rgba<P: Pixel>(
    width: u32,
    height: u32,
    rgba: &[[f32; 4]],
) -> Result<Vec<u8>, SurfaceError> {
    let pixel_count = validate_length(width, height, 1, rgba.len())?;

    let mut data = Vec::with_capacity(pixel_count * std::mem::size_of::<P>());
    for pixel in &rgba[..pixel_count] {
        data.extend_from_slice(bytemuck::bytes_of(&P::from_rgba(*pixel)));
    }
    Ok(data)
}

fn validate_length(
    width: u32,
    height: u32,
    size: usize,
    actual: usize,
) -> Result<usize, SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::ZeroSizedSurface {
            width,
            height,
            depth: 1,
        });
    }

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(size))
        .ok_or(SurfaceError::PixelCountWouldOverflow {
            width,
            height,
            depth: 1,
        })?;

    if actual < expected {
        Err(SurfaceError::NotEnoughData { expected, actual })
    } else {
        Ok(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<P: Pixel>(data: &[u8]) -> Vec<[f32; 4]> {
        decode_rgba::<P>(1, 1, data).unwrap()
    }

    fn encode<P: Pixel>(rgba: [f32; 4]) -> Vec<u8> {
        encode_rgba::<P>(1, 1, &[rgba]).unwrap()
    }

    #[test]
    fn rgba8_round_trip() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let rgba = decode_rgba::<Rgba8>(2, 1, &data).unwrap();
        assert_eq!(data.to_vec(), encode_rgba::<Rgba8>(2, 1, &rgba).unwrap());
    }

    #[test]
    fn bgra8_swizzles() {
        assert_eq!(vec![[1.0, 0.0, 0.0, 1.0]], decode::<Bgra8>(&[0, 0, 255, 255]));
        assert_eq!(vec![0, 0, 255, 128], encode::<Bgra8>([1.0, 0.0, 0.0, 0.5]));
    }

    #[test]
    fn bgrx8_ignores_alpha() {
        assert_eq!(vec![[0.0, 0.0, 1.0, 1.0]], decode::<Bgrx8>(&[255, 0, 0, 0]));
        assert_eq!(vec![255, 0, 0, 255], encode::<Bgrx8>([0.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn single_channel_is_grayscale() {
        let r = 51.0 / 255.0;
        assert_eq!(vec![[r, r, r, 1.0]], decode::<R8>(&[51]));
        assert_eq!(vec![51], encode::<R8>([r, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn two_channel_zeroes_blue() {
        assert_eq!(vec![[1.0, 0.0, 0.0, 1.0]], decode::<Rg8>(&[255, 0]));
    }

    #[test]
    fn alpha_only() {
        assert_eq!(vec![[0.0, 0.0, 0.0, 1.0]], decode::<A8>(&[255]));
        assert_eq!(vec![0], encode::<A8>([1.0, 1.0, 1.0, 0.0]));
    }

    #[test]
    fn b5g6r5_channels() {
        // Red in the high bits.
        assert_eq!(vec![[1.0, 0.0, 0.0, 1.0]], decode::<B5G6R5>(&0xf800u16.to_le_bytes()));
        assert_eq!(0x07e0u16.to_le_bytes().to_vec(), encode::<B5G6R5>([0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn bgr5a1_channels() {
        assert_eq!(vec![[0.0, 0.0, 1.0, 1.0]], decode::<Bgr5a1>(&0x801fu16.to_le_bytes()));
        assert_eq!(0x7c00u16.to_le_bytes().to_vec(), encode::<Bgr5a1>([1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn bgra4_channels() {
        assert_eq!(0xf0f0u16.to_le_bytes().to_vec(), encode::<Bgra4>([0.0, 1.0, 0.0, 1.0]));
        assert_eq!(vec![[1.0, 0.0, 0.0, 0.0]], decode::<Bgra4>(&0x0f00u16.to_le_bytes()));
    }

    #[test]
    fn rgb10a2_channels() {
        let encoded = encode::<Rgb10a2>([1.0, 0.0, 1.0, 1.0]);
        assert_eq!(0xfff0_03ffu32.to_le_bytes().to_vec(), encoded);
        assert_eq!(vec![[1.0, 0.0, 1.0, 1.0]], decode::<Rgb10a2>(&encoded));
    }

    #[test]
    fn snorm8_channels() {
        assert_eq!(vec![[1.0, -1.0, 0.0, 1.0]], decode::<Rg8Snorm>(&[127, 129]));
        assert_eq!(vec![127, 129], encode::<Rg8Snorm>([1.0, -1.0, 0.0, 1.0]));
    }

    #[test]
    fn half_float_channels() {
        let encoded = encode::<Rgbaf16>([0.5, 1.0, 2.0, 1.0]);
        assert_eq!(8, encoded.len());
        assert_eq!(vec![[0.5, 1.0, 2.0, 1.0]], decode::<Rgbaf16>(&encoded));
    }

    #[test]
    fn decode_unaligned_floats() {
        // Offset the data by one byte to break f32 alignment.
        let mut data = vec![0u8];
        data.extend_from_slice(bytemuck::cast_slice(&[0.25f32, 0.5, 0.75, 1.0]));
        assert_eq!(vec![[0.25, 0.5, 0.75, 1.0]], decode::<Rgbaf32>(&data[1..]));
    }

    #[test]
    fn decode_not_enough_data() {
        let result = decode_rgba::<Rgba8>(2, 2, &[0u8; 15]);
        assert_eq!(
            Err(SurfaceError::NotEnoughData {
                expected: 16,
                actual: 15
            }),
            result
        );
    }

    #[test]
    fn encode_zero_sized() {
        let result = encode_rgba::<Rgba8>(0, 2, &[]);
        assert_eq!(
            Err(SurfaceError::ZeroSizedSurface {
                width: 0,
                height: 2,
                depth: 1
            }),
            result
        );
    }
}
