use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A DXGI pixel format identifier.
///
/// The discriminants match the `DXGI_FORMAT` values used by DDS files and
/// Direct3D so a format can be converted to and from its `u32` value without
/// a lookup table.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, EnumIter, Display, EnumString)]
#[repr(u32)]
pub enum PixelFormat {
    Unknown = 0,
    R32G32B32A32Typeless = 1,
    R32G32B32A32Float = 2,
    R32G32B32A32Uint = 3,
    R32G32B32A32Sint = 4,
    R32G32B32Typeless = 5,
    R32G32B32Float = 6,
    R32G32B32Uint = 7,
    R32G32B32Sint = 8,
    R16G16B16A16Typeless = 9,
    R16G16B16A16Float = 10,
    R16G16B16A16Unorm = 11,
    R16G16B16A16Uint = 12,
    R16G16B16A16Snorm = 13,
    R16G16B16A16Sint = 14,
    R32G32Typeless = 15,
    R32G32Float = 16,
    R32G32Uint = 17,
    R32G32Sint = 18,
    R32G8X24Typeless = 19,
    D32FloatS8X24Uint = 20,
    R32FloatX8X24Typeless = 21,
    X32TypelessG8X24Uint = 22,
    R10G10B10A2Typeless = 23,
    R10G10B10A2Unorm = 24,
    R10G10B10A2Uint = 25,
    R11G11B10Float = 26,
    R8G8B8A8Typeless = 27,
    R8G8B8A8Unorm = 28,
    R8G8B8A8UnormSrgb = 29,
    R8G8B8A8Uint = 30,
    R8G8B8A8Snorm = 31,
    R8G8B8A8Sint = 32,
    R16G16Typeless = 33,
    R16G16Float = 34,
    R16G16Unorm = 35,
    R16G16Uint = 36,
    R16G16Snorm = 37,
    R16G16Sint = 38,
    R32Typeless = 39,
    D32Float = 40,
    R32Float = 41,
    R32Uint = 42,
    R32Sint = 43,
    R24G8Typeless = 44,
    D24UnormS8Uint = 45,
    R24UnormX8Typeless = 46,
    X24TypelessG8Uint = 47,
    R8G8Typeless = 48,
    R8G8Unorm = 49,
    R8G8Uint = 50,
    R8G8Snorm = 51,
    R8G8Sint = 52,
    R16Typeless = 53,
    R16Float = 54,
    D16Unorm = 55,
    R16Unorm = 56,
    R16Uint = 57,
    R16Snorm = 58,
    R16Sint = 59,
    R8Typeless = 60,
    R8Unorm = 61,
    R8Uint = 62,
    R8Snorm = 63,
    R8Sint = 64,
    A8Unorm = 65,
    R1Unorm = 66,
    R9G9B9E5SharedExp = 67,
    R8G8B8G8Unorm = 68,
    G8R8G8B8Unorm = 69,
    BC1Typeless = 70,
    BC1Unorm = 71,
    BC1UnormSrgb = 72,
    BC2Typeless = 73,
    BC2Unorm = 74,
    BC2UnormSrgb = 75,
    BC3Typeless = 76,
    BC3Unorm = 77,
    BC3UnormSrgb = 78,
    BC4Typeless = 79,
    BC4Unorm = 80,
    BC4Snorm = 81,
    BC5Typeless = 82,
    BC5Unorm = 83,
    BC5Snorm = 84,
    B5G6R5Unorm = 85,
    B5G5R5A1Unorm = 86,
    B8G8R8A8Unorm = 87,
    B8G8R8X8Unorm = 88,
    R10G10B10XrBiasA2Unorm = 89,
    B8G8R8A8Typeless = 90,
    B8G8R8A8UnormSrgb = 91,
    B8G8R8X8Typeless = 92,
    B8G8R8X8UnormSrgb = 93,
    BC6HTypeless = 94,
    BC6HUf16 = 95,
    BC6HSf16 = 96,
    BC7Typeless = 97,
    BC7Unorm = 98,
    BC7UnormSrgb = 99,
    Ayuv = 100,
    Y410 = 101,
    Y416 = 102,
    Nv12 = 103,
    P010 = 104,
    P016 = 105,
    Opaque420 = 106,
    Yuy2 = 107,
    Y210 = 108,
    Y216 = 109,
    Nv11 = 110,
    Ai44 = 111,
    Ia44 = 112,
    P8 = 113,
    A8P8 = 114,
    B4G4R4A4Unorm = 115,
    /// Forces the enumeration to compile to 32 bits. Never a valid texture format.
    ForceUInt = 0xffff_ffff,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
#[error("{0:#x} is not a known DXGI format value")]
pub struct UnknownFormatValue(pub u32);

impl TryFrom<u32> for PixelFormat {
    type Error = UnknownFormatValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PixelFormat::iter()
            .find(|f| *f as u32 == value)
            .ok_or(UnknownFormatValue(value))
    }
}

impl From<PixelFormat> for u32 {
    fn from(value: PixelFormat) -> Self {
        value as u32
    }
}

impl PixelFormat {
    /// Returns `true` for the 4x4 block compressed BC1 to BC7 formats.
    ///
    /// Every other format, including packed and planar video formats,
    /// is stored with a linear per texel layout.
    pub fn is_compressed(&self) -> bool {
        use PixelFormat as F;
        matches!(
            self,
            F::BC1Typeless
                | F::BC1Unorm
                | F::BC1UnormSrgb
                | F::BC2Typeless
                | F::BC2Unorm
                | F::BC2UnormSrgb
                | F::BC3Typeless
                | F::BC3Unorm
                | F::BC3UnormSrgb
                | F::BC4Typeless
                | F::BC4Unorm
                | F::BC4Snorm
                | F::BC5Typeless
                | F::BC5Unorm
                | F::BC5Snorm
                | F::BC6HTypeless
                | F::BC6HUf16
                | F::BC6HSf16
                | F::BC7Typeless
                | F::BC7Unorm
                | F::BC7UnormSrgb
        )
    }

    /// Formats that pack two texels into a shared 4:2:2 element.
    pub fn is_packed(&self) -> bool {
        use PixelFormat as F;
        matches!(
            self,
            F::R8G8B8G8Unorm | F::G8R8G8B8Unorm | F::Yuy2 | F::Y210 | F::Y216
        )
    }

    /// Video formats with a separate chroma plane after the luma plane.
    pub fn is_planar(&self) -> bool {
        use PixelFormat as F;
        matches!(
            self,
            F::Nv12 | F::P010 | F::P016 | F::Opaque420 | F::Nv11
        )
    }

    pub fn is_srgb(&self) -> bool {
        use PixelFormat as F;
        matches!(
            self,
            F::R8G8B8A8UnormSrgb
                | F::BC1UnormSrgb
                | F::BC2UnormSrgb
                | F::BC3UnormSrgb
                | F::B8G8R8A8UnormSrgb
                | F::B8G8R8X8UnormSrgb
                | F::BC7UnormSrgb
        )
    }

    pub fn is_typeless(&self) -> bool {
        use PixelFormat as F;
        matches!(
            self,
            F::R32G32B32A32Typeless
                | F::R32G32B32Typeless
                | F::R16G16B16A16Typeless
                | F::R32G32Typeless
                | F::R32G8X24Typeless
                | F::R32FloatX8X24Typeless
                | F::X32TypelessG8X24Uint
                | F::R10G10B10A2Typeless
                | F::R8G8B8A8Typeless
                | F::R16G16Typeless
                | F::R32Typeless
                | F::R24G8Typeless
                | F::R24UnormX8Typeless
                | F::X24TypelessG8Uint
                | F::R8G8Typeless
                | F::R16Typeless
                | F::R8Typeless
                | F::BC1Typeless
                | F::BC2Typeless
                | F::BC3Typeless
                | F::BC4Typeless
                | F::BC5Typeless
                | F::B8G8R8A8Typeless
                | F::B8G8R8X8Typeless
                | F::BC6HTypeless
                | F::BC7Typeless
        )
    }

    /// `true` if some channel stores more than 8 bits of precision.
    pub fn is_high_precision(&self) -> bool {
        use PixelFormat as F;
        matches!(
            self,
            F::R32G32B32A32Typeless
                | F::R32G32B32A32Float
                | F::R32G32B32A32Uint
                | F::R32G32B32A32Sint
                | F::R32G32B32Typeless
                | F::R32G32B32Float
                | F::R32G32B32Uint
                | F::R32G32B32Sint
                | F::R16G16B16A16Typeless
                | F::R16G16B16A16Float
                | F::R16G16B16A16Unorm
                | F::R16G16B16A16Uint
                | F::R16G16B16A16Snorm
                | F::R16G16B16A16Sint
                | F::R32G32Typeless
                | F::R32G32Float
                | F::R32G32Uint
                | F::R32G32Sint
                | F::R32G8X24Typeless
                | F::D32FloatS8X24Uint
                | F::R32FloatX8X24Typeless
                | F::R10G10B10A2Typeless
                | F::R10G10B10A2Unorm
                | F::R10G10B10A2Uint
                | F::R11G11B10Float
                | F::R16G16Typeless
                | F::R16G16Float
                | F::R16G16Unorm
                | F::R16G16Uint
                | F::R16G16Snorm
                | F::R16G16Sint
                | F::R32Typeless
                | F::D32Float
                | F::R32Float
                | F::R32Uint
                | F::R32Sint
                | F::R24G8Typeless
                | F::D24UnormS8Uint
                | F::R24UnormX8Typeless
                | F::R16Typeless
                | F::R16Float
                | F::D16Unorm
                | F::R16Unorm
                | F::R16Uint
                | F::R16Snorm
                | F::R16Sint
                | F::R9G9B9E5SharedExp
                | F::R10G10B10XrBiasA2Unorm
                | F::BC6HTypeless
                | F::BC6HUf16
                | F::BC6HSf16
                | F::Y410
                | F::Y416
                | F::P010
                | F::P016
                | F::Y210
                | F::Y216
        )
    }

    /// The average number of bits used to store a single texel.
    ///
    /// Returns `0` for [PixelFormat::Unknown] and [PixelFormat::ForceUInt].
    pub fn bits_per_pixel(&self) -> u32 {
        use PixelFormat as F;
        match self {
            F::R32G32B32A32Typeless
            | F::R32G32B32A32Float
            | F::R32G32B32A32Uint
            | F::R32G32B32A32Sint => 128,

            F::R32G32B32Typeless | F::R32G32B32Float | F::R32G32B32Uint | F::R32G32B32Sint => 96,

            F::R16G16B16A16Typeless
            | F::R16G16B16A16Float
            | F::R16G16B16A16Unorm
            | F::R16G16B16A16Uint
            | F::R16G16B16A16Snorm
            | F::R16G16B16A16Sint
            | F::R32G32Typeless
            | F::R32G32Float
            | F::R32G32Uint
            | F::R32G32Sint
            | F::R32G8X24Typeless
            | F::D32FloatS8X24Uint
            | F::R32FloatX8X24Typeless
            | F::X32TypelessG8X24Uint
            | F::Y416
            | F::Y210
            | F::Y216 => 64,

            F::R10G10B10A2Typeless
            | F::R10G10B10A2Unorm
            | F::R10G10B10A2Uint
            | F::R11G11B10Float
            | F::R8G8B8A8Typeless
            | F::R8G8B8A8Unorm
            | F::R8G8B8A8UnormSrgb
            | F::R8G8B8A8Uint
            | F::R8G8B8A8Snorm
            | F::R8G8B8A8Sint
            | F::R16G16Typeless
            | F::R16G16Float
            | F::R16G16Unorm
            | F::R16G16Uint
            | F::R16G16Snorm
            | F::R16G16Sint
            | F::R32Typeless
            | F::D32Float
            | F::R32Float
            | F::R32Uint
            | F::R32Sint
            | F::R24G8Typeless
            | F::D24UnormS8Uint
            | F::R24UnormX8Typeless
            | F::X24TypelessG8Uint
            | F::R9G9B9E5SharedExp
            | F::R8G8B8G8Unorm
            | F::G8R8G8B8Unorm
            | F::B8G8R8A8Unorm
            | F::B8G8R8X8Unorm
            | F::R10G10B10XrBiasA2Unorm
            | F::B8G8R8A8Typeless
            | F::B8G8R8A8UnormSrgb
            | F::B8G8R8X8Typeless
            | F::B8G8R8X8UnormSrgb
            | F::Ayuv
            | F::Y410
            | F::Yuy2 => 32,

            F::P010 | F::P016 => 24,

            F::R8G8Typeless
            | F::R8G8Unorm
            | F::R8G8Uint
            | F::R8G8Snorm
            | F::R8G8Sint
            | F::R16Typeless
            | F::R16Float
            | F::D16Unorm
            | F::R16Unorm
            | F::R16Uint
            | F::R16Snorm
            | F::R16Sint
            | F::B5G6R5Unorm
            | F::B5G5R5A1Unorm
            | F::A8P8
            | F::B4G4R4A4Unorm => 16,

            F::Nv12 | F::Opaque420 | F::Nv11 => 12,

            F::R8Typeless
            | F::R8Unorm
            | F::R8Uint
            | F::R8Snorm
            | F::R8Sint
            | F::A8Unorm
            | F::Ai44
            | F::Ia44
            | F::P8
            | F::BC2Typeless
            | F::BC2Unorm
            | F::BC2UnormSrgb
            | F::BC3Typeless
            | F::BC3Unorm
            | F::BC3UnormSrgb
            | F::BC5Typeless
            | F::BC5Unorm
            | F::BC5Snorm
            | F::BC6HTypeless
            | F::BC6HUf16
            | F::BC6HSf16
            | F::BC7Typeless
            | F::BC7Unorm
            | F::BC7UnormSrgb => 8,

            F::R1Unorm => 1,

            F::BC1Typeless
            | F::BC1Unorm
            | F::BC1UnormSrgb
            | F::BC4Typeless
            | F::BC4Unorm
            | F::BC4Snorm => 4,

            F::Unknown | F::ForceUInt => 0,
        }
    }

    /// The dimensions in pixels of the smallest addressable unit of data.
    pub fn block_dimensions(&self) -> (u32, u32, u32) {
        if self.is_compressed() {
            (4, 4, 1)
        } else {
            (1, 1, 1)
        }
    }

    /// The size in bytes of a single 4x4 block for compressed formats
    /// or a single texel element for byte aligned linear formats.
    pub fn block_size_in_bytes(&self) -> usize {
        use PixelFormat as F;
        match self {
            F::BC1Typeless
            | F::BC1Unorm
            | F::BC1UnormSrgb
            | F::BC4Typeless
            | F::BC4Unorm
            | F::BC4Snorm => 8,
            f if f.is_compressed() => 16,
            F::R8G8B8G8Unorm | F::G8R8G8B8Unorm | F::Yuy2 => 4,
            F::Y210 | F::Y216 => 8,
            f => f.bits_per_pixel().div_ceil(8) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_values_match_dxgi() {
        assert_eq!(0, PixelFormat::Unknown as u32);
        assert_eq!(28, PixelFormat::R8G8B8A8Unorm as u32);
        assert_eq!(71, PixelFormat::BC1Unorm as u32);
        assert_eq!(98, PixelFormat::BC7Unorm as u32);
        assert_eq!(115, PixelFormat::B4G4R4A4Unorm as u32);
        assert_eq!(u32::MAX, PixelFormat::ForceUInt as u32);
    }

    #[test]
    fn format_from_u32_round_trips_every_value() {
        for format in PixelFormat::iter() {
            assert_eq!(Ok(format), PixelFormat::try_from(format as u32));
        }
    }

    #[test]
    fn format_from_u32_rejects_gaps() {
        assert_eq!(Err(UnknownFormatValue(116)), PixelFormat::try_from(116));
        assert_eq!(Err(UnknownFormatValue(130)), PixelFormat::try_from(130));
        assert_eq!(
            Err(UnknownFormatValue(0xffff_fffe)),
            PixelFormat::try_from(0xffff_fffe)
        );
    }

    #[test]
    fn compressed_formats_partition_the_enumeration() {
        let compressed: Vec<_> = PixelFormat::iter().filter(|f| f.is_compressed()).collect();
        let linear: Vec<_> = PixelFormat::iter().filter(|f| !f.is_compressed()).collect();

        assert_eq!(21, compressed.len());
        assert_eq!(PixelFormat::iter().count(), compressed.len() + linear.len());
        assert!(compressed.iter().all(|f| !linear.contains(f)));
    }

    #[test]
    fn compressed_formats_use_4x4_blocks() {
        for format in PixelFormat::iter().filter(|f| f.is_compressed()) {
            assert_eq!((4, 4, 1), format.block_dimensions());
            assert_eq!(
                format.bits_per_pixel() as usize * 16 / 8,
                format.block_size_in_bytes()
            );
        }
    }

    #[test]
    fn packed_and_planar_formats_are_not_compressed() {
        assert!(!PixelFormat::Yuy2.is_compressed());
        assert!(!PixelFormat::Nv12.is_compressed());
        assert!(!PixelFormat::R8G8B8G8Unorm.is_compressed());
        assert!(PixelFormat::Yuy2.is_packed());
        assert!(PixelFormat::Nv12.is_planar());
    }

    #[test]
    fn sentinel_formats_have_no_size() {
        assert_eq!(0, PixelFormat::Unknown.bits_per_pixel());
        assert_eq!(0, PixelFormat::ForceUInt.bits_per_pixel());
        assert!(!PixelFormat::ForceUInt.is_compressed());
    }

    #[test]
    fn every_known_format_has_a_size() {
        for format in PixelFormat::iter()
            .filter(|f| !matches!(f, PixelFormat::Unknown | PixelFormat::ForceUInt))
        {
            assert!(format.bits_per_pixel() > 0, "{format:?}");
        }
    }

    #[test]
    fn high_precision_formats() {
        assert!(PixelFormat::R16Unorm.is_high_precision());
        assert!(PixelFormat::R32G32B32A32Float.is_high_precision());
        assert!(PixelFormat::BC6HUf16.is_high_precision());
        assert!(PixelFormat::R10G10B10A2Unorm.is_high_precision());
        assert!(!PixelFormat::R8G8B8A8Unorm.is_high_precision());
        assert!(!PixelFormat::BC7Unorm.is_high_precision());
        assert!(!PixelFormat::B5G6R5Unorm.is_high_precision());
    }

    #[test]
    fn block_size_linear() {
        assert_eq!(4, PixelFormat::R8G8B8A8Unorm.block_size_in_bytes());
        assert_eq!(16, PixelFormat::R32G32B32A32Float.block_size_in_bytes());
        assert_eq!(2, PixelFormat::B5G6R5Unorm.block_size_in_bytes());
        assert_eq!(1, PixelFormat::R1Unorm.block_size_in_bytes());
    }
}
