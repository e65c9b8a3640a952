use ddsfile::{Caps2, D3D10ResourceDimension, D3DFormat, Dds, DxgiFormat, FourCC, MiscFlag};
use num_traits::FromPrimitive;
use tracing::trace;

use crate::{
    AlphaMode, CodecError, EncodeOptions, LayoutError, Metadata, PixelFormat, SurfaceError,
    TexDimension, TexMiscFlags, TexMiscFlags2, TextureStorage,
};

use super::ContainerCodec;

/// DirectDraw Surface files with legacy or DX10 headers.
///
/// Files are always written with a DX10 header.
#[derive(Debug, Default, Clone, Copy)]
pub struct DdsCodec;

impl ContainerCodec for DdsCodec {
    fn decode(&self, bytes: &[u8]) -> Result<(Metadata, Vec<u8>), CodecError> {
        let mut reader = std::io::Cursor::new(bytes);
        let dds = Dds::read(&mut reader)?;

        let metadata = dds_metadata(&dds)?;
        trace!(?metadata, "read DDS header");

        let expected = metadata.required_size()?;
        let mut data = dds.data;
        if data.len() < expected {
            return Err(SurfaceError::NotEnoughData {
                expected,
                actual: data.len(),
            }
            .into());
        }
        data.truncate(expected);

        Ok((metadata, data))
    }

    fn encode(
        &self,
        storage: &TextureStorage,
        _options: &EncodeOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let metadata = storage.metadata();
        let format = DxgiFormat::from_u32(metadata.format.into()).ok_or(
            SurfaceError::UnsupportedEncodeFormat {
                format: metadata.format,
            },
        )?;

        let is_cubemap = metadata.is_cubemap();
        let array_size =
            u32::try_from(metadata.array_size).map_err(|_| LayoutError::SizeOverflow)?;

        // Dimensions and mip counts are validated to fit in u32 by the layout.
        let mut dds = Dds::new_dxgi(ddsfile::NewDxgiParams {
            height: metadata.height as u32,
            width: metadata.width as u32,
            depth: metadata.is_volume().then_some(metadata.depth as u32),
            format,
            mipmap_levels: Some(metadata.mip_levels as u32),
            // ddsfile divides by 6 for cube maps.
            array_layers: Some(array_size),
            caps2: metadata.is_volume().then_some(Caps2::VOLUME),
            is_cubemap,
            resource_dimension: match metadata.dimension {
                TexDimension::Texture1D => D3D10ResourceDimension::Texture1D,
                TexDimension::Texture2D => D3D10ResourceDimension::Texture2D,
                TexDimension::Texture3D => D3D10ResourceDimension::Texture3D,
            },
            alpha_mode: dds_alpha_mode(metadata.alpha_mode()),
        })?;

        dds.data = storage.pixels().to_vec();

        let mut writer = Vec::new();
        dds.write(&mut writer)?;
        Ok(writer)
    }
}

fn dds_metadata(dds: &Dds) -> Result<Metadata, CodecError> {
    let format = dds_pixel_format(dds).ok_or(SurfaceError::UnsupportedDecodeFormat {
        format: PixelFormat::Unknown,
    })?;

    let width = dds.header.width as u64;
    let height = dds.header.height as u64;
    let depth = dds.header.depth.unwrap_or(1).max(1) as u64;
    let mip_levels = dds.header.mip_map_count.unwrap_or(1).max(1) as u64;

    let metadata = match &dds.header10 {
        Some(header10) => {
            let is_cubemap = header10.misc_flag.contains(MiscFlag::TEXTURECUBE);
            let array_size = header10.array_size.max(1) as u64;
            let dimension = match header10.resource_dimension {
                D3D10ResourceDimension::Texture1D => TexDimension::Texture1D,
                D3D10ResourceDimension::Texture3D => TexDimension::Texture3D,
                _ => TexDimension::Texture2D,
            };

            Metadata {
                width,
                height,
                depth: if dimension == TexDimension::Texture3D {
                    depth
                } else {
                    1
                },
                array_size: if is_cubemap {
                    array_size * 6
                } else {
                    array_size
                },
                mip_levels,
                misc_flags: if is_cubemap {
                    TexMiscFlags::TEXTURE_CUBE
                } else {
                    TexMiscFlags::NONE
                },
                misc_flags2: TexMiscFlags2::default()
                    .with_alpha_mode(alpha_mode(&header10.alpha_mode)),
                format,
                dimension,
            }
        }
        None => {
            let caps2 = dds.header.caps2;
            if caps2.contains(Caps2::CUBEMAP) {
                Metadata::new_cube(format, width, height, 1, mip_levels)
            } else if caps2.contains(Caps2::VOLUME) || depth > 1 {
                Metadata::new_3d(format, width, height, depth, mip_levels)
            } else {
                Metadata::new_2d(format, width, height, 1, mip_levels)
            }
        }
    };

    Ok(metadata)
}

fn dds_pixel_format(dds: &Dds) -> Option<PixelFormat> {
    // Only DX10 headers store a DXGI format.
    // ddsfile maps some legacy formats to sRGB variants, so resolve those here.
    match &dds.header10 {
        Some(header10) => PixelFormat::try_from(header10.dxgi_format as u32).ok(),
        None => dds
            .get_d3d_format()
            .and_then(pixel_format_from_d3d)
            .or_else(|| {
                dds.header
                    .spf
                    .fourcc
                    .as_ref()
                    .and_then(pixel_format_from_fourcc)
            }),
    }
}

fn pixel_format_from_d3d(format: D3DFormat) -> Option<PixelFormat> {
    match format {
        D3DFormat::A8B8G8R8 => Some(PixelFormat::R8G8B8A8Unorm),
        D3DFormat::A8R8G8B8 => Some(PixelFormat::B8G8R8A8Unorm),
        D3DFormat::X8R8G8B8 => Some(PixelFormat::B8G8R8X8Unorm),
        D3DFormat::R5G6B5 => Some(PixelFormat::B5G6R5Unorm),
        D3DFormat::A1R5G5B5 => Some(PixelFormat::B5G5R5A1Unorm),
        D3DFormat::A4R4G4B4 => Some(PixelFormat::B4G4R4A4Unorm),
        D3DFormat::A2B10G10R10 => Some(PixelFormat::R10G10B10A2Unorm),
        D3DFormat::G16R16 => Some(PixelFormat::R16G16Unorm),
        D3DFormat::A16B16G16R16 => Some(PixelFormat::R16G16B16A16Unorm),
        D3DFormat::A8 => Some(PixelFormat::A8Unorm),
        D3DFormat::L8 => Some(PixelFormat::R8Unorm),
        D3DFormat::L16 => Some(PixelFormat::R16Unorm),
        D3DFormat::R16F => Some(PixelFormat::R16Float),
        D3DFormat::G16R16F => Some(PixelFormat::R16G16Float),
        D3DFormat::A16B16G16R16F => Some(PixelFormat::R16G16B16A16Float),
        D3DFormat::R32F => Some(PixelFormat::R32Float),
        D3DFormat::G32R32F => Some(PixelFormat::R32G32Float),
        D3DFormat::A32B32G32R32F => Some(PixelFormat::R32G32B32A32Float),
        D3DFormat::DXT1 => Some(PixelFormat::BC1Unorm),
        D3DFormat::DXT2 | D3DFormat::DXT3 => Some(PixelFormat::BC2Unorm),
        D3DFormat::DXT4 | D3DFormat::DXT5 => Some(PixelFormat::BC3Unorm),
        _ => None,
    }
}

const ATI1: u32 = u32::from_le_bytes(*b"ATI1");
const ATI2: u32 = u32::from_le_bytes(*b"ATI2");
const BC5U: u32 = u32::from_le_bytes(*b"BC5U");

fn pixel_format_from_fourcc(fourcc: &FourCC) -> Option<PixelFormat> {
    match fourcc.0 {
        FourCC::DXT1 => Some(PixelFormat::BC1Unorm),
        FourCC::DXT2 | FourCC::DXT3 => Some(PixelFormat::BC2Unorm),
        FourCC::DXT4 | FourCC::DXT5 => Some(PixelFormat::BC3Unorm),
        ATI1 | FourCC::BC4_UNORM => Some(PixelFormat::BC4Unorm),
        FourCC::BC4_SNORM => Some(PixelFormat::BC4Snorm),
        ATI2 | BC5U => Some(PixelFormat::BC5Unorm),
        FourCC::BC5_SNORM => Some(PixelFormat::BC5Snorm),
        _ => None,
    }
}

fn alpha_mode(mode: &ddsfile::AlphaMode) -> AlphaMode {
    match mode {
        ddsfile::AlphaMode::Straight => AlphaMode::Straight,
        ddsfile::AlphaMode::PreMultiplied => AlphaMode::Premultiplied,
        ddsfile::AlphaMode::Opaque => AlphaMode::Opaque,
        ddsfile::AlphaMode::Custom => AlphaMode::Custom,
        _ => AlphaMode::Unknown,
    }
}

fn dds_alpha_mode(mode: AlphaMode) -> ddsfile::AlphaMode {
    match mode {
        AlphaMode::Unknown => ddsfile::AlphaMode::Unknown,
        AlphaMode::Straight => ddsfile::AlphaMode::Straight,
        AlphaMode::Premultiplied => ddsfile::AlphaMode::PreMultiplied,
        AlphaMode::Opaque => ddsfile::AlphaMode::Opaque,
        AlphaMode::Custom => ddsfile::AlphaMode::Custom,
    }
}
