use std::path::Path;

use tracing::debug;

use crate::{
    codec, convert::convert_storage, resize, EncodeOptions, ImageFileFormat, Metadata, Operation,
    PixelFormat, Quality, Surface, SurfaceLayout, TextureError,
};

/// A single contiguous pixel buffer and the metadata describing its surfaces.
///
/// The buffer always has exactly the size required by the metadata.
#[derive(Debug, PartialEq, Clone)]
pub struct TextureStorage {
    metadata: Metadata,
    layout: Vec<SurfaceLayout>,
    pixels: Vec<u8>,
}

impl TextureStorage {
    /// Allocate zeroed storage for every surface described by `metadata`.
    pub fn new(metadata: Metadata) -> Result<Self, TextureError> {
        let layout = metadata.layout()?;
        let mut pixels = allocate(layout.total_size)?;
        pixels.resize(layout.total_size, 0);

        Ok(Self {
            metadata,
            layout: layout.surfaces,
            pixels,
        })
    }

    /// Allocate storage for `metadata` and copy the required bytes from `pixels`.
    ///
    /// Any bytes past the required size are ignored.
    pub fn with_pixels(metadata: Metadata, pixels: &[u8]) -> Result<Self, TextureError> {
        let required_size = metadata.required_size()?;
        let source = pixels
            .get(..required_size)
            .ok_or(TextureError::InvalidBufferSize {
                expected: required_size,
                actual: pixels.len(),
            })?;

        let layout = metadata.layout()?;
        let mut pixels = allocate(layout.total_size)?;
        pixels.extend_from_slice(source);

        Ok(Self {
            metadata,
            layout: layout.surfaces,
            pixels,
        })
    }

    pub(crate) fn from_vec(metadata: Metadata, mut pixels: Vec<u8>) -> Result<Self, TextureError> {
        let required_size = metadata.required_size()?;
        if pixels.len() < required_size {
            return Err(TextureError::InvalidBufferSize {
                expected: required_size,
                actual: pixels.len(),
            });
        }
        let layout = metadata.layout()?;
        pixels.truncate(layout.total_size);

        Ok(Self {
            metadata,
            layout: layout.surfaces,
            pixels,
        })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The data for all surfaces in storage order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The number of (mip, item, slice) surfaces.
    pub fn image_count(&self) -> usize {
        self.layout.len()
    }

    /// The surface for (`mip`, `item`, `slice`) or `None` if out of range.
    pub fn surface(&self, mip: u32, item: usize, slice: u32) -> Option<Surface<&[u8]>> {
        let layout = self.surface_layout(mip, item, slice)?;
        let data = self.pixels.get(layout.range())?;
        Some(self.surface_from_layout(layout, data))
    }

    /// The surface for (`mip`, `item`, `slice`) with mutable data or `None` if out of range.
    pub fn surface_mut(
        &mut self,
        mip: u32,
        item: usize,
        slice: u32,
    ) -> Option<Surface<&mut [u8]>> {
        let layout = self.surface_layout(mip, item, slice)?;
        let format = self.metadata.format;
        let data = self.pixels.get_mut(layout.range())?;
        Some(Surface {
            mip: layout.mip,
            item: layout.item,
            slice: layout.slice,
            width: layout.width,
            height: layout.height,
            row_pitch: layout.row_pitch,
            slice_pitch: layout.slice_pitch,
            format,
            data,
        })
    }

    /// Every surface in storage order.
    pub fn surfaces(&self) -> impl Iterator<Item = Surface<&[u8]>> + '_ {
        self.layout.iter().filter_map(|layout| {
            let data = self.pixels.get(layout.range())?;
            Some(self.surface_from_layout(*layout, data))
        })
    }

    pub(crate) fn write_surface(
        &mut self,
        mip: u32,
        item: usize,
        slice: u32,
        data: &[u8],
    ) -> Result<(), TextureError> {
        let surface = self
            .surface_mut(mip, item, slice)
            .ok_or(TextureError::NotFound {
                mip: mip as usize,
                item,
                slice: slice as usize,
            })?;
        let expected = surface.data.len();
        let source = data.get(..expected).ok_or(TextureError::InvalidBufferSize {
            expected,
            actual: data.len(),
        })?;
        surface.data.copy_from_slice(source);
        Ok(())
    }

    fn surface_layout(&self, mip: u32, item: usize, slice: u32) -> Option<SurfaceLayout> {
        let index = self
            .metadata
            .surface_index(mip as usize, item, slice as usize)?;
        self.layout.get(index).copied()
    }

    fn surface_from_layout<'a>(&self, layout: SurfaceLayout, data: &'a [u8]) -> Surface<&'a [u8]> {
        Surface {
            mip: layout.mip,
            item: layout.item,
            slice: layout.slice,
            width: layout.width,
            height: layout.height,
            row_pitch: layout.row_pitch,
            slice_pitch: layout.slice_pitch,
            format: self.metadata.format,
            data,
        }
    }
}

fn allocate(size: usize) -> Result<Vec<u8>, TextureError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(size)
        .map_err(|_| TextureError::AllocationFailure { size })?;
    Ok(pixels)
}

/// An owned texture with any number of mipmaps, array items and depth slices.
///
/// The texture is either empty or owns exactly one [TextureStorage].
/// Operations that modify the texture only replace the storage on success.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScratchTexture {
    storage: Option<TextureStorage>,
}

impl ScratchTexture {
    /// An empty texture without any storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// A texture with zeroed pixels for `metadata`.
    pub fn from_metadata(metadata: Metadata) -> Result<Self, TextureError> {
        Ok(Self {
            storage: Some(TextureStorage::new(metadata)?),
        })
    }

    /// A texture for `metadata` with pixels copied from `pixels`.
    ///
    /// Fails with [TextureError::InvalidBufferSize] if `pixels` is smaller than
    /// the required size for `metadata`.
    pub fn from_metadata_with_pixels(
        metadata: Metadata,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        Ok(Self {
            storage: Some(TextureStorage::with_pixels(metadata, pixels)?),
        })
    }

    /// Decode a texture from `bytes` in the container `format`.
    pub fn from_bytes(bytes: &[u8], format: ImageFileFormat) -> Result<Self, TextureError> {
        Ok(Self {
            storage: Some(codec::decode(format, bytes)?),
        })
    }

    /// Load a texture from `path` with the format inferred from the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let format = ImageFileFormat::from_path(path.as_ref());
        Self::from_file_with_format(path, format)
    }

    /// Load a texture from `path` in the container `format`.
    pub fn from_file_with_format<P: AsRef<Path>>(
        path: P,
        format: ImageFileFormat,
    ) -> Result<Self, TextureError> {
        let bytes =
            std::fs::read(path).map_err(|e| TextureError::codec(Operation::Load, e))?;
        Self::from_bytes(&bytes, format)
    }

    /// Replace the storage with zeroed pixels for `metadata`.
    pub fn initialize(&mut self, metadata: Metadata) -> Result<(), TextureError> {
        *self = Self::from_metadata(metadata)?;
        Ok(())
    }

    /// Replace the storage with pixels for `metadata` copied from `pixels`.
    pub fn initialize_with_pixels(
        &mut self,
        metadata: Metadata,
        pixels: &[u8],
    ) -> Result<(), TextureError> {
        *self = Self::from_metadata_with_pixels(metadata, pixels)?;
        Ok(())
    }

    /// Replace the storage by decoding `bytes` in the container `format`.
    pub fn load_bytes(&mut self, bytes: &[u8], format: ImageFileFormat) -> Result<(), TextureError> {
        *self = Self::from_bytes(bytes, format)?;
        Ok(())
    }

    /// Replace the storage by loading `path` with the format inferred from the extension.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TextureError> {
        *self = Self::from_file(path)?;
        Ok(())
    }

    /// Free the storage. Releasing an empty texture does nothing.
    pub fn release(&mut self) {
        if self.storage.take().is_some() {
            debug!("released texture storage");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_none()
    }

    pub fn storage(&self) -> Option<&TextureStorage> {
        self.storage.as_ref()
    }

    pub fn into_storage(self) -> Option<TextureStorage> {
        self.storage
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.storage.as_ref().map(TextureStorage::metadata)
    }

    /// The data for all surfaces or an empty slice for an empty texture.
    pub fn pixels(&self) -> &[u8] {
        self.storage
            .as_ref()
            .map(TextureStorage::pixels)
            .unwrap_or_default()
    }

    pub fn pixels_size(&self) -> usize {
        self.pixels().len()
    }

    /// The number of surfaces or `0` for an empty texture.
    pub fn image_count(&self) -> usize {
        self.storage
            .as_ref()
            .map(TextureStorage::image_count)
            .unwrap_or_default()
    }

    pub fn surface(&self, mip: u32, item: usize, slice: u32) -> Option<Surface<&[u8]>> {
        self.storage.as_ref()?.surface(mip, item, slice)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = Surface<&[u8]>> + '_ {
        self.storage.iter().flat_map(|storage| storage.surfaces())
    }

    /// Convert every surface to `format` using the default [Quality].
    pub fn convert(&mut self, format: PixelFormat) -> Result<(), TextureError> {
        self.convert_with_quality(format, Quality::default())
    }

    /// Convert every surface to `format`.
    ///
    /// The `quality` only applies when encoding to a compressed format.
    pub fn convert_with_quality(
        &mut self,
        format: PixelFormat,
        quality: Quality,
    ) -> Result<(), TextureError> {
        let converted = convert_storage(self.require_storage()?, format, quality)?;
        self.storage = Some(converted);
        Ok(())
    }

    /// Regenerate the mipmaps from the base level.
    ///
    /// A `count` of `0` generates the full chain down to 1x1 and `1` keeps only the base level.
    /// Counts longer than the full chain fail with
    /// [SurfaceError::InvalidMipmapCount](crate::SurfaceError::InvalidMipmapCount).
    pub fn generate_mipmaps(&mut self, count: u64) -> Result<(), TextureError> {
        let mipmaps =
            resize::generate_mipmaps(self.require_storage()?, count, Quality::default())?;
        self.storage = Some(mipmaps);
        Ok(())
    }

    /// Resample every item to `width` x `height`.
    ///
    /// Mipmaps are regenerated if the texture had more than one mip level.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        let resized = resize::resize(self.require_storage()?, width, height, Quality::default())?;
        self.storage = Some(resized);
        Ok(())
    }

    /// Encode the texture to the container `format` with default [EncodeOptions].
    pub fn save_to_bytes(&self, format: ImageFileFormat) -> Result<Vec<u8>, TextureError> {
        self.save_to_bytes_with_options(format, &EncodeOptions::default())
    }

    /// Encode the texture to the container `format`.
    ///
    /// Formats other than [ImageFileFormat::Dds] only store the first surface.
    pub fn save_to_bytes_with_options(
        &self,
        format: ImageFileFormat,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, TextureError> {
        codec::encode(format, self.require_storage()?, options)
    }

    /// Save the texture to `path` with the format inferred from the extension.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TextureError> {
        let format = ImageFileFormat::from_path(path.as_ref());
        self.save_file_with_format(path, format)
    }

    /// Save the texture to `path` in the container `format`.
    pub fn save_file_with_format<P: AsRef<Path>>(
        &self,
        path: P,
        format: ImageFileFormat,
    ) -> Result<(), TextureError> {
        self.save_file_with_options(path, format, &EncodeOptions::default())
    }

    /// Save the texture to `path` in the container `format` with encoder `options`.
    pub fn save_file_with_options<P: AsRef<Path>>(
        &self,
        path: P,
        format: ImageFileFormat,
        options: &EncodeOptions,
    ) -> Result<(), TextureError> {
        let bytes = self.save_to_bytes_with_options(format, options)?;
        std::fs::write(path, bytes).map_err(|e| TextureError::codec(Operation::Save, e))
    }

    /// Encode the surface (`mip`, `item`, `slice`) to PNG.
    ///
    /// Formats with more than 8 bits per channel are saved with 16 bits per channel.
    pub fn to_portable_image(
        &self,
        mip: u32,
        item: usize,
        slice: u32,
    ) -> Result<Vec<u8>, TextureError> {
        let surface = self.require_surface(mip, item, slice)?;
        codec::portable_image(&surface).map_err(|e| TextureError::codec(Operation::Extract, e))
    }

    /// Decode the surface (`mip`, `item`, `slice`) to an RGBA8 image.
    pub fn to_image(
        &self,
        mip: u32,
        item: usize,
        slice: u32,
    ) -> Result<image::RgbaImage, TextureError> {
        let surface = self.require_surface(mip, item, slice)?;
        surface
            .to_image()
            .map_err(|e| TextureError::codec(Operation::Extract, e))
    }

    fn require_storage(&self) -> Result<&TextureStorage, TextureError> {
        self.storage.as_ref().ok_or(TextureError::EmptyTexture)
    }

    fn require_surface(
        &self,
        mip: u32,
        item: usize,
        slice: u32,
    ) -> Result<Surface<&[u8]>, TextureError> {
        self.require_storage()?
            .surface(mip, item, slice)
            .ok_or(TextureError::NotFound {
                mip: mip as usize,
                item,
                slice: slice as usize,
            })
    }
}
