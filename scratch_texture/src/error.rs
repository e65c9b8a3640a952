use thiserror::Error;

use crate::{ImageFileFormat, PixelFormat, TexDimension};

/// The mutating or terminal operation that reported an error.
#[derive(Debug, PartialEq, Eq, Clone, Copy, strum::Display)]
pub enum Operation {
    Initialize,
    Decompress,
    Compress,
    Convert,
    Resize,
    GenerateMipMaps,
    Load,
    Save,
    Extract,
}

/// Errors returned by [ScratchTexture](crate::ScratchTexture) operations.
///
/// A failed operation never modifies the texture it was called on.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to allocate {size} bytes of pixel storage")]
    AllocationFailure { size: usize },

    #[error("invalid texture metadata: {0}")]
    InitializationFailure(#[source] LayoutError),

    #[error("expected a pixel buffer of at least {expected} bytes but found {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },

    #[error("{operation} failed: {source}")]
    Codec {
        operation: Operation,
        #[source]
        source: CodecError,
    },

    #[error("no surface exists for mipmap {mip} item {item} slice {slice}")]
    NotFound { mip: usize, item: usize, slice: usize },

    #[error("the texture does not contain any image data")]
    EmptyTexture,

    #[error("{operation} is not supported: {reason}")]
    UnsupportedOperation {
        operation: Operation,
        reason: String,
    },
}

impl From<LayoutError> for TextureError {
    fn from(error: LayoutError) -> Self {
        match error {
            LayoutError::AllocationFailure { size } => Self::AllocationFailure { size },
            error => Self::InitializationFailure(error),
        }
    }
}

impl TextureError {
    pub(crate) fn codec(operation: Operation, source: impl Into<CodecError>) -> Self {
        Self::Codec {
            operation,
            source: source.into(),
        }
    }
}

/// The underlying failure reported by a pixel or container codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Dds(#[from] ddsfile::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("decoded header describes an invalid texture: {0}")]
    Layout(#[from] LayoutError),

    #[error("the {format} container is not supported by this codec")]
    UnsupportedFormat { format: ImageFileFormat },
}

/// Metadata that does not describe a texture that can be laid out in memory.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LayoutError {
    #[error("texture dimensions {width} x {height} x {depth} with {array_size} items and {mip_levels} mipmaps contain no pixels")]
    ZeroSized {
        width: u64,
        height: u64,
        depth: u64,
        array_size: u64,
        mip_levels: u64,
    },

    #[error("the format {format:?} does not have a known memory layout")]
    UnknownFormat { format: PixelFormat },

    #[error("a {dimension:?} texture can not have dimensions {width} x {height} x {depth}")]
    DimensionMismatch {
        dimension: TexDimension,
        width: u64,
        height: u64,
        depth: u64,
    },

    #[error("a {dimension:?} texture can not have {array_size} array items")]
    InvalidArraySize {
        dimension: TexDimension,
        array_size: u64,
    },

    #[error("cube maps must be 2D with a multiple of 6 array items but found {dimension:?} with {array_size} items")]
    InvalidCubeMap {
        dimension: TexDimension,
        array_size: u64,
    },

    #[error("mipmap count {mip_levels} exceeds the maximum value of {max_mip_levels}")]
    TooManyMipmaps { mip_levels: u64, max_mip_levels: u64 },

    #[error("texture size would overflow")]
    SizeOverflow,

    #[error("failed to allocate {size} bytes for the surface table")]
    AllocationFailure { size: usize },
}

/// Errors while decoding or encoding the pixels of a single surface.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum SurfaceError {
    #[error("surface dimensions {width} x {height} x {depth} contain no pixels")]
    ZeroSizedSurface { width: u32, height: u32, depth: u32 },

    #[error("surface pixel count {width} x {height} x {depth} would overflow")]
    PixelCountWouldOverflow { width: u32, height: u32, depth: u32 },

    #[error("expected surface to have at least {expected} bytes but found {actual}")]
    NotEnoughData { expected: usize, actual: usize },

    #[error("decoding data from format {format:?} is not supported")]
    UnsupportedDecodeFormat { format: PixelFormat },

    #[error("encoding data to format {format:?} is not supported")]
    UnsupportedEncodeFormat { format: PixelFormat },

    #[error("mipmap count {mipmaps} exceeds the maximum value of {max_total_mipmaps}")]
    InvalidMipmapCount { mipmaps: u32, max_total_mipmaps: u32 },
}
