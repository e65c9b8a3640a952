#![no_main]

use libfuzzer_sys::fuzz_target;
use scratch_texture::{Metadata, PixelFormat, Quality, ScratchTexture};

const MAX_SIZE: usize = 1 << 20;

fuzz_target!(|input: (Metadata, PixelFormat, Vec<u8>)| {
    let (metadata, format, pixels) = input;
    if metadata.required_size().is_ok_and(|size| size <= MAX_SIZE) {
        if let Ok(mut texture) = ScratchTexture::from_metadata_with_pixels(metadata, &pixels) {
            let _result = texture.convert_with_quality(format, Quality::Fast);
        }
    }
});
