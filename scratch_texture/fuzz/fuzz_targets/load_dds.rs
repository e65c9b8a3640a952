#![no_main]

use libfuzzer_sys::fuzz_target;
use scratch_texture::{ImageFileFormat, ScratchTexture};

fuzz_target!(|data: &[u8]| {
    if let Ok(texture) = ScratchTexture::from_bytes(data, ImageFileFormat::Dds) {
        let _result = texture.to_portable_image(0, 0, 0);
    }
});
