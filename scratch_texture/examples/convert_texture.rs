use std::str::FromStr;

use scratch_texture::{PixelFormat, ScratchTexture};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: convert_texture <input> <output> [format] [mipmaps]");
        return;
    }

    let mut texture = ScratchTexture::from_file(&args[1]).unwrap();

    let start = std::time::Instant::now();
    if let Some(format) = args.get(3) {
        let format = PixelFormat::from_str(format).unwrap();
        texture.convert(format).unwrap();
        println!("Converted to {format} in {:?}", start.elapsed());
    }

    if let Some(mipmaps) = args.get(4).and_then(|s| s.parse().ok()) {
        let start = std::time::Instant::now();
        texture.generate_mipmaps(mipmaps).unwrap();
        println!("Generated mipmaps in {:?}", start.elapsed());
    }

    texture.save_file(&args[2]).unwrap();
}
