use scratch_texture::ScratchTexture;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: texture2png <input> <output.png> [mip] [item] [slice]");
        return;
    }

    let texture = ScratchTexture::from_file(&args[1]).unwrap();
    let metadata = texture.metadata().unwrap();
    println!(
        "{}x{}x{} {:?} with {} mipmaps and {} items",
        metadata.width,
        metadata.height,
        metadata.depth,
        metadata.format,
        metadata.mip_levels,
        metadata.array_size
    );

    let index = |i: usize| args.get(i).and_then(|s| s.parse().ok()).unwrap_or(0);
    let png = texture
        .to_portable_image(index(3) as u32, index(4), index(5) as u32)
        .unwrap();
    std::fs::write(&args[2], png).unwrap();
}
