use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scratch_texture::{Metadata, PixelFormat, ScratchTexture};

fn criterion_benchmark(c: &mut Criterion) {
    let metadata = Metadata::new_2d(PixelFormat::R8G8B8A8Unorm, 1024, 1024, 1, 1);
    let texture = ScratchTexture::from_metadata(metadata).unwrap();
    c.bench_function("generate_mipmaps_rgba8", |b| {
        b.iter(|| {
            let mut texture = texture.clone();
            texture.generate_mipmaps(black_box(0)).unwrap();
            texture
        })
    });

    let metadata = Metadata::new_cube(PixelFormat::BC1Unorm, 256, 256, 1, 1);
    let texture = ScratchTexture::from_metadata(metadata).unwrap();
    c.bench_function("generate_mipmaps_bc1_cube", |b| {
        b.iter(|| {
            let mut texture = texture.clone();
            texture.generate_mipmaps(black_box(0)).unwrap();
            texture
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
