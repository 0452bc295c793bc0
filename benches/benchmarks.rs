use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array2, Array3};
use std::{hint::black_box, rc::Rc};
use tilemosaic::{
    mosaic::{MergeMethod, Mosaic},
    spectral, GeoTransform, Raster,
};

const SIZE: (usize, usize) = (2048, 2048);

fn bench_ndwi(c: &mut Criterion) {
    let green = Array2::from_shape_fn(SIZE, |(row, col)| ((row * col) % 4096) as f64);
    let nir = Array2::from_shape_fn(SIZE, |(row, col)| ((row + col) % 4096) as f64);
    c.bench_function("ndwi", |b| {
        b.iter(|| spectral::ndwi(black_box(green.view()), black_box(nir.view())))
    });
}

fn tile(left: f64) -> Raster<u16> {
    let data = Array3::from_shape_fn((4, SIZE.0 / 2, SIZE.1 / 2), |(band, row, col)| {
        ((band + row + col) % 4096) as u16
    });
    Raster::new(
        data,
        GeoTransform::from_origin(left, 0., 3., 3.),
        Rc::from(""),
        Some(0.),
        ["blue", "green", "red", "nir"].map(String::from).into(),
    )
    .unwrap()
}

fn bench_mosaic(c: &mut Criterion) {
    let tiles = [tile(0.), tile(1536.), tile(3072.)];
    let mosaic = Mosaic::new(MergeMethod::First, None);
    c.bench_function("mosaic", |b| b.iter(|| mosaic.build(black_box(&tiles))));
}

criterion_group!(benches, bench_ndwi, bench_mosaic);
criterion_main!(benches);
