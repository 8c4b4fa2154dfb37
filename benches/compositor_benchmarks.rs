//! Benchmarks for alpha compositing and filter rendering

use ar_face_filters::{
    assets::{OverlayAsset, OverlayImage},
    compositor::{blend, blend_weighted},
    face_detection::BoundingBox,
    filters::{Anchor, Detections, FilterKind, FilterRegistry, OverlayFilter},
    placement::Placement,
    Frame,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, Rgba, RgbaImage};
use std::path::PathBuf;

fn gradient_overlay(size: u32) -> OverlayImage {
    OverlayImage::Transparent(RgbaImage::from_fn(size, size, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, ((x + y) % 256) as u8])
    }))
}

fn benchmark_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("blend");

    for size in [64u32, 128, 256] {
        let overlay = gradient_overlay(size);
        group.bench_with_input(BenchmarkId::new("rgba_inside", size), &overlay, |b, overlay| {
            let mut frame = Frame::from_pixel(640, 480, Rgb([90, 90, 90]));
            b.iter(|| black_box(blend(&mut frame, overlay, 100, 100)));
        });
        group.bench_with_input(BenchmarkId::new("rgba_clipped", size), &overlay, |b, overlay| {
            let mut frame = Frame::from_pixel(640, 480, Rgb([90, 90, 90]));
            b.iter(|| black_box(blend(&mut frame, overlay, -(size as i32) / 2, 440)));
        });
    }

    group.bench_function("blend_weighted_640x480", |b| {
        let mut frame = Frame::from_pixel(640, 480, Rgb([90, 90, 90]));
        let mut layer = frame.clone();
        for x in 100..500 {
            layer.put_pixel(x, 240, Rgb([255, 0, 0]));
        }
        b.iter(|| blend_weighted(&mut frame, black_box(&layer), 0.6).expect("Blend failed"));
    });

    group.finish();
}

fn benchmark_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    let mut registry = FilterRegistry::new();
    for (i, name) in ["glasses", "hat", "mask"].iter().enumerate() {
        let asset = OverlayAsset::from_images(vec![(PathBuf::from(format!("{name}.png")), gradient_overlay(200))]);
        let placement = Placement::new(1.2).expect("Valid scale");
        registry.add(
            *name,
            FilterKind::Overlay(OverlayFilter::new(asset, placement, Anchor::FaceBox)),
            true,
            i as i32,
        );
    }
    let detections = Detections {
        faces: vec![BoundingBox::new(200, 150, 180, 180), BoundingBox::new(20, 40, 90, 90)],
        landmarks: Vec::new(),
    };

    group.bench_function("apply_3_overlays_2_faces", |b| {
        let mut frame = Frame::from_pixel(640, 480, Rgb([90, 90, 90]));
        b.iter(|| black_box(registry.apply(&mut frame, black_box(&detections))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_blend, benchmark_registry);
criterion_main!(benches);
