use std::collections::HashMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use colmap_track_3d::io::colmap::ColmapImage;
use colmap_track_3d::trajectory::{build_trajectory, TrajectoryOptions};
use colmap_track_3d::transforms;

// a camera orbiting the origin, one image per degree
fn orbit_images(num_images: usize) -> Vec<ColmapImage> {
    (0..num_images)
        .map(|i| {
            let half = (i as f64).to_radians() * 0.5;
            ColmapImage {
                image_id: i as u32 + 1,
                rotation: [half.cos(), 0.0, half.sin(), 0.0],
                translation: [0.0, 0.0, 4.0],
                camera_id: 1,
                name: format!("frame_{i:05}.jpg"),
            }
        })
        .collect()
}

fn bench_colmap_to_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("colmap_to_target");

    let rotation = [0.9, -0.1, 0.3, 0.2];
    let translation = [0.5, -1.0, 2.0];

    group.bench_function(BenchmarkId::new("colmap_to_target", ""), |b| {
        b.iter(|| black_box(transforms::colmap_to_target(&rotation, &translation)));
    });

    group.bench_function(BenchmarkId::new("matrix_to_hpb", ""), |b| {
        let pose = transforms::colmap_to_target(&rotation, &translation);
        b.iter(|| black_box(transforms::matrix_to_hpb(&pose.rotation)));
    });
}

fn bench_build_trajectory(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_trajectory");

    let focal = HashMap::from([(1, 18.75)]);
    let options = TrajectoryOptions::default();

    for num_images in [360, 3600] {
        let images = orbit_images(num_images);
        group.bench_with_input(
            BenchmarkId::new("build_trajectory", num_images),
            &images,
            |b, images| b.iter(|| black_box(build_trajectory(images, &focal, &options))),
        );
    }
}

criterion_group!(benches, bench_colmap_to_target, bench_build_trajectory);
criterion_main!(benches);
