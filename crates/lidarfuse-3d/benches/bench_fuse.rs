use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Mat4;

use lidarfuse_3d::camera::{CameraIntrinsics, DisplayOrientation};
use lidarfuse_3d::fuser::{CameraFrame, ColorImage, FrameFuser, FusionConfig};
use lidarfuse_3d::store::PointStore;
use lidarfuse_image::{PlaneDesc, PlaneView};

struct FramePlanes {
    depth: Vec<u8>,
    confidence: Vec<u8>,
    color: Vec<u8>,
    width: usize,
    height: usize,
}

impl FramePlanes {
    fn synthetic(width: usize, height: usize) -> Self {
        let mut depth = Vec::with_capacity(width * height * 4);
        for row in 0..height {
            for col in 0..width {
                // slanted plane between 0.5 m and 1.5 m
                let d = 0.5 + (col + row) as f32 / (width + height) as f32;
                depth.extend_from_slice(&d.to_le_bytes());
            }
        }
        let luma_len = width * 2 * height * 2;
        let mut color = vec![180u8; luma_len];
        color.extend(std::iter::repeat(128).take(width * 2 * height));
        Self {
            depth,
            confidence: vec![2u8; width * height],
            color,
            width,
            height,
        }
    }

    fn frame(&self) -> CameraFrame<'_> {
        let color_width = self.width * 2;
        let color_height = self.height * 2;
        CameraFrame {
            depth: Some(
                PlaneView::new(
                    &self.depth,
                    PlaneDesc {
                        offset: 0,
                        width: self.width,
                        height: self.height,
                        bytes_per_row: self.width * 4,
                        bytes_per_element: 4,
                    },
                )
                .unwrap(),
            ),
            confidence: Some(
                PlaneView::new(
                    &self.confidence,
                    PlaneDesc {
                        offset: 0,
                        width: self.width,
                        height: self.height,
                        bytes_per_row: self.width,
                        bytes_per_element: 1,
                    },
                )
                .unwrap(),
            ),
            color: Some(ColorImage {
                buffer: &self.color,
                luma: PlaneDesc {
                    offset: 0,
                    width: color_width,
                    height: color_height,
                    bytes_per_row: color_width,
                    bytes_per_element: 1,
                },
                chroma: PlaneDesc {
                    offset: color_width * color_height,
                    width: color_width,
                    height: color_height / 2,
                    bytes_per_row: color_width,
                    bytes_per_element: 1,
                },
                width: color_width,
                height: color_height,
            }),
            intrinsics: CameraIntrinsics::from_parameters(
                color_width as f32,
                color_width as f32,
                color_width as f32 / 2.0,
                color_height as f32 / 2.0,
            )
            .unwrap(),
            view_matrix: Mat4::IDENTITY,
            orientation: DisplayOrientation::LandscapeRight,
        }
    }
}

fn bench_fuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuse");

    for (width, height) in [(64, 48), (256, 192)] {
        let planes = FramePlanes::synthetic(width, height);
        let id = format!("{width}x{height}");

        group.bench_with_input(BenchmarkId::new("cold_store", &id), &planes, |b, planes| {
            b.iter(|| {
                let fuser = FrameFuser::new(Arc::new(PointStore::new()), FusionConfig::default());
                black_box(fuser.fuse(&planes.frame()))
            })
        });

        group.bench_with_input(BenchmarkId::new("warm_store", &id), &planes, |b, planes| {
            let fuser = FrameFuser::new(Arc::new(PointStore::new()), FusionConfig::default());
            fuser.fuse(&planes.frame());
            b.iter(|| black_box(fuser.fuse(&planes.frame())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fuse);
criterion_main!(benches);
