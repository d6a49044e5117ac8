use std::path::PathBuf;
use std::sync::Arc;

use argh::FromArgs;
use glam::Mat4;

use lidarfuse_3d::camera::{CameraIntrinsics, DisplayOrientation};
use lidarfuse_3d::fuser::{CameraFrame, ColorImage, FrameFuser, FusionConfig};
use lidarfuse_3d::io::ply::write_ply_ascii_to_path;
use lidarfuse_3d::store::PointStore;
use lidarfuse_image::{PlaneDesc, PlaneView};

#[derive(FromArgs)]
/// Fuse a sequence of synthetic depth frames and export the point cloud as PLY
struct Args {
    /// grid cells per meter for deduplication
    #[argh(option, short = 'g', default = "100.0")]
    grid_density: f32,

    /// maximum accepted depth in meters
    #[argh(option, short = 'm', default = "2.0")]
    max_depth: f32,

    /// number of frames to fuse
    #[argh(option, short = 'n', default = "10")]
    frames: usize,

    /// output PLY file path
    #[argh(option, short = 'o', default = "PathBuf::from(\"cloud.ply\")")]
    output: PathBuf,
}

const DEPTH_W: usize = 128;
const DEPTH_H: usize = 96;
const COLOR_W: usize = 256;
const COLOR_H: usize = 192;

/// Owned packed planes for one synthetic capture.
struct SyntheticCapture {
    depth: Vec<u8>,
    confidence: Vec<u8>,
    color: Vec<u8>,
}

impl SyntheticCapture {
    /// A slanted wall between 0.5 m and 1.8 m with a horizontal luma gradient.
    fn new() -> Self {
        let mut depth = Vec::with_capacity(DEPTH_W * DEPTH_H * 4);
        let mut confidence = Vec::with_capacity(DEPTH_W * DEPTH_H);
        for row in 0..DEPTH_H {
            for col in 0..DEPTH_W {
                let d = 0.5 + 1.3 * (col as f32 / DEPTH_W as f32);
                depth.extend_from_slice(&d.to_le_bytes());
                // degrade confidence toward the image border
                let border = row.min(DEPTH_H - 1 - row).min(col).min(DEPTH_W - 1 - col);
                confidence.push(if border < 4 { 1 } else { 2 });
            }
        }

        let mut color = Vec::with_capacity(COLOR_W * COLOR_H + COLOR_W * (COLOR_H / 2));
        for _row in 0..COLOR_H {
            for col in 0..COLOR_W {
                let luma = 16.0 + 219.0 * (col as f32 / COLOR_W as f32);
                color.push(luma as u8);
            }
        }
        color.extend(std::iter::repeat(128).take(COLOR_W * (COLOR_H / 2)));

        Self {
            depth,
            confidence,
            color,
        }
    }

    fn frame(&self, view_matrix: Mat4) -> Result<CameraFrame<'_>, Box<dyn std::error::Error>> {
        Ok(CameraFrame {
            depth: Some(PlaneView::new(
                &self.depth,
                PlaneDesc {
                    offset: 0,
                    width: DEPTH_W,
                    height: DEPTH_H,
                    bytes_per_row: DEPTH_W * 4,
                    bytes_per_element: 4,
                },
            )?),
            confidence: Some(PlaneView::new(
                &self.confidence,
                PlaneDesc {
                    offset: 0,
                    width: DEPTH_W,
                    height: DEPTH_H,
                    bytes_per_row: DEPTH_W,
                    bytes_per_element: 1,
                },
            )?),
            color: Some(ColorImage {
                buffer: &self.color,
                luma: PlaneDesc {
                    offset: 0,
                    width: COLOR_W,
                    height: COLOR_H,
                    bytes_per_row: COLOR_W,
                    bytes_per_element: 1,
                },
                chroma: PlaneDesc {
                    offset: COLOR_W * COLOR_H,
                    width: COLOR_W,
                    height: COLOR_H / 2,
                    bytes_per_row: COLOR_W,
                    bytes_per_element: 1,
                },
                width: COLOR_W,
                height: COLOR_H,
            }),
            intrinsics: CameraIntrinsics::from_parameters(
                220.0,
                220.0,
                COLOR_W as f32 / 2.0,
                COLOR_H as f32 / 2.0,
            )?,
            view_matrix,
            orientation: DisplayOrientation::LandscapeRight,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let store = Arc::new(PointStore::new());
    let fuser = FrameFuser::new(
        store.clone(),
        FusionConfig {
            grid_density: args.grid_density,
            max_depth: args.max_depth,
        },
    );

    let capture = SyntheticCapture::new();
    for index in 0..args.frames {
        // sweep the camera sideways a few millimeters per frame
        let view_matrix = Mat4::from_translation(glam::Vec3::new(index as f32 * -0.004, 0.0, 0.0));
        let inserted = fuser.fuse(&capture.frame(view_matrix)?);
        log::info!(
            "frame {index}: {inserted} new vertices, {} total",
            store.len()
        );
    }

    let snapshot = store.snapshot();
    write_ply_ascii_to_path(&args.output, &snapshot)?;
    println!(
        "wrote {} vertices to {}",
        snapshot.len(),
        args.output.display()
    );

    Ok(())
}
