use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};

use lidarfuse_image::{rgba_from_ycbcr, LockablePixelBuffer, PlaneDesc, PlaneView};

use crate::camera::{camera_to_world, CameraIntrinsics, DisplayOrientation};
use crate::grid::{GridKey, DEFAULT_GRID_DENSITY};
use crate::store::{PointStore, Vertex};

/// Maximum depth accepted by the range gate, in meters. Returns beyond this
/// distance are too noisy to keep.
pub const DEFAULT_MAX_DEPTH: f32 = 2.0;

/// Per-pixel quality rating of a depth measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    /// Lowest quality.
    Low,
    /// Medium quality.
    Medium,
    /// Highest quality; the only tier the fuser accepts.
    High,
}

impl ConfidenceTier {
    /// Decode a raw confidence code. Unrecognized codes yield `None` and are
    /// treated like any non-high tier.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(ConfidenceTier::Low),
            1 => Some(ConfidenceTier::Medium),
            2 => Some(ConfidenceTier::High),
            _ => None,
        }
    }
}

/// The 4:2:0 planar YCbCr color image of one frame.
///
/// The backing buffer is locked only for the duration of a fusion pass; the
/// luma and chroma descriptors address planes inside the locked bytes.
pub struct ColorImage<'a> {
    /// The lockable backing buffer holding both planes.
    pub buffer: &'a dyn LockablePixelBuffer,
    /// Full-resolution 8-bit luma plane.
    pub luma: PlaneDesc,
    /// Half-resolution interleaved Cb/Cr plane; `width` is the full image
    /// width in bytes, `height` half the full image height.
    pub chroma: PlaneDesc,
    /// Color image width in pixels.
    pub width: usize,
    /// Color image height in pixels.
    pub height: usize,
}

/// One synchronized capture handed over by the capture layer.
///
/// Any plane may be missing on a given frame; a frame missing a required
/// plane is skipped whole.
pub struct CameraFrame<'a> {
    /// Depth plane, 32-bit float meters, one element per pixel.
    pub depth: Option<PlaneView<'a>>,
    /// Confidence plane, co-registered with the depth plane.
    pub confidence: Option<PlaneView<'a>>,
    /// Color image.
    pub color: Option<ColorImage<'a>>,
    /// Intrinsics of the capture camera.
    pub intrinsics: CameraIntrinsics,
    /// World-to-camera view matrix for the frame's display orientation.
    pub view_matrix: Mat4,
    /// Display orientation the frame was presented in.
    pub orientation: DisplayOrientation,
}

/// Tuning parameters of the fusion pipeline.
#[derive(Debug, Clone, Copy)]
pub struct FusionConfig {
    /// Grid cells per meter for deduplication.
    pub grid_density: f32,
    /// Strict upper bound on accepted depth, in meters.
    pub max_depth: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            grid_density: DEFAULT_GRID_DENSITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Fuses incoming depth frames into a shared [`PointStore`].
///
/// One fuser is the single writer of its store. Fusion of a new frame is
/// dropped (never queued) while a pass for a previous frame is still in
/// flight, bounding latency relative to the capture rate.
pub struct FrameFuser {
    store: Arc<PointStore>,
    config: FusionConfig,
    capturing: AtomicBool,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of a fusion pass.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FrameFuser {
    /// Create a fuser writing into `store`, with capturing enabled.
    pub fn new(store: Arc<PointStore>, config: FusionConfig) -> Self {
        Self {
            store,
            config,
            capturing: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The store this fuser writes into.
    pub fn store(&self) -> &Arc<PointStore> {
        &self.store
    }

    /// Toggle the capture gate. Turning it off does not interrupt an
    /// in-flight pass; the next fusion attempt is skipped instead.
    pub fn set_capturing(&self, capturing: bool) {
        self.capturing.store(capturing, Ordering::Release);
    }

    /// Whether the capture gate is on.
    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    /// Fuse one frame into the point store and return the number of newly
    /// inserted vertices.
    ///
    /// The operation is total over well-formed frames: frames missing a
    /// required plane, frames arriving while a pass is in flight, and frames
    /// arriving while capturing is off all fuse to zero insertions with no
    /// other side effect. Within a frame, pixels are visited in row-major
    /// order and the first pixel to claim a grid cell wins.
    pub fn fuse(&self, frame: &CameraFrame<'_>) -> usize {
        if !self.capturing.load(Ordering::Acquire) {
            return 0;
        }

        // drop-newest-while-busy: never queue behind a running pass
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::trace!("fusion pass in flight, dropping frame");
            return 0;
        }
        let _pass = PassGuard(&self.in_flight);

        let (Some(depth), Some(confidence), Some(color)) =
            (&frame.depth, &frame.confidence, &frame.color)
        else {
            log::debug!("frame missing required planes, skipping");
            return 0;
        };

        // color buffer stays locked for the whole pass, released on all exits
        let locked = color.buffer.lock();
        let (luma, chroma) = match (
            PlaneView::new(locked.bytes(), color.luma),
            PlaneView::new(locked.bytes(), color.chroma),
        ) {
            (Ok(luma), Ok(chroma)) => (luma, chroma),
            (Err(e), _) | (_, Err(e)) => {
                log::debug!("color planes unreadable, skipping frame: {e}");
                return 0;
            }
        };

        let transform = camera_to_world(&frame.view_matrix, frame.orientation);
        let (depth_width, depth_height) = (depth.width(), depth.height());
        let (color_width, color_height) = (color.width as f32, color.height as f32);

        let mut inserted = 0;
        let mut writer = self.store.writer();

        for row in 0..depth_height {
            for col in 0..depth_width {
                if ConfidenceTier::from_raw(confidence.get_u8(col, row))
                    != Some(ConfidenceTier::High)
                {
                    continue;
                }

                let d = depth.get_f32(col, row);
                if !d.is_finite() || d <= 0.0 || d > self.config.max_depth {
                    continue;
                }

                let norm_col = col as f32 / depth_width as f32;
                let norm_row = row as f32 / depth_height as f32;
                let screen_point = Vec3::new(norm_col * color_width, norm_row * color_height, 1.0);

                let local_point = frame.intrinsics.unproject(screen_point, d);
                let world_point = transform * local_point.extend(1.0);
                if !world_point.w.is_finite() || world_point.w <= f32::EPSILON {
                    continue;
                }
                let position = world_point.truncate() / world_point.w;

                let key = GridKey::from_point(position, self.config.grid_density);
                if writer.contains(&key) {
                    continue;
                }

                let pixel_col = ((norm_col * color_width).round() as usize).min(color.width - 1);
                let pixel_row = ((norm_row * color_height).round() as usize).min(color.height - 1);
                let y = luma.get_u8(pixel_col, pixel_row);
                let (cb, cr) = chroma.get_chroma_pair(pixel_col, pixel_row);

                writer.insert_if_absent(
                    key,
                    Vertex {
                        position,
                        color: Vec4::from_array(rgba_from_ycbcr(y, cb, cr)),
                    },
                );
                inserted += 1;
            }
        }

        log::debug!("fused frame: {inserted} new vertices, {} total", writer.len());
        inserted
    }
}
