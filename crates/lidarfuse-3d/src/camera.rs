use glam::{Mat3, Mat4, Vec3, Vec4};

/// A struct representing the intrinsic parameters of a pinhole camera.
///
/// Wraps the 3x3 projection matrix and caches its inverse for the
/// per-pixel unprojection hot path.
#[derive(Debug, Clone, Copy)]
pub struct CameraIntrinsics {
    matrix: Mat3,
    inverse: Mat3,
}

impl CameraIntrinsics {
    /// Create intrinsics from a 3x3 projection matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not invertible.
    pub fn new(matrix: Mat3) -> Result<Self, &'static str> {
        if matrix.determinant().abs() < 1e-10 {
            return Err("camera intrinsics matrix is not invertible");
        }
        Ok(Self {
            matrix,
            inverse: matrix.inverse(),
        })
    }

    /// Create intrinsics from focal lengths and principal point in pixels.
    pub fn from_parameters(fx: f32, fy: f32, cx: f32, cy: f32) -> Result<Self, &'static str> {
        Self::new(Mat3::from_cols(
            Vec3::new(fx, 0.0, 0.0),
            Vec3::new(0.0, fy, 0.0),
            Vec3::new(cx, cy, 1.0),
        ))
    }

    /// The 3x3 projection matrix.
    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }

    /// Unproject a homogeneous screen point (z = 1) at the measured depth
    /// into a 3D point in camera space.
    #[inline]
    pub fn unproject(&self, screen_point: Vec3, depth: f32) -> Vec3 {
        self.inverse * screen_point * depth
    }
}

/// The orientation the display compositor rotated the captured image to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOrientation {
    /// Landscape with the home side on the right; sensor-native orientation.
    LandscapeRight,
    /// Landscape with the home side on the left.
    LandscapeLeft,
    /// Portrait.
    Portrait,
    /// Portrait upside down.
    PortraitUpsideDown,
}

impl DisplayOrientation {
    /// Rotation about the viewing axis that the compositor applies for this
    /// orientation, in radians.
    pub fn rotation_angle(&self) -> f32 {
        match self {
            DisplayOrientation::LandscapeRight => 0.0,
            DisplayOrientation::LandscapeLeft => std::f32::consts::PI,
            DisplayOrientation::Portrait => std::f32::consts::FRAC_PI_2,
            DisplayOrientation::PortraitUpsideDown => -std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Correction from the capture device's camera convention (Y down, Z forward)
/// into a right-handed world convention (Y up, Z backward).
fn axis_flip() -> Mat4 {
    Mat4::from_diagonal(Vec4::new(1.0, -1.0, -1.0, 1.0))
}

/// Build the camera-to-world transform for one frame.
///
/// `view_matrix` is the world-to-camera view matrix the capture layer reports
/// for the given display orientation. The result maps a camera-space point to
/// world space consistent with how the 2D image was presented:
///
/// `view_matrix.inverse() * axis_flip * rotation_z(orientation angle)`
///
/// The transform is pure and must be rebuilt every frame since the pose
/// changes every frame.
///
/// # Example
///
/// ```
/// use glam::{Mat4, Vec4};
/// use lidarfuse_3d::camera::{camera_to_world, DisplayOrientation};
///
/// let transform = camera_to_world(&Mat4::IDENTITY, DisplayOrientation::LandscapeRight);
/// let world = transform * Vec4::new(0.0, 1.0, 2.0, 1.0);
/// assert_eq!(world, Vec4::new(0.0, -1.0, -2.0, 1.0));
/// ```
pub fn camera_to_world(view_matrix: &Mat4, orientation: DisplayOrientation) -> Mat4 {
    view_matrix.inverse() * axis_flip() * Mat4::from_rotation_z(orientation.rotation_angle())
}
