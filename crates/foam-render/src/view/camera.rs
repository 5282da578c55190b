use glam::{Mat4, Vec3};

/// Vertical field of view (45 degrees).
pub const FIELD_OF_VIEW_Y: f32 = std::f32::consts::FRAC_PI_4;

/// Near clipping plane.
pub const NEAR_PLANE: f32 = 0.1;

/// Far clipping plane.
pub const FAR_PLANE: f32 = 10_000.0;

/// Orientation and distance of the fixed perspective camera.
///
/// No range validation: rotations are raw radians and zoom is an unconstrained
/// distance along the view axis (zero or negative zoom gives a degenerate
/// camera, which is accepted).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    /// Rotation about the X axis (radians).
    pub rotation_x: f32,
    /// Rotation about the Y axis (radians).
    pub rotation_y: f32,
    /// Camera distance along -Z.
    pub zoom: f32,
    /// Point subtracted from every vertex after rotation.
    pub center: Vec3,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation_x: 0.3,
            rotation_y: 0.3,
            zoom: 500.0,
            center: Vec3::ZERO,
        }
    }
}

impl ViewState {
    pub fn new(rotation_x: f32, rotation_y: f32, zoom: f32, center: Vec3) -> Self {
        Self {
            rotation_x,
            rotation_y,
            zoom,
            center,
        }
    }

    /// Model matrix: rotate about X, then about Y, then translate by `-center`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.center)
            * Mat4::from_rotation_y(self.rotation_y)
            * Mat4::from_rotation_x(self.rotation_x)
    }

    /// View matrix: camera at `+zoom` on Z looking down `-Z`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.zoom))
    }

    /// Perspective projection for a target of `width x height` pixels.
    pub fn projection_matrix(width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh(FIELD_OF_VIEW_Y, aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn matrices(&self, width: u32, height: u32) -> CameraMatrices {
        CameraMatrices {
            model: self.model_matrix(),
            view: self.view_matrix(),
            projection: Self::projection_matrix(width, height),
        }
    }
}

/// The three matrices uploaded to both pipelines each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}
