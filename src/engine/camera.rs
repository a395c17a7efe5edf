//! Camera utilities for 3D rendering.
//!
//! The `Camera` owns the perspective projection parameters and a pose, and
//! produces the view and projection matrices uploaded to the shaders.

use crate::engine::config::CameraConfig;
use crate::engine::math::matrixfuncs::{
    degrees_to_radians, matrix_mul_4x4, perspective_matrix, rotation_matrix_from_rodrigues,
    translation_matrix,
};
use crate::engine::math::vecfuncs::scale_vec3;
use crate::engine::math::{Mat4, Vec3};

/// Represents a perspective projection camera in a 3D scene.
///
/// This camera uses a right-handed coordinate system and outputs column-major 4x4 transformation matrices
/// suitable for use in OpenGL.
///
/// The camera tracks:
/// - Position and orientation (as a Rodrigues vector)
/// - Perspective projection parameters (field of view, aspect ratio, near/far planes)
///
/// # Example
/// ```
/// use scenegl::engine::camera::Camera;
///
/// let camera = Camera::new(16.0 / 9.0);
/// let view = camera.view_matrix();
/// let proj = camera.projection_matrix();
/// let proj_view = camera.proj_view_matrix();
/// # let _ = (view, proj, proj_view);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// The camera's world-space position.
    pub position: Vec3,

    /// The camera's orientation as an axis-angle (Rodrigues) vector.
    /// Defaults to zero (facing -Z).
    pub orientation: Vec3,

    /// Vertical field of view in radians.
    pub fov_y: f32,

    /// Aspect ratio of the view (width / height).
    pub aspect: f32,

    /// Distance to the near clipping plane.
    pub near: f32,

    /// Distance to the far clipping plane.
    pub far: f32,
}

impl Camera {
    /// Creates a camera at the origin looking down -Z with the given aspect ratio.
    ///
    /// Defaults:
    /// - FOV: 45 degrees vertical
    /// - Near/Far: 0.1 / 10.0
    pub fn new(aspect: f32) -> Self {
        Self::from_config(&CameraConfig::default(), aspect)
    }

    /// Creates a camera at the origin from configured projection parameters.
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            orientation: [0.0, 0.0, 0.0],
            fov_y: degrees_to_radians(config.fov_degrees),
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn set_position(&mut self, pos: Vec3) {
        self.position = pos;
    }

    pub fn set_orientation(&mut self, orientation: Vec3) {
        self.orientation = orientation;
    }

    /// Sets the camera's Near & Far ranges
    pub fn set_near_far(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    /// Sets the camera's FOV, in degrees.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_y = degrees_to_radians(fov_degrees);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Computes the view matrix from the camera's position and orientation.
    ///
    /// This transform converts world-space coordinates into view-space,
    /// where the camera is at the origin looking down the negative Z-axis.
    /// It is the inverse of the camera pose: `R^T * T(-position)`.
    pub fn view_matrix(&self) -> Mat4 {
        let inverse_rotation = rotation_matrix_from_rodrigues(scale_vec3(self.orientation, -1.0));
        let inverse_translation = translation_matrix(scale_vec3(self.position, -1.0));

        matrix_mul_4x4(&inverse_rotation, &inverse_translation)
    }

    /// Computes the perspective projection matrix based on the camera's FOV, aspect ratio, and near/far planes.
    pub fn projection_matrix(&self) -> Mat4 {
        perspective_matrix(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Returns the combined projection * view matrix for transforming world-space coordinates
    /// directly into clip space.
    pub fn proj_view_matrix(&self) -> Mat4 {
        matrix_mul_4x4(&self.projection_matrix(), &self.view_matrix())
    }
}
