use std::f32::consts::{FRAC_PI_2, PI};

use crate::engine::math::vecfuncs::{mat3_mul, norm, scale_vec3, skew_symmetric};
use crate::engine::math::{EPSILON, IDENTITY_MATRIX, IDENTITY_MATRIX_3, Mat4, Vec3, Vec4};

// -- Helper functions -- //

/// Computes the model matrix of an object from its world position and its
/// orientation given as a Rodrigues vector.
///
/// The rotation is applied first, then the translation, so that
/// `M * [v; 1] = R * v + position` for every local-space vertex `v`.
///
/// # Returns
/// A 4x4 transformation matrix in column-major order.
pub fn model_matrix(position: Vec3, orientation: Vec3) -> Mat4 {
    let translation = translation_matrix(position);
    let rotation = rotation_matrix_from_rodrigues(orientation);

    // translation * rotation * identity (order matters)
    matrix_mul_4x4(&matrix_mul_4x4(&translation, &rotation), &IDENTITY_MATRIX)
}

/// Creates a translation matrix from an offset vector.
///
/// Moves points by the specified x, y, z amounts.
///
/// # Returns
/// A 4x4 translation matrix.
pub fn translation_matrix(offset: Vec3) -> Mat4 {
    [
        1.0, 0.0, 0.0, 0.0,      // Column 1
        0.0, 1.0, 0.0, 0.0,      // Column 2
        0.0, 0.0, 1.0, 0.0,      // Column 3
        offset[0], offset[1], offset[2], 1.0,  // Column 4 (translation components)
    ]
}

/// Creates a uniform scale matrix.
///
/// # Returns
/// `diag(scale, scale, scale, 1)`.
pub fn scaling_matrix(scale: f32) -> Mat4 {
    [
        scale, 0.0,   0.0,   0.0,  // Column 1
        0.0,   scale, 0.0,   0.0,  // Column 2
        0.0,   0.0,   scale, 0.0,  // Column 3
        0.0,   0.0,   0.0,   1.0,  // Column 4
    ]
}

/// Creates a rotation of `angle` radians about `axis` using the Rodrigues
/// formula `R = I + sin(t) K + (1 - cos(t)) K^2`, where `K` is the
/// skew-symmetric matrix of the normalized axis.
///
/// The axis does not need to be unit length. A zero axis has no direction,
/// so the identity is returned.
///
/// # Returns
/// A 4x4 rotation matrix in column-major order.
pub fn rotation_matrix(axis: Vec3, angle: f32) -> Mat4 {
    let axis_norm = norm(axis);
    debug_assert!(axis_norm >= EPSILON, "rotation axis must be non-zero");
    if axis_norm < EPSILON {
        return IDENTITY_MATRIX;
    }

    let k = skew_symmetric(scale_vec3(axis, 1.0 / axis_norm));
    let k_squared = mat3_mul(&k, &k);
    let (sin, cos) = angle.sin_cos();

    let mut result = IDENTITY_MATRIX;
    for col in 0..3 {
        for row in 0..3 {
            let i = col * 3 + row;
            result[col * 4 + row] = IDENTITY_MATRIX_3[i] + sin * k[i] + (1.0 - cos) * k_squared[i];
        }
    }
    result
}

/// Converts a Rodrigues vector (axis scaled by the angle in radians) into a
/// 4x4 rotation matrix. The zero vector is the identity rotation.
pub fn rotation_matrix_from_rodrigues(orientation: Vec3) -> Mat4 {
    let angle = norm(orientation);
    if angle < EPSILON {
        return IDENTITY_MATRIX;
    }
    rotation_matrix(orientation, angle)
}

/// Converts an angle in degrees to radians.
pub fn degrees_to_radians(angle_in_degrees: f32) -> f32 {
    angle_in_degrees * PI / 180.0
}

/// Multiplies two 4x4 matrices `a` and `b` (both in column-major order).
///
/// The multiplication is `result = a * b`, where each matrix is 4x4.
///
/// # Returns
/// The resulting 4x4 matrix from the multiplication.
pub fn matrix_mul_4x4(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [0.0f32; 16];

    // Multiply rows of a by columns of b
    for row in 0..4 {
        for col in 0..4 {
            result[col * 4 + row] =
                a[row] * b[col * 4] +
                    a[4 + row] * b[col * 4 + 1] +
                    a[8 + row] * b[col * 4 + 2] +
                    a[12 + row] * b[col * 4 + 3];
        }
    }

    result
}

/// Multiplies a 4x4 matrix by a homogeneous column vector, `m * v`.
pub fn matrix_mul_vec4(m: &Mat4, v: Vec4) -> Vec4 {
    let mut result = [0.0f32; 4];
    for row in 0..4 {
        result[row] = m[row] * v[0] + m[4 + row] * v[1] + m[8 + row] * v[2] + m[12 + row] * v[3];
    }
    result
}

/// Cotangent, expressed as `tan(pi/2 - angle)`.
fn cotangent(angle: f32) -> f32 {
    (FRAC_PI_2 - angle).tan()
}

/// Builds an OpenGL-style perspective projection matrix.
///
/// # Parameters
/// - `fovy`: vertical field of view in radians, in `(0, pi)`.
/// - `aspect`: viewport width / height, `> 0`.
/// - `near`, `far`: clip plane distances with `far > near > 0`.
///
/// Values outside these ranges produce a degenerate or flipped matrix.
pub fn perspective_matrix(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    debug_assert!(fovy > 0.0 && fovy < PI, "field of view out of range: {fovy}");
    debug_assert!(aspect > 0.0, "aspect ratio must be positive: {aspect}");
    debug_assert!(far > near && near > 0.0, "invalid clip planes: near {near}, far {far}");

    let y_scale = cotangent(0.5 * fovy);
    let x_scale = y_scale / aspect;
    let planes_distance = far - near;
    let z_scale = -(near + far) / planes_distance;
    let homogeneous_scale = -2.0 * near * far / planes_distance;

    [
        x_scale, 0.0, 0.0, 0.0,
        0.0, y_scale, 0.0, 0.0,
        0.0, 0.0, z_scale, -1.0,
        0.0, 0.0, homogeneous_scale, 0.0,
    ]
}
