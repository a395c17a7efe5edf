use crate::engine::math::{EPSILON, Mat3, Vec3, Vec4};

/// Adds two 3D points component-wise.
pub fn add_vec3(x: Vec3, y: Vec3) -> Vec3 {
    [x[0] + y[0], x[1] + y[1], x[2] + y[2]]
}

/// Adds two 4D points component-wise.
pub fn add_vec4(x: Vec4, y: Vec4) -> Vec4 {
    [x[0] + y[0], x[1] + y[1], x[2] + y[2], x[3] + y[3]]
}

/// Multiplies every component of `v` by `s`.
pub fn scale_vec3(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// Dot product `x · y`.
pub fn dot(x: Vec3, y: Vec3) -> f32 {
    x[0] * y[0] + x[1] * y[1] + x[2] * y[2]
}

/// Euclidean length of `v`.
pub fn norm(v: Vec3) -> f32 {
    dot(v, v).sqrt()
}

/// Returns `v` scaled to unit length. A zero vector is returned unchanged.
pub fn normalize(v: Vec3) -> Vec3 {
    let n = norm(v);
    if n < EPSILON {
        return v;
    }
    scale_vec3(v, 1.0 / n)
}

/// Angle in radians between two vectors.
///
/// Only defined for non-zero inputs. The cosine is clamped to `[-1, 1]` so
/// rounding on (anti)parallel vectors never produces NaN.
pub fn angle_between(x: Vec3, y: Vec3) -> f32 {
    debug_assert!(norm(x) >= EPSILON && norm(y) >= EPSILON, "angle of a zero vector");
    let cos_theta = dot(normalize(x), normalize(y)).clamp(-1.0, 1.0);
    cos_theta.acos()
}

/// Builds the skew-symmetric matrix `[v]x` such that `[v]x * y == v x y`.
///
/// ```text
/// |  0  -z   y |
/// |  z   0  -x |
/// | -y   x   0 |
/// ```
pub fn skew_symmetric(v: Vec3) -> Mat3 {
    let [x, y, z] = v;
    [
        0.0, z, -y,   // Column 1
        -z, 0.0, x,   // Column 2
        y, -x, 0.0,   // Column 3
    ]
}

/// Multiplies a 3x3 matrix by a column vector.
pub fn mat3_mul_vec3(m: &Mat3, v: Vec3) -> Vec3 {
    let mut result = [0.0f32; 3];
    for row in 0..3 {
        result[row] = m[row] * v[0] + m[3 + row] * v[1] + m[6 + row] * v[2];
    }
    result
}

/// Multiplies two 3x3 matrices, `a * b`.
pub fn mat3_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut result = [0.0f32; 9];
    for row in 0..3 {
        for col in 0..3 {
            result[col * 3 + row] = a[row] * b[col * 3]
                + a[3 + row] * b[col * 3 + 1]
                + a[6 + row] * b[col * 3 + 2];
        }
    }
    result
}

/// Cross product `x × y`, computed as `[x]x * y`.
pub fn cross(x: Vec3, y: Vec3) -> Vec3 {
    mat3_mul_vec3(&skew_symmetric(x), y)
}
