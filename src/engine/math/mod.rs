//! Column-major vector and matrix helpers.
//!
//! Matrices are plain `[f32; N]` arrays in column-major order (element at
//! row `r`, column `c` lives at index `c * N + r`), which is the layout
//! OpenGL expects when uploading uniforms with `transpose = false`.

pub mod matrixfuncs;
pub mod vecfuncs;

/// A 3D vector `[x, y, z]`.
pub type Vec3 = [f32; 3];

/// A 4D (homogeneous) vector `[x, y, z, w]`.
pub type Vec4 = [f32; 4];

/// A 3x3 matrix in column-major order.
pub type Mat3 = [f32; 9];

/// A 4x4 matrix in column-major order.
pub type Mat4 = [f32; 16];

/// Identity matrix (4x4) representing 'no transformation'.
pub const IDENTITY_MATRIX: Mat4 = [
    1.0, 0.0, 0.0, 0.0,  // Column 1
    0.0, 1.0, 0.0, 0.0,  // Column 2
    0.0, 0.0, 1.0, 0.0,  // Column 3
    0.0, 0.0, 0.0, 1.0,  // Column 4
];

/// Identity matrix (3x3).
pub const IDENTITY_MATRIX_3: Mat3 = [
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

/// Norms below this are treated as zero when normalizing.
pub const EPSILON: f32 = 1e-6;

/// Extends a point to homogeneous coordinates (`w = 1`).
pub fn homogeneous(p: Vec3) -> Vec4 {
    [p[0], p[1], p[2], 1.0]
}

/// Drops the `w` component of a homogeneous vector.
pub fn xyz(v: Vec4) -> Vec3 {
    [v[0], v[1], v[2]]
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Mat4, Vec3};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    pub const TOLERANCE: f32 = 1e-3;

    pub fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    /// Uniform random vector with components in `[-1, 1)`.
    pub fn random_vec3(rng: &mut StdRng) -> Vec3 {
        [
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ]
    }

    pub fn assert_vec3_near(actual: Vec3, expected: Vec3) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < TOLERANCE,
                "component {i}: {actual:?} != {expected:?}"
            );
        }
    }

    pub fn assert_mat4_near(actual: &Mat4, expected: &Mat4) {
        for i in 0..16 {
            assert!(
                (actual[i] - expected[i]).abs() < TOLERANCE,
                "element {i} (row {}, col {}): {actual:?} != {expected:?}",
                i % 4,
                i / 4
            );
        }
    }
}
