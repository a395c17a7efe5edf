use std::ffi::c_void;
use std::mem::size_of;

use gl::{self, types::*};

use crate::engine::math::matrixfuncs::model_matrix;
use crate::engine::math::{Mat4, Vec3};
use crate::engine::shader::ShaderProgram;

/// Index type for element buffers (`GL_UNSIGNED_INT`).
pub type Index = u32;

/// GPU objects created by [`Model::upload`]. A zero id means "not created".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GLMesh {
    pub vao: GLuint,
    pub vbo: GLuint,
    pub ebo: GLuint,
}

/// A 3D model placed in the world.
///
/// The model owns its vertex positions, an optional index list and its pose:
/// a world-space position plus an orientation given as a Rodrigues vector
/// (the rotation axis scaled by the angle in radians).
///
/// The model matrix is derived on demand from the pose and never cached.
/// GPU buffers only exist after [`upload`](Self::upload) and are deleted
/// when the model is dropped, so dropping must happen while the GL context
/// that created them is still current.
#[derive(Debug)]
pub struct Model {
    /// Axis of rotation whose norm is the angle.
    orientation: Vec3,

    /// Position of the object in the world.
    position: Vec3,

    /// Local-space vertex positions.
    vertices: Vec<Vec3>,

    /// Triangle indices into `vertices`. Empty means draw the vertices in order.
    indices: Vec<Index>,

    gl_mesh: Option<GLMesh>,
}

impl Model {
    pub fn new(orientation: Vec3, position: Vec3, vertices: Vec<Vec3>) -> Self {
        Self::with_indices(orientation, position, vertices, Vec::new())
    }

    pub fn with_indices(orientation: Vec3, position: Vec3, vertices: Vec<Vec3>, indices: Vec<Index>) -> Self {
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "index out of range for {} vertices",
            vertices.len()
        );
        Self {
            orientation,
            position,
            vertices,
            indices,
            gl_mesh: None,
        }
    }

    /// Builds the model matrix from the orientation and position: rotate
    /// first, then translate, so `M * [v; 1] = R * v + position`.
    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.position, self.orientation)
    }

    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_orientation(&mut self, orientation: Vec3) {
        self.orientation = orientation;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation_mut(&mut self) -> &mut Vec3 {
        &mut self.orientation
    }

    pub fn position_mut(&mut self) -> &mut Vec3 {
        &mut self.position
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn is_uploaded(&self) -> bool {
        self.gl_mesh.is_some()
    }

    pub fn vertex_array_object_id(&self) -> GLuint {
        self.gl_mesh.map_or(0, |mesh| mesh.vao)
    }

    pub fn vertex_buffer_object_id(&self) -> GLuint {
        self.gl_mesh.map_or(0, |mesh| mesh.vbo)
    }

    pub fn element_buffer_object_id(&self) -> GLuint {
        self.gl_mesh.map_or(0, |mesh| mesh.ebo)
    }

    /// Creates the VAO and VBO (plus an EBO for indexed models) and copies the
    /// vertex data to the GPU. Attribute 0 is bound to the `vec3` positions.
    ///
    /// Requires a current GL context. Calling it again is a no-op.
    pub fn upload(&mut self) {
        if self.gl_mesh.is_some() {
            return;
        }

        let mut mesh = GLMesh::default();
        let stride = size_of::<Vec3>();

        unsafe {
            gl::GenVertexArrays(1, &mut mesh.vao);
            gl::BindVertexArray(mesh.vao);

            gl::GenBuffers(1, &mut mesh.vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, mesh.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.vertices.len() * stride) as GLsizeiptr,
                self.vertices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            if self.is_indexed() {
                gl::GenBuffers(1, &mut mesh.ebo);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, mesh.ebo);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    (self.indices.len() * size_of::<Index>()) as GLsizeiptr,
                    self.indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
            }

            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride as GLsizei, std::ptr::null());
            gl::EnableVertexAttribArray(0);

            // The VAO keeps the element buffer binding, so unbind it first.
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        log::debug!(
            "Uploaded model: {} vertices, {} indices (vao {}, vbo {}, ebo {})",
            self.vertices.len(),
            self.indices.len(),
            mesh.vao,
            mesh.vbo,
            mesh.ebo
        );
        self.gl_mesh = Some(mesh);
    }

    /// Draws the model with `shader`, which must already be in use.
    ///
    /// Sets the `model`, `view` and `projection` uniforms and issues either
    /// `glDrawElements` or `glDrawArrays` as triangles.
    pub fn draw(&self, shader: &ShaderProgram, projection: &Mat4, view: &Mat4) {
        let Some(mesh) = self.gl_mesh else {
            log::warn!("Skipping draw of a model that was never uploaded");
            return;
        };

        shader.set_uniform_matrix4("model", &self.model_matrix());
        shader.set_uniform_matrix4("view", view);
        shader.set_uniform_matrix4("projection", projection);

        unsafe {
            gl::BindVertexArray(mesh.vao);
            if self.is_indexed() {
                gl::DrawElements(
                    gl::TRIANGLES,
                    self.indices.len() as GLsizei,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                );
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, self.vertices.len() as GLsizei);
            }
            gl::BindVertexArray(0);
        }
    }

    /// Deletes the GPU buffers, leaving the CPU-side data intact. The model
    /// can be uploaded again afterwards.
    pub fn release(&mut self) {
        let Some(mesh) = self.gl_mesh.take() else {
            return;
        };
        unsafe {
            if mesh.ebo != 0 {
                gl::DeleteBuffers(1, &mesh.ebo);
            }
            gl::DeleteBuffers(1, &mesh.vbo);
            gl::DeleteVertexArrays(1, &mesh.vao);
        }
        log::debug!("Released model buffers (vao {}, vbo {}, ebo {})", mesh.vao, mesh.vbo, mesh.ebo);
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        self.release();
    }
}
