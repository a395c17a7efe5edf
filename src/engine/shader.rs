use std::ffi::CString;
use std::fmt;
use std::path::{Path, PathBuf};

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use thiserror::Error;

use crate::engine::math::Mat4;

/// The two programmable stages a `ShaderProgram` is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("no {stage} shader source was loaded")]
    MissingSource { stage: ShaderStage },
    #[error("failed to read {stage} shader from {path}: {source}")]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {log}")]
    Link { log: String },
}

impl ShaderError {
    /// The diagnostic text reported by the driver's compiler or linker, if
    /// this error came from one.
    pub fn info_log(&self) -> Option<&str> {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => Some(log),
            _ => None,
        }
    }
}

/// Lifecycle of a `ShaderProgram`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderState {
    /// No source loaded yet.
    Empty,
    /// At least one stage has source; `create` has not succeeded.
    SourcesLoaded,
    /// Both stages compiled and the program linked.
    Created,
    /// The last `create` attempt failed.
    Failed,
}

/// Compiles a single shader stage.
///
/// On failure the shader object is deleted and the driver's info log is
/// returned inside the error.
pub fn compile_shader(src: &str, stage: ShaderStage) -> Result<GLuint, ShaderError> {
    unsafe {
        let shader = gl::CreateShader(stage.gl_enum());
        let src_ptr = src.as_ptr() as *const GLchar;
        let src_len = src.len() as GLint;
        gl::ShaderSource(shader, 1, &src_ptr, &src_len);
        gl::CompileShader(shader);

        // Check compile status
        let mut status = 0;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status == 0 {
            let log = shader_info_log(shader);
            gl::DeleteShader(shader);
            return Err(ShaderError::Compile { stage, log });
        }

        Ok(shader)
    }
}

/// Links compiled vertex and fragment shaders into a program.
///
/// The shader objects are left alive; the caller releases them.
pub fn link_program(vertex_shader: GLuint, fragment_shader: GLuint) -> Result<GLuint, ShaderError> {
    unsafe {
        let program = gl::CreateProgram();
        gl::AttachShader(program, vertex_shader);
        gl::AttachShader(program, fragment_shader);
        gl::LinkProgram(program);

        // Check link status
        let mut status = 0;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        if status == 0 {
            let log = program_info_log(program);
            gl::DeleteProgram(program);
            return Err(ShaderError::Link { log });
        }

        gl::DetachShader(program, vertex_shader);
        gl::DetachShader(program, fragment_shader);

        Ok(program)
    }
}

unsafe fn shader_info_log(shader: GLuint) -> String {
    let mut len: GLint = 0;
    let mut written: GLsizei = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetShaderInfoLog(shader, buf.len() as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        info_log_text(&buf)
    }
}

unsafe fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;
    let mut written: GLsizei = 0;
    unsafe {
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetProgramInfoLog(program, buf.len() as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        info_log_text(&buf)
    }
}

/// Some drivers leave the log empty on failure; never hand back an empty
/// diagnostic.
fn info_log_text(buf: &[u8]) -> String {
    let text = String::from_utf8_lossy(buf).trim_end_matches('\0').trim().to_owned();
    if text.is_empty() {
        "no info log provided by the driver".to_owned()
    } else {
        text
    }
}

/// A vertex + fragment shader pair compiled and linked into one GL program.
///
/// Load both sources (from strings or files), then call [`create`](Self::create).
/// The linked program is deleted when the value is dropped.
///
/// ```no_run
/// use scenegl::engine::shader::ShaderProgram;
///
/// let mut shader = ShaderProgram::new();
/// shader.load_vertex_shader_from_file("shaders/model.vert")?;
/// shader.load_fragment_shader_from_file("shaders/model.frag")?;
/// if let Err(e) = shader.create() {
///     log::error!("{e}");
/// }
/// # Ok::<(), scenegl::engine::shader::ShaderError>(())
/// ```
#[derive(Debug)]
pub struct ShaderProgram {
    vertex_src: Option<String>,
    fragment_src: Option<String>,
    program_id: GLuint,
    state: ShaderState,
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderProgram {
    pub fn new() -> Self {
        Self {
            vertex_src: None,
            fragment_src: None,
            program_id: 0,
            state: ShaderState::Empty,
        }
    }

    /// Convenience for the common case: load both sources and create.
    pub fn from_sources(vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let mut program = Self::new();
        program.load_vertex_shader_from_str(vertex_src);
        program.load_fragment_shader_from_str(fragment_src);
        program.create()?;
        Ok(program)
    }

    pub fn load_vertex_shader_from_str(&mut self, src: &str) {
        self.set_source(ShaderStage::Vertex, src.to_owned());
    }

    pub fn load_fragment_shader_from_str(&mut self, src: &str) {
        self.set_source(ShaderStage::Fragment, src.to_owned());
    }

    /// Reads the vertex shader source from `path`. On failure the previously
    /// loaded source, if any, is kept.
    pub fn load_vertex_shader_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), ShaderError> {
        let src = read_source(ShaderStage::Vertex, path.as_ref())?;
        self.set_source(ShaderStage::Vertex, src);
        Ok(())
    }

    /// Reads the fragment shader source from `path`. On failure the
    /// previously loaded source, if any, is kept.
    pub fn load_fragment_shader_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), ShaderError> {
        let src = read_source(ShaderStage::Fragment, path.as_ref())?;
        self.set_source(ShaderStage::Fragment, src);
        Ok(())
    }

    fn set_source(&mut self, stage: ShaderStage, src: String) {
        match stage {
            ShaderStage::Vertex => self.vertex_src = Some(src),
            ShaderStage::Fragment => self.fragment_src = Some(src),
        }
        if self.is_created() {
            log::warn!("{stage} shader source replaced after program {} was created; it will not be rebuilt", self.program_id);
        } else {
            self.state = ShaderState::SourcesLoaded;
        }
    }

    pub fn vertex_source(&self) -> Option<&str> {
        self.vertex_src.as_deref()
    }

    pub fn fragment_source(&self) -> Option<&str> {
        self.fragment_src.as_deref()
    }

    /// Compiles the vertex shader, compiles the fragment shader and links
    /// them. The first failure aborts and its info log is returned; the
    /// program id stays 0. Intermediate shader objects are always released.
    ///
    /// Calling this again after a success does nothing and returns `Ok`.
    pub fn create(&mut self) -> Result<(), ShaderError> {
        if self.is_created() {
            return Ok(());
        }

        match self.build() {
            Ok(program) => {
                self.program_id = program;
                self.state = ShaderState::Created;
                log::debug!("Created shader program {program}");
                Ok(())
            }
            Err(e) => {
                self.state = ShaderState::Failed;
                log::error!("{e}");
                Err(e)
            }
        }
    }

    fn build(&self) -> Result<GLuint, ShaderError> {
        let vertex_src = self
            .vertex_src
            .as_deref()
            .ok_or(ShaderError::MissingSource { stage: ShaderStage::Vertex })?;
        let fragment_src = self
            .fragment_src
            .as_deref()
            .ok_or(ShaderError::MissingSource { stage: ShaderStage::Fragment })?;

        let vertex_shader = compile_shader(vertex_src, ShaderStage::Vertex)?;
        let fragment_shader = match compile_shader(fragment_src, ShaderStage::Fragment) {
            Ok(shader) => shader,
            Err(e) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(e);
            }
        };

        let program = link_program(vertex_shader, fragment_shader);

        unsafe {
            gl::DeleteShader(vertex_shader);
            gl::DeleteShader(fragment_shader);
        }

        program
    }

    /// Makes this program the active one. Returns `false` if it was never
    /// created.
    pub fn use_program(&self) -> bool {
        if !self.is_created() {
            return false;
        }
        unsafe {
            gl::UseProgram(self.program_id);
        }
        true
    }

    /// The linked GL program, or 0 before a successful `create`.
    pub fn program_id(&self) -> GLuint {
        self.program_id
    }

    pub fn is_created(&self) -> bool {
        self.program_id != 0
    }

    pub fn state(&self) -> ShaderState {
        self.state
    }

    /// Uploads a column-major 4x4 matrix to the named uniform of this
    /// program. The program must be in use.
    pub fn set_uniform_matrix4(&self, name: &str, matrix: &Mat4) {
        if !self.is_created() {
            return;
        }
        let Ok(c_name) = CString::new(name) else {
            log::warn!("uniform name {name:?} contains a NUL byte");
            return;
        };
        unsafe {
            let location = gl::GetUniformLocation(self.program_id, c_name.as_ptr());
            if location < 0 {
                log::trace!("uniform {name} not active in program {}", self.program_id);
                return;
            }
            gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.is_created() {
            unsafe {
                gl::DeleteProgram(self.program_id);
            }
            log::debug!("Deleted shader program {}", self.program_id);
            self.program_id = 0;
        }
    }
}

fn read_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        stage,
        path: path.to_path_buf(),
        source,
    })
}
