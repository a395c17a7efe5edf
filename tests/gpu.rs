//! Tests that need a real OpenGL 3.3 driver and a display connection.
//!
//! Run with `cargo test -- --ignored`. Only one event loop may exist per
//! process, so every check shares a single suite and receives the fixture
//! explicitly.

#![cfg(all(unix, not(target_os = "macos")))]

mod common;

use common::HeadlessGl;
use scenegl::engine::camera::Camera;
use scenegl::engine::model::Model;
use scenegl::engine::renderer::{MODEL_FRAGMENT_SHADER, MODEL_VERTEX_SHADER};
use scenegl::engine::scene::Scene;
use scenegl::engine::shader::{ShaderError, ShaderProgram, ShaderStage, ShaderState};

const PASS_THROUGH_VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 position;

void main() {
    gl_Position = vec4(position.x, position.y, position.z, 1.0);
}
";

const MISSING_VARYING_FRAGMENT: &str = "#version 330 core
in vec3 never_written;
out vec4 color;

void main() {
    color = vec4(never_written, 1.0);
}
";

fn triangle() -> Vec<[f32; 3]> {
    vec![[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]
}

#[test]
#[ignore = "requires an OpenGL 3.3 driver and a display"]
fn gpu_suite() {
    HeadlessGl::run(|ctx| {
        valid_sources_create_a_program(ctx);
        corrupted_vertex_source_reports_log(ctx);
        corrupted_fragment_source_reports_log(ctx);
        unmatched_varying_fails_to_link(ctx);
        model_upload_creates_vao_and_vbo(ctx);
        indexed_model_upload_creates_ebo(ctx);
        release_deletes_buffers(ctx);
        scene_draws_without_gl_errors(ctx);
    });
}

fn valid_sources_create_a_program(ctx: &HeadlessGl) {
    let mut program = ShaderProgram::new();
    program.load_vertex_shader_from_str(PASS_THROUGH_VERTEX);
    program.load_fragment_shader_from_str(MODEL_FRAGMENT_SHADER);
    program.create().unwrap();

    let id = program.program_id();
    assert!(id > 0);
    assert_eq!(program.state(), ShaderState::Created);
    assert!(program.use_program());

    // Second create is a no-op.
    program.create().unwrap();
    assert_eq!(program.program_id(), id);
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn corrupted_vertex_source_reports_log(ctx: &HeadlessGl) {
    let corrupted = PASS_THROUGH_VERTEX.replace("void main", "void main(");
    let mut program = ShaderProgram::new();
    program.load_vertex_shader_from_str(&corrupted);
    program.load_fragment_shader_from_str(MODEL_FRAGMENT_SHADER);

    let err = program.create().unwrap_err();
    assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
    assert!(!err.info_log().unwrap_or_default().is_empty());
    assert_eq!(program.program_id(), 0);
    assert_eq!(program.state(), ShaderState::Failed);
    assert!(!program.use_program());
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn corrupted_fragment_source_reports_log(ctx: &HeadlessGl) {
    let mut program = ShaderProgram::new();
    program.load_vertex_shader_from_str(MODEL_VERTEX_SHADER);
    program.load_fragment_shader_from_str("#version 330 core\nout vec4 color;\nvoid main() { color = 1.0 }\n");

    let err = program.create().unwrap_err();
    assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    assert!(!err.info_log().unwrap_or_default().is_empty());
    assert_eq!(program.program_id(), 0);
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn unmatched_varying_fails_to_link(ctx: &HeadlessGl) {
    let mut program = ShaderProgram::new();
    program.load_vertex_shader_from_str(PASS_THROUGH_VERTEX);
    program.load_fragment_shader_from_str(MISSING_VARYING_FRAGMENT);

    let err = program.create().unwrap_err();
    assert!(matches!(err, ShaderError::Link { .. }));
    assert!(!err.info_log().unwrap_or_default().is_empty());
    assert_eq!(program.program_id(), 0);
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn model_upload_creates_vao_and_vbo(ctx: &HeadlessGl) {
    let mut model = Model::new([0.0, 0.0, 0.3], [0.1, 0.2, 0.3], triangle());
    model.upload();
    assert!(model.vertex_array_object_id() > 0);
    assert!(model.vertex_buffer_object_id() > 0);
    assert_eq!(model.element_buffer_object_id(), 0);
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn indexed_model_upload_creates_ebo(ctx: &HeadlessGl) {
    let mut model = Model::with_indices([0.0, 0.0, 0.3], [0.1, 0.2, 0.3], triangle(), vec![0, 1, 2]);
    model.upload();
    assert!(model.vertex_array_object_id() > 0);
    assert!(model.vertex_buffer_object_id() > 0);
    assert!(model.element_buffer_object_id() > 0);
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn release_deletes_buffers(ctx: &HeadlessGl) {
    let mut model = Model::new([0.0; 3], [0.0; 3], triangle());
    model.upload();
    let vbo = model.vertex_buffer_object_id();
    model.release();

    assert!(!model.is_uploaded());
    assert_eq!(model.vertex_buffer_object_id(), 0);
    assert_eq!(unsafe { gl::IsBuffer(vbo) }, gl::FALSE);
    assert_eq!(ctx.error(), gl::NO_ERROR);
}

fn scene_draws_without_gl_errors(ctx: &HeadlessGl) {
    let shader = ShaderProgram::from_sources(MODEL_VERTEX_SHADER, MODEL_FRAGMENT_SHADER).unwrap();
    let camera = Camera::new(1.0);
    let mut scene = Scene::demo();
    scene.upload_all();
    assert!(scene.models().iter().all(Model::is_uploaded));

    // Headless contexts may have no default framebuffer; render offscreen.
    let (mut fbo, mut rbo) = (0, 0);
    unsafe {
        gl::GenFramebuffers(1, &mut fbo);
        gl::BindFramebuffer(gl::FRAMEBUFFER, fbo);
        gl::GenRenderbuffers(1, &mut rbo);
        gl::BindRenderbuffer(gl::RENDERBUFFER, rbo);
        gl::RenderbufferStorage(gl::RENDERBUFFER, gl::RGBA8, 64, 64);
        gl::FramebufferRenderbuffer(gl::FRAMEBUFFER, gl::COLOR_ATTACHMENT0, gl::RENDERBUFFER, rbo);
        assert_eq!(gl::CheckFramebufferStatus(gl::FRAMEBUFFER), gl::FRAMEBUFFER_COMPLETE);
        gl::Viewport(0, 0, 64, 64);
    }

    assert!(shader.use_program());
    scene.draw(&shader, &camera.projection_matrix(), &camera.view_matrix());
    unsafe {
        gl::Finish();
    }
    assert_eq!(ctx.error(), gl::NO_ERROR);

    unsafe {
        gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        gl::DeleteRenderbuffers(1, &rbo);
        gl::DeleteFramebuffers(1, &fbo);
    }

    scene.clear();
    assert_eq!(ctx.error(), gl::NO_ERROR);
}
