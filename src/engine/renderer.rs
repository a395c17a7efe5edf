use glutin::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, StartCause, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    Api,
    ContextBuilder,
    ContextWrapper,
    GlProfile,
    GlRequest,
    PossiblyCurrent,
    window::Window,
};
use thiserror::Error;

use crate::engine::camera::Camera;
use crate::engine::config::RenderConfig;
use crate::engine::scene::Scene;
use crate::engine::shader::{ShaderError, ShaderProgram};

/// Vertex shader used for every model: `projection * view * model * position`.
pub const MODEL_VERTEX_SHADER: &str = include_str!("shaders/model.vert");

/// Fragment shader filling every fragment with a flat orange.
pub const MODEL_FRAGMENT_SHADER: &str = include_str!("shaders/model.frag");

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create window or OpenGL context: {0}")]
    Creation(#[from] glutin::CreationError),
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::ContextError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// `Renderer` owns the window, its OpenGL context, the shader program, the
/// camera and the scene, and drives the render loop.
///
/// Each frame: clear the framebuffer, bind the shader, draw every model of
/// the scene with the camera's projection and view matrices, then present.
/// Closing the window or pressing ESC ends the loop.
///
/// All GL work happens on the thread that created the renderer, which is the
/// thread the context is current on.
///
/// # Example Usage
///
/// ```no_run
/// use scenegl::engine::{config::RenderConfig, renderer::Renderer, scene::Scene};
///
/// let mut renderer = Renderer::new(&RenderConfig::default())?;
/// renderer.set_scene(Scene::demo());
/// renderer.run();
/// # Ok::<(), scenegl::engine::renderer::RendererError>(())
/// ```
pub struct Renderer {
    // Fields drop in declaration order: the scene and shader must go while
    // the context below is still alive.

    /// What scene are we rendering?
    scene: Scene,

    /// Program every model is drawn with.
    shader: ShaderProgram,

    /// What camera are we rendering from?
    camera: Camera,

    /// The color used to clear the OpenGL framebuffer each frame, stored as RGBA floats.
    clear_color: [f32; 4],

    /// Draw polygons as outlines.
    wireframe: bool,

    /// The OpenGL context tied to a window, current on this thread.
    windowed_context: ContextWrapper<PossiblyCurrent, Window>,

    /// The event loop responsible for driving window events and rendering
    event_loop: EventLoop<()>,
}

impl Renderer {
    /// Creates the window and an OpenGL 3.3 core context, loads the GL
    /// functions, configures the viewport and builds the model shader.
    ///
    /// 1. Configures a non-resizable window with the configured title and size.
    /// 2. Creates a core-profile context tied to it and makes it current.
    /// 3. Loads all OpenGL function pointers via the context.
    /// 4. Sets the viewport to the framebuffer size and the clear color.
    /// 5. Compiles and links the built-in model shader.
    pub fn new(config: &RenderConfig) -> Result<Self, RendererError> {
        let event_loop = EventLoop::new();

        let wb = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .with_resizable(false);

        let windowed_context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
            .with_gl_profile(GlProfile::Core)
            .with_vsync(config.window.vsync)
            .build_windowed(wb, &event_loop)?;

        // Make the OpenGL context current on this thread; required before issuing GL calls
        let windowed_context = unsafe { windowed_context.make_current() }.map_err(|(_, e)| e)?;

        gl::load_with(|symbol| windowed_context.get_proc_address(symbol) as *const _);

        let size = windowed_context.window().inner_size();
        set_viewport(size);

        let [r, g, b, a] = config.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
        }

        let shader = ShaderProgram::from_sources(MODEL_VERTEX_SHADER, MODEL_FRAGMENT_SHADER)?;
        let camera = Camera::from_config(&config.camera, config.window.aspect_ratio());

        log::info!(
            "Created {}x{} window \"{}\" (vsync {})",
            size.width,
            size.height,
            config.window.title,
            config.window.vsync
        );

        Ok(Self {
            event_loop,
            windowed_context,
            clear_color: config.clear_color,
            wireframe: config.wireframe,
            camera,
            shader,
            scene: Scene::new(),
        })
    }

    /// Clears the current OpenGL framebuffer using the stored clear color.
    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    /// Swaps the front and back buffers, presenting the rendered frame to the window.
    pub fn swap_buffers(&self) -> Result<(), RendererError> {
        self.windowed_context.swap_buffers()?;
        Ok(())
    }

    /// Updates the OpenGL clear color to the specified RGBA value and stores it internally.
    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
        unsafe {
            gl::ClearColor(r, g, b, a);
        }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Replaces the scene and uploads its models. The previous scene is
    /// dropped, releasing its buffers.
    pub fn set_scene(&mut self, mut scene: Scene) {
        scene.upload_all();
        self.scene = scene;
    }

    /// Models added through this reference are uploaded when `run` starts.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Starts the render loop. This method **never returns**; the process
    /// exits once the window is closed or ESC is pressed.
    ///
    /// The scene and shader are dropped on `LoopDestroyed`, while the
    /// context is still current, so their GPU objects are released.
    pub fn run(self) {
        let Renderer {
            event_loop,
            windowed_context,
            clear_color: _,
            wireframe,
            mut camera,
            shader,
            mut scene,
        } = self;

        scene.upload_all();
        log::info!("Rendering {} models", scene.len());

        let mut shader = Some(shader);
        let mut scene = Some(scene);

        event_loop.run(move |event, _, control_flow| {
            match event {
                Event::NewEvents(StartCause::Init) => *control_flow = ControlFlow::Poll,

                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                ..
                            },
                        ..
                    } => *control_flow = ControlFlow::Exit,
                    WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                        windowed_context.resize(size);
                        set_viewport(size);
                        camera.set_aspect(size.width as f32 / size.height as f32);
                    }
                    _ => {}
                },

                Event::MainEventsCleared => windowed_context.window().request_redraw(),

                Event::RedrawRequested(_) => {
                    if let (Some(shader), Some(scene)) = (&shader, &scene) {
                        render_scene(shader, &camera, scene, wireframe);
                    }

                    if let Err(e) = windowed_context.swap_buffers() {
                        log::error!("Failed to swap buffers: {e}");
                        *control_flow = ControlFlow::Exit;
                    }
                }

                Event::LoopDestroyed => {
                    scene.take();
                    shader.take();
                    log::info!("Render loop finished");
                }

                _ => {}
            }
        });
    }
}

/// Tells OpenGL the drawable size, with the origin in the lower left corner.
fn set_viewport(size: PhysicalSize<u32>) {
    unsafe {
        gl::Viewport(0, 0, size.width as i32, size.height as i32);
    }
}

/// Draws one frame: clear, bind the shader, draw every model.
fn render_scene(shader: &ShaderProgram, camera: &Camera, scene: &Scene, wireframe: bool) {
    unsafe {
        gl::Clear(gl::COLOR_BUFFER_BIT);
        gl::PolygonMode(gl::FRONT_AND_BACK, if wireframe { gl::LINE } else { gl::FILL });
    }

    if !shader.use_program() {
        return;
    }

    let projection = camera.projection_matrix();
    let view = camera.view_matrix();
    scene.draw(shader, &projection, &view);

    unsafe {
        gl::BindVertexArray(0);
    }
}
