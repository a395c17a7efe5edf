//! Scoped OpenGL context for tests that talk to the driver.

use glutin::{
    dpi::PhysicalSize,
    event_loop::{EventLoop, EventLoopBuilder},
    platform::unix::EventLoopBuilderExtUnix,
    Api, Context, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent,
};
use scenegl::engine::renderer::RendererError;

/// A hidden 3.3 core context made current on the calling thread. GL objects
/// created through it must be dropped before the fixture is.
pub struct HeadlessGl {
    // Dropped before the event loop it was created from.
    _context: Context<PossiblyCurrent>,
    _event_loop: EventLoop<()>,
}

impl HeadlessGl {
    pub fn new() -> Result<Self, RendererError> {
        // The test harness runs each test on a worker thread.
        let event_loop = EventLoopBuilder::new().with_any_thread(true).build();
        let context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
            .with_gl_profile(GlProfile::Core)
            .build_headless(&event_loop, PhysicalSize::new(64, 64))?;
        let context = unsafe { context.make_current() }.map_err(|(_, e)| e)?;
        gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);

        Ok(Self {
            _context: context,
            _event_loop: event_loop,
        })
    }

    /// Runs `check` with the context current, then tears it down.
    pub fn run<F: FnOnce(&HeadlessGl)>(check: F) {
        let ctx = match Self::new() {
            Ok(ctx) => ctx,
            Err(e) => panic!("no OpenGL context available: {e}"),
        };
        check(&ctx);
    }

    pub fn error(&self) -> gl::types::GLenum {
        unsafe { gl::GetError() }
    }
}
