pub mod camera;
pub mod config;
pub mod math;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod shader;
