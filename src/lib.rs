//! A small OpenGL scene renderer: transform math, a perspective camera,
//! GPU-backed models and a shader program wrapper, driven by a glutin
//! render loop.

pub mod engine;
