//! wgpu plumbing for the background shader.
//!
//! - `context` owns instance/adapter/device/surface wiring and reconfigures
//!   the swapchain when the window resizes.
//! - `pipeline` compiles the fixed GLSL program and draws one full-screen
//!   triangle per frame with the current uniforms.

mod context;
mod pipeline;

pub use pipeline::ShaderPipeline;
