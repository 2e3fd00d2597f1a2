//! Shader-driven decorative background for the Utsav microsite.
//!
//! Two independent per-frame loops share one window:
//!
//! ```text
//!   winit events ──▶ InputBridge ──▶ UniformState ──▶ BackgroundLoop ──▶ ShaderPipeline
//!                         │                                (time += 0.01, one draw)
//!                         └────────▶ CursorGlowLoop ──▶ StyleSink (--mouse-x / --mouse-y)
//! ```
//!
//! `BackdropContext` owns the uniforms, glow and bridge for one window, so
//! nothing lives in globals. Frames come from a [`runtime::FrameSource`];
//! tests step a manual source instead of a display. `WindowRuntime` runs the
//! winit loop on its own thread and talks to the caller over channels.
//!
//! When no GPU context can be created the shader background is skipped with
//! a warning; input handling and the glow loop keep running.

pub mod glow;
pub mod input;
pub mod runtime;
pub mod scene;
pub mod shading;

mod compile;
mod gpu;
mod types;
mod uniforms;
mod window;

pub use glow::{CursorGlowLoop, GlowPosition, StyleSink, StyleVars};
pub use gpu::ShaderPipeline;
pub use input::{InputBridge, InputEvent, Viewport, WheelScroll};
pub use runtime::{
    BackgroundLoop, FrameCallback, FrameRenderer, FrameScheduler, FrameSource, FrameTick,
    ManualFrameSource, SystemFrameSource,
};
pub use scene::BackdropContext;
pub use types::{AdapterProfile, Backdrop, BackdropConfig, GpuPowerPreference};
pub use uniforms::{UniformState, TIME_STEP};
pub use window::{KeyPress, WindowRuntime, WindowSignal};
