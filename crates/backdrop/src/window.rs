use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, error, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Theme, Window, WindowBuilder};

use crate::gpu::ShaderPipeline;
use crate::input::{InputEvent, Viewport};
use crate::runtime::{BackgroundLoop, FrameCallback, FrameScheduler, FrameSource, SystemFrameSource};
use crate::scene::BackdropContext;
use crate::types::{Backdrop, BackdropConfig};

const SOFTWARE_FPS_CAP: f32 = 15.0;
/// Pacing for the glow loop when no GPU pipeline is available.
const FALLBACK_FPS: f32 = 60.0;

/// Key presses forwarded to the page runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Character(char),
    Escape,
    ArrowLeft,
    ArrowRight,
}

/// Notifications sent from the window thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSignal {
    /// Current or changed system colour scheme.
    SystemTheme { dark: bool },
    Key(KeyPress),
    /// Page scroll offset after a wheel event.
    Scrolled { offset: f64, viewport_height: u32 },
    /// Primary button pressed anywhere in the window.
    Clicked,
    Closed,
}

#[derive(Debug, Clone)]
enum WindowCommand {
    SetBackdrop(Backdrop),
    Shutdown,
}

/// Window state owned by the event loop thread.
struct WindowState {
    window: Arc<Window>,
    background: Option<BackgroundLoop<ShaderPipeline>>,
    scene: BackdropContext,
    frames: SystemFrameSource,
    scheduler: FrameScheduler,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &BackdropConfig) -> Self {
        let size = window.inner_size();
        let scene = BackdropContext::new(size.width, size.height, config.page_height);

        let background = match ShaderPipeline::initialize(window.as_ref(), size, config.gpu_power)
        {
            Ok(mut pipeline) => {
                pipeline.set_backdrop(config.initial_backdrop);
                Some(BackgroundLoop::new(pipeline))
            }
            Err(err) => {
                warn!("GPU context unavailable; running without the shader background: {err:#}");
                None
            }
        };

        let target_fps = match &background {
            Some(background) => {
                let profile = background.renderer().adapter_profile();
                if profile.is_software() && config.target_fps.is_none() {
                    warn!(
                        adapter = %profile.name,
                        backend = ?profile.backend,
                        cap = SOFTWARE_FPS_CAP,
                        "software rasterizer detected; capping backdrop FPS (override with --fps)"
                    );
                    Some(SOFTWARE_FPS_CAP)
                } else {
                    config.target_fps
                }
            }
            None => Some(config.target_fps.unwrap_or(FALLBACK_FPS)),
        };

        Self {
            window,
            background,
            scene,
            frames: SystemFrameSource::new(),
            scheduler: FrameScheduler::new(target_fps),
        }
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn pipeline_mut(&mut self) -> Option<&mut ShaderPipeline> {
        self.background
            .as_mut()
            .map(|background| background.renderer_mut())
    }

    fn apply(&mut self, event: InputEvent) {
        let viewport = self
            .background
            .as_mut()
            .map(|background| background.renderer_mut() as &mut dyn Viewport);
        self.scene.apply(event, viewport);
    }

    fn wheel(&mut self, delta: f64) -> f64 {
        let viewport = self
            .background
            .as_mut()
            .map(|background| background.renderer_mut() as &mut dyn Viewport);
        self.scene.wheel(delta, viewport)
    }

    fn set_backdrop(&mut self, backdrop: Backdrop) {
        if let Some(pipeline) = self.pipeline_mut() {
            pipeline.set_backdrop(backdrop);
        }
    }

    /// Runs both per-frame callbacks. Returns `false` when the surface is
    /// unrecoverable.
    fn frame(&mut self, now: Instant) -> bool {
        let Some(tick) = self.frames.next_frame() else {
            return true;
        };

        if let Some(background) = self.background.as_mut() {
            match background.frame(&mut self.scene.uniforms) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    background.renderer_mut().recover_surface();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory; closing backdrop");
                    return false;
                }
                Err(other) => {
                    debug!("surface error: {other}; retrying next frame");
                }
            }
        }

        self.scene.glow.on_frame(tick);
        self.scheduler.mark_rendered(now);

        if tick.index % 600 == 0 {
            tracing::trace!(
                frame = tick.index,
                time = self.scene.uniforms.time(),
                glow = ?self.scene.glow.position(),
                "backdrop frame"
            );
        }
        true
    }
}

/// Handle to the backdrop window running on its own thread.
pub struct WindowRuntime {
    proxy: EventLoopProxy<WindowCommand>,
    events: Receiver<WindowSignal>,
    join_handle: Option<JoinHandle<Result<()>>>,
}

impl WindowRuntime {
    pub fn spawn(config: BackdropConfig) -> Result<Self> {
        let (ready_tx, ready_rx) = bounded(1);
        let (signal_tx, signal_rx) = unbounded();
        let handle = thread::Builder::new()
            .name("utsav-backdrop".into())
            .spawn(move || run_window_thread(config, ready_tx, signal_tx))
            .map_err(|err| anyhow!("failed to spawn window thread: {err}"))?;

        let proxy = ready_rx
            .recv()
            .map_err(|err| anyhow!("window thread failed to initialise: {err}"))??;

        Ok(Self {
            proxy,
            events: signal_rx,
            join_handle: Some(handle),
        })
    }

    pub fn set_backdrop(&self, backdrop: Backdrop) -> Result<()> {
        self.proxy
            .send_event(WindowCommand::SetBackdrop(backdrop))
            .map_err(|err| anyhow!("{err}"))
    }

    /// Waits up to `timeout` for the next window signal.
    ///
    /// Returns `None` on timeout; a disconnected channel reports `Closed`.
    pub fn next_signal(&self, timeout: Duration) -> Option<WindowSignal> {
        match self.events.recv_timeout(timeout) {
            Ok(signal) => Some(signal),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(WindowSignal::Closed),
        }
    }

    pub fn shutdown(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(WindowCommand::Shutdown);
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }
}

impl Drop for WindowRuntime {
    fn drop(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(WindowCommand::Shutdown);
            let _ = handle.join();
        }
    }
}

fn run_window_thread(
    config: BackdropConfig,
    ready_tx: Sender<Result<EventLoopProxy<WindowCommand>, anyhow::Error>>,
    signal_tx: Sender<WindowSignal>,
) -> Result<()> {
    let mut builder = EventLoopBuilder::<WindowCommand>::with_user_event();
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    let event_loop = match builder.build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            let message = format!("failed to create event loop: {err}");
            let _ = ready_tx.send(Err(anyhow!(message.clone())));
            return Err(anyhow!(message));
        }
    };
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.surface_size.0, config.surface_size.1))
        .with_visible(config.show_window)
        .build(&event_loop);
    let window = match window {
        Ok(window) => Arc::new(window),
        Err(err) => {
            let message = format!("failed to create backdrop window: {err}");
            let _ = ready_tx.send(Err(anyhow!(message.clone())));
            return Err(anyhow!(message));
        }
    };

    let mut state = WindowState::new(window, &config);
    if let Some(theme) = state.window().theme() {
        let _ = signal_tx.send(WindowSignal::SystemTheme {
            dark: theme == Theme::Dark,
        });
    }
    state.window().request_redraw();

    let _ = ready_tx.send(Ok(proxy));

    let scroll_line = config.scroll_line;
    let run_result = event_loop.run(move |event, elwt| match event {
        Event::UserEvent(command) => match command {
            WindowCommand::SetBackdrop(backdrop) => {
                debug!(?backdrop, "switching backdrop colour scheme");
                state.set_backdrop(backdrop);
                state.window().request_redraw();
            }
            WindowCommand::Shutdown => elwt.exit(),
        },
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    let _ = signal_tx.send(WindowSignal::Closed);
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    state.apply(InputEvent::PointerMoved {
                        x: position.x,
                        y: position.y,
                    });
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let pixels = match delta {
                        MouseScrollDelta::LineDelta(_, lines) => -f64::from(lines) * scroll_line,
                        MouseScrollDelta::PixelDelta(position) => -position.y,
                    };
                    let offset = state.wheel(pixels);
                    let (_, viewport_height) = state.scene.bridge.dimensions();
                    let _ = signal_tx.send(WindowSignal::Scrolled {
                        offset,
                        viewport_height,
                    });
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    let _ = signal_tx.send(WindowSignal::Clicked);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    let key = match &event.logical_key {
                        Key::Named(NamedKey::Escape) => Some(KeyPress::Escape),
                        Key::Named(NamedKey::ArrowLeft) => Some(KeyPress::ArrowLeft),
                        Key::Named(NamedKey::ArrowRight) => Some(KeyPress::ArrowRight),
                        Key::Character(value) => value.chars().next().map(KeyPress::Character),
                        _ => None,
                    };
                    if let Some(key) = key {
                        let _ = signal_tx.send(WindowSignal::Key(key));
                    }
                }
                WindowEvent::ThemeChanged(theme) => {
                    let _ = signal_tx.send(WindowSignal::SystemTheme {
                        dark: theme == Theme::Dark,
                    });
                }
                WindowEvent::Resized(new_size) => {
                    state.apply(InputEvent::Resized {
                        width: new_size.width,
                        height: new_size.height,
                    });
                }
                WindowEvent::RedrawRequested => {
                    if !state.frame(Instant::now()) {
                        let _ = signal_tx.send(WindowSignal::Closed);
                        elwt.exit();
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            if state.scheduler.ready_for_frame(now) {
                state.window().request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = state.scheduler.next_deadline() {
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
