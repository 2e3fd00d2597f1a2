use std::time::{Duration, Instant};

use crate::uniforms::UniformState;

/// One display refresh as seen by the frame callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Monotonic frame counter for the running session.
    pub index: u64,
    /// When the frame was issued.
    pub at: Instant,
}

/// Abstraction over where frame ticks originate from.
///
/// The window runtime pulls ticks from the system clock; tests use
/// [`ManualFrameSource`] to step frames deterministically.
pub trait FrameSource {
    /// Produces the next frame tick, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<FrameTick>;
}

/// Work that runs once per display refresh.
pub trait FrameCallback {
    fn on_frame(&mut self, tick: FrameTick);
}

/// Frame source backed by the system monotonic clock. Never exhausts.
#[derive(Debug, Clone, Copy)]
pub struct SystemFrameSource {
    frame: u64,
}

impl SystemFrameSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemFrameSource {
    fn default() -> Self {
        Self { frame: 0 }
    }
}

impl FrameSource for SystemFrameSource {
    fn next_frame(&mut self) -> Option<FrameTick> {
        let tick = FrameTick {
            index: self.frame,
            at: Instant::now(),
        };
        self.frame = self.frame.saturating_add(1);
        Some(tick)
    }
}

/// Frame source that yields a fixed number of evenly spaced ticks.
#[derive(Debug, Clone)]
pub struct ManualFrameSource {
    origin: Instant,
    interval: Duration,
    remaining: u64,
    frame: u64,
}

impl ManualFrameSource {
    pub fn new(frames: u64, interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            remaining: frames,
            frame: 0,
        }
    }
}

impl FrameSource for ManualFrameSource {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let offset = self.interval.saturating_mul(self.frame.min(u32::MAX as u64) as u32);
        let tick = FrameTick {
            index: self.frame,
            at: self.origin + offset,
        };
        self.frame += 1;
        Some(tick)
    }
}

/// Pumps every tick from `source` through each callback in order.
///
/// Returns the number of frames delivered.
pub fn drive<S>(source: &mut S, callbacks: &mut [&mut dyn FrameCallback]) -> u64
where
    S: FrameSource + ?Sized,
{
    let mut delivered = 0;
    while let Some(tick) = source.next_frame() {
        for callback in callbacks.iter_mut() {
            callback.on_frame(tick);
        }
        delivered += 1;
    }
    delivered
}

/// Target that can draw one frame of the background.
pub trait FrameRenderer {
    type Error: std::fmt::Display;

    fn render_frame(&mut self, uniforms: &UniformState) -> Result<(), Self::Error>;
}

/// Per-frame callback that advances shader time and issues one render.
#[derive(Debug)]
pub struct BackgroundLoop<R> {
    renderer: R,
    rendered: u64,
}

impl<R: FrameRenderer> BackgroundLoop<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            rendered: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn rendered_frames(&self) -> u64 {
        self.rendered
    }

    /// Advances `uniforms.time` by one step and renders.
    pub fn frame(&mut self, uniforms: &mut UniformState) -> Result<(), R::Error> {
        uniforms.advance_time();
        self.renderer.render_frame(uniforms)?;
        self.rendered += 1;
        Ok(())
    }
}

/// Decides when the next frame is due under an optional FPS cap.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_render: Option<Instant>,
}

impl FrameScheduler {
    /// `target_fps` of `None` or `<= 0` renders on every opportunity.
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| Duration::from_nanos((1_000_000_000.0 / f64::from(fps)).round() as u64));
        Self {
            interval,
            last_render: None,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.last_render) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_render = Some(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.interval, self.last_render) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.last_render = None;
    }
}
