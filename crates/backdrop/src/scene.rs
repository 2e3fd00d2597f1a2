use crate::glow::{CursorGlowLoop, StyleVars};
use crate::input::{InputBridge, InputEvent, Viewport, WheelScroll};
use crate::uniforms::UniformState;

/// Everything the background needs between frames, constructed once per window.
///
/// The render loop reads `uniforms`, the glow loop owns its own position, and
/// the bridge is the only writer of cursor/scroll fields.
#[derive(Debug, Clone)]
pub struct BackdropContext {
    pub uniforms: UniformState,
    pub glow: CursorGlowLoop<StyleVars>,
    pub bridge: InputBridge,
    pub scroll: WheelScroll,
}

impl BackdropContext {
    pub fn new(width: u32, height: u32, page_height: f64) -> Self {
        Self {
            uniforms: UniformState::new(),
            glow: CursorGlowLoop::new(StyleVars::new()),
            bridge: InputBridge::new(width, height),
            scroll: WheelScroll::new(page_height),
        }
    }

    pub fn apply<V>(&mut self, event: InputEvent, viewport: Option<&mut V>)
    where
        V: Viewport + ?Sized,
    {
        self.bridge
            .handle(event, &mut self.uniforms, &mut self.glow, viewport);
    }

    /// Applies a wheel delta and returns the resulting absolute offset.
    pub fn wheel<V>(&mut self, delta: f64, viewport: Option<&mut V>) -> f64
    where
        V: Viewport + ?Sized,
    {
        let (_, height) = self.bridge.dimensions();
        let offset = self.scroll.scroll_by(delta, height);
        self.apply(InputEvent::Scrolled { offset }, viewport);
        offset
    }
}
