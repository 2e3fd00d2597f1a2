use crate::glow::{CursorGlowLoop, StyleSink};
use crate::uniforms::UniformState;

/// Anything whose drawable area follows the window size.
pub trait Viewport {
    /// Applies new dimensions; returns `true` when anything changed.
    fn resize(&mut self, width: u32, height: u32) -> bool;
    fn dimensions(&self) -> (u32, u32);
}

/// Raw input as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in physical pixels, origin top-left.
    PointerMoved { x: f64, y: f64 },
    /// Absolute vertical scroll offset in pixels.
    Scrolled { offset: f64 },
    Resized { width: u32, height: u32 },
}

/// Translates raw window input into uniform, glow and viewport updates.
#[derive(Debug, Clone)]
pub struct InputBridge {
    width: u32,
    height: u32,
}

impl InputBridge {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn handle<S, V>(
        &mut self,
        event: InputEvent,
        uniforms: &mut UniformState,
        glow: &mut CursorGlowLoop<S>,
        viewport: Option<&mut V>,
    ) where
        S: StyleSink,
        V: Viewport + ?Sized,
    {
        match event {
            InputEvent::PointerMoved { x, y } => {
                let (cursor_x, cursor_y) = self.normalise(x, y);
                uniforms.set_cursor(cursor_x, cursor_y);
                glow.on_pointer_move(x as f32, y as f32);
            }
            InputEvent::Scrolled { offset } => {
                uniforms.set_scroll_offset(offset as f32);
            }
            InputEvent::Resized { width, height } => {
                self.width = width;
                self.height = height;
                if let Some(viewport) = viewport {
                    if viewport.resize(width, height) {
                        tracing::debug!(width, height, "viewport resized");
                    }
                }
            }
        }
    }

    /// Maps pixel coordinates into uv space: x left-to-right, y bottom-to-top.
    pub fn normalise(&self, x: f64, y: f64) -> (f32, f32) {
        let width = f64::from(self.width.max(1));
        let height = f64::from(self.height.max(1));
        let u = (x / width).clamp(0.0, 1.0);
        let v = 1.0 - (y / height).clamp(0.0, 1.0);
        (u as f32, v as f32)
    }
}

/// Turns relative wheel deltas into an absolute, page-like scroll offset.
#[derive(Debug, Clone)]
pub struct WheelScroll {
    offset: f64,
    page_height: f64,
}

impl WheelScroll {
    pub fn new(page_height: f64) -> Self {
        Self {
            offset: 0.0,
            page_height: page_height.max(0.0),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Scrolls by `delta` pixels (positive moves down the page) and returns
    /// the new offset, kept within `[0, page_height - viewport_height]`.
    pub fn scroll_by(&mut self, delta: f64, viewport_height: u32) -> f64 {
        let max = (self.page_height - f64::from(viewport_height)).max(0.0);
        self.offset = (self.offset + delta).clamp(0.0, max);
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glow::StyleVars;

    #[derive(Debug, Default)]
    struct FakeViewport {
        size: (u32, u32),
        resizes: usize,
    }

    impl Viewport for FakeViewport {
        fn resize(&mut self, width: u32, height: u32) -> bool {
            if (width, height) == self.size || width == 0 || height == 0 {
                return false;
            }
            self.size = (width, height);
            self.resizes += 1;
            true
        }

        fn dimensions(&self) -> (u32, u32) {
            self.size
        }
    }

    #[test]
    fn pointer_moves_are_normalised_and_clamped() {
        let mut bridge = InputBridge::new(800, 600);
        let mut uniforms = UniformState::new();
        let mut glow = CursorGlowLoop::new(StyleVars::new());

        bridge.handle::<_, FakeViewport>(
            InputEvent::PointerMoved { x: 400.0, y: 150.0 },
            &mut uniforms,
            &mut glow,
            None,
        );
        assert_eq!(uniforms.cursor(), (0.5, 0.75));
        assert_eq!(glow.position().raw_x, 400.0);
        assert_eq!(glow.position().raw_y, 150.0);

        bridge.handle::<_, FakeViewport>(
            InputEvent::PointerMoved { x: -40.0, y: 900.0 },
            &mut uniforms,
            &mut glow,
            None,
        );
        assert_eq!(uniforms.cursor(), (0.0, 0.0));
    }

    #[test]
    fn scroll_is_forwarded_unchanged() {
        let mut bridge = InputBridge::new(800, 600);
        let mut uniforms = UniformState::new();
        let mut glow = CursorGlowLoop::new(StyleVars::new());
        bridge.handle::<_, FakeViewport>(
            InputEvent::Scrolled { offset: 1234.0 },
            &mut uniforms,
            &mut glow,
            None,
        );
        assert_eq!(uniforms.scroll_offset(), 1234.0);
    }

    #[test]
    fn resize_updates_viewport_only() {
        let mut bridge = InputBridge::new(800, 600);
        let mut uniforms = UniformState::new();
        let mut glow = CursorGlowLoop::new(StyleVars::new());
        let mut viewport = FakeViewport {
            size: (800, 600),
            resizes: 0,
        };

        bridge.handle(
            InputEvent::PointerMoved { x: 200.0, y: 300.0 },
            &mut uniforms,
            &mut glow,
            Some(&mut viewport),
        );
        bridge.handle(
            InputEvent::Scrolled { offset: 42.0 },
            &mut uniforms,
            &mut glow,
            Some(&mut viewport),
        );
        let before = (uniforms.cursor(), uniforms.scroll_offset());

        bridge.handle(
            InputEvent::Resized {
                width: 1280,
                height: 720,
            },
            &mut uniforms,
            &mut glow,
            Some(&mut viewport),
        );

        assert_eq!(viewport.dimensions(), (1280, 720));
        assert_eq!(bridge.dimensions(), (1280, 720));
        assert_eq!((uniforms.cursor(), uniforms.scroll_offset()), before);

        bridge.handle(
            InputEvent::Resized {
                width: 1280,
                height: 720,
            },
            &mut uniforms,
            &mut glow,
            Some(&mut viewport),
        );
        assert_eq!(viewport.resizes, 1);
    }

    #[test]
    fn wheel_scroll_stays_within_page() {
        let mut scroll = WheelScroll::new(2000.0);
        assert_eq!(scroll.scroll_by(-50.0, 600), 0.0);
        assert_eq!(scroll.scroll_by(300.0, 600), 300.0);
        assert_eq!(scroll.scroll_by(5000.0, 600), 1400.0);

        let mut short_page = WheelScroll::new(300.0);
        assert_eq!(short_page.scroll_by(100.0, 600), 0.0);
    }
}
