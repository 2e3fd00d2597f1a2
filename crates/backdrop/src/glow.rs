use std::collections::BTreeMap;

use crate::runtime::{FrameCallback, FrameTick};

/// Per-frame interpolation factor toward the raw pointer position.
pub const SMOOTHING: f32 = 0.1;
/// Half the glow element's edge length; the transform centres it on the pointer.
pub const GLOW_RADIUS: f32 = 20.0;

pub const MOUSE_X_VAR: &str = "--mouse-x";
pub const MOUSE_Y_VAR: &str = "--mouse-y";

/// Receiver for the named style values the glow publishes every frame.
pub trait StyleSink {
    fn set_property(&mut self, name: &str, value: String);
    fn set_glow_transform(&mut self, value: String);
}

/// In-memory style variables, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleVars {
    properties: BTreeMap<String, String>,
    glow_transform: Option<String>,
}

impl StyleVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn glow_transform(&self) -> Option<&str> {
        self.glow_transform.as_deref()
    }
}

impl StyleSink for StyleVars {
    fn set_property(&mut self, name: &str, value: String) {
        self.properties.insert(name.to_string(), value);
    }

    fn set_glow_transform(&mut self, value: String) {
        self.glow_transform = Some(value);
    }
}

/// Raw and smoothed pointer coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlowPosition {
    pub raw_x: f32,
    pub raw_y: f32,
    pub smoothed_x: f32,
    pub smoothed_y: f32,
}

/// Trailing highlight that follows the pointer through a first-order
/// low-pass filter.
#[derive(Debug, Clone)]
pub struct CursorGlowLoop<S> {
    position: GlowPosition,
    sink: S,
}

impl<S: StyleSink> CursorGlowLoop<S> {
    pub fn new(sink: S) -> Self {
        Self::with_position(GlowPosition::default(), sink)
    }

    pub fn with_position(position: GlowPosition, sink: S) -> Self {
        Self { position, sink }
    }

    pub fn position(&self) -> GlowPosition {
        self.position
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.position.raw_x = x;
        self.position.raw_y = y;
    }

    pub fn tick(&mut self) {
        let position = &mut self.position;
        position.smoothed_x += (position.raw_x - position.smoothed_x) * SMOOTHING;
        position.smoothed_y += (position.raw_y - position.smoothed_y) * SMOOTHING;

        let (x, y) = (position.smoothed_x, position.smoothed_y);
        self.sink.set_glow_transform(format!(
            "translate({}px, {}px)",
            x - GLOW_RADIUS,
            y - GLOW_RADIUS
        ));
        self.sink.set_property(MOUSE_X_VAR, format!("{x}px"));
        self.sink.set_property(MOUSE_Y_VAR, format!("{y}px"));
    }
}

impl<S: StyleSink> FrameCallback for CursorGlowLoop<S> {
    fn on_frame(&mut self, _tick: FrameTick) {
        self.tick();
    }
}
