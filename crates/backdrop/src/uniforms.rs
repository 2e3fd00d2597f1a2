use bytemuck::{Pod, Zeroable};

/// Fixed amount of shader time added per rendered frame.
pub const TIME_STEP: f64 = 0.01;

/// Scalar inputs that parameterise the background shader.
///
/// Cursor coordinates live in shader uv space (`[0, 1]`, origin bottom-left)
/// and are clamped on write. Scroll offset is in pixels and never negative.
/// `time` only moves forward through [`UniformState::advance_time`]. It is
/// accumulated in `f64` and narrowed to `f32` only for upload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformState {
    time: f64,
    cursor_x: f32,
    cursor_y: f32,
    scroll_offset: f32,
}

impl UniformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time as the shader sees it.
    pub fn shader_time(&self) -> f32 {
        self.time as f32
    }

    pub fn cursor(&self) -> (f32, f32) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor_x = clamp_unit(x);
        self.cursor_y = clamp_unit(y);
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
    }

    pub fn advance_time(&mut self) -> f64 {
        self.time += TIME_STEP;
        self.time
    }

    pub(crate) fn as_shader_uniforms(&self) -> ShaderUniforms {
        ShaderUniforms {
            time: self.shader_time(),
            cursor_x: self.cursor_x,
            cursor_y: self.cursor_y,
            scroll_offset: self.scroll_offset,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// std140 mirror of the `BackdropParams` block in the fragment shader.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct ShaderUniforms {
    pub time: f32,
    pub cursor_x: f32,
    pub cursor_y: f32,
    pub scroll_offset: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_clamped_into_unit_square() {
        let mut state = UniformState::new();
        state.set_cursor(1.5, -0.25);
        assert_eq!(state.cursor(), (1.0, 0.0));
        state.set_cursor(f32::NAN, 0.4);
        assert_eq!(state.cursor(), (0.0, 0.4));
    }

    #[test]
    fn time_advances_by_fixed_step() {
        let mut state = UniformState::new();
        let mut last = state.time();
        for _ in 0..100 {
            let next = state.advance_time();
            assert!(next >= last);
            last = next;
        }
        assert!((state.time() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn time_keeps_advancing_after_days_of_frames() {
        let mut state = UniformState::new();
        state.time = 262_144.0;
        let before = state.time();
        let after = state.advance_time();
        assert!(after > before);
        assert!((after - before - TIME_STEP).abs() < 1e-9);

        for _ in 0..10 {
            state.advance_time();
        }
        assert!(state.shader_time() > 262_144.0);
    }

    #[test]
    fn shader_uniforms_match_block_size() {
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 16);
        let mut state = UniformState::new();
        state.set_scroll_offset(-20.0);
        assert_eq!(state.as_shader_uniforms().scroll_offset, 0.0);
    }
}
