//! CPU reference of the background fragment stage.
//!
//! Mirrors `FRAGMENT_SHADER_GLSL` in `compile.rs` line for line so the
//! behaviour can be checked without a GPU.

use crate::uniforms::UniformState;

/// Alpha written by the fragment stage for every pixel.
pub const PIXEL_ALPHA: f32 = 0.1;

/// GLSL `smoothstep`: clamps then eases with a cubic Hermite curve.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Greyscale intensity for the pixel at normalised coordinate `uv`.
pub fn intensity(uv: (f32, f32), uniforms: &UniformState) -> f32 {
    let (cursor_x, cursor_y) = uniforms.cursor();
    let dist = length(uv.0 - 0.5, uv.1 - 0.5);
    let mouse_dist = length(uv.0 - cursor_x, uv.1 - cursor_y);

    let mut wave = (dist * 10.0 - uniforms.shader_time() * 2.0).sin() * 0.5 + 0.5;
    wave *= (uniforms.scroll_offset() * 0.1).sin() * 0.5 + 0.5;

    smoothstep(0.0, 1.0, wave * (1.0 - mouse_dist))
}

/// Full RGBA pixel as written by the shader.
pub fn pixel(uv: (f32, f32), uniforms: &UniformState) -> [f32; 4] {
    let value = intensity(uv, uniforms);
    [value, value, value, PIXEL_ALPHA]
}

fn length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_clamps_outside_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -3.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 4.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn intensity_stays_in_unit_range_across_inputs() {
        let mut uniforms = UniformState::new();
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            uniforms.set_cursor(t, 1.0 - t);
            uniforms.set_scroll_offset(step as f32 * 37.0);
            uniforms.advance_time();
            for px in 0..=8 {
                for py in 0..=8 {
                    let uv = (px as f32 / 8.0, py as f32 / 8.0);
                    let value = intensity(uv, &uniforms);
                    assert!((0.0..=1.0).contains(&value), "intensity {value} at {uv:?}");
                }
            }
        }
    }

    #[test]
    fn pixel_is_translucent_greyscale() {
        let uniforms = UniformState::new();
        let [r, g, b, a] = pixel((0.25, 0.75), &uniforms);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, PIXEL_ALPHA);
    }

    #[test]
    fn scroll_phase_at_trough_darkens_everything() {
        let mut uniforms = UniformState::new();
        // sin(x * 0.1) == -1 at x = 15π
        uniforms.set_scroll_offset(15.0 * std::f32::consts::PI);
        assert!(intensity((0.5, 0.5), &uniforms) < 1e-4);
    }
}
