use std::borrow::Cow;

use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the wave/glow background fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("backdrop fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Minimal full-screen triangle vertex shader.
///
/// `v_uv` covers `[0, 1]` across the visible surface with y pointing up.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// The uniform block layout must match `ShaderUniforms` in `uniforms.rs`.
pub(crate) const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform BackdropParams {
    float time;
    float cursor_x;
    float cursor_y;
    float scroll_offset;
} params;

void main() {
    vec2 uv = v_uv;
    float dist = length(uv - vec2(0.5, 0.5));
    float mouseDist = length(uv - vec2(params.cursor_x, params.cursor_y));

    float wave = sin(dist * 10.0 - params.time * 2.0) * 0.5 + 0.5;
    wave *= sin(params.scroll_offset * 0.1) * 0.5 + 0.5;

    float intensity = smoothstep(0.0, 1.0, wave * (1.0 - mouseDist));
    outColor = vec4(vec3(intensity), 0.1);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_block_declares_every_uniform() {
        for field in ["time", "cursor_x", "cursor_y", "scroll_offset"] {
            assert!(
                FRAGMENT_SHADER_GLSL.contains(&format!("float {field};")),
                "missing {field}"
            );
        }
        assert!(FRAGMENT_SHADER_GLSL.contains("smoothstep(0.0, 1.0"));
    }
}
