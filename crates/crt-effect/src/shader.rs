use std::borrow::Cow;

use wgpu::naga::ShaderStage;

use crate::error::EffectError;

/// Compiles the quad vertex stage, surfacing validation diagnostics as
/// [`EffectError::ShaderCompile`].
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule, EffectError> {
    compile_stage(device, "vertex", VERTEX_SHADER_GLSL, ShaderStage::Vertex)
}

/// Compiles the CRT fragment stage.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, EffectError> {
    compile_stage(device, "fragment", FRAGMENT_SHADER_GLSL, ShaderStage::Fragment)
}

fn compile_stage(
    device: &wgpu::Device,
    stage: &'static str,
    source: &'static str,
    kind: ShaderStage,
) -> Result<wgpu::ShaderModule, EffectError> {
    // create_shader_module reports failures through the validation error
    // scope rather than a return value; pop it to recover the log.
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage: kind,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(EffectError::ShaderCompile {
            stage,
            log: error.to_string(),
        });
    }
    Ok(module)
}

/// Vertex stage: overscans the quad so the curvature remap never exposes
/// the quad edge, flips Y to match the top-row-first source bitmap, and
/// forwards the texture coordinate untouched. `params.scale` is reserved
/// for dynamic zoom and stays at 1.0 in normal operation.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec4 position;
layout(location = 1) in vec2 tex_coord;
layout(location = 0) out vec2 v_uv;

layout(std140, set = 0, binding = 0) uniform EffectParams {
    vec2 resolution;
    float time;
    float scale;
} params;

const float OVERSCAN = 1.2;

void main() {
    v_uv = tex_coord;
    vec2 scaled = position.xy * OVERSCAN * params.scale;
    gl_Position = vec4(scaled.x, -scaled.y, position.z, position.w);
}
";

/// Fragment stage: the full CRT stack evaluated per output pixel.
///
/// Constants mirror [`crate::CrtTuning::default`]; the order of stages is
/// load-bearing (mask, remap, chromatic split, blur, scanlines, vignette,
/// grain, brightness, bloom) and the output alpha carries the bezel mask so
/// the corners composite as transparent.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform EffectParams {
    vec2 resolution;
    float time;
    float scale;
} params;

layout(set = 1, binding = 0) uniform texture2D frame_texture;
layout(set = 1, binding = 1) uniform sampler frame_sampler;

#define FRAME sampler2D(frame_texture, frame_sampler)

const float DISTORTION = 0.12;
const float CURVATURE = 0.25;
const float CONTRACTION = 0.98;
const float CORNER_RADIUS = 0.15;
const float CORNER_SMOOTH = 0.15;
const float ABERRATION = 0.015;
const float BLUR_MIX = 0.3;
const float SCANLINE_INTENSITY = 0.15;
const float VIGNETTE_INTENSITY = 0.6;
const float NOISE_INTENSITY = 0.015;
const float NOISE_CELL = 3.0;
const float BRIGHTNESS = 1.35;
const float BLOOM_STRENGTH = 0.45;
const float BLOOM_MIX = 0.1;

float corner_mask(vec2 uv) {
    vec2 centered = abs(uv * 2.0 - 1.0);
    vec2 past = max(centered - vec2(1.0 - CORNER_RADIUS), vec2(0.0));
    float dist = length(past);
    return 1.0 - smoothstep(CORNER_RADIUS - CORNER_SMOOTH, CORNER_RADIUS, dist);
}

vec2 curve_remap(vec2 uv) {
    vec2 centered = uv * 2.0 - 1.0;
    float r2 = dot(centered, centered);
    centered *= (1.0 + DISTORTION * r2 + CURVATURE * r2 * r2) * CONTRACTION;
    return centered * 0.5 + 0.5;
}

vec3 split_sample(vec2 uv) {
    vec2 dir = uv - 0.5;
    vec2 shift = dir * length(dir) * ABERRATION;
    float r = texture(FRAME, uv + shift).r;
    float g = texture(FRAME, uv).g;
    float b = texture(FRAME, uv - shift).b;
    return vec3(r, g, b);
}

vec3 blur_sample(vec2 uv) {
    vec2 px = vec2(1.0) / params.resolution;
    vec3 acc = split_sample(uv) * 0.25;
    acc += split_sample(uv + vec2(px.x, 0.0)) * 0.125;
    acc += split_sample(uv - vec2(px.x, 0.0)) * 0.125;
    acc += split_sample(uv + vec2(0.0, px.y)) * 0.125;
    acc += split_sample(uv - vec2(0.0, px.y)) * 0.125;
    acc += split_sample(uv + px) * 0.0625;
    acc += split_sample(uv - px) * 0.0625;
    acc += split_sample(uv + vec2(px.x, -px.y)) * 0.0625;
    acc += split_sample(uv + vec2(-px.x, px.y)) * 0.0625;
    return acc;
}

vec3 bloom_sample(vec2 uv) {
    vec2 px = vec2(1.0) / params.resolution;
    vec3 acc = vec3(0.0);
    for (int x = -2; x <= 2; x++) {
        for (int y = -2; y <= 2; y++) {
            acc += split_sample(uv + px * vec2(float(x), float(y)));
        }
    }
    return acc / 25.0;
}

float scanline_factor(vec2 uv) {
    float wobble = sin(uv.x * 12.0) * 0.5;
    float s1 = sin(uv.y * 640.0 + wobble);
    float s2 = sin(uv.y * 320.0 + params.time * 1.5);
    float wave = 0.5 * (s1 + s2);
    return 1.0 - SCANLINE_INTENSITY * (0.5 + 0.5 * wave);
}

float vignette_factor(vec2 uv) {
    vec2 centered = (uv * 2.0 - 1.0) * vec2(1.0, 0.75);
    float fall = 1.0 - smoothstep(0.6, 1.5, length(centered));
    return pow(fall, 1.5);
}

float grain(vec2 uv) {
    vec2 cell = floor(uv * params.resolution / NOISE_CELL);
    float seed = dot(cell, vec2(12.9898, 78.233)) + fract(params.time) * 43.0;
    return fract(sin(seed) * 43758.547);
}

void main() {
    float mask = corner_mask(v_uv);
    if (mask <= 0.0) {
        out_color = vec4(0.0, 0.0, 0.0, 0.0);
        return;
    }

    vec2 suv = curve_remap(v_uv);
    if (suv.x < 0.0 || suv.x > 1.0 || suv.y < 0.0 || suv.y > 1.0) {
        out_color = vec4(0.0, 0.0, 0.0, mask);
        return;
    }

    vec3 color = split_sample(suv);
    color = mix(blur_sample(suv), color, 1.0 - BLUR_MIX);
    color *= scanline_factor(suv);
    color = mix(color, color * vignette_factor(v_uv), VIGNETTE_INTENSITY);
    color += vec3((grain(v_uv) * 2.0 - 1.0) * NOISE_INTENSITY);
    color *= BRIGHTNESS;

    vec3 bloom = bloom_sample(suv);
    color += bloom * BLOOM_STRENGTH;
    color = mix(color, bloom, BLOOM_MIX);

    out_color = vec4(color * mask, mask);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::CrtTuning;

    #[test]
    fn stages_declare_matching_uniform_blocks() {
        for source in [VERTEX_SHADER_GLSL, FRAGMENT_SHADER_GLSL] {
            assert!(source.contains("uniform EffectParams"));
            assert!(source.contains("vec2 resolution;"));
            assert!(source.contains("float time;"));
            assert!(source.contains("float scale;"));
        }
    }

    #[test]
    fn fragment_constants_mirror_the_tuning_defaults() {
        let tuning = CrtTuning::default();
        let pairs = [
            ("DISTORTION", tuning.distortion),
            ("CURVATURE", tuning.curvature),
            ("CONTRACTION", tuning.contraction),
            ("CORNER_RADIUS", tuning.corner_radius),
            ("CORNER_SMOOTH", tuning.corner_smooth),
            ("ABERRATION", tuning.aberration),
            ("BLUR_MIX", tuning.blur_mix),
            ("SCANLINE_INTENSITY", tuning.scanline_intensity),
            ("VIGNETTE_INTENSITY", tuning.vignette_intensity),
            ("NOISE_INTENSITY", tuning.noise_intensity),
            ("NOISE_CELL", tuning.noise_cell),
            ("BRIGHTNESS", tuning.brightness),
            ("BLOOM_STRENGTH", tuning.bloom_strength),
            ("BLOOM_MIX", tuning.bloom_mix),
        ];
        for (name, value) in pairs {
            let declaration = format!("const float {name} = {};", glsl_float(value));
            assert!(
                FRAGMENT_SHADER_GLSL.contains(&declaration),
                "missing or stale constant: {declaration}"
            );
        }
        let overscan = format!("const float OVERSCAN = {};", glsl_float(tuning.overscan));
        assert!(VERTEX_SHADER_GLSL.contains(&overscan));
    }

    fn glsl_float(value: f32) -> String {
        if value.fract() == 0.0 {
            format!("{value:.1}")
        } else {
            format!("{value}")
        }
    }

    #[test]
    fn fragment_alpha_carries_the_bezel_mask() {
        assert!(FRAGMENT_SHADER_GLSL.contains("out_color = vec4(color * mask, mask);"));
    }
}
