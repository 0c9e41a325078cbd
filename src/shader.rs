//! GPU-side data layouts and the embedded WGSL shaders.
//!
//! Two tiny pipelines share one uniform block: an instanced quad pipeline
//! that shades each particle as a radial gradient blob, and a line-list
//! pipeline for the connective mesh. Geometry arrives pre-computed in
//! screen pixels ([`crate::render::FrameGeometry`]); the vertex shaders
//! only map pixels to clip space (y-down to y-up).

use bytemuck::{Pod, Zeroable};

/// Per-frame uniforms shared by both pipelines.
///
/// `stops` are the four radial gradient stops (rgb + alpha factor) at
/// offsets 0.0 / 0.3 / 0.6 / 1.0.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
    pub stops: [[f32; 4]; 4],
    pub line_color: [f32; 4],
}

/// One gradient blob, instanced over a six-vertex quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BlobInstance {
    /// Center in screen px.
    pub center: [f32; 2],
    /// Rendered radius in px (growth already applied).
    pub radius: f32,
    /// Final opacity (life fade and global damping already applied).
    pub opacity: f32,
    /// Rotation angle in radians.
    pub angle: f32,
    pub _pad: f32,
}

/// One endpoint of a connective line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Position in screen px.
    pub position: [f32; 2],
    /// Segment opacity (distance falloff and life fade already applied).
    pub alpha: f32,
}

/// Instanced radial-gradient blob shader.
pub const BLOB_SHADER: &str = r#"struct Uniforms {
    resolution: vec2<f32>,
    _pad: vec2<f32>,
    stops: array<vec4<f32>, 4>,
    line_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) opacity: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) opacity: f32,
    @location(3) angle: f32,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let c = cos(angle);
    let s = sin(angle);
    let rotated = vec2<f32>(
        quad_pos.x * c - quad_pos.y * s,
        quad_pos.x * s + quad_pos.y * c,
    );
    let world = center + rotated * radius;

    // Pixels to clip space; pixel y grows downward.
    let ndc = vec2<f32>(
        world.x / uniforms.resolution.x * 2.0 - 1.0,
        1.0 - world.y / uniforms.resolution.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.uv = quad_pos;
    out.opacity = opacity;
    return out;
}

fn ramp_sample(t: f32) -> vec4<f32> {
    if t < 0.3 {
        return mix(uniforms.stops[0], uniforms.stops[1], t / 0.3);
    }
    if t < 0.6 {
        return mix(uniforms.stops[1], uniforms.stops[2], (t - 0.3) / 0.3);
    }
    return mix(uniforms.stops[2], uniforms.stops[3], (t - 0.6) / 0.4);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let stop = ramp_sample(dist);
    return vec4<f32>(stop.rgb, stop.a * in.opacity);
}
"#;

/// Connective line shader.
pub const LINE_SHADER: &str = r#"struct Uniforms {
    resolution: vec2<f32>,
    _pad: vec2<f32>,
    stops: array<vec4<f32>, 4>,
    line_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) alpha: f32,
};

@vertex
fn vs_main(
    @location(0) position: vec2<f32>,
    @location(1) alpha: f32,
) -> VertexOutput {
    let ndc = vec2<f32>(
        position.x / uniforms.resolution.x * 2.0 - 1.0,
        1.0 - position.y / uniforms.resolution.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.alpha = alpha;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(uniforms.line_color.rgb, uniforms.line_color.a * in.alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(source: &str) {
        let module = naga::front::wgsl::parse_str(source).expect("WGSL parse failed");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .expect("WGSL validation failed");
    }

    #[test]
    fn test_blob_shader_is_valid_wgsl() {
        validate(BLOB_SHADER);
    }

    #[test]
    fn test_line_shader_is_valid_wgsl() {
        validate(LINE_SHADER);
    }

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 96);
        assert_eq!(std::mem::size_of::<BlobInstance>(), 24);
        assert_eq!(std::mem::size_of::<LineVertex>(), 12);
    }
}
