// ============================================================================
// GPU SHADERS: WGSL source kept inline
// ============================================================================

// ============================================================================
// CANDIDATE ERROR SHADER: one fragment per weighted-selection candidate
// ============================================================================
//
// The render target is an R32Uint texture sized to the candidate lattice.
// Fragment (i, j) compares the canvas block (block_tex) with the source
// rectangle at (i, j) * stride over the top strip and the left strip (shared
// corner counted once) and writes the rounded mean RGB distance in 8-bit
// units.  Texels are fetched with textureLoad, i.e. exact nearest samples.
/// Fragment pass computing one overlap error per candidate origin
pub const CANDIDATE_ERROR_SHADER: &str = r"
struct SelectionParams {
    top_overlap: vec2<u32>,
    left_overlap: vec2<u32>,
    stride: u32,
    compared_pixels: u32,
    _pad: vec2<u32>,
};

@group(0) @binding(0) var source_tex: texture_2d<f32>;
@group(0) @binding(1) var block_tex: texture_2d<f32>;
@group(0) @binding(2) var<uniform> params: SelectionParams;

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> @builtin(position) vec4<f32> {
    // Oversized triangle covering the whole target
    let x = f32((vi << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(vi & 2u) * 2.0 - 1.0;
    return vec4<f32>(x, y, 0.0, 1.0);
}

fn pixel_error(offset: vec2<u32>, candidate: vec2<u32>) -> f32 {
    let placed = textureLoad(block_tex, vec2<i32>(offset), 0).rgb;
    let sampled = textureLoad(source_tex, vec2<i32>(candidate + offset), 0).rgb;
    return distance(placed, sampled) * 255.0;
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<u32> {
    let candidate = vec2<u32>(position.xy) * params.stride;
    var total = 0.0;

    for (var y = 0u; y < params.top_overlap.y; y += 1u) {
        for (var x = 0u; x < params.top_overlap.x; x += 1u) {
            total += pixel_error(vec2<u32>(x, y), candidate);
        }
    }

    for (var y = params.top_overlap.y; y < params.left_overlap.y; y += 1u) {
        for (var x = 0u; x < params.left_overlap.x; x += 1u) {
            total += pixel_error(vec2<u32>(x, y), candidate);
        }
    }

    let mean = total / max(f32(params.compared_pixels), 1.0);
    return vec4<u32>(u32(round(mean)), 0u, 0u, 1u);
}
";
