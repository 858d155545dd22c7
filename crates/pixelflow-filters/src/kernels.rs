//! Built-in WGSL compute kernels, kept inline as source constants.
//!
//! Every kernel binds the input texture at slot 0 and the output storage
//! texture at slot 1; filter-specific resources start at slot 2. The
//! entry point name doubles as the registry key.

use pixelflow_gpu::KernelSource;

/// Kernel name (and entry point) for the Gaussian blur kernel.
pub const GAUSSIAN_BLUR_2D: &str = "gaussian_blur_2d";

/// Kernel name (and entry point) for the saturation kernel.
pub const SATURATION_ADJUST: &str = "saturation_adjust";

/// 2D window convolution against a precomputed R32F weight grid bound at
/// slot 2. Input coordinates clamp to the texture edge.
pub const GAUSSIAN_BLUR_2D_WGSL: &str = r#"
@group(0) @binding(0) var input_texture: texture_2d<f32>;
@group(0) @binding(1) var output_texture: texture_storage_2d<rgba8unorm, write>;
@group(0) @binding(2) var weight_texture: texture_2d<f32>;

@compute @workgroup_size(16, 16, 1)
fn gaussian_blur_2d(@builtin(global_invocation_id) gid: vec3<u32>) {
    let dims = textureDimensions(input_texture);
    if (gid.x >= dims.x || gid.y >= dims.y) {
        return;
    }

    let side = i32(textureDimensions(weight_texture).x);
    let radius = side / 2;
    let max_coord = vec2<i32>(dims) - vec2<i32>(1, 1);
    let center = vec2<i32>(gid.xy);

    var acc = vec3<f32>(0.0, 0.0, 0.0);
    for (var j = 0; j < side; j = j + 1) {
        for (var i = 0; i < side; i = i + 1) {
            let offset = vec2<i32>(i - radius, j - radius);
            let coord = clamp(center + offset, vec2<i32>(0, 0), max_coord);
            let weight = textureLoad(weight_texture, vec2<i32>(i, j), 0).r;
            acc = acc + textureLoad(input_texture, coord, 0).rgb * weight;
        }
    }

    let alpha = textureLoad(input_texture, center, 0).a;
    textureStore(output_texture, center, vec4<f32>(acc, alpha));
}
"#;

/// Luma-preserving saturation scale: 0 = grayscale, 1 = identity, above 1
/// over-saturates. Rec.601 luma coefficients.
pub const SATURATION_ADJUST_WGSL: &str = r#"
struct SaturationUniforms {
    factor: f32,
};

@group(0) @binding(0) var input_texture: texture_2d<f32>;
@group(0) @binding(1) var output_texture: texture_storage_2d<rgba8unorm, write>;
@group(0) @binding(2) var<uniform> params: SaturationUniforms;

@compute @workgroup_size(16, 16, 1)
fn saturation_adjust(@builtin(global_invocation_id) gid: vec3<u32>) {
    let dims = textureDimensions(input_texture);
    if (gid.x >= dims.x || gid.y >= dims.y) {
        return;
    }

    let coord = vec2<i32>(gid.xy);
    let color = textureLoad(input_texture, coord, 0);
    let gray = dot(color.rgb, vec3<f32>(0.299, 0.587, 0.114));
    let rgb = mix(vec3<f32>(gray, gray, gray), color.rgb, params.factor);
    textureStore(output_texture, coord, vec4<f32>(rgb, color.a));
}
"#;

/// The built-in kernel registry handed to `ComputeContext`.
pub fn builtin_kernels() -> Vec<KernelSource> {
    vec![
        KernelSource {
            name: GAUSSIAN_BLUR_2D,
            wgsl: GAUSSIAN_BLUR_2D_WGSL,
        },
        KernelSource {
            name: SATURATION_ADJUST,
            wgsl: SATURATION_ADJUST_WGSL,
        },
    ]
}
