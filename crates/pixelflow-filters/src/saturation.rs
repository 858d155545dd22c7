//! Saturation adjustment filter.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use pixelflow_core::Result;
use pixelflow_gpu::{ComputeContext, GpuTexture};
use wgpu::util::DeviceExt;

use crate::kernels;
use crate::provider::{TextureConsumer, TextureProvider, WeakProvider};
use crate::stage::{FilterStage, KernelArg, KernelArguments};

/// Uniform block for the saturation kernel, padded to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SaturationUniforms {
    factor: f32,
    _pad: [f32; 3],
}

/// Saturation filter node: 0 = grayscale, 1 = original colors, above 1
/// over-saturates.
///
/// The single scalar is marshaled into a fresh uniform buffer on each
/// recompute; the parameter buffer is the full derived state, so unlike
/// the blur filter there is nothing extra to cache.
pub struct SaturationFilter {
    stage: FilterStage,
    args: SaturationArguments,
}

struct SaturationArguments {
    factor: f32,
}

impl SaturationFilter {
    pub fn new(ctx: Arc<ComputeContext>, saturation: f32) -> Result<Self> {
        let stage = FilterStage::new(ctx, kernels::SATURATION_ADJUST)?;
        Ok(Self {
            stage,
            args: SaturationArguments {
                factor: saturation.max(0.0),
            },
        })
    }

    pub fn saturation(&self) -> f32 {
        self.args.factor
    }

    /// Set the saturation factor (negative input clamps to 0).
    pub fn set_saturation(&mut self, saturation: f32) {
        self.args.factor = saturation.max(0.0);
        self.stage.mark_dirty();
    }

    /// Force a recompute on the next pull even though no parameter changed.
    pub fn invalidate(&mut self) {
        self.stage.mark_dirty();
    }

    pub fn is_dirty(&self) -> bool {
        self.stage.is_dirty()
    }
}

impl TextureProvider for SaturationFilter {
    fn current_texture(&mut self) -> Option<Arc<GpuTexture>> {
        self.stage.pull(&mut self.args)
    }

    fn generation(&self) -> u64 {
        self.stage.generation()
    }
}

impl TextureConsumer for SaturationFilter {
    fn set_upstream(&mut self, upstream: Option<WeakProvider>) {
        self.stage.set_upstream(upstream);
    }
}

impl KernelArguments for SaturationArguments {
    fn encode(&mut self, ctx: &ComputeContext) -> Result<Vec<KernelArg>> {
        let uniforms = SaturationUniforms {
            factor: self.factor,
            _pad: [0.0; 3],
        };
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("saturation-uniforms"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        Ok(vec![KernelArg::Uniform(buffer)])
    }
}
