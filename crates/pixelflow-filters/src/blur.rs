//! Gaussian blur filter with a cached weight-grid texture.

use std::sync::Arc;

use pixelflow_core::Result;
use pixelflow_gpu::{ComputeContext, GpuTexture};
use tracing::trace;

use crate::kernels;
use crate::provider::{TextureConsumer, TextureProvider, WeakProvider};
use crate::stage::{FilterStage, KernelArg, KernelArguments};

/// Gaussian blur filter node.
///
/// `radius` is the blur extent in pixels; `sigma` is re-derived as
/// `radius / 2` whenever the radius changes. The normalized weight grid is
/// generated on the CPU and cached as an R32F texture; it is regenerated
/// only when one of the two parameters changes, independently of how often
/// the stage itself recomputes.
pub struct GaussianBlurFilter {
    stage: FilterStage,
    args: BlurArguments,
}

struct BlurArguments {
    radius: f32,
    sigma: f32,
    weights: Option<GpuTexture>,
}

impl GaussianBlurFilter {
    pub fn new(ctx: Arc<ComputeContext>, radius: f32) -> Result<Self> {
        let stage = FilterStage::new(ctx, kernels::GAUSSIAN_BLUR_2D)?;
        let radius = radius.max(0.0);
        Ok(Self {
            stage,
            args: BlurArguments {
                radius,
                sigma: radius / 2.0,
                weights: None,
            },
        })
    }

    pub fn radius(&self) -> f32 {
        self.args.radius
    }

    pub fn sigma(&self) -> f32 {
        self.args.sigma
    }

    /// Set the blur radius (negative input clamps to 0). Re-derives sigma
    /// and drops the cached weight grid.
    pub fn set_radius(&mut self, radius: f32) {
        let radius = radius.max(0.0);
        self.args.radius = radius;
        self.args.sigma = radius / 2.0;
        self.args.weights = None;
        self.stage.mark_dirty();
    }

    /// Override sigma independently of the radius.
    pub fn set_sigma(&mut self, sigma: f32) {
        self.args.sigma = sigma.max(0.0);
        self.args.weights = None;
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

impl TextureProvider for GaussianBlurFilter {
    fn current_texture(&mut self) -> Option<Arc<GpuTexture>> {
        self.stage.pull(&mut self.args)
    }

    fn generation(&self) -> u64 {
        self.stage.generation()
    }
}

impl TextureConsumer for GaussianBlurFilter {
    fn set_upstream(&mut self, upstream: Option<WeakProvider>) {
        self.stage.set_upstream(upstream);
    }
}

impl KernelArguments for BlurArguments {
    fn encode(&mut self, ctx: &ComputeContext) -> Result<Vec<KernelArg>> {
        let view = match &self.weights {
            Some(texture) => texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            None => {
                let grid = WeightGrid::generate(self.radius, self.sigma);
                let texture = GpuTexture::weight_texture(&ctx.device, grid.side);
                texture.upload_weights(&ctx.queue, &grid.values)?;
                trace!(
                    radius = self.radius,
                    sigma = self.sigma,
                    side = grid.side,
                    "regenerated blur weight grid"
                );
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.weights = Some(texture);
                view
            }
        };
        Ok(vec![KernelArg::Texture(view)])
    }
}

/// CPU-generated normalized Gaussian weight grid.
struct WeightGrid {
    side: u32,
    values: Vec<f32>,
}

impl WeightGrid {
    /// Grid side is `2 * round(radius) + 1`. Weights are
    /// `exp((x² + y²) · expScale)` with `expScale = -1 / (2σ²)`, sampled at
    /// `2r / (side - 1)` steps from `-radius`, then normalized to sum 1.
    ///
    /// A zero radius (or a sub-half-pixel one) degenerates to a single
    /// center weight: the kernel becomes a passthrough instead of dividing
    /// by zero.
    fn generate(radius: f32, sigma: f32) -> Self {
        let radius = radius.max(0.0);
        let side = (radius.round() as u32) * 2 + 1;
        if side == 1 || sigma <= 0.0 {
            return Self {
                side: 1,
                values: vec![1.0],
            };
        }

        let delta = 2.0 * radius / (side - 1) as f32;
        let exp_scale = -1.0 / (2.0 * sigma * sigma);

        let mut values = Vec::with_capacity((side * side) as usize);
        let mut sum = 0.0f32;
        for j in 0..side {
            let y = -radius + j as f32 * delta;
            for i in 0..side {
                let x = -radius + i as f32 * delta;
                let weight = ((x * x + y * y) * exp_scale).exp();
                values.push(weight);
                sum += weight;
            }
        }

        let scale = 1.0 / sum;
        for weight in &mut values {
            *weight *= scale;
        }

        Self { side, values }
    }
}
