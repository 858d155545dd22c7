//! The lazy filter stage: dirty tracking, output caching and dispatch
//! orchestration shared by every concrete filter.

use std::sync::Arc;

use pixelflow_core::{PixelFlowError, Result};
use pixelflow_gpu::{CompiledKernel, ComputeContext, GpuTexture};
use tracing::{debug, trace, warn};

use crate::provider::WeakProvider;

/// Workgroup tile edge in pixels; matches `@workgroup_size(16, 16, 1)` in
/// the built-in kernels.
pub const TILE_SIZE: u32 = 16;

/// An extra resource bound by a concrete filter, starting at slot 2.
/// Slots 0 and 1 are always the input and output textures.
pub enum KernelArg {
    Texture(wgpu::TextureView),
    Uniform(wgpu::Buffer),
}

/// Per-filter parameter marshaling hook, called once per recompute.
///
/// Derived resources (e.g. a blur weight texture) should be cached inside
/// the implementor and regenerated only when the parameters feeding them
/// changed.
pub trait KernelArguments {
    fn encode(&mut self, ctx: &ComputeContext) -> Result<Vec<KernelArg>>;
}

/// Dirty-flag + cached-output engine wrapping one compute kernel.
///
/// Invariant: the cached output is served only while the stage is clean
/// and the upstream texture it was computed from is unchanged (same
/// generation stamp and dimensions). Everything else forces one
/// synchronous recompute.
pub struct FilterStage {
    ctx: Arc<ComputeContext>,
    kernel: CompiledKernel,
    upstream: Option<WeakProvider>,
    output: Option<Arc<GpuTexture>>,
    /// (generation, width, height) of the input the cache was computed from.
    last_input: Option<(u64, u32, u32)>,
    dirty: bool,
    generation: u64,
}

impl FilterStage {
    /// Compile the named kernel and start in the dirty state so the first
    /// pull computes.
    pub fn new(ctx: Arc<ComputeContext>, kernel_name: &str) -> Result<Self> {
        let kernel = ctx.kernel_pipeline(kernel_name)?;
        debug!(kernel = kernel_name, "created filter stage");
        Ok(Self {
            ctx,
            kernel,
            upstream: None,
            output: None,
            last_input: None,
            dirty: true,
            generation: 0,
        })
    }

    pub fn context(&self) -> &Arc<ComputeContext> {
        &self.ctx
    }

    pub fn kernel_name(&self) -> &str {
        &self.kernel.name
    }

    /// Mark the cached output stale. Parameter setters route here; any
    /// number of calls between two pulls coalesce into a single recompute.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Stamp bumped on every successful recompute.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rewire the upstream reference. The new input invalidates the cache.
    pub fn set_upstream(&mut self, upstream: Option<WeakProvider>) {
        self.upstream = upstream;
        self.last_input = None;
        self.dirty = true;
    }

    /// Pull this stage's output texture.
    ///
    /// Clean with an unchanged input: returns the cached texture, zero GPU
    /// work, identical handle. Otherwise: one synchronous recompute; on
    /// failure the stage stays dirty, any previous output is preserved and
    /// `None` is returned so no partial frame is shown.
    pub fn pull(&mut self, args: &mut dyn KernelArguments) -> Option<Arc<GpuTexture>> {
        let (input, input_generation) = match self.pull_upstream() {
            Ok(pulled) => pulled,
            Err(err) => {
                if self.dirty {
                    trace!(kernel = %self.kernel.name, error = %err, "skipping recompute");
                    return None;
                }
                // Upstream went away after a successful compute; serve the
                // stale cache rather than go blank.
                return self.output.clone();
            }
        };

        let input_state = (input_generation, input.width, input.height);
        if !self.dirty && self.last_input == Some(input_state) {
            return self.output.clone();
        }

        match self.recompute(&input, args) {
            Ok(texture) => {
                self.dirty = false;
                self.last_input = Some(input_state);
                self.generation += 1;
                Some(texture)
            }
            Err(err) => {
                self.dirty = true;
                warn!(
                    kernel = %self.kernel.name,
                    error = %err,
                    "recompute failed, keeping previous output"
                );
                None
            }
        }
    }

    fn pull_upstream(&self) -> Result<(Arc<GpuTexture>, u64)> {
        let upstream = self
            .upstream
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .ok_or(PixelFlowError::UpstreamNotReady)?;
        // try_lock: a re-entrant pull (cyclic wiring, or a caller violating
        // the single-thread contract) reads as "not ready" instead of
        // deadlocking.
        let mut guard = upstream
            .try_lock()
            .ok_or(PixelFlowError::UpstreamNotReady)?;
        let texture = guard
            .current_texture()
            .ok_or(PixelFlowError::UpstreamNotReady)?;
        let generation = guard.generation();
        Ok((texture, generation))
    }

    fn recompute(
        &mut self,
        input: &Arc<GpuTexture>,
        args: &mut dyn KernelArguments,
    ) -> Result<Arc<GpuTexture>> {
        // Reuse the cached output in place when the size still matches;
        // reallocate otherwise. The cache itself is only replaced after a
        // successful dispatch.
        let target = match &self.output {
            Some(out) if out.same_size(input.width, input.height) => out.clone(),
            _ => {
                trace!(
                    kernel = %self.kernel.name,
                    width = input.width,
                    height = input.height,
                    "allocating output texture"
                );
                Arc::new(GpuTexture::filter_output(
                    &self.ctx.device,
                    input.width,
                    input.height,
                ))
            }
        };

        let extra = args.encode(&self.ctx)?;
        self.dispatch(input, &target, &extra)?;
        self.output = Some(target.clone());
        Ok(target)
    }

    fn dispatch(
        &self,
        input: &GpuTexture,
        output: &GpuTexture,
        extra: &[KernelArg],
    ) -> Result<()> {
        if !input.same_size(output.width, output.height) {
            return Err(PixelFlowError::GpuExecution(format!(
                "input {}x{} does not match output {}x{}",
                input.width, input.height, output.width, output.height
            )));
        }

        let device = &self.ctx.device;

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&input.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&output.view),
            },
        ];
        for (i, arg) in extra.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: 2 + i as u32,
                resource: match arg {
                    KernelArg::Texture(view) => wgpu::BindingResource::TextureView(view),
                    KernelArg::Uniform(buffer) => buffer.as_entire_binding(),
                },
            });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.kernel.name.as_str()),
            layout: &self.kernel.pipeline.get_bind_group_layout(0),
            entries: &entries,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("pixelflow-filter-encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(self.kernel.name.as_str()),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.kernel.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            // One workgroup per tile, rounded up so edge pixels are covered;
            // the kernels bounds-check the partial tiles.
            pass.dispatch_workgroups(
                output.width.div_ceil(TILE_SIZE),
                output.height.div_ceil(TILE_SIZE),
                1,
            );
        }
        self.ctx.submit_and_wait(encoder)
    }
}
