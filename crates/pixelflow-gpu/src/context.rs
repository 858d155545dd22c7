//! GPU context management.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pixelflow_core::{PixelFlowError, Result};
use tracing::{info, warn};

use crate::library::{KernelLibrary, KernelSource};

/// Shared, read-only-after-init handle to the GPU device, kernel library
/// and command queue.
///
/// Created once, then shared by `Arc` across every filter in a pipeline.
/// The only mutable state is the dispatch counter, which exists so hosts
/// and tests can observe how much GPU work a pull actually issued.
pub struct ComputeContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    library: KernelLibrary,
    dispatches: AtomicU64,
}

impl ComputeContext {
    /// Create a new compute context and compile the given kernel sources.
    ///
    /// Tries a hardware adapter first, then the software fallback so
    /// headless hosts still get a working device.
    pub async fn new(sources: &[KernelSource]) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match Self::request_adapter(&instance, false).await {
            Some(adapter) => adapter,
            None => {
                warn!("hardware adapter unavailable, trying software fallback");
                Self::request_adapter(&instance, true).await.ok_or_else(|| {
                    PixelFlowError::DeviceUnavailable("no suitable GPU adapter found".to_string())
                })?
            }
        };

        info!("using GPU adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("PixelFlow Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| {
                PixelFlowError::DeviceUnavailable(format!("failed to create device: {e}"))
            })?;

        let library = KernelLibrary::compile(&device, sources)?;

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            library,
            dispatches: AtomicU64::new(0),
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        force_fallback: bool,
    ) -> Option<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: force_fallback,
            })
            .await
    }

    /// Create a new compute context (blocking version).
    pub fn new_blocking(sources: &[KernelSource]) -> Result<Self> {
        pollster::block_on(Self::new(sources))
    }

    /// Get adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// The compiled kernel library.
    pub fn library(&self) -> &KernelLibrary {
        &self.library
    }

    /// Build a compute pipeline for the named kernel.
    ///
    /// Pipeline creation is expensive; filters do it once at construction
    /// and treat failure as fatal for that filter.
    pub fn kernel_pipeline(&self, name: &str) -> Result<CompiledKernel> {
        let module = self.library.module(name)?;
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(name),
                layout: None, // auto layout derived from the kernel's bindings
                module,
                entry_point: Some(name),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(PixelFlowError::KernelNotFound(format!("{name}: {err}")));
        }
        Ok(CompiledKernel {
            name: name.to_string(),
            pipeline,
        })
    }

    /// Submit one encoder's commands and block until the GPU has finished
    /// with them.
    ///
    /// This is the pipeline's single synchronization point: when it
    /// returns, the dispatched kernel's output is fully materialized.
    /// Callers wanting a non-blocking pipeline run the whole pull chain on
    /// a worker thread.
    pub fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) -> Result<()> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.queue.submit(std::iter::once(encoder.finish()));
        let _ = self.device.poll(wgpu::Maintain::Wait);
        let validation = pollster::block_on(self.device.pop_error_scope());
        let oom = pollster::block_on(self.device.pop_error_scope());
        if let Some(err) = validation.or(oom) {
            return Err(PixelFlowError::GpuExecution(err.to_string()));
        }
        self.dispatches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of successfully completed kernel dispatches.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches.load(Ordering::Relaxed)
    }
}

/// A compiled compute kernel, ready to bind.
#[derive(Debug)]
pub struct CompiledKernel {
    pub name: String,
    pub pipeline: wgpu::ComputePipeline,
}
