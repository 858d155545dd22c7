//! Named WGSL kernel registry.

use std::collections::HashMap;

use pixelflow_core::{PixelFlowError, Result};
use tracing::debug;

/// A named compute kernel source. `name` doubles as the WGSL entry point.
#[derive(Debug, Clone, Copy)]
pub struct KernelSource {
    pub name: &'static str,
    pub wgsl: &'static str,
}

/// Compiled kernel library: one shader module per registered kernel.
///
/// Immutable after construction; lookups never touch the GPU.
pub struct KernelLibrary {
    modules: HashMap<&'static str, wgpu::ShaderModule>,
}

impl KernelLibrary {
    /// Compile every kernel source. Any WGSL validation error fails the
    /// whole library.
    pub fn compile(device: &wgpu::Device, sources: &[KernelSource]) -> Result<Self> {
        let mut modules = HashMap::new();
        for src in sources {
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(src.name),
                source: wgpu::ShaderSource::Wgsl(src.wgsl.into()),
            });
            if let Some(err) = pollster::block_on(device.pop_error_scope()) {
                return Err(PixelFlowError::LibraryLoad(format!("{}: {}", src.name, err)));
            }
            debug!(kernel = src.name, "compiled kernel module");
            modules.insert(src.name, module);
        }
        Ok(Self { modules })
    }

    /// Look up a compiled module by kernel name.
    pub fn module(&self, name: &str) -> Result<&wgpu::ShaderModule> {
        self.modules
            .get(name)
            .ok_or_else(|| PixelFlowError::KernelNotFound(name.to_string()))
    }

    /// Registered kernel names.
    pub fn kernel_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.keys().copied()
    }

    /// Number of registered kernels.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
