//! PixelFlow GPU - wgpu compute plumbing
//!
//! Device/queue/kernel-library ownership and texture management for the
//! filter pipeline. Everything here is construction-time wiring; the
//! per-pull orchestration lives in `pixelflow-filters`.

pub mod context;
pub mod library;
pub mod texture;

pub use context::{CompiledKernel, ComputeContext};
pub use library::{KernelLibrary, KernelSource};
pub use texture::GpuTexture;
