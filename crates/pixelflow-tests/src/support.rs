//! Shared helpers for GPU-backed tests.

use std::sync::Arc;

use pixelflow_filters::builtin_kernels;
use pixelflow_gpu::ComputeContext;

/// Acquire a fresh compute context (fresh dispatch counter), or `None`
/// when the host has no usable adapter, in which case the caller skips.
pub fn gpu_context() -> Option<Arc<ComputeContext>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    match ComputeContext::new_blocking(&builtin_kernels()) {
        Ok(ctx) => Some(Arc::new(ctx)),
        Err(err) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
    }
}
