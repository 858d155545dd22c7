//! Error types for PixelFlow.

use thiserror::Error;

/// Main error type for PixelFlow operations.
///
/// The first three variants are construction-time failures: the capability
/// they report is permanently absent on this host, so the pipeline that
/// needed it cannot be built. The remaining variants are recoverable at the
/// filter level.
#[derive(Error, Debug)]
pub enum PixelFlowError {
    #[error("GPU device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("kernel library load failure: {0}")]
    LibraryLoad(String),

    #[error("kernel not found: {0}")]
    KernelNotFound(String),

    #[error("upstream texture not ready")]
    UpstreamNotReady,

    #[error("GPU execution failure: {0}")]
    GpuExecution(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for PixelFlow operations.
pub type Result<T> = std::result::Result<T, PixelFlowError>;
