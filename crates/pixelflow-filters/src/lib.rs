//! PixelFlow Filters - lazy, invalidation-driven GPU filter graph
//!
//! A filter node is both a texture consumer (it pulls its input on demand
//! from an upstream provider) and a texture provider (it exposes its own
//! cached output texture). A parameter change marks one node dirty; the
//! next pull recomputes that node and everything downstream of it, one
//! synchronous kernel dispatch per stale stage. Clean stages answer from
//! cache with zero GPU work.

pub mod blur;
pub mod chain;
pub mod kernels;
pub mod params;
pub mod provider;
pub mod saturation;
pub mod stage;

pub use blur::GaussianBlurFilter;
pub use chain::FilterChain;
pub use kernels::builtin_kernels;
pub use params::{builtin_filters, FilterDescriptor, ParamDescriptor, ParamValue};
pub use provider::{
    share, ImageSource, SharedProvider, TextureConsumer, TextureProvider, WeakProvider,
};
pub use saturation::SaturationFilter;
pub use stage::{FilterStage, KernelArg, KernelArguments, TILE_SIZE};
