//! Texture provider/consumer capability traits and the static image source.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use pixelflow_core::{ImageBuffer, Result};
use pixelflow_gpu::{ComputeContext, GpuTexture};
use tracing::debug;

/// Anything that can hand out a current output texture.
///
/// `None` means "not ready yet" (e.g. an upstream asset still loading):
/// callers skip the frame rather than treating it as an error. Pulling may
/// trigger a recompute, hence `&mut self`; concurrent pulls on one node
/// are the caller's responsibility to serialize (wrap nodes in
/// [`SharedProvider`]).
pub trait TextureProvider: Send {
    fn current_texture(&mut self) -> Option<Arc<GpuTexture>>;

    /// Monotonic stamp, bumped whenever the output texture's contents
    /// change (a recompute or a source swap). A clean downstream stage
    /// compares stamps to notice same-size content changes without doing
    /// any GPU work.
    fn generation(&self) -> u64;
}

/// A node that consumes an upstream provider's texture.
///
/// The upstream reference is wiring only: consumers hold a
/// [`WeakProvider`] and never keep their provider alive.
pub trait TextureConsumer {
    fn set_upstream(&mut self, upstream: Option<WeakProvider>);
}

/// Shared handle to a provider node. The graph builder owns these.
pub type SharedProvider = Arc<Mutex<dyn TextureProvider>>;

/// Non-owning back-reference from a consumer to its upstream.
pub type WeakProvider = Weak<Mutex<dyn TextureProvider>>;

/// Wrap a provider node for shared ownership.
pub fn share<P: TextureProvider + 'static>(provider: P) -> Arc<Mutex<P>> {
    Arc::new(Mutex::new(provider))
}

/// Leaf provider: a static image uploaded to a GPU texture once at
/// construction.
pub struct ImageSource {
    texture: Arc<GpuTexture>,
    generation: u64,
}

impl ImageSource {
    pub fn new(ctx: &ComputeContext, image: &ImageBuffer) -> Result<Self> {
        let texture = Self::upload(ctx, image)?;
        Ok(Self {
            texture,
            generation: 0,
        })
    }

    /// Replace the source image (e.g. the host loaded a new asset).
    ///
    /// Bumps the generation stamp so downstream stages recompute on their
    /// next pull.
    pub fn replace(&mut self, ctx: &ComputeContext, image: &ImageBuffer) -> Result<()> {
        self.texture = Self::upload(ctx, image)?;
        self.generation += 1;
        Ok(())
    }

    fn upload(ctx: &ComputeContext, image: &ImageBuffer) -> Result<Arc<GpuTexture>> {
        let texture = GpuTexture::source_texture(&ctx.device, image.width, image.height);
        texture.upload_image(&ctx.queue, image)?;
        debug!(
            width = image.width,
            height = image.height,
            "uploaded source image"
        );
        Ok(Arc::new(texture))
    }
}

impl TextureProvider for ImageSource {
    fn current_texture(&mut self) -> Option<Arc<GpuTexture>> {
        Some(self.texture.clone())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
