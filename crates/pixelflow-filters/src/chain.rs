//! Linear filter chain: a builder-owned node list wired source to tail.

use std::sync::Arc;

use parking_lot::Mutex;
use pixelflow_gpu::GpuTexture;

use crate::provider::{SharedProvider, TextureConsumer, TextureProvider};

/// An acyclic chain of filter nodes, built by wiring each appended stage's
/// upstream reference to the previous tail.
///
/// The chain owns every node; the filters themselves only hold weak
/// upstream references, so dropping the chain drops the whole graph. The
/// terminal node's output texture is what the display layer consumes.
pub struct FilterChain {
    nodes: Vec<SharedProvider>,
    tail: SharedProvider,
}

impl FilterChain {
    /// Start a chain at a source provider.
    pub fn new<P>(source: P) -> Self
    where
        P: TextureProvider + 'static,
    {
        Self::from_shared(Arc::new(Mutex::new(source)))
    }

    /// Start a chain at an already-shared source node, e.g. when the host
    /// keeps its own handle for swapping the source image.
    pub fn from_shared(source: SharedProvider) -> Self {
        Self {
            nodes: vec![source.clone()],
            tail: source,
        }
    }

    /// Append a stage, wiring its upstream to the current tail. Returns a
    /// shared handle the host keeps for later parameter mutation.
    pub fn append<F>(&mut self, mut stage: F) -> Arc<Mutex<F>>
    where
        F: TextureProvider + TextureConsumer + 'static,
    {
        stage.set_upstream(Some(Arc::downgrade(&self.tail)));
        let handle = Arc::new(Mutex::new(stage));
        self.tail = handle.clone();
        self.nodes.push(self.tail.clone());
        handle
    }

    /// Number of nodes, including the source.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pull the terminal node's texture, lazily recomputing stale stages
    /// depth-first along the way. `None` while any needed stage is not
    /// ready.
    pub fn pull(&self) -> Option<Arc<GpuTexture>> {
        self.tail.lock().current_texture()
    }
}
