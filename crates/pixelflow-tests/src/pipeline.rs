//! Dispatch-count and cache-identity properties of the filter pipeline.

use std::sync::Arc;

use pixelflow_core::ImageBuffer;
use pixelflow_filters::{
    share, FilterChain, GaussianBlurFilter, ImageSource, SaturationFilter, TextureProvider,
};
use pixelflow_gpu::GpuTexture;

use crate::support;

/// Provider that is never ready (simulates an asset still loading).
struct NeverReady;

impl TextureProvider for NeverReady {
    fn current_texture(&mut self) -> Option<Arc<GpuTexture>> {
        None
    }

    fn generation(&self) -> u64 {
        0
    }
}

#[test]
fn second_pull_is_a_pure_cache_hit() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let source = ImageSource::new(&ctx, &ImageBuffer::test_pattern(64, 64)).unwrap();
    let mut chain = FilterChain::new(source);
    chain.append(SaturationFilter::new(ctx.clone(), 0.5).unwrap());

    let first = chain.pull().expect("first pull computes");
    assert_eq!(ctx.dispatch_count(), 1);

    let second = chain.pull().expect("second pull serves the cache");
    assert_eq!(ctx.dispatch_count(), 1, "cache hit must issue no GPU work");
    assert!(
        Arc::ptr_eq(&first, &second),
        "cache hit must return the identical texture handle"
    );
}

#[test]
fn rapid_parameter_changes_coalesce_into_one_recompute() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let source = ImageSource::new(&ctx, &ImageBuffer::test_pattern(48, 48)).unwrap();
    let mut chain = FilterChain::new(source);
    let blur = chain.append(GaussianBlurFilter::new(ctx.clone(), 1.0).unwrap());

    chain.pull().expect("first pull computes");
    assert_eq!(ctx.dispatch_count(), 1);

    {
        let mut blur = blur.lock();
        blur.set_radius(2.0);
        blur.set_radius(3.0);
        blur.set_radius(4.5);
    }

    chain.pull().expect("recompute with the last-set value");
    assert_eq!(
        ctx.dispatch_count(),
        2,
        "three parameter changes must coalesce into one dispatch"
    );
    assert_eq!(blur.lock().radius(), 4.5);
}

#[test]
fn chain_recomputes_only_downstream_of_the_dirty_stage() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let source = ImageSource::new(&ctx, &ImageBuffer::test_pattern(64, 64)).unwrap();
    let mut chain = FilterChain::new(source);
    let saturation = chain.append(SaturationFilter::new(ctx.clone(), 0.5).unwrap());
    let blur = chain.append(GaussianBlurFilter::new(ctx.clone(), 2.0).unwrap());

    chain.pull().expect("first pull computes both stages");
    assert_eq!(
        ctx.dispatch_count(),
        2,
        "one dispatch per stage, innermost first"
    );

    blur.lock().set_radius(3.0);
    chain.pull().expect("only the blur stage recomputes");
    assert_eq!(
        ctx.dispatch_count(),
        3,
        "the saturation cache must stay untouched"
    );
    assert!(!saturation.lock().is_dirty());
}

#[test]
fn upstream_parameter_change_propagates_downstream() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let source = ImageSource::new(&ctx, &ImageBuffer::test_pattern(64, 64)).unwrap();
    let mut chain = FilterChain::new(source);
    let saturation = chain.append(SaturationFilter::new(ctx.clone(), 0.5).unwrap());
    let blur = chain.append(GaussianBlurFilter::new(ctx.clone(), 2.0).unwrap());

    chain.pull().expect("first pull computes both stages");
    assert_eq!(ctx.dispatch_count(), 2);

    saturation.lock().set_saturation(0.8);
    chain.pull().expect("both stages recompute");
    assert_eq!(
        ctx.dispatch_count(),
        4,
        "a dirty upstream stage must also refresh its consumers"
    );
    assert!(!blur.lock().is_dirty());
}

#[test]
fn upstream_not_ready_propagates_and_stage_stays_dirty() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let mut chain = FilterChain::new(NeverReady);
    let saturation = chain.append(SaturationFilter::new(ctx.clone(), 0.5).unwrap());

    assert!(chain.pull().is_none(), "not-ready must propagate as None");
    assert_eq!(ctx.dispatch_count(), 0, "no dispatch without an input");
    assert!(
        saturation.lock().is_dirty(),
        "the stage must stay dirty for the next poll"
    );
}

#[test]
fn upstream_resize_forces_reallocation_without_parameter_mutation() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let source = share(ImageSource::new(&ctx, &ImageBuffer::test_pattern(100, 100)).unwrap());
    let mut chain = FilterChain::from_shared(source.clone());
    chain.append(SaturationFilter::new(ctx.clone(), 0.5).unwrap());

    let first = chain.pull().expect("first pull computes");
    assert_eq!((first.width, first.height), (100, 100));
    assert_eq!(ctx.dispatch_count(), 1);

    source
        .lock()
        .replace(&ctx, &ImageBuffer::test_pattern(200, 150))
        .unwrap();

    let second = chain.pull().expect("resize triggers a recompute");
    assert_eq!(
        (second.width, second.height),
        (200, 150),
        "output must be reallocated to the new input size"
    );
    assert_eq!(ctx.dispatch_count(), 2);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn same_size_source_swap_recomputes_via_generation() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let source = share(ImageSource::new(&ctx, &ImageBuffer::solid(32, 32, [255, 0, 0, 255])).unwrap());
    let mut chain = FilterChain::from_shared(source.clone());
    chain.append(SaturationFilter::new(ctx.clone(), 1.0).unwrap());

    chain.pull().expect("first pull computes");
    assert_eq!(ctx.dispatch_count(), 1);

    source
        .lock()
        .replace(&ctx, &ImageBuffer::solid(32, 32, [0, 255, 0, 255]))
        .unwrap();

    chain.pull().expect("swapped content recomputes");
    assert_eq!(
        ctx.dispatch_count(),
        2,
        "a same-size source swap must still invalidate downstream caches"
    );
}
