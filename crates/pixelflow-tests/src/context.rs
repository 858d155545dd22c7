//! Context construction and kernel-library error paths.

use pixelflow_core::PixelFlowError;
use pixelflow_filters::builtin_kernels;
use pixelflow_gpu::{ComputeContext, KernelSource};

use crate::support;

#[test]
fn library_lists_builtin_kernels() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let mut names: Vec<&str> = ctx.library().kernel_names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["gaussian_blur_2d", "saturation_adjust"]);
    assert_eq!(ctx.library().len(), 2);
}

#[test]
fn unknown_kernel_name_is_rejected_at_construction() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let err = ctx.kernel_pipeline("no_such_kernel").unwrap_err();
    assert!(
        matches!(err, PixelFlowError::KernelNotFound(_)),
        "expected KernelNotFound, got {err:?}"
    );
}

#[test]
fn broken_wgsl_fails_library_load() {
    let sources = [KernelSource {
        name: "broken",
        wgsl: "this is not wgsl",
    }];

    match ComputeContext::new_blocking(&sources) {
        Err(PixelFlowError::LibraryLoad(_)) => {}
        Err(PixelFlowError::DeviceUnavailable(reason)) => {
            eprintln!("skipping GPU test: {reason}");
        }
        Err(other) => panic!("expected LibraryLoad failure, got {other:?}"),
        Ok(_) => panic!("expected LibraryLoad failure, got a working context"),
    }
}

#[test]
fn dispatch_counter_starts_at_zero() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    assert_eq!(ctx.dispatch_count(), 0);
    let _ = builtin_kernels(); // registry construction issues no GPU work
    assert_eq!(ctx.dispatch_count(), 0);
}
