//! Pixel-level checks of the built-in kernels via texture readback.

use pixelflow_core::ImageBuffer;
use pixelflow_filters::{FilterChain, GaussianBlurFilter, ImageSource, SaturationFilter};

use crate::support;

fn channel_close(a: u8, b: u8, tolerance: u8) -> bool {
    a.abs_diff(b) <= tolerance
}

#[test]
fn saturation_zero_produces_grayscale() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let input = ImageBuffer::solid(16, 16, [200, 60, 20, 255]);
    let mut chain = FilterChain::new(ImageSource::new(&ctx, &input).unwrap());
    chain.append(SaturationFilter::new(ctx.clone(), 0.0).unwrap());

    let output = chain.pull().expect("pull computes");
    let pixels = output.read_back(&ctx).expect("readback");

    // Rec.601 luma of (200, 60, 20).
    let expected = (0.299_f64 * 200.0 + 0.587 * 60.0 + 0.114 * 20.0).round() as u8;
    let [r, g, b, a] = pixels.pixel(8, 8).unwrap();
    assert!(channel_close(r, expected, 2), "r = {r}, expected ~{expected}");
    assert_eq!(r, g, "grayscale output must have equal channels");
    assert_eq!(g, b, "grayscale output must have equal channels");
    assert_eq!(a, 255, "alpha must be preserved");
}

#[test]
fn saturation_one_is_identity() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let input = ImageBuffer::solid(16, 16, [180, 90, 45, 255]);
    let mut chain = FilterChain::new(ImageSource::new(&ctx, &input).unwrap());
    chain.append(SaturationFilter::new(ctx.clone(), 1.0).unwrap());

    let output = chain.pull().expect("pull computes");
    let pixels = output.read_back(&ctx).expect("readback");

    let [r, g, b, _] = pixels.pixel(4, 4).unwrap();
    assert!(channel_close(r, 180, 1));
    assert!(channel_close(g, 90, 1));
    assert!(channel_close(b, 45, 1));
}

#[test]
fn blur_radius_zero_is_passthrough() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let input = ImageBuffer::test_pattern(32, 32);
    let mut chain = FilterChain::new(ImageSource::new(&ctx, &input).unwrap());
    chain.append(GaussianBlurFilter::new(ctx.clone(), 0.0).unwrap());

    let output = chain.pull().expect("pull computes");
    let pixels = output.read_back(&ctx).expect("readback");

    for (x, y) in [(0, 0), (13, 7), (31, 31)] {
        let got = pixels.pixel(x, y).unwrap();
        let want = input.pixel(x, y).unwrap();
        for c in 0..4 {
            assert!(
                channel_close(got[c], want[c], 1),
                "pixel ({x}, {y}) channel {c}: got {}, want {}",
                got[c],
                want[c]
            );
        }
    }
}

#[test]
fn blur_softens_a_hard_edge() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    // Left half black, right half white.
    let mut input = ImageBuffer::solid(32, 32, [0, 0, 0, 255]);
    for y in 0..32u32 {
        for x in 16..32u32 {
            let i = ((y * 32 + x) * 4) as usize;
            input.data[i..i + 3].copy_from_slice(&[255, 255, 255]);
        }
    }

    let mut chain = FilterChain::new(ImageSource::new(&ctx, &input).unwrap());
    chain.append(GaussianBlurFilter::new(ctx.clone(), 3.0).unwrap());

    let output = chain.pull().expect("pull computes");
    let pixels = output.read_back(&ctx).expect("readback");

    // A pixel on the edge ends up strictly between the two extremes.
    let [r, _, _, _] = pixels.pixel(16, 16).unwrap();
    assert!(
        (10..=245).contains(&r),
        "edge pixel should be blurred to a mid value, got {r}"
    );

    // Far away from the edge the halves keep their color.
    let [left, _, _, _] = pixels.pixel(2, 16).unwrap();
    let [right, _, _, _] = pixels.pixel(29, 16).unwrap();
    assert!(left < 20, "far-left should stay near black, got {left}");
    assert!(right > 235, "far-right should stay near white, got {right}");
}

#[test]
fn source_upload_readback_roundtrip() {
    let Some(ctx) = support::gpu_context() else {
        return;
    };

    let input = ImageBuffer::test_pattern(64, 16);
    let mut chain = FilterChain::new(ImageSource::new(&ctx, &input).unwrap());
    // Saturation 1.0 is an identity pass over the source.
    chain.append(SaturationFilter::new(ctx.clone(), 1.0).unwrap());

    let output = chain.pull().expect("pull computes");
    let pixels = output.read_back(&ctx).expect("readback");

    assert_eq!((pixels.width, pixels.height), (64, 16));
    for (x, y) in [(0, 0), (33, 5), (63, 15)] {
        let got = pixels.pixel(x, y).unwrap();
        let want = input.pixel(x, y).unwrap();
        for c in 0..4 {
            assert!(
                channel_close(got[c], want[c], 1),
                "pixel ({x}, {y}) channel {c}: got {}, want {}",
                got[c],
                want[c]
            );
        }
    }
}
