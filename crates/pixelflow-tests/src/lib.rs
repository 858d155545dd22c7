//! Integration test crate for PixelFlow.
//!
//! This crate exists solely to hold cross-crate integration tests: the
//! dispatch-count and cache-identity properties of the filter pipeline,
//! and pixel-level readback checks of the built-in kernels.
//!
//! GPU-backed tests skip (with a message) on hosts without a usable
//! adapter.

#[cfg(test)]
mod support;

#[cfg(test)]
mod context;

#[cfg(test)]
mod pipeline;

#[cfg(test)]
mod readback;
