//! PixelFlow Core - Foundation types for the filter pipeline
//!
//! This crate provides the fundamental types used throughout PixelFlow:
//! - The error taxonomy shared by every crate
//! - CPU-side pixel buffers and formats used for upload, readback and
//!   test fixtures

pub mod error;
pub mod image;

pub use error::{PixelFlowError, Result};
pub use image::{ImageBuffer, PixelFormat};
