#![deny(missing_docs)]
//! Packed multi-plane image buffers and YCbCr color decoding

/// Scoped read-locking of pixel buffers.
pub mod buffer;

/// Error types for the image module.
pub mod error;

/// Plane descriptors and stride-addressed pixel sampling.
pub mod plane;

/// YCbCr to RGB color decoding.
pub mod yuv;

pub use crate::buffer::{BufferGuard, LockablePixelBuffer};
pub use crate::error::PlaneError;
pub use crate::plane::{PlaneDesc, PlaneView};
pub use crate::yuv::rgba_from_ycbcr;
