#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera intrinsics and camera-to-world transform builders.
pub mod camera;

/// Depth frame fusion pipeline.
pub mod fuser;

/// Spatial grid quantization for point deduplication.
pub mod grid;

/// I/O utilities for reading and writing point cloud data.
pub mod io;

/// Deduplicated colored point storage.
pub mod store;
