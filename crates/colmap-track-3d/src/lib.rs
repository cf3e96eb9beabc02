#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera intrinsics helpers.
pub mod camera;

/// I/O utilities for reading reconstruction data.
pub mod io;

/// Point cloud conversion.
pub mod pointcloud;

/// Camera trajectory construction.
pub mod trajectory;

/// 3D transforms algorithms.
pub mod transforms;
