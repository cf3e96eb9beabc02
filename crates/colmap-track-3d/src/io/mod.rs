/// Colmap reader module.
pub mod colmap;
