use std::path::PathBuf;

use colmap_track_3d::io::colmap::ColmapError;

/// Error types for a scene import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The scene folder does not exist
    #[error("scene folder not found: {0}")]
    SceneNotFound(PathBuf),

    /// No folder below `sparse` holds a complete text model
    #[error("could not find a COLMAP TXT model under {0}")]
    ModelNotFound(PathBuf),

    /// cameras.txt or images.txt has no usable records
    #[error("could not read cameras.txt / images.txt in {0}")]
    EmptyModel(PathBuf),

    /// Every image references an unknown camera
    #[error("no image in {0} references a known camera")]
    NoUsableFrames(PathBuf),

    /// An import setting is out of range
    #[error("invalid import configuration: {0}")]
    InvalidConfig(String),

    /// Error reading the model files
    #[error(transparent)]
    Colmap(#[from] ColmapError),
}
