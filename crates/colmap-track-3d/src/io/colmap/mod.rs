mod locate;
mod text;
mod types;

pub use locate::*;
pub use text::*;
pub use types::*;

/// Error types for the COLMAP module.
#[derive(Debug, thiserror::Error)]
pub enum ColmapError {
    /// Error reading an existing model file
    #[error("error reading COLMAP file")]
    Io(#[from] std::io::Error),
}
