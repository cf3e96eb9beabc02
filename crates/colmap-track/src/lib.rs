#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod config;
pub use config::*;

mod error;
pub use error::*;

mod import;
pub use import::*;

#[doc(inline)]
pub use colmap_track_3d as k3d;
