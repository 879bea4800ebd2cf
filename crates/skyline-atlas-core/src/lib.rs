//! Core library for packing rectangles into power-of-two atlases.
//!
//! - Algorithm: greedy skyline fill, lowest gap first, first fitting image in priority order
//! - Atlases start at 512x512 and double per side until the largest remaining image fits
//! - Incremental: images can be enqueued and dequeued between packs; atlases that were
//!   not filled to capacity are torn down and repacked the next time an atlas is opened
//! - Output is a serde-serializable snapshot; rendering and file formats are left to callers.
//!
//! Quick example:
//! ```
//! use skyline_atlas_core::prelude::*;
//! # fn main() -> skyline_atlas_core::Result<()> {
//! let mut manager = AtlasManager::new(AtlasConfig::default())?;
//! let a = manager.enqueue("a", 100, 100)?;
//! manager.enqueue("b", 50, 50)?;
//! manager.pack_all()?;
//! assert_eq!(manager.atlas_count(), 1);
//! assert!(manager.placement(a).is_some());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod order;
pub mod sizing;
pub mod skyline;

pub use config::*;
pub use error::*;
pub use manager::*;
pub use model::*;

/// Convenience prelude for common types and functions.
/// Importing `skyline_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{AtlasConfig, AtlasConfigBuilder};
    pub use crate::error::{AtlasError, Result};
    pub use crate::manager::AtlasManager;
    pub use crate::model::{
        Atlas, AtlasId, AtlasSet, Frame, ImageEntry, ImageId, PackStats, Page, Placement, Rect,
    };
}
