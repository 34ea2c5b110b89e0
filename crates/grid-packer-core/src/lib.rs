//! Core library for packing equal-sized texture tiles into grid atlases.
//!
//! - Grid packer: square tiles into a fixed square atlas, each tile written with a quarter turn
//! - Animation sheets: `n × n` frame grids copied without rotation
//! - Module pack: classify `<name>_texture/Material_material` folders into four material
//!   channels and pack them on four threads, joined at a single barrier
//!
//! Quick example:
//! ```ignore
//! use std::path::Path;
//! use grid_packer_core::{ModulePackConfig, run_module_pack};
//! # fn main() -> anyhow::Result<()> {
//! let cfg = ModulePackConfig::default(); // 512px tiles, 2048px atlases
//! let report = run_module_pack(Path::new("assets/module"), &cfg)?;
//! println!("{}", report.summary());
//! # Ok(()) }
//! ```

pub mod anim;
pub mod classify;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod packer;
pub mod source;

pub use anim::*;
pub use classify::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use orchestrator::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `grid_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{AnimSpec, AtlasSpec, ModulePackConfig, ModulePackConfigBuilder, SortOrder};
    pub use crate::error::{GridPackerError, Result};
    pub use crate::model::{Channel, ChannelSet, GridLayout, PackSummary, PackedImage, Rect, Slot, SourceImage};
    pub use crate::orchestrator::{ChannelOutcome, ModulePackReport};
    pub use crate::{
        assemble_frames, assemble_sheet, classify_materials, pack_channels, pack_folder, pack_grid,
        pack_to_file, run_module_pack,
    };
}
