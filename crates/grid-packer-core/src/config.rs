use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{GridPackerError, Result};
use crate::model::Channel;

pub const DEFAULT_ELEMENT_SIZE: u32 = 512;
pub const DEFAULT_ATLAS_SIZE: u32 = 2048;

/// Order in which directory entries become slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Filesystem enumeration order (platform dependent).
    #[default]
    None,
    /// Sort entries by file name for reproducible slot assignment.
    NameAsc,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "name_asc" => Ok(Self::NameAsc),
            _ => Err(()),
        }
    }
}

/// Fixed-grid atlas configuration: square tiles of `element_size` laid into a
/// square atlas of `atlas_size`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasSpec {
    pub element_size: u32,
    pub atlas_size: u32,
    pub output_path: PathBuf,
}

impl AtlasSpec {
    pub fn new(element_size: u32, atlas_size: u32, output_path: impl Into<PathBuf>) -> Self {
        Self {
            element_size,
            atlas_size,
            output_path: output_path.into(),
        }
    }

    /// Validates the size invariants.
    ///
    /// Returns an error if either size is zero or `atlas_size` is not an
    /// integer multiple of `element_size`.
    pub fn validate(&self) -> Result<()> {
        if self.element_size == 0 || self.atlas_size == 0 {
            return Err(GridPackerError::InvalidConfig(format!(
                "element_size ({}) and atlas_size ({}) must be non-zero",
                self.element_size, self.atlas_size
            )));
        }
        if self.atlas_size % self.element_size != 0 {
            return Err(GridPackerError::InvalidConfig(format!(
                "atlas_size ({}) is not a multiple of element_size ({})",
                self.atlas_size, self.element_size
            )));
        }
        Ok(())
    }

    pub fn slots_per_side(&self) -> u32 {
        self.atlas_size / self.element_size
    }

    pub fn capacity(&self) -> usize {
        let n = self.slots_per_side() as usize;
        n * n
    }
}

/// UV animation sheet configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimSpec {
    pub frame_count: u32,
    pub source_folder: PathBuf,
    pub output_name: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl AnimSpec {
    pub fn new(
        frame_count: u32,
        source_folder: impl Into<PathBuf>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            frame_count,
            source_folder: source_folder.into(),
            output_name: output_name.into(),
            sort_order: SortOrder::None,
        }
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Grid dimension: `floor(sqrt(frame_count))`.
    pub fn num_rows(&self) -> u32 {
        self.frame_count.isqrt()
    }

    pub fn output_path(&self) -> PathBuf {
        self.source_folder.join(&self.output_name)
    }

    /// Checks frame count and output name. Performs no I/O.
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 || self.frame_count % 4 != 0 {
            return Err(GridPackerError::InvalidFrameCount {
                frame_count: self.frame_count,
            });
        }
        let rows = self.num_rows() as usize;
        let capacity = rows * rows;
        if capacity < self.frame_count as usize {
            // floor(sqrt(n))^2 < n: the grid cannot hold every frame
            return Err(GridPackerError::CapacityExceeded {
                provided: self.frame_count as usize,
                capacity,
            });
        }
        if self.output_name.is_empty() {
            return Err(GridPackerError::InvalidConfig(
                "output_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the four-channel module pack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModulePackConfig {
    #[serde(default = "default_element_size")]
    pub element_size: u32,
    #[serde(default = "default_atlas_size")]
    pub atlas_size: u32,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Output directory; `None` writes next to the classified root.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    #[serde(default = "default_diffuse_name")]
    pub diffuse_name: String,
    #[serde(default = "default_metallic_name")]
    pub metallic_name: String,
    #[serde(default = "default_normal_name")]
    pub normal_name: String,
    #[serde(default = "default_roughness_name")]
    pub roughness_name: String,
}

impl Default for ModulePackConfig {
    fn default() -> Self {
        Self {
            element_size: default_element_size(),
            atlas_size: default_atlas_size(),
            sort_order: SortOrder::None,
            out_dir: None,
            diffuse_name: default_diffuse_name(),
            metallic_name: default_metallic_name(),
            normal_name: default_normal_name(),
            roughness_name: default_roughness_name(),
        }
    }
}

impl ModulePackConfig {
    pub fn output_name(&self, channel: Channel) -> &str {
        match channel {
            Channel::Diffuse => &self.diffuse_name,
            Channel::Metallic => &self.metallic_name,
            Channel::Normal => &self.normal_name,
            Channel::Roughness => &self.roughness_name,
        }
    }

    pub fn set_output_name(&mut self, channel: Channel, name: impl Into<String>) {
        let name = name.into();
        match channel {
            Channel::Diffuse => self.diffuse_name = name,
            Channel::Metallic => self.metallic_name = name,
            Channel::Normal => self.normal_name = name,
            Channel::Roughness => self.roughness_name = name,
        }
    }

    /// Builds the per-channel atlas spec; `root` is used when `out_dir` is unset.
    pub fn atlas_spec(&self, channel: Channel, root: &Path) -> AtlasSpec {
        let dir = self.out_dir.as_deref().unwrap_or(root);
        AtlasSpec::new(
            self.element_size,
            self.atlas_size,
            dir.join(self.output_name(channel)),
        )
    }

    pub fn validate(&self) -> Result<()> {
        AtlasSpec::new(self.element_size, self.atlas_size, PathBuf::new()).validate()?;
        for channel in Channel::ALL {
            if self.output_name(channel).is_empty() {
                return Err(GridPackerError::InvalidConfig(format!(
                    "output name for channel {channel} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Create a fluent builder for `ModulePackConfig`.
    pub fn builder() -> ModulePackConfigBuilder {
        ModulePackConfigBuilder::new()
    }
}

fn default_element_size() -> u32 {
    DEFAULT_ELEMENT_SIZE
}
fn default_atlas_size() -> u32 {
    DEFAULT_ATLAS_SIZE
}
fn default_diffuse_name() -> String {
    Channel::Diffuse.default_pack_name().into()
}
fn default_metallic_name() -> String {
    Channel::Metallic.default_pack_name().into()
}
fn default_normal_name() -> String {
    Channel::Normal.default_pack_name().into()
}
fn default_roughness_name() -> String {
    Channel::Roughness.default_pack_name().into()
}

/// Builder for `ModulePackConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct ModulePackConfigBuilder {
    cfg: ModulePackConfig,
}

impl ModulePackConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: ModulePackConfig::default(),
        }
    }
    pub fn element_size(mut self, v: u32) -> Self {
        self.cfg.element_size = v;
        self
    }
    pub fn atlas_size(mut self, v: u32) -> Self {
        self.cfg.atlas_size = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn out_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.out_dir = Some(v.into());
        self
    }
    pub fn output_name(mut self, channel: Channel, name: impl Into<String>) -> Self {
        self.cfg.set_output_name(channel, name);
        self
    }
    pub fn build(self) -> ModulePackConfig {
        self.cfg
    }
}
