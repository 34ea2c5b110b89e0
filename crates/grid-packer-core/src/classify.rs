//! Directory classification for material modules.
//!
//! Layout consumed:
//! `<root>/<name>_texture/Material_material/{diffuse,metallic,normal,roughness}.png`

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::config::SortOrder;
use crate::error::Result;
use crate::model::{Channel, ChannelSet};
use crate::source::{file_name, list_dirs, list_files, load_images};

pub const TEXTURE_DIR_SUFFIX: &str = "_texture";
pub const MATERIAL_DIR_NAME: &str = "Material_material";

/// Paths discovered for each channel before decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPaths {
    pub diffuse: Vec<PathBuf>,
    pub metallic: Vec<PathBuf>,
    pub normal: Vec<PathBuf>,
    pub roughness: Vec<PathBuf>,
}

impl ChannelPaths {
    pub fn get(&self, channel: Channel) -> &[PathBuf] {
        match channel {
            Channel::Diffuse => &self.diffuse,
            Channel::Metallic => &self.metallic,
            Channel::Normal => &self.normal,
            Channel::Roughness => &self.roughness,
        }
    }

    fn get_mut(&mut self, channel: Channel) -> &mut Vec<PathBuf> {
        match channel {
            Channel::Diffuse => &mut self.diffuse,
            Channel::Metallic => &mut self.metallic,
            Channel::Normal => &mut self.normal,
            Channel::Roughness => &mut self.roughness,
        }
    }
}

/// Walks the immediate subdirectories of `root` and buckets channel files.
///
/// Subdirectories not ending in `_texture` are ignored, as are texture
/// directories without a `Material_material` folder. Order is concatenated
/// per subdirectory in `sort` order.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover_channel_paths(root: &Path, sort: SortOrder) -> Result<ChannelPaths> {
    let mut out = ChannelPaths::default();
    for dir in list_dirs(root, sort)? {
        let Some(name) = file_name(&dir) else {
            continue;
        };
        if !name.ends_with(TEXTURE_DIR_SUFFIX) {
            continue;
        }
        let material_dir = dir.join(MATERIAL_DIR_NAME);
        if !material_dir.is_dir() {
            debug!(dir = %dir.display(), "no {MATERIAL_DIR_NAME} folder, skipping");
            continue;
        }
        for file in list_files(&material_dir, sort)? {
            if let Some(channel) = file_name(&file).and_then(Channel::from_file_name) {
                out.get_mut(channel).push(file);
            }
        }
    }
    debug!(
        diffuse = out.diffuse.len(),
        metallic = out.metallic.len(),
        normal = out.normal.len(),
        roughness = out.roughness.len(),
        "classified"
    );
    Ok(out)
}

/// Classifies `root` and decodes every discovered image.
///
/// Any decode failure aborts the whole pass; no partial channel lists are
/// returned.
pub fn classify_materials(root: &Path, sort: SortOrder) -> Result<ChannelSet> {
    let paths = discover_channel_paths(root, sort)?;
    let mut set = ChannelSet::new();
    for channel in Channel::ALL {
        for image in load_images(paths.get(channel))? {
            set.push(channel, image);
        }
    }
    Ok(set)
}
