use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Material texture channel. Each channel is packed into its own atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Diffuse,
    Metallic,
    Normal,
    Roughness,
}

impl Channel {
    /// All channels in fan-out order.
    pub const ALL: [Channel; 4] = [
        Channel::Diffuse,
        Channel::Metallic,
        Channel::Normal,
        Channel::Roughness,
    ];

    /// Maps an exact source file name (e.g. `normal.png`) to its channel.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "diffuse.png" => Some(Self::Diffuse),
            "metallic.png" => Some(Self::Metallic),
            "normal.png" => Some(Self::Normal),
            "roughness.png" => Some(Self::Roughness),
            _ => None,
        }
    }

    /// Default atlas file name the engine loads for this channel.
    pub fn default_pack_name(&self) -> &'static str {
        match self {
            Self::Diffuse => "diffusepack.png",
            Self::Metallic => "metalicpack.png",
            Self::Normal => "normalpack.png",
            Self::Roughness => "roughnesspack.png",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diffuse => "diffuse",
            Self::Metallic => "metallic",
            Self::Normal => "normal",
            Self::Roughness => "roughness",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Diffuse => 0,
            Self::Metallic => 1,
            Self::Normal => 2,
            Self::Roughness => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diffuse" => Ok(Self::Diffuse),
            "metallic" | "metalic" => Ok(Self::Metallic),
            "normal" => Ok(Self::Normal),
            "roughness" => Ok(Self::Roughness),
            _ => Err(()),
        }
    }
}

/// Decoded, immutable source image. `key` is the path it was loaded from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub key: String,
    pub rgba: RgbaImage,
}

impl SourceImage {
    pub fn new(key: impl Into<String>, rgba: RgbaImage) -> Self {
        Self {
            key: key.into(),
            rgba,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }
}

/// Ordered image sequences for the four material channels.
#[derive(Debug, Clone, Default)]
pub struct ChannelSet {
    images: [Vec<SourceImage>; 4],
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, channel: Channel, image: SourceImage) {
        self.images[channel.index()].push(image);
    }

    pub fn get(&self, channel: Channel) -> &[SourceImage] {
        &self.images[channel.index()]
    }

    pub fn len(&self, channel: Channel) -> usize {
        self.images[channel.index()].len()
    }

    /// Total image count across all channels.
    pub fn total(&self) -> usize {
        self.images.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates channels in fan-out order together with their sequences.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &[SourceImage])> {
        Channel::ALL
            .into_iter()
            .map(move |c| (c, self.images[c.index()].as_slice()))
    }
}

/// One occupied grid cell in a packed atlas or sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    /// Input index (slot number).
    pub index: usize,
    pub key: String,
    pub row: u32,
    pub col: u32,
    /// Destination rectangle within the output image.
    pub frame: Rect,
    /// True if the tile was written with the quarter-turn transform.
    pub rotated: bool,
}

/// Logical record of a packed output (no pixel data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub slots_per_side: u32,
    pub slots: Vec<Slot>,
}

impl GridLayout {
    pub fn capacity(&self) -> usize {
        (self.slots_per_side as usize) * (self.slots_per_side as usize)
    }

    /// Fraction of grid cells that hold a tile (0.0 to 1.0).
    pub fn occupancy(&self) -> f64 {
        let cap = self.capacity();
        if cap > 0 {
            self.slots.len() as f64 / cap as f64
        } else {
            0.0
        }
    }
}

/// Packed pixels plus the layout that produced them.
#[derive(Debug, Clone)]
pub struct PackedImage {
    pub layout: GridLayout,
    pub rgba: RgbaImage,
}

/// Result of a pack that was persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackSummary {
    pub output_path: PathBuf,
    pub layout: GridLayout,
}

impl PackSummary {
    pub fn new(output_path: &Path, layout: GridLayout) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            layout,
        }
    }
}
