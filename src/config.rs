use crate::view::{ViewLimits, ViewRect};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct JsonRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

/// Viewer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    /// Folder/URL prefix holding `region_pos.txt`, `regions.txt` and the
    /// region folders.
    #[serde(default = "default_map_root")]
    pub map_root: String,
    /// Precompiled bulk file under `map_root`; used instead of per-room
    /// fetches when set.
    #[serde(default)]
    pub bulk_file: Option<String>,
    /// Concurrent room fetches per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Smallest view width/height in world pixels.
    #[serde(default = "default_min_extent")]
    pub min_extent: f32,
    /// Largest view width/height in world pixels.
    #[serde(default = "default_max_extent")]
    pub max_extent: f32,
    /// Extent multiplier per wheel notch.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    /// Margin around all rooms on reset, world pixels.
    #[serde(default = "default_padding")]
    pub reset_padding: f32,
    #[serde(default = "default_view")]
    default_view: JsonRect,
}

fn default_map_root() -> String {
    "map/World/Regions/Rooms".to_owned()
}
fn default_batch_size() -> usize {
    24
}
fn default_min_extent() -> f32 {
    200.0
}
fn default_max_extent() -> f32 {
    200_000.0
}
fn default_zoom_step() -> f32 {
    1.1
}
fn default_padding() -> f32 {
    400.0
}
fn default_view() -> JsonRect {
    JsonRect {
        x: -2000.0,
        y: -2000.0,
        w: 4000.0,
        h: 4000.0,
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            map_root: default_map_root(),
            bulk_file: None,
            batch_size: default_batch_size(),
            min_extent: default_min_extent(),
            max_extent: default_max_extent(),
            zoom_step: default_zoom_step(),
            reset_padding: default_padding(),
            default_view: default_view(),
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config, filling gaps with defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let cfg: ViewerConfig = serde_json::from_str(json).context("Parsing viewer config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading viewer config {}", path.display()))?;
        Self::from_json_str(&txt).with_context(|| format!("Loading viewer config {}", path.display()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.min_extent <= 0.0 || self.min_extent > self.max_extent {
            anyhow::bail!(
                "min_extent {} must be positive and not above max_extent {}",
                self.min_extent,
                self.max_extent
            );
        }
        if self.zoom_step <= 1.0 {
            anyhow::bail!("zoom_step must be greater than 1, got {}", self.zoom_step);
        }
        let v = self.default_view;
        if v.w <= 0.0 || v.h <= 0.0 {
            anyhow::bail!("default_view must have a positive size");
        }
        Ok(())
    }

    /// Zoom limits for the view controller.
    pub fn limits(&self) -> ViewLimits {
        ViewLimits {
            min_extent: self.min_extent,
            max_extent: self.max_extent,
            zoom_step: self.zoom_step,
        }
    }

    /// View used when no room is placed.
    pub fn default_view(&self) -> ViewRect {
        let v = self.default_view;
        ViewRect::new(v.x, v.y, v.w, v.h)
    }
}
