use serde::{Deserialize, Serialize};

/// Maximum number of snapshots kept in the undo history
pub const HISTORY_LIMIT: usize = 50;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Canvas-level editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub zoom: f32,
    pub show_grid: bool,
    /// Bound on the undo history
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background_color: "#ffffff".to_owned(),
            zoom: 1.0,
            show_grid: false,
            history_limit: HISTORY_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.zoom = clamp_zoom(config.zoom);
        config.history_limit = config.history_limit.max(1);
        Ok(config)
    }
}

pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
