use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

const DEFAULT_HUD_PATH: &str = "config/hud.toml";

/// HUD configuration loaded from `config/hud.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HudConfig {
    /// Extra font files queued at startup.
    pub extra_fonts: Vec<PathBuf>,
    /// Whether debug boxes are drawn.
    pub show_debug_boxes: bool,
    /// Columns in the HUD item grid.
    pub item_grid_columns: u32,
    /// Default HUD text color (RGBA).
    pub text_color: [f32; 4],
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            extra_fonts: Vec::new(),
            show_debug_boxes: false,
            item_grid_columns: 9,
            text_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl HudConfig {
    /// Load HUD configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_HUD_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<HudConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    HudConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                HudConfig::default()
            }
        }
    }

    /// Save HUD configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Path::new(DEFAULT_HUD_PATH))
    }

    /// Save HUD configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let cfg = HudConfig::load_from_path(Path::new("/definitely/not/hud.toml"));
        assert_eq!(cfg.item_grid_columns, 9);
        assert!(cfg.extra_fonts.is_empty());
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("hud.toml");
        fs::write(&path, "item_grid_columns = \"nine\"").expect("write temp file");

        let cfg = HudConfig::load_from_path(&path);
        assert_eq!(cfg.item_grid_columns, 9);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("hud.toml");

        let mut cfg = HudConfig::default();
        cfg.item_grid_columns = 5;
        cfg.show_debug_boxes = true;
        cfg.save_to_path(&path).expect("save config");

        let loaded = HudConfig::load_from_path(&path);
        assert_eq!(loaded.item_grid_columns, 5);
        assert!(loaded.show_debug_boxes);
    }
}
