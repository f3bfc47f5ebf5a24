use std::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde::{Serialize, Deserialize};

use crate::export::ExportOptions;

const CONFIG_FILE: &str = "viewer.toml";

// =============================================================================
// Viewer Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightMapFormat {
    Raw16,    // Unnormalized 16-bit samples
    Preview8, // Stretched to 8 bits for display
}

impl Default for HeightMapFormat {
    fn default() -> Self {
        Self::Raw16
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightMapSettings {
    pub format: HeightMapFormat,
    pub extension: String,
}

impl Default for HeightMapSettings {
    fn default() -> Self {
        Self {
            format: HeightMapFormat::default(),
            extension: "png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub export: ExportOptions,
    pub heightmap: HeightMapSettings,
    pub logging: LoggingSettings,
}

impl ViewerSettings {
    pub fn from_toml_str(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "real", "real-terrain")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

pub fn save_viewer_settings(settings: &ViewerSettings) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_viewer_settings_to(settings, &path),
        None => Ok(()),
    }
}

/// Write `settings` to an explicit file, creating its directory
pub fn save_viewer_settings_to(settings: &ViewerSettings, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = settings
        .to_toml_string()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, toml)
}

pub fn load_viewer_settings() -> Option<ViewerSettings> {
    config_path().and_then(|path| load_viewer_settings_from(&path))
}

pub fn load_viewer_settings_from(path: &Path) -> Option<ViewerSettings> {
    let data = fs::read_to_string(path).ok()?;
    ViewerSettings::from_toml_str(&data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = ViewerSettings::from_toml_str(
            r#"
            [export]
            indent_width = 2

            [heightmap]
            format = "Preview8"
            "#,
        )
        .unwrap();
        assert_eq!(settings.export.indent_width, 2);
        assert!(settings.export.include_alpha_maps);
        assert_eq!(settings.heightmap.format, HeightMapFormat::Preview8);
        assert_eq!(settings.heightmap.extension, "png");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut settings = ViewerSettings::default();
        settings.export.values_per_line = Some(16);
        settings.logging.log_file = Some(PathBuf::from("terrain.log"));
        let text = settings.to_toml_string().unwrap();
        assert_eq!(ViewerSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_zero_values_per_line_keeps_grid_data() {
        let settings = ViewerSettings::from_toml_str("[export]\nvalues_per_line = 0").unwrap();
        let terrain = crate::world::Terrain::with_heights(2, 2, vec![0, 1, 2, 3]).unwrap();
        let mut out = String::new();
        terrain.export_to_t3d_with(&mut out, 0, 0, &settings.export).unwrap();
        assert!(out.contains("Begin TerrainHeight\n      0 1\n      2 3\n"));
    }
}
