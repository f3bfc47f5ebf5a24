use std::io::Read;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use flate2::read::GzDecoder;
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::world::{ActorBase, GenericActor, InfoFlags, Level, ObjectRef, Terrain, TerrainLayer};
use super::manager::AssetLoader;
use super::{AssetError, AssetResult};

/// Serialized terrain as written by the package decoder.
///
/// Alpha maps travel as standard base64 since they are a raw byte blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainDump {
    #[serde(flatten)]
    pub actor: ActorBase,
    pub num_vertices_x: u32,
    pub num_vertices_y: u32,
    #[serde(default)]
    pub heights: Vec<u16>,
    #[serde(default)]
    pub info_data: Vec<u8>,
    #[serde(default)]
    pub weighted_texture_maps: Vec<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_maps: Option<String>,
    #[serde(default)]
    pub cached_terrain_materials: Vec<ObjectRef>,
    #[serde(default)]
    pub cached_materials_dummy: Vec<ObjectRef>,
    #[serde(default)]
    pub layers: Vec<TerrainLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDump {
    pub level: String,
    #[serde(default)]
    pub terrains: Vec<TerrainDump>,
    #[serde(default)]
    pub actors: Vec<GenericActor>,
}

/// Top-level shape of a dump file; a `level` key marks a level dump
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DumpFile {
    Level(LevelDump),
    Terrain(TerrainDump),
}

impl<'de> Deserialize<'de> for DumpFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("level").is_some() {
            serde_json::from_value(value)
                .map(DumpFile::Level)
                .map_err(|e| de::Error::custom(format!("invalid level dump: {}", e)))
        } else {
            serde_json::from_value(value)
                .map(DumpFile::Terrain)
                .map_err(|e| de::Error::custom(format!("invalid terrain dump: {}", e)))
        }
    }
}

impl TryFrom<TerrainDump> for Terrain {
    type Error = AssetError;

    fn try_from(dump: TerrainDump) -> AssetResult<Self> {
        let alpha_maps = match dump.alpha_maps.as_deref() {
            Some(encoded) if !encoded.is_empty() => general_purpose::STANDARD.decode(encoded)?,
            _ => Vec::new(),
        };

        let terrain = Terrain {
            base: dump.actor,
            heights: dump.heights,
            info_data: dump
                .info_data
                .into_iter()
                .map(InfoFlags::from_bits_retain)
                .collect(),
            weighted_texture_maps: dump.weighted_texture_maps,
            alpha_maps,
            cached_terrain_materials: dump.cached_terrain_materials,
            cached_materials_dummy: dump.cached_materials_dummy,
            layers: dump.layers,
            num_vertices_x: dump.num_vertices_x,
            num_vertices_y: dump.num_vertices_y,
        };
        terrain.validate()?;
        Ok(terrain)
    }
}

impl From<&Terrain> for TerrainDump {
    fn from(terrain: &Terrain) -> Self {
        Self {
            actor: terrain.base.clone(),
            num_vertices_x: terrain.num_vertices_x,
            num_vertices_y: terrain.num_vertices_y,
            heights: terrain.heights.clone(),
            info_data: terrain.info_data.iter().map(|f| f.bits()).collect(),
            weighted_texture_maps: terrain.weighted_texture_maps.clone(),
            alpha_maps: (!terrain.alpha_maps.is_empty())
                .then(|| general_purpose::STANDARD.encode(&terrain.alpha_maps)),
            cached_terrain_materials: terrain.cached_terrain_materials.clone(),
            cached_materials_dummy: terrain.cached_materials_dummy.clone(),
            layers: terrain.layers.clone(),
        }
    }
}

impl DumpFile {
    pub fn from_json(data: &str) -> AssetResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Convert into a level; a bare terrain dump becomes a one-actor level
    /// named `fallback_name`
    pub fn into_level(self, fallback_name: &str) -> AssetResult<Level> {
        match self {
            DumpFile::Terrain(dump) => {
                let mut level = Level::new(fallback_name);
                level.add_actor(Box::new(Terrain::try_from(dump)?));
                Ok(level)
            }
            DumpFile::Level(dump) => {
                let mut level = Level::new(dump.level);
                for terrain in dump.terrains {
                    level.add_actor(Box::new(Terrain::try_from(terrain)?));
                }
                for actor in dump.actors {
                    level.add_actor(Box::new(actor));
                }
                Ok(level)
            }
        }
    }

    /// The single terrain, or the first terrain of a level dump
    pub fn into_terrain(self) -> Option<AssetResult<Terrain>> {
        match self {
            DumpFile::Terrain(dump) => Some(Terrain::try_from(dump)),
            DumpFile::Level(dump) => dump.terrains.into_iter().next().map(Terrain::try_from),
        }
    }
}

/// Loads `.json` and gzip-compressed `.json.gz` terrain dumps
#[derive(Debug, Clone, Default)]
pub struct TerrainDumpLoader;

impl TerrainDumpLoader {
    pub fn new() -> Self {
        Self
    }

    pub async fn read_dump(&self, path: &Path) -> anyhow::Result<DumpFile> {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!("Read {} bytes from {}", raw.len(), path.display());

        let is_gzip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        let text = if is_gzip {
            let mut text = String::new();
            GzDecoder::new(raw.as_slice())
                .read_to_string(&mut text)
                .map_err(AssetError::from)
                .with_context(|| format!("Failed to decompress {}", path.display()))?;
            text
        } else {
            String::from_utf8(raw).with_context(|| format!("{} is not UTF-8", path.display()))?
        };

        DumpFile::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

fn level_name_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Untitled");
    name.split('.').next().unwrap_or(name).to_string()
}

#[async_trait]
impl AssetLoader<Terrain> for TerrainDumpLoader {
    async fn load(&self, path: &Path) -> anyhow::Result<Terrain> {
        let dump = self.read_dump(path).await?;
        match dump.into_terrain() {
            Some(Ok(terrain)) => {
                info!(
                    "Loaded terrain {}x{} from {}",
                    terrain.num_vertices_x,
                    terrain.num_vertices_y,
                    path.display()
                );
                Ok(terrain)
            }
            Some(Err(e)) => {
                warn!("Rejected terrain in {}: {}", path.display(), e);
                Err(anyhow::anyhow!(e))
            }
            None => Err(anyhow::anyhow!(AssetError::NoTerrain {
                path: path.display().to_string(),
            })),
        }
    }
}

#[async_trait]
impl AssetLoader<Level> for TerrainDumpLoader {
    async fn load(&self, path: &Path) -> anyhow::Result<Level> {
        let dump = self.read_dump(path).await?;
        let level = dump
            .into_level(&level_name_from_path(path))
            .with_context(|| format!("Invalid level in {}", path.display()))?;
        info!("Loaded level {} ({} actors) from {}", level.name, level.len(), path.display());
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Actor;

    #[test]
    fn test_parse_terrain_dump() {
        let json = r#"{
            "name": "Hills",
            "location": {"x": 0.0, "y": 0.0, "z": 128.0},
            "num_vertices_x": 2,
            "num_vertices_y": 2,
            "heights": [32768, 32768, 40000, 40000],
            "info_data": [0, 1, 0, 0],
            "alpha_maps": "/wAA/w==",
            "layers": [{"name": "Rock", "alpha_map_index": 0}]
        }"#;

        let dump = DumpFile::from_json(json).unwrap();
        let terrain = dump.into_terrain().unwrap().unwrap();
        assert_eq!(terrain.base.name.as_deref(), Some("Hills"));
        assert_eq!(terrain.base.location.z, 128.0);
        assert_eq!(terrain.base.draw_scale, 1.0);
        assert_eq!(terrain.alpha_maps, vec![255, 0, 0, 255]);
        assert_eq!(terrain.info_data[1], InfoFlags::VISIBILITY_OFF);
        assert_eq!(terrain.layers[0].alpha_map_index, Some(0));
    }

    #[test]
    fn test_level_dump() {
        let json = r#"{
            "level": "Valley",
            "terrains": [{"num_vertices_x": 1, "num_vertices_y": 1, "heights": [7]}],
            "actors": [{"class": "PlayerStart"}]
        }"#;
        let level = DumpFile::from_json(json).unwrap().into_level("unused").unwrap();
        assert_eq!(level.name, "Valley");
        assert_eq!(level.len(), 2);
        assert_eq!(level.actors()[1].class_name(), "PlayerStart");
    }

    #[test]
    fn test_level_dump_error_names_field() {
        let json = r#"{
            "level": "Valley",
            "terrains": [{"num_vertices_y": 1, "heights": [7]}]
        }"#;
        let err = DumpFile::from_json(json).unwrap_err().to_string();
        assert!(err.contains("invalid level dump"), "{}", err);
        assert!(err.contains("num_vertices_x"), "{}", err);

        let err = DumpFile::from_json(r#"{"num_vertices_x": 1}"#).unwrap_err().to_string();
        assert!(err.contains("invalid terrain dump"), "{}", err);
        assert!(err.contains("num_vertices_y"), "{}", err);
    }

    #[test]
    fn test_invalid_dump_rejected() {
        let json = r#"{"num_vertices_x": 2, "num_vertices_y": 2, "heights": [1]}"#;
        let result = DumpFile::from_json(json).unwrap().into_terrain().unwrap();
        assert!(matches!(result, Err(AssetError::Terrain(_))));

        let json = r#"{"num_vertices_x": 1, "num_vertices_y": 1, "alpha_maps": "***"}"#;
        let result = DumpFile::from_json(json).unwrap().into_terrain().unwrap();
        assert!(matches!(result, Err(AssetError::Base64(_))));
    }

    #[test]
    fn test_dump_from_terrain() {
        let mut terrain = Terrain::with_heights(2, 1, vec![1, 2]).unwrap();
        terrain.alpha_maps = vec![9, 9];
        let dump = TerrainDump::from(&terrain);
        assert_eq!(dump.alpha_maps.as_deref(), Some("CQk="));
        assert_eq!(Terrain::try_from(dump).unwrap(), terrain);
    }

    #[test]
    fn test_level_name_from_path() {
        assert_eq!(level_name_from_path(Path::new("/tmp/Valley.json.gz")), "Valley");
        assert_eq!(level_name_from_path(Path::new("Hills.json")), "Hills");
    }
}
