//! Terrain intake
//!
//! The package decoder lives outside this crate. It hands terrains over as
//! JSON dumps (optionally gzip-compressed), which are loaded and validated
//! here.

pub mod manager;
pub mod terrain_dump;

pub use manager::AssetLoader;
pub use terrain_dump::{DumpFile, LevelDump, TerrainDump, TerrainDumpLoader};

use thiserror::Error;

use crate::world::TerrainError;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dump JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid alpha map encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid terrain: {0}")]
    Terrain(#[from] TerrainError),

    #[error("No terrain found in {path}")]
    NoTerrain { path: String },
}

pub type AssetResult<T> = Result<T, AssetError>;
