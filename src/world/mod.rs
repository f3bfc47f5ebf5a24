//! Level actors and their derived views

pub mod actor;
pub mod level;
pub mod terrain;

pub use actor::{Actor, ActorBase, GenericActor, ObjectRef};
pub use level::Level;
pub use terrain::{InfoFlags, Terrain, TerrainLayer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("Malformed terrain heights: expected {expected} samples, found {actual}")]
    MalformedHeights { expected: usize, actual: usize },

    #[error("Malformed terrain info data: expected {expected} entries, found {actual}")]
    MalformedInfoData { expected: usize, actual: usize },

    #[error("Malformed alpha maps: {len} bytes is not a whole number of {vertex_count}-vertex layers")]
    MalformedAlphaMaps { len: usize, vertex_count: usize },

    #[error("Layer {layer} points at alpha map {alpha_map_index}, but only {count} alpha layers exist")]
    MalformedLayers { layer: String, alpha_map_index: usize, count: usize },

    #[error("Alpha layer {index} out of range ({count} layers)")]
    LayerOutOfRange { index: usize, count: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type TerrainResult<T> = Result<T, TerrainError>;
