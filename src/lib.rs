// Real Terrain: terrain inspection and T3D export for Unreal levels

pub mod utils;
pub mod config;
pub mod export;
pub mod world;
pub mod assets;

// Re-export commonly used types for convenience
pub use config::{ViewerSettings, load_viewer_settings, save_viewer_settings};
pub use export::{ExportOptions, HeightMapImage};
pub use world::{Actor, Level, Terrain, TerrainError, TerrainResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
