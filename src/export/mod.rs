pub mod heightmap;
pub mod t3d;

pub use heightmap::HeightMapImage;
pub use t3d::{ExportOptions, T3dWriter};
