//! Terrain actor: a vertex grid of heights, per-vertex flags and packed
//! alpha layers, with three derived views (T3D text, height image, summary).

use std::fmt::Write as _;
use std::path::Path;

use bitflags::bitflags;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::export::heightmap::{self, HeightMapImage};
use crate::export::t3d::{self, ExportOptions, T3dWriter};
use super::actor::{Actor, ActorBase, ObjectRef};
use super::{TerrainError, TerrainResult};

pub const CLASS_NAME: &str = "Terrain";
pub const ARCHETYPE: &str = "Terrain'Engine.Default__Terrain'";

bitflags! {
    /// Per-vertex info byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InfoFlags: u8 {
        const VISIBILITY_OFF = 0x01;
        const ORIENTATION_FLIP = 0x02;
        const UNREACHABLE = 0x04;
        const LOCKED = 0x08;
    }
}

/// Texture layer painted through one alpha map
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerrainLayer {
    pub name: String,
    #[serde(default)]
    pub setup: Option<ObjectRef>,
    #[serde(default)]
    pub alpha_map_index: Option<usize>,
    #[serde(default)]
    pub hidden: bool,
}

impl TerrainLayer {
    fn to_t3d(&self) -> String {
        let alpha_index = self.alpha_map_index.map_or(-1, |i| i as i64);
        format!(
            "(Name={},Setup={},AlphaMapIndex={},Hidden={})",
            t3d::quoted(&self.name),
            ObjectRef::or_none(self.setup.as_ref()),
            alpha_index,
            if self.hidden { "True" } else { "False" }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Terrain {
    pub base: ActorBase,
    /// Row-major, `num_vertices_x` samples per row
    pub heights: Vec<u16>,
    pub info_data: Vec<InfoFlags>,
    pub weighted_texture_maps: Vec<ObjectRef>,
    /// Packed layers of one byte per vertex
    pub alpha_maps: Vec<u8>,
    pub cached_terrain_materials: Vec<ObjectRef>,
    pub cached_materials_dummy: Vec<ObjectRef>,
    pub layers: Vec<TerrainLayer>,
    pub num_vertices_x: u32,
    pub num_vertices_y: u32,
}

impl Terrain {
    /// Empty terrain with the given lattice and no samples
    pub fn new(num_vertices_x: u32, num_vertices_y: u32) -> Self {
        Self {
            num_vertices_x,
            num_vertices_y,
            ..Default::default()
        }
    }

    pub fn with_heights(num_vertices_x: u32, num_vertices_y: u32, heights: Vec<u16>) -> TerrainResult<Self> {
        let terrain = Self {
            heights,
            ..Self::new(num_vertices_x, num_vertices_y)
        };
        terrain.validate()?;
        Ok(terrain)
    }

    pub fn vertex_count(&self) -> usize {
        self.num_vertices_x as usize * self.num_vertices_y as usize
    }

    pub fn num_patches_x(&self) -> u32 {
        self.num_vertices_x.saturating_sub(1)
    }

    pub fn num_patches_y(&self) -> u32 {
        self.num_vertices_y.saturating_sub(1)
    }

    /// Check array sizes against the vertex lattice. Empty arrays count as
    /// not yet populated.
    pub fn validate(&self) -> TerrainResult<()> {
        let count = self.vertex_count();

        if !self.heights.is_empty() && self.heights.len() != count {
            return Err(TerrainError::MalformedHeights {
                expected: count,
                actual: self.heights.len(),
            });
        }
        if !self.info_data.is_empty() && self.info_data.len() != count {
            return Err(TerrainError::MalformedInfoData {
                expected: count,
                actual: self.info_data.len(),
            });
        }
        let alpha_len = self.alpha_maps.len();
        if alpha_len > 0 && (count == 0 || alpha_len % count != 0) {
            return Err(TerrainError::MalformedAlphaMaps {
                len: alpha_len,
                vertex_count: count,
            });
        }
        let layer_count = self.alpha_layer_count();
        for layer in &self.layers {
            if let Some(index) = layer.alpha_map_index {
                if index >= layer_count {
                    return Err(TerrainError::MalformedLayers {
                        layer: layer.name.clone(),
                        alpha_map_index: index,
                        count: layer_count,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn alpha_layer_count(&self) -> usize {
        match self.vertex_count() {
            0 => 0,
            count => self.alpha_maps.len() / count,
        }
    }

    pub fn alpha_layer(&self, index: usize) -> Option<&[u8]> {
        let count = self.vertex_count();
        if index >= self.alpha_layer_count() {
            return None;
        }
        self.alpha_maps.get(index * count..(index + 1) * count)
    }

    pub fn alpha_layers(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.alpha_layer_count()).filter_map(move |i| self.alpha_layer(i))
    }

    /// Append this terrain's T3D actor block to `out`.
    ///
    /// Every line is prefixed with `padding` spaces. `index` names the actor
    /// `Terrain_<index>` when it has no explicit name. Nothing is written if
    /// the terrain fails validation.
    pub fn export_to_t3d(&self, out: &mut String, padding: usize, index: usize) -> TerrainResult<()> {
        self.export_to_t3d_with(out, padding, index, &ExportOptions::default())
    }

    pub fn export_to_t3d_with(
        &self,
        out: &mut String,
        padding: usize,
        index: usize,
        options: &ExportOptions,
    ) -> TerrainResult<()> {
        if let Err(e) = self.validate() {
            warn!("Refusing to export terrain {}: {}", index, e);
            return Err(e);
        }

        let start = out.len();
        let name = self.base.export_name(CLASS_NAME, index);
        let per_line = options.row_width(self.num_vertices_x as usize);

        let mut writer = T3dWriter::new(out, padding, options.indent_width);
        writer.begin("Actor", &format!("Class={} Name={} Archetype={}", CLASS_NAME, name, ARCHETYPE));

        if !self.heights.is_empty() {
            writer.begin("TerrainHeight", "");
            writer.rows(&self.heights, per_line);
            writer.end("TerrainHeight");
        }

        if options.include_info_data && !self.info_data.is_empty() {
            let bytes: Vec<u8> = self.info_data.iter().map(|f| f.bits()).collect();
            writer.begin("TerrainInfoData", "");
            writer.rows(&bytes, per_line);
            writer.end("TerrainInfoData");
        }

        if options.include_alpha_maps {
            for (i, layer) in self.alpha_layers().enumerate() {
                writer.begin("TerrainAlphaMap", &format!("Index={}", i));
                writer.rows(layer, per_line);
                writer.end("TerrainAlphaMap");
            }
        }

        for (i, layer) in self.layers.iter().enumerate() {
            writer.indexed_property("Layers", i, layer.to_t3d());
        }
        for (i, map) in self.weighted_texture_maps.iter().enumerate() {
            writer.indexed_property("WeightedTextureMaps", i, map);
        }

        writer.property("NumPatchesX", self.num_patches_x());
        writer.property("NumPatchesY", self.num_patches_y());
        writer.property("NumVerticesX", self.num_vertices_x);
        writer.property("NumVerticesY", self.num_vertices_y);
        self.base.write_properties(&mut writer, CLASS_NAME, &name);
        writer.end("Actor");

        debug!("Exported terrain {} ({} bytes of T3D)", name, out.len() - start);
        Ok(())
    }

    /// 16-bit image of the height grid, `num_vertices_x` by `num_vertices_y`
    pub fn height_map(&self) -> TerrainResult<HeightMapImage> {
        heightmap::height_image(self.num_vertices_x, self.num_vertices_y, &self.heights)
    }

    /// 8-bit image stretched between the lowest and highest sample
    pub fn height_map_preview(&self) -> TerrainResult<GrayImage> {
        heightmap::height_preview(self.num_vertices_x, self.num_vertices_y, &self.heights)
    }

    /// Write the 16-bit height map; the format follows the file extension
    pub fn save_height_map(&self, path: &Path) -> TerrainResult<()> {
        self.height_map()?.save(path)?;
        debug!("Saved height map to {}", path.display());
        Ok(())
    }

    pub fn alpha_layer_image(&self, index: usize) -> TerrainResult<GrayImage> {
        let layer = self.alpha_layer(index).ok_or(TerrainError::LayerOutOfRange {
            index,
            count: self.alpha_layer_count(),
        })?;
        heightmap::alpha_image(self.num_vertices_x, self.num_vertices_y, layer)
    }

    /// Human readable summary; never fails, malformed data is reported inline
    pub fn info(&self) -> String {
        let mut s = String::new();
        let name = self.base.name.as_deref().unwrap_or(CLASS_NAME);

        let _ = writeln!(s, "Terrain: {}", name);
        let _ = writeln!(
            s,
            "Vertices: {}x{} ({})",
            self.num_vertices_x,
            self.num_vertices_y,
            self.vertex_count()
        );
        let _ = writeln!(s, "Patches: {}x{}", self.num_patches_x(), self.num_patches_y());

        match (self.heights.iter().min(), self.heights.iter().max()) {
            (Some(min), Some(max)) => {
                let _ = writeln!(s, "Heights: {} (min {}, max {})", self.heights.len(), min, max);
            }
            _ => {
                let _ = writeln!(s, "Heights: 0");
            }
        }

        let hidden = self
            .info_data
            .iter()
            .filter(|f| f.contains(InfoFlags::VISIBILITY_OFF))
            .count();
        let _ = writeln!(s, "Info data: {} ({} hidden)", self.info_data.len(), hidden);

        if self.layers.is_empty() {
            let _ = writeln!(s, "Layers: 0");
        } else {
            let names: Vec<&str> = self.layers.iter().map(|l| l.name.as_str()).collect();
            let _ = writeln!(s, "Layers: {} [{}]", self.layers.len(), names.join(", "));
        }

        let _ = writeln!(s, "Weighted texture maps: {}", self.weighted_texture_maps.len());
        let _ = writeln!(
            s,
            "Alpha maps: {} bytes ({} layers)",
            self.alpha_maps.len(),
            self.alpha_layer_count()
        );
        let _ = writeln!(
            s,
            "Cached materials: {} ({} dummy)",
            self.cached_terrain_materials.len(),
            self.cached_materials_dummy.len()
        );

        match self.validate() {
            Ok(()) => s.push_str("Status: ok"),
            Err(e) => {
                let _ = write!(s, "Status: {}", e);
            }
        }
        s
    }
}

impl Actor for Terrain {
    fn class_name(&self) -> &str {
        CLASS_NAME
    }

    fn base(&self) -> &ActorBase {
        &self.base
    }

    fn export_to_t3d_with(
        &self,
        out: &mut String,
        padding: usize,
        index: usize,
        options: &ExportOptions,
    ) -> TerrainResult<()> {
        Terrain::export_to_t3d_with(self, out, padding, index, options)
    }
}
