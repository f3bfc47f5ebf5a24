use std::collections::HashMap;

use tracing::info;

use crate::export::t3d::{self, ExportOptions, T3dWriter};
use super::actor::Actor;
use super::TerrainResult;

/// Ordered set of actors exported together as one T3D map
#[derive(Debug, Default)]
pub struct Level {
    pub name: String,
    actors: Vec<Box<dyn Actor>>,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actors: Vec::new(),
        }
    }

    pub fn add_actor(&mut self, actor: Box<dyn Actor>) {
        self.actors.push(actor);
    }

    pub fn actors(&self) -> &[Box<dyn Actor>] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn export_to_t3d(&self) -> TerrainResult<String> {
        self.export_to_t3d_with(&ExportOptions::default())
    }

    /// Export every actor inside a `Begin Map` / `Begin Level` wrapper.
    /// Actor indices count per class, so the second terrain is `Terrain_1`.
    pub fn export_to_t3d_with(&self, options: &ExportOptions) -> TerrainResult<String> {
        let indent = options.indent_width;
        let mut body = String::new();
        let mut ordinals: HashMap<&str, usize> = HashMap::new();

        for actor in &self.actors {
            let ordinal = ordinals.entry(actor.class_name()).or_insert(0);
            actor.export_to_t3d_with(&mut body, indent * 2, *ordinal, options)?;
            *ordinal += 1;
        }

        let mut out = String::new();
        {
            let mut writer = T3dWriter::new(&mut out, 0, indent);
            writer.begin("Map", "");
            writer.begin("Level", &format!("NAME={}", t3d::identifier(&self.name)));
        }
        out.push_str(&body);
        {
            let mut writer = T3dWriter::new(&mut out, indent, indent);
            writer.line("End Level");
        }
        {
            let mut writer = T3dWriter::new(&mut out, 0, indent);
            writer.begin("Surface", "");
            writer.end("Surface");
            writer.line("End Map");
        }

        info!("Exported level {} with {} actors", self.name, self.actors.len());
        Ok(out)
    }
}
