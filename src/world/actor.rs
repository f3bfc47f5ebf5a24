use std::fmt;

use serde::{Deserialize, Serialize};

use crate::export::t3d::{self, ExportOptions, T3dWriter};
use crate::utils::{Rotator, Vector3};
use super::TerrainResult;

/// Reference to another package object, written as `Class'Path'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub class: String,
    pub path: String,
}

impl ObjectRef {
    pub fn new(class: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            path: path.into(),
        }
    }

    /// Render an optional reference, `None` when absent
    pub fn or_none(reference: Option<&ObjectRef>) -> String {
        reference.map_or_else(|| "None".to_string(), ToString::to_string)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}'", self.class, self.path)
    }
}

/// Properties every placed actor carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorBase {
    pub name: Option<String>,
    pub location: Vector3,
    pub rotation: Rotator,
    pub draw_scale: f32,
    pub draw_scale_3d: Vector3,
    pub tag: Option<String>,
}

impl Default for ActorBase {
    fn default() -> Self {
        Self {
            name: None,
            location: Vector3::zero(),
            rotation: Rotator::default(),
            draw_scale: 1.0,
            draw_scale_3d: Vector3::one(),
            tag: None,
        }
    }
}

impl ActorBase {
    /// Explicit name made header safe, or `<Class>_<index>`
    pub fn export_name(&self, class_name: &str, index: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => t3d::identifier(name),
            _ => format!("{}_{}", class_name, index),
        }
    }

    /// Write the trailing placement properties shared by all actors
    pub fn write_properties(&self, writer: &mut T3dWriter<'_>, class_name: &str, name: &str) {
        writer.property("Location", self.location);
        if !self.rotation.is_zero() {
            writer.property("Rotation", self.rotation);
        }
        if self.draw_scale != 1.0 {
            writer.property("DrawScale", t3d::float(self.draw_scale));
        }
        if self.draw_scale_3d != Vector3::one() {
            writer.property("DrawScale3D", self.draw_scale_3d);
        }
        let tag = self.tag.as_deref().unwrap_or(class_name);
        writer.property("Tag", t3d::quoted(tag));
        writer.property("Name", t3d::quoted(name));
    }
}

/// Seam between a level exporter and the actors it contains
pub trait Actor: fmt::Debug + Send + Sync {
    fn class_name(&self) -> &str;

    fn base(&self) -> &ActorBase;

    /// Append this actor's T3D block to `out`, `padding` spaces deep
    fn export_to_t3d_with(
        &self,
        out: &mut String,
        padding: usize,
        index: usize,
        options: &ExportOptions,
    ) -> TerrainResult<()>;

    fn export_to_t3d(&self, out: &mut String, padding: usize, index: usize) -> TerrainResult<()> {
        self.export_to_t3d_with(out, padding, index, &ExportOptions::default())
    }
}

/// Any actor without class specific data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericActor {
    pub class: String,
    #[serde(flatten)]
    pub base: ActorBase,
}

impl GenericActor {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            base: ActorBase::default(),
        }
    }
}

impl Actor for GenericActor {
    fn class_name(&self) -> &str {
        &self.class
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
        let name = self.base.export_name(&self.class, index);
        let mut writer = T3dWriter::new(out, padding, options.indent_width);
        writer.begin("Actor", &format!("Class={} Name={}", self.class, name));
        self.base.write_properties(&mut writer, &self.class, &name);
        writer.end("Actor");
        Ok(())
    }
}
