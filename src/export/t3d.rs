//! T3D text writer
//!
//! T3D is the plain-text scene format the Unreal editor uses for copy/paste
//! and map export. Blocks are delimited by `Begin <Kind> ...` / `End <Kind>`
//! lines and properties are written one per line as `Key=Value`.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const DEFAULT_INDENT: usize = 3;

/// Knobs for actor export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Spaces added per nesting level
    pub indent_width: usize,
    /// Values per line for grid blocks; `None` or 0 writes one grid row per line
    pub values_per_line: Option<usize>,
    pub include_info_data: bool,
    pub include_alpha_maps: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT,
            values_per_line: None,
            include_info_data: true,
            include_alpha_maps: true,
        }
    }
}

impl ExportOptions {
    /// Values per line for a grid `grid_width` samples wide
    pub fn row_width(&self, grid_width: usize) -> usize {
        match self.values_per_line {
            Some(n) if n > 0 => n,
            _ => grid_width,
        }
    }
}

/// Appends indented T3D lines to a caller-owned buffer
pub struct T3dWriter<'a> {
    out: &'a mut String,
    padding: usize,
    indent_width: usize,
    depth: usize,
}

impl<'a> T3dWriter<'a> {
    pub fn new(out: &'a mut String, padding: usize, indent_width: usize) -> Self {
        Self {
            out,
            padding,
            indent_width,
            depth: 0,
        }
    }

    fn pad(&mut self) {
        let width = self.padding + self.depth * self.indent_width;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    /// Write a raw line at the current depth
    pub fn line(&mut self, text: impl Display) {
        self.pad();
        self.out.push_str(&text.to_string());
        self.out.push('\n');
    }

    /// Open a block; `header` follows the kind on the same line
    pub fn begin(&mut self, kind: &str, header: &str) {
        if header.is_empty() {
            self.line(format_args!("Begin {}", kind));
        } else {
            self.line(format_args!("Begin {} {}", kind, header));
        }
        self.depth += 1;
    }

    pub fn end(&mut self, kind: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("End {}", kind));
    }

    pub fn property(&mut self, key: &str, value: impl Display) {
        self.line(format_args!("{}={}", key, value));
    }

    pub fn indexed_property(&mut self, key: &str, index: usize, value: impl Display) {
        self.line(format_args!("{}({})={}", key, index, value));
    }

    /// Write `values` as space separated lines of `per_line` entries each
    pub fn rows<T: Display>(&mut self, values: &[T], per_line: usize) {
        if per_line == 0 {
            return;
        }
        for chunk in values.chunks(per_line) {
            let joined = chunk
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            self.line(joined);
        }
    }
}

/// Quote a string property value
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Make `name` safe for an unquoted `Name=` header value
pub fn identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Format a float the way the editor writes scalar properties
pub fn float(value: f32) -> String {
    format!("{:.6}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut out = String::from("header\n");
        {
            let mut writer = T3dWriter::new(&mut out, 2, 3);
            writer.begin("Actor", "Class=Terrain");
            writer.property("Tag", quoted("Terrain"));
            writer.end("Actor");
        }
        assert_eq!(
            out,
            "header\n  Begin Actor Class=Terrain\n     Tag=\"Terrain\"\n  End Actor\n"
        );
    }

    #[test]
    fn test_rows_wrap() {
        let mut out = String::new();
        T3dWriter::new(&mut out, 0, 3).rows(&[1, 2, 3, 4, 5], 2);
        assert_eq!(out, "1 2\n3 4\n5\n");
    }

    #[test]
    fn test_rows_zero_width_is_noop() {
        let mut out = String::new();
        T3dWriter::new(&mut out, 0, 3).rows(&[1, 2], 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_row_width_zero_means_grid_row() {
        let mut options = ExportOptions::default();
        assert_eq!(options.row_width(5), 5);
        options.values_per_line = Some(0);
        assert_eq!(options.row_width(5), 5);
        options.values_per_line = Some(2);
        assert_eq!(options.row_width(5), 2);
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("My Terrain"), "My_Terrain");
        assert_eq!(identifier("Hills.01"), "Hills_01");
        assert_eq!(identifier("Terrain_3"), "Terrain_3");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quoted("a\"b"), "\"a\\\"b\"");
        assert_eq!(float(1.0), "1.000000");
    }
}
