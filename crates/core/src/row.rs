//! Output row structure.
//!
//! This module defines the `LayerRow` struct, the flat projection of one live
//! layer that the snapshot reader produces.

use crate::color::Color;
use alloc::string::String;

/// Name reported for layers using the document's default linetype.
pub const DEFAULT_LINETYPE_NAME: &str = "Continuous";

/// A read-only projection of a layer.
///
/// Rows are recomputed from scratch on every snapshot read.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerRow {
    /// Short layer name.
    pub name: String,
    /// Name including all ancestors, joined with `::`.
    pub full_path: String,
    pub color: Color,
    /// Linetype name resolved from the linetype table.
    pub linetype: String,
    /// Render material name, `None` when no material is assigned.
    pub material: Option<String>,
    pub visible: bool,
    pub print_width: f64,
    pub print_color: Color,
    pub locked: bool,
    pub expanded: bool,
}

impl LayerRow {
    /// Returns the nesting depth (0 for root layers).
    pub fn depth(&self) -> usize {
        self.full_path.matches(crate::PATH_SEPARATOR).count()
    }
}
