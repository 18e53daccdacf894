//! Layer record.
//!
//! This module defines the `Layer` struct, one entry of a document's layer
//! table as the host stores it.

use crate::color::Color;
use crate::types::{LayerField, LayerId};
use alloc::string::String;

/// Placeholder id for layers that have not been inserted into a table yet.
pub const UNASSIGNED_LAYER_ID: LayerId = LayerId::new(u64::MAX);

/// A layer in a document's layer table.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Identifier assigned by the owning table.
    id: LayerId,
    /// Version number for change detection. Incremented on each update.
    version: u64,
    /// Short name, unique among siblings.
    pub name: String,
    /// Parent layer, `None` for root layers.
    pub parent: Option<LayerId>,
    /// Display color.
    pub color: Color,
    /// Index into the linetype table, `None` for the default linetype.
    pub linetype: Option<usize>,
    /// Index into the material table, `None` when no material is assigned.
    pub material: Option<usize>,
    pub visible: bool,
    pub locked: bool,
    /// Whether the layer is expanded in the host's layer panel.
    pub expanded: bool,
    /// Print width in millimeters.
    pub print_width: f64,
    pub print_color: Color,
    /// Soft-delete flag. Deleted layers stay in the table and can be undeleted.
    deleted: bool,
}

impl Layer {
    /// Creates a visible, unlocked root layer with default styling.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_LAYER_ID,
            version: 1,
            name: name.into(),
            parent: None,
            color: Color::BLACK,
            linetype: None,
            material: None,
            visible: true,
            locked: false,
            expanded: false,
            print_width: 0.0,
            print_color: Color::BLACK,
            deleted: false,
        }
    }

    /// Sets the parent layer.
    pub fn with_parent(mut self, parent: LayerId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the linetype index.
    pub fn with_linetype(mut self, index: usize) -> Self {
        self.linetype = Some(index);
        self
    }

    /// Sets the material index.
    pub fn with_material(mut self, index: usize) -> Self {
        self.material = Some(index);
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the locked flag.
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Sets the expanded flag.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Sets print width and print color.
    pub fn with_print(mut self, width: f64, color: Color) -> Self {
        self.print_width = width;
        self.print_color = color;
        self
    }

    /// Returns the layer id.
    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Sets the layer id. Used by tables on insertion.
    pub fn set_id(&mut self, id: LayerId) {
        self.id = id;
    }

    /// Returns the version number.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Increments the version number and returns the new value.
    #[inline]
    pub fn increment_version(&mut self) -> u64 {
        self.version = self.version.wrapping_add(1);
        self.version
    }

    /// Returns true if the layer is soft-deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Sets the soft-delete flag.
    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    /// Returns true if `field` has a different value in `other`.
    pub fn differs_in(&self, field: LayerField, other: &Layer) -> bool {
        match field {
            LayerField::Locked => self.locked != other.locked,
            LayerField::Visible => self.visible != other.visible,
            LayerField::Parent => self.parent != other.parent,
            LayerField::Name => self.name != other.name,
            LayerField::Color => self.color != other.color,
        }
    }

    /// Returns the tracked fields that differ between `self` and `other`.
    pub fn changed_fields<'a>(&'a self, other: &'a Layer) -> impl Iterator<Item = LayerField> + 'a {
        LayerField::ALL
            .into_iter()
            .filter(move |field| self.differs_in(*field, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_layer_new() {
        let layer = Layer::new("Walls");
        assert_eq!(layer.name, "Walls");
        assert_eq!(layer.id(), UNASSIGNED_LAYER_ID);
        assert_eq!(layer.version(), 1);
        assert!(layer.visible);
        assert!(!layer.locked);
        assert!(!layer.is_deleted());
    }

    #[test]
    fn test_layer_builder() {
        let layer = Layer::new("Doors")
            .with_parent(LayerId::new(3))
            .with_color(Color::rgb(200, 10, 10))
            .with_linetype(2)
            .with_material(1)
            .with_locked(true)
            .with_print(0.35, Color::WHITE);
        assert_eq!(layer.parent, Some(LayerId::new(3)));
        assert_eq!(layer.linetype, Some(2));
        assert_eq!(layer.material, Some(1));
        assert!(layer.locked);
        assert_eq!(layer.print_width, 0.35);
        assert_eq!(layer.print_color, Color::WHITE);
    }

    #[test]
    fn test_layer_version() {
        let mut layer = Layer::new("A");
        assert_eq!(layer.increment_version(), 2);
        assert_eq!(layer.version(), 2);
    }

    #[test]
    fn test_differs_in_each_field() {
        let base = Layer::new("A");

        let mut locked = base.clone();
        locked.locked = true;
        assert!(base.differs_in(LayerField::Locked, &locked));
        assert!(!base.differs_in(LayerField::Name, &locked));

        let mut renamed = base.clone();
        renamed.name = "B".into();
        assert!(base.differs_in(LayerField::Name, &renamed));

        let mut moved = base.clone();
        moved.parent = Some(LayerId::new(1));
        assert!(base.differs_in(LayerField::Parent, &moved));

        let mut hidden = base.clone();
        hidden.visible = false;
        assert!(base.differs_in(LayerField::Visible, &hidden));

        let mut recolored = base.clone();
        recolored.color = Color::WHITE;
        assert!(base.differs_in(LayerField::Color, &recolored));
    }

    #[test]
    fn test_untracked_changes_are_not_reported() {
        let base = Layer::new("A");
        let mut other = base.clone();
        other.print_width = 1.0;
        other.expanded = true;
        other.material = Some(4);
        assert_eq!(base.changed_fields(&other).count(), 0);
    }

    #[test]
    fn test_changed_fields_order() {
        let base = Layer::new("A");
        let mut other = base.clone();
        other.color = Color::WHITE;
        other.locked = true;
        let changed: Vec<_> = base.changed_fields(&other).collect();
        assert_eq!(changed, [LayerField::Locked, LayerField::Color]);
    }
}
