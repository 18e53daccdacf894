//! A document: layer table plus linetype and material tables.
//!
//! Mutations go through the document so that each accepted change is
//! published on the host's layer event hub, the way the host raises its
//! layer table events.

use crate::catalog::NameTable;
use crate::table::LayerTable;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use layerwatch_core::{
    DocumentId, Error, Layer, LayerId, LayerRow, LayerTableEvent, Result, SnapshotReader,
    DEFAULT_LINETYPE_NAME,
};
use layerwatch_reactive::EventHub;
use tracing::trace;

pub struct Document {
    id: DocumentId,
    name: String,
    layers: LayerTable,
    linetypes: NameTable,
    materials: NameTable,
    events: Rc<EventHub<LayerTableEvent>>,
}

impl Document {
    /// Creates an empty document publishing on `events`.
    pub fn new(id: DocumentId, name: impl Into<String>, events: Rc<EventHub<LayerTableEvent>>) -> Self {
        Self {
            id,
            name: name.into(),
            layers: LayerTable::new(id),
            linetypes: NameTable::new(),
            materials: NameTable::new(),
            events,
        }
    }

    #[inline]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    #[inline]
    pub fn linetypes(&self) -> &NameTable {
        &self.linetypes
    }

    #[inline]
    pub fn materials(&self) -> &NameTable {
        &self.materials
    }

    /// Registers a linetype name and returns its index.
    pub fn add_linetype(&mut self, name: impl Into<String>) -> usize {
        self.linetypes.add(name)
    }

    /// Registers a material name and returns its index.
    pub fn add_material(&mut self, name: impl Into<String>) -> usize {
        self.materials.add(name)
    }

    /// Adds a layer and raises Added.
    pub fn add_layer(&mut self, layer: Layer) -> Result<LayerId> {
        self.check_styles(&layer)?;
        let (id, event) = self.layers.add(layer)?;
        self.publish(event);
        Ok(id)
    }

    /// Edits a layer and raises Modified if anything changed.
    ///
    /// Returns true if the layer changed.
    pub fn update_layer<F>(&mut self, id: LayerId, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Layer),
    {
        let linetypes = self.linetypes.len();
        let materials = self.materials.len();
        let event = self.layers.update(id, |layer| {
            f(layer);
            // Dangling style indexes fall back to the defaults.
            if layer.linetype.is_some_and(|index| index >= linetypes) {
                layer.linetype = None;
            }
            if layer.material.is_some_and(|index| index >= materials) {
                layer.material = None;
            }
        })?;
        match event {
            Some(event) => {
                self.publish(event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Soft-deletes a layer and raises Deleted.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<()> {
        let event = self.layers.delete(id)?;
        self.publish(event);
        Ok(())
    }

    /// Restores a deleted layer and raises Undeleted.
    pub fn undelete_layer(&mut self, id: LayerId) -> Result<()> {
        let event = self.layers.undelete(id)?;
        self.publish(event);
        Ok(())
    }

    /// Changes the current layer and raises Current if it changed.
    pub fn set_current_layer(&mut self, id: LayerId) -> Result<()> {
        if let Some(event) = self.layers.set_current(id)? {
            self.publish(event);
        }
        Ok(())
    }

    /// Sorts the layer table by full path and raises Sorted.
    pub fn sort_layers(&mut self) {
        let event = self.layers.sort_by_name();
        self.publish(event);
    }

    /// Finds a live layer id by full path.
    pub fn find_layer(&self, full_path: &str) -> Option<LayerId> {
        self.layers.find_by_name(full_path).map(Layer::id)
    }

    /// Projects every live layer into an output row, in table order.
    pub fn rows(&self) -> Vec<LayerRow> {
        self.layers
            .live()
            .map(|layer| LayerRow {
                name: layer.name.clone(),
                full_path: self.layers.full_path(layer.id()).unwrap_or_default(),
                color: layer.color,
                linetype: layer
                    .linetype
                    .and_then(|index| self.linetypes.get(index))
                    .unwrap_or(DEFAULT_LINETYPE_NAME)
                    .to_string(),
                material: layer
                    .material
                    .and_then(|index| self.materials.get(index))
                    .map(ToString::to_string),
                visible: layer.visible,
                print_width: layer.print_width,
                print_color: layer.print_color,
                locked: layer.locked,
                expanded: layer.expanded,
            })
            .collect()
    }

    fn check_styles(&self, layer: &Layer) -> Result<()> {
        if let Some(index) = layer.linetype {
            self.linetypes
                .get(index)
                .ok_or(Error::linetype_not_found(index))?;
        }
        if let Some(index) = layer.material {
            self.materials
                .get(index)
                .ok_or(Error::material_not_found(index))?;
        }
        Ok(())
    }

    fn publish(&self, event: LayerTableEvent) {
        trace!(document = self.id.raw(), kind = ?event.kind, "layer table changed");
        self.events.publish(&event);
    }
}

impl SnapshotReader for Document {
    fn read_all(&self) -> Vec<LayerRow> {
        self.rows()
    }
}
