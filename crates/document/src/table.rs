//! Layer table storage.
//!
//! This module provides the `LayerTable` struct which stores the layers of
//! one document in native order, with soft delete and name validation. Every
//! successful mutation returns the `LayerTableEvent` the host would raise.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use layerwatch_core::{
    DocumentId, Error, Layer, LayerEventKind, LayerId, LayerTableEvent, Result, PATH_SEPARATOR,
};

/// The layers of one document.
pub struct LayerTable {
    document: DocumentId,
    /// Layers in native order, deleted ones included.
    layers: Vec<Layer>,
    /// Layer id → position in `layers`.
    positions: HashMap<LayerId, usize>,
    next_id: u64,
    current: Option<LayerId>,
}

impl LayerTable {
    /// Creates an empty table owned by `document`.
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            layers: Vec::new(),
            positions: HashMap::new(),
            next_id: 1,
            current: None,
        }
    }

    /// Returns the owning document.
    #[inline]
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Adds a layer and returns its id with the Added event.
    ///
    /// The first live layer becomes the current layer.
    pub fn add(&mut self, mut layer: Layer) -> Result<(LayerId, LayerTableEvent)> {
        validate_name(&layer.name)?;
        if let Some(parent) = layer.parent {
            self.live_layer(parent).ok_or(Error::parent_not_found(parent))?;
        }
        self.check_unique(&layer.name, layer.parent, None)?;

        let id = LayerId::new(self.next_id);
        self.next_id += 1;
        layer.set_id(id);
        layer.set_deleted(false);

        self.positions.insert(id, self.layers.len());
        self.layers.push(layer.clone());
        if self.current.is_none() {
            self.current = Some(id);
        }

        let event = LayerTableEvent::new(self.document, LayerEventKind::Added, Some(id))
            .with_new_state(layer);
        Ok((id, event))
    }

    /// Applies `f` to a live layer.
    ///
    /// The id and delete flag are not editable through `f`. Returns `None` if
    /// `f` changed nothing, otherwise the Modified event with both states.
    pub fn update<F>(&mut self, id: LayerId, f: F) -> Result<Option<LayerTableEvent>>
    where
        F: FnOnce(&mut Layer),
    {
        let old = self.live_layer(id).ok_or(Error::layer_not_found(id))?.clone();
        let mut candidate = old.clone();
        f(&mut candidate);
        candidate.set_id(id);
        candidate.set_deleted(false);

        if candidate == old {
            return Ok(None);
        }

        validate_name(&candidate.name)?;
        if candidate.parent != old.parent {
            if let Some(parent) = candidate.parent {
                self.live_layer(parent).ok_or(Error::parent_not_found(parent))?;
                if self.is_ancestor_or_self(id, parent) {
                    return Err(Error::invalid_operation(
                        "layer cannot be nested under itself or a descendant",
                    ));
                }
            }
        }
        if candidate.name != old.name || candidate.parent != old.parent {
            self.check_unique(&candidate.name, candidate.parent, Some(id))?;
        }

        candidate.increment_version();
        let position = self.position(id)?;
        self.layers[position] = candidate.clone();
        Ok(Some(LayerTableEvent::modified(self.document, old, candidate)))
    }

    /// Soft-deletes a live layer.
    ///
    /// The current layer and layers with live children cannot be deleted.
    pub fn delete(&mut self, id: LayerId) -> Result<LayerTableEvent> {
        let old = self.live_layer(id).ok_or(Error::layer_not_found(id))?.clone();
        if self.current == Some(id) {
            return Err(Error::invalid_operation("the current layer cannot be deleted"));
        }
        if self.live().any(|layer| layer.parent == Some(id)) {
            return Err(Error::invalid_operation("layer has child layers"));
        }

        let position = self.position(id)?;
        let layer = &mut self.layers[position];
        layer.set_deleted(true);
        layer.increment_version();

        Ok(LayerTableEvent::new(self.document, LayerEventKind::Deleted, Some(id)).with_old_state(old))
    }

    /// Restores a soft-deleted layer.
    pub fn undelete(&mut self, id: LayerId) -> Result<LayerTableEvent> {
        let position = self.position(id)?;
        let layer = &self.layers[position];
        if !layer.is_deleted() {
            return Err(Error::invalid_operation("layer is not deleted"));
        }
        if let Some(parent) = layer.parent {
            self.live_layer(parent).ok_or(Error::parent_not_found(parent))?;
        }
        let (name, parent) = (layer.name.clone(), layer.parent);
        self.check_unique(&name, parent, Some(id))?;

        let layer = &mut self.layers[position];
        layer.set_deleted(false);
        layer.increment_version();
        let restored = layer.clone();

        Ok(LayerTableEvent::new(self.document, LayerEventKind::Undeleted, Some(id))
            .with_new_state(restored))
    }

    /// Makes a live layer current. Returns `None` if it already was.
    pub fn set_current(&mut self, id: LayerId) -> Result<Option<LayerTableEvent>> {
        self.live_layer(id).ok_or(Error::layer_not_found(id))?;
        if self.current == Some(id) {
            return Ok(None);
        }
        self.current = Some(id);
        Ok(Some(LayerTableEvent::new(
            self.document,
            LayerEventKind::Current,
            Some(id),
        )))
    }

    /// Reorders the table by full path, so parents precede their children.
    pub fn sort_by_name(&mut self) -> LayerTableEvent {
        let paths: HashMap<LayerId, String> = self
            .layers
            .iter()
            .map(|layer| (layer.id(), self.path_of(layer)))
            .collect();
        self.layers
            .sort_by(|a, b| paths[&a.id()].cmp(&paths[&b.id()]));
        self.reindex();
        LayerTableEvent::new(self.document, LayerEventKind::Sorted, None)
    }

    /// Returns a live layer.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.live_layer(id)
    }

    /// Returns a layer whether or not it is deleted.
    pub fn get_any(&self, id: LayerId) -> Option<&Layer> {
        self.positions.get(&id).map(|&position| &self.layers[position])
    }

    /// Finds a live layer by full path, e.g. `"Walls::Exterior"`.
    pub fn find_by_name(&self, full_path: &str) -> Option<&Layer> {
        self.live()
            .find(|layer| self.path_of(layer) == full_path)
    }

    /// Returns the full path of a live layer.
    pub fn full_path(&self, id: LayerId) -> Option<String> {
        self.live_layer(id).map(|layer| self.path_of(layer))
    }

    /// Iterates every layer in native order, deleted ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Iterates live layers in native order.
    pub fn live(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| !layer.is_deleted())
    }

    #[inline]
    pub fn current(&self) -> Option<LayerId> {
        self.current
    }

    /// Returns the number of layers, deleted ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    fn live_layer(&self, id: LayerId) -> Option<&Layer> {
        self.get_any(id).filter(|layer| !layer.is_deleted())
    }

    fn position(&self, id: LayerId) -> Result<usize> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(Error::layer_not_found(id))
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (position, layer) in self.layers.iter().enumerate() {
            self.positions.insert(layer.id(), position);
        }
    }

    fn path_of(&self, layer: &Layer) -> String {
        let mut segments: Vec<&str> = alloc::vec![layer.name.as_str()];
        let mut parent = layer.parent;
        // Bounded by the table size in case of a corrupt parent chain.
        for _ in 0..self.layers.len() {
            let Some(id) = parent else {
                break;
            };
            let Some(ancestor) = self.get_any(id) else {
                break;
            };
            segments.push(ancestor.name.as_str());
            parent = ancestor.parent;
        }
        segments.reverse();
        segments.join(PATH_SEPARATOR)
    }

    /// Returns true if walking up from `start` reaches `id`.
    fn is_ancestor_or_self(&self, id: LayerId, start: LayerId) -> bool {
        let mut cursor = Some(start);
        for _ in 0..=self.layers.len() {
            match cursor {
                Some(current) if current == id => return true,
                Some(current) => cursor = self.get_any(current).and_then(|layer| layer.parent),
                None => return false,
            }
        }
        false
    }

    /// Full paths are unique iff names are unique among live siblings.
    fn check_unique(&self, name: &str, parent: Option<LayerId>, except: Option<LayerId>) -> Result<()> {
        let clash = self.live().any(|layer| {
            Some(layer.id()) != except && layer.parent == parent && layer.name == name
        });
        if clash {
            let mut candidate = Layer::new(name);
            candidate.parent = parent;
            return Err(Error::duplicate_layer_name(self.path_of(&candidate)));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(PATH_SEPARATOR) {
        return Err(Error::invalid_layer_name(name));
    }
    Ok(())
}
