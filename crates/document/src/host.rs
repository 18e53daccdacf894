//! Process-wide host: document registry, active document and event hubs.
//!
//! Event hubs are global to the host. Every document publishes its layer
//! table events on the same hub, and document lifecycle changes go to a
//! second hub. Subscribers that care about one document filter by id.

use crate::document::Document;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use layerwatch_core::{
    DocumentEvent, DocumentEventKind, DocumentId, Error, LayerRow, LayerTableEvent, Result,
    SnapshotReader,
};
use layerwatch_reactive::{EventHub, WatchSources};
use tracing::debug;

/// Shared handle to a document.
pub type DocumentRef = Rc<RefCell<Document>>;

/// The in-memory host.
///
/// All methods take `&self` so the host can be shared through an `Rc` by the
/// components that read from it.
pub struct Host {
    layer_events: Rc<EventHub<LayerTableEvent>>,
    document_events: Rc<EventHub<DocumentEvent>>,
    documents: RefCell<HashMap<DocumentId, DocumentRef>>,
    active: Cell<Option<DocumentId>>,
    next_id: Cell<u32>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// Creates a host with no documents.
    pub fn new() -> Self {
        Self {
            layer_events: Rc::new(EventHub::new()),
            document_events: Rc::new(EventHub::new()),
            documents: RefCell::new(HashMap::new()),
            active: Cell::new(None),
            next_id: Cell::new(1),
        }
    }

    /// Returns the hub carrying every document's layer table events.
    pub fn layer_events(&self) -> &Rc<EventHub<LayerTableEvent>> {
        &self.layer_events
    }

    /// Returns the hub carrying document lifecycle events.
    pub fn document_events(&self) -> &Rc<EventHub<DocumentEvent>> {
        &self.document_events
    }

    /// Returns both hubs as debouncer sources.
    pub fn watch_sources(&self) -> WatchSources {
        WatchSources::new(self.layer_events.clone(), self.document_events.clone())
    }

    /// Creates an empty document, raises New and makes it active.
    pub fn new_document(&self, name: impl Into<String>) -> DocumentRef {
        self.register(name.into(), DocumentEventKind::New)
    }

    /// Opens a document, raises Open and makes it active.
    ///
    /// The reference host has no persistence; the document starts empty and
    /// the caller populates it.
    pub fn open_document(&self, name: impl Into<String>) -> DocumentRef {
        self.register(name.into(), DocumentEventKind::Open)
    }

    /// Closes a document and raises Close.
    ///
    /// Closing the active document leaves no document active.
    pub fn close_document(&self, id: DocumentId) -> Result<()> {
        let removed = self.documents.borrow_mut().remove(&id);
        if removed.is_none() {
            return Err(Error::document_not_found(id));
        }
        if self.active.get() == Some(id) {
            self.active.set(None);
        }
        debug!(document = id.raw(), "document closed");
        self.document_events
            .publish(&DocumentEvent::new(id, DocumentEventKind::Close));
        Ok(())
    }

    /// Makes a document active and raises ActiveChanged if it was not.
    pub fn set_active(&self, id: DocumentId) -> Result<()> {
        if !self.documents.borrow().contains_key(&id) {
            return Err(Error::document_not_found(id));
        }
        if self.active.replace(Some(id)) == Some(id) {
            return Ok(());
        }
        debug!(document = id.raw(), "active document changed");
        self.document_events
            .publish(&DocumentEvent::new(id, DocumentEventKind::ActiveChanged));
        Ok(())
    }

    /// Returns the active document id.
    pub fn active_id(&self) -> Option<DocumentId> {
        self.active.get()
    }

    /// Returns the active document.
    pub fn active_document(&self) -> Option<DocumentRef> {
        self.active.get().and_then(|id| self.document(id))
    }

    /// Returns an open document.
    pub fn document(&self, id: DocumentId) -> Option<DocumentRef> {
        self.documents.borrow().get(&id).cloned()
    }

    /// Returns the ids of open documents in ascending order.
    pub fn document_ids(&self) -> Vec<DocumentId> {
        let mut ids: Vec<_> = self.documents.borrow().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn document_count(&self) -> usize {
        self.documents.borrow().len()
    }

    fn register(&self, name: String, kind: DocumentEventKind) -> DocumentRef {
        let id = DocumentId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let document = Rc::new(RefCell::new(Document::new(
            id,
            name,
            self.layer_events.clone(),
        )));
        self.documents.borrow_mut().insert(id, document.clone());
        debug!(document = id.raw(), kind = ?kind, "document registered");

        self.document_events.publish(&DocumentEvent::new(id, kind));
        // A lifecycle subscriber may already have closed the document.
        if let Err(error) = self.set_active(id) {
            debug!(document = id.raw(), %error, "document closed before activation");
        }
        document
    }
}

impl SnapshotReader for Host {
    /// Reads the active document; empty when no document is active.
    fn read_all(&self) -> Vec<LayerRow> {
        match self.active_document() {
            Some(document) => document.borrow().rows(),
            None => Vec::new(),
        }
    }
}
