//! Raw change events raised by the host.
//!
//! Two ambient streams exist: layer table events (`LayerTableEvent`) and
//! document lifecycle events (`DocumentEvent`). `ChangeEvent` unifies them for
//! filtering. Both streams are global to the host: an event carries the
//! document it belongs to, and consumers decide whether that document matters.

use crate::layer::Layer;
use crate::types::{DocumentId, LayerId};

/// Category of a layer table change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerEventKind {
    /// A layer was added.
    Added,
    /// A layer was soft-deleted.
    Deleted,
    /// A soft-deleted layer was restored.
    Undeleted,
    /// Layer attributes changed.
    Modified,
    /// The table's iteration order changed.
    Sorted,
    /// The current (active) layer changed.
    Current,
    /// A category code this crate does not know about.
    Unknown(u8),
}

impl LayerEventKind {
    /// Maps a host category code to an event kind.
    ///
    /// Codes 0..=5 are, in order: Added, Deleted, Undeleted, Modified, Sorted,
    /// Current. Anything else is kept as `Unknown`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => LayerEventKind::Added,
            1 => LayerEventKind::Deleted,
            2 => LayerEventKind::Undeleted,
            3 => LayerEventKind::Modified,
            4 => LayerEventKind::Sorted,
            5 => LayerEventKind::Current,
            other => LayerEventKind::Unknown(other),
        }
    }

    /// Returns the host category code.
    pub fn code(&self) -> u8 {
        match self {
            LayerEventKind::Added => 0,
            LayerEventKind::Deleted => 1,
            LayerEventKind::Undeleted => 2,
            LayerEventKind::Modified => 3,
            LayerEventKind::Sorted => 4,
            LayerEventKind::Current => 5,
            LayerEventKind::Unknown(code) => *code,
        }
    }
}

/// A change to one document's layer table.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerTableEvent {
    /// Document whose table changed.
    pub document: DocumentId,
    pub kind: LayerEventKind,
    /// Affected layer, `None` for table-wide changes such as sorting.
    pub layer: Option<LayerId>,
    /// Layer state before the change, when the host provides it.
    pub old_state: Option<Layer>,
    /// Layer state after the change, when the host provides it.
    pub new_state: Option<Layer>,
}

impl LayerTableEvent {
    /// Creates an event without layer snapshots.
    pub fn new(document: DocumentId, kind: LayerEventKind, layer: Option<LayerId>) -> Self {
        Self {
            document,
            kind,
            layer,
            old_state: None,
            new_state: None,
        }
    }

    /// Creates a Modified event carrying both snapshots.
    pub fn modified(document: DocumentId, old: Layer, new: Layer) -> Self {
        Self {
            document,
            kind: LayerEventKind::Modified,
            layer: Some(new.id()),
            old_state: Some(old),
            new_state: Some(new),
        }
    }

    /// Attaches the pre-change snapshot.
    pub fn with_old_state(mut self, layer: Layer) -> Self {
        self.old_state = Some(layer);
        self
    }

    /// Attaches the post-change snapshot.
    pub fn with_new_state(mut self, layer: Layer) -> Self {
        self.new_state = Some(layer);
        self
    }
}

/// Category of a document lifecycle change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentEventKind {
    /// A new, empty document was created.
    New,
    /// A document was opened from storage.
    Open,
    /// A document was closed.
    Close,
    /// The active document changed to this document.
    ActiveChanged,
}

/// A document lifecycle change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentEvent {
    pub document: DocumentId,
    pub kind: DocumentEventKind,
}

impl DocumentEvent {
    /// Creates a lifecycle event.
    pub fn new(document: DocumentId, kind: DocumentEventKind) -> Self {
        Self { document, kind }
    }
}

/// Any raw event the debouncer can receive.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    Layer(LayerTableEvent),
    Document(DocumentEvent),
}

impl ChangeEvent {
    /// Returns the document this event belongs to.
    pub fn document(&self) -> DocumentId {
        match self {
            ChangeEvent::Layer(event) => event.document,
            ChangeEvent::Document(event) => event.document,
        }
    }

    /// Returns true for document lifecycle events.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, ChangeEvent::Document(_))
    }
}

impl From<LayerTableEvent> for ChangeEvent {
    fn from(event: LayerTableEvent) -> Self {
        ChangeEvent::Layer(event)
    }
}

impl From<DocumentEvent> for ChangeEvent {
    fn from(event: DocumentEvent) -> Self {
        ChangeEvent::Document(event)
    }
}
