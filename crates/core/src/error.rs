//! Error types for layerwatch.

use crate::types::{DocumentId, LayerId};
use alloc::string::String;
use core::fmt;

/// Result type alias for layerwatch operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for layer table and document operations.
///
/// The debounce core itself never fails; these errors come from the
/// reference host when a table mutation is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Layer does not exist or is soft-deleted.
    LayerNotFound {
        id: LayerId,
    },
    /// Parent layer does not exist or is soft-deleted.
    ParentNotFound {
        id: LayerId,
    },
    /// Another live layer already has this full path.
    DuplicateLayerName {
        path: String,
    },
    /// Layer name is empty or contains the path separator.
    InvalidLayerName {
        name: String,
    },
    /// Linetype index is out of range.
    LinetypeNotFound {
        index: usize,
    },
    /// Material index is out of range.
    MaterialNotFound {
        index: usize,
    },
    /// Document is not registered with the host.
    DocumentNotFound {
        id: DocumentId,
    },
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LayerNotFound { id } => write!(f, "Layer not found: {}", id),
            Error::ParentNotFound { id } => write!(f, "Parent layer not found: {}", id),
            Error::DuplicateLayerName { path } => {
                write!(f, "Layer already exists: {}", path)
            }
            Error::InvalidLayerName { name } => write!(f, "Invalid layer name: {:?}", name),
            Error::LinetypeNotFound { index } => {
                write!(f, "Linetype not found at index {}", index)
            }
            Error::MaterialNotFound { index } => {
                write!(f, "Material not found at index {}", index)
            }
            Error::DocumentNotFound { id } => write!(f, "Document not found: {}", id),
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
        }
    }
}

impl Error {
    /// Creates a layer not found error.
    pub fn layer_not_found(id: LayerId) -> Self {
        Error::LayerNotFound { id }
    }

    /// Creates a parent not found error.
    pub fn parent_not_found(id: LayerId) -> Self {
        Error::ParentNotFound { id }
    }

    /// Creates a duplicate layer name error.
    pub fn duplicate_layer_name(path: impl Into<String>) -> Self {
        Error::DuplicateLayerName { path: path.into() }
    }

    /// Creates an invalid layer name error.
    pub fn invalid_layer_name(name: impl Into<String>) -> Self {
        Error::InvalidLayerName { name: name.into() }
    }

    /// Creates a linetype not found error.
    pub fn linetype_not_found(index: usize) -> Self {
        Error::LinetypeNotFound { index }
    }

    /// Creates a material not found error.
    pub fn material_not_found(index: usize) -> Self {
        Error::MaterialNotFound { index }
    }

    /// Creates a document not found error.
    pub fn document_not_found(id: DocumentId) -> Self {
        Error::DocumentNotFound { id }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }
}
