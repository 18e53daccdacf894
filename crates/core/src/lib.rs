//! layerwatch core - Layer, event and snapshot types.
//!
//! This crate provides the foundational types shared by the debouncer, the
//! reference host and the graph component:
//!
//! - `Layer`: One record of a document's layer table
//! - `LayerField`: Sub-fields tracked by the fine-grained Modified filter
//! - `ChangeEvent`: Raw layer table and document lifecycle events
//! - `LayerRow` / `LayerColumns`: The read-only output projection
//! - `SnapshotReader`: Synchronous query producing output rows
//! - `Error`: Error types for table operations
//!
//! # Example
//!
//! ```rust
//! use layerwatch_core::{Color, Layer, LayerField};
//!
//! let walls = Layer::new("Walls").with_color(Color::rgb(200, 0, 0));
//! let mut locked = walls.clone();
//! locked.locked = true;
//!
//! assert!(walls.differs_in(LayerField::Locked, &locked));
//! assert!(!walls.differs_in(LayerField::Name, &locked));
//! ```

#![no_std]

extern crate alloc;

mod color;
mod error;
mod event;
mod layer;
mod row;
mod snapshot;
mod types;

pub use color::Color;
pub use error::{Error, Result};
pub use event::{
    ChangeEvent, DocumentEvent, DocumentEventKind, LayerEventKind, LayerTableEvent,
};
pub use layer::{Layer, UNASSIGNED_LAYER_ID};
pub use row::{LayerRow, DEFAULT_LINETYPE_NAME};
pub use snapshot::{LayerColumns, SnapshotReader};
pub use types::{DocumentId, LayerField, LayerId};

/// Separator between path segments of nested layer names.
pub const PATH_SEPARATOR: &str = "::";
