//! layerwatch document - In-memory reference host.
//!
//! This crate models the parts of a CAD host that the layer watcher touches:
//!
//! - `LayerTable`: Layers in native order with soft delete and name rules
//! - `NameTable`: Linetype and material names
//! - `Document`: The tables of one document; mutations raise layer events
//! - `Host`: Open documents, the active document and the two event hubs
//!
//! There is no rendering, persistence or undo.
//!
//! # Example
//!
//! ```rust
//! use layerwatch_core::{Layer, SnapshotReader};
//! use layerwatch_document::Host;
//!
//! let host = Host::new();
//! let doc = host.new_document("Plan");
//! let walls = doc.borrow_mut().add_layer(Layer::new("Walls")).unwrap();
//! doc.borrow_mut()
//!     .add_layer(Layer::new("Exterior").with_parent(walls))
//!     .unwrap();
//!
//! let rows = host.read_all();
//! assert_eq!(rows[1].full_path, "Walls::Exterior");
//! ```

#![no_std]

extern crate alloc;

mod catalog;
mod document;
mod host;
mod table;

pub use catalog::NameTable;
pub use document::Document;
pub use host::{DocumentRef, Host};
pub use table::LayerTable;
