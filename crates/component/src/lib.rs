//! layerwatch component - Layer table watcher for a visual programming graph.
//!
//! `LayerTableWatcher` reads a document's layer table into ten parallel
//! output lists and, with auto-update on, expires itself one idle tick after
//! a burst of relevant layer changes.
//!
//! - `params`: Input/output registration and `SolveInputs`
//! - `LayerTableWatcher`: Solve, expire hook and graph lifecycle hooks
//!
//! # Example
//!
//! ```rust
//! use layerwatch_component::{LayerTableWatcher, SolveInputs};
//! use layerwatch_core::Layer;
//! use layerwatch_document::Host;
//! use layerwatch_reactive::{DebounceOptions, IdleQueue};
//! use std::rc::Rc;
//!
//! let host = Rc::new(Host::new());
//! let doc = host.new_document("Plan");
//! let idle = Rc::new(IdleQueue::new());
//!
//! let mut watcher = LayerTableWatcher::new(
//!     host.clone(),
//!     host.watch_sources(),
//!     idle.clone(),
//!     DebounceOptions::default(),
//! );
//! let inputs = SolveInputs::default().with_auto_update(true);
//! watcher.solve(&inputs);
//!
//! doc.borrow_mut().add_layer(Layer::new("Walls")).unwrap();
//! idle.run_idle();
//! assert!(watcher.is_expired());
//! assert_eq!(watcher.solve(&inputs).names, ["Walls"]);
//! ```

#![no_std]

extern crate alloc;

pub mod params;
mod watcher;

pub use params::{ComponentInfo, ParamDescriptor, SolveInputs, COMPONENT, INPUTS, OUTPUTS};
pub use watcher::{GraphDocumentEvent, LayerTableWatcher, SolveReason};
