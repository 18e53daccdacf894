//! layerwatch reactive - Change-event filtering and idle-deferred debouncing.
//!
//! This crate turns a noisy stream of layer table and document lifecycle
//! events into at most one `reevaluate` signal per host idle tick.
//!
//! # Core Concepts
//!
//! - `EventHub` / `EventSource`: Publish/subscribe event streams
//! - `FilterConfig` / `should_trigger`: Decides which events are relevant
//! - `IdleScheduler`: The host's cooperative idle tick, with `IdleQueue` as a
//!   reference implementation
//! - `Debouncer`: Subscribes, filters, and coalesces bursts into one
//!   deferred `reevaluate`
//!
//! # Example
//!
//! ```rust
//! use layerwatch_core::{DocumentEvent, DocumentId, LayerEventKind, LayerTableEvent};
//! use layerwatch_reactive::{DebounceOptions, Debouncer, EventHub, IdleQueue, WatchSources};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let layers = Rc::new(EventHub::<LayerTableEvent>::new());
//! let documents = Rc::new(EventHub::<DocumentEvent>::new());
//! let idle = Rc::new(IdleQueue::new());
//!
//! let debouncer = Debouncer::new(
//!     WatchSources::new(layers.clone(), documents.clone()),
//!     idle.clone(),
//!     DebounceOptions::default(),
//! );
//! let fired = Rc::new(Cell::new(0));
//! let counter = fired.clone();
//! debouncer.on_reevaluate(move || counter.set(counter.get() + 1));
//! debouncer.enable();
//!
//! let doc = DocumentId::new(1);
//! for _ in 0..3 {
//!     layers.publish(&LayerTableEvent::new(doc, LayerEventKind::Added, None));
//! }
//! idle.run_idle();
//! assert_eq!(fired.get(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod debouncer;
pub mod filter;
pub mod idle;
pub mod subscription;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

pub use debouncer::{
    DebounceOptions, DebounceState, DebounceStats, Debouncer, DocumentScope, WatchSources,
};
pub use filter::{should_trigger, FilterConfig, ModifiedFields};
pub use idle::{IdleCallback, IdleQueue, IdleScheduler, IdleSlot, IdleToken};
pub use subscription::{
    EventCallback, EventHub, EventSource, Subscription, SubscriptionId, SubscriptionManager,
};

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::MicrotaskScheduler;
