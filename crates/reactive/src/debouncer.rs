//! Idle-deferred debouncing of relevant change events.
//!
//! A `Debouncer` listens to the layer table and document lifecycle streams,
//! runs every event through the relevance filter and, on the first relevant
//! event after a quiet period, arms one idle callback. When that callback
//! fires the `reevaluate` sink is invoked exactly once, however many relevant
//! events arrived in between.
//!
//! ```text
//!            enable                relevant event
//!   Idle ───────────────▶ Listening ─────────────▶ Pending
//!    ▲                      ▲  ▲                      │
//!    │      disable         │  └──── idle tick ───────┘
//!    └──────────────────────┴───── (emit reevaluate)
//!
//!   teardown / drop: any state ──▶ TornDown
//! ```

use crate::filter::{layer_event_relevant, should_trigger, FilterConfig};
use crate::idle::{IdleScheduler, IdleSlot};
use crate::subscription::{EventSource, SubscriptionId};
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use layerwatch_core::{ChangeEvent, DocumentEvent, DocumentEventKind, DocumentId, LayerTableEvent};
use tracing::{debug, trace};

/// The two raw event streams a debouncer listens to.
#[derive(Clone)]
pub struct WatchSources {
    pub layers: Rc<dyn EventSource<LayerTableEvent>>,
    pub documents: Rc<dyn EventSource<DocumentEvent>>,
}

impl WatchSources {
    pub fn new(
        layers: Rc<dyn EventSource<LayerTableEvent>>,
        documents: Rc<dyn EventSource<DocumentEvent>>,
    ) -> Self {
        Self { layers, documents }
    }
}

/// Which documents' events a debouncer considers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentScope {
    /// Events from every document.
    #[default]
    Any,
    /// Events from one document only. Closing it disables the debouncer.
    Only(DocumentId),
}

impl DocumentScope {
    /// Returns true if events from `document` are considered.
    #[inline]
    pub fn includes(&self, document: DocumentId) -> bool {
        match self {
            DocumentScope::Any => true,
            DocumentScope::Only(id) => *id == document,
        }
    }
}

/// Construction options for a `Debouncer`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebounceOptions {
    pub scope: DocumentScope,
    pub filter: FilterConfig,
}

impl DebounceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: DocumentScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }
}

/// Observable state of a debouncer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    /// Not subscribed.
    Idle,
    /// Subscribed, nothing pending.
    Listening,
    /// Subscribed, a relevant event arrived and the idle callback is armed.
    Pending,
    /// Torn down. Terminal.
    TornDown,
}

/// Event counters, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebounceStats {
    /// Events judged relevant
    pub accepted: u64,
    /// Events filtered out or out of scope
    pub ignored: u64,
    /// `reevaluate` emissions
    pub fired: u64,
}

#[derive(Clone, Copy, Debug)]
struct Subscriptions {
    layers: SubscriptionId,
    documents: SubscriptionId,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    Listening(Subscriptions),
    Pending(Subscriptions),
    TornDown,
}

impl Phase {
    fn state(&self) -> DebounceState {
        match self {
            Phase::Idle => DebounceState::Idle,
            Phase::Listening(_) => DebounceState::Listening,
            Phase::Pending(_) => DebounceState::Pending,
            Phase::TornDown => DebounceState::TornDown,
        }
    }

    fn subscriptions(&self) -> Option<Subscriptions> {
        match self {
            Phase::Listening(subs) | Phase::Pending(subs) => Some(*subs),
            Phase::Idle | Phase::TornDown => None,
        }
    }
}

type Sink = Rc<dyn Fn()>;

struct Inner {
    sources: WatchSources,
    slot: IdleSlot,
    phase: Phase,
    filter: FilterConfig,
    scope: DocumentScope,
    sink: Option<Sink>,
    stats: DebounceStats,
}

impl Inner {
    /// Counts the event and, on the first relevant one, arms the idle callback.
    fn record(&mut self, relevant: bool, weak: &Weak<RefCell<Inner>>) {
        if self.phase.subscriptions().is_none() {
            return;
        }
        if !relevant {
            self.stats.ignored += 1;
            return;
        }
        self.stats.accepted += 1;

        if let Phase::Listening(subs) = self.phase {
            self.phase = Phase::Pending(subs);
            let weak = weak.clone();
            self.slot.arm(move || fire(&weak));
            debug!(accepted = self.stats.accepted, "reevaluation scheduled");
        }
    }

    /// Cancels the armed callback and hands back the subscriptions to drop.
    /// The caller sets the next phase and unsubscribes once the borrow is
    /// released.
    fn release(&mut self) -> Option<Detached> {
        let subs = self.phase.subscriptions()?;
        self.slot.disarm();
        Some(Detached {
            sources: self.sources.clone(),
            subs,
        })
    }
}

/// Subscriptions taken out of a debouncer, dropped with no borrow held.
struct Detached {
    sources: WatchSources,
    subs: Subscriptions,
}

impl Detached {
    fn unsubscribe(self) {
        self.sources.layers.unsubscribe(self.subs.layers);
        self.sources.documents.unsubscribe(self.subs.documents);
    }
}

fn on_layer_event(weak: &Weak<RefCell<Inner>>, event: &LayerTableEvent) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut state = inner.borrow_mut();
    let relevant = state.scope.includes(event.document) && layer_event_relevant(event, &state.filter);
    trace!(kind = ?event.kind, document = event.document.raw(), relevant, "layer event");
    state.record(relevant, weak);
}

fn on_document_event(weak: &Weak<RefCell<Inner>>, event: &DocumentEvent) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut state = inner.borrow_mut();
    if !state.scope.includes(event.document) {
        trace!(kind = ?event.kind, document = event.document.raw(), "document event out of scope");
        state.record(false, weak);
        return;
    }
    if matches!(state.scope, DocumentScope::Only(_)) && event.kind == DocumentEventKind::Close {
        if let Some(detached) = state.release() {
            state.phase = Phase::Idle;
            drop(state);
            detached.unsubscribe();
            debug!(document = event.document.raw(), "watched document closed, debouncer disabled");
        }
        return;
    }
    let relevant = should_trigger(&ChangeEvent::Document(*event), &state.filter);
    trace!(kind = ?event.kind, document = event.document.raw(), relevant, "document event");
    state.record(relevant, weak);
}

fn fire(weak: &Weak<RefCell<Inner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let sink = {
        let mut state = inner.borrow_mut();
        let Phase::Pending(subs) = state.phase else {
            return;
        };
        state.phase = Phase::Listening(subs);
        state.stats.fired += 1;
        debug!(fired = state.stats.fired, "reevaluate");
        state.sink.clone()
    };
    // Invoked with no borrow held so the sink may reconfigure or disable.
    if let Some(sink) = sink {
        sink();
    }
}

/// Coalesces relevant change events into one deferred `reevaluate`.
///
/// All methods are infallible and idempotent. Dropping the debouncer tears it
/// down.
pub struct Debouncer {
    inner: Rc<RefCell<Inner>>,
}

impl Debouncer {
    /// Creates a debouncer in the `Idle` state.
    pub fn new(
        sources: WatchSources,
        scheduler: Rc<dyn IdleScheduler>,
        options: DebounceOptions,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                sources,
                slot: IdleSlot::new(scheduler),
                phase: Phase::Idle,
                filter: options.filter,
                scope: options.scope,
                sink: None,
                stats: DebounceStats::default(),
            })),
        }
    }

    /// Sets the `reevaluate` sink, replacing any previous one.
    pub fn on_reevaluate<F: Fn() + 'static>(&self, sink: F) {
        self.inner.borrow_mut().sink = Some(Rc::new(sink));
    }

    /// Replaces the filter for events that arrive from now on.
    pub fn configure(&self, filter: FilterConfig) {
        self.inner.borrow_mut().filter = filter;
    }

    /// Returns the filter in effect.
    pub fn filter(&self) -> FilterConfig {
        self.inner.borrow().filter
    }

    /// Subscribes to both event streams.
    ///
    /// Returns true if this call subscribed. Already subscribed or torn down
    /// debouncers are left untouched. Events a source delivers from inside
    /// `subscribe` arrive before the debouncer is listening and are dropped.
    pub fn enable(&self) -> bool {
        let sources = {
            let state = self.inner.borrow();
            match state.phase {
                Phase::Idle => state.sources.clone(),
                Phase::Listening(_) | Phase::Pending(_) => return false,
                Phase::TornDown => {
                    debug!("enable ignored, debouncer torn down");
                    return false;
                }
            }
        };

        let weak = Rc::downgrade(&self.inner);
        let layers = sources.layers.subscribe(Rc::new(move |event: &LayerTableEvent| {
            on_layer_event(&weak, event)
        }));
        let weak = Rc::downgrade(&self.inner);
        let documents = sources.documents.subscribe(Rc::new(move |event: &DocumentEvent| {
            on_document_event(&weak, event)
        }));
        let subs = Subscriptions { layers, documents };

        let installed = {
            let mut state = self.inner.borrow_mut();
            if matches!(state.phase, Phase::Idle) {
                state.phase = Phase::Listening(subs);
                true
            } else {
                false
            }
        };
        if !installed {
            // Enabled or torn down from inside a subscribe call.
            Detached { sources, subs }.unsubscribe();
            return false;
        }
        debug!(layers, documents, "debouncer enabled");
        true
    }

    /// Unsubscribes and cancels any pending callback.
    ///
    /// Returns true if the debouncer was subscribed. A pending trigger is
    /// dropped without emitting.
    pub fn disable(&self) -> bool {
        let detached = {
            let mut state = self.inner.borrow_mut();
            let Some(detached) = state.release() else {
                return false;
            };
            state.phase = Phase::Idle;
            detached
        };
        detached.unsubscribe();
        debug!("debouncer disabled");
        true
    }

    /// Disables permanently. Later `enable` calls do nothing.
    pub fn teardown(&self) {
        let (detached, sink) = {
            let mut state = self.inner.borrow_mut();
            if matches!(state.phase, Phase::TornDown) {
                return;
            }
            let detached = state.release();
            state.phase = Phase::TornDown;
            (detached, state.sink.take())
        };
        if let Some(detached) = detached {
            detached.unsubscribe();
        }
        drop(sink);
        debug!("debouncer torn down");
    }

    /// Returns the current state.
    pub fn state(&self) -> DebounceState {
        self.inner.borrow().phase.state()
    }

    /// Returns true if a relevant event is waiting for the idle tick.
    pub fn is_pending(&self) -> bool {
        matches!(self.inner.borrow().phase, Phase::Pending(_))
    }

    /// Returns true if subscribed to the event streams.
    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().phase.subscriptions().is_some()
    }

    pub fn stats(&self) -> DebounceStats {
        self.inner.borrow().stats
    }

    pub fn scope(&self) -> DocumentScope {
        self.inner.borrow().scope
    }

    /// Changes the document scope for events that arrive from now on.
    pub fn set_scope(&self, scope: DocumentScope) {
        self.inner.borrow_mut().scope = scope;
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.teardown();
    }
}
