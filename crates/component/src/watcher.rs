//! The layer table watcher component.
//!
//! Every solve reads the layer table once and rebuilds the ten output lists.
//! With auto-update on, a `Debouncer` listens for relevant layer changes and,
//! one idle tick after a burst, marks the component expired and calls the
//! host's expire hook so the graph schedules the next solve.

use crate::params::SolveInputs;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use layerwatch_core::{LayerColumns, SnapshotReader};
use layerwatch_reactive::{
    DebounceOptions, DebounceState, Debouncer, IdleScheduler, WatchSources,
};
use tracing::debug;

/// Why a solve ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveReason {
    /// First solve of this instance.
    Initial,
    /// `update` went from false to true.
    Manual,
    /// The debouncer expired the component.
    Reevaluate,
    /// Anything else, e.g. an upstream input changed.
    Inputs,
}

/// State changes of the graph document that owns the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphDocumentEvent {
    Opened,
    Closed,
    Loaded,
    Unloaded,
    Locked,
    Unlocked,
}

impl GraphDocumentEvent {
    /// Returns true if the component may listen for changes afterwards.
    pub fn allows_listening(&self) -> bool {
        matches!(
            self,
            GraphDocumentEvent::Opened | GraphDocumentEvent::Loaded | GraphDocumentEvent::Unlocked
        )
    }
}

type ExpireHook = Rc<dyn Fn()>;

/// Expired flag shared with the debouncer's sink.
#[derive(Default)]
struct ExpireSignal {
    expired: Cell<bool>,
    count: Cell<u64>,
    hook: RefCell<Option<ExpireHook>>,
}

impl ExpireSignal {
    fn expire(&self) {
        self.expired.set(true);
        self.count.set(self.count.get() + 1);
        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

/// Exposes a document's layer table as ten parallel output lists.
pub struct LayerTableWatcher<R: SnapshotReader> {
    reader: R,
    debouncer: Debouncer,
    signal: Rc<ExpireSignal>,
    outputs: LayerColumns,
    /// Auto-update requested by the last solve
    auto_update: bool,
    /// `update` seen by the last solve, for edge detection
    last_update: bool,
    on_graph: bool,
    document_live: bool,
    solves: u64,
    last_reason: Option<SolveReason>,
}

impl<R: SnapshotReader> LayerTableWatcher<R> {
    /// Creates a watcher that is on the graph and not listening yet.
    pub fn new(
        reader: R,
        sources: WatchSources,
        scheduler: Rc<dyn IdleScheduler>,
        options: DebounceOptions,
    ) -> Self {
        let debouncer = Debouncer::new(sources, scheduler, options);
        let signal = Rc::new(ExpireSignal::default());
        let sink = Rc::downgrade(&signal);
        debouncer.on_reevaluate(move || {
            if let Some(signal) = sink.upgrade() {
                signal.expire();
            }
        });

        Self {
            reader,
            debouncer,
            signal,
            outputs: LayerColumns::new(),
            auto_update: false,
            last_update: false,
            on_graph: true,
            document_live: true,
            solves: 0,
            last_reason: None,
        }
    }

    /// Sets the hook invoked when the component expires, replacing any
    /// previous one. The hook runs on an idle tick and may solve again.
    pub fn on_expire<F: Fn() + 'static>(&self, hook: F) {
        *self.signal.hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// Runs one solve and returns the rebuilt outputs.
    pub fn solve(&mut self, inputs: &SolveInputs) -> &LayerColumns {
        let reason = self.classify(inputs);

        // This solve reads the post-change table, so a trigger raised before
        // it would only request a redundant solve.
        if self.debouncer.is_pending() {
            self.debouncer.disable();
        }
        self.debouncer.configure(inputs.filter);
        self.auto_update = inputs.auto_update;
        self.refresh_listening();

        self.outputs = self.reader.read_all().into_iter().collect();

        self.signal.expired.set(false);
        self.last_update = inputs.update;
        self.solves += 1;
        self.last_reason = Some(reason);
        debug!(
            reason = ?reason,
            rows = self.outputs.len(),
            auto_update = inputs.auto_update,
            "layer table solved"
        );
        &self.outputs
    }

    /// The component was placed on a graph.
    pub fn added_to_graph(&mut self) {
        self.on_graph = true;
        self.refresh_listening();
    }

    /// The component was removed from its graph.
    pub fn removed_from_graph(&mut self) {
        self.on_graph = false;
        self.refresh_listening();
    }

    /// The owning graph document changed state.
    pub fn graph_document_changed(&mut self, event: GraphDocumentEvent) {
        self.document_live = event.allows_listening();
        debug!(event = ?event, "graph document changed");
        self.refresh_listening();
    }

    /// Outputs of the last solve.
    pub fn outputs(&self) -> &LayerColumns {
        &self.outputs
    }

    /// Returns true if a re-evaluation was requested since the last solve.
    pub fn is_expired(&self) -> bool {
        self.signal.expired.get()
    }

    /// Number of times the component expired itself.
    pub fn expire_count(&self) -> u64 {
        self.signal.count.get()
    }

    pub fn solve_count(&self) -> u64 {
        self.solves
    }

    pub fn last_reason(&self) -> Option<SolveReason> {
        self.last_reason
    }

    /// Returns true if subscribed to layer changes.
    pub fn is_listening(&self) -> bool {
        self.debouncer.is_enabled()
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debouncer.state()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    fn classify(&self, inputs: &SolveInputs) -> SolveReason {
        if self.solves == 0 {
            SolveReason::Initial
        } else if inputs.update && !self.last_update {
            SolveReason::Manual
        } else if self.signal.expired.get() {
            SolveReason::Reevaluate
        } else {
            SolveReason::Inputs
        }
    }

    fn refresh_listening(&self) {
        if self.auto_update && self.on_graph && self.document_live {
            self.debouncer.enable();
        } else {
            self.debouncer.disable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use layerwatch_core::{
        Color, DocumentEvent, DocumentId, LayerEventKind, LayerRow, LayerTableEvent,
        DEFAULT_LINETYPE_NAME,
    };
    use layerwatch_reactive::{EventHub, FilterConfig, IdleQueue};

    const DOC: DocumentId = DocumentId::new(1);

    /// A reader whose rows the test edits directly.
    #[derive(Default)]
    struct Rows(RefCell<Vec<LayerRow>>);

    impl Rows {
        fn push(&self, name: &str) {
            self.0.borrow_mut().push(LayerRow {
                name: name.into(),
                full_path: name.into(),
                color: Color::BLACK,
                linetype: DEFAULT_LINETYPE_NAME.into(),
                material: None,
                visible: true,
                print_width: 0.0,
                print_color: Color::BLACK,
                locked: false,
                expanded: false,
            });
        }
    }

    impl SnapshotReader for Rows {
        fn read_all(&self) -> Vec<LayerRow> {
            self.0.borrow().clone()
        }
    }

    struct Fixture {
        layers: Rc<EventHub<LayerTableEvent>>,
        idle: Rc<IdleQueue>,
        rows: Rc<Rows>,
        watcher: LayerTableWatcher<Rc<Rows>>,
    }

    fn fixture() -> Fixture {
        let layers = Rc::new(EventHub::new());
        let documents: Rc<EventHub<DocumentEvent>> = Rc::new(EventHub::new());
        let idle = Rc::new(IdleQueue::new());
        let rows = Rc::new(Rows::default());
        let watcher = LayerTableWatcher::new(
            rows.clone(),
            WatchSources::new(layers.clone(), documents),
            idle.clone(),
            DebounceOptions::default(),
        );
        Fixture {
            layers,
            idle,
            rows,
            watcher,
        }
    }

    fn added() -> LayerTableEvent {
        LayerTableEvent::new(DOC, LayerEventKind::Added, None)
    }

    fn auto() -> SolveInputs {
        SolveInputs::default().with_auto_update(true)
    }

    #[test]
    fn test_solve_reads_rows() {
        let mut fx = fixture();
        fx.rows.push("Walls");
        fx.rows.push("Doors");

        let outputs = fx.watcher.solve(&SolveInputs::default());
        assert_eq!(outputs.names, vec!["Walls", "Doors"]);
        assert_eq!(outputs.linetypes, vec!["Continuous", "Continuous"]);
        assert_eq!(fx.watcher.last_reason(), Some(SolveReason::Initial));
        assert!(!fx.watcher.is_listening());
    }

    #[test]
    fn test_auto_update_expires_once_per_burst() {
        let mut fx = fixture();
        let hooks = Rc::new(Cell::new(0));
        let h = hooks.clone();
        fx.watcher.on_expire(move || h.set(h.get() + 1));

        fx.watcher.solve(&auto());
        assert!(fx.watcher.is_listening());

        fx.layers.publish(&added());
        fx.layers.publish(&added());
        assert!(!fx.watcher.is_expired());
        fx.idle.run_idle();

        assert!(fx.watcher.is_expired());
        assert_eq!(hooks.get(), 1);
        assert_eq!(fx.watcher.expire_count(), 1);

        fx.rows.push("New");
        fx.watcher.solve(&auto());
        assert_eq!(fx.watcher.last_reason(), Some(SolveReason::Reevaluate));
        assert!(!fx.watcher.is_expired());
        assert_eq!(fx.watcher.outputs().len(), 1);
    }

    #[test]
    fn test_turning_auto_update_off_stops_listening() {
        let mut fx = fixture();
        fx.watcher.solve(&auto());
        fx.layers.publish(&added());

        fx.watcher.solve(&SolveInputs::default());
        assert!(!fx.watcher.is_listening());
        fx.idle.run_idle();
        assert!(!fx.watcher.is_expired());
    }

    #[test]
    fn test_manual_update_is_edge_triggered() {
        let mut fx = fixture();
        let update = SolveInputs::default().with_update(true);

        fx.watcher.solve(&SolveInputs::default());
        fx.watcher.solve(&update);
        assert_eq!(fx.watcher.last_reason(), Some(SolveReason::Manual));
        fx.watcher.solve(&update);
        assert_eq!(fx.watcher.last_reason(), Some(SolveReason::Inputs));
        fx.watcher.solve(&SolveInputs::default());
        fx.watcher.solve(&update);
        assert_eq!(fx.watcher.last_reason(), Some(SolveReason::Manual));
        assert_eq!(fx.watcher.solve_count(), 5);
    }

    #[test]
    fn test_filter_applies_from_solve() {
        let mut fx = fixture();
        fx.watcher
            .solve(&auto().with_filter(FilterConfig::none()));

        fx.layers.publish(&added());
        fx.idle.run_idle();
        assert!(!fx.watcher.is_expired());
    }

    #[test]
    fn test_graph_lifecycle() {
        let mut fx = fixture();
        fx.watcher.solve(&auto());

        fx.watcher.graph_document_changed(GraphDocumentEvent::Locked);
        assert!(!fx.watcher.is_listening());
        fx.watcher.graph_document_changed(GraphDocumentEvent::Unlocked);
        assert!(fx.watcher.is_listening());

        fx.layers.publish(&added());
        fx.watcher.removed_from_graph();
        assert_eq!(fx.watcher.debounce_state(), DebounceState::Idle);
        fx.idle.run_idle();
        assert!(!fx.watcher.is_expired());

        fx.watcher.added_to_graph();
        assert!(fx.watcher.is_listening());
    }

    #[test]
    fn test_lifecycle_hooks_respect_auto_update() {
        let mut fx = fixture();
        fx.watcher.solve(&SolveInputs::default());
        fx.watcher.graph_document_changed(GraphDocumentEvent::Opened);
        assert!(!fx.watcher.is_listening());
        fx.watcher.added_to_graph();
        assert!(!fx.watcher.is_listening());
    }

    #[test]
    fn test_closed_graph_document_blocks_solve_from_listening() {
        let mut fx = fixture();
        fx.watcher.graph_document_changed(GraphDocumentEvent::Closed);
        fx.watcher.solve(&auto());
        assert!(!fx.watcher.is_listening());

        fx.watcher.graph_document_changed(GraphDocumentEvent::Loaded);
        assert!(fx.watcher.is_listening());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let fx = fixture();
        let layers = fx.layers.clone();
        let mut watcher = fx.watcher;
        watcher.solve(&auto());
        assert_eq!(layers.subscriber_count(), 1);
        drop(watcher);
        assert_eq!(layers.subscriber_count(), 0);
    }
}
