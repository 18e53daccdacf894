//! End-to-end debouncer scenarios over in-crate event hubs and idle queue.

use layerwatch_core::{
    DocumentEvent, DocumentEventKind, DocumentId, Layer, LayerEventKind, LayerField,
    LayerTableEvent,
};
use layerwatch_reactive::{
    DebounceOptions, DebounceState, Debouncer, EventHub, FilterConfig, IdleQueue, ModifiedFields,
    WatchSources,
};
use std::cell::Cell;
use std::rc::Rc;

const DOC: DocumentId = DocumentId::new(7);

struct Harness {
    layers: Rc<EventHub<LayerTableEvent>>,
    documents: Rc<EventHub<DocumentEvent>>,
    idle: Rc<IdleQueue>,
    fired: Rc<Cell<u32>>,
    debouncer: Debouncer,
}

fn harness(filter: FilterConfig) -> Harness {
    let layers = Rc::new(EventHub::new());
    let documents = Rc::new(EventHub::new());
    let idle = Rc::new(IdleQueue::new());
    let debouncer = Debouncer::new(
        WatchSources::new(layers.clone(), documents.clone()),
        idle.clone(),
        DebounceOptions::new().with_filter(filter),
    );
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    debouncer.on_reevaluate(move || counter.set(counter.get() + 1));
    Harness {
        layers,
        documents,
        idle,
        fired,
        debouncer,
    }
}

fn event(kind: LayerEventKind) -> LayerTableEvent {
    LayerTableEvent::new(DOC, kind, None)
}

#[test]
fn added_sorted_added_fires_once() {
    let h = harness(FilterConfig::default());
    h.debouncer.enable();

    h.layers.publish(&event(LayerEventKind::Added));
    h.layers.publish(&event(LayerEventKind::Sorted));
    h.layers.publish(&event(LayerEventKind::Added));
    h.idle.run_idle();

    assert_eq!(h.fired.get(), 1);
    let stats = h.debouncer.stats();
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.ignored, 1);
}

#[test]
fn locked_only_change_is_ignored_when_locked_flag_off() {
    let filter = FilterConfig::default().with_modified_field(LayerField::Locked, false);
    let h = harness(filter);
    h.debouncer.enable();

    let old = Layer::new("Walls");
    let new = old.clone().with_locked(true);
    h.layers.publish(&LayerTableEvent::modified(DOC, old, new));
    h.idle.run_idle();

    assert_eq!(h.fired.get(), 0);
    assert_eq!(h.debouncer.state(), DebounceState::Listening);
}

#[test]
fn coarse_modified_triggers_without_states() {
    let h = harness(FilterConfig::default());
    h.debouncer.enable();

    h.layers.publish(&event(LayerEventKind::Modified));
    h.idle.run_idle();
    assert_eq!(h.fired.get(), 1);
}

#[test]
fn fine_grained_modified_without_states_is_relevant() {
    let filter =
        FilterConfig::default().with_modified_fields(ModifiedFields::only(&[LayerField::Name]));
    let h = harness(filter);
    h.debouncer.enable();

    h.layers.publish(&event(LayerEventKind::Modified));
    h.idle.run_idle();
    assert_eq!(h.fired.get(), 1);
}

#[test]
fn locked_only_mask_distinguishes_changes() {
    let filter =
        FilterConfig::default().with_modified_fields(ModifiedFields::only(&[LayerField::Locked]));
    let h = harness(filter);
    h.debouncer.enable();

    let old = Layer::new("Walls");
    let mut renamed = old.clone();
    renamed.name = "Partitions".into();
    h.layers
        .publish(&LayerTableEvent::modified(DOC, old.clone(), renamed));
    h.idle.run_idle();
    assert_eq!(h.fired.get(), 0);

    h.layers
        .publish(&LayerTableEvent::modified(DOC, old.clone(), old.with_locked(true)));
    h.idle.run_idle();
    assert_eq!(h.fired.get(), 1);
}

#[test]
fn events_during_pending_do_not_rearm() {
    let h = harness(FilterConfig::all());
    h.debouncer.enable();

    h.layers.publish(&event(LayerEventKind::Added));
    h.layers.publish(&event(LayerEventKind::Current));
    h.documents
        .publish(&DocumentEvent::new(DOC, DocumentEventKind::ActiveChanged));
    assert_eq!(h.idle.armed_count(), 1);

    h.idle.run_idle();
    assert_eq!(h.fired.get(), 1);
    assert_eq!(h.debouncer.stats().accepted, 3);
}

#[test]
fn disable_then_events_never_fire() {
    let h = harness(FilterConfig::all());
    h.debouncer.enable();
    h.layers.publish(&event(LayerEventKind::Added));
    h.debouncer.disable();

    for _ in 0..5 {
        h.layers.publish(&event(LayerEventKind::Deleted));
        h.idle.run_idle();
    }
    assert_eq!(h.fired.get(), 0);
}

#[test]
fn sink_sees_events_raised_during_reevaluation_on_next_tick() {
    let h = harness(FilterConfig::all());
    let layers = h.layers.clone();
    let fired = h.fired.clone();
    // The consumer mutates the document when re-evaluated, like a graph that
    // writes layers back. The follow-up event lands on the next tick.
    h.debouncer.on_reevaluate(move || {
        fired.set(fired.get() + 1);
        if fired.get() == 1 {
            layers.publish(&LayerTableEvent::new(DOC, LayerEventKind::Added, None));
        }
    });
    h.debouncer.enable();

    h.layers.publish(&event(LayerEventKind::Added));
    assert_eq!(h.idle.run_idle(), 1);
    assert_eq!(h.fired.get(), 1);
    assert!(h.debouncer.is_pending());

    assert_eq!(h.idle.run_idle(), 1);
    assert_eq!(h.fired.get(), 2);
    assert!(!h.debouncer.is_pending());
}

#[test]
fn two_debouncers_share_one_idle_queue() {
    let h = harness(FilterConfig::default());
    let second = Debouncer::new(
        WatchSources::new(h.layers.clone(), h.documents.clone()),
        h.idle.clone(),
        DebounceOptions::default(),
    );
    let second_fired = Rc::new(Cell::new(0));
    let counter = second_fired.clone();
    second.on_reevaluate(move || counter.set(counter.get() + 1));

    h.debouncer.enable();
    second.enable();
    h.layers.publish(&event(LayerEventKind::Added));
    h.layers.publish(&event(LayerEventKind::Added));
    assert_eq!(h.idle.armed_count(), 2);

    h.idle.run_idle();
    assert_eq!(h.fired.get(), 1);
    assert_eq!(second_fired.get(), 1);
}
