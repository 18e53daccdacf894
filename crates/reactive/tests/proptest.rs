//! Property-based tests for the debouncer using proptest.

use layerwatch_core::{DocumentId, Layer, LayerEventKind, LayerTableEvent, DocumentEvent};
use layerwatch_reactive::{
    should_trigger, DebounceOptions, Debouncer, EventHub, FilterConfig, IdleQueue,
    ModifiedFields, WatchSources,
};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

const DOC: DocumentId = DocumentId::new(1);

fn kind_strategy() -> impl Strategy<Value = LayerEventKind> {
    (0u8..6).prop_map(LayerEventKind::from_code)
}

fn filter_strategy() -> impl Strategy<Value = FilterConfig> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::array::uniform5(any::<bool>()),
    )
        .prop_map(|(added, deleted, modified, sorted, current, f)| FilterConfig {
            added,
            deleted,
            modified,
            sorted,
            current,
            modified_fields: ModifiedFields {
                locked: f[0],
                visible: f[1],
                parent: f[2],
                name: f[3],
                color: f[4],
            },
        })
}

fn make_event(kind: LayerEventKind, flip: u8) -> LayerTableEvent {
    if kind != LayerEventKind::Modified {
        return LayerTableEvent::new(DOC, kind, None);
    }
    let old = Layer::new("L");
    let mut new = old.clone();
    match flip % 3 {
        0 => new.locked = true,
        1 => new.name = "M".into(),
        _ => new.visible = false,
    }
    LayerTableEvent::modified(DOC, old, new)
}

struct Rig {
    layers: Rc<EventHub<LayerTableEvent>>,
    idle: Rc<IdleQueue>,
    fired: Rc<Cell<u32>>,
    debouncer: Debouncer,
}

fn rig(filter: FilterConfig) -> Rig {
    let layers = Rc::new(EventHub::new());
    let documents: Rc<EventHub<DocumentEvent>> = Rc::new(EventHub::new());
    let idle = Rc::new(IdleQueue::new());
    let debouncer = Debouncer::new(
        WatchSources::new(layers.clone(), documents),
        idle.clone(),
        DebounceOptions::new().with_filter(filter),
    );
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    debouncer.on_reevaluate(move || counter.set(counter.get() + 1));
    debouncer.enable();
    Rig {
        layers,
        idle,
        fired,
        debouncer,
    }
}

proptest! {
    /// Any burst fires once if it held a relevant event, never otherwise.
    #[test]
    fn burst_fires_at_most_once(
        filter in filter_strategy(),
        events in prop::collection::vec((kind_strategy(), any::<u8>()), 0..50)
    ) {
        let rig = rig(filter);
        let mut relevant = 0;
        for (kind, flip) in &events {
            let event = make_event(*kind, *flip);
            if should_trigger(&event.clone().into(), &filter) {
                relevant += 1;
            }
            rig.layers.publish(&event);
        }
        rig.idle.run_idle();

        let expected = if relevant > 0 { 1 } else { 0 };
        prop_assert_eq!(rig.fired.get(), expected);
        prop_assert_eq!(rig.debouncer.stats().accepted, relevant as u64);
        prop_assert_eq!(rig.debouncer.stats().ignored, (events.len() - relevant) as u64);
    }

    /// One emission per tick that followed a relevant event.
    #[test]
    fn emissions_match_relevant_ticks(
        ticks in prop::collection::vec(prop::collection::vec(kind_strategy(), 0..8), 1..12)
    ) {
        let rig = rig(FilterConfig::default());
        let mut expected = 0;
        for burst in &ticks {
            let mut any = false;
            for kind in burst {
                let event = LayerTableEvent::new(DOC, *kind, None);
                any |= should_trigger(&event.clone().into(), &FilterConfig::default());
                rig.layers.publish(&event);
            }
            rig.idle.run_idle();
            if any {
                expected += 1;
            }
            prop_assert_eq!(rig.fired.get(), expected);
        }
    }

    /// Disabling at any point suppresses every later emission.
    #[test]
    fn disable_suppresses_emissions(
        before in prop::collection::vec(kind_strategy(), 0..20),
        after in prop::collection::vec(kind_strategy(), 0..20),
        tick_before_disable in any::<bool>()
    ) {
        let rig = rig(FilterConfig::all());
        for kind in &before {
            rig.layers.publish(&LayerTableEvent::new(DOC, *kind, None));
        }
        if tick_before_disable {
            rig.idle.run_idle();
        }
        let fired_at_disable = rig.fired.get();
        rig.debouncer.disable();

        for kind in &after {
            rig.layers.publish(&LayerTableEvent::new(DOC, *kind, None));
            rig.idle.run_idle();
        }
        prop_assert_eq!(rig.fired.get(), fired_at_disable);
        prop_assert!(rig.idle.is_empty());
    }
}
