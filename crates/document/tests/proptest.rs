//! Property-based tests for the reference layer table using proptest.

use layerwatch_core::{DocumentId, Layer, LayerId, SnapshotReader};
use layerwatch_document::{Document, LayerTable};
use layerwatch_reactive::EventHub;
use proptest::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Clone, Debug)]
enum Op {
    Add { name: u8, parent: Option<u8> },
    Rename { target: u8, name: u8 },
    Reparent { target: u8, parent: Option<u8> },
    Delete { target: u8 },
    Undelete { target: u8 },
    SetCurrent { target: u8 },
    Sort,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..6, prop::option::of(0u8..16)).prop_map(|(name, parent)| Op::Add { name, parent }),
        1 => (0u8..16, 0u8..6).prop_map(|(target, name)| Op::Rename { target, name }),
        1 => (0u8..16, prop::option::of(0u8..16)).prop_map(|(target, parent)| Op::Reparent { target, parent }),
        1 => (0u8..16).prop_map(|target| Op::Delete { target }),
        1 => (0u8..16).prop_map(|target| Op::Undelete { target }),
        1 => (0u8..16).prop_map(|target| Op::SetCurrent { target }),
        1 => Just(Op::Sort),
    ]
}

fn id(raw: u8) -> LayerId {
    LayerId::new(raw as u64 + 1)
}

fn apply(table: &mut LayerTable, op: &Op) {
    // Rejected operations are expected; only the invariants matter.
    let _ = match op {
        Op::Add { name, parent } => {
            let mut layer = Layer::new(format!("N{}", name));
            layer.parent = parent.map(id);
            table.add(layer).map(|_| ())
        }
        Op::Rename { target, name } => table
            .update(id(*target), |l| l.name = format!("N{}", name))
            .map(|_| ()),
        Op::Reparent { target, parent } => table
            .update(id(*target), |l| l.parent = parent.map(id))
            .map(|_| ()),
        Op::Delete { target } => table.delete(id(*target)).map(|_| ()),
        Op::Undelete { target } => table.undelete(id(*target)).map(|_| ()),
        Op::SetCurrent { target } => table.set_current(id(*target)).map(|_| ()),
        Op::Sort => {
            table.sort_by_name();
            Ok(())
        }
    };
}

proptest! {
    /// Live full paths stay unique and every live layer has a live parent.
    #[test]
    fn table_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut table = LayerTable::new(DocumentId::new(1));
        for op in &ops {
            apply(&mut table, op);

            let mut paths = HashSet::new();
            for layer in table.live() {
                let path = table.full_path(layer.id()).unwrap();
                prop_assert!(paths.insert(path.clone()), "duplicate path {}", path);
                if let Some(parent) = layer.parent {
                    prop_assert!(table.get(parent).is_some(), "dangling parent under {}", path);
                }
            }
            if let Some(current) = table.current() {
                prop_assert!(table.get(current).is_some(), "current layer is not live");
            }
        }
    }

    /// Snapshot reads return one row per live layer, in table order, and are
    /// repeatable.
    #[test]
    fn snapshot_matches_live_layers(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut doc = Document::new(DocumentId::new(1), "Plan", Rc::new(EventHub::new()));
        let mut table = LayerTable::new(DocumentId::new(1));
        for op in &ops {
            apply(&mut table, op);
        }
        // Replay on the document so its table matches the standalone one.
        for layer in table.live() {
            let mut copy = Layer::new(layer.name.clone());
            copy.parent = layer.parent.and_then(|p| {
                table.full_path(p).and_then(|path| doc.find_layer(&path))
            });
            let _ = doc.add_layer(copy);
        }

        let rows = doc.read_all();
        prop_assert_eq!(rows.len(), doc.layers().live().count());
        prop_assert_eq!(&rows, &doc.read_all());
        let names: Vec<_> = doc.layers().live().map(|l| l.name.clone()).collect();
        let row_names: Vec<_> = rows.iter().map(|r| r.name.clone()).collect();
        prop_assert_eq!(names, row_names);
    }
}
