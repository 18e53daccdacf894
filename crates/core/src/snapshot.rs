//! Snapshot reading and the column-oriented output surface.

use crate::color::Color;
use crate::row::LayerRow;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Synchronous, side-effect free query over a layer table.
///
/// Implementations return one row per live (non-deleted) layer, in the
/// table's native iteration order. Two calls with no intervening mutation
/// return the same rows in the same order.
pub trait SnapshotReader {
    /// Reads every live layer.
    fn read_all(&self) -> Vec<LayerRow>;
}

impl<T: SnapshotReader + ?Sized> SnapshotReader for &T {
    fn read_all(&self) -> Vec<LayerRow> {
        (**self).read_all()
    }
}

impl<T: SnapshotReader + ?Sized> SnapshotReader for Rc<T> {
    fn read_all(&self) -> Vec<LayerRow> {
        (**self).read_all()
    }
}

impl<T: SnapshotReader + ?Sized> SnapshotReader for RefCell<T> {
    /// Panics if the table is mutably borrowed, i.e. when called from inside
    /// a change handler raised by a mutation in progress.
    fn read_all(&self) -> Vec<LayerRow> {
        self.borrow().read_all()
    }
}

/// Ten parallel output sequences, one entry per row.
///
/// Entry `i` of every sequence belongs to the same layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerColumns {
    pub names: Vec<String>,
    pub full_paths: Vec<String>,
    pub colors: Vec<Color>,
    pub linetypes: Vec<String>,
    pub materials: Vec<Option<String>>,
    pub visible: Vec<bool>,
    pub print_widths: Vec<f64>,
    pub print_colors: Vec<Color>,
    pub locked: Vec<bool>,
    pub expanded: Vec<bool>,
}

impl LayerColumns {
    /// Creates empty columns.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row, striding its fields across the columns.
    pub fn push(&mut self, row: LayerRow) {
        self.names.push(row.name);
        self.full_paths.push(row.full_path);
        self.colors.push(row.color);
        self.linetypes.push(row.linetype);
        self.materials.push(row.material);
        self.visible.push(row.visible);
        self.print_widths.push(row.print_width);
        self.print_colors.push(row.print_color);
        self.locked.push(row.locked);
        self.expanded.push(row.expanded);
    }

    /// Reassembles row `index`.
    pub fn row(&self, index: usize) -> Option<LayerRow> {
        if index >= self.len() {
            return None;
        }
        Some(LayerRow {
            name: self.names[index].clone(),
            full_path: self.full_paths[index].clone(),
            color: self.colors[index],
            linetype: self.linetypes[index].clone(),
            material: self.materials[index].clone(),
            visible: self.visible[index],
            print_width: self.print_widths[index],
            print_color: self.print_colors[index],
            locked: self.locked[index],
            expanded: self.expanded[index],
        })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Clears every column.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl FromIterator<LayerRow> for LayerColumns {
    fn from_iter<I: IntoIterator<Item = LayerRow>>(iter: I) -> Self {
        let mut columns = Self::new();
        for row in iter {
            columns.push(row);
        }
        columns
    }
}
