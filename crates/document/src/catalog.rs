//! Name tables for linetypes and materials.

use alloc::string::String;
use alloc::vec::Vec;

/// An append-only table of names addressed by index.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    names: Vec<String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` and returns its index. An existing name keeps its index.
    pub fn add(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(index) = self.find(&name) {
            return index;
        }
        self.names.push(name);
        self.names.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the index of `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
