//! Identifier and field types shared across layerwatch.

use core::fmt;

/// Identifier of a document registered with the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u32);

impl DocumentId {
    /// Creates a document id from its raw value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Stable identifier of a layer within its table.
///
/// Unlike the table index, the id survives sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    /// Creates a layer id from its raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Layer sub-fields tracked by the fine-grained Modified filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// Locked flag
    Locked,
    /// Visibility flag
    Visible,
    /// Parent layer
    Parent,
    /// Layer name
    Name,
    /// Display color
    Color,
}

impl LayerField {
    /// Every tracked field, in filter evaluation order.
    pub const ALL: [LayerField; 5] = [
        LayerField::Locked,
        LayerField::Visible,
        LayerField::Parent,
        LayerField::Name,
        LayerField::Color,
    ];

    /// Returns the field name as shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            LayerField::Locked => "Locked",
            LayerField::Visible => "Visible",
            LayerField::Parent => "Parent",
            LayerField::Name => "Name",
            LayerField::Color => "Color",
        }
    }
}
