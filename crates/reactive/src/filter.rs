//! Relevance filter for raw change events.
//!
//! `should_trigger` is a pure predicate: given an event and the
//! `FilterConfig` in effect when it arrived, it decides whether the event
//! counts toward a re-evaluation.
//!
//! # Modified events
//!
//! With every sub-field flag enabled the filter runs in coarse mode and any
//! Modified event is relevant. Disabling at least one sub-field switches to
//! fine-grained mode, where the event is relevant only if an enabled field
//! differs between the old and new layer states. When the host omits either
//! state no comparison is possible and the event is treated as relevant.

use layerwatch_core::{ChangeEvent, Layer, LayerEventKind, LayerField, LayerTableEvent};

/// Per-field mask for Modified events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModifiedFields {
    pub locked: bool,
    pub visible: bool,
    pub parent: bool,
    pub name: bool,
    pub color: bool,
}

impl ModifiedFields {
    /// Every field enabled (coarse mode).
    pub const ALL: ModifiedFields = ModifiedFields {
        locked: true,
        visible: true,
        parent: true,
        name: true,
        color: true,
    };

    /// No field enabled.
    pub const NONE: ModifiedFields = ModifiedFields {
        locked: false,
        visible: false,
        parent: false,
        name: false,
        color: false,
    };

    /// Returns true if `field` is enabled.
    pub fn contains(&self, field: LayerField) -> bool {
        match field {
            LayerField::Locked => self.locked,
            LayerField::Visible => self.visible,
            LayerField::Parent => self.parent,
            LayerField::Name => self.name,
            LayerField::Color => self.color,
        }
    }

    /// Returns a copy with `field` set to `enabled`.
    pub fn with(mut self, field: LayerField, enabled: bool) -> Self {
        match field {
            LayerField::Locked => self.locked = enabled,
            LayerField::Visible => self.visible = enabled,
            LayerField::Parent => self.parent = enabled,
            LayerField::Name => self.name = enabled,
            LayerField::Color => self.color = enabled,
        }
        self
    }

    /// Returns a mask with only the given fields enabled.
    pub fn only(fields: &[LayerField]) -> Self {
        fields
            .iter()
            .fold(Self::NONE, |mask, field| mask.with(*field, true))
    }

    /// Returns true if every field is enabled.
    #[inline]
    pub fn is_all(&self) -> bool {
        *self == Self::ALL
    }

    /// Iterates over the enabled fields.
    pub fn enabled(self) -> impl Iterator<Item = LayerField> {
        LayerField::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }

    /// Returns true if any enabled field differs between the two states.
    pub fn any_changed(&self, old: &Layer, new: &Layer) -> bool {
        self.enabled().any(|field| old.differs_in(field, new))
    }
}

impl Default for ModifiedFields {
    fn default() -> Self {
        Self::ALL
    }
}

/// Which event categories count as relevant.
///
/// A fresh value is supplied on every solve; the debouncer evaluates each
/// event against the value in effect when the event arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilterConfig {
    /// Added and Undeleted events.
    pub added: bool,
    pub deleted: bool,
    pub modified: bool,
    pub sorted: bool,
    /// Current layer changes.
    pub current: bool,
    /// Sub-field mask applied when `modified` is set.
    pub modified_fields: ModifiedFields,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            added: true,
            deleted: true,
            modified: true,
            sorted: false,
            current: false,
            modified_fields: ModifiedFields::ALL,
        }
    }
}

impl FilterConfig {
    /// A config accepting every layer table event.
    pub const fn all() -> Self {
        Self {
            added: true,
            deleted: true,
            modified: true,
            sorted: true,
            current: true,
            modified_fields: ModifiedFields::ALL,
        }
    }

    /// A config rejecting every layer table event.
    ///
    /// Lifecycle and unknown events are still relevant.
    pub const fn none() -> Self {
        Self {
            added: false,
            deleted: false,
            modified: false,
            sorted: false,
            current: false,
            modified_fields: ModifiedFields::NONE,
        }
    }

    pub fn with_added(mut self, enabled: bool) -> Self {
        self.added = enabled;
        self
    }

    pub fn with_deleted(mut self, enabled: bool) -> Self {
        self.deleted = enabled;
        self
    }

    pub fn with_modified(mut self, enabled: bool) -> Self {
        self.modified = enabled;
        self
    }

    pub fn with_sorted(mut self, enabled: bool) -> Self {
        self.sorted = enabled;
        self
    }

    pub fn with_current(mut self, enabled: bool) -> Self {
        self.current = enabled;
        self
    }

    /// Replaces the whole sub-field mask.
    pub fn with_modified_fields(mut self, fields: ModifiedFields) -> Self {
        self.modified_fields = fields;
        self
    }

    /// Enables or disables one sub-field.
    pub fn with_modified_field(mut self, field: LayerField, enabled: bool) -> Self {
        self.modified_fields = self.modified_fields.with(field, enabled);
        self
    }
}

/// Decides whether a raw event should count toward a re-evaluation.
pub fn should_trigger(event: &ChangeEvent, config: &FilterConfig) -> bool {
    match event {
        // Lifecycle events bypass the field-level filter.
        ChangeEvent::Document(_) => true,
        ChangeEvent::Layer(event) => layer_event_relevant(event, config),
    }
}

pub(crate) fn layer_event_relevant(event: &LayerTableEvent, config: &FilterConfig) -> bool {
    match event.kind {
        LayerEventKind::Added | LayerEventKind::Undeleted => config.added,
        LayerEventKind::Deleted => config.deleted,
        LayerEventKind::Sorted => config.sorted,
        LayerEventKind::Current => config.current,
        LayerEventKind::Modified => modified_relevant(event, config),
        LayerEventKind::Unknown(_) => true,
    }
}

fn modified_relevant(event: &LayerTableEvent, config: &FilterConfig) -> bool {
    if !config.modified {
        return false;
    }
    if config.modified_fields.is_all() {
        return true;
    }
    match (&event.old_state, &event.new_state) {
        (Some(old), Some(new)) => config.modified_fields.any_changed(old, new),
        // No states to compare: fall back to the coarse answer.
        _ => config.modified,
    }
}
