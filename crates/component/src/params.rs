//! Parameter registration for the layer table watcher.
//!
//! Inputs are single booleans. Outputs are parallel lists, one entry per live
//! layer.

use layerwatch_core::LayerField;
use layerwatch_reactive::{FilterConfig, ModifiedFields};

/// Value type carried by a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Boolean,
    Text,
    Colour,
    Number,
}

/// Whether a parameter carries one value or a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Item,
    List,
}

/// One registered input or output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub nickname: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub access: Access,
    /// Default for boolean inputs, `None` for outputs.
    pub default: Option<bool>,
}

impl ParamDescriptor {
    const fn input(
        name: &'static str,
        nickname: &'static str,
        description: &'static str,
        default: bool,
    ) -> Self {
        Self {
            name,
            nickname,
            description,
            kind: ParamKind::Boolean,
            access: Access::Item,
            default: Some(default),
        }
    }

    const fn output(
        name: &'static str,
        nickname: &'static str,
        description: &'static str,
        kind: ParamKind,
    ) -> Self {
        Self {
            name,
            nickname,
            description,
            kind,
            access: Access::List,
            default: None,
        }
    }
}

/// Component identity as shown in the host's component palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentInfo {
    pub name: &'static str,
    pub nickname: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub subcategory: &'static str,
    pub guid: &'static str,
}

pub const COMPONENT: ComponentInfo = ComponentInfo {
    name: "LayerTableWatcher",
    nickname: "LayerTableWatcher",
    description: "Gets the list of layers in the active document per specified events",
    category: "KieranTimberlake",
    subcategory: "Document Info",
    guid: "30954f8f-bb74-4705-9c6a-50f1d672832e",
};

pub const INPUT_UPDATE: usize = 0;
pub const INPUT_AUTO_UPDATE: usize = 1;
pub const INPUT_ADDED: usize = 2;
pub const INPUT_DELETED: usize = 3;
pub const INPUT_MODIFIED: usize = 4;
pub const INPUT_SORTED: usize = 5;
pub const INPUT_CURRENT: usize = 6;
/// First of the five Modified sub-field inputs, in `LayerField::ALL` order.
pub const INPUT_MODIFIED_FIELDS: usize = 7;

pub const INPUTS: [ParamDescriptor; 12] = [
    ParamDescriptor::input(
        "Update",
        "U",
        "Set this value to true to update the layer table.",
        false,
    ),
    ParamDescriptor::input(
        "Auto-Update",
        "AU",
        "If this value is set to true, the component will listen for changes to the layer \
         table based on the toggled events, and automatically update each time something \
         changes. Use with caution - you can create an infinite loop if you create layers \
         downstream based on outputs from this component.",
        false,
    ),
    ParamDescriptor::input("Added", "EA", "Trigger on Added event.", true),
    ParamDescriptor::input("Deleted", "ED", "Trigger on Deleted event.", true),
    ParamDescriptor::input("Modified", "EM", "Trigger on Modified event.", true),
    ParamDescriptor::input("Sorted", "ES", "Trigger on Sorted event.", false),
    ParamDescriptor::input("Current", "EC", "Trigger on Current layer change event.", false),
    ParamDescriptor::input(
        "Locked",
        "ML",
        "With Modified, trigger when a layer is locked or unlocked.",
        true,
    ),
    ParamDescriptor::input(
        "Visible",
        "MV",
        "With Modified, trigger when a layer is shown or hidden.",
        true,
    ),
    ParamDescriptor::input(
        "Parent",
        "MP",
        "With Modified, trigger when a layer is moved to another parent.",
        true,
    ),
    ParamDescriptor::input(
        "Name",
        "MN",
        "With Modified, trigger when a layer is renamed.",
        true,
    ),
    ParamDescriptor::input(
        "Color",
        "MC",
        "With Modified, trigger when a layer color changes.",
        true,
    ),
];

pub const OUTPUTS: [ParamDescriptor; 10] = [
    ParamDescriptor::output(
        "Layers",
        "L",
        "The list of layer names in the active document.",
        ParamKind::Text,
    ),
    ParamDescriptor::output(
        "Full Layer Paths",
        "LF",
        "The list of layer names in the document, including nesting information.",
        ParamKind::Text,
    ),
    ParamDescriptor::output(
        "Layer Colors",
        "C",
        "The colors of the document Layers.",
        ParamKind::Colour,
    ),
    ParamDescriptor::output(
        "Linetypes",
        "LT",
        "The list of linetypes associated with the document layers.",
        ParamKind::Text,
    ),
    ParamDescriptor::output(
        "Material Names",
        "M",
        "The list of material names associated with the document layers.",
        ParamKind::Text,
    ),
    ParamDescriptor::output("Visible", "V", "True if layer is visible.", ParamKind::Boolean),
    ParamDescriptor::output(
        "Print Width",
        "PW",
        "The print widths associated with the document layers.",
        ParamKind::Number,
    ),
    ParamDescriptor::output(
        "Print Color",
        "PC",
        "The print color of the layer.",
        ParamKind::Colour,
    ),
    ParamDescriptor::output("Locked", "LL", "True if layer is locked.", ParamKind::Boolean),
    ParamDescriptor::output("Expanded", "LE", "True if layer is expanded.", ParamKind::Boolean),
];

/// Finds an input index by nickname.
pub fn input_index(nickname: &str) -> Option<usize> {
    INPUTS.iter().position(|param| param.nickname == nickname)
}

/// Values read from the inputs on one solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveInputs {
    pub update: bool,
    pub auto_update: bool,
    pub filter: FilterConfig,
}

impl Default for SolveInputs {
    fn default() -> Self {
        Self {
            update: false,
            auto_update: false,
            filter: FilterConfig::default(),
        }
    }
}

impl SolveInputs {
    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Builds inputs from raw values in `INPUTS` order.
    ///
    /// Missing trailing values take their registered defaults.
    pub fn from_values(values: &[bool]) -> Self {
        let value = |index: usize| {
            values
                .get(index)
                .copied()
                .or(INPUTS[index].default)
                .unwrap_or(false)
        };

        let mut fields = ModifiedFields::ALL;
        for (offset, field) in LayerField::ALL.into_iter().enumerate() {
            fields = fields.with(field, value(INPUT_MODIFIED_FIELDS + offset));
        }

        Self {
            update: value(INPUT_UPDATE),
            auto_update: value(INPUT_AUTO_UPDATE),
            filter: FilterConfig {
                added: value(INPUT_ADDED),
                deleted: value(INPUT_DELETED),
                modified: value(INPUT_MODIFIED),
                sorted: value(INPUT_SORTED),
                current: value(INPUT_CURRENT),
                modified_fields: fields,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_nicknames_are_unique() {
        let mut nicknames: Vec<_> = INPUTS.iter().map(|p| p.nickname).collect();
        nicknames.sort_unstable();
        nicknames.dedup();
        assert_eq!(nicknames.len(), INPUTS.len());

        let mut nicknames: Vec<_> = OUTPUTS.iter().map(|p| p.nickname).collect();
        nicknames.sort_unstable();
        nicknames.dedup();
        assert_eq!(nicknames.len(), OUTPUTS.len());
    }

    #[test]
    fn test_defaults_match_registration() {
        assert_eq!(SolveInputs::from_values(&[]), SolveInputs::default());
    }

    #[test]
    fn test_sub_field_inputs_follow_field_order() {
        for (offset, field) in LayerField::ALL.into_iter().enumerate() {
            assert_eq!(INPUTS[INPUT_MODIFIED_FIELDS + offset].name, field.label());
        }
    }

    #[test]
    fn test_from_values() {
        let mut values = [false; 12];
        values[INPUT_AUTO_UPDATE] = true;
        values[INPUT_MODIFIED] = true;
        values[INPUT_MODIFIED_FIELDS] = true; // Locked

        let inputs = SolveInputs::from_values(&values);
        assert!(inputs.auto_update);
        assert!(!inputs.update);
        assert!(!inputs.filter.added);
        assert!(inputs.filter.modified);
        assert_eq!(
            inputs.filter.modified_fields,
            ModifiedFields::only(&[LayerField::Locked])
        );
    }

    #[test]
    fn test_input_index() {
        assert_eq!(input_index("AU"), Some(INPUT_AUTO_UPDATE));
        assert_eq!(input_index("MC"), Some(INPUT_MODIFIED_FIELDS + 4));
        assert_eq!(input_index("??"), None);
    }

    #[test]
    fn test_outputs_are_lists() {
        assert!(OUTPUTS.iter().all(|p| p.access == Access::List && p.default.is_none()));
        assert!(INPUTS.iter().all(|p| p.kind == ParamKind::Boolean));
    }
}
