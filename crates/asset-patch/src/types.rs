//! Patch definitions.
//!
//! A patch pairs an alias table with six ordered action lists. Actions are
//! applied list by list, in the order the lists are declared here.

use asset_ref::{AliasTable, ValueExpr};
use serde_json::{Map, Value};

// ── Conditions ────────────────────────────────────────────────────────────

/// Guard attached to an action.
///
/// `has` and `does_not_have` name component aliases that the owner object
/// must (not) carry. `equals` and `not_equals` compare the current value
/// of the targeted field; they are only consulted by `deleteField` and
/// `modifyField`. An empty block always passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    pub has: Vec<String>,
    pub does_not_have: Vec<String>,
    pub equals: Option<Value>,
    pub not_equals: Option<Value>,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.has.is_empty()
            && self.does_not_have.is_empty()
            && self.equals.is_none()
            && self.not_equals.is_none()
    }
}

// ── Field actions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AddField {
    pub component: String,
    pub name: String,
    pub value: ValueExpr,
    pub default: Value,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteField {
    pub component: String,
    pub name: String,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameField {
    pub component: String,
    pub name: String,
    pub new_name: String,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifyField {
    pub component: String,
    pub name: String,
    pub new_value: ValueExpr,
    pub default: Value,
    pub conditions: Conditions,
}

// ── Component actions ─────────────────────────────────────────────────────

/// Author-declared field of a new component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentField {
    pub name: String,
    pub value: ValueExpr,
    pub default: Value,
}

/// Template for the component record created by [`AddComponent`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewComponent {
    /// Alias of the script type.
    pub type_alias: String,
    /// Overrides for the engine bookkeeping fields.
    pub unity_fields: Map<String, Value>,
    pub fields: Vec<ComponentField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddComponent {
    pub component: NewComponent,
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteComponent {
    pub component_type: String,
    pub conditions: Conditions,
}

// ── Patch ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchActions {
    pub add_field: Vec<AddField>,
    pub delete_field: Vec<DeleteField>,
    pub rename_field: Vec<RenameField>,
    pub modify_field: Vec<ModifyField>,
    pub add_component: Vec<AddComponent>,
    pub delete_component: Vec<DeleteComponent>,
}

impl PatchActions {
    /// Total number of actions across all lists.
    pub fn len(&self) -> usize {
        self.add_field.len()
            + self.delete_field.len()
            + self.rename_field.len()
            + self.modify_field.len()
            + self.add_component.len()
            + self.delete_component.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A declarative rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub components: AliasTable,
    pub actions: PatchActions,
}

impl Patch {
    pub fn new(components: AliasTable) -> Self {
        Self { components, actions: PatchActions::default() }
    }
}

/// Value written when an action declares no default.
pub fn empty_default() -> Value {
    Value::String(String::new())
}
