//! JSON codec for patch definitions.
//!
//! ```text
//! components:
//!   Spinner: 8a7c2c6b1f2e4b1f9d3a0e5c7b6a4d21
//! actions:
//!   addField:
//!     - component: Spinner
//!       name: speed
//!       value: '{{{ MonoBehaviour<Spinner>::rate }}}'
//!       default: 1
//!       conditions: {has: [Collider], equals: 0}
//!   deleteField:     [{component, name, conditions}]
//!   renameField:     [{component, name, newName, conditions}]
//!   modifyField:     [{component, name, newValue, default, conditions}]
//!   addComponent:    [{component: {type, unityFields, componentFields: [{name, value, default}]}, conditions}]
//!   deleteComponent: [{type, conditions}]
//! ```
//!
//! Every list is optional. Reference values are parsed while decoding.

use asset_ref::{AliasTable, ValueExpr, CLOSE_MARKER, OPEN_MARKER};
use serde_json::{json, Map, Value};

use crate::error::PatchError;
use crate::types::{
    empty_default, AddComponent, AddField, ComponentField, Conditions, DeleteComponent, DeleteField,
    ModifyField, NewComponent, Patch, PatchActions, RenameField,
};

// ── Helpers ───────────────────────────────────────────────────────────────

fn invalid(msg: impl Into<String>) -> PatchError {
    PatchError::InvalidPatch(msg.into())
}

fn as_object<'a>(v: &'a Value, what: &str) -> Result<&'a Map<String, Value>, PatchError> {
    v.as_object().ok_or_else(|| invalid(format!("{what} must be a mapping")))
}

fn required_str(obj: &Map<String, Value>, key: &str, action: &str) -> Result<String, PatchError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("{action} requires '{key}'")))
}

fn required<'a>(obj: &'a Map<String, Value>, key: &str, action: &str) -> Result<&'a Value, PatchError> {
    obj.get(key).ok_or_else(|| invalid(format!("{action} requires '{key}'")))
}

fn default_value(obj: &Map<String, Value>) -> Value {
    obj.get("default").cloned().unwrap_or_else(empty_default)
}

/// Items of an optional list. Missing and null both mean empty.
fn list<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], PatchError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(invalid(format!("'{key}' must be a list"))),
    }
}

fn aliases(v: &Value) -> Result<Vec<String>, PatchError> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::String(alias) => Ok(vec![alias.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid("component aliases must be strings"))
            })
            .collect(),
        _ => Err(invalid("component aliases must be a list")),
    }
}

fn decode_conditions(obj: &Map<String, Value>) -> Result<Conditions, PatchError> {
    let Some(v) = obj.get("conditions").filter(|v| !v.is_null()) else {
        return Ok(Conditions::default());
    };
    let c = as_object(v, "conditions")?;
    Ok(Conditions {
        has: c.get("has").map(aliases).transpose()?.unwrap_or_default(),
        does_not_have: c.get("doesNotHave").map(aliases).transpose()?.unwrap_or_default(),
        equals: c.get("equals").cloned(),
        not_equals: c.get("notEquals").cloned(),
    })
}

fn decode_components(v: Option<&Value>) -> Result<AliasTable, PatchError> {
    let mut table = AliasTable::new();
    let Some(v) = v.filter(|v| !v.is_null()) else {
        return Ok(table);
    };
    for (alias, guid) in as_object(v, "components")? {
        let guid = match guid {
            Value::String(guid) => guid.clone(),
            Value::Number(guid) if guid.is_u64() => guid.to_string(),
            _ => return Err(invalid(format!("guid of component alias {alias} must be a string"))),
        };
        table.insert(alias.clone(), guid);
    }
    Ok(table)
}

// ── Actions ───────────────────────────────────────────────────────────────

fn decode_add_field(v: &Value) -> Result<AddField, PatchError> {
    let obj = as_object(v, "addField action")?;
    Ok(AddField {
        component: required_str(obj, "component", "addField")?,
        name: required_str(obj, "name", "addField")?,
        value: ValueExpr::parse(required(obj, "value", "addField")?)?,
        default: default_value(obj),
        conditions: decode_conditions(obj)?,
    })
}

fn decode_delete_field(v: &Value) -> Result<DeleteField, PatchError> {
    let obj = as_object(v, "deleteField action")?;
    Ok(DeleteField {
        component: required_str(obj, "component", "deleteField")?,
        name: required_str(obj, "name", "deleteField")?,
        conditions: decode_conditions(obj)?,
    })
}

fn decode_rename_field(v: &Value) -> Result<RenameField, PatchError> {
    let obj = as_object(v, "renameField action")?;
    Ok(RenameField {
        component: required_str(obj, "component", "renameField")?,
        name: required_str(obj, "name", "renameField")?,
        new_name: required_str(obj, "newName", "renameField")?,
        conditions: decode_conditions(obj)?,
    })
}

fn decode_modify_field(v: &Value) -> Result<ModifyField, PatchError> {
    let obj = as_object(v, "modifyField action")?;
    Ok(ModifyField {
        component: required_str(obj, "component", "modifyField")?,
        name: required_str(obj, "name", "modifyField")?,
        new_value: ValueExpr::parse(required(obj, "newValue", "modifyField")?)?,
        default: default_value(obj),
        conditions: decode_conditions(obj)?,
    })
}

fn decode_component_field(v: &Value) -> Result<ComponentField, PatchError> {
    let obj = as_object(v, "component field")?;
    Ok(ComponentField {
        name: required_str(obj, "name", "componentFields entry")?,
        value: ValueExpr::parse(required(obj, "value", "componentFields entry")?)?,
        default: default_value(obj),
    })
}

fn decode_add_component(v: &Value) -> Result<AddComponent, PatchError> {
    let obj = as_object(v, "addComponent action")?;
    let component = as_object(required(obj, "component", "addComponent")?, "addComponent component")?;
    let unity_fields = match component.get("unityFields") {
        None | Some(Value::Null) => Map::new(),
        Some(fields) => as_object(fields, "unityFields")?.clone(),
    };
    Ok(AddComponent {
        component: NewComponent {
            type_alias: required_str(component, "type", "addComponent component")?,
            unity_fields,
            fields: list(component, "componentFields")?
                .iter()
                .map(decode_component_field)
                .collect::<Result<_, _>>()?,
        },
        conditions: decode_conditions(obj)?,
    })
}

fn decode_delete_component(v: &Value) -> Result<DeleteComponent, PatchError> {
    let obj = as_object(v, "deleteComponent action")?;
    let component_type = obj
        .get("type")
        .or_else(|| obj.get("component"))
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("deleteComponent requires 'type'"))?
        .to_string();
    Ok(DeleteComponent {
        component_type,
        conditions: decode_conditions(obj)?,
    })
}

fn decode_list<T>(
    actions: &Map<String, Value>,
    key: &str,
    decode: impl Fn(&Value) -> Result<T, PatchError>,
) -> Result<Vec<T>, PatchError> {
    list(actions, key)?.iter().map(decode).collect()
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Decode one patch from its JSON form.
pub fn from_json(v: &Value) -> Result<Patch, PatchError> {
    let obj = as_object(v, "patch")?;
    let components = decode_components(obj.get("components"))?;
    let actions = match obj.get("actions") {
        None | Some(Value::Null) => PatchActions::default(),
        Some(actions) => {
            let actions = as_object(actions, "actions")?;
            PatchActions {
                add_field: decode_list(actions, "addField", decode_add_field)?,
                delete_field: decode_list(actions, "deleteField", decode_delete_field)?,
                rename_field: decode_list(actions, "renameField", decode_rename_field)?,
                modify_field: decode_list(actions, "modifyField", decode_modify_field)?,
                add_component: decode_list(actions, "addComponent", decode_add_component)?,
                delete_component: decode_list(actions, "deleteComponent", decode_delete_component)?,
            }
        }
    };
    Ok(Patch { components, actions })
}

impl Patch {
    pub fn from_json(v: &Value) -> Result<Self, PatchError> {
        from_json(v)
    }

    pub fn to_json(&self) -> Value {
        to_json(self)
    }
}

// ── Serialization ─────────────────────────────────────────────────────────

fn encode_expr(expr: &ValueExpr) -> Value {
    match expr {
        ValueExpr::Literal(value) => value.clone(),
        ValueExpr::Reference(chain) => Value::String(format!("{OPEN_MARKER} {chain} {CLOSE_MARKER}")),
    }
}

fn encode_conditions(c: &Conditions) -> Value {
    let mut m = Map::new();
    if !c.has.is_empty() {
        m.insert("has".into(), json!(c.has));
    }
    if !c.does_not_have.is_empty() {
        m.insert("doesNotHave".into(), json!(c.does_not_have));
    }
    if let Some(v) = &c.equals {
        m.insert("equals".into(), v.clone());
    }
    if let Some(v) = &c.not_equals {
        m.insert("notEquals".into(), v.clone());
    }
    Value::Object(m)
}

fn with_conditions(mut action: Value, c: &Conditions) -> Value {
    if !c.is_empty() {
        if let Value::Object(m) = &mut action {
            m.insert("conditions".into(), encode_conditions(c));
        }
    }
    action
}

/// Encode a patch into the form read by [`from_json`].
pub fn to_json(patch: &Patch) -> Value {
    let components: Map<String, Value> = patch
        .components
        .iter()
        .map(|(alias, guid)| (alias.to_string(), json!(guid)))
        .collect();
    let a = &patch.actions;
    json!({
        "components": components,
        "actions": {
            "addField": a.add_field.iter().map(|f| with_conditions(json!({
                "component": f.component,
                "name": f.name,
                "value": encode_expr(&f.value),
                "default": f.default
            }), &f.conditions)).collect::<Vec<_>>(),
            "deleteField": a.delete_field.iter().map(|f| with_conditions(json!({
                "component": f.component,
                "name": f.name
            }), &f.conditions)).collect::<Vec<_>>(),
            "renameField": a.rename_field.iter().map(|f| with_conditions(json!({
                "component": f.component,
                "name": f.name,
                "newName": f.new_name
            }), &f.conditions)).collect::<Vec<_>>(),
            "modifyField": a.modify_field.iter().map(|f| with_conditions(json!({
                "component": f.component,
                "name": f.name,
                "newValue": encode_expr(&f.new_value),
                "default": f.default
            }), &f.conditions)).collect::<Vec<_>>(),
            "addComponent": a.add_component.iter().map(|c| with_conditions(json!({
                "component": {
                    "type": c.component.type_alias,
                    "unityFields": c.component.unity_fields,
                    "componentFields": c.component.fields.iter().map(|f| json!({
                        "name": f.name,
                        "value": encode_expr(&f.value),
                        "default": f.default
                    })).collect::<Vec<_>>()
                }
            }), &c.conditions)).collect::<Vec<_>>(),
            "deleteComponent": a.delete_component.iter().map(|c| with_conditions(json!({
                "type": c.component_type
            }), &c.conditions)).collect::<Vec<_>>()
        }
    })
}
