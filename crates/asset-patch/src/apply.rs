//! Patch action engine.
//!
//! Records are matched and conditions evaluated against the original
//! document; edits land in the working copy. References are resolved
//! against the original too, so the outcome of a patch never depends on
//! the order of records within it.

use asset_graph::{fields, null_reference, to_reference, Document, ObjectId, ObjectRecord, RecordKind};
use asset_ref::{Resolver, TemplateStore};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::conditions::Guard;
use crate::error::PatchError;
use crate::types::{
    AddComponent, AddField, DeleteComponent, DeleteField, ModifyField, NewComponent, Patch, RenameField,
};

/// Origin tag of scripted component records.
pub const MONO_BEHAVIOUR_TAG: &str = "!u!114";
/// `fileID` of the script reference of a scripted component.
pub const SCRIPT_FILE_ID: i64 = 11_500_000;
/// `type` of the script reference of a scripted component.
pub const SCRIPT_ASSET_TYPE: i64 = 3;

// ── Matching ──────────────────────────────────────────────────────────────

/// Scripted components whose script type is `guid`.
fn scripted<'d>(doc: &'d Document, guid: &'d str) -> impl Iterator<Item = (ObjectId, &'d ObjectRecord)> + 'd {
    doc.iter().filter(move |(_, record)| {
        record.kind() == &RecordKind::MonoBehaviour && record.script_guid() == Some(guid)
    })
}

/// GameObjects carrying a component list.
fn containers(doc: &Document) -> impl Iterator<Item = (ObjectId, &ObjectRecord)> {
    doc.iter()
        .filter(|(_, record)| record.kind().is_game_object() && record.component_ids().is_some())
}

fn owner_of(component: &ObjectRecord) -> ObjectId {
    component.owner().unwrap_or(ObjectId::NULL)
}

fn working_record<'w>(working: &'w mut Document, id: ObjectId, action: &str) -> Option<&'w mut ObjectRecord> {
    let record = working.get_mut(id);
    if record.is_none() {
        warn!(object = %id, action, "matched record is gone from the working copy, skipping");
    }
    record
}

// ── Field actions ─────────────────────────────────────────────────────────

fn add_field(
    original: &Document,
    working: &mut Document,
    patch: &Patch,
    resolver: &Resolver<'_>,
    action: &AddField,
) -> Result<usize, PatchError> {
    let guid = patch.components.resolve(&action.component)?;
    let guard = Guard::new(&action.conditions, &patch.components)?;
    let mut edits = 0;
    for (id, component) in scripted(original, guid) {
        let owner = owner_of(component);
        if !guard.components_hold(original, owner) {
            continue;
        }
        let value = resolver.resolve(owner, &action.value, &action.default)?;
        let Some(target) = working_record(working, id, "addField") else {
            continue;
        };
        target.insert(action.name.clone(), value);
        debug!(object = %id, field = %action.name, "added field");
        edits += 1;
    }
    Ok(edits)
}

fn delete_field(original: &Document, working: &mut Document, patch: &Patch, action: &DeleteField) -> Result<usize, PatchError> {
    let guid = patch.components.resolve(&action.component)?;
    let guard = Guard::new(&action.conditions, &patch.components)?;
    let mut edits = 0;
    for (id, component) in scripted(original, guid) {
        if !guard.components_hold(original, owner_of(component)) || !guard.value_holds(component.get(&action.name)) {
            continue;
        }
        let Some(target) = working_record(working, id, "deleteField") else {
            continue;
        };
        if target.remove(&action.name).is_some() {
            debug!(object = %id, field = %action.name, "deleted field");
            edits += 1;
        }
    }
    Ok(edits)
}

fn rename_field(original: &Document, working: &mut Document, patch: &Patch, action: &RenameField) -> Result<usize, PatchError> {
    let guid = patch.components.resolve(&action.component)?;
    let guard = Guard::new(&action.conditions, &patch.components)?;
    let mut edits = 0;
    for (id, component) in scripted(original, guid) {
        if !guard.components_hold(original, owner_of(component)) {
            continue;
        }
        let Some(target) = working_record(working, id, "renameField") else {
            continue;
        };
        // Read from the working copy so renames compose across patches.
        if let Some(value) = target.remove(&action.name) {
            target.insert(action.new_name.clone(), value);
            debug!(object = %id, from = %action.name, to = %action.new_name, "renamed field");
            edits += 1;
        }
    }
    Ok(edits)
}

fn modify_field(
    original: &Document,
    working: &mut Document,
    patch: &Patch,
    resolver: &Resolver<'_>,
    action: &ModifyField,
) -> Result<usize, PatchError> {
    let guid = patch.components.resolve(&action.component)?;
    let guard = Guard::new(&action.conditions, &patch.components)?;
    let mut edits = 0;
    for (id, component) in scripted(original, guid) {
        let owner = owner_of(component);
        if !guard.components_hold(original, owner) || !guard.value_holds(component.get(&action.name)) {
            continue;
        }
        let value = resolver.resolve(owner, &action.new_value, &action.default)?;
        let Some(target) = working_record(working, id, "modifyField") else {
            continue;
        };
        target.insert(action.name.clone(), value);
        debug!(object = %id, field = %action.name, "modified field");
        edits += 1;
    }
    Ok(edits)
}

// ── Component actions ─────────────────────────────────────────────────────

/// Engine bookkeeping fields of a new scripted component, in the order
/// the engine writes them.
fn engine_fields(component: &NewComponent, owner: ObjectId, guid: &str) -> Map<String, Value> {
    let overrides = &component.unity_fields;
    let field = |name: &str, default: Value| overrides.get(name).cloned().unwrap_or(default);

    let mut body = Map::new();
    body.insert(fields::OBJECT_HIDE_FLAGS.into(), field(fields::OBJECT_HIDE_FLAGS, json!(0)));
    body.insert(
        fields::CORRESPONDING_SOURCE_OBJECT.into(),
        field(fields::CORRESPONDING_SOURCE_OBJECT, null_reference()),
    );
    body.insert(fields::PREFAB_INSTANCE.into(), field(fields::PREFAB_INSTANCE, null_reference()));
    body.insert(fields::PREFAB_ASSET.into(), field(fields::PREFAB_ASSET, null_reference()));
    body.insert(fields::GAME_OBJECT.into(), to_reference(owner));
    body.insert(fields::ENABLED.into(), field(fields::ENABLED, json!(1)));
    body.insert(fields::EDITOR_HIDE_FLAGS.into(), field(fields::EDITOR_HIDE_FLAGS, json!(0)));
    body.insert(fields::SCRIPT.into(), script_reference(guid));
    body.insert(fields::NAME.into(), field(fields::NAME, json!("")));
    body.insert(
        fields::EDITOR_CLASS_IDENTIFIER.into(),
        field(fields::EDITOR_CLASS_IDENTIFIER, json!("")),
    );
    body
}

fn script_reference(guid: &str) -> Value {
    let mut script = Map::new();
    script.insert(fields::FILE_ID.into(), json!(SCRIPT_FILE_ID));
    script.insert(fields::GUID.into(), json!(guid));
    script.insert("type".into(), json!(SCRIPT_ASSET_TYPE));
    Value::Object(script)
}

fn add_component(
    original: &Document,
    working: &mut Document,
    patch: &Patch,
    resolver: &Resolver<'_>,
    action: &AddComponent,
) -> Result<usize, PatchError> {
    let guid = patch.components.resolve(&action.component.type_alias)?;
    let guard = Guard::new(&action.conditions, &patch.components)?;
    let mut edits = 0;
    for (owner, _) in containers(original) {
        if !guard.components_hold(original, owner) {
            continue;
        }
        let mut body = engine_fields(&action.component, owner, guid);
        for field in &action.component.fields {
            let value = resolver.resolve(owner, &field.value, &field.default)?;
            body.insert(field.name.clone(), value);
        }
        if working_record(working, owner, "addComponent").is_none() {
            continue;
        }

        // The working copy's high-water mark covers components added and
        // deleted by earlier patches.
        let id = working.mint_id()?;
        working.insert(id, ObjectRecord::new(RecordKind::MonoBehaviour, body).with_tag(MONO_BEHAVIOUR_TAG));
        let listed = working.get_mut(owner).is_some_and(|object| object.push_component(id));
        if !listed {
            warn!(object = %owner, component = %id, "owner has no component list in the working copy");
        }
        debug!(object = %owner, component = %id, component_type = %action.component.type_alias, "added component");
        edits += 1;
    }
    Ok(edits)
}

fn delete_component(original: &Document, working: &mut Document, patch: &Patch, action: &DeleteComponent) -> Result<usize, PatchError> {
    let guid = patch.components.resolve(&action.component_type)?;
    let guard = Guard::new(&action.conditions, &patch.components)?;
    let mut edits = 0;
    for (owner, container) in containers(original) {
        if !guard.components_hold(original, owner) {
            continue;
        }
        for id in container.component_ids().unwrap_or_default() {
            let matches = original
                .get(id)
                .is_some_and(|c| c.kind() == &RecordKind::MonoBehaviour && c.script_guid() == Some(guid));
            if !matches {
                continue;
            }
            if working.remove(id).is_none() {
                continue;
            }
            if let Some(object) = working_record(working, owner, "deleteComponent") {
                object.remove_component(id);
            }
            debug!(object = %owner, component = %id, component_type = %action.component_type, "deleted component");
            edits += 1;
        }
    }
    Ok(edits)
}

// ── Patch ─────────────────────────────────────────────────────────────────

/// Apply every action of `patch`.
///
/// Actions run list by list: addField, deleteField, renameField,
/// modifyField, addComponent, deleteComponent. Returns the number of
/// edits made to `working`. The first error aborts the patch; edits made
/// before it stay in `working`.
pub fn apply_patch(
    original: &Document,
    working: &mut Document,
    patch: &Patch,
    templates: Option<TemplateStore<'_>>,
) -> Result<usize, PatchError> {
    let mut resolver = Resolver::new(original, &patch.components);
    if let Some(templates) = templates {
        resolver = resolver.with_templates(templates);
    }
    let actions = &patch.actions;
    let mut edits = 0;
    for action in &actions.add_field {
        edits += add_field(original, working, patch, &resolver, action)?;
    }
    for action in &actions.delete_field {
        edits += delete_field(original, working, patch, action)?;
    }
    for action in &actions.rename_field {
        edits += rename_field(original, working, patch, action)?;
    }
    for action in &actions.modify_field {
        edits += modify_field(original, working, patch, &resolver, action)?;
    }
    for action in &actions.add_component {
        edits += add_component(original, working, patch, &resolver, action)?;
    }
    for action in &actions.delete_component {
        edits += delete_component(original, working, patch, action)?;
    }
    Ok(edits)
}

/// Apply `patch` to a copy of `doc`.
pub fn patch_copy(doc: &Document, patch: &Patch, templates: Option<TemplateStore<'_>>) -> Result<Document, PatchError> {
    let mut working = doc.clone();
    apply_patch(doc, &mut working, patch, templates)?;
    Ok(working)
}
