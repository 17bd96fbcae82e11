mod common;

use std::fs;
use std::path::Path;

use asset_graph::codec::json::{from_json, to_json};
use asset_graph::{Document, GraphError, JsonDocumentLoader, ObjectId};
use asset_ref::{ResolveError, Resolver, TemplateIndex, TemplateStore};
use common::{aliases, door_template, load_door, scene, DOOR};
use serde_json::{json, Value};

fn door_index() -> TemplateIndex {
    let mut index = TemplateIndex::new();
    index.insert(DOOR, "Assets/Door.prefab");
    index
}

fn resolve_with(index: &TemplateIndex, start: i64, raw: &str) -> Result<Value, ResolveError> {
    let doc = scene();
    let aliases = aliases();
    Resolver::new(&doc, &aliases)
        .with_templates(TemplateStore::new(index, &load_door))
        .resolve_value(ObjectId(start), &json!(raw), &json!(""))
}

#[test]
fn fields_missing_on_the_instance_come_from_the_template() {
    let index = door_index();
    assert_eq!(resolve_with(&index, 20, "{{{ GameObject::m_Name }}}").unwrap(), json!("Door"));
    assert_eq!(resolve_with(&index, 20, "{{{ GameObject::m_Layer }}}").unwrap(), json!(5));
}

#[test]
fn instance_overrides_win_over_the_template() {
    let index = door_index();
    assert_eq!(
        resolve_with(&index, 20, "{{{ GameObject::m_PrefabInstance }}}").unwrap(),
        json!({"fileID": 30})
    );
    // Added components are found before the template is consulted.
    assert_eq!(resolve_with(&index, 20, "{{{ MonoBehaviour<Foo>::speed }}}").unwrap(), json!(7));
}

#[test]
fn instance_bodies_find_components_by_back_reference() {
    let doc = scene();
    let aliases = aliases();
    let index = door_index();
    let untouched = |path: &Path| -> Result<Document, GraphError> {
        panic!("template {} should not be loaded", path.display())
    };
    let resolver = Resolver::new(&doc, &aliases).with_templates(TemplateStore::new(&index, &untouched));

    let speed = resolver.resolve_value(ObjectId(20), &json!("{{{ GameObject::MonoBehaviour<Foo>::speed }}}"), &json!(""));
    assert_eq!(speed.unwrap(), json!(7));
    let component = resolver.resolve_value(ObjectId(20), &json!("{{{ GameObject::MonoBehaviour<Foo> }}}"), &json!(""));
    assert_eq!(component.unwrap(), json!({"fileID": 21}));
}

#[test]
fn fields_missing_everywhere() {
    let index = door_index();
    match resolve_with(&index, 20, "{{{ Light::m_Intensity }}}") {
        Err(ResolveError::TemplateFieldNotFound { field, object, template }) => {
            assert_eq!(field, "Light");
            assert_eq!(object, ObjectId(100));
            assert_eq!(template, Path::new("Assets/Door.prefab"));
        }
        other => panic!("expected TemplateFieldNotFound, got {other:?}"),
    }
}

#[test]
fn references_inside_templates_are_not_followed() {
    let index = door_index();
    assert!(matches!(
        resolve_with(&index, 20, "{{{ GameObject::m_Icon::m_Name }}}"),
        Err(ResolveError::NotImplemented(_))
    ));
}

#[test]
fn template_lookup_requires_an_indexed_template() {
    let doc = scene();
    let aliases = aliases();
    assert!(matches!(
        Resolver::new(&doc, &aliases).resolve_value(ObjectId(20), &json!("{{{ GameObject::m_Name }}}"), &json!("")),
        Err(ResolveError::NotImplemented(_))
    ));
    assert!(matches!(
        resolve_with(&TemplateIndex::new(), 20, "{{{ GameObject::m_Name }}}"),
        Err(ResolveError::NotImplemented(_))
    ));
}

#[test]
fn loader_failures_are_reported() {
    let mut index = TemplateIndex::new();
    index.insert(DOOR, "Assets/Elsewhere.prefab");
    match resolve_with(&index, 20, "{{{ GameObject::m_Name }}}") {
        Err(ResolveError::TemplateLoad { path, source: GraphError::Decode { .. } }) => {
            assert_eq!(path, Path::new("Assets/Elsewhere.prefab"));
        }
        other => panic!("expected TemplateLoad, got {other:?}"),
    }
}

#[test]
fn nested_templates_are_not_searched() {
    let nested = |_: &Path| -> Result<Document, GraphError> {
        from_json(&json!({
            "fileID_100": {"GameObject": {
                "m_CorrespondingSourceObject": {"fileID": 900, "guid": "beef", "type": 3},
                "m_PrefabInstance": {"fileID": 5},
                "m_PrefabAsset": {"fileID": 0}
            }},
            "fileID_5": {"PrefabInstance": {
                "m_SourcePrefab": {"fileID": 100100000, "guid": "beef", "type": 3}
            }}
        }))
    };
    let doc = scene();
    let aliases = aliases();
    let index = door_index();
    let result = Resolver::new(&doc, &aliases)
        .with_templates(TemplateStore::new(&index, &nested))
        .resolve_value(ObjectId(20), &json!("{{{ GameObject::m_Name }}}"), &json!(""));
    assert!(matches!(result, Err(ResolveError::NotImplemented(_))));
}

#[test]
fn scanned_index_with_json_documents() {
    let dir = tempfile::tempdir().unwrap();
    let prefabs = dir.path().join("Prefabs");
    fs::create_dir_all(&prefabs).unwrap();
    fs::write(prefabs.join("Door.prefab"), to_json(&door_template()).to_string()).unwrap();
    fs::write(
        prefabs.join("Door.prefab.meta"),
        format!("fileFormatVersion: 2\nguid: {DOOR}\n"),
    )
    .unwrap();

    let index = TemplateIndex::scan(dir.path()).unwrap();
    assert_eq!(index.locate(DOOR), Some(prefabs.join("Door.prefab").as_path()));

    let doc = scene();
    let aliases = aliases();
    let loader = JsonDocumentLoader;
    let resolver = Resolver::new(&doc, &aliases).with_templates(TemplateStore::new(&index, &loader));
    assert_eq!(
        resolver
            .resolve_value(ObjectId(20), &json!("{{{ GameObject::m_Name }}}"), &json!(""))
            .unwrap(),
        json!("Door")
    );
}
