use std::fs;

use asset_patch::{load_patch_dir, load_patch_file, PatchError};

const ADD_SPEED: &str = "\
components: {Spinner: 5f2d}
actions:
  addField: [{component: Spinner, name: speed, value: 5}]
";

const RENAME_AND_DELETE: &str = "\
components: {Spinner: 5f2d}
actions:
  renameField: [{component: Spinner, name: speed, newName: velocity}]
---
components: {Spinner: 5f2d}
actions:
  deleteComponent: [{type: Spinner}]
";

#[test]
fn loads_patch_files_in_path_order() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("v2");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("02-rename.yaml"), RENAME_AND_DELETE).unwrap();
    fs::write(dir.path().join("01-add.yml"), ADD_SPEED).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a patch: [").unwrap();

    let patches = load_patch_dir(dir.path()).unwrap();
    assert_eq!(patches.len(), 3);
    assert_eq!(patches[0].actions.add_field[0].name, "speed");
    assert_eq!(patches[1].actions.rename_field[0].new_name, "velocity");
    assert_eq!(patches[2].actions.delete_component[0].component_type, "Spinner");
}

#[test]
fn empty_directory_has_no_patches() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_patch_dir(dir.path()).unwrap().is_empty());
}

#[test]
fn broken_files_are_named() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    fs::write(&path, "actions:\n  addField: [{component: Spinner}]\n").unwrap();

    match load_patch_file(&path) {
        Err(PatchError::PatchFile { path: reported, source }) => {
            assert_eq!(reported, path);
            assert!(matches!(*source, PatchError::InvalidPatch(_)));
        }
        other => panic!("expected a patch file error, got {other:?}"),
    }
    assert!(matches!(load_patch_dir(dir.path()), Err(PatchError::PatchFile { .. })));
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_patch_dir(dir.path().join("absent")),
        Err(PatchError::Io { .. })
    ));
}
