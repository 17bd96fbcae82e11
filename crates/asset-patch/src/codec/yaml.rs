//! Patch files.
//!
//! A patch file is a YAML stream; every document in it is one patch.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::codec::json::from_json;
use crate::error::PatchError;
use crate::types::Patch;

const PATCH_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// One document of a patch file. Guids are read as raw scalars: YAML would
/// otherwise turn `0042...` or `00e0...` into numbers.
#[derive(Deserialize)]
struct PatchDocument {
    #[serde(default)]
    components: Option<BTreeMap<String, String>>,
    #[serde(default)]
    actions: Option<Value>,
}

/// Decode every patch of a multi-document YAML stream. Empty documents
/// are skipped.
pub fn patches_from_yaml(text: &str) -> Result<Vec<Patch>, PatchError> {
    let mut patches = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let Some(PatchDocument { components, actions }) = Option::<PatchDocument>::deserialize(document)? else {
            continue;
        };
        patches.push(from_json(&json!({"components": components, "actions": actions}))?);
    }
    Ok(patches)
}

/// Read and decode one patch file.
pub fn load_patch_file(path: impl AsRef<Path>) -> Result<Vec<Patch>, PatchError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    patches_from_yaml(&text).map_err(|err| PatchError::PatchFile {
        path: path.to_path_buf(),
        source: Box::new(err),
    })
}

/// Load every `*.yml` and `*.yaml` file below `dir`, in path order.
pub fn load_patch_dir(dir: impl AsRef<Path>) -> Result<Vec<Patch>, PatchError> {
    let mut files = Vec::new();
    collect_patch_files(dir.as_ref(), &mut files)?;
    files.sort();

    let mut patches = Vec::new();
    for file in files {
        let loaded = load_patch_file(&file)?;
        info!(file = %file.display(), patches = loaded.len(), "loaded patch file");
        patches.extend(loaded);
    }
    Ok(patches)
}

fn collect_patch_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PatchError> {
    let io_error = |source: std::io::Error| PatchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_patch_files(&path, out)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PATCH_EXTENSIONS.contains(&ext))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PATCHES: &str = "\
components:
  Spinner: 5f2d
actions:
  addField:
    - component: Spinner
      name: speed
      value: 5
---
components:
  Spinner: 5f2d
actions:
  deleteField:
    - component: Spinner
      name: legacy
";

    #[test]
    fn reads_every_document_of_a_stream() {
        let patches = patches_from_yaml(TWO_PATCHES).unwrap();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].actions.add_field[0].name, "speed");
        assert_eq!(patches[1].actions.delete_field[0].name, "legacy");
    }

    #[test]
    fn skips_empty_documents() {
        assert!(patches_from_yaml("").unwrap().is_empty());
        assert_eq!(patches_from_yaml("---\n---\ncomponents: {}\n").unwrap().len(), 1);
    }

    #[test]
    fn number_shaped_guids_stay_text() {
        let patches = patches_from_yaml(
            "components:\n  Plain: 00000000000000000000000000000042\n  Exp: 0000000000000000e000000000000000\n",
        )
        .unwrap();
        let aliases = &patches[0].components;
        assert_eq!(aliases.get("Plain"), Some("00000000000000000000000000000042"));
        assert_eq!(aliases.get("Exp"), Some("0000000000000000e000000000000000"));
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(patches_from_yaml("actions: [unclosed"), Err(PatchError::Yaml(_))));
    }
}
