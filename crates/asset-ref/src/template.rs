//! Template (prefab) lookup.
//!
//! Objects instantiated from a template carry a `m_PrefabInstance` link to
//! a PrefabInstance record and a `m_CorrespondingSourceObject` link to the
//! object inside the template document. Fields that the instance does not
//! override live only in that template document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use asset_graph::{fields, non_null_reference, template_instance, Document, DocumentLoader, RecordKind};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ResolveError;

/// Suffix of the metadata file written next to every template.
pub const TEMPLATE_META_SUFFIX: &str = ".prefab.meta";
const META_SUFFIX: &str = ".meta";

// ── Index ─────────────────────────────────────────────────────────────────

/// Mapping from template guid to the path of the template document.
///
/// Built once before any patch is applied and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateIndex {
    paths: BTreeMap<String, PathBuf>,
}

impl TemplateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `*.prefab.meta` file below `assets_dir`.
    pub fn scan(assets_dir: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let mut meta_files = Vec::new();
        collect_meta_files(assets_dir.as_ref(), &mut meta_files)?;
        meta_files.sort();

        let mut index = Self::new();
        for meta in meta_files {
            let guid = read_guid(&meta)?;
            let text = meta.to_string_lossy();
            let template = PathBuf::from(text.strip_suffix(META_SUFFIX).unwrap_or(&text));
            index.insert(guid, template);
        }
        debug!(dir = %assets_dir.as_ref().display(), templates = index.len(), "indexed templates");
        Ok(index)
    }

    pub fn insert(&mut self, guid: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        self.paths.insert(guid.into(), path.into())
    }

    pub fn locate(&self, guid: &str) -> Option<&Path> {
        self.paths.get(guid).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn collect_meta_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ResolveError> {
    let io_error = |err: std::io::Error| ResolveError::TemplateIndex {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    };
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_meta_files(&path, out)?;
        } else if path.to_string_lossy().ends_with(TEMPLATE_META_SUFFIX) {
            out.push(path);
        }
    }
    Ok(())
}

fn read_guid(meta: &Path) -> Result<String, ResolveError> {
    let failed = |reason: String| ResolveError::TemplateIndex {
        path: meta.to_path_buf(),
        reason,
    };
    let text = fs::read_to_string(meta).map_err(|err| failed(err.to_string()))?;
    let meta: MetaFile = serde_yaml::from_str(&text).map_err(|err| failed(err.to_string()))?;
    Ok(meta.guid)
}

/// The part of a `.meta` file the index needs. The guid is read as the raw
/// scalar, so all-digit guids keep their leading zeros.
#[derive(Deserialize)]
struct MetaFile {
    guid: String,
}

// ── Store ─────────────────────────────────────────────────────────────────

/// Template index paired with the loader that parses template documents.
#[derive(Clone, Copy)]
pub struct TemplateStore<'a> {
    index: &'a TemplateIndex,
    loader: &'a dyn DocumentLoader,
}

impl<'a> TemplateStore<'a> {
    pub fn new(index: &'a TemplateIndex, loader: &'a dyn DocumentLoader) -> Self {
        Self { index, loader }
    }

    pub fn index(&self) -> &'a TemplateIndex {
        self.index
    }

    /// Look up `field` for a template-backed object.
    ///
    /// `body` is the field mapping of the instance object in `live`. The
    /// template is found through the instance's PrefabInstance record, and
    /// `field` is read from the corresponding source object there: either
    /// the source object's kind name (yielding its whole field mapping) or
    /// one of its fields.
    pub fn search(&self, live: &Document, body: &Value, field: &str) -> Result<Value, ResolveError> {
        let instance_id = template_instance(body).ok_or_else(|| {
            ResolveError::NotImplemented("template search on an object without a template instance".into())
        })?;
        let source_id = non_null_reference(body.get(fields::CORRESPONDING_SOURCE_OBJECT))
            .ok_or_else(|| {
                ResolveError::NotImplemented(format!(
                    "template instance {instance_id} without a corresponding source object"
                ))
            })?;

        let instance = live.get(instance_id).ok_or(ResolveError::UnknownObject(instance_id))?;
        if instance.kind() != &RecordKind::PrefabInstance {
            return Err(ResolveError::NotImplemented(format!(
                "{instance_id} is a {} record, not a template instance",
                instance.kind()
            )));
        }
        let guid = instance
            .get(fields::SOURCE_PREFAB)
            .and_then(|source| source.get(fields::GUID))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ResolveError::NotImplemented(format!("template instance {instance_id} names no source template"))
            })?;
        let path = self
            .index
            .locate(guid)
            .ok_or_else(|| ResolveError::NotImplemented(format!("template {guid} is not indexed")))?;

        debug!(template = %path.display(), object = %source_id, field, "template search");
        let template = self.loader.load(path).map_err(|source| ResolveError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let not_found = || ResolveError::TemplateFieldNotFound {
            field: field.to_string(),
            object: source_id,
            template: path.to_path_buf(),
        };
        let record = template.get(source_id).ok_or_else(not_found)?;
        if record.has_field(field) {
            return Ok(record.body().clone());
        }
        if let Some(value) = record.get(field) {
            return Ok(value.clone());
        }
        if record.template_instance().is_some() {
            return Err(ResolveError::NotImplemented(format!(
                "{source_id} in {} is itself a template instance",
                path.display()
            )));
        }
        Err(not_found())
    }
}
