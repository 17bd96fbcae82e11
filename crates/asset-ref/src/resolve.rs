//! Reference resolution.
//!
//! A chain is read left to right against the original document, starting
//! at the object the patched component belongs to. Each link either
//! descends into a field, steps through a reference into the record it
//! points at, picks a component of a container object, indexes a sequence,
//! or falls back to the template the current object was instantiated from.

use std::borrow::Cow;

use asset_graph::{
    is_null_reference, template_instance, to_identifier, to_reference, Document, ObjectId, ObjectRecord,
};
use serde_json::value::Index;
use serde_json::Value;
use tracing::debug;

use crate::error::ResolveError;
use crate::template::TemplateStore;
use crate::types::{AliasTable, Chain, Link, ValueExpr};

/// Where a cursor value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Live,
    Template,
}

/// Position of the resolver within the document.
#[derive(Debug)]
enum Cursor<'a> {
    /// A whole record, whose only field is its kind name.
    Record(ObjectId, &'a ObjectRecord),
    Value(Cow<'a, Value>, Origin),
}

impl Cursor<'_> {
    fn into_value(self) -> Value {
        match self {
            Cursor::Record(_, record) => record.to_value(),
            Cursor::Value(value, _) => value.into_owned(),
        }
    }
}

/// Outcome of a single link.
enum Step<'a> {
    Moved(Cursor<'a>, ObjectId),
    /// A null reference was crossed; the chain yields the default.
    Null,
}

/// Resolves value expressions against one document.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    doc: &'a Document,
    aliases: &'a AliasTable,
    templates: Option<TemplateStore<'a>>,
}

impl<'a> Resolver<'a> {
    pub fn new(doc: &'a Document, aliases: &'a AliasTable) -> Self {
        Self { doc, aliases, templates: None }
    }

    /// Enable the template fallback.
    pub fn with_templates(mut self, templates: TemplateStore<'a>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Evaluate `expr` for the object `start`.
    ///
    /// Literals come back unchanged. A reference chain that crosses a null
    /// reference before its last link yields `default`.
    pub fn resolve(&self, start: ObjectId, expr: &ValueExpr, default: &Value) -> Result<Value, ResolveError> {
        match expr {
            ValueExpr::Literal(value) => Ok(value.clone()),
            ValueExpr::Reference(chain) => {
                let value = self.resolve_chain(start, chain, default)?;
                debug!(object = %start, expression = %chain, "resolved reference");
                Ok(value)
            }
        }
    }

    /// Parse a raw patch value and evaluate it.
    pub fn resolve_value(&self, start: ObjectId, raw: &Value, default: &Value) -> Result<Value, ResolveError> {
        self.resolve(start, &ValueExpr::parse(raw)?, default)
    }

    fn resolve_chain(&self, start: ObjectId, chain: &Chain, default: &Value) -> Result<Value, ResolveError> {
        let mut current_id = start;
        let mut cursor = Cursor::Record(start, self.record(start)?);
        let mut previous = String::new();
        let last = chain.links.len().saturating_sub(1);

        for (i, link) in chain.links.iter().enumerate() {
            let step = match link {
                Link::Field { name, component } => {
                    self.step_field(cursor, current_id, name, component.as_deref(), i == last, link, &previous)?
                }
                Link::Index(index) => self.step_index(cursor, current_id, *index, link, &previous)?,
            };
            match step {
                Step::Moved(next, id) => {
                    cursor = next;
                    current_id = id;
                }
                Step::Null => {
                    debug!(object = %start, expression = %chain, link = %link, "null reference, using default");
                    return Ok(default.clone());
                }
            }
            previous = link.to_string();
        }
        Ok(cursor.into_value())
    }

    fn step_field(
        &self,
        mut cursor: Cursor<'a>,
        mut id: ObjectId,
        name: &str,
        alias: Option<&str>,
        is_last: bool,
        link: &Link,
        previous: &str,
    ) -> Result<Step<'a>, ResolveError> {
        let unresolved = |object: ObjectId| ResolveError::UnresolvedPath {
            link: link.to_string(),
            previous: previous.to_string(),
            object,
        };

        // Step through a reference into the record it points at.
        if let Cursor::Value(value, origin) = &cursor {
            if let Some(target) = to_identifier(value).filter(|_| value.get(name).is_none()) {
                if target.is_null() {
                    return Ok(Step::Null);
                }
                if *origin == Origin::Template {
                    return Err(ResolveError::NotImplemented(format!(
                        "following {target} out of a template document"
                    )));
                }
                let record = self.record(target)?;
                if is_last && record.has_field(name) {
                    return Ok(Step::Moved(live(Cow::Owned(to_reference(target))), target));
                }
                cursor = Cursor::Record(target, record);
                id = target;
            }
        }

        match cursor {
            Cursor::Record(owner, record) => {
                if record.has_field(name) {
                    return Ok(Step::Moved(live(Cow::Borrowed(record.body())), id));
                }
                if !record.kind().is_game_object() {
                    return Err(unresolved(id));
                }
                if let Some(components) = record.component_ids() {
                    return match self.find_component(components, name, alias)? {
                        Some((cid, component)) => Ok(Step::Moved(component_cursor(cid, component, is_last), cid)),
                        None => Err(unresolved(id)),
                    };
                }
                // Stripped instances list no components; look for records
                // pointing back at the object, then in its template.
                if let Some((cid, component)) = self.find_component(self.doc.owned_by(owner), name, alias)? {
                    return Ok(Step::Moved(component_cursor(cid, component, is_last), cid));
                }
                if record.template_instance().is_some() {
                    let value = self.template_search(record.body(), name)?;
                    return Ok(Step::Moved(Cursor::Value(Cow::Owned(value), Origin::Template), id));
                }
                Err(unresolved(id))
            }
            Cursor::Value(value, origin) => {
                if let Some(child) = descend(&value, name) {
                    return Ok(Step::Moved(Cursor::Value(child, origin), id));
                }
                if value.is_array() {
                    return Err(ResolveError::InvalidExpression(format!(
                        "field link {link} applied to the sequence {previous}"
                    )));
                }
                if template_instance(&value).is_none() {
                    return Err(unresolved(id));
                }
                if origin == Origin::Template {
                    return Err(ResolveError::NotImplemented(format!(
                        "nested template lookup of {link} in {previous}"
                    )));
                }
                if let Some((cid, component)) = self.find_component(self.doc.owned_by(id), name, alias)? {
                    return Ok(Step::Moved(component_cursor(cid, component, is_last), cid));
                }
                let found = self.template_search(&value, name)?;
                Ok(Step::Moved(Cursor::Value(Cow::Owned(found), Origin::Template), id))
            }
        }
    }

    fn step_index(
        &self,
        cursor: Cursor<'a>,
        id: ObjectId,
        index: usize,
        link: &Link,
        previous: &str,
    ) -> Result<Step<'a>, ResolveError> {
        let Cursor::Value(value, origin) = cursor else {
            return Err(ResolveError::InvalidExpression(format!(
                "index link {link} applied to the record {id}"
            )));
        };
        match &*value {
            Value::Array(_) => match descend(&value, index) {
                Some(item) => Ok(Step::Moved(Cursor::Value(item, origin), id)),
                None => Err(ResolveError::IndexOutOfRange {
                    index,
                    previous: previous.to_string(),
                }),
            },
            Value::Object(_) if is_null_reference(&value) => Ok(Step::Null),
            Value::Object(_) => Err(ResolveError::InvalidExpression(format!(
                "index link {link} applied to the mapping {previous}"
            ))),
            _ => Err(ResolveError::UnresolvedPath {
                link: link.to_string(),
                previous: previous.to_string(),
                object: id,
            }),
        }
    }

    /// First candidate whose kind is `name`, narrowed to the script type of
    /// `alias` when one is given.
    fn find_component(
        &self,
        candidates: impl IntoIterator<Item = ObjectId>,
        name: &str,
        alias: Option<&str>,
    ) -> Result<Option<(ObjectId, &'a ObjectRecord)>, ResolveError> {
        let script = alias.map(|alias| self.aliases.resolve(alias)).transpose()?;
        for cid in candidates {
            let component = self.record(cid)?;
            if !component.has_field(name) {
                continue;
            }
            if let Some(guid) = script {
                if component.script_guid() != Some(guid) {
                    continue;
                }
            }
            return Ok(Some((cid, component)));
        }
        Ok(None)
    }

    fn template_search(&self, body: &Value, name: &str) -> Result<Value, ResolveError> {
        match &self.templates {
            Some(store) => store.search(self.doc, body, name),
            None => Err(ResolveError::NotImplemented(format!(
                "template lookup of {name} without a template index"
            ))),
        }
    }

    fn record(&self, id: ObjectId) -> Result<&'a ObjectRecord, ResolveError> {
        self.doc.get(id).ok_or(ResolveError::UnknownObject(id))
    }
}

fn live(value: Cow<'_, Value>) -> Cursor<'_> {
    Cursor::Value(value, Origin::Live)
}

/// The last link names the component itself; earlier links continue
/// into its fields.
fn component_cursor(id: ObjectId, component: &ObjectRecord, is_last: bool) -> Cursor<'_> {
    if is_last {
        live(Cow::Owned(to_reference(id)))
    } else {
        live(Cow::Borrowed(component.body()))
    }
}

fn descend<'a, I: Index>(value: &Cow<'a, Value>, index: I) -> Option<Cow<'a, Value>> {
    match value {
        Cow::Borrowed(value) => {
            let value: &'a Value = *value;
            value.get(index).map(Cow::Borrowed)
        }
        Cow::Owned(value) => value.get(index).cloned().map(Cow::Owned),
    }
}
