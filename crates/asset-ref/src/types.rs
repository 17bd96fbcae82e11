//! Reference expression types.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::ResolveError;

/// Opening marker of a reference expression.
pub const OPEN_MARKER: &str = "{{{";
/// Closing marker of a reference expression.
pub const CLOSE_MARKER: &str = "}}}";
/// Separator between the links of a chain.
pub const CHAIN_DELIMITER: &str = "::";

/// One segment of a reference chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Field or kind name, optionally narrowed to a component alias:
    /// `m_Name`, `Transform`, `MonoBehaviour<Spinner>`.
    Field {
        name: String,
        component: Option<String>,
    },
    /// Sequence index: `[2]`.
    Index(usize),
}

impl Link {
    pub fn field(name: impl Into<String>) -> Self {
        Link::Field { name: name.into(), component: None }
    }

    pub fn typed(name: impl Into<String>, component: impl Into<String>) -> Self {
        Link::Field {
            name: name.into(),
            component: Some(component.into()),
        }
    }

    pub fn index(index: usize) -> Self {
        Link::Index(index)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Field { name, component: None } => f.write_str(name),
            Link::Field { name, component: Some(alias) } => write!(f, "{name}<{alias}>"),
            Link::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A non-empty sequence of links, read left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub links: Vec<Link>,
}

impl Chain {
    pub fn new(links: Vec<Link>) -> Self {
        Self { links }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, link) in self.links.iter().enumerate() {
            if i > 0 {
                f.write_str(CHAIN_DELIMITER)?;
            }
            write!(f, "{link}")?;
        }
        Ok(())
    }
}

/// A value as written by a patch author.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// Written to the document as is.
    Literal(Value),
    /// Looked up in the document being patched.
    Reference(Chain),
}

impl ValueExpr {
    /// Classify a raw patch value. Strings wrapped in `{{{ }}}` are parsed
    /// as reference chains; everything else is a literal.
    pub fn parse(raw: &Value) -> Result<Self, ResolveError> {
        crate::parser::ChainParser::parse_value(raw)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        ValueExpr::Literal(value.into())
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ValueExpr::Reference(_))
    }
}

impl Default for ValueExpr {
    fn default() -> Self {
        ValueExpr::Literal(Value::Null)
    }
}

// ── Alias table ───────────────────────────────────────────────────────────

/// Per-patch mapping from short component aliases to script-type guids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, guid: impl Into<String>) -> Option<String> {
        self.entries.insert(alias.into(), guid.into())
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Like [`AliasTable::get`], failing with
    /// [`ResolveError::MissingComponentAlias`] for undeclared aliases.
    pub fn resolve(&self, alias: &str) -> Result<&str, ResolveError> {
        self.get(alias)
            .ok_or_else(|| ResolveError::MissingComponentAlias(alias.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(alias, guid)| (alias.as_str(), guid.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_display() {
        let chain = Chain::new(vec![
            Link::typed("MonoBehaviour", "Foo"),
            Link::field("items"),
            Link::index(1),
            Link::field("y"),
        ]);
        assert_eq!(chain.to_string(), "MonoBehaviour<Foo>::items::[1]::y");
    }

    #[test]
    fn alias_lookup() {
        let aliases: AliasTable = [("Foo", "G")].into_iter().collect();
        assert_eq!(aliases.resolve("Foo").unwrap(), "G");
        assert!(matches!(
            aliases.resolve("Bar"),
            Err(ResolveError::MissingComponentAlias(alias)) if alias == "Bar"
        ));
    }
}
